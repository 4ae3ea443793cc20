//! Core expression types for dcpgraph.
//!
//! An `Expr` is a cheap handle to an immutable node. Every node owns its
//! children (as handles), carries a unique `ExprId`, and stores the
//! `DcpAttributes` derived when it was built. Nodes are never mutated, so a
//! sub-expression can be shared by any number of parents.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;
use tracing::trace;

use crate::dcp::{Curvature, DcpAttributes, Sign};
use crate::error::Result;

use super::index::IndexSpec;
use super::shape::Shape;

/// Unique identifier for expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u64);

impl ExprId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        ExprId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric value of a constant (dense, sparse or scalar).
#[derive(Debug, Clone)]
pub enum Array {
    /// Dense matrix storage.
    Dense(DMatrix<f64>),
    /// Sparse CSC matrix storage.
    Sparse(CscMatrix<f64>),
    /// Scalar value.
    Scalar(f64),
}

impl Array {
    /// Get the `(rows, cols)` dimensions.
    pub fn dims(&self) -> (usize, usize) {
        match self {
            Array::Dense(m) => (m.nrows(), m.ncols()),
            Array::Sparse(m) => (m.nrows(), m.ncols()),
            Array::Scalar(_) => (1, 1),
        }
    }

    /// Get the shape of the array. Fails for arrays with an empty dimension.
    pub fn shape(&self) -> Result<Shape> {
        let (rows, cols) = self.dims();
        Shape::new(rows, cols)
    }

    /// Try to get as a scalar value.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Array::Scalar(v) => Some(*v),
            Array::Dense(m) if m.nrows() == 1 && m.ncols() == 1 => Some(m[(0, 0)]),
            Array::Sparse(m) if m.nrows() == 1 && m.ncols() == 1 => {
                Some(m.values().iter().sum())
            }
            _ => None,
        }
    }

    /// Check if all elements are non-negative.
    pub fn is_nonneg(&self) -> bool {
        match self {
            Array::Scalar(v) => *v >= 0.0,
            Array::Dense(m) => m.iter().all(|&v| v >= 0.0),
            // Implicit entries are zero
            Array::Sparse(m) => m.values().iter().all(|&v| v >= 0.0),
        }
    }

    /// Check if all elements are non-positive.
    pub fn is_nonpos(&self) -> bool {
        match self {
            Array::Scalar(v) => *v <= 0.0,
            Array::Dense(m) => m.iter().all(|&v| v <= 0.0),
            Array::Sparse(m) => m.values().iter().all(|&v| v <= 0.0),
        }
    }

    /// Sign shared by every entry.
    pub fn sign(&self) -> Sign {
        Sign::from_entries(self.is_nonneg(), self.is_nonpos())
    }

    /// Create from a vector (as a column).
    pub fn from_vec(v: Vec<f64>) -> Self {
        let n = v.len();
        Array::Dense(DMatrix::from_vec(n, 1, v))
    }
}

impl From<f64> for Array {
    fn from(v: f64) -> Self {
        Array::Scalar(v)
    }
}

impl From<Vec<f64>> for Array {
    fn from(v: Vec<f64>) -> Self {
        Array::from_vec(v)
    }
}

impl From<DMatrix<f64>> for Array {
    fn from(m: DMatrix<f64>) -> Self {
        Array::Dense(m)
    }
}

impl From<CscMatrix<f64>> for Array {
    fn from(m: CscMatrix<f64>) -> Self {
        Array::Sparse(m)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Array::Scalar(v) => write!(f, "{v}"),
            Array::Dense(m) if m.nrows() == 1 && m.ncols() == 1 => write!(f, "{}", m[(0, 0)]),
            Array::Dense(m) => {
                write!(f, "[")?;
                for (i, row) in m.row_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[")?;
                    for (j, v) in row.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{v}")?;
                    }
                    write!(f, "]")?;
                }
                write!(f, "]")
            }
            Array::Sparse(m) => write!(f, "sparse({}x{}, nnz={})", m.nrows(), m.ncols(), m.nnz()),
        }
    }
}

/// Data for a variable expression.
#[derive(Debug, Clone)]
pub struct VariableData {
    /// Shape of the variable.
    pub shape: Shape,
    /// Optional name for display.
    pub name: Option<String>,
    /// Declared sign; `Unknown` when nothing was declared.
    pub sign: Sign,
}

/// Data for a constant expression.
#[derive(Debug, Clone)]
pub struct ConstantData {
    /// The constant value.
    pub value: Array,
}

/// Variant tag and children of a node.
#[derive(Debug, Clone)]
pub enum ExprKind {
    // ========== Leaf nodes ==========
    /// A decision variable.
    Variable(VariableData),
    /// A constant value.
    Constant(ConstantData),

    // ========== Composite nodes ==========
    /// Addition: a + b
    Add(Expr, Expr),
    /// Negation: -a
    Neg(Expr),
    /// Multiplication k * a. The constant factor is always on the left.
    Mul(Expr, Expr),
    /// Division a / k by a scalar constant.
    Div(Expr, Expr),
    /// Transpose of a non-scalar.
    Transpose(Expr),
    /// Indexing/slicing of a non-scalar.
    Index(Expr, IndexSpec),
}

impl ExprKind {
    /// Short tag naming the variant.
    pub fn tag(&self) -> &'static str {
        match self {
            ExprKind::Variable(_) => "Variable",
            ExprKind::Constant(_) => "Constant",
            ExprKind::Add(..) => "Add",
            ExprKind::Neg(_) => "Neg",
            ExprKind::Mul(..) => "Mul",
            ExprKind::Div(..) => "Div",
            ExprKind::Transpose(_) => "Transpose",
            ExprKind::Index(..) => "Index",
        }
    }
}

struct Node {
    id: ExprId,
    kind: ExprKind,
    attrs: DcpAttributes,
}

impl Node {
    /// Move this node's children onto `stack`, leaving a childless kind.
    fn detach_children(&mut self, stack: &mut Vec<Expr>) {
        let leaf = ExprKind::Constant(ConstantData {
            value: Array::Scalar(0.0),
        });
        match std::mem::replace(&mut self.kind, leaf) {
            ExprKind::Add(a, b) | ExprKind::Mul(a, b) | ExprKind::Div(a, b) => {
                stack.push(a);
                stack.push(b);
            }
            ExprKind::Neg(a) | ExprKind::Transpose(a) | ExprKind::Index(a, _) => stack.push(a),
            ExprKind::Variable(_) | ExprKind::Constant(_) => {}
        }
    }
}

// Graphs can be arbitrarily deep (a sum built in a loop), so uniquely owned
// descendants are released from an explicit stack instead of by recursion.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(expr) = stack.pop() {
            if let Ok(mut node) = Arc::try_unwrap(expr.node) {
                node.detach_children(&mut stack);
            }
        }
    }
}

/// An expression in the DCP graph.
///
/// Cloning an `Expr` clones the handle, not the node. Equality and hashing
/// are by node identity, so expressions can be used as map keys; use
/// [`ConstraintExt::equals`](crate::constraints::ConstraintExt::equals) to
/// build an equality constraint.
#[derive(Clone)]
pub struct Expr {
    node: Arc<Node>,
}

impl Expr {
    /// Wrap a fully validated node. Attributes must already be derived.
    pub(crate) fn from_parts(kind: ExprKind, attrs: DcpAttributes) -> Expr {
        let id = ExprId::new();
        trace!(
            id = id.raw(),
            kind = kind.tag(),
            shape = %attrs.shape,
            curvature = %attrs.curvature,
            sign = %attrs.sign,
            "built expression node"
        );
        Expr {
            node: Arc::new(Node { id, kind, attrs }),
        }
    }

    /// Unique identifier of this node.
    pub fn id(&self) -> ExprId {
        self.node.id
    }

    /// Variant tag and children.
    pub fn kind(&self) -> &ExprKind {
        &self.node.kind
    }

    /// The attributes derived when this node was built.
    pub fn attrs(&self) -> &DcpAttributes {
        &self.node.attrs
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Direct children, in operand order.
    pub fn children(&self) -> Vec<&Expr> {
        match self.kind() {
            ExprKind::Variable(_) | ExprKind::Constant(_) => Vec::new(),
            ExprKind::Add(a, b) | ExprKind::Mul(a, b) | ExprKind::Div(a, b) => vec![a, b],
            ExprKind::Neg(a) | ExprKind::Transpose(a) | ExprKind::Index(a, _) => vec![a],
        }
    }

    /// Visit this node and its descendants in pre-order, each distinct node
    /// once.
    pub fn walk<F: FnMut(&Expr)>(&self, f: &mut F) {
        let mut seen = HashSet::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            if !seen.insert(expr.id()) {
                continue;
            }
            f(expr);
            stack.extend(expr.children().into_iter().rev());
        }
    }

    // ========== Attribute queries ==========

    /// Get the curvature of this expression.
    pub fn curvature(&self) -> Curvature {
        self.node.attrs.curvature
    }

    /// Get the sign of this expression.
    pub fn sign(&self) -> Sign {
        self.node.attrs.sign
    }

    /// Get the shape of the expression.
    pub fn shape(&self) -> Shape {
        self.node.attrs.shape
    }

    /// The `(rows, cols)` dimensions.
    pub fn size(&self) -> (usize, usize) {
        self.shape().size()
    }

    /// Curvature broadcast over every entry, for display.
    pub fn curvature_grid(&self) -> DMatrix<Curvature> {
        let (rows, cols) = self.size();
        DMatrix::from_element(rows, cols, self.curvature())
    }

    /// Sign broadcast over every entry, for display.
    pub fn sign_grid(&self) -> DMatrix<Sign> {
        let (rows, cols) = self.size();
        DMatrix::from_element(rows, cols, self.sign())
    }

    /// Check if this expression is constant.
    pub fn is_constant(&self) -> bool {
        self.curvature().is_constant()
    }

    /// Check if this expression is affine.
    pub fn is_affine(&self) -> bool {
        self.curvature().is_affine()
    }

    /// Check if this expression is convex.
    pub fn is_convex(&self) -> bool {
        self.curvature().is_convex()
    }

    /// Check if this expression is concave.
    pub fn is_concave(&self) -> bool {
        self.curvature().is_concave()
    }

    /// Check if this expression is DCP-compliant (known curvature).
    pub fn is_dcp(&self) -> bool {
        self.curvature().is_dcp()
    }

    /// Check if every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.sign().is_zero()
    }

    /// Check if every entry is non-negative.
    pub fn is_positive(&self) -> bool {
        self.sign().is_positive()
    }

    /// Check if every entry is non-positive.
    pub fn is_negative(&self) -> bool {
        self.sign().is_negative()
    }

    /// Check if the shape is (1, 1).
    pub fn is_scalar(&self) -> bool {
        self.shape().is_scalar()
    }

    /// Check if this is a column vector.
    pub fn is_vector(&self) -> bool {
        self.shape().is_vector()
    }

    // ========== Leaves ==========

    /// Check if this expression is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind(), ExprKind::Variable(_))
    }

    /// Get the unique ID if this is a variable.
    pub fn variable_id(&self) -> Option<ExprId> {
        match self.kind() {
            ExprKind::Variable(_) => Some(self.id()),
            _ => None,
        }
    }

    /// Numeric value of a constant leaf.
    pub fn value(&self) -> Option<&Array> {
        match self.kind() {
            ExprKind::Constant(c) => Some(&c.value),
            _ => None,
        }
    }

    /// Collect all variables in this expression.
    pub fn variables(&self) -> Vec<ExprId> {
        let mut vars = Vec::new();
        self.walk(&mut |e| {
            if let Some(id) = e.variable_id() {
                vars.push(id);
            }
        });
        vars.sort();
        vars.dedup();
        vars
    }

    // ========== Display ==========

    /// Human-readable rendering of the expression.
    ///
    /// Operands that are sums, products, quotients or negations are
    /// parenthesized when they appear under another operator.
    pub fn name(&self) -> String {
        enum Piece<'a> {
            Expr(&'a Expr, bool),
            Text(&'static str),
            Owned(String),
        }

        let mut out = String::new();
        let mut stack = vec![Piece::Expr(self, false)];
        while let Some(piece) = stack.pop() {
            let (expr, operand) = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Owned(text) => {
                    out.push_str(&text);
                    continue;
                }
                Piece::Expr(expr, operand) => (expr, operand),
            };
            let compound = matches!(
                expr.kind(),
                ExprKind::Add(..) | ExprKind::Mul(..) | ExprKind::Div(..) | ExprKind::Neg(_)
            );
            if operand && compound {
                out.push('(');
                stack.push(Piece::Text(")"));
            }
            // Pushed in reverse of the order they are written
            match expr.kind() {
                ExprKind::Variable(v) => match &v.name {
                    Some(name) => out.push_str(name),
                    None => out.push_str(&format!("var{}", expr.id().raw())),
                },
                ExprKind::Constant(c) => out.push_str(&c.value.to_string()),
                ExprKind::Add(a, b) => {
                    stack.push(Piece::Expr(b, false));
                    stack.push(Piece::Text(" + "));
                    stack.push(Piece::Expr(a, false));
                }
                ExprKind::Neg(a) => {
                    stack.push(Piece::Expr(a, true));
                    stack.push(Piece::Text("-"));
                }
                ExprKind::Mul(a, b) => {
                    stack.push(Piece::Expr(b, true));
                    stack.push(Piece::Text(" * "));
                    stack.push(Piece::Expr(a, true));
                }
                ExprKind::Div(a, b) => {
                    stack.push(Piece::Expr(b, true));
                    stack.push(Piece::Text(" / "));
                    stack.push(Piece::Expr(a, true));
                }
                ExprKind::Transpose(a) => {
                    stack.push(Piece::Text(".T"));
                    stack.push(Piece::Expr(a, true));
                }
                ExprKind::Index(a, spec) => {
                    stack.push(Piece::Owned(spec.to_string()));
                    stack.push(Piece::Expr(a, true));
                }
            }
        }
        out
    }

    // ========== Iteration ==========

    /// Number of entries, or `None` for a scalar.
    ///
    /// A scalar is not treated as a one-element sequence.
    pub fn len(&self) -> Option<usize> {
        if self.is_scalar() {
            None
        } else {
            Some(self.shape().numel())
        }
    }

    /// Scalar entries in column-major order.
    ///
    /// Each call starts a fresh pass; a scalar yields itself once.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            expr: self,
            next: 0,
            end: self.shape().numel(),
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Expr) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expr")
            .field("id", &self.id().raw())
            .field("kind", &self.kind().tag())
            .field("name", &self.name())
            .field("curvature", &self.curvature())
            .field("sign", &self.sign())
            .field("shape", &self.shape())
            .finish()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Column-major iterator over the scalar entries of an expression.
#[derive(Clone)]
pub struct Entries<'a> {
    expr: &'a Expr,
    next: usize,
    end: usize,
}

impl Iterator for Entries<'_> {
    type Item = Expr;

    fn next(&mut self) -> Option<Expr> {
        if self.next >= self.end {
            return None;
        }
        let rows = self.expr.shape().rows();
        let (row, col) = (self.next % rows, self.next / rows);
        self.next += 1;
        Some(self.expr.element(row, col))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl<'a> IntoIterator for &'a Expr {
    type Item = Expr;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Entries<'a> {
        self.iter()
    }
}
