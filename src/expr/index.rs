//! Index keys for selecting entries of an expression.
//!
//! A key is a pair of per-axis selectors. Keys are resolved against the shape
//! of the indexed expression into an [`IndexSpec`] of concrete
//! `(start, stop, step)` ranges.

use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{DcpError, Result};

use super::shape::Shape;

/// Selection along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// A single position.
    Index(usize),
    /// Positions `start, start + step, ...` below `stop`.
    /// `stop` is clamped to the axis length.
    Range {
        start: usize,
        stop: usize,
        step: usize,
    },
    /// The whole axis.
    All,
}

impl Selector {
    /// A strided range.
    pub fn step(start: usize, stop: usize, step: usize) -> Self {
        Selector::Range { start, stop, step }
    }

    fn resolve(self, dim: usize, axis: usize) -> Result<AxisRange> {
        match self {
            Selector::Index(index) => {
                if index >= dim {
                    return Err(DcpError::IndexOutOfBounds { index, dim, axis });
                }
                Ok(AxisRange::single(index))
            }
            Selector::Range { start, stop, step } => {
                if step == 0 {
                    return Err(DcpError::ZeroStep);
                }
                let stop = stop.min(dim);
                if start >= stop {
                    return Err(DcpError::EmptySelection { axis });
                }
                Ok(AxisRange { start, stop, step })
            }
            Selector::All => Ok(AxisRange {
                start: 0,
                stop: dim,
                step: 1,
            }),
        }
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector::Index(index)
    }
}

impl From<Range<usize>> for Selector {
    fn from(r: Range<usize>) -> Self {
        Selector::step(r.start, r.end, 1)
    }
}

impl From<RangeFrom<usize>> for Selector {
    fn from(r: RangeFrom<usize>) -> Self {
        Selector::step(r.start, usize::MAX, 1)
    }
}

impl From<RangeTo<usize>> for Selector {
    fn from(r: RangeTo<usize>) -> Self {
        Selector::step(0, r.end, 1)
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::All
    }
}

/// A two-axis index key.
///
/// A key built from a single index or range selects rows, except on a row
/// vector, where it runs along the vector's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub row: Selector,
    pub col: Selector,
    single_axis: bool,
}

impl IndexKey {
    pub fn new(row: impl Into<Selector>, col: impl Into<Selector>) -> Self {
        IndexKey {
            row: row.into(),
            col: col.into(),
            single_axis: false,
        }
    }

    fn single_axis(selector: impl Into<Selector>) -> Self {
        IndexKey {
            row: selector.into(),
            col: Selector::All,
            single_axis: true,
        }
    }

    /// Resolve the key against a shape.
    pub fn resolve(&self, shape: &Shape) -> Result<IndexSpec> {
        let (row, col) = if self.single_axis && shape.rows() == 1 {
            (Selector::All, self.row)
        } else {
            (self.row, self.col)
        };
        Ok(IndexSpec {
            rows: row.resolve(shape.rows(), 0)?,
            cols: col.resolve(shape.cols(), 1)?,
        })
    }
}

impl From<usize> for IndexKey {
    fn from(index: usize) -> Self {
        IndexKey::single_axis(index)
    }
}

impl From<Range<usize>> for IndexKey {
    fn from(range: Range<usize>) -> Self {
        IndexKey::single_axis(range)
    }
}

impl From<RangeFull> for IndexKey {
    fn from(_: RangeFull) -> Self {
        IndexKey::new(Selector::All, Selector::All)
    }
}

impl<R: Into<Selector>, C: Into<Selector>> From<(R, C)> for IndexKey {
    fn from((row, col): (R, C)) -> Self {
        IndexKey::new(row, col)
    }
}

/// A resolved range along one axis; never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisRange {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl AxisRange {
    fn single(index: usize) -> Self {
        AxisRange {
            start: index,
            stop: index + 1,
            step: 1,
        }
    }

    /// Number of selected positions; at least one.
    pub fn count(&self) -> usize {
        (self.stop - self.start).div_ceil(self.step)
    }

    /// Position in the parent axis of the `i`-th selected entry.
    pub fn position(&self, i: usize) -> usize {
        self.start + i * self.step
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count() == 1 {
            write!(f, "{}", self.start)
        } else if self.step == 1 {
            write!(f, "{}:{}", self.start, self.stop)
        } else {
            write!(f, "{}:{}:{}", self.start, self.stop, self.step)
        }
    }
}

/// Resolved indexing specification for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexSpec {
    pub rows: AxisRange,
    pub cols: AxisRange,
}

impl IndexSpec {
    /// Select the single entry `(row, col)`.
    pub fn element(row: usize, col: usize) -> Self {
        IndexSpec {
            rows: AxisRange::single(row),
            cols: AxisRange::single(col),
        }
    }

    /// Shape of the selection.
    pub fn shape(&self) -> Shape {
        Shape::matrix(self.rows.count(), self.cols.count())
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.rows, self.cols)
    }
}
