//! Atom functions for building expressions.
//!
//! The affine atoms (addition, negation, multiplication and division by
//! constants, transpose, indexing) and the operator overloads that build them.

pub mod affine;

pub use affine::{index, transpose};
