//! DCP (Disciplined Convex Programming) analysis.
//!
//! This module provides the attribute lattices every expression carries:
//! - Curvature tracking (constant, affine, convex, concave, unknown)
//! - Sign tracking (zero, positive, negative, unknown)
//! - The `DcpAttributes` bundle and its composition rules

pub mod attributes;
pub mod curvature;
pub mod sign;

pub use attributes::DcpAttributes;
pub use curvature::{add_curvature, scalar_mul_curvature, Curvature};
pub use sign::{add_sign, mul_sign, Sign};
