//! Field-coordinate geometry primitives shared by every movement and
//! coverage component.

pub mod field;
pub mod vector;

pub use field::*;
pub use vector::Vector2D;
