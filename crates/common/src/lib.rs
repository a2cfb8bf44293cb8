//! Shared types and utilities for the defocus demo.

pub mod geom;
pub mod prng;

pub use geom::{Aabb, BoundingSphere, Ray};
pub use prng::Prng;

pub fn crate_info() -> &'static str {
    "defocus-common v0.1.0"
}
