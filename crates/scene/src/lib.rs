//! Scene simulation for the defocus demo.
//!
//! The scene is a 9×9×9 grid of spinning instances, regenerated from a
//! deterministic seed. The same seed always produces the same field, which
//! makes the animation reproducible and testable without a GPU.

pub mod clock;
pub mod field;

pub use clock::SimulationClock;
pub use field::{InstanceField, InstanceSeed};

pub fn crate_info() -> &'static str {
    "defocus-scene v0.1.0"
}
