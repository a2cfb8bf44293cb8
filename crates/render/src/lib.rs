//! Renderer-agnostic description of the depth-of-field frame.
//!
//! The frame is a fixed sequence of passes; backends walk the plan and
//! encode the real GPU work. A text renderer covers the interface for the
//! CLI and for tests that run without a GPU.

pub mod plan;
pub mod renderer;

pub use plan::{FramePlan, PassDesc, PassKind};
pub use renderer::{DebugTextRenderer, FrameState, Renderer};

pub fn crate_info() -> &'static str {
    "defocus-render v0.1.0"
}
