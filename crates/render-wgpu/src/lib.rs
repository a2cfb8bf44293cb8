//! wgpu backend for the depth-of-field pipeline.
//!
//! Walks the [`defocus_render::FramePlan`] with real GPU passes: scene
//! render into an HDR target (color + signed CoC), separable blur at
//! reduced resolution, and a final composite. Shader programs come from
//! the asset catalog and can be swapped at runtime; a program that fails
//! validation keeps its previous pipeline.

pub mod camera;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod shaders;
pub mod targets;
pub mod texture;
pub mod uniforms;

pub use camera::OrbitCamera;
pub use pipeline::RenderError;
pub use renderer::DofRenderer;

pub fn crate_info() -> &'static str {
    "defocus-render-wgpu v0.1.0"
}
