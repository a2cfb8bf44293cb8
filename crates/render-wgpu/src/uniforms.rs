//! CPU-side uniform layouts. Each struct matches the WGSL declaration in
//! the corresponding shader asset; field order and padding are part of
//! that contract.

use bytemuck::{Pod, Zeroable};

/// Scene and background pass uniforms (`scene.wgsl`, `background.wgsl`,
/// `bounds.wgsl`).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub aperture: f32,
    pub focal_distance: f32,
    pub focal_length: f32,
    pub max_coc_radius_px: f32,
    pub viewport_height_px: f32,
    pub _pad: [f32; 3],
}

/// Separable blur pass uniforms (`blur.wgsl`). One buffer per direction.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct BlurUniforms {
    /// Texel size of the texture being sampled.
    pub texel_size: [f32; 2],
    pub max_coc_radius_px: f32,
    pub near_blur_radius_px: f32,
    pub inv_near_blur_radius_px: f32,
    /// 1 for the horizontal pass, 0 for the vertical pass.
    pub horizontal: u32,
    pub _pad: [f32; 2],
}

/// Composite pass uniforms (`composite.wgsl`).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CompositeUniforms {
    pub input_inv_size: [f32; 2],
    pub offset: [f32; 2],
    pub far_radius_rescale: f32,
    pub debug_mode: i32,
    pub _pad: [f32; 2],
}

/// Per-instance model matrix, fed as four vertex attributes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<BlurUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<CompositeUniforms>() % 16, 0);
    }

    #[test]
    fn instance_raw_is_one_mat4() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);
    }
}
