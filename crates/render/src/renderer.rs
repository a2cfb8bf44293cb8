use crate::plan::FramePlan;
use defocus_optics::DofParams;
use defocus_scene::InstanceField;

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    pub field: &'a InstanceField,
    pub params: &'a DofParams,
    /// Simulation time in seconds.
    pub time: f64,
    /// Draw the instance bounding spheres.
    pub show_bounds: bool,
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// The renderer reads scene and parameter state; it never mutates them.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, frame: &FrameState<'_>) -> Self::Output;
}

/// Text renderer for headless use.
///
/// Produces a human-readable summary of the frame: the pass plan, the
/// optics parameters, and the scene checksum. Used by the CLI and by tests
/// exercising the render interface without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    plan: FramePlan,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &FrameState<'_>) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame (t={:.3}s, seed={}, instances={}) ===\n",
            frame.time,
            frame.field.seed(),
            frame.field.len()
        ));
        out.push_str(&format!(
            "Optics: focal_plane={:.2} f/{:.1} fov={:.0} aperture={:.4} focal_length={:.4}\n",
            frame.params.focal_plane,
            frame.params.f_stop(),
            frame.params.fov_deg,
            frame.params.aperture,
            frame.params.focal_length
        ));
        out.push_str(&format!(
            "CoC: max_radius={}px far_rescale={:.1} debug={}\n",
            frame.params.max_coc_radius_px,
            frame.params.far_radius_rescale,
            frame.params.debug_mode.label()
        ));
        for pass in self.plan.passes() {
            out.push_str(&format!(
                "  pass {:?}: 1/{}x1/{} outputs={} samples={}\n",
                pass.kind, pass.scale.0, pass.scale.1, pass.color_outputs, pass.samples
            ));
        }
        out.push_str(&format!(
            "State hash: {:#018x}\n",
            frame.field.state_hash(frame.time)
        ));
        if frame.show_bounds {
            out.push_str("Bounds: shown\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_renderer_lists_all_passes() {
        let field = InstanceField::default();
        let params = DofParams::default();
        let mut renderer = DebugTextRenderer::new();
        let out = renderer.render(&FrameState {
            field: &field,
            params: &params,
            time: 0.0,
            show_bounds: false,
        });
        assert!(out.contains("Scene"));
        assert!(out.contains("BlurHorizontal"));
        assert!(out.contains("BlurVertical"));
        assert!(out.contains("Composite"));
        assert!(out.contains("instances=729"));
    }

    #[test]
    fn text_renderer_is_deterministic() {
        let field = InstanceField::default();
        let params = DofParams::default();
        let mut renderer = DebugTextRenderer::new();
        let frame = FrameState {
            field: &field,
            params: &params,
            time: 2.0,
            show_bounds: true,
        };
        assert_eq!(renderer.render(&frame), renderer.render(&frame));
    }
}
