/// The four stages of the depth-of-field frame, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Full-resolution scene render: RGB = color, A = signed CoC.
    Scene,
    /// Downsample to quarter width and blur horizontally. Two outputs:
    /// premultiplied near field + blurred scene.
    BlurHorizontal,
    /// Blur vertically at quarter width and height. Same two outputs.
    BlurVertical,
    /// Blend sharp input, blurred mid/far field, and near field into the
    /// swapchain.
    Composite,
}

/// Static description of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassDesc {
    pub kind: PassKind,
    /// Resolution divisors relative to the window (width, height).
    pub scale: (u32, u32),
    /// Number of color attachments.
    pub color_outputs: u32,
    /// MSAA sample count.
    pub samples: u32,
}

impl PassDesc {
    /// Output resolution for a given window size, never below 1×1.
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        ((width / self.scale.0).max(1), (height / self.scale.1).max(1))
    }
}

/// The ordered pass sequence of a frame.
#[derive(Debug, Clone)]
pub struct FramePlan {
    passes: Vec<PassDesc>,
}

impl Default for FramePlan {
    fn default() -> Self {
        Self::standard()
    }
}

impl FramePlan {
    /// The demo's pipeline: scene → horizontal blur/downsample → vertical
    /// blur → composite.
    pub fn standard() -> Self {
        Self {
            passes: vec![
                PassDesc {
                    kind: PassKind::Scene,
                    scale: (1, 1),
                    color_outputs: 1,
                    samples: 4,
                },
                PassDesc {
                    kind: PassKind::BlurHorizontal,
                    scale: (4, 1),
                    color_outputs: 2,
                    samples: 1,
                },
                PassDesc {
                    kind: PassKind::BlurVertical,
                    scale: (4, 4),
                    color_outputs: 2,
                    samples: 1,
                },
                PassDesc {
                    kind: PassKind::Composite,
                    scale: (1, 1),
                    color_outputs: 1,
                    samples: 1,
                },
            ],
        }
    }

    pub fn passes(&self) -> &[PassDesc] {
        &self.passes
    }

    pub fn pass(&self, kind: PassKind) -> Option<&PassDesc> {
        self.passes.iter().find(|p| p.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_plan_order() {
        let plan = FramePlan::standard();
        let kinds: Vec<PassKind> = plan.passes().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PassKind::Scene,
                PassKind::BlurHorizontal,
                PassKind::BlurVertical,
                PassKind::Composite,
            ]
        );
    }

    #[test]
    fn blur_passes_downsample() {
        let plan = FramePlan::standard();
        let h = plan.pass(PassKind::BlurHorizontal).unwrap();
        assert_eq!(h.output_size(960, 540), (240, 540));
        let v = plan.pass(PassKind::BlurVertical).unwrap();
        assert_eq!(v.output_size(960, 540), (240, 135));
    }

    #[test]
    fn output_size_never_hits_zero() {
        let v = FramePlan::standard();
        let v = v.pass(PassKind::BlurVertical).unwrap();
        assert_eq!(v.output_size(2, 2), (1, 1));
    }

    #[test]
    fn blur_passes_have_two_outputs() {
        let plan = FramePlan::standard();
        assert_eq!(plan.pass(PassKind::BlurHorizontal).unwrap().color_outputs, 2);
        assert_eq!(plan.pass(PassKind::BlurVertical).unwrap().color_outputs, 2);
        assert_eq!(plan.pass(PassKind::Composite).unwrap().color_outputs, 1);
    }

    #[test]
    fn only_the_scene_pass_is_multisampled() {
        let plan = FramePlan::standard();
        for pass in plan.passes() {
            if pass.kind == PassKind::Scene {
                assert!(pass.samples > 1);
            } else {
                assert_eq!(pass.samples, 1);
            }
        }
    }
}
