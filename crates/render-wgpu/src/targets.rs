//! Render target creation for the depth-of-field pipeline.

/// HDR color format used throughout the pipeline. The alpha channel of the
/// scene target carries the signed CoC, so a float format is required.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Depth format.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// MSAA sample count for the scene pass. 4× is the portable maximum.
pub const SCENE_SAMPLES: u32 = 4;

/// A single-sample color target that later passes can sample.
pub struct RenderTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

fn create_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    sample_count: u32,
    usage: wgpu::TextureUsages,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    })
}

/// Create a sampleable single-sample render target.
pub fn create_render_target(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> RenderTarget {
    let texture = create_texture(
        device,
        label,
        width,
        height,
        format,
        1,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    RenderTarget {
        texture,
        view,
        width: width.max(1),
        height: height.max(1),
    }
}

/// Full-resolution scene target: multisampled color + depth, with a
/// single-sample resolve texture the blur and composite passes sample.
pub struct SceneTarget {
    pub msaa_texture: wgpu::Texture,
    pub msaa_view: wgpu::TextureView,
    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    pub resolve: RenderTarget,
}

impl SceneTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let msaa_texture = create_texture(
            device,
            "scene_msaa",
            width,
            height,
            HDR_FORMAT,
            SCENE_SAMPLES,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let msaa_view = msaa_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_texture = create_texture(
            device,
            "scene_depth",
            width,
            height,
            DEPTH_FORMAT,
            SCENE_SAMPLES,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let resolve = create_render_target(device, "scene_resolve", width, height, HDR_FORMAT);
        Self {
            msaa_texture,
            msaa_view,
            depth_texture,
            depth_view,
            resolve,
        }
    }
}

/// Dual-attachment blur target: premultiplied near field + blurred scene.
pub struct BlurTarget {
    pub near: RenderTarget,
    pub color: RenderTarget,
}

impl BlurTarget {
    pub fn new(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        Self {
            near: create_render_target(
                device,
                &format!("{label}_near"),
                width,
                height,
                HDR_FORMAT,
            ),
            color: create_render_target(
                device,
                &format!("{label}_color"),
                width,
                height,
                HDR_FORMAT,
            ),
        }
    }
}

/// All intermediate targets for one frame, recreated on resize.
pub struct FrameTargets {
    pub scene: SceneTarget,
    /// Quarter width, full height.
    pub blur_h: BlurTarget,
    /// Quarter width, quarter height.
    pub blur_v: BlurTarget,
    pub width: u32,
    pub height: u32,
}

impl FrameTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let quarter_w = (width / 4).max(1);
        let quarter_h = (height / 4).max(1);
        Self {
            scene: SceneTarget::new(device, width, height),
            blur_h: BlurTarget::new(device, "blur_h", quarter_w, height),
            blur_v: BlurTarget::new(device, "blur_v", quarter_w, quarter_h),
            width,
            height,
        }
    }
}
