//! Built-in fallback shaders.
//!
//! Each pipeline slot starts from one of these minimal programs and is
//! replaced by the corresponding asset file once it validates. If an asset
//! is missing or broken the slot keeps whatever program it has, so the
//! application always has something to draw with.

/// Fallback for `scene.wgsl`: instanced flat shading, CoC 0.
pub const FALLBACK_SCENE: &str = r#"
struct SceneUniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    aperture: f32,
    focal_distance: f32,
    focal_length: f32,
    max_coc_radius_px: f32,
    viewport_height_px: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0)
var<uniform> u: SceneUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: VertexOutput;
    out.clip_position = u.proj * u.view * model * vec4<f32>(vertex.position, 1.0);
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let shade = 0.3 + 0.7 * max(dot(in.world_normal, normalize(vec3<f32>(0.3, 1.0, 0.5))), 0.0);
    return vec4<f32>(vec3<f32>(0.5 * shade), 0.0);
}
"#;

/// Fallback for `background.wgsl`: flat dark sphere, CoC 0.
pub const FALLBACK_BACKGROUND: &str = r#"
struct SceneUniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    aperture: f32,
    focal_distance: f32,
    focal_length: f32,
    max_coc_radius_px: f32,
    viewport_height_px: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0)
var<uniform> u: SceneUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = u.proj * u.view * vec4<f32>(vertex.position, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(0.12, 0.10, 0.09, 0.0);
}
"#;

/// Fallback for `bounds.wgsl`: solid cyan lines.
pub const FALLBACK_BOUNDS: &str = r#"
struct SceneUniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    aperture: f32,
    focal_distance: f32,
    focal_length: f32,
    max_coc_radius_px: f32,
    viewport_height_px: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0)
var<uniform> u: SceneUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: VertexOutput;
    out.clip_position = u.proj * u.view * model * vec4<f32>(vertex.position, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(0.0, 1.0, 1.0, 0.0);
}
"#;

/// Fallback for `blur.wgsl`: passthrough, empty near field.
pub const FALLBACK_BLUR: &str = r#"
struct BlurUniforms {
    texel_size: vec2<f32>,
    max_coc_radius_px: f32,
    near_blur_radius_px: f32,
    inv_near_blur_radius_px: f32,
    horizontal: u32,
    _pad0: f32,
    _pad1: f32,
};

@group(0) @binding(0)
var<uniform> u: BlurUniforms;
@group(0) @binding(1)
var t_color: texture_2d<f32>;
@group(0) @binding(2)
var t_near: texture_2d<f32>;
@group(0) @binding(3)
var samp: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    let p = positions[index];
    var out: VertexOutput;
    out.clip_position = vec4<f32>(p, 0.0, 1.0);
    out.uv = vec2<f32>(p.x * 0.5 + 0.5, 1.0 - (p.y * 0.5 + 0.5));
    return out;
}

struct FragmentOutput {
    @location(0) near: vec4<f32>,
    @location(1) color: vec4<f32>,
};

@fragment
fn fs_main(in: VertexOutput) -> FragmentOutput {
    var out: FragmentOutput;
    out.near = vec4<f32>(0.0);
    out.color = textureSampleLevel(t_color, samp, in.uv, 0.0);
    return out;
}
"#;

/// Fallback for `composite.wgsl`: show the sharp input unmodified.
pub const FALLBACK_COMPOSITE: &str = r#"
struct CompositeUniforms {
    input_inv_size: vec2<f32>,
    offset: vec2<f32>,
    far_radius_rescale: f32,
    debug_mode: i32,
    _pad0: f32,
    _pad1: f32,
};

@group(0) @binding(0)
var<uniform> u: CompositeUniforms;
@group(0) @binding(1)
var t_input: texture_2d<f32>;
@group(0) @binding(2)
var t_near: texture_2d<f32>;
@group(0) @binding(3)
var t_blur: texture_2d<f32>;
@group(0) @binding(4)
var samp: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    let p = positions[index];
    var out: VertexOutput;
    out.clip_position = vec4<f32>(p, 0.0, 1.0);
    out.uv = vec2<f32>(p.x * 0.5 + 0.5, 1.0 - (p.y * 0.5 + 0.5));
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSampleLevel(t_input, samp, in.uv + u.offset, 0.0);
    return vec4<f32>(color.rgb, 1.0);
}
"#;

/// The built-in fallback source for a shader program.
pub fn fallback_source(kind: defocus_assets::ShaderKind) -> &'static str {
    match kind {
        defocus_assets::ShaderKind::Scene => FALLBACK_SCENE,
        defocus_assets::ShaderKind::Background => FALLBACK_BACKGROUND,
        defocus_assets::ShaderKind::Bounds => FALLBACK_BOUNDS,
        defocus_assets::ShaderKind::Blur => FALLBACK_BLUR,
        defocus_assets::ShaderKind::Composite => FALLBACK_COMPOSITE,
    }
}
