//! The four-pass depth-of-field renderer.

use crate::camera::OrbitCamera;
use crate::mesh;
use crate::pipeline::{self, RenderError, create_validated_shader};
use crate::shaders;
use crate::targets::FrameTargets;
use crate::texture;
use crate::uniforms::{BlurUniforms, CompositeUniforms, InstanceRaw, SceneUniforms};
use defocus_assets::{ShaderCatalog, ShaderKind};
use defocus_common::BoundingSphere;
use defocus_render::FrameState;
use defocus_scene::field::INSTANCE_COUNT;
use glam::Mat4;
use wgpu::util::DeviceExt;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, data: &mesh::MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertices")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_indices")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// wgpu renderer for the staged depth-of-field pipeline.
pub struct DofRenderer {
    surface_format: wgpu::TextureFormat,
    targets: FrameTargets,

    teapot: GpuMesh,
    background: GpuMesh,
    bounds_vertex_buffer: wgpu::Buffer,
    bounds_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    matrix_scratch: Vec<Mat4>,
    instance_scratch: Vec<InstanceRaw>,
    bounding_sphere: BoundingSphere,

    scene_uniforms: wgpu::Buffer,
    blur_h_uniforms: wgpu::Buffer,
    blur_v_uniforms: wgpu::Buffer,
    composite_uniforms: wgpu::Buffer,

    blur_bind_group_layout: wgpu::BindGroupLayout,
    composite_bind_group_layout: wgpu::BindGroupLayout,
    scene_pipeline_layout: wgpu::PipelineLayout,
    blur_pipeline_layout: wgpu::PipelineLayout,
    composite_pipeline_layout: wgpu::PipelineLayout,

    _gold_texture: wgpu::Texture,
    _clay_texture: wgpu::Texture,
    sampler: wgpu::Sampler,
    gold_bind_group: wgpu::BindGroup,
    clay_bind_group: wgpu::BindGroup,
    blur_h_bind_group: wgpu::BindGroup,
    blur_v_bind_group: wgpu::BindGroup,
    composite_bind_group: wgpu::BindGroup,

    scene_pipeline: wgpu::RenderPipeline,
    background_pipeline: wgpu::RenderPipeline,
    bounds_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
}

impl DofRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        catalog: &ShaderCatalog,
    ) -> Self {
        // Meshes.
        let teapot_data = mesh::teapot(32);
        let bounding_sphere = teapot_data.bounding_sphere();
        let teapot = GpuMesh::new(device, "teapot", &teapot_data);
        let background = GpuMesh::new(device, "background", &mesh::uv_sphere(50.0, 60));

        let bounds_lines =
            mesh::wire_sphere(bounding_sphere.center, bounding_sphere.radius, 32);
        let bounds_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("bounds_vertices"),
            contents: bytemuck::cast_slice(&bounds_lines),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let bounds_vertex_count = bounds_lines.len() as u32;

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (INSTANCE_COUNT * std::mem::size_of::<InstanceRaw>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Uniform buffers.
        let scene_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let blur_uniform_desc = |label| wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<BlurUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        };
        let blur_h_uniforms = device.create_buffer(&blur_uniform_desc("blur_h_uniforms"));
        let blur_v_uniforms = device.create_buffer(&blur_uniform_desc("blur_v_uniforms"));
        let composite_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("composite_uniforms"),
            size: std::mem::size_of::<CompositeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Bind group layouts.
        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scene_bind_group_layout"),
                entries: &[
                    uniform_entry(
                        0,
                        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ),
                    texture_entry(1),
                    sampler_entry(2),
                ],
            });
        let blur_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("blur_bind_group_layout"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                    texture_entry(1),
                    texture_entry(2),
                    sampler_entry(3),
                ],
            });
        let composite_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("composite_bind_group_layout"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                    texture_entry(1),
                    texture_entry(2),
                    texture_entry(3),
                    sampler_entry(4),
                ],
            });

        let scene_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("scene_pipeline_layout"),
                bind_group_layouts: &[&scene_bind_group_layout],
                push_constant_ranges: &[],
            });
        let blur_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("blur_pipeline_layout"),
                bind_group_layouts: &[&blur_bind_group_layout],
                push_constant_ranges: &[],
            });
        let composite_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("composite_pipeline_layout"),
                bind_group_layouts: &[&composite_bind_group_layout],
                push_constant_ranges: &[],
            });

        // Textures and static bind groups.
        let (gold_texture, gold_view) = texture::create_gold_texture(device, queue);
        let (clay_texture, clay_view) = texture::create_clay_texture(device, queue);
        let sampler = texture::create_sampler(device);

        let material_bind_group = |label, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &scene_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: scene_uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            })
        };
        let gold_bind_group = material_bind_group("gold_bind_group", &gold_view);
        let clay_bind_group = material_bind_group("clay_bind_group", &clay_view);

        let targets = FrameTargets::new(device, width, height);
        let (blur_h_bind_group, blur_v_bind_group, composite_bind_group) =
            Self::create_pass_bind_groups(
                device,
                &targets,
                &blur_bind_group_layout,
                &composite_bind_group_layout,
                &blur_h_uniforms,
                &blur_v_uniforms,
                &composite_uniforms,
                &sampler,
            );

        // Pipelines: asset source when it validates, fallback otherwise.
        let build = |kind: ShaderKind| -> wgpu::RenderPipeline {
            let module = catalog
                .source(kind)
                .and_then(|src| {
                    match create_validated_shader(device, kind.file_name(), &src.source) {
                        Ok(module) => Some(module),
                        Err(err) => {
                            tracing::error!(?kind, %err, "shader rejected, using fallback");
                            None
                        }
                    }
                })
                .unwrap_or_else(|| {
                    create_validated_shader(
                        device,
                        kind.file_name(),
                        shaders::fallback_source(kind),
                    )
                    .expect("fallback shader must compile")
                });
            match kind {
                ShaderKind::Scene => {
                    pipeline::scene_pipeline(device, &scene_pipeline_layout, &module)
                }
                ShaderKind::Background => {
                    pipeline::background_pipeline(device, &scene_pipeline_layout, &module)
                }
                ShaderKind::Bounds => {
                    pipeline::bounds_pipeline(device, &scene_pipeline_layout, &module)
                }
                ShaderKind::Blur => {
                    pipeline::blur_pipeline(device, &blur_pipeline_layout, &module)
                }
                ShaderKind::Composite => pipeline::composite_pipeline(
                    device,
                    &composite_pipeline_layout,
                    &module,
                    surface_format,
                ),
            }
        };

        let scene_pipeline = build(ShaderKind::Scene);
        let background_pipeline = build(ShaderKind::Background);
        let bounds_pipeline = build(ShaderKind::Bounds);
        let blur_pipeline = build(ShaderKind::Blur);
        let composite_pipeline = build(ShaderKind::Composite);

        Self {
            surface_format,
            targets,
            teapot,
            background,
            bounds_vertex_buffer,
            bounds_vertex_count,
            instance_buffer,
            matrix_scratch: Vec::with_capacity(INSTANCE_COUNT),
            instance_scratch: Vec::with_capacity(INSTANCE_COUNT),
            bounding_sphere,
            scene_uniforms,
            blur_h_uniforms,
            blur_v_uniforms,
            composite_uniforms,
            blur_bind_group_layout,
            composite_bind_group_layout,
            scene_pipeline_layout,
            blur_pipeline_layout,
            composite_pipeline_layout,
            _gold_texture: gold_texture,
            _clay_texture: clay_texture,
            sampler,
            gold_bind_group,
            clay_bind_group,
            blur_h_bind_group,
            blur_v_bind_group,
            composite_bind_group,
            scene_pipeline,
            background_pipeline,
            bounds_pipeline,
            blur_pipeline,
            composite_pipeline,
        }
    }

    /// Bounding sphere of one scene instance, for cursor picking.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    #[allow(clippy::too_many_arguments)]
    fn create_pass_bind_groups(
        device: &wgpu::Device,
        targets: &FrameTargets,
        blur_layout: &wgpu::BindGroupLayout,
        composite_layout: &wgpu::BindGroupLayout,
        blur_h_uniforms: &wgpu::Buffer,
        blur_v_uniforms: &wgpu::Buffer,
        composite_uniforms: &wgpu::Buffer,
        sampler: &wgpu::Sampler,
    ) -> (wgpu::BindGroup, wgpu::BindGroup, wgpu::BindGroup) {
        let blur_h = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blur_h_bind_group"),
            layout: blur_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: blur_h_uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.scene.resolve.view),
                },
                // The horizontal pass has no separate near input; the slot
                // is filled with the scene so the layout stays shared.
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&targets.scene.resolve.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        let blur_v = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blur_v_bind_group"),
            layout: blur_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: blur_v_uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.blur_h.color.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&targets.blur_h.near.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        let composite = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("composite_bind_group"),
            layout: composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: composite_uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.scene.resolve.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&targets.blur_v.near.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&targets.blur_v.color.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        (blur_h, blur_v, composite)
    }

    /// Recreate the intermediate targets and their bind groups.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.targets = FrameTargets::new(device, width, height);
        let (blur_h, blur_v, composite) = Self::create_pass_bind_groups(
            device,
            &self.targets,
            &self.blur_bind_group_layout,
            &self.composite_bind_group_layout,
            &self.blur_h_uniforms,
            &self.blur_v_uniforms,
            &self.composite_uniforms,
            &self.sampler,
        );
        self.blur_h_bind_group = blur_h;
        self.blur_v_bind_group = blur_v;
        self.composite_bind_group = composite;
    }

    /// Swap in a freshly validated program for one pipeline slot.
    fn install_program(
        &mut self,
        device: &wgpu::Device,
        kind: ShaderKind,
        source: &str,
    ) -> Result<(), RenderError> {
        let module = create_validated_shader(device, kind.file_name(), source)?;
        match kind {
            ShaderKind::Scene => {
                self.scene_pipeline =
                    pipeline::scene_pipeline(device, &self.scene_pipeline_layout, &module);
            }
            ShaderKind::Background => {
                self.background_pipeline =
                    pipeline::background_pipeline(device, &self.scene_pipeline_layout, &module);
            }
            ShaderKind::Bounds => {
                self.bounds_pipeline =
                    pipeline::bounds_pipeline(device, &self.scene_pipeline_layout, &module);
            }
            ShaderKind::Blur => {
                self.blur_pipeline =
                    pipeline::blur_pipeline(device, &self.blur_pipeline_layout, &module);
            }
            ShaderKind::Composite => {
                self.composite_pipeline = pipeline::composite_pipeline(
                    device,
                    &self.composite_pipeline_layout,
                    &module,
                    self.surface_format,
                );
            }
        }
        Ok(())
    }

    /// Rebuild the given programs from the catalog. Each program fails or
    /// succeeds on its own; a failed program keeps its current pipeline.
    /// Returns the per-program failures.
    pub fn reload(
        &mut self,
        device: &wgpu::Device,
        catalog: &ShaderCatalog,
        kinds: &[ShaderKind],
    ) -> Vec<(ShaderKind, RenderError)> {
        let mut failures = Vec::new();
        for &kind in kinds {
            let source = match catalog.source(kind) {
                Some(s) => s.source.clone(),
                None => continue,
            };
            match self.install_program(device, kind, &source) {
                Ok(()) => tracing::info!(?kind, "pipeline rebuilt"),
                Err(err) => {
                    tracing::error!(?kind, %err, "shader reload failed, keeping previous program");
                    failures.push((kind, err));
                }
            }
        }
        failures
    }

    /// Encode and submit one frame into `surface_view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        camera: &OrbitCamera,
        frame: &FrameState<'_>,
    ) {
        let params = frame.params;

        queue.write_buffer(
            &self.scene_uniforms,
            0,
            bytemuck::bytes_of(&SceneUniforms {
                view: camera.view_matrix().to_cols_array_2d(),
                proj: camera.projection_matrix().to_cols_array_2d(),
                aperture: params.aperture,
                focal_distance: params.focal_plane,
                focal_length: params.focal_length,
                max_coc_radius_px: params.max_coc_radius_px as f32,
                viewport_height_px: self.targets.height as f32,
                _pad: [0.0; 3],
            }),
        );

        let max_coc = params.max_coc_radius_px as f32;
        queue.write_buffer(
            &self.blur_h_uniforms,
            0,
            bytemuck::bytes_of(&BlurUniforms {
                texel_size: [
                    1.0 / self.targets.scene.resolve.width as f32,
                    1.0 / self.targets.scene.resolve.height as f32,
                ],
                max_coc_radius_px: max_coc,
                near_blur_radius_px: max_coc,
                inv_near_blur_radius_px: 1.0 / max_coc,
                horizontal: 1,
                _pad: [0.0; 2],
            }),
        );
        queue.write_buffer(
            &self.blur_v_uniforms,
            0,
            bytemuck::bytes_of(&BlurUniforms {
                texel_size: [
                    1.0 / self.targets.blur_h.color.width as f32,
                    1.0 / self.targets.blur_h.color.height as f32,
                ],
                max_coc_radius_px: max_coc,
                near_blur_radius_px: max_coc,
                inv_near_blur_radius_px: 1.0 / max_coc,
                horizontal: 0,
                _pad: [0.0; 2],
            }),
        );
        queue.write_buffer(
            &self.composite_uniforms,
            0,
            bytemuck::bytes_of(&CompositeUniforms {
                input_inv_size: [
                    1.0 / self.targets.width as f32,
                    1.0 / self.targets.height as f32,
                ],
                offset: [0.0; 2],
                far_radius_rescale: params.far_radius_rescale,
                debug_mode: params.debug_mode.index(),
                _pad: [0.0; 2],
            }),
        );

        frame
            .field
            .write_model_matrices(frame.time, &mut self.matrix_scratch);
        self.instance_scratch.clear();
        self.instance_scratch.extend(
            self.matrix_scratch
                .iter()
                .map(|m| InstanceRaw {
                    model: m.to_cols_array_2d(),
                }),
        );
        queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&self.instance_scratch),
        );
        let instance_count = self.instance_scratch.len() as u32;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("dof_encoder"),
        });

        // Scene pass: color + signed CoC into the multisampled HDR target.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.scene.msaa_view,
                    resolve_target: Some(&self.targets.scene.resolve.view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.scene.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.scene_pipeline);
            pass.set_bind_group(0, &self.gold_bind_group, &[]);
            pass.set_vertex_buffer(0, self.teapot.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.set_index_buffer(self.teapot.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.teapot.index_count, 0, 0..instance_count);

            pass.set_pipeline(&self.background_pipeline);
            pass.set_bind_group(0, &self.clay_bind_group, &[]);
            pass.set_vertex_buffer(0, self.background.vertex_buffer.slice(..));
            pass.set_index_buffer(
                self.background.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..self.background.index_count, 0, 0..1);

            if frame.show_bounds {
                pass.set_pipeline(&self.bounds_pipeline);
                pass.set_bind_group(0, &self.gold_bind_group, &[]);
                pass.set_vertex_buffer(0, self.bounds_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.draw(0..self.bounds_vertex_count, 0..instance_count);
            }
        }

        // Horizontal blur and downsample to quarter width.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blur_h_pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.blur_h.near.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.blur_h.color.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                ],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.blur_pipeline);
            pass.set_bind_group(0, &self.blur_h_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        // Vertical blur to quarter width and height.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blur_v_pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.blur_v.near.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.blur_v.color.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                ],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.blur_pipeline);
            pass.set_bind_group(0, &self.blur_v_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        // Composite into the swapchain.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("composite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.composite_pipeline);
            pass.set_bind_group(0, &self.composite_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}
