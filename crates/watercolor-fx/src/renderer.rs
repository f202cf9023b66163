use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use watercolor_engine::device::ShaderCompileError;
use watercolor_engine::render::{compile_program, DepthTarget, RenderCtx, RenderTarget, SurfaceTarget, OFFSCREEN_FORMAT};

use crate::backend::{DrawTarget, Pass, RenderBackend};
use crate::geometry::{Geometry, Vertex};
use crate::scene::{DrawableId, ProgramId, SceneGraph, SceneId};
use crate::targets::TargetPool;
use crate::uniforms::{UniformSet, U_COLOR, U_RESOLUTION, U_TIME};

/// Per-draw uniform block. Mirrors `DrawUniforms` in `shaders/common.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    resolution: [f32; 2],
    time: f32,
    _pad: f32,
}

impl DrawUniforms {
    fn new(view_proj: Mat4, model: Mat4, uniforms: &UniformSet, target_size: (u32, u32)) -> Self {
        let resolution = uniforms
            .vec2(U_RESOLUTION)
            .map(|v| v.to_array())
            .unwrap_or([target_size.0 as f32, target_size.1 as f32]);
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color: uniforms.vec4(U_COLOR).unwrap_or(Vec4::ONE).to_array(),
            resolution,
            time: uniforms.float(U_TIME).unwrap_or(0.0),
            _pad: 0.0,
        }
    }
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, geometry: &Geometry) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        // Index buffers must be a multiple of 4 bytes.
        let mut indices = geometry.indices.clone();
        if indices.len() % 2 == 1 {
            indices.push(0);
        }
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vbo, ibo, index_count: geometry.index_count() }
    }
}

struct CompiledProgram {
    label: &'static str,
    module: wgpu::ShaderModule,
    texture_slots: [Option<&'static str>; 2],
    depth_test: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    program: ProgramId,
    format: wgpu::TextureFormat,
    depth: bool,
}

/// GPU side of the scene graph.
///
/// Programs are compiled up front so a broken shader fails at startup. Meshes,
/// pipelines and per-drawable uniform buffers are created on first use.
/// Offscreen targets follow the [`TargetPool`] sizes handed in with each pass.
pub struct SceneRenderer {
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    fallback_view: wgpu::TextureView,
    programs: Vec<CompiledProgram>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    meshes: Vec<GpuMesh>,
    uniform_buffers: HashMap<(SceneId, DrawableId), wgpu::Buffer>,
    targets: Vec<RenderTarget>,
    depth: HashMap<(u32, u32), DepthTarget>,
    warned_missing: bool,
}

impl SceneRenderer {
    pub fn new(ctx: &RenderCtx<'_>, graph: &SceneGraph) -> Result<Self, ShaderCompileError> {
        let device = ctx.device;

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
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("watercolor draw bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                    },
                    count: None,
                },
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("watercolor pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("watercolor sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Zero-initialized 1x1 stand-in for unbound texture inputs.
        let fallback_view = RenderTarget::new(device, "watercolor fallback texture", (1, 1))
            .texture()
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut programs = Vec::with_capacity(graph.programs().len());
        for desc in graph.programs() {
            programs.push(CompiledProgram {
                label: desc.label,
                module: compile_program(device, desc.label, desc.source)?,
                texture_slots: desc.texture_slots,
                depth_test: desc.depth_test,
            });
        }

        Ok(Self {
            bind_group_layout,
            pipeline_layout,
            sampler,
            fallback_view,
            programs,
            pipelines: HashMap::new(),
            meshes: Vec::new(),
            uniform_buffers: HashMap::new(),
            targets: Vec::new(),
            depth: HashMap::new(),
            warned_missing: false,
        })
    }

    /// Binds the renderer to one frame's encoder and surface.
    pub fn frame<'f, 's>(
        &'f mut self,
        ctx: &RenderCtx<'f>,
        surface: &'f mut SurfaceTarget<'s>,
    ) -> FramePasses<'f, 's> {
        FramePasses {
            renderer: self,
            device: ctx.device,
            queue: ctx.queue,
            surface_format: ctx.surface_format,
            surface,
        }
    }

    fn sync_meshes(&mut self, device: &wgpu::Device, graph: &SceneGraph) {
        for geometry in graph.geometries().iter().skip(self.meshes.len()) {
            let label = format!("watercolor mesh {}", self.meshes.len());
            self.meshes.push(GpuMesh::upload(device, &label, geometry));
        }
    }

    fn sync_targets(&mut self, device: &wgpu::Device, pool: &TargetPool) {
        for (id, desc) in pool.iter() {
            match self.targets.get_mut(id.index()) {
                Some(target) => {
                    if target.ensure_size(device, desc.size) {
                        log::debug!("reallocated `{}` at {}x{}", desc.label, desc.size.0, desc.size.1);
                    }
                }
                None => self.targets.push(RenderTarget::new(device, desc.label, desc.size)),
            }
        }
    }

    fn ensure_depth(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if self.depth.contains_key(&size) {
            return;
        }
        // Surface and offscreen sizes may both be live; anything beyond is stale.
        if self.depth.len() >= 2 {
            self.depth.clear();
        }
        self.depth.insert(size, DepthTarget::new(device, size));
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let Some(program) = self.programs.get(key.program.index()) else { return };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: key.depth.then(|| wgpu::DepthStencilState {
                format: DepthTarget::FORMAT,
                depth_write_enabled: program.depth_test,
                depth_compare: if program.depth_test {
                    wgpu::CompareFunction::Less
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        log::debug!("built pipeline `{}` for {:?} (depth: {})", program.label, key.format, key.depth);
        self.pipelines.insert(key, pipeline);
    }

    fn uniform_buffer(&mut self, device: &wgpu::Device, key: (SceneId, DrawableId)) -> &wgpu::Buffer {
        self.uniform_buffers.entry(key).or_insert_with(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("watercolor draw ubo"),
                size: std::mem::size_of::<DrawUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        })
    }

    fn texture_view(&self, uniforms: &UniformSet, slot: Option<&str>) -> &wgpu::TextureView {
        slot.and_then(|name| uniforms.texture(name))
            .and_then(|id| self.targets.get(id.index()))
            .map(RenderTarget::view)
            .unwrap_or(&self.fallback_view)
    }
}

/// [`RenderBackend`] recording into one frame's command encoder.
pub struct FramePasses<'f, 's> {
    renderer: &'f mut SceneRenderer,
    device: &'f wgpu::Device,
    queue: &'f wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    surface: &'f mut SurfaceTarget<'s>,
}

struct PreparedDraw {
    key: PipelineKey,
    mesh: usize,
    bind_group: wgpu::BindGroup,
}

impl RenderBackend for FramePasses<'_, '_> {
    fn render(&mut self, pass: Pass<'_>) {
        let device = self.device;
        let r = &mut *self.renderer;

        let Some(scene) = pass.graph.scene(pass.scene) else {
            if !r.warned_missing {
                log::warn!("scene `{}` is not in the graph; pass skipped", pass.scene.label());
                r.warned_missing = true;
            }
            return;
        };

        r.sync_meshes(device, pass.graph);
        r.sync_targets(device, pass.targets);

        let (format, size) = match pass.target {
            DrawTarget::Surface => (self.surface_format, self.surface.size),
            DrawTarget::Offscreen(id) => match pass.targets.size(id) {
                Some(size) => (OFFSCREEN_FORMAT, size),
                None => return,
            },
        };

        let visible: Vec<(usize, &crate::scene::Drawable)> =
            scene.drawables().iter().enumerate().filter(|(_, d)| d.visible).collect();
        let depth = visible
            .iter()
            .any(|(_, d)| r.programs.get(d.program.index()).is_some_and(|p| p.depth_test));
        if depth {
            r.ensure_depth(device, size);
        }

        let view_proj = scene.camera.view_projection();
        let mut draws = Vec::with_capacity(visible.len());
        for (index, drawable) in visible {
            let Some(program) = r.programs.get(drawable.program.index()) else { continue };
            if drawable.geometry.index() >= r.meshes.len() {
                continue;
            }
            let slots = program.texture_slots;
            let key = PipelineKey { program: drawable.program, format, depth };
            r.ensure_pipeline(device, key);

            let block = DrawUniforms::new(view_proj, drawable.transform.matrix(), &drawable.uniforms, size);
            let ubo = r.uniform_buffer(device, (pass.scene, DrawableId(index)));
            self.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&block));

            let ubo = &r.uniform_buffers[&(pass.scene, DrawableId(index))];
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(drawable.label),
                layout: &r.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(r.texture_view(&drawable.uniforms, slots[0])),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(r.texture_view(&drawable.uniforms, slots[1])),
                    },
                    wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&r.sampler) },
                ],
            });
            draws.push(PreparedDraw { key, mesh: drawable.geometry.index(), bind_group });
        }

        let color_view = match pass.target {
            DrawTarget::Surface => self.surface.color_view,
            DrawTarget::Offscreen(id) => match r.targets.get(id.index()) {
                Some(t) => t.view(),
                None => return,
            },
        };
        let load = match scene.clear {
            Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = self.surface.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(pass.scene.label()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations { load, store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: depth
                .then(|| r.depth.get(&size))
                .flatten()
                .map(|d| wgpu::RenderPassDepthStencilAttachment {
                    view: d.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for draw in &draws {
            let Some(pipeline) = r.pipelines.get(&draw.key) else { continue };
            let mesh = &r.meshes[draw.mesh];
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &draw.bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::uniforms::UniformValue;

    #[test]
    fn draw_uniforms_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 160);
    }

    #[test]
    fn resolution_defaults_to_target_size() {
        let u = UniformSet::new().with(U_TIME, UniformValue::Float(3.0));
        let block = DrawUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, &u, (640, 480));
        assert_eq!(block.resolution, [640.0, 480.0]);
        assert_eq!(block.time, 3.0);
        assert_eq!(block.color, [1.0; 4]);

        let u = u.with(U_RESOLUTION, UniformValue::Vec2(Vec2::new(10.0, 20.0)));
        assert_eq!(DrawUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, &u, (640, 480)).resolution, [10.0, 20.0]);
    }
}
