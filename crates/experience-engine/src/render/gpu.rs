use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use winit::dpi::PhysicalSize;

use crate::device::Gpu;
use crate::scene::{NodeId, Scene};

use super::backend::{FrameView, RenderBackend, SurfaceSize};
use super::error::RenderError;
use super::mesh::{build_frame, CpuMesh, MeshVertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Ambient term when the scene has no environment map.
const BASE_AMBIENT: f32 = 0.15;

/// wgpu backend: clears to the configured color and draws every mesh and
/// model node with one directional light.
pub struct GpuBackend {
    gpu: Gpu,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    frame_ubo: Option<wgpu::Buffer>,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    index_ibo: Option<wgpu::Buffer>,
    index_capacity: usize,

    depth: Option<(SurfaceSize, wgpu::TextureView)>,

    mesh_cache: HashMap<NodeId, CpuMesh>,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl GpuBackend {
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            pipeline_format: None,
            pipeline: None,
            bind_group: None,
            frame_ubo: None,
            vertex_vbo: None,
            vertex_capacity: 0,
            index_ibo: None,
            index_capacity: 0,
            depth: None,
            mesh_cache: HashMap::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self) {
        let format = self.gpu.surface_format();
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }
        let device = self.gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("experience scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("experience scene bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<FrameUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("experience scene pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("experience scene pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Discs are visible from both sides.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let frame_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("experience frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("experience scene bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: frame_ubo.as_entire_binding() }],
        });

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.frame_ubo = Some(frame_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_depth(&mut self) {
        let size = self.gpu.size();
        let size = SurfaceSize { width: size.width.max(1), height: size.height.max(1) };
        if matches!(&self.depth, Some((s, _)) if *s == size) {
            return;
        }

        let texture = self.gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("experience depth"),
            size: wgpu::Extent3d { width: size.width, height: size.height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth = Some((size, view));
    }

    fn upload_geometry(&mut self, scene: &Scene) {
        build_frame(scene, &mut self.mesh_cache, &mut self.vertices, &mut self.indices);
        if self.indices.is_empty() {
            return;
        }

        if self.vertices.len() > self.vertex_capacity || self.vertex_vbo.is_none() {
            let cap = self.vertices.len().next_power_of_two().max(1024);
            self.vertex_vbo = Some(self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("experience scene vbo"),
                size: (cap * std::mem::size_of::<MeshVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = cap;
        }

        if self.indices.len() > self.index_capacity || self.index_ibo.is_none() {
            let cap = self.indices.len().next_power_of_two().max(1024);
            self.index_ibo = Some(self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("experience scene ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }

        if let (Some(vbo), Some(ibo)) = (&self.vertex_vbo, &self.index_ibo) {
            self.gpu.queue().write_buffer(vbo, 0, bytemuck::cast_slice(&self.vertices));
            self.gpu.queue().write_buffer(ibo, 0, bytemuck::cast_slice(&self.indices));
        }
    }

    fn write_frame_uniform(&self, frame: &FrameView<'_>) {
        let Some(ubo) = self.frame_ubo.as_ref() else { return };
        let uniform = FrameUniform::new(frame);
        self.gpu.queue().write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
    }
}

impl RenderBackend for GpuBackend {
    fn resize(&mut self, size: SurfaceSize) {
        self.gpu.resize(PhysicalSize::new(size.width, size.height));
    }

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        self.ensure_pipeline();
        self.ensure_depth();
        self.upload_geometry(frame.scene);
        self.write_frame_uniform(frame);

        let mut gpu_frame = self.gpu.acquire()?;

        let clear = if self.gpu.surface_format().is_srgb() {
            frame.settings.clear_color.to_linear()
        } else {
            frame.settings.clear_color
        };

        {
            let depth_view = self.depth.as_ref().map(|(_, v)| v);
            let mut rpass = gpu_frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("experience scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &gpu_frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
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

            if let (Some(pipeline), Some(bind_group), Some(vbo), Some(ibo)) =
                (&self.pipeline, &self.bind_group, &self.vertex_vbo, &self.index_ibo)
            {
                if !self.indices.is_empty() {
                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(0, bind_group, &[]);
                    rpass.set_vertex_buffer(0, vbo.slice(..));
                    rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..self.indices.len() as u32, 0, 0..1);
                }
            }
        }

        self.gpu.present(gpu_frame);
        Ok(())
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Per-frame uniform (112 bytes), mirrored by `Frame` in `scene.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    ambient: [f32; 4],
}

impl FrameUniform {
    fn new(frame: &FrameView<'_>) -> Self {
        let (dir, color) = frame
            .scene
            .lights()
            .next()
            .map(|l| {
                let c = l.color.to_linear();
                (l.direction(), Vec3::new(c.r, c.g, c.b) * l.intensity)
            })
            .unwrap_or((Vec3::NEG_Y, Vec3::ZERO));

        let ambient = BASE_AMBIENT + frame.scene.environment().map_or(0.0, |e| e.intensity);

        Self {
            view_proj: frame.view_projection().to_cols_array_2d(),
            light_dir: dir.extend(0.0).to_array(),
            light_color: color.extend(1.0).to_array(),
            ambient: [ambient, ambient, ambient, frame.settings.exposure.get()],
        }
    }
}
