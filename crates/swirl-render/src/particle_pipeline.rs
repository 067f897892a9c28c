//! Billboarded particle render pipeline
//!
//! Draws one camera-facing quad per particle via instanced indexed
//! draws. Instance attributes come straight from the simulation's flat
//! buffer mirrors: position (x3 f32), color (x4 f32), scale (x1 f32),
//! one slot per particle. The draw call is bounded by the spawn bound,
//! so slots the simulation has not admitted are never rendered.

use bytemuck::{Pod, Zeroable};
use swirl_sim::BufferSink;
use wgpu::util::DeviceExt;

use crate::camera::Camera;

/// Camera uniforms for the particle draw — matches the WGSL struct.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 3],
    pub _pad0: f32,
    pub camera_up: [f32; 3],
    pub _pad1: f32,
}

/// The three per-instance vertex buffers for one pool generation
struct InstanceBuffers {
    position: wgpu::Buffer,
    color: wgpu::Buffer,
    scale: wgpu::Buffer,
    capacity: usize,
}

/// Owns the particle pipeline and the GPU side of the buffer mirror.
///
/// Implements `BufferSink`: `allocate` rebuilds the instance buffers for
/// a new pool generation, `upload` re-writes position and color each
/// frame. Scale is uploaded once at allocation and never touched again.
pub struct ParticleRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    quad_index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    buffers: Option<InstanceBuffers>,
}

impl ParticleRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("particle_shader.wgsl").into()),
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Particle Uniform Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        // One vertex buffer per mirror, all advancing per instance
        let position_layout = wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        };
        let color_layout = wgpu::VertexBufferLayout {
            array_stride: 16,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 0,
                shader_location: 1,
            }],
        };
        let scale_layout = wgpu::VertexBufferLayout {
            array_stride: 4,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 0,
                shader_location: 2,
            }],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_particle"),
                buffers: &[position_layout, color_layout, scale_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_particle"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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
            // Depth test on, depth write off: translucent particles
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let quad_indices: [u32; 6] = [0, 1, 2, 2, 1, 3];
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Quad Index Buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform Buffer"),
            contents: bytemuck::cast_slice(&[ParticleUniforms {
                view_proj: [[0.0; 4]; 4],
                camera_right: [1.0, 0.0, 0.0],
                _pad0: 0.0,
                camera_up: [0.0, 1.0, 0.0],
                _pad1: 0.0,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Particle Uniform Bind Group"),
        });

        Self {
            device: device.clone(),
            queue: queue.clone(),
            pipeline,
            quad_index_buffer,
            uniform_buffer,
            uniform_bind_group,
            buffers: None,
        }
    }

    /// Push the camera's view-projection and billboard axes to the GPU
    pub fn update_camera(&self, camera: &Camera) {
        let uniforms = ParticleUniforms {
            view_proj: camera.view_projection_matrix(),
            camera_right: camera.right_vector(),
            _pad0: 0.0,
            camera_up: camera.up_vector(),
            _pad1: 0.0,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Number of instances the current buffers can hold
    pub fn capacity(&self) -> usize {
        self.buffers.as_ref().map_or(0, |b| b.capacity)
    }

    /// Draw the first `spawn_bound` particles.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, spawn_bound: u32) {
        let Some(buffers) = &self.buffers else {
            return;
        };
        if spawn_bound == 0 {
            return;
        }
        let instances = spawn_bound.min(buffers.capacity as u32);

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, buffers.position.slice(..));
        pass.set_vertex_buffer(1, buffers.color.slice(..));
        pass.set_vertex_buffer(2, buffers.scale.slice(..));
        pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..6, 0, 0..instances);
    }
}

impl BufferSink for ParticleRenderer {
    fn allocate(&mut self, positions: &[f32], colors: &[f32], scales: &[f32]) {
        let position = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Position Buffer"),
                contents: bytemuck::cast_slice(positions),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let color = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Color Buffer"),
                contents: bytemuck::cast_slice(colors),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let scale = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Scale Buffer"),
                contents: bytemuck::cast_slice(scales),
                usage: wgpu::BufferUsages::VERTEX,
            });

        self.buffers = Some(InstanceBuffers {
            position,
            color,
            scale,
            capacity: scales.len(),
        });
    }

    fn upload(&mut self, positions: &[f32], colors: &[f32]) {
        let Some(buffers) = &self.buffers else {
            return;
        };
        self.queue
            .write_buffer(&buffers.position, 0, bytemuck::cast_slice(positions));
        self.queue
            .write_buffer(&buffers.color, 0, bytemuck::cast_slice(colors));
    }
}
