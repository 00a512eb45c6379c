//! Particle point-sprite pipeline and the wgpu side of the render bridge.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::bridge::{PointDraw, PositionTarget, POSITION_BUFFER_SIZE};
use crate::particle::{GpuPosition, MAX_PARTICLES};

use super::{overlay_depth_state, uniform_layout_entry};

const SHADER_SOURCE: &str = include_str!("../shaders/particle.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct ParticleUniforms {
    viewport_size: [f32; 2],
    point_size: f32,
    _pad: f32,
}

impl ParticleUniforms {
    pub(crate) fn new(width: u32, height: u32, point_size: u32) -> Self {
        Self {
            viewport_size: [width as f32, height as f32],
            point_size: point_size as f32,
            _pad: 0.0,
        }
    }
}

pub(crate) struct ParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    position_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ParticleRenderer {
    pub(crate) fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let initial = vec![GpuPosition::default(); MAX_PARTICLES];
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Position Buffer"),
            contents: bytemuck::cast_slice(&initial),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        debug_assert_eq!(position_buffer.size(), POSITION_BUFFER_SIZE);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform Buffer"),
            contents: bytemuck::bytes_of(&ParticleUniforms::new(1, 1, 0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Bind Group Layout"),
            entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GpuPosition>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(overlay_depth_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            position_buffer,
            uniform_buffer,
            bind_group,
        }
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &ParticleUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Write target for this frame's positions.
    pub(crate) fn upload_target<'a>(&'a self, queue: &'a wgpu::Queue) -> PositionUpload<'a> {
        PositionUpload {
            queue,
            buffer: &self.position_buffer,
        }
    }

    /// Bind pipeline and buffers, returning a draw sink for per-slot points.
    pub(crate) fn begin<'p, 'e>(&self, pass: &'p mut wgpu::RenderPass<'e>) -> PointPass<'p, 'e> {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        PointPass { pass }
    }
}

/// Staged write into the particle position buffer.
///
/// The mapping is a [`wgpu::QueueWriteBufferView`]; its contents reach the
/// buffer at the next queue submission, ahead of any command buffer recorded
/// after it.
pub(crate) struct PositionUpload<'a> {
    queue: &'a wgpu::Queue,
    buffer: &'a wgpu::Buffer,
}

impl<'a> PositionTarget for PositionUpload<'a> {
    type Mapping<'m> = wgpu::QueueWriteBufferView<'a> where Self: 'm;

    fn map_write(&mut self) -> Option<Self::Mapping<'_>> {
        let size = wgpu::BufferSize::new(POSITION_BUFFER_SIZE)?;
        self.queue.write_buffer_with(self.buffer, 0, size)
    }
}

/// Render pass with the particle pipeline bound.
pub(crate) struct PointPass<'p, 'e> {
    pass: &'p mut wgpu::RenderPass<'e>,
}

impl PointDraw for PointPass<'_, '_> {
    fn draw_point(&mut self, slot: u32) {
        self.pass.draw(0..6, slot..slot + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_are_16_bytes() {
        assert_eq!(std::mem::size_of::<ParticleUniforms>(), 16);
    }
}
