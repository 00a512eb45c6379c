mod particles;
mod sponge;
mod water;

use std::sync::Arc;

use winit::window::Window;

use crate::bridge::RenderBridge;
use crate::error::GpuError;
use crate::particle::ParticlePool;
use crate::sponge::SpongePose;
use crate::textures::TextureConfig;

use particles::{ParticleRenderer, ParticleUniforms};
use sponge::{SpongeRenderer, SpongeUniforms};
use water::{WaterRenderer, WaterUniforms};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Everything the renderer needs to draw one frame.
pub struct FrameData<'a> {
    pub pool: &'a ParticlePool,
    pub pose: SpongePose,
    pub is_wet: bool,
    pub water_level: f32,
    /// Droplet size in surface pixels.
    pub point_size: u32,
    /// Seconds since start, drives the water animation.
    pub time: f32,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    sponge: SpongeRenderer,
    water: WaterRenderer,
    particles: ParticleRenderer,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, texture: TextureConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        log::info!("surface format {surface_format:?}, {}x{}", size.width, size.height);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let sponge = SpongeRenderer::new(&device, &queue, config.format, texture);
        let water = WaterRenderer::new(&device, config.format);
        let particles = ParticleRenderer::new(&device, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            sponge,
            water,
            particles,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size.
    pub fn reconfigure(&mut self) {
        let size = winit::dpi::PhysicalSize::new(self.config.width, self.config.height);
        self.resize(size);
    }

    /// Draw one frame: sponge, then particles, then water on top.
    ///
    /// Particle positions are written through the bridge before the render
    /// pass is recorded. Returns the number of particle draws issued.
    pub fn render(
        &mut self,
        frame: &FrameData<'_>,
        bridge: &mut RenderBridge,
    ) -> Result<usize, wgpu::SurfaceError> {
        let (width, height) = (self.config.width, self.config.height);

        self.sponge
            .write_uniforms(&self.queue, &SpongeUniforms::new(&frame.pose, frame.is_wet));
        self.water.write_uniforms(
            &self.queue,
            &WaterUniforms::new(width, height, frame.water_level, frame.time),
        );
        self.particles.write_uniforms(
            &self.queue,
            &ParticleUniforms::new(width, height, frame.point_size),
        );

        let uploaded = {
            let mut target = self.particles.upload_target(&self.queue);
            bridge.upload(frame.pool, &mut target)
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut issued = 0;
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sponge.draw(&mut render_pass);

            if let Some(uploaded) = &uploaded {
                let mut points = self.particles.begin(&mut render_pass);
                issued = bridge.submit(frame.pool, uploaded, &mut points);
            }

            // Water last, so it covers droplets that fall below the surface
            self.water.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(issued)
    }
}

/// Uniform buffer binding layout entry.
fn uniform_layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Depth state for 2D layers drawn over the sponge: never tested, never written.
fn overlay_depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::Always,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
