//! GPU State management - WebGPU device, queue and one surface per canvas

use std::cell::{Cell, RefCell};

use tracing::{info, warn};
use web_sys::HtmlCanvasElement;

use super::scene::Scene;
use super::shapes::Vertex;
use crate::error::RendererError;

/// Initial vertex capacity per surface; grows on demand
const INITIAL_VERTEX_CAPACITY: u64 = 8192;

const VERTEX_ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2,
    1 => Float32x4
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBS,
    }
}

/// The three canvases the engine draws into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasKind {
    User = 0,
    Ai = 1,
    Chart = 2,
}

/// Per-canvas surface, pipeline and vertex buffer
struct CanvasTarget {
    canvas: HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    config: RefCell<wgpu::SurfaceConfiguration>,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: RefCell<wgpu::Buffer>,
    capacity: Cell<u64>,
}

/// Holds all WebGPU state for rendering
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    targets: Vec<CanvasTarget>,
}

impl Renderer {
    /// Initialize WebGPU: adapter, device, then a surface + pipeline per canvas
    pub async fn new(
        user: HtmlCanvasElement,
        ai: HtmlCanvasElement,
        chart: HtmlCanvasElement,
    ) -> Result<Self, RendererError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let canvases = [user, ai, chart];
        let mut surfaces = Vec::with_capacity(canvases.len());
        for canvas in &canvases {
            let surface = instance
                .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
                .map_err(|e| RendererError::SurfaceCreationFailed(format!("{e:?}")))?;
            surfaces.push(surface);
        }

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: surfaces.first(),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("UnTherapy Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| RendererError::DeviceCreationFailed(format!("{e:?}")))?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let targets = canvases
            .into_iter()
            .zip(surfaces)
            .map(|(canvas, surface)| -> Result<CanvasTarget, RendererError> {
                let caps = surface.get_capabilities(&adapter);
                // Palette colours are already sRGB-encoded
                let format = caps
                    .formats
                    .iter()
                    .find(|f| !f.is_srgb())
                    .copied()
                    .or_else(|| caps.formats.first().copied())
                    .ok_or_else(|| {
                        RendererError::SurfaceCreationFailed("no supported format".into())
                    })?;
                let alpha_mode = caps
                    .alpha_modes
                    .first()
                    .copied()
                    .unwrap_or(wgpu::CompositeAlphaMode::Auto);

                let config = wgpu::SurfaceConfiguration {
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    format,
                    width: canvas.width().max(1),
                    height: canvas.height().max(1),
                    present_mode: wgpu::PresentMode::AutoVsync,
                    alpha_mode,
                    view_formats: vec![],
                    desired_maximum_frame_latency: 2,
                };
                surface.configure(&device, &config);

                let pipeline = create_pipeline(&device, &pipeline_layout, &shader, format);
                let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

                Ok(CanvasTarget {
                    canvas,
                    surface,
                    config: RefCell::new(config),
                    pipeline,
                    vertex_buffer: RefCell::new(vertex_buffer),
                    capacity: Cell::new(INITIAL_VERTEX_CAPACITY),
                })
            })
            .collect::<Result<Vec<_>, RendererError>>()?;

        info!("✅ WebGPU initialized ({} surfaces)", targets.len());
        Ok(Self {
            device,
            queue,
            targets,
        })
    }

    /// Draw a full scene into one canvas, replacing what was there
    pub fn render(&self, kind: CanvasKind, scene: &Scene) {
        let Some(target) = self.targets.get(kind as usize) else {
            return;
        };
        self.resize(target, scene.width, scene.height);

        let vertices = scene.vertices();
        self.ensure_capacity(target, vertices.len() as u64);

        let output = match target.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                warn!("⚠️ Skipping {kind:?} frame: {e:?}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        let vertex_buffer = target.vertex_buffer.borrow();
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        let [r, g, b, a] = scene.background;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !vertices.is_empty() {
                pass.set_pipeline(&target.pipeline);
                pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Match the canvas backing store to the scene size
    fn resize(&self, target: &CanvasTarget, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        let mut config = target.config.borrow_mut();
        if config.width == width && config.height == height {
            return;
        }
        target.canvas.set_width(width);
        target.canvas.set_height(height);
        config.width = width;
        config.height = height;
        target.surface.configure(&self.device, &config);
    }

    fn ensure_capacity(&self, target: &CanvasTarget, needed: u64) {
        let mut capacity = target.capacity.get();
        if needed <= capacity {
            return;
        }
        while capacity < needed {
            capacity *= 2;
        }
        *target.vertex_buffer.borrow_mut() = create_vertex_buffer(&self.device, capacity);
        target.capacity.set(capacity);
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Vertex Buffer"),
        size: capacity * std::mem::size_of::<Vertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
