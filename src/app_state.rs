use crate::board::{BoardState, Instant};
use crate::config::BoardConfig;
use crate::export;
use crate::lineup::{LineupExtractor, LineupProcessor, TesseractCli};
use crate::state::{
    GeometryBuffers, GpuContext, InputState, ScreenBuffers, ScreenUniforms, StatusMessage,
};
use crate::text_renderer::LabelFont;
use crate::ui::{UiRenderer, TOOLBAR_HEIGHT};
use crate::vertex::Vertex;
use anyhow::Context;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

pub struct State {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    pub gpu: GpuContext,
    pub screen: ScreenBuffers,
    pub geometry: GeometryBuffers,
    pub input: InputState,

    pub board: BoardState,
    pub config: BoardConfig,
    pub font: Option<LabelFont>,
    pub ui_renderer: UiRenderer,
    pub lineup: LineupProcessor,
    pub status: Option<StatusMessage>,
}

/// Board area below the toolbar for a window of `size`.
pub fn board_size(size: PhysicalSize<u32>) -> [f32; 2] {
    [
        size.width as f32,
        (size.height as f32 - TOOLBAR_HEIGHT).max(0.0),
    ]
}

impl State {
    pub async fn new(window: Arc<Window>, config: BoardConfig) -> anyhow::Result<State> {
        let mut size = window.inner_size();

        #[cfg(target_arch = "wasm32")]
        {
            if size.width == 0 || size.height == 0 {
                size = winit::dpi::PhysicalSize::new(1920, 1080);
            }
        }
        log::info!("creating board surface {}x{}", size.width, size.height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open graphics device")?;

        // Colours are authored in sRGB already and blended the same way the
        // PNG export blends them, so a linear-encoding surface is preferred.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config_surface = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config_surface);

        let screen_bind_group_layout =
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
                label: Some("screen_bind_group_layout"),
            });

        let screen_uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Screen Uniform Buffer"),
            contents: bytemuck::cast_slice(&[ScreenUniforms::new(size.width, size.height)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &screen_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_uniform.as_entire_binding(),
            }],
            label: Some("screen_bind_group"),
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Board Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../data/shaders/board_shader.wgsl").into(),
            ),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Board Pipeline Layout"),
                bind_group_layouts: &[&screen_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Board Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config_surface.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let gpu = GpuContext {
            surface,
            device,
            queue,
            config: config_surface,
            render_pipeline,
        };

        let screen = ScreenBuffers {
            uniform: screen_uniform,
            bind_group: screen_bind_group,
        };

        let geometry = GeometryBuffers {
            vertex: None,
            index: None,
            count: 0,
        };

        let input = InputState {
            mouse_pos: [0.0; 2],
            modifiers: winit::keyboard::ModifiersState::empty(),
            board_pressed: false,
        };

        let mut board = BoardState::new(
            board_size(size),
            config.team_colors(),
            config.font_settings(),
        );
        board.home_formation = config.home_formation;
        board.away_formation = config.away_formation;

        let font = LabelFont::locate(config.font_path.as_deref());

        let extractor = LineupExtractor::new(config.lineup.clone())?;
        let lineup = LineupProcessor::new(
            Arc::new(TesseractCli::new(&config.ocr)),
            extractor,
            config.ocr.language.clone(),
        );

        Ok(Self {
            window,
            size,
            gpu,
            screen,
            geometry,
            input,
            board,
            config,
            font,
            ui_renderer: UiRenderer::new(),
            lineup,
            status: None,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    /// Renders the board to PNG and hands it to the platform. Failures are
    /// logged and reported in the toolbar.
    pub fn export_png(&mut self) {
        let result = export::render_png(&self.board, self.font.as_ref()).and_then(|bytes| {
            bytes
                .map(|bytes| export::deliver(&bytes, self.config.export_dir.as_deref()))
                .transpose()
        });
        match result {
            Ok(Some(target)) => {
                log::info!("exported board to {target}");
                self.set_status(format!("Saved {target}"));
            }
            Ok(None) => log::debug!("nothing to export, board has no area"),
            Err(e) => {
                log::warn!("export failed: {e:#}");
                self.set_status("Export failed");
            }
        }
    }
}
