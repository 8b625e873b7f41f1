use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::monitor::VideoModeHandle;
use winit::window::{Fullscreen, Window};

use crate::coords::Viewport;
use crate::device::{
    AdapterInfo, BackendError, BlendDesc, DepthClear, DepthStencilDesc, DisplayMode, FillMode,
    GraphicsBackend, InputLayout, PrimitiveTopology, RasterizerDesc, RefreshRate, SwapChainDesc,
};

use super::conversions;
use super::surface::{self, SurfaceErrorAction};

/// Adapter chosen for a window, before the device exists.
pub struct WgpuAdapter {
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    video_modes: Vec<VideoModeHandle>,
}

/// Pipeline state last bound through the device layer.
///
/// wgpu bakes state into pipelines, so binds land here and pipeline builders
/// read the key back via [`WgpuBackend::pipeline_state`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStateKey {
    pub depth_stencil: Option<wgpu::DepthStencilState>,
    pub stencil_reference: u32,
    pub primitive: wgpu::PrimitiveState,
    pub color_target: Option<wgpu::ColorTargetState>,
    pub blend_constant: wgpu::Color,
    pub sample_mask: u32,
    pub input_layout: InputLayout,
    pub viewport: Viewport,
    pub targets_bound: bool,
}

impl Default for PipelineStateKey {
    fn default() -> Self {
        Self {
            depth_stencil: None,
            stencil_reference: 0,
            primitive: wgpu::PrimitiveState::default(),
            color_target: None,
            blend_constant: wgpu::Color::TRANSPARENT,
            sample_mask: !0,
            input_layout: InputLayout::default(),
            viewport: Viewport::default(),
            targets_bound: false,
        }
    }
}

/// wgpu device, queue and surface acting as the native swap chain.
///
/// The swap chain's buffer 0 is an owned texture in the surface format;
/// present copies it into the acquired surface texture. This keeps the
/// back buffer (and every view of it) stable between presents, as the
/// device layer expects.
pub struct WgpuBackend {
    /// Pending clears and copies, submitted on present.
    encoder: Option<wgpu::CommandEncoder>,

    back_buffer: wgpu::Texture,

    pipeline: PipelineStateKey,

    /// Video mode used for exclusive fullscreen at the current resolution.
    exclusive_mode: Option<VideoModeHandle>,
    video_modes: Vec<VideoModeHandle>,

    config: wgpu::SurfaceConfiguration,
    queue: wgpu::Queue,
    device: wgpu::Device,
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    instance: wgpu::Instance,

    window: Arc<Window>,
}

impl WgpuBackend {
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    /// Format of the back buffer and the surface.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn pipeline_state(&self) -> &PipelineStateKey {
        &self.pipeline
    }

    /// Encoder that present will submit; draw passes record into it.
    pub fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        let device = &self.device;
        self.encoder.get_or_insert_with(|| {
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember frame encoder"),
            })
        })
    }

    fn check_extent(&self, width: u32, height: u32) -> Result<(), BackendError> {
        check_extent(&self.device.limits(), width, height)
    }

    fn create_back_buffer(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ember back buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
    }

    fn find_video_mode(
        modes: &[VideoModeHandle],
        width: u32,
        height: u32,
    ) -> Option<VideoModeHandle> {
        modes
            .iter()
            .find(|m| m.size() == PhysicalSize::new(width, height))
            .cloned()
    }

    fn submit_pending(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }
}

/// Rejects texture sizes the device cannot allocate.
///
/// wgpu reports an oversized `create_texture` through the uncaptured error
/// handler, which panics by default, so sizes are checked up front.
fn check_extent(limits: &wgpu::Limits, width: u32, height: u32) -> Result<(), BackendError> {
    let max = limits.max_texture_dimension_2d;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(BackendError::new(format!(
            "{width}x{height} is outside the supported texture size (1..={max})"
        )));
    }
    Ok(())
}

impl GraphicsBackend for WgpuBackend {
    type Window = Arc<Window>;
    type Adapter = WgpuAdapter;
    type Texture = wgpu::Texture;
    type RenderTargetView = wgpu::TextureView;
    type DepthStencilView = wgpu::TextureView;
    type DepthStencilState = wgpu::DepthStencilState;
    type RasterizerState = wgpu::PrimitiveState;
    type BlendState = wgpu::ColorTargetState;

    fn enumerate_adapter(window: &Arc<Window>) -> Result<WgpuAdapter, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // The Arc keeps the window alive for as long as the surface.
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| BackendError::new(format!("failed to create surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| BackendError::new(format!("no suitable GPU adapter: {e}")))?;

        let video_modes = window
            .current_monitor()
            .or_else(|| window.primary_monitor())
            .map(|monitor| monitor.video_modes().collect())
            .unwrap_or_default();

        Ok(WgpuAdapter {
            instance,
            surface,
            adapter,
            video_modes,
        })
    }

    fn adapter_info(adapter: &WgpuAdapter) -> AdapterInfo {
        let info = adapter.adapter.get_info();
        AdapterInfo {
            description: format!("{} ({:?}, {:?})", info.name, info.backend, info.device_type),
            // wgpu does not expose dedicated memory.
            dedicated_video_memory_mb: None,
        }
    }

    fn display_modes(adapter: &WgpuAdapter) -> Result<Vec<DisplayMode>, BackendError> {
        Ok(adapter
            .video_modes
            .iter()
            .map(|m| {
                let size = m.size();
                DisplayMode {
                    width: size.width,
                    height: size.height,
                    refresh_rate: RefreshRate::new(m.refresh_rate_millihertz(), 1000),
                }
            })
            .collect())
    }

    fn create_device_and_swap_chain(
        adapter: WgpuAdapter,
        window: &Arc<Window>,
        desc: &SwapChainDesc,
    ) -> Result<Self, BackendError> {
        let WgpuAdapter {
            instance,
            surface,
            adapter,
            video_modes,
        } = adapter;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("ember device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| BackendError::new(format!("failed to create device/queue: {e}")))?;

        check_extent(&device.limits(), desc.width, desc.height)?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps)
            .ok_or_else(|| BackendError::new("no supported surface formats"))?;

        // Present copies the back buffer into the surface texture.
        if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(BackendError::new("surface cannot be a copy destination"));
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format,
            width: desc.width,
            height: desc.height,
            present_mode: surface::present_mode(desc.vsync_interval),
            alpha_mode: surface::choose_alpha_mode(&caps),
            view_formats: vec![],
            desired_maximum_frame_latency: desc.buffer_count.max(1) + 1,
        };

        let mut backend = Self {
            encoder: None,
            back_buffer: Self::create_back_buffer(&device, format, config.width, config.height),
            pipeline: PipelineStateKey::default(),
            exclusive_mode: Self::find_video_mode(&video_modes, desc.width, desc.height),
            video_modes,
            config,
            queue,
            device,
            surface,
            adapter,
            instance,
            window: window.clone(),
        };

        backend.surface.configure(&backend.device, &backend.config);

        if desc.fullscreen {
            backend.set_fullscreen(true)?;
        }

        log::debug!(
            "swap chain {}x{} {:?} {:?}",
            backend.config.width,
            backend.config.height,
            backend.config.format,
            backend.config.present_mode
        );

        Ok(backend)
    }

    fn back_buffer(&mut self) -> Result<wgpu::Texture, BackendError> {
        Ok(self.back_buffer.clone())
    }

    fn create_render_target_view(
        &mut self,
        texture: &wgpu::Texture,
    ) -> Result<wgpu::TextureView, BackendError> {
        Ok(texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("ember render target view"),
            ..Default::default()
        }))
    }

    fn create_depth_buffer(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<wgpu::Texture, BackendError> {
        self.check_extent(width, height)?;
        Ok(self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ember depth buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: conversions::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        }))
    }

    fn create_depth_stencil_view(
        &mut self,
        texture: &wgpu::Texture,
    ) -> Result<wgpu::TextureView, BackendError> {
        if texture.format() != conversions::DEPTH_FORMAT {
            return Err(BackendError::new(format!(
                "{:?} is not a depth-stencil format",
                texture.format()
            )));
        }
        Ok(texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("ember depth stencil view"),
            ..Default::default()
        }))
    }

    fn create_depth_stencil_state(
        &mut self,
        desc: &DepthStencilDesc,
    ) -> Result<wgpu::DepthStencilState, BackendError> {
        Ok(conversions::depth_stencil(desc))
    }

    fn create_rasterizer_state(
        &mut self,
        desc: &RasterizerDesc,
    ) -> Result<wgpu::PrimitiveState, BackendError> {
        if desc.fill_mode != FillMode::Solid
            && !self.device.features().contains(wgpu::Features::POLYGON_MODE_LINE)
        {
            return Err(BackendError::new("wireframe fill requires POLYGON_MODE_LINE"));
        }
        Ok(conversions::rasterizer(desc))
    }

    fn create_blend_state(
        &mut self,
        desc: &BlendDesc,
    ) -> Result<wgpu::ColorTargetState, BackendError> {
        Ok(conversions::color_target(desc, self.config.format))
    }

    fn bind_render_targets(&mut self, _rtv: &wgpu::TextureView, _dsv: &wgpu::TextureView) {
        self.pipeline.targets_bound = true;
    }

    fn bind_depth_stencil_state(&mut self, state: &wgpu::DepthStencilState, stencil_ref: u32) {
        self.pipeline.depth_stencil = Some(state.clone());
        self.pipeline.stencil_reference = stencil_ref;
    }

    fn bind_rasterizer_state(&mut self, state: &wgpu::PrimitiveState) {
        // Topology is bound separately; keep it.
        let topology = self.pipeline.primitive.topology;
        self.pipeline.primitive = wgpu::PrimitiveState { topology, ..*state };
    }

    fn bind_blend_state(
        &mut self,
        state: &wgpu::ColorTargetState,
        blend_factor: [f32; 4],
        sample_mask: u32,
    ) {
        let [r, g, b, a] = blend_factor.map(f64::from);
        self.pipeline.color_target = Some(state.clone());
        self.pipeline.blend_constant = wgpu::Color { r, g, b, a };
        self.pipeline.sample_mask = sample_mask;
    }

    fn bind_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.pipeline.primitive.topology = conversions::topology(topology);
    }

    fn bind_input_layout(&mut self, layout: InputLayout) {
        self.pipeline.input_layout = layout;
    }

    fn bind_viewport(&mut self, viewport: &Viewport) {
        self.pipeline.viewport = *viewport;
    }

    fn clear_render_target(&mut self, rtv: &wgpu::TextureView, color: [f32; 4]) {
        let [r, g, b, a] = color.map(f64::from);
        let _pass = self.encoder().begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ember clear color"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: rtv,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn clear_depth_stencil(&mut self, dsv: &wgpu::TextureView, clear: DepthClear) {
        let _pass = self.encoder().begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ember clear depth"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: dsv,
                depth_ops: clear.depth.map(|depth| wgpu::Operations {
                    load: wgpu::LoadOp::Clear(depth),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: clear.stencil.map(|stencil| wgpu::Operations {
                    load: wgpu::LoadOp::Clear(u32::from(stencil)),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn present(&mut self, sync_interval: u32) -> Result<(), BackendError> {
        let present_mode = surface::present_mode(sync_interval);
        if self.config.present_mode != present_mode {
            self.config.present_mode = present_mode;
            self.surface.configure(&self.device, &self.config);
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                // Work recorded against the back buffer stays valid.
                self.submit_pending();
                let action =
                    surface::map_surface_error(&self.surface, &self.device, &self.config, &err);
                return match action {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        log::debug!("skipping present: {err}");
                        Ok(())
                    }
                    SurfaceErrorAction::Fatal => {
                        Err(BackendError::new(format!("failed to acquire surface texture: {err}")))
                    }
                };
            }
        };

        let width = self.config.width.min(self.back_buffer.width());
        let height = self.config.height.min(self.back_buffer.height());

        let back_buffer = self.back_buffer.clone();
        self.encoder().copy_texture_to_texture(
            back_buffer.as_image_copy(),
            frame.texture.as_image_copy(),
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.submit_pending();

        self.window.pre_present_notify();
        frame.present();
        Ok(())
    }

    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.check_extent(width, height)?;

        // Pending passes may reference the old buffer.
        self.submit_pending();

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.back_buffer =
            Self::create_back_buffer(&self.device, self.config.format, width, height);
        self.exclusive_mode = Self::find_video_mode(&self.video_modes, width, height);
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError> {
        let mode = match (fullscreen, &self.exclusive_mode) {
            (false, _) => None,
            (true, Some(mode)) if !cfg!(target_os = "macos") => {
                Some(Fullscreen::Exclusive(mode.clone()))
            }
            (true, _) => Some(Fullscreen::Borderless(None)),
        };
        self.window.set_fullscreen(mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_must_fit_the_device_limits() {
        let limits = wgpu::Limits::default();
        let max = limits.max_texture_dimension_2d;

        assert!(check_extent(&limits, 1280, 720).is_ok());
        assert!(check_extent(&limits, max, max).is_ok());

        assert!(check_extent(&limits, max + 1, 720).is_err());
        assert!(check_extent(&limits, 1280, max + 1).is_err());
        assert!(check_extent(&limits, 0, 720).is_err());
        assert!(check_extent(&limits, 1280, 0).is_err());
    }
}
