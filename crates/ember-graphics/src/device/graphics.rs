use crate::coords::{ColorRgba, Viewport};
use crate::settings::{GraphicsSettings, Resolution};

use super::backend::{AdapterInfo, GraphicsBackend, SwapChainDesc};
use super::cache::StateCache;
use super::display_mode::{select_refresh_rate, RefreshRate};
use super::error::{CreationStep, GraphicsError, StepContext};
use super::objects::StateObjects;
use super::state::{
    CullMode, DepthClear, InputLayout, PrimitiveTopology, BLEND_FACTOR, SAMPLE_MASK, STENCIL_REF,
};
use super::targets::FrameTargets;

/// Owns the graphics device and all render state built on it.
///
/// Responsibilities:
/// - creates the device, immediate context and swap chain in dependency order
/// - keeps the frame targets in step with the swap-chain size
/// - binds pre-built state objects, skipping requests that match the cache
///
/// Field order is release order: frame targets, then state objects, then the
/// backend (context, device, swap chain).
pub struct Graphics<B: GraphicsBackend> {
    /// `None` only after a failed resize.
    targets: Option<FrameTargets<B>>,

    states: StateObjects<B>,

    cache: StateCache,

    viewport: Viewport,

    settings: GraphicsSettings,

    adapter: AdapterInfo,

    refresh_rate: RefreshRate,

    backend: B,
}

impl<B: GraphicsBackend> Graphics<B> {
    /// Creates the device and every object the frame loop needs.
    ///
    /// Any failure releases what was created so far and is returned; nothing
    /// is left half-initialized.
    pub fn initialize(
        window: &B::Window,
        settings: GraphicsSettings,
    ) -> Result<Self, GraphicsError> {
        let Resolution { width, height } = settings.resolution;

        let adapter = B::enumerate_adapter(window).step(CreationStep::Adapter)?;

        let adapter_info = B::adapter_info(&adapter);
        match adapter_info.dedicated_video_memory_mb {
            Some(mb) => log::info!("graphics adapter: {} ({mb} MB)", adapter_info.description),
            None => log::info!("graphics adapter: {}", adapter_info.description),
        }

        let modes = B::display_modes(&adapter).step(CreationStep::DisplayModes)?;
        let refresh_rate = select_refresh_rate(&modes, width, height);
        let count = modes.len();
        match refresh_rate.hz().filter(|hz| *hz > 0.0) {
            Some(hz) => log::debug!("{count} display modes, {width}x{height} at {hz:.2} Hz"),
            None => log::debug!("{count} display modes, none at {width}x{height}"),
        }

        let desc = SwapChainDesc {
            width,
            height,
            buffer_count: 1,
            refresh_rate,
            fullscreen: settings.fullscreen,
            vsync_interval: settings.vsync_interval,
        };

        let mut backend = B::create_device_and_swap_chain(adapter, window, &desc)
            .step(CreationStep::DeviceAndSwapChain)?;

        let targets = FrameTargets::create(&mut backend, width, height)?;
        let states = StateObjects::create(&mut backend)?;

        let mut graphics = Self {
            targets: Some(targets),
            states,
            cache: StateCache::default(),
            viewport: Viewport::from_size(width, height),
            settings,
            adapter: adapter_info,
            refresh_rate,
            backend,
        };

        graphics.bind_defaults();

        Ok(graphics)
    }

    /// Binds the targets and the state the cache starts out claiming.
    fn bind_defaults(&mut self) {
        if let Some(targets) = &self.targets {
            targets.bind(&mut self.backend);
        }

        let cache = self.cache;
        self.backend
            .bind_depth_stencil_state(self.states.depth.get(cache.z_buffer.get()), STENCIL_REF);
        self.backend
            .bind_rasterizer_state(self.states.raster.get(cache.cull_mode.get()));
        self.backend.bind_blend_state(
            self.states.blend.get(cache.alpha_blending.get()),
            BLEND_FACTOR,
            SAMPLE_MASK,
        );
        self.backend.bind_primitive_topology(cache.topology.get());
        self.backend.bind_input_layout(cache.input_layout.get());
        self.backend.bind_viewport(&self.viewport);
    }

    //= RESOLUTION ==========================================================

    /// Resizes the swap chain and rebuilds everything sized to it.
    ///
    /// A zero-sized request (minimized window) is deferred: nothing changes
    /// until a real size arrives.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<(), GraphicsError> {
        let resolution = Resolution::new(width, height);
        if resolution.is_empty() {
            log::debug!("deferring resize to {width}x{height}");
            return Ok(());
        }

        // Views of the old back buffer must be gone before the swap chain
        // can reallocate it.
        self.targets = None;

        self.backend
            .resize_buffers(width, height)
            .step(CreationStep::ResizeBuffers)?;

        // The swap chain is now this size whether or not the targets follow.
        self.settings.resolution = resolution;
        self.viewport = Viewport::from_size(width, height);

        let targets = FrameTargets::create(&mut self.backend, width, height)?;
        targets.bind(&mut self.backend);
        self.targets = Some(targets);

        self.backend.bind_viewport(&self.viewport);

        log::debug!("swap chain resized to {width}x{height}");
        Ok(())
    }

    /// Stores and binds a full-target viewport of `width` x `height`.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::from_size(width, height);
        self.backend.bind_viewport(&self.viewport);
    }

    /// Rebinds the stored viewport after a pass changed it.
    pub fn reset_viewport(&mut self) {
        self.backend.bind_viewport(&self.viewport);
    }

    /// Rebinds the back buffer and depth-stencil view as the output targets.
    pub fn set_back_buffer_as_render_target(&mut self) -> Result<(), GraphicsError> {
        let targets = self.targets.as_ref().ok_or(GraphicsError::MissingFrameTargets)?;
        targets.bind(&mut self.backend);
        Ok(())
    }

    /// Switches between fullscreen and windowed presentation.
    pub fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), GraphicsError> {
        self.backend
            .set_fullscreen(fullscreen)
            .step(CreationStep::Fullscreen)?;
        self.settings.fullscreen = fullscreen;
        Ok(())
    }

    //= STATE TOGGLES =======================================================

    pub fn enable_z_buffer(&mut self, enable: bool) {
        if !self.cache.z_buffer.replace(enable) {
            return;
        }
        log::trace!("z-buffer {}", if enable { "on" } else { "off" });
        self.backend
            .bind_depth_stencil_state(self.states.depth.get(enable), STENCIL_REF);
    }

    pub fn enable_alpha_blending(&mut self, enable: bool) {
        if !self.cache.alpha_blending.replace(enable) {
            return;
        }
        log::trace!("alpha blending {}", if enable { "on" } else { "off" });
        self.backend
            .bind_blend_state(self.states.blend.get(enable), BLEND_FACTOR, SAMPLE_MASK);
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        if !self.cache.cull_mode.replace(mode) {
            return;
        }
        log::trace!("cull mode {mode:?}");
        self.backend.bind_rasterizer_state(self.states.raster.get(mode));
    }

    pub fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        if !self.cache.topology.replace(topology) {
            return;
        }
        log::trace!("primitive topology {topology:?}");
        self.backend.bind_primitive_topology(topology);
    }

    pub fn set_input_layout(&mut self, layout: InputLayout) {
        if !self.cache.input_layout.replace(layout) {
            return;
        }
        log::trace!("input layout {layout:?}");
        self.backend.bind_input_layout(layout);
    }

    //= FRAME ===============================================================

    /// Clears the back buffer to `color` and the depth buffer to the far plane.
    ///
    /// Never cached: every call writes both targets.
    pub fn clear(&mut self, color: ColorRgba) -> Result<(), GraphicsError> {
        let targets = self.targets.as_ref().ok_or(GraphicsError::MissingFrameTargets)?;
        self.backend
            .clear_render_target(&targets.render_target, color.to_array());
        self.backend
            .clear_depth_stencil(&targets.depth_stencil, DepthClear::FRAME);
        Ok(())
    }

    /// Flips the swap chain using the configured vsync interval.
    pub fn present(&mut self) -> Result<(), GraphicsError> {
        self.backend
            .present(self.settings.vsync_interval)
            .step(CreationStep::Present)
    }

    //= ACCESSORS ===========================================================

    pub fn z_buffer_enabled(&self) -> bool {
        self.cache.z_buffer.get()
    }

    pub fn alpha_blending_enabled(&self) -> bool {
        self.cache.alpha_blending.get()
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cache.cull_mode.get()
    }

    pub fn primitive_topology(&self) -> PrimitiveTopology {
        self.cache.topology.get()
    }

    pub fn input_layout(&self) -> InputLayout {
        self.cache.input_layout.get()
    }

    pub fn resolution(&self) -> Resolution {
        self.settings.resolution
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Refresh rate chosen from the output's display modes at startup.
    pub fn refresh_rate(&self) -> RefreshRate {
        self.refresh_rate
    }

    pub fn adapter_info(&self) -> &AdapterInfo {
        &self.adapter
    }

    pub fn settings(&self) -> &GraphicsSettings {
        &self.settings
    }

    /// Frame targets, absent only after a failed resize.
    pub fn frame_targets(&self) -> Option<&FrameTargets<B>> {
        self.targets.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: GraphicsBackend> Drop for Graphics<B> {
    fn drop(&mut self) {
        // Releasing a fullscreen swap chain is an error on some platforms, and
        // the user may have switched modes behind our back.
        if let Err(e) = self.backend.set_fullscreen(false) {
            log::error!("failed to {}: {e}", CreationStep::Fullscreen);
        }

        // Remaining fields drop in declaration order.
        self.targets = None;
    }
}
