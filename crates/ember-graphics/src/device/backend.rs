use crate::coords::Viewport;

use super::display_mode::{DisplayMode, RefreshRate};
use super::error::BackendError;
use super::state::{
    BlendDesc, DepthClear, DepthStencilDesc, InputLayout, PrimitiveTopology, RasterizerDesc,
};

/// Adapter description gathered before the device exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdapterInfo {
    /// Human-readable adapter (video card) name.
    pub description: String,

    /// Dedicated video memory in megabytes, when the native API reports it.
    pub dedicated_video_memory_mb: Option<u64>,
}

/// Parameters for device + swap chain creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SwapChainDesc {
    pub width: u32,
    pub height: u32,
    pub buffer_count: u32,
    pub refresh_rate: RefreshRate,
    pub fullscreen: bool,
    pub vsync_interval: u32,
}

/// Native graphics API as seen by [`Graphics`](super::Graphics).
///
/// The implementor is the device, its immediate context and its swap chain.
/// Every handle type releases its native object on drop, so ownership alone
/// decides release order.
///
/// Creation calls are fallible; bind and clear calls are not, matching native
/// APIs that validate at bind time in debug layers only.
pub trait GraphicsBackend: Sized {
    /// Native window the swap chain presents into.
    type Window: ?Sized;

    /// Adapter selected before device creation.
    type Adapter;

    type Texture;
    type RenderTargetView;
    type DepthStencilView;
    type DepthStencilState;
    type RasterizerState;
    type BlendState;

    /// Picks the primary adapter able to present into `window`.
    fn enumerate_adapter(window: &Self::Window) -> Result<Self::Adapter, BackendError>;

    fn adapter_info(adapter: &Self::Adapter) -> AdapterInfo;

    /// Display modes of the adapter's primary output.
    fn display_modes(adapter: &Self::Adapter) -> Result<Vec<DisplayMode>, BackendError>;

    /// Creates the device, immediate context and swap chain in one step.
    fn create_device_and_swap_chain(
        adapter: Self::Adapter,
        window: &Self::Window,
        desc: &SwapChainDesc,
    ) -> Result<Self, BackendError>;

    /// Buffer 0 of the swap chain.
    fn back_buffer(&mut self) -> Result<Self::Texture, BackendError>;

    fn create_render_target_view(
        &mut self,
        texture: &Self::Texture,
    ) -> Result<Self::RenderTargetView, BackendError>;

    /// 24-bit depth / 8-bit stencil texture bindable as a depth-stencil target.
    fn create_depth_buffer(&mut self, width: u32, height: u32)
    -> Result<Self::Texture, BackendError>;

    fn create_depth_stencil_view(
        &mut self,
        texture: &Self::Texture,
    ) -> Result<Self::DepthStencilView, BackendError>;

    fn create_depth_stencil_state(
        &mut self,
        desc: &DepthStencilDesc,
    ) -> Result<Self::DepthStencilState, BackendError>;

    fn create_rasterizer_state(
        &mut self,
        desc: &RasterizerDesc,
    ) -> Result<Self::RasterizerState, BackendError>;

    fn create_blend_state(&mut self, desc: &BlendDesc) -> Result<Self::BlendState, BackendError>;

    fn bind_render_targets(&mut self, rtv: &Self::RenderTargetView, dsv: &Self::DepthStencilView);

    fn bind_depth_stencil_state(&mut self, state: &Self::DepthStencilState, stencil_ref: u32);

    fn bind_rasterizer_state(&mut self, state: &Self::RasterizerState);

    fn bind_blend_state(
        &mut self,
        state: &Self::BlendState,
        blend_factor: [f32; 4],
        sample_mask: u32,
    );

    fn bind_primitive_topology(&mut self, topology: PrimitiveTopology);

    fn bind_input_layout(&mut self, layout: InputLayout);

    fn bind_viewport(&mut self, viewport: &Viewport);

    fn clear_render_target(&mut self, rtv: &Self::RenderTargetView, color: [f32; 4]);

    fn clear_depth_stencil(&mut self, dsv: &Self::DepthStencilView, clear: DepthClear);

    fn present(&mut self, sync_interval: u32) -> Result<(), BackendError>;

    /// Resizes every swap-chain buffer.
    ///
    /// Callers must have released all views of the previous back buffer.
    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), BackendError>;

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError>;
}
