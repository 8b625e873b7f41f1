//! Recording backend for unit tests.
//!
//! Every call lands in a shared journal and every handle is tracked as a live
//! resource until dropped, so tests can assert bind counts and release order
//! without a GPU.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use crate::coords::Viewport;

use super::backend::{AdapterInfo, GraphicsBackend, SwapChainDesc};
use super::display_mode::DisplayMode;
use super::error::{BackendError, CreationStep};
use super::state::{
    BlendDesc, CullMode, DepthClear, DepthStencilDesc, InputLayout, PrimitiveTopology,
    RasterizerDesc,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
    Device,
    SwapChain,
    BackBuffer,
    BackBufferRef,
    RenderTargetView,
    DepthBuffer,
    DepthStencilView,
    DepthStencilState,
    RasterizerState,
    BlendState,
}

impl Kind {
    pub fn is_dependent(self) -> bool {
        !matches!(self, Kind::Device | Kind::SwapChain | Kind::BackBuffer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create { kind: Kind, id: u32 },
    Release { kind: Kind, id: u32 },
    BindRenderTargets { rtv: u32, dsv: u32 },
    BindDepthStencil { id: u32, stencil_ref: u32 },
    BindRasterizer { id: u32 },
    BindBlend { id: u32, blend_factor: [f32; 4], sample_mask: u32 },
    BindTopology(PrimitiveTopology),
    BindInputLayout(InputLayout),
    BindViewport(Viewport),
    ClearRenderTarget { rtv: u32, color: [f32; 4] },
    ClearDepthStencil { dsv: u32, clear: DepthClear },
    Present { sync_interval: u32 },
    ResizeBuffers { width: u32, height: u32 },
    SetFullscreen(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: Kind,
    pub width: u32,
    pub height: u32,
    /// Resource this one views or references.
    pub parent: Option<u32>,
    pub cull: Option<CullMode>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Default)]
pub struct World {
    pub calls: Vec<Call>,
    pub live: BTreeMap<u32, Resource>,
    pub fail: HashSet<CreationStep>,
    pub modes: Vec<DisplayMode>,
    pub swap_chain: Option<SwapChainDesc>,
    pub back_buffer: Option<u32>,
    next_id: u32,
}

impl World {
    fn insert(&mut self, resource: Resource) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.calls.push(Call::Create { kind: resource.kind, id });
        self.live.insert(id, resource);
        id
    }

    fn release(&mut self, id: u32) {
        if let Some(res) = self.live.remove(&id) {
            self.calls.push(Call::Release { kind: res.kind, id });
        }
    }

    fn check(&self, step: CreationStep) -> Result<(), BackendError> {
        if self.fail.contains(&step) {
            Err(BackendError::new(format!("injected failure: {step}")))
        } else {
            Ok(())
        }
    }
}

/// Test-side view of the shared state; doubles as the "native window".
#[derive(Clone, Default)]
pub struct Recorder(pub Rc<RefCell<World>>);

impl Recorder {
    pub fn with_modes(modes: Vec<DisplayMode>) -> Self {
        let recorder = Self::default();
        recorder.0.borrow_mut().modes = modes;
        recorder
    }

    pub fn fail_on(&self, step: CreationStep) {
        self.0.borrow_mut().fail.insert(step);
    }

    pub fn clear_failures(&self) {
        self.0.borrow_mut().fail.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.0.borrow_mut().calls)
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn resource(&self, id: u32) -> Option<Resource> {
        self.0.borrow().live.get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.0.borrow().live.len()
    }

    pub fn back_buffer(&self) -> Option<u32> {
        self.0.borrow().back_buffer
    }

    pub fn swap_chain(&self) -> Option<SwapChainDesc> {
        self.0.borrow().swap_chain
    }
}

/// Tracked native object; released on drop.
#[derive(Debug)]
pub struct Handle {
    pub id: u32,
    world: Rc<RefCell<World>>,
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.world.borrow_mut().release(self.id);
    }
}

pub struct RecordingAdapter {
    info: AdapterInfo,
    world: Rc<RefCell<World>>,
}

pub struct RecordingBackend {
    world: Rc<RefCell<World>>,
    _device: Handle,
    _swap_chain: Handle,
}

impl RecordingBackend {
    fn track(&self, step: CreationStep, resource: Resource) -> Result<Handle, BackendError> {
        let mut world = self.world.borrow_mut();
        world.check(step)?;
        let id = world.insert(resource);
        Ok(Handle { id, world: self.world.clone() })
    }

    fn record(&self, call: Call) {
        self.world.borrow_mut().calls.push(call);
    }

    fn size_of(&self, id: u32) -> (u32, u32) {
        self.world
            .borrow()
            .live
            .get(&id)
            .map(|r| (r.width, r.height))
            .unwrap_or((0, 0))
    }

    /// Underlying buffer of a texture handle (back-buffer references resolve
    /// to the swap chain's buffer).
    fn storage_of(&self, id: u32) -> u32 {
        self.world
            .borrow()
            .live
            .get(&id)
            .and_then(|r| r.parent.filter(|_| r.kind == Kind::BackBufferRef))
            .unwrap_or(id)
    }

    fn resource(kind: Kind, (width, height): (u32, u32), parent: Option<u32>) -> Resource {
        Resource { kind, width, height, parent, cull: None, enabled: None }
    }
}

impl Drop for RecordingBackend {
    fn drop(&mut self) {
        let mut world = self.world.borrow_mut();
        if let Some(id) = world.back_buffer.take() {
            world.release(id);
        }
    }
}

impl GraphicsBackend for RecordingBackend {
    type Window = Recorder;
    type Adapter = RecordingAdapter;
    type Texture = Handle;
    type RenderTargetView = Handle;
    type DepthStencilView = Handle;
    type DepthStencilState = Handle;
    type RasterizerState = Handle;
    type BlendState = Handle;

    fn enumerate_adapter(window: &Recorder) -> Result<RecordingAdapter, BackendError> {
        window.0.borrow().check(CreationStep::Adapter)?;
        Ok(RecordingAdapter {
            info: AdapterInfo {
                description: "Recording Adapter".to_string(),
                dedicated_video_memory_mb: Some(4096),
            },
            world: window.0.clone(),
        })
    }

    fn adapter_info(adapter: &RecordingAdapter) -> AdapterInfo {
        adapter.info.clone()
    }

    fn display_modes(adapter: &RecordingAdapter) -> Result<Vec<DisplayMode>, BackendError> {
        let world = adapter.world.borrow();
        world.check(CreationStep::DisplayModes)?;
        Ok(world.modes.clone())
    }

    fn create_device_and_swap_chain(
        _adapter: RecordingAdapter,
        window: &Recorder,
        desc: &SwapChainDesc,
    ) -> Result<Self, BackendError> {
        let world = window.0.clone();
        let mut w = world.borrow_mut();
        w.check(CreationStep::DeviceAndSwapChain)?;

        let device = w.insert(Self::resource(Kind::Device, (0, 0), None));
        let swap_chain = w.insert(Self::resource(Kind::SwapChain, (desc.width, desc.height), None));
        let back_buffer = w.insert(Self::resource(
            Kind::BackBuffer,
            (desc.width, desc.height),
            Some(swap_chain),
        ));
        w.back_buffer = Some(back_buffer);
        w.swap_chain = Some(*desc);
        drop(w);

        Ok(Self {
            _device: Handle { id: device, world: world.clone() },
            _swap_chain: Handle { id: swap_chain, world: world.clone() },
            world,
        })
    }

    fn back_buffer(&mut self) -> Result<Handle, BackendError> {
        let buffer = self
            .world
            .borrow()
            .back_buffer
            .ok_or_else(|| BackendError::new("swap chain has no buffer"))?;
        let size = self.size_of(buffer);
        self.track(
            CreationStep::BackBuffer,
            Self::resource(Kind::BackBufferRef, size, Some(buffer)),
        )
    }

    fn create_render_target_view(&mut self, texture: &Handle) -> Result<Handle, BackendError> {
        let storage = self.storage_of(texture.id);
        let size = self.size_of(storage);
        self.track(
            CreationStep::RenderTargetView,
            Self::resource(Kind::RenderTargetView, size, Some(storage)),
        )
    }

    fn create_depth_buffer(&mut self, width: u32, height: u32) -> Result<Handle, BackendError> {
        self.track(
            CreationStep::DepthBuffer,
            Self::resource(Kind::DepthBuffer, (width, height), None),
        )
    }

    fn create_depth_stencil_view(&mut self, texture: &Handle) -> Result<Handle, BackendError> {
        let size = self.size_of(texture.id);
        self.track(
            CreationStep::DepthStencilView,
            Self::resource(Kind::DepthStencilView, size, Some(texture.id)),
        )
    }

    fn create_depth_stencil_state(
        &mut self,
        desc: &DepthStencilDesc,
    ) -> Result<Handle, BackendError> {
        let mut res = Self::resource(Kind::DepthStencilState, (0, 0), None);
        res.enabled = Some(desc.depth_enable);
        self.track(
            CreationStep::DepthStencilState { depth_enabled: desc.depth_enable },
            res,
        )
    }

    fn create_rasterizer_state(&mut self, desc: &RasterizerDesc) -> Result<Handle, BackendError> {
        let mut res = Self::resource(Kind::RasterizerState, (0, 0), None);
        res.cull = Some(desc.cull_mode);
        self.track(CreationStep::RasterizerState(desc.cull_mode), res)
    }

    fn create_blend_state(&mut self, desc: &BlendDesc) -> Result<Handle, BackendError> {
        let mut res = Self::resource(Kind::BlendState, (0, 0), None);
        res.enabled = Some(desc.blend_enable);
        self.track(
            CreationStep::BlendState { alpha_enabled: desc.blend_enable },
            res,
        )
    }

    fn bind_render_targets(&mut self, rtv: &Handle, dsv: &Handle) {
        self.record(Call::BindRenderTargets { rtv: rtv.id, dsv: dsv.id });
    }

    fn bind_depth_stencil_state(&mut self, state: &Handle, stencil_ref: u32) {
        self.record(Call::BindDepthStencil { id: state.id, stencil_ref });
    }

    fn bind_rasterizer_state(&mut self, state: &Handle) {
        self.record(Call::BindRasterizer { id: state.id });
    }

    fn bind_blend_state(&mut self, state: &Handle, blend_factor: [f32; 4], sample_mask: u32) {
        self.record(Call::BindBlend { id: state.id, blend_factor, sample_mask });
    }

    fn bind_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.record(Call::BindTopology(topology));
    }

    fn bind_input_layout(&mut self, layout: InputLayout) {
        self.record(Call::BindInputLayout(layout));
    }

    fn bind_viewport(&mut self, viewport: &Viewport) {
        self.record(Call::BindViewport(*viewport));
    }

    fn clear_render_target(&mut self, rtv: &Handle, color: [f32; 4]) {
        self.record(Call::ClearRenderTarget { rtv: rtv.id, color });
    }

    fn clear_depth_stencil(&mut self, dsv: &Handle, clear: DepthClear) {
        self.record(Call::ClearDepthStencil { dsv: dsv.id, clear });
    }

    fn present(&mut self, sync_interval: u32) -> Result<(), BackendError> {
        self.world.borrow().check(CreationStep::Present)?;
        self.record(Call::Present { sync_interval });
        Ok(())
    }

    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        let mut world = self.world.borrow_mut();
        world.check(CreationStep::ResizeBuffers)?;

        let old = world.back_buffer;
        if world.live.values().any(|r| r.parent.is_some() && r.parent == old) {
            return Err(BackendError::new("back buffer is still referenced"));
        }

        world.calls.push(Call::ResizeBuffers { width, height });
        if let Some(old) = old {
            world.release(old);
        }
        let swap_chain = self._swap_chain.id;
        let buffer = world.insert(Self::resource(
            Kind::BackBuffer,
            (width, height),
            Some(swap_chain),
        ));
        world.back_buffer = Some(buffer);
        if let Some(desc) = world.swap_chain.as_mut() {
            desc.width = width;
            desc.height = height;
        }
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError> {
        self.world.borrow().check(CreationStep::Fullscreen)?;
        self.record(Call::SetFullscreen(fullscreen));
        Ok(())
    }
}
