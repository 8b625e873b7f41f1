//! Graphics device and render-state management.
//!
//! This module is responsible for:
//! - creating the device, immediate context and swap chain in dependency order
//! - owning the swap-chain-sized frame targets and rebuilding them on resize
//! - binding pre-built state objects through a value cache
//!
//! The native API sits behind [`GraphicsBackend`]; see `crate::backend` for
//! the implementations.

mod backend;
mod cache;
mod display_mode;
mod error;
mod graphics;
mod objects;
mod state;
mod targets;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{AdapterInfo, GraphicsBackend, SwapChainDesc};
pub use cache::{Cached, StateCache};
pub use display_mode::{select_refresh_rate, DisplayMode, RefreshRate};
pub use error::{BackendError, CreationStep, GraphicsError};
pub use graphics::Graphics;
pub use objects::{BlendStates, CullStates, DepthStates, StateObjects};
pub use state::{
    BlendDesc, BlendFactor, BlendOp, ComparisonFunc, CullMode, DepthClear, DepthStencilDesc,
    FillMode, InputLayout, PrimitiveTopology, RasterizerDesc, StencilFaceDesc, StencilOp,
    BLEND_FACTOR, SAMPLE_MASK, STENCIL_REF,
};
pub use targets::FrameTargets;
