//! wgpu + winit backend.
//!
//! wgpu has no immediate-mode state binding: state objects are wgpu
//! descriptors and binds are recorded into a [`PipelineStateKey`].

mod context;
mod conversions;
mod surface;

pub use context::{PipelineStateKey, WgpuAdapter, WgpuBackend};
pub use conversions::DEPTH_FORMAT;
