//! Native backend implementations of [`GraphicsBackend`](crate::device::GraphicsBackend).

pub mod wgpu;

pub use self::wgpu::{PipelineStateKey, WgpuBackend};
