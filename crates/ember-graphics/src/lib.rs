//! Ember graphics crate.
//!
//! Owns the GPU device, swap chain, frame targets and the small set of
//! pipeline state objects a renderer toggles between at runtime.

pub mod backend;
pub mod coords;
pub mod device;
pub mod logging;
pub mod settings;

pub use backend::WgpuBackend;
pub use coords::{ColorRgba, Viewport};
pub use device::{CullMode, Graphics, GraphicsError, InputLayout, PrimitiveTopology};
pub use settings::{GraphicsSettings, Resolution};
