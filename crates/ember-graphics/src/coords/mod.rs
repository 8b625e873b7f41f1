//! Small value types shared between the device layer and its callers.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
