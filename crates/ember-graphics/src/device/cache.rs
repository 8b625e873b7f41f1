use super::state::{CullMode, InputLayout, PrimitiveTopology};

/// Last value handed to the device for one piece of pipeline state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Cached<T> {
    value: T,
}

impl<T: Copy + PartialEq> Cached<T> {
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    #[inline]
    pub fn get(&self) -> T {
        self.value
    }

    /// Stores `value` and returns `true` when it differs from the cached one.
    ///
    /// A `false` return means the caller must not touch the device.
    #[inline]
    pub fn replace(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }
}

/// Cached render state of the immediate context.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StateCache {
    pub z_buffer: Cached<bool>,
    pub alpha_blending: Cached<bool>,
    pub cull_mode: Cached<CullMode>,
    pub topology: Cached<PrimitiveTopology>,
    pub input_layout: Cached<InputLayout>,
}

impl Default for StateCache {
    /// Depth on, blending off, back-face culling, triangle lists.
    fn default() -> Self {
        Self {
            z_buffer: Cached::new(true),
            alpha_blending: Cached::new(false),
            cull_mode: Cached::new(CullMode::Back),
            topology: Cached::new(PrimitiveTopology::TriangleList),
            input_layout: Cached::new(InputLayout::PositionTextureNormalTangent),
        }
    }
}
