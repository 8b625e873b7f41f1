//! Render-state enums and the descriptors the pre-built state objects are
//! created from.

/// Which triangle winding is discarded before rasterization.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum CullMode {
    None,
    #[default]
    Back,
    Front,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PrimitiveTopology {
    #[default]
    TriangleList,
    LineList,
}

/// Vertex layout tag the bound shaders expect.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum InputLayout {
    Position,
    PositionColor,
    PositionTexture,
    PositionTextureNormal,
    #[default]
    PositionTextureNormalTangent,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ComparisonFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrementClamp,
    DecrementClamp,
    Invert,
    IncrementWrap,
    DecrementWrap,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StencilFaceDesc {
    pub fail_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub func: ComparisonFunc,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DepthStencilDesc {
    pub depth_enable: bool,
    /// `true` writes all depth bits, `false` none.
    pub depth_write: bool,
    pub depth_func: ComparisonFunc,
    pub stencil_enable: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub front_face: StencilFaceDesc,
    pub back_face: StencilFaceDesc,
}

impl DepthStencilDesc {
    /// Depth test `Less` with full writes; the stencil counts front/back
    /// depth failures in opposite directions.
    pub fn with_depth(depth_enable: bool) -> Self {
        Self {
            depth_enable,
            depth_write: true,
            depth_func: ComparisonFunc::Less,
            stencil_enable: true,
            stencil_read_mask: 0xFF,
            stencil_write_mask: 0xFF,
            front_face: StencilFaceDesc {
                fail_op: StencilOp::Keep,
                depth_fail_op: StencilOp::IncrementClamp,
                pass_op: StencilOp::Keep,
                func: ComparisonFunc::Always,
            },
            back_face: StencilFaceDesc {
                fail_op: StencilOp::Keep,
                depth_fail_op: StencilOp::DecrementClamp,
                pass_op: StencilOp::Keep,
                func: ComparisonFunc::Always,
            },
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FillMode {
    Solid,
    Wireframe,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RasterizerDesc {
    pub fill_mode: FillMode,
    pub cull_mode: CullMode,
    pub front_counter_clockwise: bool,
    pub depth_bias: i32,
    pub depth_bias_clamp: f32,
    pub slope_scaled_depth_bias: f32,
    pub depth_clip_enable: bool,
    pub scissor_enable: bool,
    pub multisample_enable: bool,
    pub antialiased_line_enable: bool,
}

impl RasterizerDesc {
    /// Solid fill, clockwise front faces, no bias, depth clipping on.
    pub fn with_cull(cull_mode: CullMode) -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode,
            front_counter_clockwise: false,
            depth_bias: 0,
            depth_bias_clamp: 0.0,
            slope_scaled_depth_bias: 0.0,
            depth_clip_enable: true,
            scissor_enable: false,
            multisample_enable: false,
            antialiased_line_enable: false,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    InvSrcAlpha,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Blend configuration of render target 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendDesc {
    pub blend_enable: bool,
    pub src_blend: BlendFactor,
    pub dest_blend: BlendFactor,
    pub blend_op: BlendOp,
    pub src_blend_alpha: BlendFactor,
    pub dest_blend_alpha: BlendFactor,
    pub blend_op_alpha: BlendOp,
    pub write_mask: u8,
}

impl BlendDesc {
    /// Straight-alpha "over" blending for color, alpha passed through.
    pub fn with_alpha(blend_enable: bool) -> Self {
        Self {
            blend_enable,
            src_blend: BlendFactor::SrcAlpha,
            dest_blend: BlendFactor::InvSrcAlpha,
            blend_op: BlendOp::Add,
            src_blend_alpha: BlendFactor::One,
            dest_blend_alpha: BlendFactor::Zero,
            blend_op_alpha: BlendOp::Add,
            write_mask: 0x0F,
        }
    }
}

/// Blend factor passed when binding a blend state.
pub const BLEND_FACTOR: [f32; 4] = [0.0; 4];

/// All samples enabled.
pub const SAMPLE_MASK: u32 = 0xffff_ffff;

/// Reference value bound with the depth-stencil state.
pub const STENCIL_REF: u32 = 1;

/// Which planes a depth-stencil clear touches, and the values written.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthClear {
    pub depth: Option<f32>,
    pub stencil: Option<u8>,
}

impl DepthClear {
    /// Far plane depth and zero stencil.
    ///
    /// Stencil is reset every frame so the increment/decrement ops of the
    /// depth-stencil states start from zero.
    pub const FRAME: DepthClear = DepthClear { depth: Some(1.0), stencil: Some(0) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clear_resets_depth_and_stencil() {
        assert_eq!(DepthClear::FRAME.depth, Some(1.0));
        assert_eq!(DepthClear::FRAME.stencil, Some(0));
    }

    #[test]
    fn depth_variants_differ_only_in_depth_enable() {
        let on = DepthStencilDesc::with_depth(true);
        let off = DepthStencilDesc::with_depth(false);
        assert!(on.depth_enable && !off.depth_enable);
        assert_eq!(DepthStencilDesc { depth_enable: true, ..off }, on);
    }
}

