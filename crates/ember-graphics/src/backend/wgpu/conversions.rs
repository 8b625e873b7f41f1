//! Descriptor translation into wgpu state structs.

use crate::device::{
    BlendDesc, BlendFactor, BlendOp, ComparisonFunc, CullMode, DepthStencilDesc, FillMode,
    PrimitiveTopology, RasterizerDesc, StencilFaceDesc, StencilOp,
};

/// 24-bit depth + 8-bit stencil.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

pub fn compare(func: ComparisonFunc) -> wgpu::CompareFunction {
    match func {
        ComparisonFunc::Never => wgpu::CompareFunction::Never,
        ComparisonFunc::Less => wgpu::CompareFunction::Less,
        ComparisonFunc::Equal => wgpu::CompareFunction::Equal,
        ComparisonFunc::LessEqual => wgpu::CompareFunction::LessEqual,
        ComparisonFunc::Greater => wgpu::CompareFunction::Greater,
        ComparisonFunc::NotEqual => wgpu::CompareFunction::NotEqual,
        ComparisonFunc::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
        ComparisonFunc::Always => wgpu::CompareFunction::Always,
    }
}

pub fn stencil_op(op: StencilOp) -> wgpu::StencilOperation {
    match op {
        StencilOp::Keep => wgpu::StencilOperation::Keep,
        StencilOp::Zero => wgpu::StencilOperation::Zero,
        StencilOp::Replace => wgpu::StencilOperation::Replace,
        StencilOp::IncrementClamp => wgpu::StencilOperation::IncrementClamp,
        StencilOp::DecrementClamp => wgpu::StencilOperation::DecrementClamp,
        StencilOp::Invert => wgpu::StencilOperation::Invert,
        StencilOp::IncrementWrap => wgpu::StencilOperation::IncrementWrap,
        StencilOp::DecrementWrap => wgpu::StencilOperation::DecrementWrap,
    }
}

fn stencil_face(face: &StencilFaceDesc) -> wgpu::StencilFaceState {
    wgpu::StencilFaceState {
        compare: compare(face.func),
        fail_op: stencil_op(face.fail_op),
        depth_fail_op: stencil_op(face.depth_fail_op),
        pass_op: stencil_op(face.pass_op),
    }
}

pub fn depth_stencil(desc: &DepthStencilDesc) -> wgpu::DepthStencilState {
    // A disabled depth test neither rejects nor writes.
    let (depth_compare, depth_write_enabled) = if desc.depth_enable {
        (compare(desc.depth_func), desc.depth_write)
    } else {
        (wgpu::CompareFunction::Always, false)
    };

    let stencil = if desc.stencil_enable {
        wgpu::StencilState {
            front: stencil_face(&desc.front_face),
            back: stencil_face(&desc.back_face),
            read_mask: desc.stencil_read_mask as u32,
            write_mask: desc.stencil_write_mask as u32,
        }
    } else {
        wgpu::StencilState::default()
    };

    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil,
        bias: wgpu::DepthBiasState::default(),
    }
}

pub fn cull_face(mode: CullMode) -> Option<wgpu::Face> {
    match mode {
        CullMode::None => None,
        CullMode::Back => Some(wgpu::Face::Back),
        CullMode::Front => Some(wgpu::Face::Front),
    }
}

pub fn topology(topology: PrimitiveTopology) -> wgpu::PrimitiveTopology {
    match topology {
        PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        PrimitiveTopology::LineList => wgpu::PrimitiveTopology::LineList,
    }
}

/// Rasterizer part of a primitive state; topology is filled in at bind time.
pub fn rasterizer(desc: &RasterizerDesc) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: if desc.front_counter_clockwise {
            wgpu::FrontFace::Ccw
        } else {
            wgpu::FrontFace::Cw
        },
        cull_mode: cull_face(desc.cull_mode),
        polygon_mode: match desc.fill_mode {
            FillMode::Solid => wgpu::PolygonMode::Fill,
            FillMode::Wireframe => wgpu::PolygonMode::Line,
        },
        unclipped_depth: !desc.depth_clip_enable,
        conservative: false,
    }
}

fn blend_factor(factor: BlendFactor) -> wgpu::BlendFactor {
    match factor {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::InvSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
    }
}

fn blend_op(op: BlendOp) -> wgpu::BlendOperation {
    match op {
        BlendOp::Add => wgpu::BlendOperation::Add,
        BlendOp::Subtract => wgpu::BlendOperation::Subtract,
        BlendOp::ReverseSubtract => wgpu::BlendOperation::ReverseSubtract,
        BlendOp::Min => wgpu::BlendOperation::Min,
        BlendOp::Max => wgpu::BlendOperation::Max,
    }
}

/// Color target state for render target 0 in `format`.
pub fn color_target(desc: &BlendDesc, format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
    let blend = desc.blend_enable.then(|| wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: blend_factor(desc.src_blend),
            dst_factor: blend_factor(desc.dest_blend),
            operation: blend_op(desc.blend_op),
        },
        alpha: wgpu::BlendComponent {
            src_factor: blend_factor(desc.src_blend_alpha),
            dst_factor: blend_factor(desc.dest_blend_alpha),
            operation: blend_op(desc.blend_op_alpha),
        },
    });

    wgpu::ColorTargetState {
        format,
        blend,
        write_mask: wgpu::ColorWrites::from_bits_truncate(desc.write_mask as u32),
    }
}
