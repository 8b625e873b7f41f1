use super::backend::GraphicsBackend;
use super::error::{CreationStep, GraphicsError, StepContext};

/// Views bound to the current swap-chain back buffer, plus the depth buffer.
///
/// Field order is release order: both views go before the depth texture they
/// reference. The whole struct is dropped before the swap chain resizes.
pub struct FrameTargets<B: GraphicsBackend> {
    pub(crate) render_target: B::RenderTargetView,
    pub(crate) depth_stencil: B::DepthStencilView,
    pub(crate) depth_buffer: B::Texture,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl<B: GraphicsBackend> FrameTargets<B> {
    /// Creates the back-buffer view, the depth buffer and its view.
    ///
    /// The back-buffer texture itself is released as soon as its view exists;
    /// the swap chain keeps the memory alive.
    pub(crate) fn create(backend: &mut B, width: u32, height: u32) -> Result<Self, GraphicsError> {
        let render_target = {
            let back_buffer = backend.back_buffer().step(CreationStep::BackBuffer)?;
            backend
                .create_render_target_view(&back_buffer)
                .step(CreationStep::RenderTargetView)?
        };

        let depth_buffer = backend
            .create_depth_buffer(width, height)
            .step(CreationStep::DepthBuffer)?;

        let depth_stencil = backend
            .create_depth_stencil_view(&depth_buffer)
            .step(CreationStep::DepthStencilView)?;

        Ok(Self {
            render_target,
            depth_stencil,
            depth_buffer,
            width,
            height,
        })
    }

    pub(crate) fn bind(&self, backend: &mut B) {
        backend.bind_render_targets(&self.render_target, &self.depth_stencil);
    }

    pub fn render_target(&self) -> &B::RenderTargetView {
        &self.render_target
    }

    pub fn depth_stencil(&self) -> &B::DepthStencilView {
        &self.depth_stencil
    }

    pub fn depth_buffer(&self) -> &B::Texture {
        &self.depth_buffer
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
