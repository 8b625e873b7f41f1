use super::backend::GraphicsBackend;
use super::error::{CreationStep, GraphicsError, StepContext};
use super::state::{BlendDesc, CullMode, DepthStencilDesc, RasterizerDesc};

/// Depth-stencil states keyed by "depth test enabled".
pub struct DepthStates<S> {
    pub enabled: S,
    pub disabled: S,
}

impl<S> DepthStates<S> {
    #[inline]
    pub fn get(&self, enabled: bool) -> &S {
        if enabled { &self.enabled } else { &self.disabled }
    }
}

/// Rasterizer states keyed by cull mode.
pub struct CullStates<S> {
    pub back: S,
    pub front: S,
    pub none: S,
}

impl<S> CullStates<S> {
    #[inline]
    pub fn get(&self, mode: CullMode) -> &S {
        match mode {
            CullMode::Back => &self.back,
            CullMode::Front => &self.front,
            CullMode::None => &self.none,
        }
    }
}

/// Blend states keyed by "alpha blending enabled".
pub struct BlendStates<S> {
    pub enabled: S,
    pub disabled: S,
}

impl<S> BlendStates<S> {
    #[inline]
    pub fn get(&self, enabled: bool) -> &S {
        if enabled { &self.enabled } else { &self.disabled }
    }
}

/// Every pre-built state object; toggles only choose which one is bound.
pub struct StateObjects<B: GraphicsBackend> {
    pub depth: DepthStates<B::DepthStencilState>,
    pub raster: CullStates<B::RasterizerState>,
    pub blend: BlendStates<B::BlendState>,
}

impl<B: GraphicsBackend> StateObjects<B> {
    /// Creates all seven state objects.
    ///
    /// The objects do not depend on each other, so every creation is attempted
    /// and all failures come back together.
    pub(crate) fn create(backend: &mut B) -> Result<Self, GraphicsError> {
        let mut failures = Vec::new();

        let depth_on = collect(
            &mut failures,
            backend
                .create_depth_stencil_state(&DepthStencilDesc::with_depth(true))
                .step(CreationStep::DepthStencilState { depth_enabled: true }),
        );
        let depth_off = collect(
            &mut failures,
            backend
                .create_depth_stencil_state(&DepthStencilDesc::with_depth(false))
                .step(CreationStep::DepthStencilState { depth_enabled: false }),
        );

        let cull_back = collect(
            &mut failures,
            backend
                .create_rasterizer_state(&RasterizerDesc::with_cull(CullMode::Back))
                .step(CreationStep::RasterizerState(CullMode::Back)),
        );
        let cull_front = collect(
            &mut failures,
            backend
                .create_rasterizer_state(&RasterizerDesc::with_cull(CullMode::Front))
                .step(CreationStep::RasterizerState(CullMode::Front)),
        );
        let cull_none = collect(
            &mut failures,
            backend
                .create_rasterizer_state(&RasterizerDesc::with_cull(CullMode::None))
                .step(CreationStep::RasterizerState(CullMode::None)),
        );

        let blend_on = collect(
            &mut failures,
            backend
                .create_blend_state(&BlendDesc::with_alpha(true))
                .step(CreationStep::BlendState { alpha_enabled: true }),
        );
        let blend_off = collect(
            &mut failures,
            backend
                .create_blend_state(&BlendDesc::with_alpha(false))
                .step(CreationStep::BlendState { alpha_enabled: false }),
        );

        match (
            depth_on, depth_off, cull_back, cull_front, cull_none, blend_on, blend_off,
        ) {
            (
                Some(depth_on),
                Some(depth_off),
                Some(cull_back),
                Some(cull_front),
                Some(cull_none),
                Some(blend_on),
                Some(blend_off),
            ) => Ok(Self {
                depth: DepthStates { enabled: depth_on, disabled: depth_off },
                raster: CullStates { back: cull_back, front: cull_front, none: cull_none },
                blend: BlendStates { enabled: blend_on, disabled: blend_off },
            }),
            _ => Err(GraphicsError::StateCreation(failures)),
        }
    }
}

fn collect<T>(failures: &mut Vec<GraphicsError>, result: Result<T, GraphicsError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            failures.push(e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cull_mapping_covers_every_mode() {
        let states = CullStates { back: "back", front: "front", none: "none" };
        assert_eq!(*states.get(CullMode::Back), "back");
        assert_eq!(*states.get(CullMode::Front), "front");
        assert_eq!(*states.get(CullMode::None), "none");
    }

    #[test]
    fn bool_keyed_mappings() {
        let depth = DepthStates { enabled: 1, disabled: 0 };
        let blend = BlendStates { enabled: 1, disabled: 0 };
        assert_eq!(*depth.get(true), 1);
        assert_eq!(*depth.get(false), 0);
        assert_eq!(*blend.get(true), 1);
        assert_eq!(*blend.get(false), 0);
    }
}
