use std::fmt;

/// Failure reported by a backend call.
///
/// Backends flatten their native error into a message; the device layer adds
/// which step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}

/// Device-layer operation that can fail.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CreationStep {
    Adapter,
    DisplayModes,
    DeviceAndSwapChain,
    BackBuffer,
    RenderTargetView,
    DepthBuffer,
    DepthStencilView,
    DepthStencilState { depth_enabled: bool },
    RasterizerState(super::CullMode),
    BlendState { alpha_enabled: bool },
    ResizeBuffers,
    Present,
    Fullscreen,
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationStep::Adapter => f.write_str("enumerate the primary adapter"),
            CreationStep::DisplayModes => f.write_str("get the adapter's display modes"),
            CreationStep::DeviceAndSwapChain => {
                f.write_str("create the device, immediate context and swap chain")
            }
            CreationStep::BackBuffer => f.write_str("get the swap chain back buffer"),
            CreationStep::RenderTargetView => f.write_str("create the render target view"),
            CreationStep::DepthBuffer => f.write_str("create the depth buffer texture"),
            CreationStep::DepthStencilView => f.write_str("create the depth stencil view"),
            CreationStep::DepthStencilState { depth_enabled } => {
                let which = if *depth_enabled { "enabled" } else { "disabled" };
                write!(f, "create the depth {which} depth-stencil state")
            }
            CreationStep::RasterizerState(mode) => {
                write!(f, "create the rasterizer cull {mode:?} state")
            }
            CreationStep::BlendState { alpha_enabled } => {
                let which = if *alpha_enabled { "enabled" } else { "disabled" };
                write!(f, "create the alpha {which} blend state")
            }
            CreationStep::ResizeBuffers => f.write_str("resize the swap chain buffers"),
            CreationStep::Present => f.write_str("present the swap chain"),
            CreationStep::Fullscreen => f.write_str("change the fullscreen state"),
        }
    }
}

/// Error returned by the device layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// A single backend call failed.
    Backend {
        step: CreationStep,
        source: BackendError,
    },
    /// One or more of the independent state objects could not be created.
    ///
    /// Every variant is attempted; each entry is a `Backend` error.
    StateCreation(Vec<GraphicsError>),
    /// The frame targets were lost by an earlier failed resize.
    MissingFrameTargets,
}

impl GraphicsError {
    pub(crate) fn backend(step: CreationStep, source: BackendError) -> Self {
        GraphicsError::Backend { step, source }
    }

    /// Step that failed, for single-call failures.
    pub fn step(&self) -> Option<CreationStep> {
        match self {
            GraphicsError::Backend { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::Backend { step, source } => write!(f, "failed to {step}: {source}"),
            GraphicsError::StateCreation(errors) => {
                write!(f, "failed to create {} render state object(s)", errors.len())?;
                for e in errors {
                    write!(f, "; {e}")?;
                }
                Ok(())
            }
            GraphicsError::MissingFrameTargets => {
                f.write_str("frame targets are unavailable after a failed resize")
            }
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphicsError::Backend { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Extension for tagging backend results with the step they belong to.
///
/// Failures are logged at the point of tagging so the log carries every
/// failure even when the caller only inspects the first.
pub(crate) trait StepContext<T> {
    fn step(self, step: CreationStep) -> Result<T, GraphicsError>;
}

impl<T> StepContext<T> for Result<T, BackendError> {
    fn step(self, step: CreationStep) -> Result<T, GraphicsError> {
        self.map_err(|source| {
            let err = GraphicsError::backend(step, source);
            log::error!("{err}");
            err
        })
    }
}
