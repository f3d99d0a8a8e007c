use thiserror::Error;

/// Unified failure type surfaced by scene loading and rendering. Variants
/// carry an intrinsic severity: `InvalidScene` and `AssetIo` abort the run,
/// `GeometryDegenerate` and `NumericAnomaly` are recoverable and only ever
/// logged through [`crate::utils::diagnostics`].
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid scene description: {0}")]
    InvalidScene(String),

    #[error("asset I/O failure reading {path}: {source}")]
    AssetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("degenerate geometry encountered: {0}")]
    GeometryDegenerate(String),

    #[error("numeric anomaly encountered: {0}")]
    NumericAnomaly(String),

    #[error("tile scratch arena exhausted: {0}")]
    ArenaExhausted(String),
}

impl RenderError {
    /// Process exit code a fatal error should translate to. Non-fatal
    /// variants never reach this — they are logged and counted in place.
    pub fn exit_code(&self) -> i32 {
        match self {
            RenderError::InvalidScene(_) => 1,
            RenderError::AssetIo { .. } => 2,
            RenderError::GeometryDegenerate(_) => 2,
            RenderError::NumericAnomaly(_) => 2,
            RenderError::ArenaExhausted(_) => 2,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RenderError::InvalidScene(_) | RenderError::AssetIo { .. } | RenderError::ArenaExhausted(_)
        )
    }
}
