use enough::StopReason;

/// Convenience result type used across animscale.
pub type ResizeResult<T> = Result<T, ResizeError>;

/// Top-level error taxonomy returned by resize APIs.
#[derive(thiserror::Error, Debug)]
pub enum ResizeError {
    /// The source canvas has a zero width or height.
    #[error("invalid source dimensions: {width}x{height}")]
    InvalidSourceDimensions { width: u32, height: u32 },

    /// Both requested dimensions were zero, so nothing can be derived.
    #[error("at least one of the requested width and height must be non-zero")]
    AtLeastOneDimensionRequired,

    /// Decoded animation data is internally inconsistent.
    #[error("invalid animation: {0}")]
    InvalidAnimation(String),

    /// The pluggable scale function reported a failure for one frame.
    #[error("scale function failed on frame {index}: {source}")]
    ScaleFunction {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The pluggable scale function returned an image of the wrong size.
    #[error(
        "scale function returned {}x{} for frame {}, expected {}x{}",
        .actual.0, .actual.1, .index, .expected.0, .expected.1
    )]
    ScaledSizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The caller's cancellation token was tripped.
    #[error("resize cancelled")]
    Cancelled,

    /// The caller's deadline elapsed before all frames were admitted.
    #[error("resize deadline exceeded")]
    DeadlineExceeded,

    /// Broken internal invariant, a panicking scale job, or a thread pool
    /// that could not be built.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResizeError {
    /// Build a [`ResizeError::InvalidAnimation`] value.
    pub fn invalid_animation(msg: impl Into<String>) -> Self {
        Self::InvalidAnimation(msg.into())
    }

    /// Build a [`ResizeError::Internal`] value.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Wrap a scale function failure for the frame at `index`.
    pub fn scale_function(index: usize, source: anyhow::Error) -> Self {
        Self::ScaleFunction { index, source }
    }

    /// `true` for [`ResizeError::Cancelled`] and [`ResizeError::DeadlineExceeded`].
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

impl From<StopReason> for ResizeError {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::TimedOut => Self::DeadlineExceeded,
            _ => Self::Cancelled,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
