//! Error types and result utilities for animation operations.

use crate::figure::ArtistId;
use thiserror::Error;

/// Convenience type alias for results that may contain AnimoError
pub type AnimoResult<T> = Result<T, AnimoError>;

/// Error types that can occur while building, updating or exporting an animation.
#[derive(Error, Debug)]
pub enum AnimoError {
    /// Input array has the wrong number of dimensions or is too small to draw.
    ///
    /// Raised at construction and never recovered internally.
    #[error("Shape error: expected {expected}, got {actual}")]
    Shape {
        /// What the operation needed
        expected: String,
        /// What it was given
        actual: String,
    },

    /// A frame index outside `[0, nframes)` was requested.
    #[error("Frame index {index} out of range for {nframes} frames")]
    FrameOutOfRange {
        /// Requested frame
        index: usize,
        /// Frames available
        nframes: usize,
    },

    /// An inconsistent or unsupported configuration was supplied.
    ///
    /// Covers unknown fixing modes, parameters a component does not have and
    /// per-item style lists of the wrong length.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A single parameter holds a value outside its valid domain.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the parameter
        parameter: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Array lengths that must agree do not.
    #[error("Dimension mismatch error: {0}")]
    DimensionMismatch(String),

    /// A color normalization could not be resolved for the data at hand.
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// The colormap name is not known.
    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    /// The color specification could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// An artist handle does not refer to an artist of the expected kind.
    #[error("Unknown artist handle {0:?}")]
    UnknownArtist(ArtistId),

    /// The drawing backend reported an error.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error while writing an exported animation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error for configs or the HTML player payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnimoError {
    /// Create a shape error
    pub fn shape(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Shape {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a frame-out-of-range error
    pub const fn frame_out_of_range(index: usize, nframes: usize) -> Self {
        Self::FrameOutOfRange { index, nframes }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(details: impl Into<String>) -> Self {
        Self::DimensionMismatch(details.into())
    }

    /// Create a normalization error
    pub fn normalization(details: impl Into<String>) -> Self {
        Self::Normalization(details.into())
    }

    /// Wrap a backend drawing error
    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }

    /// Check if this error was raised while validating inputs at construction
    pub const fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::Shape { .. }
                | Self::InvalidConfig(_)
                | Self::InvalidParameter { .. }
                | Self::DimensionMismatch(_)
        )
    }
}

/// Check `index` against `nframes`, the bound every per-frame operation shares.
pub(crate) const fn check_frame(index: usize, nframes: usize) -> AnimoResult<()> {
    if index >= nframes {
        return Err(AnimoError::frame_out_of_range(index, nframes));
    }
    Ok(())
}
