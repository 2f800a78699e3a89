//! Parameter and pipeline error types.

use crate::data::DataError;
use thiserror::Error;

/// Rejected numeric or textual input to a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ParamError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

/// Any failure of a pipeline run, surfaced with the originating message unchanged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Param(#[from] ParamError),
}
