use thiserror::Error;

use crate::family::RouteFamily;
use crate::validate::Diagnostic;

/// Failure reported by an algebra backend. Forwarded unchanged by the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Backend failed: {0}")]
    Failed(String),
    #[error("Unsupported request: {0}")]
    Unsupported(String),
}

/// Failure inside a routing chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// The family was recognised but a required part is missing.
    #[error("{}", .0.message)]
    Gap(Diagnostic),
    #[error("Could not identify {family} operation: {detail}")]
    NoMatch { family: RouteFamily, detail: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("{}", .0.message)]
    Structural(Diagnostic),
    #[error("Could not identify {family} operation: {detail}")]
    OperationNotIdentified { family: RouteFamily, detail: String },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PipelineError {
    /// Diagnostic carried by a structural failure, if any.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            PipelineError::Structural(d) => Some(d),
            _ => None,
        }
    }
}

impl From<RouteError> for PipelineError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::Gap(diagnostic) => PipelineError::Structural(diagnostic),
            RouteError::NoMatch { family, detail } => {
                PipelineError::OperationNotIdentified { family, detail }
            }
        }
    }
}
