//! Seam to the external algebra backend.
//!
//! The engine never computes results. A backend receives a routed
//! [`SolveRequest`] and answers with a [`BackendReply`] or a
//! [`BackendError`], which the pipeline forwards unchanged.

use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::request::SolveRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendReply {
    /// Result in the backend's own notation.
    pub result: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
}

impl BackendReply {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }
}

pub trait AlgebraBackend {
    fn execute(&self, request: &SolveRequest) -> Result<BackendReply, BackendError>;
}

/// Closures work as backends, which keeps tests and adapters short.
impl<F> AlgebraBackend for F
where
    F: Fn(&SolveRequest) -> Result<BackendReply, BackendError>,
{
    fn execute(&self, request: &SolveRequest) -> Result<BackendReply, BackendError> {
        self(request)
    }
}

/// Backend that refuses everything. Used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBackend;

impl AlgebraBackend for NoBackend {
    fn execute(&self, request: &SolveRequest) -> Result<BackendReply, BackendError> {
        Err(BackendError::Unavailable(format!(
            "no algebra backend configured for {}",
            request.op_name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_backend() {
        let backend = |req: &SolveRequest| Ok(BackendReply::new(req.op_name()));
        let reply = backend
            .execute(&SolveRequest::Simplify { expr: "x".into() })
            .unwrap();
        assert_eq!(reply.result, "simplify");
        assert!(reply.steps.is_empty());
    }

    #[test]
    fn test_no_backend() {
        let err = NoBackend
            .execute(&SolveRequest::Factor { expr: "x".into() })
            .unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(ref m) if m.contains("factor")));
    }
}
