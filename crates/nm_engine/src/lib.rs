//! Turns recognizer output for handwritten math into structured solve
//! requests for an external algebra backend.
//!
//! ```text
//! raw ─▶ preprocess ─▶ to_latex ─▶ validate ─▶ classify ─▶ extract ─▶ route ─▶ SolveRequest
//! ```

pub mod backend;
pub mod classify;
pub mod error;
pub mod extract;
pub mod family;
pub mod history;
pub mod pipeline;
pub mod request;
pub mod router;
pub mod validate;

pub use backend::{AlgebraBackend, BackendReply, NoBackend};
pub use classify::{classify, Classification, ClassifierOutput, Operation, ProblemType};
pub use error::{BackendError, PipelineError, RouteError};
pub use extract::{extract, Extraction};
pub use family::{NoteType, RouteFamily, ValidationHint};
pub use history::{HistorySink, MemoryHistory};
pub use pipeline::{preprocess, Pipeline, PipelineOptions, RoutedRequest};
pub use request::SolveRequest;
pub use validate::{validate, Diagnostic, DiagnosticKind, ValidationResult};

/// Build every static pattern table now instead of on first use.
pub fn warm_up() {
    let _ = nm_parser::normalize("|x|^{2}");
    validate::warm_up();
    classify::warm_up();
    extract::warm_up();
    family::warm_up();
    router::warm_up();
    tracing::debug!(target: "pipeline", "pattern tables ready");
}
