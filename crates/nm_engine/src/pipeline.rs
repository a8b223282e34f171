//! Pipeline driver: Normalize → Validate → Classify → Extract → Route.
//!
//! Strictly linear. A validation failure ends the run with a structural
//! diagnostic; nothing after it executes. Every run reports one
//! [`HistoryRecord`] to the configured sink.

use std::time::Instant;

use nm_api_models::{ClassificationJson, HistoryRecord, RouteEnvelope};
use nm_parser::{normalize, to_latex, NormalizedExpression};

use crate::backend::{AlgebraBackend, BackendReply};
use crate::classify::{classify, Classification};
use crate::error::PipelineError;
use crate::extract::extract;
use crate::family::{resolve_family, validation_hint, NoteType, RouteFamily};
use crate::history::HistorySink;
use crate::request::SolveRequest;
use crate::router::{self, RouteInput};
use crate::validate::{validate, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Drop one leading and one trailing `=` left behind by handwriting
    /// recognition (`∫x²dx=`).
    pub strip_edge_equals: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            strip_edge_equals: true,
        }
    }
}

pub fn preprocess(raw: &str, options: &PipelineOptions) -> String {
    let mut text = raw.trim();
    if options.strip_edge_equals {
        if let Some(rest) = text.strip_prefix('=') {
            text = rest.trim_start();
        }
        if let Some(rest) = text.strip_suffix('=') {
            text = rest.trim_end();
        }
    }
    text.to_string()
}

/// Successful routing result with every intermediate view kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedRequest {
    /// Caller input, untouched.
    pub input: String,
    /// LaTeX view the router matched on.
    pub source: String,
    pub normalized: NormalizedExpression,
    pub classification: Classification,
    pub family: RouteFamily,
    pub request: SolveRequest,
}

impl RoutedRequest {
    pub fn to_envelope(&self) -> RouteEnvelope {
        RouteEnvelope::new(
            self.input.clone(),
            self.normalized.as_str(),
            self.classification.to_json(),
            self.request.to_json_value(),
        )
        .with_family(self.family.as_str())
    }
}

#[derive(Default)]
pub struct Pipeline {
    options: PipelineOptions,
    history: Option<Box<dyn HistorySink>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("options", &self.options)
            .field("history", &self.history.is_some())
            .finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_history(mut self, sink: Box<dyn HistorySink>) -> Self {
        self.history = Some(sink);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Turn raw recognizer output into a solve request.
    pub fn route(&self, raw: &str, note: NoteType) -> Result<RoutedRequest, PipelineError> {
        let started = Instant::now();
        let (outcome, classification) = self.run(raw, note);
        self.record(raw, classification, started, outcome.is_ok());
        outcome
    }

    /// Route, then hand the request to `backend`. Backend errors pass
    /// through untouched.
    pub fn solve_with<B>(
        &self,
        raw: &str,
        note: NoteType,
        backend: &B,
    ) -> Result<(RoutedRequest, BackendReply), PipelineError>
    where
        B: AlgebraBackend + ?Sized,
    {
        let started = Instant::now();
        let (outcome, classification) = self.run(raw, note);
        let outcome = outcome.and_then(|routed| {
            let reply = backend.execute(&routed.request)?;
            Ok((routed, reply))
        });
        if let Err(PipelineError::Backend(err)) = &outcome {
            tracing::warn!(target: "pipeline", error = %err, "backend failed");
        }
        self.record(raw, classification, started, outcome.is_ok());
        outcome
    }

    fn run(
        &self,
        raw: &str,
        note: NoteType,
    ) -> (Result<RoutedRequest, PipelineError>, Option<ClassificationJson>) {
        let text = preprocess(raw, &self.options);
        let source = to_latex(&text);

        let hint = validation_hint(note, &source);
        if let ValidationResult::Invalid(diagnostic) = validate(&source, hint) {
            tracing::debug!(
                target: "pipeline",
                hint = hint.as_str(),
                kind = %diagnostic.kind,
                "validation failed"
            );
            return (Err(PipelineError::Structural(diagnostic)), None);
        }

        let normalized = normalize(&source);
        let output = classify(&source);
        let extraction = extract(&source, &output);
        let classification = Classification::from_parts(output, &extraction);
        let family = resolve_family(note, &source, classification.problem_type);
        let json = classification.to_json();

        tracing::debug!(
            target: "pipeline",
            note = note.as_str(),
            family = %family,
            problem_type = classification.problem_type.as_str(),
            normalized = normalized.as_str(),
            "routing"
        );

        let input = RouteInput::new(&source, &normalized, &classification, &extraction);
        let routed = router::route(family, &input)
            .map(|request| RoutedRequest {
                input: raw.to_string(),
                source: source.clone(),
                normalized: normalized.clone(),
                classification: classification.clone(),
                family,
                request,
            })
            .map_err(PipelineError::from);
        (routed, Some(json))
    }

    fn record(
        &self,
        raw: &str,
        classification: Option<ClassificationJson>,
        started: Instant,
        success: bool,
    ) {
        let Some(sink) = &self.history else {
            return;
        };
        let latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        sink.record(&HistoryRecord {
            input: raw.to_string(),
            classification,
            latency_us,
            success,
        });
    }
}
