//! Text and JSON renderings shared by the subcommands and the REPL.

use std::process::ExitCode;

use nm_api_models::{ClassificationJson, ErrorJsonOutput};
use nm_engine::{Diagnostic, PipelineError, RoutedRequest};

pub const EXIT_STRUCTURAL: u8 = 2;
pub const EXIT_NO_ROUTE: u8 = 3;
pub const EXIT_BACKEND: u8 = 4;

pub fn exit_code(err: &PipelineError) -> ExitCode {
    ExitCode::from(match err {
        PipelineError::Structural(_) => EXIT_STRUCTURAL,
        PipelineError::OperationNotIdentified { .. } => EXIT_NO_ROUTE,
        PipelineError::Backend(_) => EXIT_BACKEND,
    })
}

pub fn error_json(err: &PipelineError, input: &str) -> ErrorJsonOutput {
    match err {
        PipelineError::Structural(d) => ErrorJsonOutput::structural(d.to_json(), input),
        PipelineError::OperationNotIdentified { .. } => {
            ErrorJsonOutput::operation_not_identified(err.to_string(), input)
        }
        PipelineError::Backend(e) => ErrorJsonOutput::backend(e.to_string(), input),
    }
}

pub fn routed_text(routed: &RoutedRequest) -> String {
    let c = &routed.classification;
    let mut out = String::new();
    out.push_str(&format!("family:     {}\n", routed.family));
    out.push_str(&format!(
        "problem:    {} ({}, confidence {:.2})\n",
        c.problem_type, c.operation, c.confidence
    ));
    out.push_str(&format!("normalized: {}\n", routed.normalized));
    out.push_str(&format!("request:    {}", routed.request));
    out
}

pub fn diagnostic_text(d: &Diagnostic) -> String {
    format!(
        "error[{}]: {}\n  suggestion: {}\n  hint: {}",
        d.kind, d.user_message, d.suggestion, d.hint
    )
}

pub fn error_text(err: &PipelineError) -> String {
    match err.diagnostic() {
        Some(d) => diagnostic_text(d),
        None => format!("error: {err}"),
    }
}

pub fn classification_text(c: &ClassificationJson) -> String {
    let mut out = format!(
        "problem_type: {}\noperation:    {}\nconfidence:   {:.2}",
        c.problem_type, c.operation, c.confidence
    );
    if !c.variables.is_empty() {
        out.push_str(&format!("\nvariables:    {}", c.variables.join(", ")));
    }
    if let Some(v) = &c.solve_for {
        out.push_str(&format!("\nsolve_for:    {v}"));
    }
    if let Some([lo, hi]) = c.limits {
        out.push_str(&format!("\nlimits:       {lo} .. {hi}"));
    }
    out
}

pub fn print_pretty_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: could not serialize output: {e}"),
    }
}
