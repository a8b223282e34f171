//! JSON DTOs for routing results, diagnostics and history.

use serde::{Deserialize, Serialize};

/// Stable schema version for JSON outputs.
pub const SCHEMA_VERSION: u8 = 1;

// =============================================================================
// Classification
// =============================================================================

/// Classifier and extractor output as seen by callers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassificationJson {
    pub problem_type: String,
    pub operation: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solve_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<[f64; 2]>,
}

// =============================================================================
// Validation failure
// =============================================================================

/// The stable contract for malformed input.
///
/// UI clients key on `error_kind`; the field set must not change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ValidationFailureJson {
    pub valid: bool,
    pub error_kind: String,
    pub user_message: String,
    pub suggestion: String,
    pub hint: String,
}

impl ValidationFailureJson {
    pub fn new(
        error_kind: impl Into<String>,
        user_message: impl Into<String>,
        suggestion: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            valid: false,
            error_kind: error_kind.into(),
            user_message: user_message.into(),
            suggestion: suggestion.into(),
            hint: hint.into(),
        }
    }
}

// =============================================================================
// Routed request envelope
// =============================================================================

/// Successful routing result.
///
/// `request` holds the serialized solve request (externally tagged by its
/// `op` field) so this crate does not depend on engine types.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RouteEnvelope {
    pub schema_version: u8,
    pub ok: bool,
    pub input: String,
    pub normalized: String,
    pub classification: ClassificationJson,
    pub request: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

impl RouteEnvelope {
    pub fn new(
        input: impl Into<String>,
        normalized: impl Into<String>,
        classification: ClassificationJson,
        request: serde_json::Value,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            ok: true,
            input: input.into(),
            normalized: normalized.into(),
            classification,
            request,
            family: None,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Error output for anything that is not a validation failure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorJsonOutput {
    pub schema_version: u8,
    pub ok: bool,
    pub kind: String,
    pub code: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationFailureJson>,
}

impl ErrorJsonOutput {
    fn with_kind(kind: &str, code: &str, error: impl Into<String>, input: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            ok: false,
            kind: kind.to_string(),
            code: code.to_string(),
            error: error.into(),
            input,
            validation: None,
        }
    }

    pub fn new(error: impl Into<String>) -> Self {
        Self::with_kind("InternalError", "E_INTERNAL", error, None)
    }

    pub fn with_input(error: impl Into<String>, input: impl Into<String>) -> Self {
        Self::with_kind("InternalError", "E_INTERNAL", error, Some(input.into()))
    }

    /// Structural error: the validator (or an extraction gap) rejected the input.
    pub fn structural(failure: ValidationFailureJson, input: impl Into<String>) -> Self {
        let mut out = Self::with_kind(
            "StructuralError",
            "E_STRUCTURE",
            failure.user_message.clone(),
            Some(input.into()),
        );
        out.validation = Some(failure);
        out
    }

    /// No operation pattern matched for the chosen family.
    pub fn operation_not_identified(message: impl Into<String>, input: impl Into<String>) -> Self {
        Self::with_kind(
            "OperationNotIdentified",
            "E_ROUTE",
            message,
            Some(input.into()),
        )
    }

    /// Forwarded verbatim from the algebra backend.
    pub fn backend(message: impl Into<String>, input: impl Into<String>) -> Self {
        Self::with_kind("BackendError", "E_BACKEND", message, Some(input.into()))
    }
}

// =============================================================================
// History
// =============================================================================

/// One line of the solve history log. Write-only from the engine's side.
///
/// `classification` is absent when validation rejected the input before the
/// classifier ran.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationJson>,
    pub latency_us: u64,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_classification() -> ClassificationJson {
        ClassificationJson {
            problem_type: "calculus_integral".to_string(),
            operation: "integrate".to_string(),
            confidence: 0.9,
            variables: vec!["x".to_string()],
            solve_for: Some("x".to_string()),
            limits: None,
        }
    }

    #[test]
    fn test_validation_failure_field_names() {
        let v = ValidationFailureJson::new(
            "missing_differential",
            "Integral is missing its differential",
            "Did you mean to include \"dx\"?",
            "Example: \\int x^2 dx",
        );
        let json = serde_json::to_value(&v).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["error_kind", "hint", "suggestion", "user_message", "valid"]
        );
        assert_eq!(json["valid"], false);
    }

    #[test]
    fn test_envelope_skips_empty_optionals() {
        let env = RouteEnvelope::new(
            "\\int x^{2}dx",
            "\\int x**2dx",
            sample_classification(),
            serde_json::json!({"op": "indefinite_integral"}),
        );
        let json = serde_json::to_string(&env).unwrap();
        assert!(json.contains("\"schema_version\":1"));
        assert!(!json.contains("limits"));
        assert!(!json.contains("family"));
    }

    #[test]
    fn test_structural_error_embeds_failure() {
        let v = ValidationFailureJson::new("empty_input", "Nothing to solve", "Type an expression", "x + 1 = 2");
        let err = ErrorJsonOutput::structural(v.clone(), "");
        assert_eq!(err.code, "E_STRUCTURE");
        assert_eq!(err.validation, Some(v));
    }

    #[test]
    fn test_history_record_round_trip() {
        let rec = HistoryRecord {
            input: "x + 3 = 0".to_string(),
            classification: Some(sample_classification()),
            latency_us: 42,
            success: true,
        };
        let line = serde_json::to_string(&rec).unwrap();
        let back: HistoryRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, rec);
    }
}
