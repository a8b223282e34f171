//! Request Router
//!
//! Each family owns an ordered chain of `(name, matcher)` entries. The first
//! matcher returning `Some` decides the request; later entries in a chain are
//! alternate notations, not alternate operations. When a chain is exhausted
//! the family's gap detector decides between an extraction gap (a structural
//! diagnostic naming the missing part) and a plain routing miss.

pub mod algebra;
pub mod calculus;
pub mod ibp;
pub mod linear_algebra;
pub mod physics;
pub mod statistics;
pub mod trig;

use nm_parser::NormalizedExpression;

use crate::classify::Classification;
use crate::error::RouteError;
use crate::extract::Extraction;
use crate::family::RouteFamily;
use crate::request::SolveRequest;
use crate::validate::Diagnostic;

/// Everything a matcher may look at.
///
/// `source` is the LaTeX view of the input (Unicode glyphs rewritten, nothing
/// else); structural patterns match there and normalize what they capture.
#[derive(Debug, Clone)]
pub struct RouteInput<'a> {
    pub source: &'a str,
    pub normalized: &'a NormalizedExpression,
    pub classification: &'a Classification,
    pub extraction: &'a Extraction,
    lower: String,
}

impl<'a> RouteInput<'a> {
    pub fn new(
        source: &'a str,
        normalized: &'a NormalizedExpression,
        classification: &'a Classification,
        extraction: &'a Extraction,
    ) -> Self {
        Self {
            source,
            normalized,
            classification,
            extraction,
            lower: source.to_lowercase(),
        }
    }

    /// Lowercased `source`, for keyword checks.
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Target variable from the extractor, falling back to `x`.
    pub fn var_or_x(&self) -> String {
        self.extraction
            .solve_for
            .clone()
            .unwrap_or_else(|| "x".to_string())
    }
}

pub type Matcher = fn(&RouteInput<'_>) -> Option<SolveRequest>;

/// Ordered chain of named matchers.
pub type Chain = &'static [(&'static str, Matcher)];

type GapDetector = fn(&RouteInput<'_>) -> Option<Diagnostic>;

fn chain_for(family: RouteFamily) -> (Chain, GapDetector) {
    match family {
        RouteFamily::Algebra => (algebra::CHAIN, algebra::gap),
        RouteFamily::Calculus => (calculus::CHAIN, calculus::gap),
        RouteFamily::Physics => (physics::CHAIN, physics::gap),
        RouteFamily::Trigonometry => (trig::CHAIN, trig::gap),
        RouteFamily::Statistics => (statistics::CHAIN, statistics::gap),
        RouteFamily::LinearAlgebra => (linear_algebra::CHAIN, linear_algebra::gap),
    }
}

/// Run the first matching entry of `chain`. Returns the entry name alongside
/// the request.
pub fn run_chain(chain: Chain, input: &RouteInput<'_>) -> Option<(&'static str, SolveRequest)> {
    chain
        .iter()
        .find_map(|(name, matcher)| matcher(input).map(|req| (*name, req)))
}

pub fn route(family: RouteFamily, input: &RouteInput<'_>) -> Result<SolveRequest, RouteError> {
    let (chain, gap) = chain_for(family);

    if let Some((entry, request)) = run_chain(chain, input) {
        tracing::debug!(
            target: "route",
            family = %family,
            entry,
            op = request.op_name(),
            "chain matched"
        );
        return Ok(request);
    }

    if let Some(diagnostic) = gap(input) {
        tracing::warn!(target: "route", family = %family, kind = %diagnostic.kind, "extraction gap");
        return Err(RouteError::Gap(diagnostic));
    }

    tracing::warn!(target: "route", family = %family, "no route matched");
    Err(RouteError::NoMatch {
        family,
        detail: format!("no {family} pattern matched \"{}\"", input.source),
    })
}

pub(crate) fn warm_up() {
    calculus::warm_up();
    ibp::warm_up();
    algebra::warm_up();
    trig::warm_up();
    statistics::warm_up();
    linear_algebra::warm_up();
    physics::warm_up();
}

#[cfg(test)]
pub(crate) mod test_support {
    use nm_parser::{normalize, to_latex};

    use super::*;
    use crate::classify::classify;
    use crate::extract::extract;

    /// Run the front half of the pipeline and route into `family`.
    pub fn route_text(family: RouteFamily, raw: &str) -> Result<SolveRequest, RouteError> {
        let source = to_latex(raw);
        let normalized = normalize(&source);
        let output = classify(&source);
        let extraction = extract(&source, &output);
        let classification = Classification::from_parts(output, &extraction);
        let input = RouteInput::new(&source, &normalized, &classification, &extraction);
        route(family, &input)
    }
}
