use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

const COMMANDS: &[&str] = &[":hint", ":json", ":text", ":help", "quit", "exit"];

const NOTE_TYPES: &[&str] = &[
    "algebra",
    "calculus",
    "physics",
    "trigonometry",
    "statistics",
    "linear_algebra",
    "auto",
];

pub struct NmHelper;

impl NmHelper {
    pub fn new() -> Self {
        Self
    }

    fn candidates(line: &str, pos: usize) -> (usize, Vec<&'static str>) {
        let line = &line[..pos];
        if let Some(rest) = line.strip_prefix(":hint ") {
            let start = pos - rest.len();
            let found = NOTE_TYPES
                .iter()
                .copied()
                .filter(|n| n.starts_with(rest))
                .collect();
            return (start, found);
        }
        if line.contains(' ') {
            return (pos, Vec::new());
        }
        let found = COMMANDS
            .iter()
            .copied()
            .filter(|c| c.starts_with(line))
            .collect();
        (0, found)
    }
}

impl Completer for NmHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let (start, found) = Self::candidates(line, pos);
        let pairs = found
            .into_iter()
            .map(|c| Pair {
                display: c.to_string(),
                replacement: c.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for NmHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for NmHelper {}

impl Validator for NmHelper {}

impl Helper for NmHelper {}
