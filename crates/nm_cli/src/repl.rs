use rustyline::error::ReadlineError;

use nm_engine::{NoteType, Pipeline};

use crate::completer::NmHelper;
use crate::config::OutputFormat;
use crate::format::{error_json, error_text, routed_text};

const HELP: &str = "\
Type recognized math text to route it, e.g. \\int x^{2}dx or d/dx(x^3).
Commands:
  :hint <note>   set the note type (algebra, calculus, physics, trigonometry,
                 statistics, linear_algebra, auto)
  :json / :text  switch output format
  :help          show this message
  quit, exit     leave";

pub struct Repl {
    pipeline: Pipeline,
    note: NoteType,
    format: OutputFormat,
}

impl Repl {
    pub fn new(pipeline: Pipeline, note: NoteType, format: OutputFormat) -> Self {
        Self {
            pipeline,
            note,
            format,
        }
    }

    fn build_prompt(&self) -> String {
        match self.note {
            NoteType::Auto => "nm> ".to_string(),
            note => format!("nm[{note}]> "),
        }
    }

    /// Process one line. `None` means the session should end.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        match line {
            "quit" | "exit" => return None,
            ":help" | "help" => return Some(HELP.to_string()),
            ":json" => {
                self.format = OutputFormat::Json;
                return Some("output: json".to_string());
            }
            ":text" => {
                self.format = OutputFormat::Text;
                return Some("output: text".to_string());
            }
            _ => {}
        }
        if let Some(arg) = line.strip_prefix(":hint") {
            self.note = NoteType::parse(arg);
            return Some(format!("note type: {}", self.note));
        }

        let out = match (self.pipeline.route(line, self.note), self.format) {
            (Ok(routed), OutputFormat::Text) => routed_text(&routed),
            (Ok(routed), OutputFormat::Json) => to_json(&routed.to_envelope()),
            (Err(err), OutputFormat::Text) => error_text(&err),
            (Err(err), OutputFormat::Json) => to_json(&error_json(&err, line)),
        };
        Some(out)
    }

    pub fn run(&mut self) -> rustyline::Result<()> {
        println!("Handwritten math router. Type :help for commands.");

        let config = rustyline::Config::builder()
            .max_history_size(100)?
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut rl =
            rustyline::Editor::<NmHelper, rustyline::history::DefaultHistory>::with_config(
                config,
            )?;
        rl.set_helper(Some(NmHelper::new()));

        loop {
            match rl.readline(&self.build_prompt()) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.trim())?;
                    match self.handle_line(&line) {
                        Some(out) => println!("{out}"),
                        None => break,
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err:?}");
                    break;
                }
            }
        }
        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("serialization error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl() -> Repl {
        Repl::new(Pipeline::new(), NoteType::Auto, OutputFormat::Text)
    }

    #[test]
    fn test_commands() {
        let mut r = repl();
        assert_eq!(r.handle_line(":hint stats").as_deref(), Some("note type: statistics"));
        assert_eq!(r.build_prompt(), "nm[statistics]> ");
        assert_eq!(r.handle_line(":json").as_deref(), Some("output: json"));
        assert!(r.handle_line("quit").is_none());
    }

    #[test]
    fn test_routes_expressions() {
        let mut r = repl();
        let out = r.handle_line("d/dx(x^3)").unwrap();
        assert!(out.contains("family:     calculus"));

        r.handle_line(":json");
        let out = r.handle_line("\\int x^{2}").unwrap();
        assert!(out.contains("\"error_kind\": \"missing_differential\""));
    }
}
