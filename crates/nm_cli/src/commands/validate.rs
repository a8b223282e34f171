//! validate subcommand handler. Exit status 2 when the input is rejected.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use nm_engine::family::validation_hint;
use nm_engine::{preprocess, validate, ValidationResult};
use nm_parser::to_latex;

use super::InputArgs;
use crate::config::{NmConfig, OutputFormat};
use crate::format::{diagnostic_text, print_pretty_json, EXIT_STRUCTURAL};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct ValidOutput {
    valid: bool,
    hint: &'static str,
}

pub fn run(args: &ValidateArgs, config: &NmConfig) -> Result<ExitCode> {
    let text = args.input.text()?;
    let source = to_latex(&preprocess(&text, &config.pipeline_options()));
    let hint = validation_hint(args.input.note(config), &source);
    let format = args.input.format(config);

    match validate(&source, hint) {
        ValidationResult::Valid => {
            match format {
                OutputFormat::Json => print_pretty_json(&ValidOutput {
                    valid: true,
                    hint: hint.as_str(),
                }),
                OutputFormat::Text => println!("valid ({})", hint.as_str()),
            }
            Ok(ExitCode::SUCCESS)
        }
        ValidationResult::Invalid(d) => {
            match format {
                OutputFormat::Json => print_pretty_json(&d.to_json()),
                OutputFormat::Text => eprintln!("{}", diagnostic_text(&d)),
            }
            Ok(ExitCode::from(EXIT_STRUCTURAL))
        }
    }
}
