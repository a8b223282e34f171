//! route subcommand handler.
//!
//! Runs the whole pipeline and prints the solve request. Exit status tells
//! scripts what happened: 0 routed, 2 structural error, 3 no route.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use nm_engine::Pipeline;

use super::InputArgs;
use crate::config::{NmConfig, OutputFormat};
use crate::format::{error_json, error_text, exit_code, print_pretty_json, routed_text};

#[derive(Args, Debug)]
pub struct RouteArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: &RouteArgs, config: &NmConfig, pipeline: &Pipeline) -> Result<ExitCode> {
    let text = args.input.text()?;
    let note = args.input.note(config);
    let format = args.input.format(config);

    match pipeline.route(&text, note) {
        Ok(routed) => {
            match format {
                OutputFormat::Json => print_pretty_json(&routed.to_envelope()),
                OutputFormat::Text => println!("{}", routed_text(&routed)),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            match format {
                OutputFormat::Json => print_pretty_json(&error_json(&err, &text)),
                OutputFormat::Text => eprintln!("{}", error_text(&err)),
            }
            Ok(exit_code(&err))
        }
    }
}
