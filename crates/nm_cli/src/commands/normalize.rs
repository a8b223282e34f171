//! normalize subcommand handler: both rewrite stages, nothing else.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use nm_engine::preprocess;
use nm_parser::{normalize, to_latex};

use super::InputArgs;
use crate::config::{NmConfig, OutputFormat};
use crate::format::print_pretty_json;

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the LaTeX view (glyphs rewritten) instead of canonical syntax
    #[arg(long, default_value_t = false)]
    pub latex: bool,
}

#[derive(Serialize)]
struct NormalizeOutput {
    input: String,
    latex: String,
    normalized: String,
}

pub fn run(args: &NormalizeArgs, config: &NmConfig) -> Result<ExitCode> {
    let text = args.input.text()?;
    let latex = to_latex(&preprocess(&text, &config.pipeline_options()));
    let normalized = normalize(&latex);

    match args.input.format(config) {
        OutputFormat::Json => print_pretty_json(&NormalizeOutput {
            input: text,
            latex,
            normalized: normalized.into_string(),
        }),
        OutputFormat::Text if args.latex => println!("{latex}"),
        OutputFormat::Text => println!("{normalized}"),
    }
    Ok(ExitCode::SUCCESS)
}
