//! classify subcommand handler: classifier and extractor output, no routing.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use nm_api_models::{ClassificationJson, SCHEMA_VERSION};
use nm_engine::family::resolve_family;
use nm_engine::{classify, extract, preprocess, Classification};
use nm_parser::to_latex;

use super::InputArgs;
use crate::config::{NmConfig, OutputFormat};
use crate::format::{classification_text, print_pretty_json};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct ClassifyOutput {
    schema_version: u8,
    input: String,
    family: String,
    classification: ClassificationJson,
}

pub fn run(args: &ClassifyArgs, config: &NmConfig) -> Result<ExitCode> {
    let text = args.input.text()?;
    let source = to_latex(&preprocess(&text, &config.pipeline_options()));

    let output = classify(&source);
    let extraction = extract(&source, &output);
    let classification = Classification::from_parts(output, &extraction);
    let family = resolve_family(args.input.note(config), &source, classification.problem_type);
    let json = classification.to_json();

    match args.input.format(config) {
        OutputFormat::Json => print_pretty_json(&ClassifyOutput {
            schema_version: SCHEMA_VERSION,
            input: text,
            family: family.as_str().to_string(),
            classification: json,
        }),
        OutputFormat::Text => {
            println!("{}", classification_text(&json));
            println!("family:       {family}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
