//! Subcommand handlers.

pub mod classify;
pub mod normalize;
pub mod route;
pub mod validate;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Args;

use nm_engine::NoteType;

use crate::config::{NmConfig, OutputFormat};

/// Arguments every single-shot subcommand takes.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Recognized text to process (`-` reads standard input)
    pub expr: String,

    /// Note type: algebra, calculus, physics, trigonometry, statistics, linear_algebra, auto
    #[arg(long)]
    pub hint: Option<String>,

    /// Output format (overrides the config file)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl InputArgs {
    pub fn text(&self) -> Result<String> {
        if self.expr != "-" {
            return Ok(self.expr.clone());
        }
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading expression from stdin")?;
        Ok(buf)
    }

    pub fn note(&self, config: &NmConfig) -> NoteType {
        self.hint
            .as_deref()
            .map_or_else(|| config.note_type(), NoteType::parse)
    }

    pub fn format(&self, config: &NmConfig) -> OutputFormat {
        self.format.unwrap_or(config.output)
    }
}
