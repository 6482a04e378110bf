//! Config command - validate a HotTrackConfig file

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use hottrack_core::HotTrackConfig;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Load a config file and report validation errors, if any
    Validate {
        /// Path to a HotTrackConfig YAML file
        path: PathBuf,
    },
}

impl ConfigCommand {
    pub fn execute(&self, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Validate { path } => execute_validate(path, format),
        }
    }
}

fn execute_validate(path: &std::path::Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(matches!(format, OutputFormat::Json));
    let config = HotTrackConfig::load(path)?;
    let errors = config.validate();

    if matches!(format, OutputFormat::Json) {
        let json = serde_json::json!({
            "path": path,
            "valid": errors.is_empty(),
            "errors": errors.iter().map(|e| serde_json::json!({
                "field": e.field,
                "message": e.message,
            })).collect::<Vec<_>>(),
        });
        formatter.print_json(&json);
    } else if errors.is_empty() {
        formatter.success(&format!("{} is valid", path.display()));
    } else {
        formatter.error(&format!("{} failed validation", path.display()));
        for error in &errors {
            formatter.info(&format!("{}: {}", error.field, error.message));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("configuration failed validation");
    }
}
