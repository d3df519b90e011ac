use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Serializes the saved state as pretty JSON.
pub fn to_json(config: &AppConfig) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to serialize portfolio")
}

/// Writes the state to `output`, or to stdout when no path is given.
pub fn run(config: &AppConfig, output: Option<&Path>) -> Result<()> {
    let json = to_json(config)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            info!(path = %path.display(), "Exported portfolio");
            println!("Exported {} fund(s) to {}", config.funds.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
