pub mod cli;
pub mod core;
pub mod readers;

use crate::cli::funds::FundUpdate;
use crate::core::FundRecord;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Commands that operate on a saved portfolio.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Compute how to split the contribution.
    Plan {
        contribution: Option<f64>,
        json: bool,
    },
    /// Show current versus target allocation.
    Alloc,
    /// Replace the funds with the holdings of a broker statement.
    Import { file: PathBuf, dry_run: bool },
    AddFund(FundRecord),
    RemoveFund(String),
    UpdateFund { name: String, update: FundUpdate },
    SetContribution(f64),
    Export { output: Option<PathBuf> },
}

impl AppCommand {
    fn modifies_state(&self) -> bool {
        match self {
            AppCommand::Import { dry_run, .. } => !dry_run,
            AppCommand::AddFund(_)
            | AppCommand::RemoveFund(_)
            | AppCommand::UpdateFund { .. }
            | AppCommand::SetContribution(_) => true,
            AppCommand::Plan { .. } | AppCommand::Alloc | AppCommand::Export { .. } => false,
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("SIP rebalancer starting...");

    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => AppConfig::default_config_path()?,
    };
    let mut config = AppConfig::load_from_path(&path)?;
    debug!("Loaded config: {config:#?}");

    let save = command.modifies_state();
    match command {
        AppCommand::Plan { contribution, json } => cli::plan::run(&config, contribution, json)?,
        AppCommand::Alloc => cli::alloc::run(&config)?,
        AppCommand::Import {
            file,
            dry_run: true,
        } => {
            let records = cli::import::load_statement(&file).await?;
            println!(
                "{}",
                cli::import::display_imported(&records, &config.currency)
            );
        }
        AppCommand::Import {
            file,
            dry_run: false,
        } => {
            cli::import::run(&mut config, &file).await?;
        }
        AppCommand::AddFund(fund) => cli::funds::add(&mut config, fund)?,
        AppCommand::RemoveFund(name) => cli::funds::remove(&mut config, &name)?,
        AppCommand::UpdateFund { name, update } => {
            cli::funds::update(&mut config, &name, update)?
        }
        AppCommand::SetContribution(amount) => cli::funds::set_contribution(&mut config, amount),
        AppCommand::Export { output } => cli::export::run(&config, output.as_deref())?,
    }

    if save {
        config.save_to_path(&path)?;
        info!(path = %path.display(), "Saved portfolio");
    }
    Ok(())
}
