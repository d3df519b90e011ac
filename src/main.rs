use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use sipbal::cli::funds::FundUpdate;
use sipbal::core::FundRecord;
use sipbal::core::log::init_logging;
use sipbal::core::numeric::clean_number;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show how to split the contribution across funds
    Plan {
        /// Use this amount instead of the saved contribution
        #[arg(long)]
        contribution: Option<String>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display current versus target allocation
    Alloc,
    /// Import holdings from a broker statement (.csv, .xlsx, .xls)
    Import {
        file: PathBuf,
        /// Only show the parsed holdings, do not save them
        #[arg(long)]
        dry_run: bool,
    },
    /// Add, remove or edit funds
    Fund {
        #[command(subcommand)]
        action: FundAction,
    },
    /// Set the amount invested every cycle
    Contribution { amount: String },
    /// Export the saved portfolio as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum FundAction {
    /// Add a new fund
    Add {
        name: String,
        /// Current value held
        #[arg(long, default_value = "0")]
        value: String,
        /// XIRR in percent
        #[arg(long, default_value = "0")]
        xirr: String,
        /// Target share in percent
        #[arg(long, default_value = "0")]
        target: String,
    },
    /// Remove a fund
    Remove { name: String },
    /// Change fields of an existing fund
    Set {
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        xirr: Option<String>,
        #[arg(long)]
        target: Option<String>,
    },
}

impl From<Commands> for sipbal::AppCommand {
    fn from(cmd: Commands) -> sipbal::AppCommand {
        match cmd {
            Commands::Plan { contribution, json } => sipbal::AppCommand::Plan {
                contribution: contribution.as_deref().map(clean_number),
                json,
            },
            Commands::Alloc => sipbal::AppCommand::Alloc,
            Commands::Import { file, dry_run } => sipbal::AppCommand::Import { file, dry_run },
            Commands::Fund { action } => action.into(),
            Commands::Contribution { amount } => {
                sipbal::AppCommand::SetContribution(clean_number(&amount))
            }
            Commands::Export { output } => sipbal::AppCommand::Export { output },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

impl From<FundAction> for sipbal::AppCommand {
    fn from(action: FundAction) -> sipbal::AppCommand {
        match action {
            FundAction::Add {
                name,
                value,
                xirr,
                target,
            } => sipbal::AppCommand::AddFund(FundRecord::new(
                name,
                clean_number(&value),
                clean_number(&xirr),
                clean_number(&target),
            )),
            FundAction::Remove { name } => sipbal::AppCommand::RemoveFund(name),
            FundAction::Set {
                name,
                rename,
                value,
                xirr,
                target,
            } => sipbal::AppCommand::UpdateFund {
                name,
                update: FundUpdate {
                    rename,
                    current_value: value.as_deref().map(clean_number),
                    expected_return: xirr.as_deref().map(clean_number),
                    target_percent: target.as_deref().map(clean_number),
                },
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => sipbal::cli::setup::setup_at_path(path),
            None => sipbal::cli::setup::setup(),
        },
        Some(cmd) => sipbal::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
