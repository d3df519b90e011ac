//! Manual edits of the saved fund list.
use crate::core::FundRecord;
use crate::core::config::AppConfig;
use crate::core::numeric::coerce_amount;
use anyhow::{Context, Result};
use tracing::info;

/// Field changes for an existing fund; `None` leaves a field untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FundUpdate {
    pub rename: Option<String>,
    pub current_value: Option<f64>,
    pub expected_return: Option<f64>,
    pub target_percent: Option<f64>,
}

pub fn add(config: &mut AppConfig, fund: FundRecord) -> Result<()> {
    let name = fund.name.trim().to_string();
    config.add_fund(fund)?;
    info!(fund = %name, "Added fund");
    println!("Added fund '{name}'");
    Ok(())
}

pub fn remove(config: &mut AppConfig, name: &str) -> Result<()> {
    let removed = config.remove_fund(name)?;
    info!(fund = %removed.name, "Removed fund");
    println!("Removed fund '{}'", removed.name);
    Ok(())
}

pub fn update(config: &mut AppConfig, name: &str, update: FundUpdate) -> Result<()> {
    if let Some(new_name) = update.rename.as_deref().map(str::trim) {
        if new_name.is_empty() {
            anyhow::bail!("Fund name must not be empty");
        }
        if new_name != name && config.fund(new_name).is_some() {
            anyhow::bail!("Fund '{new_name}' already exists");
        }
    }

    let fund = config
        .fund_mut(name)
        .with_context(|| format!("No fund named '{name}'"))?;
    if let Some(value) = update.current_value {
        fund.current_value = coerce_amount(value);
    }
    if let Some(xirr) = update.expected_return {
        fund.expected_return = xirr;
    }
    if let Some(target) = update.target_percent {
        fund.target_percent = target;
    }
    if let Some(new_name) = update.rename {
        fund.name = new_name.trim().to_string();
    }

    info!(fund = %fund.name, "Updated fund");
    println!("Updated fund '{}'", fund.name);
    Ok(())
}

pub fn set_contribution(config: &mut AppConfig, amount: f64) {
    config.contribution = coerce_amount(amount);
    info!(contribution = config.contribution, "Updated contribution");
    println!(
        "Contribution set to {} {}",
        config.currency,
        super::ui::format_value(config.contribution)
    );
}
