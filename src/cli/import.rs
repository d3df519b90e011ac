use super::ui;
use crate::core::config::AppConfig;
use crate::core::{FundRecord, analytics, statement};
use crate::readers;
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::path::Path;
use tracing::{info, warn};

/// Reads a broker statement and returns the normalized holdings.
pub async fn load_statement(path: &Path) -> Result<Vec<FundRecord>> {
    let rows = readers::read_rows(path)
        .await
        .with_context(|| format!("Failed to import {}", path.display()))?;
    let records = statement::normalize(&rows)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    info!(count = records.len(), path = %path.display(), "Imported statement");
    Ok(records)
}

/// Replaces the funds in `config` with the statement's holdings, keeping
/// targets of funds that were already tracked. Returns the merged list.
pub async fn run(config: &mut AppConfig, path: &Path) -> Result<Vec<FundRecord>> {
    let imported = load_statement(path).await?;
    if imported.is_empty() {
        warn!(path = %path.display(), "Statement did not contain any holdings");
    }

    config.funds = analytics::merge_imported(&config.funds, imported);
    println!("{}", display_imported(&config.funds, &config.currency));
    Ok(config.funds.clone())
}

pub fn display_imported(funds: &[FundRecord], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Fund Name"),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell("XIRR"),
        ui::header_cell("Target %"),
    ]);

    for (index, fund) in funds.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&fund.name),
            ui::number_cell(format!("{:.2}", fund.current_value)),
            ui::number_cell(format!("{:.2}%", fund.expected_return)),
            ui::number_cell(format!("{}%", fund.target_percent)),
        ]);
    }

    format!(
        "{}\n\n{table}\n\nImported {} fund(s). Set targets with `sipbal fund set <name> --target <percent>`.",
        ui::style_text("Imported Holdings", ui::StyleType::Title),
        funds.len()
    )
}
