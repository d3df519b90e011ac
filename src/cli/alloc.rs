use super::ui;
use crate::core::allocation::targets_balanced;
use crate::core::analytics::{self, AllocationShare};
use crate::core::config::AppConfig;
use anyhow::Result;
use comfy_table::Cell;

pub fn run(config: &AppConfig) -> Result<()> {
    println!("{}", display_allocation_table(config));
    Ok(())
}

/// Renders the current allocation next to the target allocation.
pub fn display_allocation_table(config: &AppConfig) -> String {
    let currency = &config.currency;
    let shares = analytics::allocation_breakdown(&config.funds);
    let total_value = analytics::total_value(&config.funds);
    let total_target = analytics::total_target(&config.funds);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Fund Name"),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell("XIRR"),
        ui::header_cell("Current %"),
        ui::header_cell("Target %"),
        ui::header_cell("Drift"),
    ]);

    for (index, (share, fund)) in shares.iter().zip(&config.funds).enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&share.name),
            ui::number_cell(ui::format_value(share.current_value)),
            ui::number_cell(format!("{}%", fund.expected_return)),
            ui::number_cell(current_label(share, total_value)),
            ui::number_cell(format!("{}%", share.target_percent)),
            drift_cell(share, total_value),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Current vs Target Allocation", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    output.push_str(&format!(
        "\n\n{} {}",
        ui::style_text(&format!("Total Value ({currency}):"), ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_value(total_value), ui::StyleType::TotalValue)
    ));

    let target_style = if targets_balanced(total_target) {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Error
    };
    output.push_str(&format!(
        "\n{} {}",
        ui::style_text("Total Target:", ui::StyleType::TotalLabel),
        ui::style_text(&format!("{total_target:.2}%"), target_style)
    ));
    output.push_str(&format!(
        "\n{} {}",
        ui::style_text("Contribution:", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{currency} {}", ui::format_value(config.contribution)),
            ui::StyleType::Subtle
        )
    ));
    output.push_str(&format!(
        "\nPortfolio Avg XIRR: {:.2}%",
        analytics::weighted_return(&config.funds)
    ));
    output
}

fn current_label(share: &AllocationShare, total_value: f64) -> String {
    if total_value > 0.0 {
        format!("{:.1}%", share.current_percent)
    } else {
        "N/A".to_string()
    }
}

fn drift_cell(share: &AllocationShare, total_value: f64) -> Cell {
    if total_value > 0.0 {
        ui::change_cell(share.drift)
    } else {
        Cell::new("N/A")
    }
}
