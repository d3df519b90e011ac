use super::ui;
use crate::core::allocation::{AllocationPlan, allocate};
use crate::core::analytics;
use crate::core::config::AppConfig;
use crate::core::numeric::coerce_amount;
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::info;

impl AllocationPlan {
    pub fn display_as_table(&self, currency: &str, average_return: f64) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("#"),
            ui::header_cell("Fund Name"),
            ui::header_cell("Current %"),
            ui::header_cell("XIRR"),
            ui::header_cell(&format!("Invest ({currency})")),
        ]);

        for (index, allocation) in self.allocations.iter().enumerate() {
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&allocation.fund.name),
                ui::number_cell(format!("{:.1}%", allocation.current_share_percent)),
                ui::number_cell(format!("{}%", allocation.fund.expected_return)),
                ui::amount_cell(format!(
                    "{currency} {}",
                    ui::format_amount(allocation.invest_amount)
                )),
            ]);
        }

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Allocation Plan", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{} {}",
            ui::style_text("Total Investment:", ui::StyleType::TotalLabel),
            ui::style_text(
                &format!("{currency} {}", ui::format_amount(self.total_invested)),
                ui::StyleType::TotalValue
            )
        ));

        let average = format!("Portfolio Avg XIRR: {average_return:.2}%");
        let average_style = if average_return >= 0.0 {
            ui::StyleType::TotalValue
        } else {
            ui::StyleType::Error
        };
        output.push_str(&format!("\n{}", ui::style_text(&average, average_style)));
        output
    }
}

/// Computes the plan for the saved funds. `contribution` overrides the saved
/// amount for this run only.
pub fn build(config: &AppConfig, contribution: Option<f64>) -> Result<AllocationPlan> {
    let contribution = coerce_amount(contribution.unwrap_or(config.contribution));
    let plan = allocate(&config.funds, contribution)
        .context("Cannot compute an allocation plan")?;
    info!(
        contribution,
        total_invested = plan.total_invested,
        "Computed allocation plan"
    );
    Ok(plan)
}

pub fn run(config: &AppConfig, contribution: Option<f64>, json: bool) -> Result<()> {
    let plan = build(config, contribution)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        let average_return = analytics::weighted_return(&config.funds);
        println!("{}", plan.display_as_table(&config.currency, average_return));
    }
    Ok(())
}
