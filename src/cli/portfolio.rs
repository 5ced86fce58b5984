use super::ui;
use crate::app::App;
use crate::core::format::format_currency;
use crate::core::portfolio::parse_amount;
use anyhow::Result;
use comfy_table::Cell;
use tracing::warn;

/// Footer with held-asset count and total value; empty when nothing is held.
pub fn render_summary(app: &App) -> String {
    let Some(portfolio) = app.portfolio() else {
        return match app.portfolio_error() {
            Some(e) => format!(
                "\n{}\n",
                ui::style_text(&format!("Portfolio unavailable: {e}"), ui::StyleType::Error)
            ),
            None => String::new(),
        };
    };
    if !portfolio.has_holdings() {
        return String::new();
    }
    format!(
        "\n{} {}   {} {}\n",
        ui::style_text("Total Coins:", ui::StyleType::TotalLabel),
        portfolio.held_count(),
        ui::style_text("Total Value:", ui::StyleType::TotalLabel),
        ui::style_text(&format_currency(app.portfolio_value()), ui::StyleType::TotalValue),
    )
}

/// Per-holding breakdown against the current list.
pub fn render_holdings(app: &App) -> String {
    let Some(portfolio) = app.portfolio() else {
        return render_summary(app);
    };
    if !portfolio.has_holdings() {
        return "Portfolio is empty.\n".to_string();
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Coin"),
        ui::header_cell("Amount"),
        ui::header_cell("Price"),
        ui::header_cell("Value"),
    ]);
    for (id, amount) in portfolio.holdings().iter().filter(|(_, a)| **a > 0.0) {
        match app.market().find(id) {
            Some(asset) => table.add_row(vec![
                Cell::new(&asset.name),
                ui::number_cell(amount.to_string()),
                ui::number_cell(format_currency(asset.current_price)),
                ui::number_cell(format_currency(portfolio.value_of(asset))),
            ]),
            None => table.add_row(vec![
                Cell::new(id),
                ui::number_cell(amount.to_string()),
                ui::number_cell("N/A".into()),
                ui::number_cell(format_currency(0.0)),
            ]),
        };
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Portfolio Summary", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push('\n');
    output.push_str(&render_summary(app));
    output
}

pub fn set(app: &mut App, id: &str, raw_amount: &str) -> Result<()> {
    if parse_amount(raw_amount) == 0.0 && !raw_amount.trim().is_empty() {
        warn!("'{}' is not a valid amount, storing 0", raw_amount);
    }
    app.edit_amount(id, raw_amount)?;
    let amount = app.portfolio().map_or(0.0, |p| p.amount(id));
    println!("Holding of {id} set to {amount}");
    Ok(())
}

pub fn clear(app: &mut App) -> Result<()> {
    app.clear_portfolio()?;
    println!("Portfolio cleared");
    Ok(())
}

/// Values the portfolio against a freshly fetched list.
pub async fn show(app: &mut App) -> Result<()> {
    let pb = ui::new_spinner("Loading market data...");
    let refreshed = app.refresh().await;
    pb.finish_and_clear();

    if let Some(error) = app.error() {
        println!("{}", ui::style_text(error, ui::StyleType::Error));
    }
    println!("{}", render_holdings(app));
    refreshed?;
    Ok(())
}
