use super::ui;
use crate::app::App;
use crate::core::format::{format_currency, format_large_number};
use crate::core::market::{PriceRange, SortKey};
use anyhow::Result;
use comfy_table::Cell;

const COLUMNS: [(&str, Option<SortKey>); 7] = [
    ("#", Some(SortKey::Rank)),
    ("Coin", None),
    ("Price", Some(SortKey::Price)),
    ("24h %", Some(SortKey::Change24h)),
    ("Market Cap", Some(SortKey::MarketCap)),
    ("Portfolio", None),
    ("Value", None),
];

fn describe_range(range: &PriceRange) -> Option<String> {
    if range.is_unbounded() {
        return None;
    }
    let min = format_currency(range.min.unwrap_or(0.0));
    let max = range.max.map_or_else(|| "∞".to_string(), format_currency);
    Some(format!("{min} - {max}"))
}

/// Renders the filtered, sorted market table with holdings and totals.
pub fn render(app: &App) -> String {
    let market = app.market();
    let sort = market.sort();
    let mut output = format!(
        "{}\n",
        ui::style_text("Cryptocurrency Market", ui::StyleType::Title)
    );

    let mut summary = format!(
        "Showing {} of {} assets",
        market.visible().len(),
        market.assets().len()
    );
    if let Some(range) = describe_range(&market.range()) {
        summary.push_str(&format!(" priced {range}"));
    }
    output.push_str(&ui::style_text(&summary, ui::StyleType::Subtle));
    output.push('\n');

    if let Some(error) = app.error() {
        output.push_str(&format!("\n{}\n", ui::style_text(error, ui::StyleType::Error)));
        return output;
    }

    if market.visible().is_empty() {
        if !market.assets().is_empty() {
            output.push_str("\nNo assets in that price range. Try widening the filter.\n");
        }
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(COLUMNS.iter().map(|(name, key)| {
        let label = match key {
            Some(k) if *k == sort.key => format!("{name} {}", sort.direction.arrow()),
            _ => name.to_string(),
        };
        ui::header_cell(&label)
    }));

    for asset in market.visible() {
        let amount = app.portfolio().map_or(0.0, |p| p.amount(&asset.id));
        let (amount_cell, value_cell) = if amount > 0.0 {
            (
                ui::number_cell(amount.to_string()),
                ui::number_cell(format_currency(amount * asset.current_price)),
            )
        } else {
            (ui::number_cell("-".into()), ui::number_cell("".into()))
        };
        table.add_row(vec![
            ui::number_cell(asset.market_cap_rank.to_string()),
            Cell::new(format!("{} ({})", asset.name, asset.symbol.to_uppercase())),
            ui::number_cell(format_currency(asset.current_price)),
            ui::change_cell(asset.price_change_pct_24h),
            ui::number_cell(format_large_number(asset.market_cap)),
            amount_cell,
            value_cell,
        ]);
    }
    output.push_str(&table.to_string());
    output.push('\n');
    output.push_str(&super::portfolio::render_summary(app));
    output
}

/// Refreshes the list, applies filter and sort steps, and prints the table.
pub async fn run(app: &mut App, range: PriceRange, sorts: &[SortKey]) -> Result<()> {
    let pb = ui::new_spinner("Loading market data...");
    let refreshed = app.refresh().await;
    pb.finish_and_clear();

    app.set_price_range(range);
    for key in sorts {
        app.sort_by(*key);
    }
    println!("{}", render(app));
    refreshed?;
    Ok(())
}
