use super::ui;
use crate::app::App;
use crate::core::asset::{AssetDetail, ChartPoint};
use crate::core::format::{
    format_change, format_currency, format_large_number, format_max_supply, format_supply,
};
use anyhow::Result;
use comfy_table::Cell;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;

/// Draws chart points as a one-line sparkline, bucketed to `width` columns.
pub fn sparkline(points: impl Iterator<Item = ChartPoint>, width: usize) -> String {
    let ys: Vec<f64> = points.map(|p| p.y).filter(|y| y.is_finite()).collect();
    if ys.is_empty() || width == 0 {
        return String::new();
    }
    let bucket = ys.len().div_ceil(width);
    let samples: Vec<f64> = ys
        .chunks(bucket)
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect();
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    samples
        .iter()
        .map(|y| {
            if span <= 0.0 {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let idx = ((y - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

pub fn render(detail: &AssetDetail, holding: Option<f64>) -> String {
    let asset = &detail.asset;
    let symbol = asset.symbol.to_uppercase();
    let rank = if asset.market_cap_rank > 0 {
        format!("Rank #{}", asset.market_cap_rank)
    } else {
        "Unranked".to_string()
    };

    let mut output = format!(
        "{} {}  {}\n\n",
        ui::style_text(&asset.name, ui::StyleType::Title),
        symbol,
        ui::style_text(&rank, ui::StyleType::Subtle)
    );
    output.push_str(&format!(
        "Current Price: {}  {} (24h)\n\n",
        ui::style_text(&format_currency(asset.current_price), ui::StyleType::TotalValue),
        format_change(asset.price_change_pct_24h)
    ));

    output.push_str("Price Chart (7 Days)\n");
    if detail.chart.is_empty() {
        output.push_str(&ui::style_text("No chart data\n", ui::StyleType::Subtle));
    } else {
        output.push_str(&sparkline(detail.chart.points(), SPARK_WIDTH));
        output.push('\n');
        if let (Some(first), Some(last)) = (detail.chart.first_time(), detail.chart.last_time()) {
            output.push_str(&ui::style_text(
                &format!("{} → {}", first.format("%b %-d"), last.format("%b %-d")),
                ui::StyleType::Subtle,
            ));
            output.push('\n');
        }
    }
    output.push('\n');

    let mut stats = ui::new_styled_table();
    stats.set_header(vec![ui::header_cell("Statistic"), ui::header_cell("Value")]);
    let rows = [
        ("Market Cap", format_large_number(asset.market_cap)),
        ("24h Volume", format_large_number(detail.total_volume)),
        (
            "Circulating Supply",
            format!("{} {}", format_supply(detail.circulating_supply), symbol),
        ),
        ("Max Supply", {
            let max = format_max_supply(detail.max_supply);
            if max == "∞" { max } else { format!("{max} {symbol}") }
        }),
        ("All-Time High", format_currency(detail.ath_usd)),
        ("All-Time Low", format_currency(detail.atl_usd)),
    ];
    for (label, value) in rows {
        stats.add_row(vec![Cell::new(label), ui::number_cell(value)]);
    }
    output.push_str(&stats.to_string());
    output.push('\n');

    if let Some(amount) = holding.filter(|a| *a > 0.0) {
        output.push_str(&format!(
            "\nHolding: {amount} {symbol} = {}\n",
            ui::style_text(
                &format_currency(amount * asset.current_price),
                ui::StyleType::TotalValue
            )
        ));
    }

    if let Some(description) = detail.short_description(3) {
        output.push_str(&format!(
            "\nAbout {}\n{}\n",
            asset.name,
            strip_tags(&description)
        ));
    }

    let links: Vec<(&str, &String)> = [
        ("Website", detail.links.website.as_ref()),
        ("Explorer", detail.links.explorer.as_ref()),
        ("GitHub", detail.links.github.as_ref()),
    ]
    .into_iter()
    .filter_map(|(label, link)| link.map(|l| (label, l)))
    .collect();
    if !links.is_empty() {
        output.push_str("\nLinks\n");
        for (label, link) in links {
            output.push_str(&format!("  {label}: {link}\n"));
        }
    }
    output
}

/// Drops markup from the description fragment for terminal display.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub async fn run(app: &mut App, id: &str) -> Result<()> {
    let pb = ui::new_spinner("Loading asset detail...");
    let loaded = app.open_detail(id).await.map(|_| ());
    pb.finish_and_clear();

    if let Err(e) = loaded {
        if let Some(message) = app.error() {
            eprintln!("{}", ui::style_text(message, ui::StyleType::Error));
        }
        return Err(e.into());
    }

    let holding = app.portfolio().map(|p| p.amount(id));
    if let Some(detail) = app.selected() {
        println!("{}", render(detail, holding));
    }
    app.close_detail();
    Ok(())
}
