use colored::{control, Colorize};

use crate::core::models::cost::{DailyCostSummary, MonthlyCostSummary};
use crate::core::models::message::Color;
use crate::core::report::MAX_SERVICE_FIELDS;

/// Render the cost report as a terminal block (dry runs and verbose mode).
///
/// Layout:
/// ```text
///  Yesterday (2026-08-05)   $123.45 USD
///   AmazonEC2                $61.20
///   AmazonRDS                $30.87
///
///  This month
///   Month to date            $812.55 USD
///   Forecast                 $1204.90 USD
/// ```
pub fn render_report(
    daily: &DailyCostSummary,
    monthly: &MonthlyCostSummary,
    use_color: bool,
) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();

    let header = format!(" Yesterday ({})", daily.date);
    lines.push(format!(
        "{}   {}",
        header.bold(),
        paint_amount(daily.total_cost, &daily.currency)
    ));
    for entry in daily.services.iter().take(MAX_SERVICE_FIELDS) {
        lines.push(format!("  {:<24} ${:.2}", entry.service, entry.cost));
    }
    let hidden = daily.services.len().saturating_sub(MAX_SERVICE_FIELDS);
    if hidden > 0 {
        lines.push(format!("  ({hidden} more services not shown)"));
    }

    lines.push(String::new());
    lines.push(" This month".bold().to_string());
    lines.push(format!(
        "  {:<24} {}",
        "Month to date",
        paint_amount(monthly.month_to_date, &monthly.currency)
    ));
    lines.push(format!(
        "  {:<24} ${:.2} {}",
        "Forecast", monthly.forecast, monthly.currency
    ));

    lines.join("\n")
}

fn paint_amount(amount: f64, currency: &str) -> String {
    let text = format!("${:.2} {}", amount, currency);
    match Color::for_amount(amount) {
        Color::Danger => text.red().to_string(),
        Color::Warning => text.yellow().to_string(),
        Color::Good => text.green().to_string(),
    }
}
