use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::OutputOptions;
use crate::cli::renderer;
use crate::core::billing::CostClient;
use crate::core::config::AppConfig;
use crate::core::notify::Notifier;
use crate::core::report;

/// Run the report pipeline: fetch yesterday's cost, apply the skip
/// threshold, fetch the monthly forecast, then deliver (or render, for dry
/// runs). All network calls are sequential.
pub async fn run(config_path: Option<&Path>, dry_run: bool, opts: &OutputOptions) -> Result<()> {
    let config = AppConfig::load(config_path).context("failed to load config")?;
    let debug = config.settings.debug || opts.verbose;

    let client = CostClient::new(&config.aws).await;

    let daily = client
        .yesterday_cost()
        .await
        .context("failed to fetch yesterday's cost")?;

    if debug {
        eprintln!(
            "[debug] yesterday's total: ${:.6} {} across {} services",
            daily.total_cost,
            daily.currency,
            daily.services.len()
        );
    }

    if report::below_reporting_threshold(daily.total_cost) {
        println!(
            "Yesterday's cost ${:.4} is below the ${:.2} reporting threshold, skipping notification",
            daily.total_cost,
            report::MIN_REPORTABLE_COST
        );
        return Ok(());
    }

    let monthly = client
        .monthly_forecast()
        .await
        .context("failed to fetch the monthly forecast")?;

    if debug {
        eprintln!(
            "[debug] month to date: ${:.6}, forecast: ${:.6} {}",
            monthly.month_to_date, monthly.forecast, monthly.currency
        );
    }

    if dry_run {
        println!(
            "{}",
            renderer::render_report(&daily, &monthly, opts.use_color)
        );
        println!();
        println!("Dry run, skipping delivery");
        return Ok(());
    }

    let notifier = Notifier::from_settings(&config.slack);
    let message = report::build_message(&daily, &monthly);
    notifier
        .send(&message)
        .await
        .context("failed to deliver the cost report")?;

    if notifier.is_enabled() {
        println!("Posted AWS cost report to Slack");
    } else {
        println!("Notifications are disabled, cost report not delivered");
    }

    Ok(())
}
