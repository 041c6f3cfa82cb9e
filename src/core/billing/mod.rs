pub mod period;

use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::config::Credentials;
use aws_sdk_costexplorer::error::SdkError;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity, GroupDefinition, GroupDefinitionType, Metric, ResultByTime,
};
use chrono::Local;
use thiserror::Error;

use crate::core::config::AwsSettings;
use crate::core::models::cost::{DailyCostSummary, MonthlyCostSummary, ServiceCost};
use self::period::{forecast_window, month_to_date_window, yesterday_window, DateWindow};

const UNBLENDED_COST: &str = "UnblendedCost";
const SERVICE_DIMENSION: &str = "SERVICE";

/// Ceiling on any single Cost Explorer round trip.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("transport failure during {0}: {1}")]
    Network(&'static str, String),
    #[error("Cost Explorer rejected {0}: {1}")]
    Api(&'static str, String),
    #[error("invalid query period for {0}: {1}")]
    Query(&'static str, aws_sdk_costexplorer::error::BuildError),
    #[error("malformed {0} amount {1:?} from Cost Explorer")]
    Amount(&'static str, String),
}

/// Split an SDK failure into transport vs. service error. Timeouts and
/// dispatch failures never reached the API; everything else did.
fn classify<E, R>(context: &'static str, err: SdkError<E, R>) -> BillingError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let transport = matches!(
        err,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)
    );
    let detail = format!("{:#}", anyhow::Error::new(err));
    if transport {
        BillingError::Network(context, detail)
    } else {
        BillingError::Api(context, detail)
    }
}

/// Client for the Cost Explorer API.
pub struct CostClient {
    inner: aws_sdk_costexplorer::Client,
}

impl CostClient {
    /// Build a client from settings. An empty region or credential pair
    /// falls back to the ambient AWS resolution chain.
    pub async fn new(settings: &AwsSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(OPERATION_TIMEOUT)
                .build(),
        );
        if !settings.region.is_empty() {
            loader = loader.region(Region::new(settings.region.clone()));
        }
        if let Some((key_id, secret)) = settings.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "costwatch-config",
            ));
        }
        let config = loader.load().await;
        Self {
            inner: aws_sdk_costexplorer::Client::new(&config),
        }
    }

    /// Total unblended cost for the day before today (local time), plus a
    /// per-service breakdown from a second query over the same period. The
    /// two queries stay separate because the API does not guarantee matching
    /// granularity between a flat total and a grouped result.
    pub async fn yesterday_cost(&self) -> Result<DailyCostSummary, BillingError> {
        let window = yesterday_window(Local::now().date_naive());
        let interval = date_interval("daily cost", &window)?;

        let total = self
            .inner
            .get_cost_and_usage()
            .time_period(interval.clone())
            .granularity(Granularity::Daily)
            .metrics(UNBLENDED_COST)
            .send()
            .await
            .map_err(|e| classify("the daily total query", e))?;
        let (total_cost, currency) = total_from_results("daily total", total.results_by_time())?;

        let grouped = self
            .inner
            .get_cost_and_usage()
            .time_period(interval)
            .granularity(Granularity::Daily)
            .metrics(UNBLENDED_COST)
            .group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key(SERVICE_DIMENSION)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| classify("the service breakdown query", e))?;
        let services = services_from_results(grouped.results_by_time());

        Ok(DailyCostSummary {
            date: window.start,
            total_cost,
            currency,
            services,
        })
    }

    /// Accumulated cost from the first of the month through today, plus the
    /// forecast for the remainder. The reported forecast is the sum of both.
    pub async fn monthly_forecast(&self) -> Result<MonthlyCostSummary, BillingError> {
        let today = Local::now().date_naive();

        let mtd_interval = date_interval("month-to-date", &month_to_date_window(today))?;
        let mtd = self
            .inner
            .get_cost_and_usage()
            .time_period(mtd_interval)
            .granularity(Granularity::Monthly)
            .metrics(UNBLENDED_COST)
            .send()
            .await
            .map_err(|e| classify("the month-to-date query", e))?;
        let (month_to_date, currency) =
            total_from_results("month-to-date total", mtd.results_by_time())?;

        let forecast_interval = date_interval("forecast", &forecast_window(today))?;
        let forecast = self
            .inner
            .get_cost_forecast()
            .time_period(forecast_interval)
            .granularity(Granularity::Monthly)
            .metric(Metric::UnblendedCost)
            .send()
            .await
            .map_err(|e| classify("the cost forecast query", e))?;
        let projected = match forecast.total() {
            Some(value) => parse_amount_strict("forecast total", value.amount())?,
            None => 0.0,
        };

        Ok(merge_monthly(month_to_date, projected, currency))
    }
}

/// The reported forecast is the full-month estimate: actuals so far plus
/// the projected remainder.
fn merge_monthly(month_to_date: f64, projected: f64, currency: String) -> MonthlyCostSummary {
    MonthlyCostSummary {
        month_to_date,
        forecast: month_to_date + projected,
        currency,
    }
}

fn date_interval(
    context: &'static str,
    window: &DateWindow,
) -> Result<DateInterval, BillingError> {
    DateInterval::builder()
        .start(window.start.format("%Y-%m-%d").to_string())
        .end(window.end.format("%Y-%m-%d").to_string())
        .build()
        .map_err(|e| BillingError::Query(context, e))
}

/// Pull the unblended total and its currency unit out of a result set.
/// Missing results read as zero; a malformed amount string is an error
/// because totals feed the skip-threshold decision.
fn total_from_results(
    context: &'static str,
    results: &[ResultByTime],
) -> Result<(f64, String), BillingError> {
    let value = match results
        .first()
        .and_then(|r| r.total())
        .and_then(|t| t.get(UNBLENDED_COST))
    {
        Some(v) => v,
        None => return Ok((0.0, String::new())),
    };
    let amount = parse_amount_strict(context, value.amount())?;
    let currency = value.unit().unwrap_or_default().to_string();
    Ok((amount, currency))
}

/// Per-service costs for the first result period, sorted descending.
/// Amounts that fail to parse read as zero and fall out with the
/// non-positive filter.
fn services_from_results(results: &[ResultByTime]) -> Vec<ServiceCost> {
    let mut services: Vec<ServiceCost> = Vec::new();
    if let Some(result) = results.first() {
        for group in result.groups() {
            let service = match group.keys().first() {
                Some(name) => name.clone(),
                None => continue,
            };
            let cost = group
                .metrics()
                .and_then(|m| m.get(UNBLENDED_COST))
                .and_then(|v| v.amount())
                .map(parse_amount_lenient)
                .unwrap_or(0.0);
            if cost > 0.0 {
                services.push(ServiceCost { service, cost });
            }
        }
    }
    // sort_by is stable, so equal costs keep their API order
    services.sort_by(|a, b| b.cost.partial_cmp(&a.cost).unwrap_or(std::cmp::Ordering::Equal));
    services
}

fn parse_amount_strict(
    context: &'static str,
    amount: Option<&str>,
) -> Result<f64, BillingError> {
    match amount {
        None => Ok(0.0),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| BillingError::Amount(context, raw.to_string())),
    }
}

fn parse_amount_lenient(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_costexplorer::types::{Group, MetricValue};

    fn metric(amount: &str, unit: &str) -> MetricValue {
        MetricValue::builder().amount(amount).unit(unit).build()
    }

    fn total_result(amount: &str, unit: &str) -> ResultByTime {
        ResultByTime::builder()
            .total(UNBLENDED_COST, metric(amount, unit))
            .build()
    }

    fn grouped_result(entries: &[(&str, &str)]) -> ResultByTime {
        let mut builder = ResultByTime::builder();
        for (service, amount) in entries {
            builder = builder.groups(
                Group::builder()
                    .keys(*service)
                    .metrics(UNBLENDED_COST, metric(amount, "USD"))
                    .build(),
            );
        }
        builder.build()
    }

    #[test]
    fn total_parses_amount_and_currency() {
        let results = [total_result("12.34", "USD")];
        let (amount, currency) = total_from_results("daily total", &results).unwrap();
        assert!((amount - 12.34).abs() < 1e-10);
        assert_eq!(currency, "USD");
    }

    #[test]
    fn total_missing_results_reads_as_zero() {
        let (amount, currency) = total_from_results("daily total", &[]).unwrap();
        assert!((amount - 0.0).abs() < 1e-10);
        assert!(currency.is_empty());
    }

    #[test]
    fn total_malformed_amount_is_an_error() {
        let results = [total_result("not-a-number", "USD")];
        let err = total_from_results("daily total", &results).unwrap_err();
        assert!(matches!(err, BillingError::Amount(_, _)));
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn services_drop_zero_and_sort_descending() {
        // Breakdown A: 5.00, B: 7.34, C: 0.00 against a 12.34 total must
        // yield exactly [B, A].
        let results = [grouped_result(&[("A", "5.00"), ("B", "7.34"), ("C", "0.00")])];
        let services = services_from_results(&results);
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].service, "B");
        assert!((services[0].cost - 7.34).abs() < 1e-10);
        assert_eq!(services[1].service, "A");
        assert!((services[1].cost - 5.00).abs() < 1e-10);
    }

    #[test]
    fn services_drop_negative_amounts() {
        let results = [grouped_result(&[("Credit", "-3.50"), ("AmazonEC2", "1.25")])];
        let services = services_from_results(&results);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].service, "AmazonEC2");
    }

    #[test]
    fn services_keep_api_order_on_equal_cost() {
        let results = [grouped_result(&[
            ("First", "2.00"),
            ("Second", "2.00"),
            ("Third", "2.00"),
        ])];
        let services = services_from_results(&results);
        let names: Vec<&str> = services.iter().map(|s| s.service.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[test]
    fn services_tolerate_unparsable_amounts() {
        let results = [grouped_result(&[("Broken", "n/a"), ("AmazonS3", "0.42")])];
        let services = services_from_results(&results);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].service, "AmazonS3");
    }

    #[test]
    fn services_empty_results_give_empty_breakdown() {
        assert!(services_from_results(&[]).is_empty());
    }

    #[test]
    fn strict_parse_accepts_decimal_strings() {
        let amount = parse_amount_strict("test", Some(" 0.0000000134 ")).unwrap();
        assert!(amount > 0.0);
    }

    #[test]
    fn strict_parse_missing_amount_is_zero() {
        let amount = parse_amount_strict("test", None).unwrap();
        assert!((amount - 0.0).abs() < 1e-10);
    }

    #[test]
    fn lenient_parse_defaults_to_zero() {
        assert!((parse_amount_lenient("garbage") - 0.0).abs() < 1e-10);
        assert!((parse_amount_lenient("3.14") - 3.14).abs() < 1e-10);
    }

    #[test]
    fn forecast_is_month_to_date_plus_remainder() {
        let summary = merge_monthly(812.55, 392.35, "USD".to_string());
        assert!((summary.forecast - 1204.90).abs() < 1e-10);
        assert!((summary.month_to_date - 812.55).abs() < 1e-10);
    }

    #[test]
    fn date_interval_formats_iso_dates() {
        let window = DateWindow {
            start: chrono::NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
        };
        let interval = date_interval("test", &window).unwrap();
        assert_eq!(interval.start(), "2026-08-05");
        assert_eq!(interval.end(), "2026-08-06");
    }
}
