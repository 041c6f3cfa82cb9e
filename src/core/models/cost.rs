use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unblended cost attributed to one AWS service over the reported day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service: String,
    pub cost: f64,
}

/// One day of spend. The total and the per-service breakdown come from
/// separate Cost Explorer queries with different granularity, so the
/// breakdown does not necessarily sum to `total_cost`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCostSummary {
    pub date: NaiveDate,
    pub total_cost: f64,
    /// Currency unit code reported by the API (e.g., "USD")
    pub currency: String,
    /// Sorted descending by cost; entries with non-positive cost are dropped
    pub services: Vec<ServiceCost>,
}

/// Running total for the current calendar month plus the full-month estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCostSummary {
    pub month_to_date: f64,
    /// Month-to-date plus the projected cost for the rest of the month
    pub forecast: f64,
    pub currency: String,
}
