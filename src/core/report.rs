use crate::core::models::cost::{DailyCostSummary, MonthlyCostSummary};
use crate::core::models::message::{Attachment, Color, Field, Message};

/// Daily totals below this are Cost Explorer rounding artifacts on
/// otherwise idle accounts, not spend worth reporting.
pub const MIN_REPORTABLE_COST: f64 = 0.01;

/// Per-service fields included in the daily attachment.
pub const MAX_SERVICE_FIELDS: usize = 10;

pub fn below_reporting_threshold(total_cost: f64) -> bool {
    total_cost < MIN_REPORTABLE_COST
}

/// Assemble the two-attachment report: yesterday's total with a per-service
/// breakdown, then the month-to-date running total. Each attachment is
/// colored independently by its own primary amount.
pub fn build_message(daily: &DailyCostSummary, monthly: &MonthlyCostSummary) -> Message {
    let service_fields: Vec<Field> = daily
        .services
        .iter()
        .take(MAX_SERVICE_FIELDS)
        .map(|entry| Field {
            title: entry.service.clone(),
            value: format!("${:.2}", entry.cost),
            short: true,
        })
        .collect();

    let daily_attachment = Attachment {
        title: format!("Yesterday's cost ({})", daily.date),
        text: format!("*${:.2}* {}", daily.total_cost, daily.currency),
        color: Color::for_amount(daily.total_cost),
        fields: service_fields,
        footer: None,
        timestamp: None,
    };

    let monthly_attachment = Attachment {
        title: "This month".to_string(),
        text: String::new(),
        color: Color::for_amount(monthly.month_to_date),
        fields: vec![Field {
            title: "Month to date".to_string(),
            value: format!("${:.2}", monthly.month_to_date),
            short: false,
        }],
        footer: Some(format!("Full-month forecast: ${:.2}", monthly.forecast)),
        timestamp: None,
    };

    Message {
        text: "AWS cost report".to_string(),
        attachments: vec![daily_attachment, monthly_attachment],
    }
}
