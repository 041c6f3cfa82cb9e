use chrono::{Datelike, NaiveDate};

/// A half-open date range [start, end), the end-exclusive convention used
/// by the Cost Explorer API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// The single day before `today`.
pub fn yesterday_window(today: NaiveDate) -> DateWindow {
    DateWindow {
        start: today - chrono::Duration::days(1),
        end: today,
    }
}

/// First of the current month through today. Degenerates to an empty window
/// on the first of the month; the API rejects that and the error propagates.
pub fn month_to_date_window(today: NaiveDate) -> DateWindow {
    DateWindow {
        start: today.with_day(1).unwrap_or(today),
        end: today,
    }
}

/// Today through the first of the next month, the remainder the forecast
/// query covers.
pub fn forecast_window(today: NaiveDate) -> DateWindow {
    let next_month_start = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .unwrap_or(today);
    DateWindow {
        start: today,
        end: next_month_start,
    }
}
