use crate::models::{
    AggregationKey, Dataset, Month, Record, Series, Status, StatusFilter, Weekday, TIME_SLOTS,
};

const ALL_DATA_LABEL: &str = "All Data";

/// Filter selections for the time-slot trend chart.
#[derive(Debug, Clone)]
pub struct TrendQuery<'a> {
    pub key: AggregationKey,
    pub periods: &'a [String],
    pub weekdays: &'a [Weekday],
    pub status: StatusFilter,
}

/// Filter selections for the year-over-year month comparison.
#[derive(Debug, Clone)]
pub struct ComparisonQuery<'a> {
    pub years: &'a [i32],
    pub months: &'a [Month],
    pub status: StatusFilter,
}

/// Values selectable in the period filter for `key`.
pub fn period_options(dataset: &Dataset, key: AggregationKey) -> Vec<String> {
    match key {
        AggregationKey::MonthYear => {
            let mut values: Vec<String> = dataset
                .records()
                .iter()
                .map(|record| record.month_year.clone())
                .collect();
            values.sort();
            values.dedup();
            values
        }
        AggregationKey::Year => dataset.years().iter().map(i32::to_string).collect(),
        AggregationKey::Month => Month::ALL.iter().map(|m| m.label().to_string()).collect(),
        AggregationKey::Day => Weekday::WORKDAYS
            .iter()
            .map(|d| d.label().to_string())
            .collect(),
        AggregationKey::None => Vec::new(),
    }
}

/// The period preselected when the aggregation changes: the latest option.
pub fn default_periods(options: &[String]) -> Vec<String> {
    options.last().cloned().into_iter().collect()
}

/// Per-period, per-status share of records in each time slot.
///
/// Returns `None` when no period is selected. A period matching no records
/// contributes no series.
pub fn trend_series(dataset: &Dataset, query: &TrendQuery<'_>) -> Option<Vec<Series>> {
    if query.periods.is_empty() {
        return None;
    }

    let mut periods: Vec<&str> = Vec::new();
    for period in query.periods {
        if !periods.contains(&period.as_str()) {
            periods.push(period.as_str());
        }
    }
    if query.key == AggregationKey::None {
        periods.truncate(1);
    }

    let statuses = query.status.statuses();
    let mut series = Vec::new();

    for period in periods {
        let (label_prefix, in_period): (&str, Vec<&Record>) = match query.key {
            AggregationKey::None => (ALL_DATA_LABEL, dataset.records().iter().collect()),
            key => (
                period,
                dataset
                    .records()
                    .iter()
                    .filter(|record| record.period_value(key).as_deref() == Some(period))
                    .collect(),
            ),
        };

        if in_period.is_empty() {
            continue;
        }

        // Day aggregation already buckets by weekday.
        let apply_weekdays = query.key != AggregationKey::Day && !query.weekdays.is_empty();
        let rows = in_period
            .into_iter()
            .filter(|record| !apply_weekdays || query.weekdays.contains(&record.day));

        let percentages = row_percentages(&count_by_slot(rows));

        for status in &statuses {
            let column = status_column(*status);
            series.push(Series {
                label: format!("{} - {}", label_prefix, status.label()),
                values: percentages.iter().map(|row| row[column]).collect(),
            });
        }
    }

    Some(series)
}

/// Share of each month's records (any status) carrying the selected status,
/// per selected year.
///
/// Returns `None` when no year or no month is selected.
pub fn comparison_series(dataset: &Dataset, query: &ComparisonQuery<'_>) -> Option<Vec<Series>> {
    if query.years.is_empty() || query.months.is_empty() {
        return None;
    }

    let mut series = Vec::new();
    for &year in query.years {
        let in_scope: Vec<&Record> = dataset
            .records()
            .iter()
            .filter(|record| record.year == year && query.months.contains(&record.month))
            .collect();

        let totals = count_by_month(in_scope.iter().copied());

        for status in query.status.statuses() {
            let matching: Vec<&Record> = in_scope
                .iter()
                .copied()
                .filter(|record| record.received == Some(status))
                .collect();
            if matching.is_empty() {
                continue;
            }

            let counts = count_by_month(matching.into_iter());
            let values = counts
                .iter()
                .zip(totals.iter())
                .map(|(&count, &total)| percentage(count, total))
                .collect();

            series.push(Series {
                label: format!("{} - {}", year, status.label()),
                values,
            });
        }
    }

    Some(series)
}

fn status_column(status: Status) -> usize {
    match status {
        Status::Received => 0,
        Status::NotReceived => 1,
    }
}

/// Counts per time slot and status, aligned to `TIME_SLOTS`. Records with no
/// time, no status, or a time outside the slot axis are not counted.
pub fn count_by_slot<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<[u64; 2]> {
    let mut counts = vec![[0u64; 2]; TIME_SLOTS.len()];
    for record in records {
        let (Some(time), Some(status)) = (record.time.as_deref(), record.received) else {
            continue;
        };
        if let Some(slot) = TIME_SLOTS.iter().position(|s| *s == time) {
            counts[slot][status_column(status)] += 1;
        }
    }
    counts
}

/// Converts each slot's counts into percentages of that slot's total.
pub fn row_percentages(counts: &[[u64; 2]]) -> Vec<[f64; 2]> {
    counts
        .iter()
        .map(|row| {
            let total = row[0] + row[1];
            [percentage(row[0], total), percentage(row[1], total)]
        })
        .collect()
}

fn count_by_month<'a>(records: impl Iterator<Item = &'a Record>) -> [u64; 12] {
    let mut counts = [0u64; 12];
    for record in records {
        counts[record.month.index()] += 1;
    }
    counts
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}

/// Two-decimal rounding with ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
