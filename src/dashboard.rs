use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{self, ComparisonQuery, TrendQuery};
use crate::figure::{build_figure, BarMode, ChartSpec, Figure, LayoutOverrides};
use crate::models::{
    AggregationKey, Dataset, DisplayOption, Month, StatusFilter, Weekday, TIME_SLOTS,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ControlOption {
    pub label: String,
    pub value: serde_json::Value,
}

impl ControlOption {
    fn new(label: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Vocabularies and initial values for every dashboard control.
#[derive(Debug, Clone, Serialize)]
pub struct Controls {
    pub aggregations: Vec<ControlOption>,
    pub default_aggregation: AggregationKey,
    pub weekdays: Vec<ControlOption>,
    pub months: Vec<ControlOption>,
    pub years: Vec<ControlOption>,
    pub statuses: Vec<ControlOption>,
    pub display_options: Vec<ControlOption>,
    pub default_display: Vec<DisplayOption>,
}

pub fn controls(dataset: &Dataset) -> Controls {
    Controls {
        aggregations: AggregationKey::SELECTABLE
            .iter()
            .map(|key| ControlOption::new(key.label(), key.value()))
            .collect(),
        default_aggregation: AggregationKey::default(),
        weekdays: Weekday::WORKDAYS
            .iter()
            .map(|day| ControlOption::new(day.label(), day.label()))
            .collect(),
        months: Month::ALL
            .iter()
            .map(|month| ControlOption::new(month.label(), month.label()))
            .collect(),
        years: dataset
            .years()
            .into_iter()
            .map(|year| ControlOption::new(year.to_string(), year))
            .collect(),
        statuses: StatusFilter::ALL
            .iter()
            .map(|status| ControlOption::new(status.label(), status.label()))
            .collect(),
        display_options: DisplayOption::ALL
            .iter()
            .map(|option| {
                let value = serde_json::to_value(option).unwrap_or_default();
                ControlOption::new(option.label(), value)
            })
            .collect(),
        default_display: default_display(),
    }
}

/// What the period filter should offer after the aggregation changes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodSelection {
    pub options: Vec<ControlOption>,
    pub value: Vec<String>,
    pub show_weekday_selector: bool,
}

pub fn period_selection(dataset: &Dataset, key: AggregationKey) -> PeriodSelection {
    let values = aggregate::period_options(dataset, key);
    PeriodSelection {
        options: values
            .iter()
            .map(|value| ControlOption::new(value.as_str(), value.as_str()))
            .collect(),
        value: aggregate::default_periods(&values),
        show_weekday_selector: key != AggregationKey::Day,
    }
}

fn default_display() -> Vec<DisplayOption> {
    vec![DisplayOption::Bar]
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendRequest {
    #[serde(default)]
    pub aggregation: AggregationKey,
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub weekdays: Vec<Weekday>,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default = "default_display")]
    pub options: Vec<DisplayOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonRequest {
    #[serde(default)]
    pub years: Vec<i32>,
    #[serde(default)]
    pub months: Vec<Month>,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default = "default_display")]
    pub options: Vec<DisplayOption>,
}

/// Time-slot distribution chart for the selected periods.
pub fn render_trend(dataset: &Dataset, request: &TrendRequest) -> Figure {
    let query = TrendQuery {
        key: request.aggregation,
        periods: &request.periods,
        weekdays: &request.weekdays,
        status: request.status,
    };
    let Some(series) = aggregate::trend_series(dataset, &query) else {
        return Figure::empty();
    };
    debug!(series = series.len(), aggregation = request.aggregation.value(), "trend series");

    let mut title = format!(
        "Distribution of Projects by Time Slot<br>Selected {}: {}",
        request.aggregation.title(),
        request.periods.join(", ")
    );
    if request.aggregation != AggregationKey::Day && !request.weekdays.is_empty() {
        let days: Vec<&str> = request.weekdays.iter().map(|day| day.label()).collect();
        title.push_str(&format!("<br>Selected Days: {}", days.join(", ")));
    }

    let categories: Vec<String> = TIME_SLOTS.iter().map(|slot| slot.to_string()).collect();
    build_figure(&ChartSpec {
        categories: &categories,
        series: &series,
        title: &title,
        x_title: "Time Slot",
        y_title: "Percentage",
        options: &request.options,
        category_order: Some(&categories),
        overrides: LayoutOverrides::default(),
    })
}

/// Month-by-month status share, one series per selected year.
pub fn render_comparison(dataset: &Dataset, request: &ComparisonRequest) -> Figure {
    let query = ComparisonQuery {
        years: &request.years,
        months: &request.months,
        status: request.status,
    };
    let Some(series) = aggregate::comparison_series(dataset, &query) else {
        return Figure::empty();
    };
    debug!(series = series.len(), "comparison series");

    let years: Vec<String> = request.years.iter().map(i32::to_string).collect();
    let months: Vec<&str> = request.months.iter().map(|month| month.label()).collect();
    let title = format!(
        "Comparison of Projects by Month and Year<br>Selected Years: {}<br>Selected Months: {}",
        years.join(", "),
        months.join(", ")
    );

    let categories: Vec<String> = Month::ALL.iter().map(|m| m.label().to_string()).collect();
    build_figure(&ChartSpec {
        categories: &categories,
        series: &series,
        title: &title,
        x_title: "Month",
        y_title: "Percentage",
        options: &request.options,
        category_order: Some(&categories),
        overrides: LayoutOverrides {
            barmode: Some(BarMode::Group),
        },
    })
}
