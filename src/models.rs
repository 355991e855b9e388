use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Shared x-axis of the trend chart: half-hour slots from 08:30 to 15:30.
pub const TIME_SLOTS: [&str; 15] = [
    "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00",
    "13:30", "14:00", "14:30", "15:00", "15:30",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Month from its calendar number (1 = January).
    pub fn from_number(number: u32) -> Option<Month> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Zero-based position on the calendar axis.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// The selectable working days, in order.
    pub const WORKDAYS: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Received,
    #[serde(rename = "Not Received")]
    NotReceived,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Received => "Received",
            Status::NotReceived => "Not Received",
        }
    }
}

/// Status selection in the UI; `Both` never appears on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum StatusFilter {
    #[value(name = "received")]
    Received,
    #[serde(rename = "Not Received")]
    #[value(name = "not-received")]
    NotReceived,
    #[default]
    #[value(name = "both")]
    Both,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::Received,
        StatusFilter::NotReceived,
        StatusFilter::Both,
    ];

    pub fn statuses(self) -> Vec<Status> {
        match self {
            StatusFilter::Received => vec![Status::Received],
            StatusFilter::NotReceived => vec![Status::NotReceived],
            StatusFilter::Both => vec![Status::Received, Status::NotReceived],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::Received => "Received",
            StatusFilter::NotReceived => "Not Received",
            StatusFilter::Both => "Both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKey {
    #[default]
    #[value(name = "month_year")]
    MonthYear,
    #[value(name = "year")]
    Year,
    #[value(name = "month")]
    Month,
    #[value(name = "day")]
    Day,
    #[value(name = "none")]
    None,
}

impl AggregationKey {
    /// Keys offered by the aggregation dropdown.
    pub const SELECTABLE: [AggregationKey; 4] = [
        AggregationKey::MonthYear,
        AggregationKey::Month,
        AggregationKey::Year,
        AggregationKey::Day,
    ];

    pub fn value(self) -> &'static str {
        match self {
            AggregationKey::MonthYear => "month_year",
            AggregationKey::Year => "year",
            AggregationKey::Month => "month",
            AggregationKey::Day => "day",
            AggregationKey::None => "none",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AggregationKey::MonthYear => "Month-Year",
            AggregationKey::Year => "Year Only",
            AggregationKey::Month => "Month Only",
            AggregationKey::Day => "Day",
            AggregationKey::None => "All Data",
        }
    }

    /// Capitalized key as shown in chart titles, e.g. `Month_year`.
    pub fn title(self) -> String {
        let value = self.value();
        let mut chars = value.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOption {
    Bar,
    Distribution,
    Trendline,
    Numbers,
}

impl DisplayOption {
    pub const ALL: [DisplayOption; 4] = [
        DisplayOption::Bar,
        DisplayOption::Trendline,
        DisplayOption::Distribution,
        DisplayOption::Numbers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DisplayOption::Bar => "Show Bar Graph",
            DisplayOption::Trendline => "Show Trendline",
            DisplayOption::Distribution => "Show Scatter Plot",
            DisplayOption::Numbers => "Show Numerical Values",
        }
    }
}

impl std::str::FromStr for AggregationKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        [AggregationKey::None]
            .into_iter()
            .chain(Self::SELECTABLE)
            .find(|key| key.value() == value)
            .ok_or_else(|| format!("unknown aggregation `{value}`"))
    }
}

/// One cleaned row of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub time: Option<String>,
    pub day: Weekday,
    pub month: Month,
    pub year: i32,
    pub month_year: String,
    pub received: Option<Status>,
}

impl Record {
    /// Builds a record with every calendar field derived from `date`.
    pub fn new(date: NaiveDate, time: Option<String>, received: Option<Status>) -> Self {
        let month = Month::from_number(date.month()).unwrap_or(Month::Jan);
        Record {
            date,
            time,
            day: date.weekday().into(),
            month,
            year: date.year(),
            month_year: date.format("%Y-%m").to_string(),
            received,
        }
    }

    /// The value this record contributes under `key`, as offered to the period filter.
    pub fn period_value(&self, key: AggregationKey) -> Option<String> {
        match key {
            AggregationKey::MonthYear => Some(self.month_year.clone()),
            AggregationKey::Year => Some(self.year.to_string()),
            AggregationKey::Month => Some(self.month.label().to_string()),
            AggregationKey::Day => Some(self.day.label().to_string()),
            AggregationKey::None => None,
        }
    }
}

/// The cleaned, sorted rows loaded once at startup; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|record| record.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// A labelled sequence of percentages aligned to a fixed category axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}
