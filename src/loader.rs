use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::{error, info, warn};

use crate::error::LoadError;
use crate::models::{Dataset, Record, Status};

/// A `received` cell as stored: either numeric or textual.
#[derive(Debug, Clone, PartialEq)]
pub enum RawStatus {
    Int(i64),
    Text(String),
}

/// One row as returned by the data source, before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub received: Option<RawStatus>,
}

/// Anything that can hand back the raw record rows.
#[async_trait]
pub trait RowSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>, LoadError>;
}

/// Reads every row from `source` and cleans it. Failures are logged and
/// yield an empty dataset.
pub async fn load_records<S: RowSource + Sync>(source: &S) -> Dataset {
    match source.fetch_rows().await {
        Ok(rows) => {
            let dataset = clean_rows(rows);
            info!(records = dataset.len(), "loaded records");
            dataset
        }
        Err(err) => {
            error!(error = %err, "error loading data from the database");
            Dataset::default()
        }
    }
}

pub fn clean_rows(rows: Vec<RawRow>) -> Dataset {
    let mut dropped = 0usize;
    let mut records: Vec<Record> = rows
        .into_iter()
        .filter_map(|row| {
            let Some(date) = row.date else {
                dropped += 1;
                return None;
            };
            let time = row.time.as_deref().and_then(parse_time);
            let received = row.received.as_ref().and_then(normalize_status);
            Some(Record::new(date, time, received))
        })
        .collect();

    if dropped > 0 {
        warn!(dropped, "skipped rows without a date");
    }

    // Missing times sort after every slot; the date only breaks ties.
    records.sort_by(|a, b| {
        (a.year, a.month)
            .cmp(&(b.year, b.month))
            .then_with(|| match (&a.time, &b.time) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.date.cmp(&b.date))
    });

    Dataset::new(records)
}

/// Normalizes a clock value to `HH:MM`; anything unparsable becomes `None`.
pub fn parse_time(value: &str) -> Option<String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
        .map(|time| time.format("%H:%M").to_string())
}

pub fn normalize_status(value: &RawStatus) -> Option<Status> {
    match value {
        RawStatus::Int(1) => Some(Status::Received),
        RawStatus::Int(0) => Some(Status::NotReceived),
        RawStatus::Int(_) => None,
        RawStatus::Text(text) => match text.trim() {
            "1" | "received" => Some(Status::Received),
            "0" | "not_received" => Some(Status::NotReceived),
            _ => None,
        },
    }
}
