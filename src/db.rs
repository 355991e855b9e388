use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::error::LoadError;
use crate::loader::{RawRow, RawStatus, RowSource};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Reads record rows from the `time_slot_records` table.
pub struct PgRowSource {
    pool: PgPool,
}

impl PgRowSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RowSource for PgRowSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>, LoadError> {
        let records = sqlx::query("SELECT date, time, received FROM time_slot_records ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        records.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &PgRow) -> Result<RawRow, LoadError> {
    let date: Option<NaiveDate> = row.try_get("date").map_err(|err| malformed("date", err))?;
    let time: Option<String> = row.try_get("time").map_err(|err| malformed("time", err))?;
    let received = decode_status(row)?;

    Ok(RawRow {
        date,
        time,
        received,
    })
}

/// `received` may be stored as text or as an integer flag.
fn decode_status(row: &PgRow) -> Result<Option<RawStatus>, LoadError> {
    if let Ok(text) = row.try_get::<Option<String>, _>("received") {
        return Ok(text.map(RawStatus::Text));
    }
    let flag: Option<i64> = row
        .try_get::<Option<i32>, _>("received")
        .map(|value| value.map(i64::from))
        .or_else(|_| row.try_get::<Option<i64>, _>("received"))
        .map_err(|err| malformed("received", err))?;
    Ok(flag.map(RawStatus::Int))
}

fn malformed(column: &'static str, err: sqlx::Error) -> LoadError {
    LoadError::MalformedColumn {
        column,
        message: err.to_string(),
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct CsvRow {
    pub date: NaiveDate,
    pub time: Option<String>,
    pub received: Option<String>,
}

pub fn read_csv(csv_path: &std::path::Path) -> anyhow::Result<Vec<CsvRow>> {
    let reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    read_csv_rows(reader)
}

fn read_csv_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> anyhow::Result<Vec<CsvRow>> {
    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid CSV record {}", line + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Replaces the table contents with the rows of `csv_path`.
pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let rows = read_csv(csv_path)?;
    info!(rows = rows.len(), path = %csv_path.display(), "loaded CSV data");

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM time_slot_records")
        .execute(&mut *tx)
        .await?;

    let mut inserted = 0usize;
    for row in rows {
        let result = sqlx::query(
            r#"
            INSERT INTO time_slot_records (date, time, received)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(row.date)
        .bind(row.time.as_deref().map(str::trim))
        .bind(row.received.as_deref().map(str::trim))
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected() as usize;
    }

    tx.commit().await?;
    info!(inserted, "data written to time_slot_records");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_ignore_extra_columns() {
        let data = "date,time,received,project\n2024-03-04,09:00:00,1,alpha\n2024-03-05,,not_received,beta\n";
        let rows = read_csv_rows(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(rows[0].received.as_deref(), Some("1"));
        assert_eq!(rows[1].time, None);
    }

    #[test]
    fn csv_with_bad_date_is_rejected() {
        let data = "date,time,received\nyesterday,09:00:00,1\n";
        let err = read_csv_rows(csv::Reader::from_reader(data.as_bytes())).unwrap_err();
        assert!(err.to_string().contains("invalid CSV record 1"));
    }
}
