use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::app::AppState;
use crate::dashboard::{self, ComparisonRequest, Controls, PeriodSelection, TrendRequest};
use crate::error::AppError;
use crate::figure::Figure;
use crate::models::AggregationKey;

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) async fn controls_handler(State(state): State<Arc<AppState>>) -> Json<Controls> {
    Json(dashboard::controls(&state.dataset))
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeriodsQuery {
    aggregation: Option<String>,
}

pub(crate) async fn periods_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PeriodsQuery>,
) -> Result<Json<PeriodSelection>, AppError> {
    let key = match query.aggregation.as_deref() {
        Some(value) => value.parse::<AggregationKey>().map_err(AppError::BadRequest)?,
        None => AggregationKey::default(),
    };
    Ok(Json(dashboard::period_selection(&state.dataset, key)))
}

pub(crate) async fn trend_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TrendRequest>,
) -> Json<Figure> {
    let figure = dashboard::render_trend(&state.dataset, &request);
    info!(
        aggregation = request.aggregation.value(),
        periods = request.periods.len(),
        traces = figure.data.len(),
        blank = figure.is_empty(),
        "rendered trend chart"
    );
    Json(figure)
}

pub(crate) async fn comparison_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ComparisonRequest>,
) -> Json<Figure> {
    let figure = dashboard::render_comparison(&state.dataset, &request);
    info!(
        years = request.years.len(),
        months = request.months.len(),
        traces = figure.data.len(),
        blank = figure.is_empty(),
        "rendered comparison chart"
    );
    Json(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, Record, Status};
    use chrono::NaiveDate;

    fn state() -> State<Arc<AppState>> {
        let records = vec![
            Record::new(
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                Some("11:00".to_string()),
                Some(Status::Received),
            ),
            Record::new(
                NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
                Some("11:00".to_string()),
                Some(Status::NotReceived),
            ),
        ];
        State(Arc::new(AppState {
            dataset: Arc::new(Dataset::new(records)),
        }))
    }

    #[tokio::test]
    async fn index_serves_dashboard_page() {
        let Html(page) = index().await;
        assert!(page.contains("trend-graph"));
        assert!(page.contains("unified-trend-graph"));
    }

    #[tokio::test]
    async fn periods_defaults_to_latest_month_year() {
        let Json(selection) = periods_handler(
            state(),
            Query(PeriodsQuery {
                aggregation: Some("month_year".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(selection.value, vec!["2024-04".to_string()]);
    }

    #[tokio::test]
    async fn unknown_aggregation_is_rejected() {
        let result = periods_handler(
            state(),
            Query(PeriodsQuery {
                aggregation: Some("fortnight".to_string()),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn trend_handler_returns_figure() {
        let request: TrendRequest = serde_json::from_value(serde_json::json!({
            "aggregation": "month",
            "periods": ["Apr"],
            "status": "Both",
            "options": ["bar", "numbers"]
        }))
        .unwrap();
        let Json(figure) = trend_handler(state(), Json(request)).await;
        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0].y[5], 50.0);
    }

    #[tokio::test]
    async fn comparison_handler_blank_without_months() {
        let request: ComparisonRequest = serde_json::from_value(serde_json::json!({
            "years": [2024],
            "months": []
        }))
        .unwrap();
        let Json(figure) = comparison_handler(state(), Json(request)).await;
        assert!(figure.is_empty());
    }

    #[tokio::test]
    async fn controls_include_loaded_years() {
        let Json(controls) = controls_handler(state()).await;
        assert_eq!(controls.years.len(), 1);
        assert_eq!(controls.years[0].value, 2024);
    }
}
