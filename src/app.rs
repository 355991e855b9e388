use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::models::Dataset;
use crate::routes;

/// Shared by every handler; the dataset is never mutated after startup.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dataset: Arc<Dataset>,
}

pub(crate) fn axum_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/controls", get(routes::controls_handler))
        .route("/api/periods", get(routes::periods_handler))
        .route("/api/trend", post(routes::trend_handler))
        .route("/api/comparison", post(routes::comparison_handler))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}
