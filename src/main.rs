use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod aggregate;
mod app;
mod config;
mod dashboard;
mod db;
mod error;
mod figure;
mod loader;
mod models;
mod regression;
mod routes;

use crate::config::Config;
use crate::dashboard::{ComparisonRequest, TrendRequest};
use crate::models::{AggregationKey, DisplayOption, Month, StatusFilter, Weekday};

#[derive(Parser)]
#[command(name = "timeslot-trends")]
#[command(about = "Received / not received trends by time slot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Replace the record table with the rows of a CSV file
    Load {
        csv: PathBuf,
    },
    /// Serve the interactive dashboard
    Serve,
    /// Print a chart description as JSON
    Render {
        #[command(subcommand)]
        chart: Chart,
    },
}

#[derive(Subcommand)]
enum Chart {
    /// Time-slot distribution for selected periods
    Trend {
        #[arg(long, value_enum, default_value_t = AggregationKey::MonthYear)]
        aggregation: AggregationKey,
        #[arg(long = "period")]
        periods: Vec<String>,
        #[arg(long = "weekday", value_enum)]
        weekdays: Vec<Weekday>,
        #[arg(long, value_enum, default_value_t = StatusFilter::Both)]
        status: StatusFilter,
        #[arg(long = "show", value_enum, default_values_t = [DisplayOption::Bar])]
        options: Vec<DisplayOption>,
    },
    /// Month-by-month comparison across years
    Comparison {
        #[arg(long = "year")]
        years: Vec<i32>,
        #[arg(long = "month", value_enum)]
        months: Vec<Month>,
        #[arg(long, value_enum, default_value_t = StatusFilter::Both)]
        status: StatusFilter,
        #[arg(long = "show", value_enum, default_values_t = [DisplayOption::Bar])]
        options: Vec<DisplayOption>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Connections open on first use; an unreachable store surfaces through
    // the loader (empty dataset) or as the admin command's error.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Load { csv } => {
            let inserted = db::import_csv(&pool, &csv)
                .await
                .with_context(|| format!("failed to load {}", csv.display()))?;
            println!("Inserted {inserted} records from {}.", csv.display());
        }
        Commands::Serve => {
            let dataset = loader::load_records(&db::PgRowSource::new(pool)).await;
            if dataset.is_empty() {
                error!("failed to load data from the database");
                anyhow::bail!("no records available, refusing to start the dashboard");
            }

            let state = Arc::new(app::AppState {
                dataset: Arc::new(dataset),
            });
            let app = app::axum_app(state);

            let listener = tokio::net::TcpListener::bind(config.addr)
                .await
                .with_context(|| format!("failed to bind {}", config.addr))?;
            info!(addr = %config.addr, "dashboard started");
            axum::serve(listener, app).await?;
        }
        Commands::Render { chart } => {
            let dataset = loader::load_records(&db::PgRowSource::new(pool)).await;
            let figure = match chart {
                Chart::Trend {
                    aggregation,
                    periods,
                    weekdays,
                    status,
                    options,
                } => dashboard::render_trend(
                    &dataset,
                    &TrendRequest {
                        aggregation,
                        periods,
                        weekdays,
                        status,
                        options,
                    },
                ),
                Chart::Comparison {
                    years,
                    months,
                    status,
                    options,
                } => dashboard::render_comparison(
                    &dataset,
                    &ComparisonRequest {
                        years,
                        months,
                        status,
                        options,
                    },
                ),
            };
            println!("{}", serde_json::to_string_pretty(&figure)?);
        }
    }

    Ok(())
}
