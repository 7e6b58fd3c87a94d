pub mod chat; // Assistant chat with weekly journal context
pub mod completion; // Anthropic Messages API client
pub mod config;
pub mod db;
pub mod home; // Today's counts
pub mod insights; // Trigger correlation + risk scoring
pub mod meal_plan; // Daily menu suggestions
pub mod models;

use std::io;

use chrono::Utc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use completion::{AnthropicClient, CompletionError};
use db::DatabaseError;
use insights::InsightsEngine;

const ENV_LOG: &str = "ANAM_LOG";

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Report serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Analyse the local journal and print one JSON report to stdout.
pub fn run() -> Result<(), AppError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::database_path();
    let conn = db::sqlite::open_database(&db_path)?;
    tracing::info!(path = %db_path.display(), "Journal database opened");

    let client = AnthropicClient::from_env()?;
    let engine = InsightsEngine::new(&conn, &client);

    let now_ms = Utc::now().timestamp_millis();
    let insights = engine.analyze(now_ms);
    let today = home::today_stats_now(&conn)?;

    let explanation = if client.has_api_key() && !insights.triggers.is_empty() {
        match engine.explain(&insights.triggers) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "Explanation unavailable");
                Some(e.user_message().to_string())
            }
        }
    } else {
        None
    };

    let report = serde_json::json!({
        "app": config::APP_NAME,
        "version": config::APP_VERSION,
        "today": today,
        "insights": insights,
        "explanation": explanation,
        "fallbacks": engine.fallback_count(),
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
