use crate::{error::ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use database::{DbError, PopularNumber, UserRequestStats, UserStatsBundle};
use serde::{Deserialize, Serialize};
use serde_json::{json, Number, Value};
use std::sync::Arc;
use std::time::Instant;

/// The handler enforces the request bound; the calculator itself is unbounded.
const MAX_N: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct FibonacciQuery {
    #[serde(default)]
    pub with_db: bool,
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct FibonacciResponse {
    pub n: i64,
    /// Emitted as a JSON number with full precision; fib(1000) does not fit
    /// any native integer, so this goes through `serde_json::Number`.
    pub fibonacci: Number,
    pub execution_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_operation_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_stats: Option<UserStatsBundle>,
}

/// Wall-clock milliseconds, rounded to 3 decimal places.
fn elapsed_ms(started: Instant) -> f64 {
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    (ms * 1000.0).round() / 1000.0
}

/// Re-reads a decimal string as a `serde_json::Number`, which (with the
/// `arbitrary_precision` feature) carries every digit through to the wire.
fn big_number(digits: &str) -> Result<Number, serde_json::Error> {
    serde_json::from_str(digits)
}

/// # GET /
/// Service description, mirroring what a newcomer needs to start poking at it.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Fibonacci API",
        "endpoints": {
            "/fibonacci/{n}": "Returns the n-th Fibonacci number (0 <= n <= 1000); ?with_db=true records analytics",
            "/health": "Service and database status",
            "/stats/popular": "Most requested numbers",
            "/stats/users/{user_id}": "Per-user request analytics"
        }
    }))
}

/// # GET /fibonacci/:n?with_db=bool
///
/// The primary operation: validate, compute, optionally record analytics.
/// Recording failures surface as a server error; a missing database merely
/// omits the analytics fields.
pub async fn get_fibonacci(
    State(state): State<Arc<AppState>>,
    Path(n): Path<i64>,
    Query(query): Query<FibonacciQuery>,
) -> Result<Json<FibonacciResponse>, ApiError> {
    if n < 0 {
        return Err(ApiError::OutOfRange(
            "n must be non-negative".to_string(),
        ));
    }
    if n > MAX_N {
        return Err(ApiError::OutOfRange(format!(
            "n is too large (maximum {MAX_N})"
        )));
    }

    let started = Instant::now();
    let result = sequence::compute(n)?;
    let execution_time_ms = elapsed_ms(started);

    let (db_operation_time_ms, user_stats) = if query.with_db {
        match &state.db {
            Some(repo) => {
                let db_started = Instant::now();
                let bundle = repo
                    .record_request(n as i32, &result.to_string(), execution_time_ms)
                    .await?;
                (Some(elapsed_ms(db_started)), bundle)
            }
            None => {
                tracing::debug!("analytics requested but no database is configured");
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    Ok(Json(FibonacciResponse {
        n,
        fibonacci: big_number(&result.to_string())?,
        execution_time_ms,
        db_operation_time_ms,
        user_stats,
    }))
}

/// # GET /health
/// Never fails: a missing or unreachable database degrades the reported
/// status instead of erroring.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let (status, database) = match &state.db {
        None => ("degraded", "not configured"),
        Some(repo) => match repo.ping().await {
            Ok(()) => ("healthy", "connected"),
            Err(e) => {
                tracing::warn!(error = %e, "health probe failed");
                ("degraded", "unreachable")
            }
        },
    };
    Json(json!({ "status": status, "database": database }))
}

/// # GET /stats/popular?limit=int
pub async fn get_popular_numbers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PopularQuery>,
) -> Result<Json<Vec<PopularNumber>>, ApiError> {
    let repo = state.db.as_ref().ok_or(ApiError::DatabaseUnavailable)?;
    let rows = repo.get_popular_numbers(query.limit.clamp(1, 100)).await?;
    Ok(Json(rows))
}

/// # GET /stats/users/:user_id
pub async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserRequestStats>, ApiError> {
    let repo = state.db.as_ref().ok_or(ApiError::DatabaseUnavailable)?;
    let stats = repo.get_user_stats(user_id).await.map_err(|e| match e {
        DbError::NotFound => ApiError::NotFound(format!("no analytics recorded for user {user_id}")),
        other => ApiError::Database(other),
    })?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_ms_rounds_to_three_decimals() {
        let started = Instant::now();
        let ms = elapsed_ms(started);
        assert!(ms >= 0.0);
        // No more than three decimal places survive the rounding.
        let scaled = ms * 1000.0;
        assert!((scaled - scaled.round()).abs() < 1e-6);
    }

    #[test]
    fn optional_fields_are_omitted_from_the_payload() {
        let response = FibonacciResponse {
            n: 10,
            fibonacci: big_number("55").unwrap(),
            execution_time_ms: 0.042,
            db_operation_time_ms: None,
            user_stats: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["n"], 10);
        assert_eq!(value["fibonacci"].as_u64(), Some(55));
        assert!(value.get("db_operation_time_ms").is_none());
        assert!(value.get("user_stats").is_none());
    }
}
