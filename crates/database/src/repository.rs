use crate::DbError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use sqlx::Row;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// An active user chosen to be attributed to a recorded computation.
#[derive(Debug, Clone, FromRow)]
struct ActiveUser {
    id: i32,
    username: String,
}

/// A row from the `popular_numbers` aggregate table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PopularNumber {
    pub number: i32,
    pub request_count: i64,
    pub last_requested: DateTime<Utc>,
}

/// Timing statistics for one requested number across all users.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NumberTimingStats {
    pub avg_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub total_requests: i64,
}

/// Per-user aggregates computed inside the recording transaction.
#[derive(Debug, Clone, FromRow)]
struct UserAnalyticsRow {
    total_requests: i64,
    avg_execution_time_ms: f64,
    max_number_requested: i32,
    min_number_requested: i32,
    requests_last_24h: i64,
    unique_numbers_requested: i64,
}

/// The combined analytics payload returned after a successfully recorded
/// computation: who the request was attributed to, that user's aggregate
/// history, the overall popularity ranking, and timing statistics for the
/// requested number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsBundle {
    pub user_id: i32,
    pub username: String,
    pub total_requests: i64,
    pub avg_execution_time_ms: f64,
    pub max_number_requested: i32,
    pub min_number_requested: i32,
    pub requests_last_24h: i64,
    pub unique_numbers_requested: i64,
    pub popular_numbers: Vec<PopularNumber>,
    pub number_stats: NumberTimingStats,
}

/// A row from the `user_request_stats` view, serving the per-user lookup
/// endpoint without touching the request log directly.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRequestStats {
    pub user_id: i32,
    pub username: String,
    pub total_requests: i64,
    pub avg_execution_time_ms: f64,
    pub max_number_requested: i32,
    pub min_number_requested: i32,
    pub unique_numbers_requested: i64,
    pub last_request_at: DateTime<Utc>,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records one computed request and returns the analytics bundle, all
    /// within a single transaction.
    ///
    /// The steps are ordered and atomic: pick a random active user, append to
    /// the request log, bump the per-number aggregate, then read back the
    /// user's aggregate history, the popularity top 5, and the timing profile
    /// of this number. A failure at any step rolls the whole thing back.
    ///
    /// Returns `Ok(None)` when no active user exists — nothing is written in
    /// that case, and the caller treats it as "nothing to report" rather than
    /// a failure.
    pub async fn record_request(
        &self,
        n: i32,
        result: &str,
        execution_time_ms: f64,
    ) -> Result<Option<UserStatsBundle>, DbError> {
        let mut tx = self.pool.begin().await?;

        // Uniform selection among active users, done storage-side.
        let user = sqlx::query_as::<_, ActiveUser>(
            "SELECT id, username FROM users WHERE is_active = TRUE ORDER BY random() LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            // Nothing to attribute the request to; leave no trace.
            tracing::debug!("no active users; skipping analytics recording");
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO fibonacci_requests (user_id, requested_n, result, execution_time_ms, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(user.id)
        .bind(n)
        .bind(result)
        .bind(execution_time_ms)
        .execute(&mut *tx)
        .await?;

        // One aggregate row per distinct number; the primary key makes the
        // upsert race-safe.
        sqlx::query(
            r#"
            INSERT INTO popular_numbers (number, request_count, last_requested)
            VALUES ($1, 1, NOW())
            ON CONFLICT (number) DO UPDATE
            SET request_count = popular_numbers.request_count + 1,
                last_requested = NOW()
            "#,
        )
        .bind(n)
        .execute(&mut *tx)
        .await?;

        let analytics = sqlx::query_as::<_, UserAnalyticsRow>(
            r#"
            SELECT
                COUNT(*) AS total_requests,
                COALESCE(AVG(execution_time_ms), 0) AS avg_execution_time_ms,
                COALESCE(MAX(requested_n), 0) AS max_number_requested,
                COALESCE(MIN(requested_n), 0) AS min_number_requested,
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '24 hours') AS requests_last_24h,
                COUNT(DISTINCT requested_n) AS unique_numbers_requested
            FROM fibonacci_requests
            WHERE user_id = $1
            "#,
        )
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await?;

        let popular_numbers = sqlx::query_as::<_, PopularNumber>(
            r#"
            SELECT number, request_count, last_requested
            FROM popular_numbers
            ORDER BY request_count DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let number_stats = sqlx::query_as::<_, NumberTimingStats>(
            r#"
            SELECT
                COALESCE(AVG(execution_time_ms), 0) AS avg_time_ms,
                COALESCE(MIN(execution_time_ms), 0) AS min_time_ms,
                COALESCE(MAX(execution_time_ms), 0) AS max_time_ms,
                COUNT(*) AS total_requests
            FROM fibonacci_requests
            WHERE requested_n = $1
            "#,
        )
        .bind(n)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(UserStatsBundle {
            user_id: user.id,
            username: user.username,
            total_requests: analytics.total_requests,
            avg_execution_time_ms: analytics.avg_execution_time_ms,
            max_number_requested: analytics.max_number_requested,
            min_number_requested: analytics.min_number_requested,
            requests_last_24h: analytics.requests_last_24h,
            unique_numbers_requested: analytics.unique_numbers_requested,
            popular_numbers,
            number_stats,
        }))
    }

    /// Fetches the top-`limit` most requested numbers, busiest first.
    pub async fn get_popular_numbers(&self, limit: i64) -> Result<Vec<PopularNumber>, DbError> {
        let rows = sqlx::query_as::<_, PopularNumber>(
            r#"
            SELECT number, request_count, last_requested
            FROM popular_numbers
            ORDER BY request_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetches the precomputed analytics row for one user from the
    /// `user_request_stats` view.
    pub async fn get_user_stats(&self, user_id: i32) -> Result<UserRequestStats, DbError> {
        sqlx::query_as::<_, UserRequestStats>(
            r#"
            SELECT user_id, username, total_requests, avg_execution_time_ms,
                   max_number_requested, min_number_requested,
                   unique_numbers_requested, last_request_at
            FROM user_request_stats
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    /// A cheap liveness probe used by the health endpoint.
    pub async fn ping(&self) -> Result<(), DbError> {
        let row = sqlx::query("SELECT 1 AS alive").fetch_one(&self.pool).await?;
        let _: i32 = row.get("alive");
        Ok(())
    }
}
