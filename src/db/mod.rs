//! PostgreSQL store access.
//!
//! # Design Decisions
//! - Connections are created lazily; a cold store surfaces as a request
//!   failure, not a startup crash
//! - Every query runs under the configured timeout
//! - The listing tables pre-date this service and have arbitrary
//!   columns, so rows are projected to JSON in the store itself
//! - TLS certificate verification is on unless explicitly opted out

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::config::schema::DatabaseConfig;
use crate::error::AppError;

/// A contact form submission as received from a caller.
#[derive(Debug, Deserialize)]
pub struct NewSubmission {
    pub name: String,
    pub number: String,
    pub email: String,
    pub message: String,
}

impl NewSubmission {
    /// Presence check: every field must be non-empty after trimming.
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("name", &self.name),
            ("number", &self.number),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// A persisted submission: the generated identifier plus the four
/// submitted fields.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Submission {
    pub id: i32,
    pub name: String,
    pub number: String,
    pub email: String,
    pub message: String,
}

/// Handle to the relational store.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
    query_timeout: Duration,
}

impl Store {
    /// Build the connection pool. No connection is attempted here; the
    /// first query pays the cost and reports the failure.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let ssl_mode = if config.tls_insecure {
            tracing::warn!("Store TLS certificate verification is disabled");
            PgSslMode::Require
        } else {
            PgSslMode::VerifyFull
        };

        let options = config.url.parse::<PgConnectOptions>()?.ssl_mode(ssl_mode);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        })
    }

    /// All rows of the `otherservice` listing table.
    pub async fn list_other_service(&self) -> Result<Vec<Value>, AppError> {
        self.fetch_rows("SELECT to_jsonb(t) FROM otherservice AS t")
            .await
    }

    /// All rows of the `services_content` listing table.
    pub async fn list_services_content(&self) -> Result<Vec<Value>, AppError> {
        self.fetch_rows("SELECT to_jsonb(t) FROM services_content AS t")
            .await
    }

    /// Insert one form submission and return the stored row.
    pub async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<Submission, AppError> {
        let query = sqlx::query_as::<_, Submission>(
            "INSERT INTO form_request (name, number, email, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, number, email, message",
        )
        .bind(&submission.name)
        .bind(&submission.number)
        .bind(&submission.email)
        .bind(&submission.message)
        .fetch_one(&self.pool);

        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(row) => Ok(row?),
            Err(_) => Err(AppError::StoreTimeout),
        }
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Value>, AppError> {
        let query = sqlx::query_scalar::<_, Value>(sql).fetch_all(&self.pool);

        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(rows) => Ok(rows?),
            Err(_) => Err(AppError::StoreTimeout),
        }
    }
}
