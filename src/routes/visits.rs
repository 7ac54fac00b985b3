use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use sqlx::PgPool;

use crate::utils::{error_chain_fmt, json_error};

const GLOBAL_METRICS_ID: &str = "global";

#[derive(thiserror::Error)]
pub enum VisitsError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for VisitsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for VisitsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), "internal_error")
    }
}

#[tracing::instrument(name = "Incrementing the visit counter", skip(db))]
pub async fn increment_visits(db: web::Data<PgPool>) -> Result<HttpResponse, VisitsError> {
    let total_visits = increment_global_visits(&db)
        .await
        .context("Failed to increment the visit counter.")?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "total_visits": total_visits })))
}

/// Read the global counter and write it back incremented.
///
/// This is a plain read-modify-write without a lock: concurrent requests can
/// lose increments. The counter is a vanity number and tolerates that.
pub async fn increment_global_visits(db: &PgPool) -> Result<i64, sqlx::Error> {
    let current: Option<i64> =
        sqlx::query_scalar("SELECT total_visits FROM site_metrics WHERE id = $1")
            .bind(GLOBAL_METRICS_ID)
            .fetch_optional(db)
            .await?;

    let total_visits = match current {
        None => {
            sqlx::query(
                "INSERT INTO site_metrics (id, total_visits, updated_at) VALUES ($1, 1, now()) \
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(GLOBAL_METRICS_ID)
            .execute(db)
            .await?;
            1
        }
        Some(current) => {
            let next = current + 1;
            sqlx::query("UPDATE site_metrics SET total_visits = $2, updated_at = now() WHERE id = $1")
                .bind(GLOBAL_METRICS_ID)
                .bind(next)
                .execute(db)
                .await?;
            next
        }
    };

    Ok(total_visits)
}
