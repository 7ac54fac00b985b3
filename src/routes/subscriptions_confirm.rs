use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;
use sqlx::PgPool;
use tera::Tera;

use crate::domain::{Locale, SubscriberStatus};
use crate::utils::{error_chain_fmt, render_message_page};

#[derive(Deserialize)]
pub struct TokenParameters {
    token: Option<String>,
}

impl TokenParameters {
    /// The token, if present and not blank.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Failure while following a link from an email. Expected outcomes such as a
/// reused token are rendered as pages, not errors.
#[derive(thiserror::Error)]
pub enum LinkError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for LinkError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[tracing::instrument(name = "Confirm a pending subscriber", skip(db, tera, params))]
pub async fn confirm(
    db: web::Data<PgPool>,
    tera: web::Data<Tera>,
    params: web::Query<TokenParameters>,
) -> Result<HttpResponse, LinkError> {
    let Some(token) = params.token() else {
        return Ok(render_message_page(
            &tera,
            Locale::default(),
            "missing_token_title",
            "missing_token_body",
            StatusCode::BAD_REQUEST,
        ));
    };

    let page = match confirm_subscriber(&db, token)
        .await
        .context("Failed to confirm the subscriber.")?
    {
        Some(locale) => render_message_page(
            &tera,
            locale,
            "confirm_success_title",
            "confirm_success_body",
            StatusCode::OK,
        ),
        None => {
            let locale = locale_for_token(&db, TokenKind::Confirmation, token)
                .await
                .context("Failed to look up the subscriber locale.")?;
            render_message_page(
                &tera,
                locale,
                "confirm_invalid_title",
                "confirm_invalid_body",
                StatusCode::OK,
            )
        }
    };

    Ok(page)
}

/// Flip a pending subscriber to confirmed, returning its locale.
///
/// `None` when the token is unknown or the subscriber is no longer pending.
/// The state check lives in the UPDATE itself so a replayed link is a no-op.
#[tracing::instrument(name = "Confirming subscription", skip(db, token))]
pub async fn confirm_subscriber(db: &PgPool, token: &str) -> Result<Option<Locale>, sqlx::Error> {
    let query = format!(
        "UPDATE subscribers SET is_confirmed = true, confirmed_at = now() \
         WHERE confirmation_token = $1 AND {} \
         RETURNING locale",
        SubscriberStatus::sql_guard(|status| status.confirm().is_some()),
    );
    let locale: Option<String> = sqlx::query_scalar(&query)
        .bind(token)
        .fetch_optional(db)
        .await?;

    Ok(locale.map(|l| Locale::from_code(&l).unwrap_or_default()))
}

/// Which of the subscriber's tokens a link carries.
#[derive(Debug, Clone, Copy)]
pub enum TokenKind {
    Confirmation,
    Unsubscribe,
}

/// Locale of whoever owns `token`, English when nobody does.
pub async fn locale_for_token(
    db: &PgPool,
    kind: TokenKind,
    token: &str,
) -> Result<Locale, sqlx::Error> {
    let query = match kind {
        TokenKind::Confirmation => "SELECT locale FROM subscribers WHERE confirmation_token = $1",
        TokenKind::Unsubscribe => "SELECT locale FROM subscribers WHERE unsubscribe_token = $1",
    };
    let locale: Option<String> = sqlx::query_scalar(query)
        .bind(token)
        .fetch_optional(db)
        .await?;

    Ok(locale
        .and_then(|l| Locale::from_code(&l))
        .unwrap_or_default())
}
