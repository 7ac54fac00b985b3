use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::PgPool;
use tera::Tera;

use crate::domain::{Locale, SubscriberStatus};
use crate::routes::{locale_for_token, LinkError, TokenKind, TokenParameters};
use crate::utils::render_message_page;

#[tracing::instrument(name = "Unsubscribe a subscriber", skip(db, tera, params))]
pub async fn unsubscribe(
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

    let page = match deactivate_subscriber(&db, token)
        .await
        .context("Failed to deactivate the subscriber.")?
    {
        Some(locale) => render_message_page(
            &tera,
            locale,
            "unsubscribe_success_title",
            "unsubscribe_success_body",
            StatusCode::OK,
        ),
        None => {
            let locale = locale_for_token(&db, TokenKind::Unsubscribe, token)
                .await
                .context("Failed to look up the subscriber locale.")?;
            render_message_page(
                &tera,
                locale,
                "unsubscribe_invalid_title",
                "unsubscribe_invalid_body",
                StatusCode::OK,
            )
        }
    };

    Ok(page)
}

/// Mark an active subscriber inactive, returning its locale.
///
/// `None` when the token is unknown or the subscriber already left.
#[tracing::instrument(name = "Deactivating subscriber", skip(db, token))]
pub async fn deactivate_subscriber(
    db: &PgPool,
    token: &str,
) -> Result<Option<Locale>, sqlx::Error> {
    let query = format!(
        "UPDATE subscribers SET is_active = false \
         WHERE unsubscribe_token = $1 AND {} \
         RETURNING locale",
        SubscriberStatus::sql_guard(|status| status.unsubscribe().is_some()),
    );
    let locale: Option<String> = sqlx::query_scalar(&query)
        .bind(token)
        .fetch_optional(db)
        .await?;

    Ok(locale.map(|l| Locale::from_code(&l).unwrap_or_default()))
}
