use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use tera::Tera;
use uuid::Uuid;

use crate::configuration::ApplicationBaseUrl;
use crate::domain::{generate_token, pseudonymize, EmailAddress, Locale, NewSubscriber};
use crate::email_client::EmailClient;
use crate::i18n;
use crate::utils::{error_chain_fmt, json_error, localized_context};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(serde::Deserialize)]
pub struct SubscribeBody {
    pub email: String,
    pub locale: Option<String>,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("This email address is already subscribed.")]
    AlreadySubscribed,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::AlreadySubscribed => StatusCode::CONFLICT,
            SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = match self {
            SubscribeError::ValidationError(_) => "invalid_email",
            SubscribeError::AlreadySubscribed => "already_subscribed",
            SubscribeError::UnexpectedError(_) => "internal_error",
        };
        json_error(self.status_code(), code)
    }
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, db, email_client, base_url, tera),
    fields(subscriber = %pseudonymize(&body.email)),
)]
pub async fn subscribe(
    body: web::Json<SubscribeBody>,
    db: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<ApplicationBaseUrl>,
    tera: web::Data<Tera>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = body
        .into_inner()
        .try_into()
        .map_err(SubscribeError::ValidationError)?;

    let confirmation_token = match insert_subscriber(&db, &new_subscriber).await {
        Ok(token) => token,
        Err(e) if is_unique_violation(&e) => return Err(SubscribeError::AlreadySubscribed),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context("Failed to insert new subscriber in the database.")
                .into())
        }
    };

    // The row stays pending if this fails; the client may ask for a resend.
    send_confirmation_email(
        &email_client,
        &tera,
        &base_url.0,
        &new_subscriber.email,
        new_subscriber.locale,
        &confirmation_token,
    )
    .await
    .context("Failed to send a confirmation email.")?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_error| db_error.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION)
}

/// Store a pending subscriber and return its confirmation token.
#[tracing::instrument(name = "Persisting subscriber to database", skip(db, new_subscriber))]
pub async fn insert_subscriber(
    db: &PgPool,
    new_subscriber: &NewSubscriber,
) -> Result<String, sqlx::Error> {
    let confirmation_token = generate_token();

    sqlx::query(
        "INSERT INTO subscribers \
         (id, email, locale, is_confirmed, confirmation_token, is_active, unsubscribe_token, subscribed_at) \
         VALUES ($1, $2, $3, false, $4, true, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(new_subscriber.email.as_ref())
    .bind(new_subscriber.locale.as_ref())
    .bind(&confirmation_token)
    .bind(generate_token())
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(confirmation_token)
}

#[tracing::instrument(
    name = "Sending a confirmation email",
    skip(email_client, tera, base_url, recipient, confirmation_token),
    fields(subscriber = %pseudonymize(recipient.as_ref())),
)]
pub async fn send_confirmation_email(
    email_client: &EmailClient,
    tera: &Tera,
    base_url: &str,
    recipient: &EmailAddress,
    locale: Locale,
    confirmation_token: &str,
) -> Result<(), anyhow::Error> {
    let confirmation_link = format!("{base_url}/confirm-newsletter?token={confirmation_token}");

    let mut context = localized_context(locale);
    context.insert("confirmation_link", &confirmation_link);

    let html_body = tera
        .render("emails/confirmation.html", &context)
        .context("Failed to render the confirmation email.")?;
    let text_body = tera
        .render("emails/confirmation.txt", &context)
        .context("Failed to render the confirmation email.")?;

    email_client
        .send_email(
            recipient,
            i18n::translate(locale, "email_confirm_subject"),
            &html_body,
            &text_body,
        )
        .await?;

    Ok(())
}

#[derive(serde::Deserialize)]
pub struct ResendConfirmationBody {
    pub email: String,
}

#[derive(sqlx::FromRow)]
struct PendingSubscriber {
    confirmation_token: String,
    locale: String,
}

#[derive(thiserror::Error)]
pub enum ResendConfirmationError {
    #[error("{0}")]
    ValidationError(String),
    #[error("No pending subscription exists for this email address.")]
    NotPending,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ResendConfirmationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ResendConfirmationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ResendConfirmationError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ResendConfirmationError::NotPending => StatusCode::NOT_FOUND,
            ResendConfirmationError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = match self {
            ResendConfirmationError::ValidationError(_) => "invalid_email",
            ResendConfirmationError::NotPending => "not_pending",
            ResendConfirmationError::UnexpectedError(_) => "internal_error",
        };
        json_error(self.status_code(), code)
    }
}

#[tracing::instrument(
    name = "Resending a confirmation email",
    skip(body, db, email_client, base_url, tera),
    fields(subscriber = %pseudonymize(&body.email)),
)]
pub async fn send_newsletter_confirmation(
    body: web::Json<ResendConfirmationBody>,
    db: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<ApplicationBaseUrl>,
    tera: web::Data<Tera>,
) -> Result<HttpResponse, ResendConfirmationError> {
    let email = EmailAddress::parse(body.into_inner().email)
        .map_err(ResendConfirmationError::ValidationError)?;

    let pending = sqlx::query_as::<_, PendingSubscriber>(
        "SELECT confirmation_token, locale FROM subscribers \
         WHERE email = $1 AND is_confirmed = false AND is_active = true",
    )
    .bind(email.as_ref())
    .fetch_optional(db.get_ref())
    .await
    .context("Failed to look up the pending subscriber.")?
    .ok_or(ResendConfirmationError::NotPending)?;

    send_confirmation_email(
        &email_client,
        &tera,
        &base_url.0,
        &email,
        Locale::from_code(&pending.locale).unwrap_or_default(),
        &pending.confirmation_token,
    )
    .await
    .context("Failed to send a confirmation email.")?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
