use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use tera::Tera;
use uuid::Uuid;

use crate::authentication::Authenticated;
use crate::configuration::ApplicationBaseUrl;
use crate::domain::{pseudonymize, EmailAddress, Locale, SubscriberStatus};
use crate::email_client::EmailClient;
use crate::utils::{error_chain_fmt, json_error, localized_context};

/// Accounts allowed to publish newsletter issues.
#[derive(Debug, Clone, Default)]
pub struct NewsletterAdmins(pub Vec<String>);

impl NewsletterAdmins {
    pub fn allows(&self, email: Option<&str>) -> bool {
        email.map_or(false, |email| {
            self.0.iter().any(|admin| admin.eq_ignore_ascii_case(email))
        })
    }
}

#[derive(serde::Deserialize)]
pub struct NewsletterBody {
    title: String,
    content: NewsletterContent,
}

#[derive(serde::Deserialize)]
pub struct NewsletterContent {
    text: String,
    html: String,
}

#[derive(sqlx::FromRow)]
struct ConfirmedSubscriber {
    email: String,
    locale: String,
    unsubscribe_token: String,
}

#[derive(thiserror::Error)]
pub enum PublishError {
    #[error("Only newsletter admins may publish issues.")]
    Forbidden,
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PublishError {
    fn status_code(&self) -> StatusCode {
        match self {
            PublishError::Forbidden => StatusCode::FORBIDDEN,
            PublishError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PublishError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = match self {
            PublishError::Forbidden => "forbidden",
            PublishError::ValidationError(_) => "invalid_newsletter",
            PublishError::UnexpectedError(_) => "internal_error",
        };
        json_error(self.status_code(), code)
    }
}

#[tracing::instrument(
    name = "Publishing a newsletter issue",
    skip(user, body, admins, db, email_client, base_url, tera),
    fields(user_id = %user.0.id, issue_id = tracing::field::Empty),
)]
pub async fn post_newsletter(
    user: Authenticated,
    body: web::Json<NewsletterBody>,
    admins: web::Data<NewsletterAdmins>,
    db: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<ApplicationBaseUrl>,
    tera: web::Data<Tera>,
) -> Result<HttpResponse, PublishError> {
    if !admins.allows(user.0.email.as_deref()) {
        return Err(PublishError::Forbidden);
    }

    let body = body.into_inner();
    if body.title.trim().is_empty() {
        return Err(PublishError::ValidationError("title must not be empty".into()));
    }

    let issue_id = insert_newsletter_issue(&db, &body)
        .await
        .context("Failed to store the newsletter issue.")?;
    tracing::Span::current().record("issue_id", tracing::field::display(issue_id));

    let subscribers = get_confirmed_subscribers(&db)
        .await
        .context("Failed to fetch confirmed subscribers.")?;

    let (mut sent, mut failed) = (0usize, 0usize);
    for subscriber in subscribers {
        let delivery = deliver_issue(&email_client, &tera, &base_url.0, &body, &subscriber).await;
        match delivery {
            Ok(()) => sent += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    error.cause_chain = ?e,
                    subscriber = %pseudonymize(&subscriber.email),
                    "Skipping a subscriber the issue could not be delivered to",
                );
            }
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "issue_id": issue_id,
        "sent": sent,
        "failed": failed,
    })))
}

async fn deliver_issue(
    email_client: &EmailClient,
    tera: &Tera,
    base_url: &str,
    issue: &NewsletterBody,
    subscriber: &ConfirmedSubscriber,
) -> Result<(), anyhow::Error> {
    let recipient =
        EmailAddress::parse(subscriber.email.clone()).map_err(|e| anyhow::anyhow!(e))?;
    let locale = Locale::from_code(&subscriber.locale).unwrap_or_default();
    let unsubscribe_link = format!(
        "{base_url}/unsubscribe?token={}",
        subscriber.unsubscribe_token
    );

    let mut context = localized_context(locale);
    context.insert("unsubscribe_link", &unsubscribe_link);

    context.insert("content", &issue.content.html);
    let html_body = tera.render("emails/newsletter.html", &context)?;
    context.insert("content", &issue.content.text);
    let text_body = tera.render("emails/newsletter.txt", &context)?;

    email_client
        .send_email(&recipient, &issue.title, &html_body, &text_body)
        .await?;

    Ok(())
}

#[tracing::instrument(name = "Storing newsletter issue", skip(db, issue))]
async fn insert_newsletter_issue(db: &PgPool, issue: &NewsletterBody) -> Result<Uuid, sqlx::Error> {
    let issue_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO newsletter_issues (id, title, text_content, html_content, published_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(issue_id)
    .bind(&issue.title)
    .bind(&issue.content.text)
    .bind(&issue.content.html)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(issue_id)
}

#[tracing::instrument(name = "Getting confirmed subscribers", skip(db))]
async fn get_confirmed_subscribers(db: &PgPool) -> Result<Vec<ConfirmedSubscriber>, sqlx::Error> {
    let query = format!(
        "SELECT email, locale, unsubscribe_token FROM subscribers WHERE {}",
        SubscriberStatus::sql_guard(SubscriberStatus::receives_newsletters),
    );
    sqlx::query_as::<_, ConfirmedSubscriber>(&query)
        .fetch_all(db)
        .await
}
