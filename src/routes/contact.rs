use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use tera::Tera;

use crate::domain::{pseudonymize, ContactSubmission, ContactSubmissionBody, EmailAddress};
use crate::email_client::EmailClient;
use crate::notion_client::NotionClient;
use crate::utils::{error_chain_fmt, json_error};
use crate::zapier_client::ZapierClient;

/// Inbox that receives contact form submissions.
#[derive(Debug, Clone)]
pub struct ContactRecipient(pub EmailAddress);

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to relay the submission.")]
    RelayError(#[source] anyhow::Error),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ContactError::RelayError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = match self {
            ContactError::ValidationError(_) => "invalid_submission",
            ContactError::RelayError(_) => "relay_failed",
        };
        json_error(self.status_code(), code)
    }
}

fn parse_submission(body: web::Json<ContactSubmissionBody>) -> Result<ContactSubmission, ContactError> {
    body.into_inner()
        .try_into()
        .map_err(ContactError::ValidationError)
}

#[tracing::instrument(
    name = "Relaying a contact form",
    skip(body, email_client, recipient, zapier, tera),
    fields(sender = %pseudonymize(&body.email)),
)]
pub async fn send_contact_form(
    body: web::Json<ContactSubmissionBody>,
    email_client: web::Data<EmailClient>,
    recipient: web::Data<ContactRecipient>,
    zapier: web::Data<Option<ZapierClient>>,
    tera: web::Data<Tera>,
) -> Result<HttpResponse, ContactError> {
    let submission = parse_submission(body)?;

    let mut context = tera::Context::new();
    context.insert("name", &submission.name);
    context.insert("email", submission.email.as_ref());
    context.insert("organization", &submission.organization);
    context.insert("message", &submission.message);
    context.insert("service_type", &submission.service_type);

    let html_body = tera
        .render("emails/contact.html", &context)
        .context("Failed to render the contact email.")
        .map_err(ContactError::RelayError)?;
    let text_body = tera
        .render("emails/contact.txt", &context)
        .context("Failed to render the contact email.")
        .map_err(ContactError::RelayError)?;

    email_client
        .send_email_with_reply_to(
            &recipient.0,
            &submission.email,
            &format!("Contact form: {}", submission.name),
            &html_body,
            &text_body,
        )
        .await
        .context("Failed to deliver the contact email.")
        .map_err(ContactError::RelayError)?;

    if let Some(zapier) = zapier.get_ref() {
        if let Err(e) = zapier.forward(&submission).await {
            tracing::warn!(error.cause_chain = ?e, "Failed to mirror the submission to Zapier");
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[tracing::instrument(
    name = "Submitting a contact form to Notion",
    skip(body, notion_client),
    fields(sender = %pseudonymize(&body.email)),
)]
pub async fn submit_to_notion(
    body: web::Json<ContactSubmissionBody>,
    notion_client: web::Data<NotionClient>,
) -> Result<HttpResponse, ContactError> {
    let submission = parse_submission(body)?;

    let page = notion_client
        .create_page(&submission)
        .await
        .context("Failed to create the Notion page.")
        .map_err(ContactError::RelayError)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "id": page.id })))
}
