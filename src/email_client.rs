use std::time::Duration;

use crate::domain::EmailAddress;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

#[derive(Clone)]
pub struct EmailClient {
    base_url: String,
    http_client: reqwest::Client,
    sender: EmailAddress,
    token: Secret<String>,
    timeout: Duration,
}

#[derive(Serialize)]
struct SendEmailRequestBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: EmailAddress,
        token: Secret<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            sender,
            token,
            timeout,
        }
    }

    pub async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), reqwest::Error> {
        self.send(recipient, None, subject, html_body, text_body).await
    }

    /// Like [`EmailClient::send_email`], with replies directed to `reply_to`.
    pub async fn send_email_with_reply_to(
        &self,
        recipient: &EmailAddress,
        reply_to: &EmailAddress,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), reqwest::Error> {
        self.send(recipient, Some(reply_to), subject, html_body, text_body)
            .await
    }

    async fn send(
        &self,
        recipient: &EmailAddress,
        reply_to: Option<&EmailAddress>,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/emails", self.base_url);
        let body = SendEmailRequestBody {
            from: self.sender.as_ref(),
            to: [recipient.as_ref()],
            subject,
            html: html_body,
            text: text_body,
            reply_to: reply_to.map(AsRef::as_ref),
        };

        self.http_client
            .post(url)
            .timeout(self.timeout)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
