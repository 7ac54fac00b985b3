use std::time::Duration;

use reqwest::Url;

use crate::domain::ContactSubmission;

/// Mirrors contact submissions to a Zapier catch hook.
#[derive(Clone)]
pub struct ZapierClient {
    webhook: Url,
    http_client: reqwest::Client,
    timeout: Duration,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    name: &'a str,
    email: &'a str,
    organization: Option<&'a str>,
    message: &'a str,
    service_type: Option<&'a str>,
    submitted_at: chrono::DateTime<chrono::Utc>,
}

impl ZapierClient {
    pub fn new(webhook: Url, timeout: Duration) -> Self {
        Self {
            webhook,
            http_client: reqwest::Client::new(),
            timeout,
        }
    }

    #[tracing::instrument(name = "Forwarding submission to Zapier", skip(self, submission))]
    pub async fn forward(&self, submission: &ContactSubmission) -> Result<(), reqwest::Error> {
        let payload = WebhookPayload {
            name: &submission.name,
            email: submission.email.as_ref(),
            organization: submission.organization.as_deref(),
            message: &submission.message,
            service_type: submission.service_type.as_deref(),
            submitted_at: chrono::Utc::now(),
        };

        self.http_client
            .post(self.webhook.clone())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
