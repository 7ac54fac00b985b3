use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};

use crate::domain::ContactSubmission;

/// Files contact submissions as pages in a Notion database.
#[derive(Clone)]
pub struct NotionClient {
    base_url: String,
    http_client: reqwest::Client,
    token: Secret<String>,
    database_id: String,
    version: String,
    timeout: Duration,
}

#[derive(Debug, serde::Deserialize)]
pub struct CreatedPage {
    pub id: String,
}

fn rich_text(content: &str) -> Value {
    json!({ "rich_text": [{ "type": "text", "text": { "content": content } }] })
}

impl NotionClient {
    pub fn new(
        base_url: String,
        token: Secret<String>,
        database_id: String,
        version: String,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url,
            http_client: reqwest::Client::new(),
            token,
            database_id,
            version,
            timeout,
        }
    }

    fn page_properties(submission: &ContactSubmission) -> Value {
        let mut properties = json!({
            "Name": { "title": [{ "type": "text", "text": { "content": submission.name } }] },
            "Email": { "email": submission.email.as_ref() },
            "Message": rich_text(&submission.message),
            "Status": { "select": { "name": "New" } },
        });

        if let Some(organization) = &submission.organization {
            properties["Organization"] = rich_text(organization);
        }
        if let Some(service_type) = &submission.service_type {
            properties["Service Type"] = json!({ "select": { "name": service_type } });
        }

        properties
    }

    #[tracing::instrument(name = "Creating Notion page", skip(self, submission))]
    pub async fn create_page(
        &self,
        submission: &ContactSubmission,
    ) -> Result<CreatedPage, reqwest::Error> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": Self::page_properties(submission),
        });

        let page = self
            .http_client
            .post(format!("{}/v1/pages", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(self.token.expose_secret())
            .header("Notion-Version", &self.version)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(page)
    }
}
