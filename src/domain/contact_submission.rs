use unicode_segmentation::UnicodeSegmentation;

use crate::domain::{sanitize_input, EmailAddress};

const MAX_NAME_GRAPHEMES: usize = 256;

/// Raw contact form payload, shared by the email and Notion relays.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmissionBody {
    pub name: String,
    pub email: String,
    pub organization: Option<String>,
    pub message: String,
    pub service_type: Option<String>,
}

/// A sanitized and validated contact form submission.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: String,
    pub email: EmailAddress,
    pub organization: Option<String>,
    pub message: String,
    pub service_type: Option<String>,
}

fn optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| sanitize_input(&v))
        .filter(|v| !v.is_empty())
}

impl TryFrom<ContactSubmissionBody> for ContactSubmission {
    type Error = String;

    fn try_from(value: ContactSubmissionBody) -> Result<Self, Self::Error> {
        let name = sanitize_input(&value.name);
        if name.is_empty() {
            return Err("name must not be empty".into());
        }
        if name.graphemes(true).count() > MAX_NAME_GRAPHEMES {
            return Err(format!("name is longer than {MAX_NAME_GRAPHEMES} characters"));
        }

        let email = EmailAddress::parse(value.email)?;

        let message = sanitize_input(&value.message);
        if message.is_empty() {
            return Err("message must not be empty".into());
        }

        Ok(Self {
            name,
            email,
            organization: optional_field(value.organization),
            message,
            service_type: optional_field(value.service_type),
        })
    }
}
