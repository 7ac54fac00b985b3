use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::domain::EmailAddress;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email: EmailSettings,
    pub auth: AuthSettings,
    pub payment: PaymentSettings,
    pub notion: NotionSettings,
    pub contact: ContactSettings,
    pub newsletter: NewsletterSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub base_url: String,
}

/// Public URL the service is reachable at, used to build links in emails.
#[derive(Debug, Clone)]
pub struct ApplicationBaseUrl(pub String);

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailSettings {
    pub base_url: String,
    pub sender_email: String,
    pub token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct PaymentSettings {
    pub base_url: String,
    pub secret_key: Secret<String>,
    pub success_url: String,
    pub cancel_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    #[serde(default)]
    pub services: Vec<ServiceOffering>,
    #[serde(default)]
    pub tiers: Vec<SubscriptionPlan>,
}

/// A one-off service that can be bought through checkout.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct ServiceOffering {
    pub name: String,
    pub display_name: String,
    /// Price in the currency's minor unit.
    pub amount: i64,
    pub currency: String,
}

/// A recurring plan, mapped to a price configured on the payment provider.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct SubscriptionPlan {
    pub tier: String,
    pub price_id: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct NotionSettings {
    pub base_url: String,
    pub token: Secret<String>,
    pub database_id: String,
    pub version: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct ContactSettings {
    pub recipient: String,
    pub zapier_webhook: Option<String>,
}

#[derive(serde::Deserialize, Clone)]
pub struct NewsletterSettings {
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

#[derive(strum::EnumString, strum::AsRefStr, Debug, PartialEq)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Local,
    Production,
}

impl Settings {
    pub fn get() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir().expect("Failed to determine the current directory");
        let configuration_directory = base_path.join("configuration");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .parse()
            .map_err(|_| {
                config::ConfigError::Message(
                    "APP_ENVIRONMENT must be either `local` or `production`".into(),
                )
            })?;

        Self::from_directory(&configuration_directory, environment)
    }

    /// `base.yaml`, then `<environment>.yaml`, then `APP_*` variables.
    pub fn from_directory(
        configuration_directory: &Path,
        environment: Environment,
    ) -> Result<Self, config::ConfigError> {
        let environment_filename = format!("{}.yaml", environment.as_ref());

        let settings = config::Config::builder()
            .add_source(config::File::from(configuration_directory.join("base.yaml")))
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize::<Self>()
    }
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

impl EmailSettings {
    pub fn sender(&self) -> Result<EmailAddress, String> {
        EmailAddress::parse(self.sender_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl AuthSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl PaymentSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl NotionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl ContactSettings {
    pub fn recipient(&self) -> Result<EmailAddress, String> {
        EmailAddress::parse(self.recipient.clone())
    }

    /// The Zapier hook to mirror contact submissions to, if one is configured.
    ///
    /// Only `https` URLs on `hooks.zapier.com` are accepted.
    pub fn zapier_webhook(&self) -> Result<Option<Url>, String> {
        let raw = match self.zapier_webhook.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };

        let url = Url::parse(raw).map_err(|e| format!("{raw} is not a valid webhook URL: {e}"))?;
        if url.scheme() != "https" || url.host_str() != Some("hooks.zapier.com") {
            return Err(format!("{raw} is not a Zapier webhook URL"));
        }

        Ok(Some(url))
    }
}
