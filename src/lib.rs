pub mod auth_client;
pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod i18n;
pub mod notion_client;
pub mod payment_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
pub mod zapier_client;
