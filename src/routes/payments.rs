use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::authentication::Authenticated;
use crate::configuration::{PaymentSettings, ServiceOffering, SubscriptionPlan};
use crate::payment_client::{CheckoutItem, PaymentClient};
use crate::utils::{error_chain_fmt, json_error};

/// What can be bought: one-off services and recurring tiers.
#[derive(Debug, Clone, Default)]
pub struct PaymentCatalog {
    services: Vec<ServiceOffering>,
    tiers: Vec<SubscriptionPlan>,
}

impl PaymentCatalog {
    pub fn new(services: Vec<ServiceOffering>, tiers: Vec<SubscriptionPlan>) -> Self {
        Self { services, tiers }
    }

    pub fn service(&self, name: &str) -> Option<&ServiceOffering> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn tier(&self, tier: &str) -> Option<&SubscriptionPlan> {
        self.tiers.iter().find(|t| t.tier.eq_ignore_ascii_case(tier))
    }
}

impl From<&PaymentSettings> for PaymentCatalog {
    fn from(settings: &PaymentSettings) -> Self {
        Self::new(settings.services.clone(), settings.tiers.clone())
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentBody {
    pub service_name: String,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionBody {
    pub subscription_tier: String,
}

#[derive(thiserror::Error)]
pub enum PaymentError {
    #[error("Unknown service: {0}")]
    UnknownService(String),
    #[error("Unknown subscription tier: {0}")]
    UnknownTier(String),
    #[error("The payment provider failed to create a checkout session.")]
    ProviderError(#[source] reqwest::Error),
}

impl std::fmt::Debug for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PaymentError {
    fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::UnknownService(_) | PaymentError::UnknownTier(_) => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::ProviderError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = match self {
            PaymentError::UnknownService(_) => "unknown_service",
            PaymentError::UnknownTier(_) => "unknown_tier",
            PaymentError::ProviderError(_) => "payment_provider_error",
        };
        json_error(self.status_code(), code)
    }
}

#[tracing::instrument(
    name = "Creating a one-time payment",
    skip(user, body, catalog, payment_client),
    fields(user_id = %user.0.id, service = %body.service_name),
)]
pub async fn create_payment(
    user: Authenticated,
    body: web::Json<CreatePaymentBody>,
    catalog: web::Data<PaymentCatalog>,
    payment_client: web::Data<PaymentClient>,
) -> Result<HttpResponse, PaymentError> {
    let service = catalog
        .service(&body.service_name)
        .ok_or_else(|| PaymentError::UnknownService(body.service_name.clone()))?;

    let item = CheckoutItem::OneTime {
        name: &service.display_name,
        amount: service.amount,
        currency: &service.currency,
    };
    let session = payment_client
        .create_checkout_session(item, user.0.email.as_deref(), &user.0.id.to_string())
        .await
        .map_err(PaymentError::ProviderError)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "url": session.url })))
}

#[tracing::instrument(
    name = "Creating a recurring subscription",
    skip(user, body, catalog, payment_client),
    fields(user_id = %user.0.id, tier = %body.subscription_tier),
)]
pub async fn create_subscription(
    user: Authenticated,
    body: web::Json<CreateSubscriptionBody>,
    catalog: web::Data<PaymentCatalog>,
    payment_client: web::Data<PaymentClient>,
) -> Result<HttpResponse, PaymentError> {
    let plan = catalog
        .tier(&body.subscription_tier)
        .ok_or_else(|| PaymentError::UnknownTier(body.subscription_tier.clone()))?;

    let item = CheckoutItem::Recurring {
        price_id: &plan.price_id,
    };
    let session = payment_client
        .create_checkout_session(item, user.0.email.as_deref(), &user.0.id.to_string())
        .await
        .map_err(PaymentError::ProviderError)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "url": session.url })))
}
