use std::time::Duration;

use secrecy::{ExposeSecret, Secret};

/// Creates hosted checkout sessions on the payment provider.
#[derive(Clone)]
pub struct PaymentClient {
    base_url: String,
    http_client: reqwest::Client,
    secret_key: Secret<String>,
    success_url: String,
    cancel_url: String,
    timeout: Duration,
}

/// What the customer is about to pay for.
#[derive(Debug, Clone, Copy)]
pub enum CheckoutItem<'a> {
    /// A single purchase priced inline, amount in minor units.
    OneTime {
        name: &'a str,
        amount: i64,
        currency: &'a str,
    },
    /// A recurring plan referencing a price defined on the provider.
    Recurring { price_id: &'a str },
}

impl CheckoutItem<'_> {
    fn mode(&self) -> &'static str {
        match self {
            CheckoutItem::OneTime { .. } => "payment",
            CheckoutItem::Recurring { .. } => "subscription",
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

impl PaymentClient {
    pub fn new(
        base_url: String,
        secret_key: Secret<String>,
        success_url: String,
        cancel_url: String,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url,
            http_client: reqwest::Client::new(),
            secret_key,
            success_url,
            cancel_url,
            timeout,
        }
    }

    #[tracing::instrument(name = "Creating checkout session", skip(self, customer_email))]
    pub async fn create_checkout_session(
        &self,
        item: CheckoutItem<'_>,
        customer_email: Option<&str>,
        client_reference_id: &str,
    ) -> Result<CheckoutSession, reqwest::Error> {
        let mut form: Vec<(&str, String)> = vec![
            ("mode", item.mode().to_string()),
            ("success_url", self.success_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
            ("client_reference_id", client_reference_id.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
        ];

        match item {
            CheckoutItem::OneTime {
                name,
                amount,
                currency,
            } => {
                form.push(("line_items[0][price_data][currency]", currency.to_string()));
                form.push(("line_items[0][price_data][unit_amount]", amount.to_string()));
                form.push((
                    "line_items[0][price_data][product_data][name]",
                    name.to_string(),
                ));
            }
            CheckoutItem::Recurring { price_id } => {
                form.push(("line_items[0][price]", price_id.to_string()));
            }
        }

        if let Some(email) = customer_email {
            form.push(("customer_email", email.to_string()));
        }

        let session = self
            .http_client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(session)
    }
}
