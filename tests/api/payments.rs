use crate::helpers::{spawn_app, VALID_ACCESS_TOKEN};
use wiremock::{
    matchers::{any, body_string_contains, method, path},
    Mock, ResponseTemplate,
};

fn checkout_session() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": "cs_test_1",
        "url": "https://checkout.example.com/c/pay/cs_test_1"
    }))
}

#[tokio::test]
async fn payment_requires_a_bearer_token() {
    // GIVEN
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(checkout_session())
        .expect(0)
        .mount(&app.payment_server)
        .await;

    for endpoint in ["/create-payment", "/create-subscription"] {
        // WHEN
        let response = app
            .post_json(
                endpoint,
                &serde_json::json!({ "serviceName": "boiler-inspection", "subscriptionTier": "monthly" }),
                None,
            )
            .await;

        // THEN
        assert_eq!(response.status().as_u16(), 401, "{endpoint} allowed anonymous access");
    }
}

#[tokio::test]
async fn rejected_token_returns_401() {
    // GIVEN
    let app = spawn_app().await;

    Mock::given(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.auth_server)
        .await;

    // WHEN
    let response = app
        .post_json(
            "/create-payment",
            &serde_json::json!({ "serviceName": "boiler-inspection" }),
            Some("expired-token"),
        )
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn create_payment_returns_the_checkout_url() {
    // GIVEN
    let app = spawn_app().await;
    app.mock_signed_in_user("ada@example.com").await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(body_string_contains("mode=payment"))
        .and(body_string_contains("customer_email=ada%40example.com"))
        .respond_with(checkout_session())
        .expect(1)
        .mount(&app.payment_server)
        .await;

    // WHEN
    let response = app
        .post_json(
            "/create-payment",
            &serde_json::json!({ "serviceName": "boiler-inspection" }),
            Some(VALID_ACCESS_TOKEN),
        )
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["url"], "https://checkout.example.com/c/pay/cs_test_1");
}

#[tokio::test]
async fn unknown_service_returns_400() {
    // GIVEN
    let app = spawn_app().await;
    app.mock_signed_in_user("ada@example.com").await;

    // WHEN
    let response = app
        .post_json(
            "/create-payment",
            &serde_json::json!({ "serviceName": "time-machine" }),
            Some(VALID_ACCESS_TOKEN),
        )
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "unknown_service");
}

#[tokio::test]
async fn create_subscription_uses_the_tier_price() {
    // GIVEN
    let app = spawn_app().await;
    app.mock_signed_in_user("ada@example.com").await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(body_string_contains("mode=subscription"))
        .and(body_string_contains("price_yearly_retainer"))
        .respond_with(checkout_session())
        .expect(1)
        .mount(&app.payment_server)
        .await;

    // WHEN
    let response = app
        .post_json(
            "/create-subscription",
            &serde_json::json!({ "subscriptionTier": "yearly" }),
            Some(VALID_ACCESS_TOKEN),
        )
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["url"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn payment_provider_failure_returns_502() {
    // GIVEN
    let app = spawn_app().await;
    app.mock_signed_in_user("ada@example.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    // WHEN
    let response = app
        .post_json(
            "/create-subscription",
            &serde_json::json!({ "subscriptionTier": "monthly" }),
            Some(VALID_ACCESS_TOKEN),
        )
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 502);
}
