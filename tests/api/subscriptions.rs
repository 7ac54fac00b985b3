use crate::helpers::{email, spawn_app};
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

#[derive(sqlx::FromRow)]
struct SavedSubscriber {
    email: String,
    locale: String,
    is_confirmed: bool,
    is_active: bool,
}

#[tokio::test]
async fn subscribe_returns_200_for_valid_email() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // WHEN
    let result = app.post_subscriptions(&email).await;

    // THEN
    assert_eq!(200, result.status().as_u16());
}

#[tokio::test]
async fn subscribe_persists_a_pending_subscriber() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    // WHEN
    app.post_json(
        "/subscribe",
        &serde_json::json!({ "email": email, "locale": "sv-SE" }),
        None,
    )
    .await;

    let saved = sqlx::query_as::<_, SavedSubscriber>(
        "SELECT email, locale, is_confirmed, is_active FROM subscribers",
    )
    .fetch_one(&app.database)
    .await
    .expect("Failed to get subscribers");

    // THEN
    assert_eq!(saved.email, email);
    assert_eq!(saved.locale, "sv");
    assert!(!saved.is_confirmed);
    assert!(saved.is_active);
}

#[tokio::test]
async fn subscribe_returns_400_on_invalid_email() {
    // GIVEN
    let app = spawn_app().await;
    let test_cases = [
        (serde_json::json!({}), "no email"),
        (serde_json::json!({ "email": "" }), "empty email"),
        (serde_json::json!({ "email": "user@" }), "no domain in email"),
        (serde_json::json!({ "email": "@example.com" }), "no user in email"),
        (serde_json::json!({ "email": "invalidemail.com" }), "no @ sign in email"),
        (
            serde_json::json!({ "email": format!("{}@example.com", "a".repeat(250)) }),
            "overlong email",
        ),
    ];

    for (invalid_body, why_invalid_body_message) in test_cases {
        // WHEN
        let result = app.post_json("/subscribe", &invalid_body, None).await;

        // THEN
        assert_eq!(
            400,
            result.status().as_u16(),
            "The API did not fail properly with Bad Request (400) when the body had {why_invalid_body_message}"
        );
    }
}

#[tokio::test]
async fn subscribe_sends_a_confirmation_email_with_a_link() {
    // GIVEN
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // WHEN
    app.post_subscriptions(&email()).await;

    // THEN
    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let links = app.get_email_links(email_request);
    assert_eq!(links.html, links.plain_text);
    assert_eq!(links.html.path(), "/confirm-newsletter");
}

#[tokio::test]
async fn subscribing_twice_is_reported_as_already_subscribed() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    app.post_subscriptions(&email).await.error_for_status().unwrap();

    // WHEN
    let response = app.post_subscriptions(&email).await;

    // THEN
    assert_eq!(response.status().as_u16(), 409);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "already_subscribed");
}

#[tokio::test]
async fn subscribe_fails_if_the_confirmation_email_cannot_be_sent() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // WHEN
    let response = app.post_subscriptions(&email).await;

    // THEN
    assert_eq!(response.status().as_u16(), 500);
    // The pending row is left behind.
    let pending: i64 = sqlx::query_scalar("SELECT count(*) FROM subscribers WHERE email = $1")
        .bind(&email)
        .fetch_one(&app.database)
        .await
        .unwrap();
    assert_eq!(pending, 1);
}

#[tokio::test]
async fn confirmation_email_can_be_resent_for_pending_subscribers() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    app.post_subscriptions(&email).await.error_for_status().unwrap();

    // WHEN
    let response = app
        .post_json(
            "/send-newsletter-confirmation",
            &serde_json::json!({ "email": email }),
            None,
        )
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    let requests = app.email_server.received_requests().await.unwrap();
    let first = app.get_email_links(&requests[0]);
    let second = app.get_email_links(&requests[1]);
    assert_eq!(first.html, second.html);
}

#[tokio::test]
async fn resending_for_unknown_email_returns_404() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app
        .post_json(
            "/send-newsletter-confirmation",
            &serde_json::json!({ "email": email() }),
            None,
        )
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 404);
}
