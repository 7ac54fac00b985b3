use crate::helpers::{email, spawn_app, EmailLinks, TestApp};
use cogworks::domain::{generate_token, SubscriberStatus};
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

pub async fn subscribe_and_get_links(app: &TestApp, email: &str) -> EmailLinks {
    let _mock_guard = Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount_as_scoped(&app.email_server)
        .await;

    app.post_subscriptions(email)
        .await
        .error_for_status()
        .unwrap();

    let request = app
        .email_server
        .received_requests()
        .await
        .unwrap()
        .pop()
        .unwrap();
    app.get_email_links(&request)
}

async fn subscriber_status(app: &TestApp, email: &str) -> SubscriberStatus {
    let (is_confirmed, is_active): (bool, bool) =
        sqlx::query_as("SELECT is_confirmed, is_active FROM subscribers WHERE email = $1")
            .bind(email)
            .fetch_one(&app.database)
            .await
            .expect("Failed to get subscriber");

    SubscriberStatus::from_flags(is_confirmed, is_active)
}

#[tokio::test]
async fn confirmations_without_token_are_rejected_with_400() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app.get("/confirm-newsletter").await;

    // THEN
    assert_eq!(response.status().as_u16(), 400);
    assert!(response.text().await.unwrap().contains("Missing token"));
}

#[tokio::test]
async fn confirmations_with_unknown_token_render_the_invalid_page() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app
        .get(&format!("/confirm-newsletter?token={}", generate_token()))
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    let page = response.text().await.unwrap();
    assert!(page.contains("Already confirmed or invalid link"));
}

#[tokio::test]
async fn link_returns_200_and_confirms_the_subscriber() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();
    let links = subscribe_and_get_links(&app, &email).await;
    assert_eq!(
        subscriber_status(&app, &email).await,
        SubscriberStatus::PendingConfirmation
    );

    // WHEN
    let response = app.http_client.get(links.html).send().await.unwrap();

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Subscription confirmed"));
    assert_eq!(
        subscriber_status(&app, &email).await,
        SubscriberStatus::Confirmed
    );

    let confirmed_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT confirmed_at FROM subscribers WHERE email = $1")
            .bind(&email)
            .fetch_one(&app.database)
            .await
            .unwrap();
    assert!(confirmed_at.is_some());
}

#[tokio::test]
async fn reusing_a_confirmation_link_renders_the_invalid_page() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();
    let links = subscribe_and_get_links(&app, &email).await;

    app.http_client
        .get(links.html.clone())
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    // WHEN
    let response = app.http_client.get(links.plain_text).send().await.unwrap();

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Already confirmed or invalid link"));
    assert_eq!(
        subscriber_status(&app, &email).await,
        SubscriberStatus::Confirmed
    );
}

#[tokio::test]
async fn pages_are_rendered_in_the_subscriber_locale() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    app.post_json(
        "/subscribe",
        &serde_json::json!({ "email": email, "locale": "ru" }),
        None,
    )
    .await
    .error_for_status()
    .unwrap();

    let token: String =
        sqlx::query_scalar("SELECT confirmation_token FROM subscribers WHERE email = $1")
            .bind(&email)
            .fetch_one(&app.database)
            .await
            .unwrap();

    // WHEN
    let response = app
        .get(&format!("/confirm-newsletter?token={token}"))
        .await;

    // THEN
    let page = response.text().await.unwrap();
    assert!(page.contains("lang=\"ru\""));
    assert!(page.contains("Подписка подтверждена"));
}
