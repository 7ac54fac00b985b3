use crate::helpers::{email, spawn_app, TestApp};
use crate::subscriptions_confirm::subscribe_and_get_links;
use cogworks::domain::generate_token;

async fn unsubscribe_token(app: &TestApp, email: &str) -> String {
    sqlx::query_scalar("SELECT unsubscribe_token FROM subscribers WHERE email = $1")
        .bind(email)
        .fetch_one(&app.database)
        .await
        .expect("Failed to get the unsubscribe token")
}

async fn is_active(app: &TestApp, email: &str) -> bool {
    sqlx::query_scalar("SELECT is_active FROM subscribers WHERE email = $1")
        .bind(email)
        .fetch_one(&app.database)
        .await
        .expect("Failed to get subscriber")
}

#[tokio::test]
async fn unsubscribe_without_token_is_rejected_with_400() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app.get("/unsubscribe?token=").await;

    // THEN
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn unsubscribe_deactivates_a_confirmed_subscriber() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();
    let links = subscribe_and_get_links(&app, &email).await;
    app.http_client
        .get(links.html)
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();
    let token = unsubscribe_token(&app, &email).await;

    // WHEN
    let response = app.get(&format!("/unsubscribe?token={token}")).await;

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("You have been unsubscribed"));
    assert!(!is_active(&app, &email).await);
}

#[tokio::test]
async fn unsubscribing_twice_renders_the_invalid_page() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();
    subscribe_and_get_links(&app, &email).await;
    let token = unsubscribe_token(&app, &email).await;
    app.get(&format!("/unsubscribe?token={token}"))
        .await
        .error_for_status()
        .unwrap();

    // WHEN
    let response = app.get(&format!("/unsubscribe?token={token}")).await;

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Already unsubscribed or invalid link"));
}

#[tokio::test]
async fn unknown_unsubscribe_token_renders_the_invalid_page() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app
        .get(&format!("/unsubscribe?token={}", generate_token()))
        .await;

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Already unsubscribed or invalid link"));
}

#[tokio::test]
async fn unsubscribed_email_cannot_subscribe_again() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();
    subscribe_and_get_links(&app, &email).await;
    let token = unsubscribe_token(&app, &email).await;
    app.get(&format!("/unsubscribe?token={token}"))
        .await
        .error_for_status()
        .unwrap();

    // WHEN
    let response = app.post_subscriptions(&email).await;

    // THEN
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn a_pending_confirmation_link_is_void_after_unsubscribing() {
    // GIVEN
    let app = spawn_app().await;
    let email = email();
    let links = subscribe_and_get_links(&app, &email).await;
    let token = unsubscribe_token(&app, &email).await;
    app.get(&format!("/unsubscribe?token={token}"))
        .await
        .error_for_status()
        .unwrap();

    // WHEN
    let response = app.http_client.get(links.html).send().await.unwrap();

    // THEN
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Already confirmed or invalid link"));
}
