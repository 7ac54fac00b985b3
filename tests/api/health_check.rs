use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let result = app.healthcheck().await;

    // THEN
    assert!(result.status().is_success());
    assert_eq!(result.content_length(), Some(0));
    assert_eq!(
        result.headers().get("Access-Control-Allow-Origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn preflight_is_answered_for_every_endpoint() {
    // GIVEN
    let app = spawn_app().await;

    for endpoint in ["/subscribe", "/create-payment", "/submit-to-notion", "/en/about"] {
        // WHEN
        let response = app
            .http_client
            .request(reqwest::Method::OPTIONS, format!("{}{}", app.address, endpoint))
            .send()
            .await
            .unwrap();

        // THEN
        assert_eq!(response.status().as_u16(), 200, "preflight failed for {endpoint}");
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}
