use crate::helpers::spawn_app;

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("Location")
        .expect("No Location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn locale_prefixed_pages_are_rendered_in_that_locale() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app.get("/sv/services").await;

    // THEN
    assert_eq!(response.status().as_u16(), 200);
    let cookie = response
        .headers()
        .get("Set-Cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(cookie.starts_with("preferred_locale=sv"));

    let page = response.text().await.unwrap();
    assert!(page.contains("lang=\"sv\""));
    assert!(page.contains("data-speech-lang=\"sv-SE\""));
    assert!(page.contains("Våra tjänster"));
}

#[tokio::test]
async fn paths_without_a_locale_redirect_using_accept_language() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app
        .http_client
        .get(format!("{}/about?ref=gazette", app.address))
        .header("Accept-Language", "de-DE,ru;q=0.8,en;q=0.5")
        .send()
        .await
        .unwrap();

    // THEN
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/ru/about?ref=gazette");
}

#[tokio::test]
async fn stored_preference_wins_over_accept_language() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app
        .http_client
        .get(format!("{}/", app.address))
        .header("Accept-Language", "ru")
        .header("Cookie", "preferred_locale=sv")
        .send()
        .await
        .unwrap();

    // THEN
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/sv/");
}

#[tokio::test]
async fn unsupported_locale_codes_redirect_to_a_supported_one() {
    // GIVEN
    let app = spawn_app().await;

    for path in ["/de/about", "/fr", "/xx/pricing"] {
        // WHEN
        let response = app.get(path).await;

        // THEN
        assert_eq!(response.status().as_u16(), 302);
        assert_eq!(location(&response), format!("/en{path}"));
    }
}

#[tokio::test]
async fn unknown_pages_render_a_localized_404() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let response = app.get("/ru/no-such-page").await;

    // THEN
    assert_eq!(response.status().as_u16(), 404);
    assert!(response.text().await.unwrap().contains("Страница не найдена"));
}
