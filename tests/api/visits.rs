use crate::helpers::spawn_app;

async fn increment(app: &crate::helpers::TestApp) -> i64 {
    let response = app
        .http_client
        .post(format!("{}/increment-visits", app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    body["total_visits"].as_i64().unwrap()
}

#[tokio::test]
async fn first_visit_creates_the_global_counter() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let total = increment(&app).await;

    // THEN
    assert_eq!(total, 1);
    let stored: i64 = sqlx::query_scalar("SELECT total_visits FROM site_metrics WHERE id = 'global'")
        .fetch_one(&app.database)
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn sequential_visits_increase_the_counter() {
    // GIVEN
    let app = spawn_app().await;

    // WHEN
    let mut totals = Vec::new();
    for _ in 0..3 {
        totals.push(increment(&app).await);
    }

    // THEN
    assert_eq!(totals, vec![1, 2, 3]);
}
