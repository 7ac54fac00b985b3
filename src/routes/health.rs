use actix_web::HttpResponse;

/// Liveness probe: an empty 200.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
