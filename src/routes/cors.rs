use actix_web::middleware::DefaultHeaders;
use actix_web::HttpResponse;

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Open CORS headers attached to every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Headers", ALLOWED_HEADERS))
}

/// Uniform answer to any `OPTIONS` preflight.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Methods", ALLOWED_METHODS))
        .finish()
}
