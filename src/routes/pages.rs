use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header::{ACCEPT_LANGUAGE, LOCATION, VARY};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use tera::Tera;

use crate::domain::{resolve_locale, CurrentLocale, LocaleResolution};
use crate::i18n;
use crate::utils::{localized_context, render_html};

/// Cookie remembering the last locale the visitor browsed in.
pub const PREFERENCE_COOKIE: &str = "preferred_locale";

/// Page slugs under `/<locale>/`, in navigation order. The empty slug is home.
const PAGES: &[(&str, &str)] = &[
    ("", "home"),
    ("services", "services"),
    ("about", "about"),
    ("pricing", "pricing"),
    ("contact", "contact"),
    ("newsletter", "newsletter"),
];

#[derive(serde::Serialize)]
struct NavLink<'a> {
    slug: &'a str,
    label: &'a str,
}

/// Serve `/<locale>/<page>`, or redirect paths without a locale prefix.
#[tracing::instrument(name = "Resolving page locale", skip(request, tera), fields(path = %request.path()))]
pub async fn localized_page(request: HttpRequest, tera: web::Data<Tera>) -> HttpResponse {
    let stored_preference = request
        .cookie(PREFERENCE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let resolution = resolve_locale(
        request.path(),
        Some(request.query_string()),
        stored_preference.as_deref(),
        accept_language,
    );

    match resolution {
        LocaleResolution::Adopt { locale, page } => {
            let mut response = render_page(&tera, locale, &page);
            let preference = Cookie::build(PREFERENCE_COOKIE, locale.locale().to_string())
                .path("/")
                .max_age(Duration::days(365))
                .same_site(SameSite::Lax)
                .finish();
            if let Err(e) = response.add_cookie(&preference) {
                tracing::warn!(error.cause_chain = ?e, "Failed to persist the locale preference");
            }
            response
        }
        LocaleResolution::Redirect { location, .. } => HttpResponse::Found()
            .insert_header((LOCATION, location))
            .insert_header((VARY, "Cookie, Accept-Language"))
            .finish(),
    }
}

fn render_page(tera: &Tera, locale: CurrentLocale, page: &str) -> HttpResponse {
    let locale = locale.locale();
    let mut context = localized_context(locale);

    let navigation: Vec<NavLink> = PAGES
        .iter()
        .map(|&(slug, key)| NavLink {
            slug,
            label: i18n::translate(locale, nav_key(key)),
        })
        .collect();
    context.insert("navigation", &navigation);
    context.insert("page", page);

    let (key, status) = match PAGES.iter().find(|(slug, _)| *slug == page) {
        Some((_, key)) => (*key, StatusCode::OK),
        None => ("not_found", StatusCode::NOT_FOUND),
    };
    context.insert("title", i18n::translate(locale, &format!("page_{key}_title")));
    context.insert("body", i18n::translate(locale, &format!("page_{key}_body")));

    render_html(tera, "pages/page.html", &context, status)
}

fn nav_key(page_key: &str) -> &'static str {
    match page_key {
        "services" => "nav_services",
        "about" => "nav_about",
        "pricing" => "nav_pricing",
        "contact" => "nav_contact",
        "newsletter" => "nav_newsletter",
        _ => "nav_home",
    }
}
