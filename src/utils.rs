use actix_web::http::{header::ContentType, StatusCode};
use actix_web::HttpResponse;
use tera::{Context, Tera};

use crate::domain::Locale;
use crate::i18n;

/// Debug-format an error together with every error in its `source()` chain.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// JSON body shared by every API error: `{ "error": code }`.
pub fn json_error(status: StatusCode, code: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "error": code }))
}

/// Template context with the locale, its speech tag and the full message catalog.
pub fn localized_context(locale: Locale) -> Context {
    let mut context = Context::new();
    context.insert("locale", locale.as_ref());
    context.insert("speech_lang", locale.speech_lang());
    context.insert("t", &i18n::catalog(locale));
    context
}

/// Render `template` to an HTML response, or a bare 500 if rendering fails.
pub fn render_html(tera: &Tera, template: &str, context: &Context, status: StatusCode) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to render {template}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Render the one-message page used by the confirmation and unsubscribe links.
pub fn render_message_page(
    tera: &Tera,
    locale: Locale,
    title_key: &str,
    body_key: &str,
    status: StatusCode,
) -> HttpResponse {
    let mut context = localized_context(locale);
    context.insert("title", i18n::translate(locale, title_key));
    context.insert("message", i18n::translate(locale, body_key));
    render_html(tera, "pages/message.html", &context, status)
}
