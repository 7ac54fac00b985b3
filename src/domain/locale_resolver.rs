use crate::domain::{CurrentLocale, Locale};

/// Outcome of resolving the locale for a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleResolution {
    /// The path already carries a locale; `page` is the remainder after it.
    Adopt { locale: CurrentLocale, page: String },
    /// The path has no locale prefix; navigate to `location` instead.
    Redirect { locale: Locale, location: String },
}

/// Decide which locale a navigation to `path` should use.
///
/// A valid locale in the first path segment always wins. Otherwise the stored
/// preference is used when it names a supported locale, then the browser's
/// `Accept-Language`, then English.
pub fn resolve_locale(
    path: &str,
    query: Option<&str>,
    stored_preference: Option<&str>,
    accept_language: Option<&str>,
) -> LocaleResolution {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let (first_segment, rest) = path[1..].split_once('/').unwrap_or((&path[1..], ""));
    if let Some(locale) = Locale::from_code(first_segment) {
        return LocaleResolution::Adopt {
            locale: CurrentLocale(locale),
            page: rest.trim_end_matches('/').to_string(),
        };
    }

    let locale = stored_preference
        .and_then(Locale::from_code)
        .or_else(|| accept_language.and_then(Locale::from_accept_language))
        .unwrap_or_default();

    let location = match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("/{locale}{path}?{query}"),
        None => format!("/{locale}{path}"),
    };

    LocaleResolution::Redirect { locale, location }
}
