use strum::IntoEnumIterator;

/// Languages the site is translated into.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Deserialize,
    serde::Serialize,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Sv,
    Ru,
}

impl Locale {
    /// Exact match against a locale code as it appears in a path segment.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::iter().find(|locale| locale.as_ref() == code)
    }

    /// Lenient parse of a language tag: case-insensitive, region suffix ignored.
    pub fn from_language_tag(tag: &str) -> Option<Self> {
        let language = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        Self::from_code(&language)
    }

    /// Pick the best supported language from an `Accept-Language` header value.
    ///
    /// Entries are ranked by their `q` weight; ties keep header order.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, Self)> = header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let locale = Self::from_language_tag(parts.next()?)?;
                let weight = parts
                    .find_map(|param| {
                        let (name, value) = param.split_once('=')?;
                        name.trim().eq_ignore_ascii_case("q").then_some(value)
                    })
                    .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok())?;

                (weight > 0.0).then_some((weight, locale))
            })
            .collect();

        // Stable sort keeps header order for equal weights.
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        candidates.first().map(|(_, locale)| *locale)
    }

    /// BCP 47 tag for the browser speech synthesis API.
    pub fn speech_lang(&self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Sv => "sv-SE",
            Locale::Ru => "ru-RU",
        }
    }
}

/// The locale adopted for the request being served.
///
/// Resolved once per navigation and handed explicitly to whatever renders
/// the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentLocale(pub Locale);

impl CurrentLocale {
    pub fn locale(&self) -> Locale {
        self.0
    }
}
