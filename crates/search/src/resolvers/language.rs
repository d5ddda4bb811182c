use super::LanguageResolver;
use regex_lite::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// A parsed language, e.g. `en` or `da-DK`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a request's language comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSource {
    /// The `language` argument
    Argument,
    /// The current language of the request context
    Context,
    /// The system default language
    Default,
}

/// Sources consulted in order; the first one that supplies a tag is parsed
pub const LANGUAGE_FALLBACK: [LanguageSource; 3] = [
    LanguageSource::Argument,
    LanguageSource::Context,
    LanguageSource::Default,
];

/// Pick the tag per [`LANGUAGE_FALLBACK`] and parse it
///
/// A tag that fails to parse does not fall through to later sources: it
/// yields `None`, meaning the search spans all languages.
pub fn resolve_language(
    resolver: &dyn LanguageResolver,
    argument: Option<&str>,
    context: Option<&str>,
) -> Option<Language> {
    let (source, tag) = LANGUAGE_FALLBACK.iter().find_map(|source| {
        let tag = match source {
            LanguageSource::Argument => argument.map(str::to_string),
            LanguageSource::Context => context.map(str::to_string),
            LanguageSource::Default => Some(resolver.default_language()),
        };
        tag.map(|tag| (*source, tag))
    })?;

    match resolver.try_parse(&tag) {
        Some(language) => {
            debug!(source = ?source, language = %language, "Resolved search language");
            Some(language)
        }
        None => {
            debug!(source = ?source, tag = %tag, "Unparseable language, searching all languages");
            None
        }
    }
}

/// Accepts well-formed language tags (`en`, `en-US`, `zh-Hant-TW`)
#[derive(Debug, Clone)]
pub struct TagLanguages {
    default: String,
}

impl TagLanguages {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
        }
    }
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("language tag pattern is valid")
    })
}

impl LanguageResolver for TagLanguages {
    fn try_parse(&self, tag: &str) -> Option<Language> {
        let tag = tag.trim();
        tag_pattern()
            .is_match(tag)
            .then(|| Language(tag.to_string()))
    }

    fn default_language(&self) -> String {
        self.default.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages() -> TagLanguages {
        TagLanguages::new("en")
    }

    #[test]
    fn test_fallback_order() {
        assert_eq!(
            LANGUAGE_FALLBACK,
            [LanguageSource::Argument, LanguageSource::Context, LanguageSource::Default]
        );
    }

    #[test]
    fn test_argument_wins() {
        let lang = resolve_language(&languages(), Some("da-DK"), Some("de"));
        assert_eq!(lang.unwrap().name(), "da-DK");
    }

    #[test]
    fn test_context_then_default() {
        let lang = resolve_language(&languages(), None, Some("de"));
        assert_eq!(lang.unwrap().name(), "de");

        let lang = resolve_language(&languages(), None, None);
        assert_eq!(lang.unwrap().name(), "en");
    }

    #[test]
    fn test_unparseable_argument_disables_language_filter() {
        assert_eq!(resolve_language(&languages(), Some("not a language"), Some("de")), None);
    }

    #[test]
    fn test_tag_shapes() {
        let l = languages();
        assert!(l.try_parse("en").is_some());
        assert!(l.try_parse("zh-Hant-TW").is_some());
        assert!(l.try_parse("e").is_none());
        assert!(l.try_parse("en_US").is_none());
        assert!(l.try_parse("").is_none());
    }
}
