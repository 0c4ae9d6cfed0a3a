#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub code: &'static str,
}

pub const DEFAULT_LANGUAGE: Language = Language {
    name: "Finnish",
    code: "fi",
};

pub const LANGUAGES: &[Language] = &[
    Language { name: "English", code: "en" },
    Language { name: "Spanish", code: "es" },
    Language { name: "French", code: "fr" },
    Language { name: "German", code: "de" },
    Language { name: "Chinese", code: "zh" },
    Language { name: "Japanese", code: "ja" },
    Language { name: "Korean", code: "ko" },
    Language { name: "Russian", code: "ru" },
    Language { name: "Portuguese", code: "pt" },
    Language { name: "Italian", code: "it" },
    Language { name: "Dutch", code: "nl" },
    Language { name: "Arabic", code: "ar" },
    Language { name: "Hindi", code: "hi" },
    Language { name: "Bengali", code: "bn" },
    Language { name: "Turkish", code: "tr" },
    Language { name: "Vietnamese", code: "vi" },
    Language { name: "Polish", code: "pl" },
    Language { name: "Swedish", code: "sv" },
    Language { name: "Norwegian", code: "no" },
    Language { name: "Danish", code: "da" },
    DEFAULT_LANGUAGE,
    Language { name: "Greek", code: "el" },
    Language { name: "Hebrew", code: "he" },
    Language { name: "Thai", code: "th" },
    Language { name: "Indonesian", code: "id" },
];

/// Look up a language by code, falling back to Finnish.
pub fn resolve_language(code: Option<&str>) -> Language {
    code.map(str::trim)
        .and_then(|code| {
            LANGUAGES
                .iter()
                .find(|language| language.code.eq_ignore_ascii_case(code))
        })
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LANGUAGE, LANGUAGES, resolve_language};

    #[test]
    fn known_codes_resolve_case_insensitively() {
        assert_eq!(resolve_language(Some("EN")).name, "English");
        assert_eq!(resolve_language(Some(" ja ")).code, "ja");
    }

    #[test]
    fn unknown_or_missing_codes_fall_back() {
        assert_eq!(resolve_language(Some("xx")), DEFAULT_LANGUAGE);
        assert_eq!(resolve_language(None), DEFAULT_LANGUAGE);
        assert_eq!(LANGUAGES.len(), 25);
    }
}
