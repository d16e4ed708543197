use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

use crate::error::CoreError;

/// Language codes accepted by the provider, with their display names.
const LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("al", "Albanian"),
    ("ar", "Arabic"),
    ("az", "Azerbaijani"),
    ("bg", "Bulgarian"),
    ("ca", "Catalan"),
    ("cz", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("eu", "Basque"),
    ("fa", "Persian (Farsi)"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("gl", "Galician"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("kr", "Korean"),
    ("la", "Latvian"),
    ("lt", "Lithuanian"),
    ("mk", "Macedonian"),
    ("no", "Norwegian"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("pt_br", "Português Brasil"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("es", "Spanish"),
    ("sr", "Serbian"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("ua", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh_cn", "Chinese Simplified"),
    ("zh_tw", "Chinese Traditional"),
    ("zu", "Zulu"),
];

/// A language code from the supported table. Passed through to the provider
/// untouched; only descriptions come back localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language {
    code: &'static str,
    name: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en", name: "English" };

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All supported languages in table order.
    pub fn all() -> impl Iterator<Item = Language> {
        LANGUAGES.iter().map(|&(code, name)| Language { code, name })
    }

    pub fn is_supported(code: &str) -> bool {
        LANGUAGES.iter().any(|(c, _)| *c == code)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl TryFrom<&str> for Language {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Language::all()
            .find(|lang| lang.code == value)
            .ok_or_else(|| CoreError::unsupported(format!("The language '{value}' is not supported")))
    }
}

impl TryFrom<String> for Language {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Language::try_from(value.as_str())
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_forty_six_entries() {
        assert_eq!(Language::all().count(), 46);
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = Language::all().map(|l| l.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 46);
    }

    #[test]
    fn lookup_returns_display_name() {
        let lang = Language::try_from("pt_br").expect("pt_br is supported");
        assert_eq!(lang.name(), "Português Brasil");
        assert_eq!(Language::try_from("ua").unwrap().name(), "Ukrainian");
    }

    #[test]
    fn unknown_code_is_unsupported() {
        let err = Language::try_from("xx").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedValue(_)));
        assert!(!Language::is_supported("EN"));
    }

    #[test]
    fn serde_uses_the_code() {
        let json = serde_json::to_string(&Language::ENGLISH).unwrap();
        assert_eq!(json, "\"en\"");
        let back: Language = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(back.name(), "German");
        assert!(serde_json::from_str::<Language>("\"klingon\"").is_err());
    }
}
