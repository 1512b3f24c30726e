//! The translation allow-list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A language the translation capability is guaranteed to support.
///
/// Variants are ordered the way the language picker presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    En,
    Pt,
    Es,
    Ru,
    Tr,
    Fr,
}

/// Ordered allow-list used by the language picker and error messages.
pub const SUPPORTED_LANGUAGES: [SupportedLanguage; 6] = [
    SupportedLanguage::En,
    SupportedLanguage::Pt,
    SupportedLanguage::Es,
    SupportedLanguage::Ru,
    SupportedLanguage::Tr,
    SupportedLanguage::Fr,
];

impl SupportedLanguage {
    /// Returns the BCP 47 primary language code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Pt => "pt",
            Self::Es => "es",
            Self::Ru => "ru",
            Self::Tr => "tr",
            Self::Fr => "fr",
        }
    }

    /// Parses a language tag, tolerating case and region subtags (`pt-BR`).
    ///
    /// Returns `None` for anything outside the allow-list.
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        SUPPORTED_LANGUAGES
            .into_iter()
            .find(|lang| lang.code() == primary)
    }

    /// Returns true when `tag` names a language on the allow-list.
    pub fn is_supported(tag: &str) -> bool {
        Self::parse(tag).is_some()
    }
}

impl Default for SupportedLanguage {
    fn default() -> Self {
        Self::En
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
