//! Language display names.
//!
//! Resolves a BCP 47 language tag to a human-readable name in a display
//! locale. Any tag or locale the catalog cannot handle resolves to the raw
//! tag, so callers never have to deal with a failure.

/// Name returned for an absent language tag.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Display locale used when none is configured.
pub const DEFAULT_DISPLAY_LOCALE: &str = "en";

const EN_NAMES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bangla"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("eo", "Esperanto"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fil", "Filipino"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("ha", "Hausa"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("ig", "Igbo"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("jv", "Javanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("la", "Latin"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("my", "Burmese"),
    ("nb", "Norwegian Bokmål"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("so", "Somali"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("xh", "Xhosa"),
    ("yo", "Yoruba"),
    ("zh", "Chinese"),
    ("zu", "Zulu"),
];

const FR_NAMES: &[(&str, &str)] = &[
    ("de", "allemand"),
    ("en", "anglais"),
    ("es", "espagnol"),
    ("fr", "français"),
    ("it", "italien"),
    ("ja", "japonais"),
    ("pt", "portugais"),
    ("ru", "russe"),
    ("tr", "turc"),
    ("zh", "chinois"),
];

const PT_NAMES: &[(&str, &str)] = &[
    ("de", "alemão"),
    ("en", "inglês"),
    ("es", "espanhol"),
    ("fr", "francês"),
    ("it", "italiano"),
    ("ja", "japonês"),
    ("pt", "português"),
    ("ru", "russo"),
    ("tr", "turco"),
    ("zh", "chinês"),
];

const ES_NAMES: &[(&str, &str)] = &[
    ("de", "alemán"),
    ("en", "inglés"),
    ("es", "español"),
    ("fr", "francés"),
    ("it", "italiano"),
    ("ja", "japonés"),
    ("pt", "portugués"),
    ("ru", "ruso"),
    ("tr", "turco"),
    ("zh", "chino"),
];

const RU_NAMES: &[(&str, &str)] = &[
    ("de", "немецкий"),
    ("en", "английский"),
    ("es", "испанский"),
    ("fr", "французский"),
    ("it", "итальянский"),
    ("ja", "японский"),
    ("pt", "португальский"),
    ("ru", "русский"),
    ("tr", "турецкий"),
    ("zh", "китайский"),
];

const TR_NAMES: &[(&str, &str)] = &[
    ("de", "Almanca"),
    ("en", "İngilizce"),
    ("es", "İspanyolca"),
    ("fr", "Fransızca"),
    ("it", "İtalyanca"),
    ("ja", "Japonca"),
    ("pt", "Portekizce"),
    ("ru", "Rusça"),
    ("tr", "Türkçe"),
    ("zh", "Çince"),
];

/// Resolves language tags to display names for a fixed display locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageNameResolver {
    display_locale: String,
}

impl LanguageNameResolver {
    /// Creates a resolver that renders names in `display_locale`.
    pub fn new(display_locale: impl Into<String>) -> Self {
        Self {
            display_locale: display_locale.into(),
        }
    }

    /// The display locale names are rendered in.
    pub fn display_locale(&self) -> &str {
        &self.display_locale
    }

    /// Resolves `code` in this resolver's display locale.
    pub fn resolve(&self, code: Option<&str>) -> String {
        language_name(code, &self.display_locale)
    }

    /// Resolves a tag that is known to be present.
    pub fn name_of(&self, code: &str) -> String {
        language_name(Some(code), &self.display_locale)
    }
}

impl Default for LanguageNameResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_LOCALE)
    }
}

/// Returns the display name of `code` in `display_locale`.
///
/// `None` yields [`UNKNOWN_LANGUAGE`]. A malformed tag, a tag missing from the
/// catalog or an unsupported display locale yields `code` unchanged.
pub fn language_name(code: Option<&str>, display_locale: &str) -> String {
    let Some(code) = code else {
        return UNKNOWN_LANGUAGE.to_string();
    };

    let Some(primary) = primary_subtag(code) else {
        return code.to_string();
    };
    let Some(catalog) = primary_subtag(display_locale).and_then(|l| catalog_for(&l)) else {
        return code.to_string();
    };

    catalog
        .iter()
        .find(|(tag, _)| *tag == primary)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| code.to_string())
}

fn catalog_for(locale: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match locale {
        "en" => Some(EN_NAMES),
        "fr" => Some(FR_NAMES),
        "pt" => Some(PT_NAMES),
        "es" => Some(ES_NAMES),
        "ru" => Some(RU_NAMES),
        "tr" => Some(TR_NAMES),
        _ => None,
    }
}

/// Extracts the lowercase primary subtag of a well-formed tag.
///
/// The primary subtag must be 2-3 ASCII letters and every further subtag
/// 1-8 ASCII alphanumerics.
fn primary_subtag(tag: &str) -> Option<String> {
    let mut parts = tag.trim().split(['-', '_']);
    let primary = parts.next()?;
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    for part in parts {
        if part.is_empty() || part.len() > 8 || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
    }
    Some(primary.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_english_names() {
        assert_eq!(language_name(Some("fr"), "en"), "French");
        assert_eq!(language_name(Some("en"), "en"), "English");
        assert_eq!(language_name(Some("ja"), "en"), "Japanese");
    }

    #[test]
    fn test_none_is_unknown() {
        assert_eq!(language_name(None, "en"), "Unknown");
        assert_eq!(LanguageNameResolver::default().resolve(None), "Unknown");
    }

    #[test]
    fn test_region_subtag_uses_primary() {
        assert_eq!(language_name(Some("pt-BR"), "en"), "Portuguese");
        assert_eq!(language_name(Some("zh-Hant"), "en"), "Chinese");
    }

    #[test]
    fn test_unknown_code_falls_back_to_raw() {
        assert_eq!(language_name(Some("qq"), "en"), "qq");
        assert_eq!(language_name(Some("not a tag"), "en"), "not a tag");
        assert_eq!(language_name(Some(""), "en"), "");
    }

    #[test]
    fn test_other_display_locales() {
        assert_eq!(language_name(Some("en"), "fr"), "anglais");
        assert_eq!(language_name(Some("ru"), "es-ES"), "ruso");
        assert_eq!(language_name(Some("tr"), "tr"), "Türkçe");
    }

    #[test]
    fn test_unsupported_display_locale_falls_back_to_raw() {
        assert_eq!(language_name(Some("fr"), "de"), "fr");
        assert_eq!(language_name(Some("fr"), "!!"), "fr");
    }
}
