//! Language domain module.
//!
//! - `code`: the translation allow-list (`SupportedLanguage`)
//! - `naming`: display names for language tags (`LanguageNameResolver`)
//! - `detection`: detector output and its filtering policy

mod code;
mod detection;
mod naming;

pub use code::{SUPPORTED_LANGUAGES, SupportedLanguage};
pub use detection::{DetectedLanguage, Detection, DetectionPolicy, HIGH_CONFIDENCE, MIN_CONFIDENCE};
pub use naming::{DEFAULT_DISPLAY_LOCALE, LanguageNameResolver, UNKNOWN_LANGUAGE, language_name};
