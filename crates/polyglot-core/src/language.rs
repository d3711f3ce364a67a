//! Static catalogue of supported languages.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A language code not present in the catalogue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown language code: {0}")]
pub struct UnknownLanguage(pub String);

/// Supported languages, identified by ISO 639-1 codes with regional variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Dutch,
    Russian,
    Japanese,
    Korean,
    SimplifiedChinese,
    TraditionalChinese,
    Arabic,
    Hindi,
    Turkish,
    Polish,
    Swedish,
    Ukrainian,
    Vietnamese,
    Thai,
}

impl Language {
    pub const ALL: [Self; 20] = [
        Self::English,
        Self::Spanish,
        Self::French,
        Self::German,
        Self::Italian,
        Self::Portuguese,
        Self::Dutch,
        Self::Russian,
        Self::Japanese,
        Self::Korean,
        Self::SimplifiedChinese,
        Self::TraditionalChinese,
        Self::Arabic,
        Self::Hindi,
        Self::Turkish,
        Self::Polish,
        Self::Swedish,
        Self::Ukrainian,
        Self::Vietnamese,
        Self::Thai,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Italian => "it",
            Self::Portuguese => "pt",
            Self::Dutch => "nl",
            Self::Russian => "ru",
            Self::Japanese => "ja",
            Self::Korean => "ko",
            Self::SimplifiedChinese => "zh-CN",
            Self::TraditionalChinese => "zh-TW",
            Self::Arabic => "ar",
            Self::Hindi => "hi",
            Self::Turkish => "tr",
            Self::Polish => "pl",
            Self::Swedish => "sv",
            Self::Ukrainian => "uk",
            Self::Vietnamese => "vi",
            Self::Thai => "th",
        }
    }

    /// Human-readable name, as used in prompts
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Italian => "Italian",
            Self::Portuguese => "Portuguese",
            Self::Dutch => "Dutch",
            Self::Russian => "Russian",
            Self::Japanese => "Japanese",
            Self::Korean => "Korean",
            Self::SimplifiedChinese => "Simplified Chinese",
            Self::TraditionalChinese => "Traditional Chinese",
            Self::Arabic => "Arabic",
            Self::Hindi => "Hindi",
            Self::Turkish => "Turkish",
            Self::Polish => "Polish",
            Self::Swedish => "Swedish",
            Self::Ukrainian => "Ukrainian",
            Self::Vietnamese => "Vietnamese",
            Self::Thai => "Thai",
        }
    }

    /// Look up a language by code. Matching ignores ASCII case, so `zh-cn`
    /// resolves like `zh-CN`.
    pub fn from_code(code: &str) -> Result<Self, UnknownLanguage> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownLanguage(code.to_string()))
    }

    /// Resolve a code the way backends tend to emit it: exact match first,
    /// then the code without its region (`en-US`). Bare `zh` reads as
    /// Simplified Chinese; `zh-Hant`, `zh-HK` and `zh-MO` as Traditional.
    pub fn resolve(code: &str) -> Option<Self> {
        let code = code.trim();
        if let Ok(lang) = Self::from_code(code) {
            return Some(lang);
        }

        let (base, region) = code.split_once(['-', '_']).unwrap_or((code, ""));
        if base.eq_ignore_ascii_case("zh") {
            let traditional = region.split(['-', '_']).any(|part| {
                ["hant", "tw", "hk", "mo"]
                    .iter()
                    .any(|t| part.eq_ignore_ascii_case(t))
            });
            return Some(if traditional {
                Self::TraditionalChinese
            } else {
                Self::SimplifiedChinese
            });
        }

        Self::from_code(base).ok()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

// Serialized as the bare code so config files and backend answers stay readable
impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::from_code(&code).map_err(serde::de::Error::custom)
    }
}
