use serde::Serialize;
use uuid::Uuid;

use crate::language::Language;

/// Outcome of a single successful translation.
///
/// Values are immutable once built: fields are only reachable through
/// accessors, and every call to [`TranslationResult::new`] mints a fresh id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    id: Uuid,
    translated_text: String,
    source_language: Option<Language>,
    target_language: Language,
}

impl TranslationResult {
    pub fn new(
        translated_text: impl Into<String>,
        source_language: impl Into<Option<Language>>,
        target_language: Language,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            translated_text: translated_text.into(),
            source_language: source_language.into(),
            target_language,
        }
    }

    /// Opaque identifier, unique per result
    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    /// Language of the input, as requested or as detected by the backend.
    /// `None` when the backend detected a language outside the catalogue.
    pub const fn source_language(&self) -> Option<Language> {
        self.source_language
    }

    pub const fn target_language(&self) -> Language {
        self.target_language
    }

    /// Compare every field except the id
    pub fn same_translation(&self, other: &Self) -> bool {
        self.translated_text == other.translated_text
            && self.source_language == other.source_language
            && self.target_language == other.target_language
    }

    /// Consume the result, keeping only the translated text
    pub fn into_text(self) -> String {
        self.translated_text
    }
}
