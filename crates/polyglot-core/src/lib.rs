//! Polyglot Core Library
//!
//! A translation façade over pluggable backends:
//! - Input validation and prompt assembly
//! - Delegation to a [`TranslationCapability`] (OpenAI-compatible APIs, or none)
//! - Normalization of backend failures into [`TranslationError`]

pub mod capability;
pub mod config;
pub mod error;
pub mod language;
pub mod model;
pub mod util;

pub use capability::{
    TranslationCapability, UnavailableCapability, UNAVAILABLE_MESSAGE, create_capability,
};
#[cfg(feature = "openai")]
pub use capability::OpenAiCapability;
pub use config::{AppConfig, BackendConfig, BackendKind, DEFAULT_INSTRUCTIONS};
pub use error::{CapabilityError, ConfigError, Result, TranslationError};
pub use language::{Language, UnknownLanguage};
pub use model::TranslationResult;

use std::sync::Arc;
use tracing::{debug, warn};

/// High-level translator that validates input, builds prompts and delegates
/// to a capability.
///
/// Holds no mutable state, so a single instance can serve any number of
/// concurrent calls. Cloning shares the underlying capability.
#[derive(Clone)]
pub struct Translator {
    capability: Arc<dyn TranslationCapability>,
    instructions: String,
}

impl Translator {
    /// Create a translator from configuration, selecting the backend once
    pub fn new(config: &AppConfig) -> Self {
        let instructions = config.instructions().to_string();
        let capability = create_capability(&config.backend, &instructions);

        Self {
            capability,
            instructions,
        }
    }

    /// Create with a custom capability and the default instructions
    pub fn with_capability(capability: Arc<dyn TranslationCapability>) -> Self {
        Self::with_instructions(DEFAULT_INSTRUCTIONS, capability)
    }

    /// Create with custom instructions and a custom capability.
    ///
    /// The instructions are recorded only. An injected capability was built
    /// with its own instructions and never sees these; only capabilities
    /// built by [`Translator::new`] receive the configured text.
    pub fn with_instructions(
        instructions: impl Into<String>,
        capability: Arc<dyn TranslationCapability>,
    ) -> Self {
        Self {
            capability,
            instructions: instructions.into(),
        }
    }

    /// Translator without a backend; every translation fails with
    /// [`UNAVAILABLE_MESSAGE`]
    pub fn fallback() -> Self {
        Self::with_capability(Arc::new(UnavailableCapability))
    }

    /// Instructions this translator was built with
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn capability_name(&self) -> &'static str {
        self.capability.name()
    }

    /// Whether the capability can translate right now. Not cached.
    pub async fn is_translation_available(&self) -> bool {
        self.capability.is_available().await
    }

    /// Translate a single text.
    ///
    /// With `source` set the backend is told the input language; without it
    /// the backend is asked to detect it.
    pub async fn translate(
        &self,
        text: &str,
        source: Option<Language>,
        target: Language,
    ) -> Result<TranslationResult> {
        if text.is_empty() {
            return Err(TranslationError::EmptyInput);
        }

        self.translate_unchecked(text, source, target).await
    }

    /// Translate several texts, in order.
    ///
    /// Every text is validated before the first backend call. Items are then
    /// translated one at a time; the first failure aborts the batch and no
    /// partial results are returned.
    pub async fn translate_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        source: Option<Language>,
        target: Language,
    ) -> Result<Vec<TranslationResult>> {
        if texts.is_empty() {
            return Err(TranslationError::EmptyBatch);
        }
        if texts.iter().any(|text| text.as_ref().is_empty()) {
            return Err(TranslationError::EmptyInput);
        }

        let mut results = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            debug!("Batch item {}/{}", index + 1, texts.len());

            let result = self
                .translate_unchecked(text.as_ref(), source, target)
                .await
                .inspect_err(|e| debug!("Batch aborted at item {}: {}", index, e))?;
            results.push(result);
        }

        Ok(results)
    }

    async fn translate_unchecked(
        &self,
        text: &str,
        source: Option<Language>,
        target: Language,
    ) -> Result<TranslationResult> {
        let prompt = build_prompt(text, source, target);

        debug!(
            "Translating {} chars to {} with {}",
            text.len(),
            target.code(),
            self.capability.name()
        );

        self.capability.translate(&prompt).await.map_err(|e| {
            if let CapabilityError::AssetsUnavailable(ref reason) = e {
                warn!("{} could not load its model: {}", self.capability.name(), reason);
            }
            TranslationError::from(e)
        })
    }
}

/// Assemble the instruction handed to the capability
pub fn build_prompt(text: &str, source: Option<Language>, target: Language) -> String {
    match source {
        Some(source) => format!(
            "Translate the following text from {} to {}: {}",
            source.display_name(),
            target.display_name(),
            text
        ),
        None => format!(
            "Detect the source language and translate the following text to {}: {}",
            target.display_name(),
            text
        ),
    }
}
