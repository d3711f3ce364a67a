use thiserror::Error;

/// Errors surfaced to callers of the [`Translator`](crate::Translator) façade.
///
/// This is a closed set:
/// - input validation (empty text, empty batch)
/// - backend readiness (no working model)
/// - backend-specific failures with a free-form message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// A single text argument was empty
    #[error("input text is empty")]
    EmptyInput,

    /// A batch request contained no texts
    #[error("batch contains no texts")]
    EmptyBatch,

    /// The capability is not ready to translate at call time
    #[error("translation model is unavailable")]
    ModelUnavailable,

    /// Capability-specific failure
    #[error("{0}")]
    Custom(String),
}

/// Errors a [`TranslationCapability`](crate::capability::TranslationCapability)
/// may return.
///
/// Backends either fail with one of the caller-facing [`TranslationError`]
/// kinds, or report that their model assets / framework could not be loaded.
/// The façade collapses the latter into [`TranslationError::ModelUnavailable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// Model weights, runtime or endpoint could not be loaded
    #[error("backend assets unavailable: {0}")]
    AssetsUnavailable(String),
}

impl CapabilityError {
    /// Shorthand for a [`TranslationError::Custom`] failure
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Translation(TranslationError::Custom(message.into()))
    }
}

impl From<CapabilityError> for TranslationError {
    fn from(err: CapabilityError) -> Self {
        match err {
            CapabilityError::Translation(inner) => inner,
            CapabilityError::AssetsUnavailable(_) => Self::ModelUnavailable,
        }
    }
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`AppConfig`](crate::AppConfig)
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_unavailable_maps_to_model_unavailable() {
        let err = CapabilityError::AssetsUnavailable("weights missing".to_string());
        assert_eq!(TranslationError::from(err), TranslationError::ModelUnavailable);
    }

    #[test]
    fn test_translation_errors_pass_through() {
        for inner in [
            TranslationError::EmptyInput,
            TranslationError::EmptyBatch,
            TranslationError::ModelUnavailable,
            TranslationError::Custom("boom".to_string()),
        ] {
            let err = CapabilityError::from(inner.clone());
            assert_eq!(TranslationError::from(err), inner);
        }
    }

    #[test]
    fn test_custom_displays_message_verbatim() {
        let err = TranslationError::Custom("backend exploded".to_string());
        assert_eq!(err.to_string(), "backend exploded");
    }
}
