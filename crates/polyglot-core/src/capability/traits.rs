use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::model::TranslationResult;

/// Trait for translation backends.
///
/// A capability receives a fully assembled prompt and performs the actual
/// translation. Implementations must check their own readiness inside
/// [`translate`](Self::translate) and fail with
/// [`TranslationError::ModelUnavailable`](crate::TranslationError::ModelUnavailable)
/// when not ready, whether or not the caller asked
/// [`is_available`](Self::is_available) first.
#[async_trait]
pub trait TranslationCapability: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Translate the instruction in `prompt`
    async fn translate(&self, prompt: &str) -> Result<TranslationResult, CapabilityError>;

    /// Whether the backend can translate right now. Must not have side effects.
    async fn is_available(&self) -> bool;
}
