use async_trait::async_trait;

use crate::error::{CapabilityError, TranslationError};
use crate::model::TranslationResult;
use super::traits::TranslationCapability;

/// Message returned by [`UnavailableCapability::translate`]
pub const UNAVAILABLE_MESSAGE: &str = "No language model backend is available on this device. \
Please provide a custom TranslationCapability implementation.";

/// Capability used when no real backend is wired in.
///
/// Always reports unavailable, and fails every translation with
/// [`UNAVAILABLE_MESSAGE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCapability;

#[async_trait]
impl TranslationCapability for UnavailableCapability {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn translate(&self, _prompt: &str) -> Result<TranslationResult, CapabilityError> {
        Err(TranslationError::Custom(UNAVAILABLE_MESSAGE.to_string()).into())
    }

    async fn is_available(&self) -> bool {
        false
    }
}
