mod traits;
mod unavailable;
#[cfg(feature = "openai")]
mod openai;

pub use traits::TranslationCapability;
pub use unavailable::{UnavailableCapability, UNAVAILABLE_MESSAGE};
#[cfg(feature = "openai")]
pub use openai::OpenAiCapability;

use crate::config::{BackendConfig, BackendKind};
use std::sync::Arc;

/// Create a capability from configuration.
///
/// The choice is made once; a façade keeps the returned capability for its
/// whole lifetime. Backends that are not compiled in fall back to
/// [`UnavailableCapability`].
pub fn create_capability(
    config: &BackendConfig,
    instructions: &str,
) -> Arc<dyn TranslationCapability> {
    match config.kind {
        #[cfg(feature = "openai")]
        BackendKind::OpenAi => Arc::new(OpenAiCapability::new(config, instructions)),
        #[cfg(not(feature = "openai"))]
        BackendKind::OpenAi => {
            let _ = instructions;
            tracing::warn!("OpenAI backend requested but not compiled in, translations will fail");
            Arc::new(UnavailableCapability)
        }
        BackendKind::None => {
            tracing::warn!("No translation backend configured, translations will fail");
            Arc::new(UnavailableCapability)
        }
    }
}
