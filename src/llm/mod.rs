pub mod openai;
pub mod provider;

pub use openai::OpenAiCompatibleBackend;
pub use provider::{ChatMessage, CompletionOptions, GenerationBackend, LlmError, Role};

use serde_json::Value;
use std::time::Instant;
use tracing::debug;

/// Run one backend call under the options' timeout and cancellation token.
///
/// A cancelled or timed-out call is reported like any other backend failure.
pub async fn request_json(
    backend: &dyn GenerationBackend,
    messages: &[ChatMessage],
    options: &CompletionOptions,
) -> Result<Value, LlmError> {
    let started = Instant::now();
    let call = tokio::time::timeout(options.timeout, backend.complete_json(messages, options));

    let outcome = match options.cancel.as_ref() {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(LlmError::Cancelled),
                result = call => result,
            }
        }
        None => call.await,
    };

    let result = outcome.map_err(|_| LlmError::Timeout)?;
    debug!(
        backend = backend.name(),
        model = backend.model(),
        latency_ms = started.elapsed().as_millis() as u64,
        ok = result.is_ok(),
        "generation call finished"
    );
    result
}
