use thiserror::Error;

use crate::llm::LlmError;
use crate::signature::SignatureError;

/// Why a signature could not be synthesized. There is no fallback
/// signature; callers decide whether to retry.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("generation backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("generation output is not a signature object: {0}")]
    Malformed(String),

    #[error(transparent)]
    Schema(#[from] SignatureError),
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Corpus is empty.")]
    EmptyCorpus,

    #[error("signature synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}
