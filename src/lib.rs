pub mod analyzer;
pub mod cluster;
pub mod config;
pub mod error;
pub mod language;
pub mod llm;
pub mod metrics;
pub mod optimizer;
pub mod readability;
pub mod rewrite;
pub mod scorer;
pub mod segmenter;
pub mod selector;
pub mod signature;
pub mod synthesis;
pub mod text;

pub use analyzer::{Analysis, Analyzer, DEFAULT_BRAND};
pub use error::{AnalyzeError, SynthesisError};
pub use metrics::{Corpus, Metrics, MetricsEngine};
pub use optimizer::{optimize, OptimizationResult, OptimizeRequest, HEURISTIC_FALLBACK};
pub use rewrite::apply_fallback;
pub use scorer::{score, Feedback, ScoreResult};
pub use signature::{
    signature_schema, AddressPolicy, EmotionalAppeal, FormalityLevel, SignatureError, StylePolicy,
    ToneOfVoiceSignature,
};
