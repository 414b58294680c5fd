//! Signature synthesis: metrics and examples in, validated signature out.

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::SynthesisError;
use crate::llm::{request_json, ChatMessage, CompletionOptions, GenerationBackend};
use crate::metrics::Metrics;
use crate::signature::{signature_schema, ToneOfVoiceSignature};

fn system_prompt() -> String {
    let prompt = r#"You are a careful editorial scientist deriving a brand's tone of voice.
Return a single JSON object that conforms to the provided ToneOfVoiceSignature schema.
Rules:
- Populate every required field; add no other keys.
- tone and language_style must be non-empty arrays of short descriptors.
- formality_level is one of informal, neutral, formal.
- emotional_appeal has exactly reassurance, confidence, excitement, empathy, restraint, each a number in [0,1].
- address_forms must include the primary language with allowed and banned lists.
- Prefer concise, enforceable values grounded in the metrics and examples.
- Output JSON only, no markdown or commentary.
"#;
    prompt.to_string()
}

/// System instruction followed by one user message carrying the schema,
/// metrics, examples, brand and languages as JSON.
pub fn build_synthesis_messages(
    metrics: &Metrics,
    examples: &[String],
    brand: &str,
    languages: &[String],
) -> Vec<ChatMessage> {
    let payload = json!({
        "schema": signature_schema(),
        "metrics": metrics.to_value(),
        "examples": examples,
        "brand": brand,
        "languages": languages,
    });
    vec![
        ChatMessage::system(system_prompt()),
        ChatMessage::user(payload.to_string()),
    ]
}

/// Turn a backend reply into a signature, requiring a policy for the first
/// language in `languages`.
pub fn parse_signature(value: Value, languages: &[String]) -> Result<ToneOfVoiceSignature, SynthesisError> {
    if !value.is_object() {
        return Err(SynthesisError::Malformed("expected a JSON object".to_string()));
    }
    let signature = ToneOfVoiceSignature::from_value(value)?;
    if let Some(primary) = languages.first() {
        signature.require_address_policy(primary)?;
    }
    Ok(signature)
}

/// One backend call; every failure is surfaced, no default is substituted.
pub async fn synthesize(
    backend: &dyn GenerationBackend,
    metrics: &Metrics,
    examples: &[String],
    brand: &str,
    languages: &[String],
    options: &CompletionOptions,
) -> Result<ToneOfVoiceSignature, SynthesisError> {
    let messages = build_synthesis_messages(metrics, examples, brand, languages);
    debug!(brand, example_count = examples.len(), "synthesizing signature");

    let reply = request_json(backend, &messages, options).await.map_err(|err| {
        warn!(error = %err, "signature synthesis call failed");
        SynthesisError::from(err)
    })?;

    parse_signature(reply, languages).map_err(|err| {
        warn!(error = %err, "signature synthesis returned an invalid signature");
        err
    })
}
