//! Draft optimization: a signature-conditioned rewrite with a rule-based
//! fallback. Always produces text.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::llm::{request_json, ChatMessage, CompletionOptions, GenerationBackend, LlmError};
use crate::rewrite::apply_fallback;
use crate::signature::StylePolicy;

pub const HEURISTIC_FALLBACK: &str = "heuristic_fallback";
pub const DEFAULT_WORD_COUNT_RANGE: &str = "60-120";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub draft: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default = "default_word_count_range")]
    pub word_count_range: String,
}

fn default_word_count_range() -> String {
    DEFAULT_WORD_COUNT_RANGE.to_string()
}

impl OptimizeRequest {
    pub fn new(draft: impl Into<String>) -> Self {
        Self {
            draft: draft.into(),
            task: String::new(),
            audience: String::new(),
            channel: String::new(),
            word_count_range: default_word_count_range(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub improved_text: String,
    /// Backend diagnostics, or `"heuristic_fallback"`.
    pub self_check: Value,
}

impl OptimizationResult {
    pub fn is_fallback(&self) -> bool {
        self.self_check.as_str() == Some(HEURISTIC_FALLBACK)
    }
}

fn system_prompt() -> String {
    let prompt = r#"You rewrite text to match a ToneOfVoiceSignature.
Return a single JSON object with these fields:
- improved_text (string): the rewritten draft
- self_check (object): how the rewrite meets the signature
Rules:
- Never invent facts that are not in the draft.
- Keep the result within word_count_range.
- Respect formality_level, address_forms and any punctuation or emoji policy.
- Output JSON only, no markdown or commentary.
"#;
    prompt.to_string()
}

pub fn build_optimize_messages(signature: &Value, request: &OptimizeRequest) -> Vec<ChatMessage> {
    let payload = json!({
        "signature": signature,
        "task_description": request.task,
        "draft_text": request.draft,
        "audience": request.audience,
        "channel": request.channel,
        "word_count_range": request.word_count_range,
    });
    vec![
        ChatMessage::system(system_prompt()),
        ChatMessage::user(payload.to_string()),
    ]
}

/// Accept a reply only when it carries a non-blank `improved_text`.
fn accept_reply(reply: Value) -> Result<OptimizationResult, LlmError> {
    let improved_text = reply
        .get("improved_text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| LlmError::InvalidResponse("improved_text missing or empty".to_string()))?
        .to_string();
    let self_check = reply.get("self_check").cloned().unwrap_or(Value::Null);
    Ok(OptimizationResult {
        improved_text,
        self_check,
    })
}

/// Rule-based rewrite tagged as a fallback.
pub fn fallback(signature: &Value, draft: &str) -> OptimizationResult {
    let policy = StylePolicy::from_value(signature);
    OptimizationResult {
        improved_text: apply_fallback(&policy, draft),
        self_check: Value::String(HEURISTIC_FALLBACK.to_string()),
    }
}

/// Rewrite `request.draft` toward `signature`.
///
/// With no backend, or when the call fails, is cancelled, times out, or
/// yields no usable `improved_text`, the deterministic fallback is returned.
pub async fn optimize(
    backend: Option<&dyn GenerationBackend>,
    signature: &Value,
    request: &OptimizeRequest,
    options: &CompletionOptions,
) -> OptimizationResult {
    let Some(backend) = backend else {
        debug!("no generation backend, using heuristic rewrite");
        return fallback(signature, &request.draft);
    };

    let messages = build_optimize_messages(signature, request);
    let outcome = request_json(backend, &messages, options)
        .await
        .and_then(accept_reply);

    match outcome {
        Ok(result) => result,
        Err(err) => {
            warn!(backend = backend.name(), error = %err, "optimization call unusable, using heuristic rewrite");
            fallback(signature, &request.draft)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_improved_text_is_rejected() {
        assert!(accept_reply(json!({ "improved_text": "  " })).is_err());
        assert!(accept_reply(json!({ "self_check": {} })).is_err());
        let result = accept_reply(json!({ "improved_text": "Hello." })).unwrap();
        assert_eq!(result.self_check, Value::Null);
        assert!(!result.is_fallback());
    }

    #[test]
    fn request_defaults() {
        let request: OptimizeRequest = serde_json::from_value(json!({ "draft": "hi" })).unwrap();
        assert_eq!(request, OptimizeRequest::new("hi"));
        assert_eq!(request.word_count_range, "60-120");
    }

    #[test]
    fn prompt_carries_draft_and_constraints() {
        let mut request = OptimizeRequest::new("Hey guys");
        request.channel = "email".to_string();
        let messages = build_optimize_messages(&json!({ "brand": "Acme" }), &request);
        assert_eq!(messages.len(), 2);
        let payload: Value = serde_json::from_str(&messages[1].content).unwrap();
        assert_eq!(payload["draft_text"], "Hey guys");
        assert_eq!(payload["channel"], "email");
        assert_eq!(payload["signature"]["brand"], "Acme");
        assert_eq!(payload["word_count_range"], "60-120");
    }
}
