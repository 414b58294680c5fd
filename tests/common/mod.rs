#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tone_of_voice::llm::{ChatMessage, CompletionOptions, GenerationBackend, LlmError};

pub enum Reply {
    Json(Value),
    Fail,
}

/// Backend double that answers every call with the same scripted reply.
pub struct ScriptedBackend {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl ScriptedBackend {
    pub fn replying(value: Value) -> Self {
        Self::new(Reply::Json(value))
    }

    pub fn failing() -> Self {
        Self::new(Reply::Fail)
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }

    async fn complete_json(
        &self,
        messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Reply::Json(value) => Ok(value.clone()),
            Reply::Fail => Err(LlmError::Connection("connection refused".to_string())),
        }
    }
}

pub fn signature_json(language: &str) -> Value {
    let mut signature = json!({
        "brand": "Acme",
        "languages": [language],
        "tone": ["warm", "confident"],
        "language_style": ["short sentences", "plain words"],
        "formality_level": "neutral",
        "address_forms": {},
        "emotional_appeal": {
            "reassurance": 0.7,
            "confidence": 0.8,
            "excitement": 0.4,
            "empathy": 0.6,
            "restraint": 0.5
        }
    });
    signature["address_forms"][language] = json!({ "allowed": ["you"], "banned": ["sir", "madam"] });
    signature
}
