//! The tone-of-voice signature and the style policy derived from it.
//!
//! [`ToneOfVoiceSignature`] is strict: it only comes into existence through
//! [`ToneOfVoiceSignature::from_value`] or [`ToneOfVoiceSignature::validate`],
//! so a value in hand always satisfies the schema. [`StylePolicy`] is the
//! lenient read used by the optimizer and the scorer, which accept any JSON
//! object and fill missing fields with defaults.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_EXCLAMATION_CAP: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormalityLevel {
    Informal,
    Neutral,
    Formal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressPolicy {
    pub allowed: Vec<String>,
    pub banned: Vec<String>,
}

impl AddressPolicy {
    /// Term substituted for banned forms.
    pub fn replacement(&self) -> &str {
        self.allowed.first().map(String::as_str).unwrap_or("you")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmotionalAppeal {
    pub reassurance: f64,
    pub confidence: f64,
    pub excitement: f64,
    pub empathy: f64,
    pub restraint: f64,
}

impl EmotionalAppeal {
    pub fn dimensions(&self) -> [(&'static str, f64); 5] {
        [
            ("reassurance", self.reassurance),
            ("confidence", self.confidence),
            ("excitement", self.excitement),
            ("empathy", self.empathy),
            ("restraint", self.restraint),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneOfVoiceSignature {
    pub brand: String,
    pub languages: Vec<String>,
    pub tone: Vec<String>,
    pub language_style: Vec<String>,
    pub formality_level: FormalityLevel,
    pub address_forms: BTreeMap<String, AddressPolicy>,
    pub emotional_appeal: EmotionalAppeal,
}

#[derive(Debug, Error, PartialEq)]
pub enum SignatureError {
    #[error("signature does not match schema: {0}")]
    Malformed(String),

    #[error("signature field `{0}` must be a non-empty list")]
    EmptyList(&'static str),

    #[error("emotional_appeal.{dimension} must be within [0, 1], got {value}")]
    OutOfRange { dimension: &'static str, value: f64 },

    #[error("address_forms has no policy for primary language `{0}`")]
    MissingAddressPolicy(String),
}

impl ToneOfVoiceSignature {
    /// Parse and validate. Unknown top-level keys are dropped.
    pub fn from_value(value: Value) -> Result<Self, SignatureError> {
        let signature: Self =
            serde_json::from_value(value).map_err(|err| SignatureError::Malformed(err.to_string()))?;
        signature.validate()?;
        Ok(signature)
    }

    pub fn validate(&self) -> Result<(), SignatureError> {
        if self.tone.iter().all(|t| t.trim().is_empty()) {
            return Err(SignatureError::EmptyList("tone"));
        }
        if self.language_style.iter().all(|t| t.trim().is_empty()) {
            return Err(SignatureError::EmptyList("language_style"));
        }
        for (dimension, value) in self.emotional_appeal.dimensions() {
            if !(0.0..=1.0).contains(&value) {
                return Err(SignatureError::OutOfRange { dimension, value });
            }
        }
        Ok(())
    }

    /// The address policy must cover `language`.
    pub fn require_address_policy(&self, language: &str) -> Result<(), SignatureError> {
        if self.address_forms.contains_key(language) {
            Ok(())
        } else {
            Err(SignatureError::MissingAddressPolicy(language.to_string()))
        }
    }
}

static SIGNATURE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let string_list = json!({ "type": "array", "items": { "type": "string" } });
    let unit = json!({ "type": "number", "minimum": 0, "maximum": 1 });
    json!({
        "title": "ToneOfVoiceSignature",
        "type": "object",
        "required": [
            "brand",
            "languages",
            "tone",
            "language_style",
            "formality_level",
            "address_forms",
            "emotional_appeal"
        ],
        "properties": {
            "brand": { "type": "string" },
            "languages": string_list,
            "tone": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
            "language_style": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
            "formality_level": {
                "type": "string",
                "enum": ["informal", "neutral", "formal"]
            },
            "address_forms": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "required": ["allowed", "banned"],
                    "properties": {
                        "allowed": string_list,
                        "banned": string_list
                    }
                }
            },
            "emotional_appeal": {
                "type": "object",
                "required": ["reassurance", "confidence", "excitement", "empathy", "restraint"],
                "additionalProperties": false,
                "properties": {
                    "reassurance": unit,
                    "confidence": unit,
                    "excitement": unit,
                    "empathy": unit,
                    "restraint": unit
                }
            }
        }
    })
});

/// JSON schema of the signature, exposed to clients and echoed into prompts.
pub fn signature_schema() -> &'static Value {
    &SIGNATURE_SCHEMA
}

/// Style constraints read leniently from a signature-shaped JSON object.
///
/// Besides the schema fields this picks up the optional `emoji_policy`,
/// `punctuation_cadence.exclamation_max_per_1000w` and
/// `sentence_length_range` keys clients may add. The exclamation cap is
/// applied as an absolute count for the whole text.
#[derive(Debug, Clone, PartialEq)]
pub struct StylePolicy {
    pub formality_level: Option<String>,
    pub emoji_policy: Option<String>,
    pub exclamation_cap: f64,
    pub address_forms: BTreeMap<String, AddressPolicy>,
    pub sentence_length_range: Option<(f64, f64)>,
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self {
            formality_level: None,
            emoji_policy: None,
            exclamation_cap: DEFAULT_EXCLAMATION_CAP,
            address_forms: BTreeMap::new(),
            sentence_length_range: None,
        }
    }
}

impl StylePolicy {
    /// Never fails; fields with the wrong shape are treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let exclamation_cap = value
            .get("punctuation_cadence")
            .and_then(|cadence| cadence.get("exclamation_max_per_1000w"))
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_EXCLAMATION_CAP);

        let address_forms = value
            .get("address_forms")
            .and_then(Value::as_object)
            .map(|forms| {
                forms
                    .iter()
                    .map(|(language, policy)| {
                        let policy = AddressPolicy {
                            allowed: string_list(policy.get("allowed")),
                            banned: string_list(policy.get("banned")),
                        };
                        (language.clone(), policy)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let sentence_length_range = value
            .get("sentence_length_range")
            .and_then(Value::as_array)
            .and_then(|range| match range.as_slice() {
                [min, max, ..] => Some((min.as_f64()?, max.as_f64()?)),
                _ => None,
            });

        Self {
            formality_level: string_field(value, "formality_level"),
            emoji_policy: string_field(value, "emoji_policy"),
            exclamation_cap,
            address_forms,
            sentence_length_range,
        }
    }

    pub fn is_formal(&self) -> bool {
        self.formality_level.as_deref() == Some("formal")
    }

    pub fn is_informal(&self) -> bool {
        self.formality_level.as_deref() == Some("informal")
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
