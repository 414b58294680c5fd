use serde::{Deserialize, Serialize};
use serde_json::Value;
use tone_of_voice::optimizer::DEFAULT_WORD_COUNT_RANGE;
use tone_of_voice::{
    Analysis, Corpus, Feedback, OptimizationResult, OptimizeRequest, ScoreResult, StylePolicy,
    ToneOfVoiceSignature,
};

#[derive(Debug, Deserialize)]
pub struct ApiAnalyzeRequest {
    /// A string with several sentences or a list of snippets.
    pub corpus: Value,
    pub lang: Option<String>,
    pub brand: Option<String>,
}

impl ApiAnalyzeRequest {
    pub fn corpus(&self) -> Corpus {
        Corpus::from_value(&self.corpus)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAnalyzeResponse {
    pub metrics: Value,
    pub examples: Vec<String>,
    pub signature: ToneOfVoiceSignature,
}

impl ApiAnalyzeResponse {
    pub fn from_analysis(analysis: Analysis) -> Self {
        Self {
            metrics: analysis.metrics.to_value(),
            examples: analysis.examples,
            signature: analysis.signature,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiOptimizeRequest {
    pub draft: String,
    pub signature: Value,
    pub task: Option<String>,
    pub audience: Option<String>,
    pub channel: Option<String>,
    pub word_count_range: Option<String>,
}

impl ApiOptimizeRequest {
    pub fn into_parts(self) -> Result<(Value, OptimizeRequest), String> {
        if !self.signature.is_object() {
            return Err("signature must be a JSON object".to_string());
        }
        let request = OptimizeRequest {
            draft: self.draft,
            task: self.task.unwrap_or_default(),
            audience: self.audience.unwrap_or_default(),
            channel: self.channel.unwrap_or_default(),
            word_count_range: self
                .word_count_range
                .filter(|range| !range.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_WORD_COUNT_RANGE.to_string()),
        };
        Ok((self.signature, request))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiOptimizeResponse {
    pub improved_text: String,
    pub self_check: Value,
}

impl From<OptimizationResult> for ApiOptimizeResponse {
    fn from(result: OptimizationResult) -> Self {
        Self {
            improved_text: result.improved_text,
            self_check: result.self_check,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiScoreRequest {
    pub text: String,
    pub signature: Value,
}

impl ApiScoreRequest {
    pub fn policy(&self) -> Result<StylePolicy, String> {
        if !self.signature.is_object() {
            return Err("signature must be a JSON object".to_string());
        }
        Ok(StylePolicy::from_value(&self.signature))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiScoreResponse {
    pub score: u8,
    pub feedback: Feedback,
}

impl From<ScoreResult> for ApiScoreResponse {
    fn from(result: ScoreResult) -> Self {
        Self {
            score: result.score,
            feedback: result.feedback,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiHealthResponse {
    pub ok: bool,
    pub schema: Value,
}
