//! Corpus metrics that steer signature synthesis.
//!
//! The signals are intentionally shallow. Every optional strategy
//! (segmentation model, language detector, embedder, readability formula) is
//! chosen once in [`MetricsEngine::new`] and degrades to a deterministic
//! fallback; only an empty corpus is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::cluster::{HashingEmbedder, SnippetClusterer, SnippetEmbedder};
use crate::config::AnalysisConfig;
use crate::error::AnalyzeError;
use crate::language::{self, FixedLanguage, LanguageDetector, StopwordDetector};
use crate::readability::{FleschReadingEase, HeuristicReadability, ReadabilityScorer};
use crate::segmenter::{select_segmenter, SentenceSegmenter};
use crate::signature::signature_schema;
use crate::text;

pub const DEFAULT_SENTENCE_LENGTH: f64 = 12.0;

/// Input text: one document to segment, or a list of snippets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Corpus {
    Text(String),
    Snippets(Vec<String>),
}

impl Corpus {
    /// Lenient conversion from arbitrary JSON: non-string list elements are
    /// dropped and any other shape becomes an empty corpus.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Corpus::Text(text.clone()),
            Value::Array(items) => Corpus::Snippets(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            _ => Corpus::Snippets(Vec::new()),
        }
    }
}

impl From<&str> for Corpus {
    fn from(text: &str) -> Self {
        Corpus::Text(text.to_string())
    }
}

impl From<Vec<String>> for Corpus {
    fn from(snippets: Vec<String>) -> Self {
        Corpus::Snippets(snippets)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PunctuationCounts {
    pub exclamations: usize,
    pub emojis: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub names: Vec<String>,
    pub sample_size: usize,
    #[serde(skip)]
    pub labels: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    pub detected_languages: BTreeMap<String, usize>,
    pub primary_language: String,
    pub avg_sentence_length: f64,
    pub readability: f64,
    pub punctuation: PunctuationCounts,
    pub address_counts: BTreeMap<String, usize>,
    pub clusters: ClusterSummary,
    pub json_schema: Value,
    /// Normalized corpus items.
    #[serde(skip)]
    pub corpus: Vec<String>,
    /// Every sentence of the corpus, re-segmented, in order.
    #[serde(skip)]
    pub sentences: Vec<String>,
}

impl Metrics {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub struct MetricsEngine {
    segmenter: &'static dyn SentenceSegmenter,
    detector: Box<dyn LanguageDetector>,
    readability: Option<Box<dyn ReadabilityScorer>>,
    heuristic: HeuristicReadability,
    clusterer: SnippetClusterer,
    cluster_k: usize,
    cluster_sample_cap: usize,
}

impl MetricsEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        let segmenter = select_segmenter(config.use_segmenter);
        let detector: Box<dyn LanguageDetector> = if config.use_language_detector {
            Box::new(StopwordDetector)
        } else {
            Box::new(FixedLanguage::default())
        };
        let readability: Option<Box<dyn ReadabilityScorer>> = if config.use_readability {
            Some(Box::new(FleschReadingEase::new(segmenter)))
        } else {
            None
        };
        let embedder: Option<Box<dyn SnippetEmbedder>> = if config.use_embeddings {
            Some(Box::new(HashingEmbedder))
        } else {
            None
        };

        let engine = Self {
            segmenter,
            detector,
            readability,
            heuristic: HeuristicReadability::new(segmenter),
            clusterer: SnippetClusterer::new(embedder),
            cluster_k: config.cluster_k,
            cluster_sample_cap: config.cluster_sample_cap,
        };
        debug!(
            segmenter = engine.segmenter.name(),
            detector = engine.detector.name(),
            readability = engine.readability.as_ref().map_or("heuristic", |r| r.name()),
            clusterer = engine.clusterer.backend(),
            "metrics strategies selected"
        );
        engine
    }

    /// Blank items are dropped; a corpus with nothing left is an error.
    pub fn normalize(&self, corpus: &Corpus) -> Result<Vec<String>, AnalyzeError> {
        let items: Vec<String> = match corpus {
            Corpus::Text(text) => self.segmenter.segment(text),
            Corpus::Snippets(snippets) => snippets
                .iter()
                .filter(|s| !s.trim().is_empty())
                .cloned()
                .collect(),
        };
        if items.is_empty() {
            return Err(AnalyzeError::EmptyCorpus);
        }
        Ok(items)
    }

    pub fn compute(&self, corpus: &Corpus, lang_hint: Option<&str>) -> Result<Metrics, AnalyzeError> {
        let corpus = self.normalize(corpus)?;

        let detections: Vec<String> = corpus
            .iter()
            .map(|item| language::detect_or_default(self.detector.as_ref(), item, lang_hint))
            .collect();
        let primary_language = language::primary_language(&detections)
            .unwrap_or_else(|| language::DEFAULT_LANGUAGE.to_string());

        let sentences: Vec<String> = corpus
            .iter()
            .flat_map(|item| self.segmenter.segment(item))
            .collect();
        let avg_sentence_length = if sentences.is_empty() {
            DEFAULT_SENTENCE_LENGTH
        } else {
            let words: usize = sentences.iter().map(|s| text::count_words(s)).sum();
            words as f64 / sentences.len() as f64
        };

        let punctuation = PunctuationCounts {
            exclamations: corpus.iter().map(|t| text::count_exclamations(t)).sum(),
            emojis: corpus.iter().map(|t| text::count_emoji(t)).sum(),
        };

        let readability = self.readability(&corpus.join(" "));
        let address_counts = language::address_counts(&corpus, &primary_language);

        let sample = &sentences[..sentences.len().min(self.cluster_sample_cap)];
        let clustering = self.clusterer.cluster(sample, self.cluster_k);

        Ok(Metrics {
            detected_languages: language::histogram(&detections),
            primary_language,
            avg_sentence_length,
            readability,
            punctuation,
            address_counts,
            clusters: ClusterSummary {
                names: clustering.names,
                sample_size: sentences.len(),
                labels: clustering.labels,
            },
            json_schema: signature_schema().clone(),
            corpus,
            sentences,
        })
    }

    fn readability(&self, text: &str) -> f64 {
        if let Some(scorer) = self.readability.as_ref() {
            if let Some(score) = scorer.score(text) {
                return score;
            }
            debug!(scorer = scorer.name(), "readability formula unavailable for text");
        }
        self.heuristic.compute(text)
    }
}
