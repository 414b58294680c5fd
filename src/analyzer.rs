//! corpus → metrics → examples → signature.

use serde::Serialize;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AnalyzeError;
use crate::llm::{CompletionOptions, GenerationBackend};
use crate::metrics::{Corpus, Metrics, MetricsEngine};
use crate::selector::{select_examples, SelectionLimits};
use crate::signature::ToneOfVoiceSignature;
use crate::synthesis::synthesize;

pub const DEFAULT_BRAND: &str = "UnknownBrand";

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub metrics: Metrics,
    pub examples: Vec<String>,
    pub signature: ToneOfVoiceSignature,
}

/// Holds the strategies chosen at construction; build it once per process
/// and share it.
pub struct Analyzer {
    engine: MetricsEngine,
    limits: SelectionLimits,
}

impl Analyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            engine: MetricsEngine::new(config),
            limits: SelectionLimits {
                pool_cap: config.example_pool_cap,
                max_examples: config.max_examples,
                fallback_examples: config.fallback_examples,
            },
        }
    }

    pub fn metrics_engine(&self) -> &MetricsEngine {
        &self.engine
    }

    pub fn compute(&self, corpus: &Corpus, lang_hint: Option<&str>) -> Result<Metrics, AnalyzeError> {
        self.engine.compute(corpus, lang_hint)
    }

    pub fn examples(&self, metrics: &Metrics) -> Vec<String> {
        select_examples(
            &metrics.sentences,
            &metrics.clusters.labels,
            &metrics.corpus,
            self.limits,
        )
    }

    /// Full pipeline. An empty corpus fails before the backend is called.
    pub async fn analyze(
        &self,
        backend: &dyn GenerationBackend,
        corpus: &Corpus,
        lang_hint: Option<&str>,
        brand: Option<&str>,
        options: &CompletionOptions,
    ) -> Result<Analysis, AnalyzeError> {
        let metrics = self.compute(corpus, lang_hint)?;
        let examples = self.examples(&metrics);
        let brand = brand
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BRAND);
        let languages = vec![metrics.primary_language.clone()];

        info!(
            brand,
            primary_language = %metrics.primary_language,
            sentences = metrics.clusters.sample_size,
            examples = examples.len(),
            "corpus analyzed"
        );

        let signature = synthesize(backend, &metrics, &examples, brand, &languages, options).await?;
        Ok(Analysis {
            metrics,
            examples,
            signature,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}
