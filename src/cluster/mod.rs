//! Groups sentence snippets into buckets used to diversify examples.

pub mod embedding;
pub mod kmeans;

pub use embedding::{HashingEmbedder, SnippetEmbedder};
pub use kmeans::kmeans;

use std::collections::{BTreeSet, HashSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub names: Vec<String>,
}

pub struct SnippetClusterer {
    embedder: Option<Box<dyn SnippetEmbedder>>,
}

impl SnippetClusterer {
    pub fn new(embedder: Option<Box<dyn SnippetEmbedder>>) -> Self {
        Self { embedder }
    }

    pub fn length_buckets() -> Self {
        Self { embedder: None }
    }

    pub fn backend(&self) -> &'static str {
        self.embedder.as_ref().map_or("length", |e| e.name())
    }

    /// Never fails: any embedding or clustering problem falls back to
    /// length buckets.
    pub fn cluster(&self, snippets: &[String], k: usize) -> Clustering {
        if let Some(embedder) = self.embedder.as_ref() {
            match embed_and_cluster(embedder.as_ref(), snippets, k) {
                Ok(clustering) => return clustering,
                Err(err) => {
                    debug!(embedder = embedder.name(), error = %err, "clustering fell back to length buckets");
                }
            }
        }
        length_buckets(snippets)
    }
}

fn embed_and_cluster(
    embedder: &dyn SnippetEmbedder,
    snippets: &[String],
    k: usize,
) -> Result<Clustering, String> {
    let vectors = embedder.embed(snippets)?;
    if vectors.len() != snippets.len() {
        return Err(format!(
            "embedder returned {} vectors for {} snippets",
            vectors.len(),
            snippets.len()
        ));
    }

    let distinct = snippets.iter().collect::<HashSet<_>>().len();
    let k = k.min(distinct).max(1);
    let labels = kmeans(&vectors, k)?;
    let names = labels
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|label| format!("cluster_{}", label))
        .collect();
    Ok(Clustering { labels, names })
}

/// Character-length bands: <80 short, <160 medium, otherwise long.
pub fn length_buckets(snippets: &[String]) -> Clustering {
    let labels = snippets
        .iter()
        .map(|s| match s.chars().count() {
            n if n < 80 => 0,
            n if n < 160 => 1,
            _ => 2,
        })
        .collect();
    Clustering {
        labels,
        names: vec!["short".to_string(), "medium".to_string(), "long".to_string()],
    }
}
