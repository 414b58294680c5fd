use sha2::{Digest, Sha256};

use crate::text;

pub const EMBEDDING_DIMS: usize = 64;

pub trait SnippetEmbedder: Send + Sync {
    fn name(&self) -> &'static str;

    fn embed(&self, snippets: &[String]) -> Result<Vec<Vec<f32>>, String>;
}

/// Feature-hashed bag of words and character trigrams.
///
/// Each feature is hashed with SHA-256; the first two bytes pick a bucket and
/// the third a sign. Vectors are L2-normalised.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    fn embed_one(&self, snippet: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; EMBEDDING_DIMS];
        for word in text::words(snippet) {
            let word = word.to_lowercase();
            add_feature(&mut vector, "w", &word, 1.0);

            let chars: Vec<char> = format!(" {} ", word).chars().collect();
            for window in chars.windows(3) {
                let gram: String = window.iter().collect();
                add_feature(&mut vector, "g", &gram, 0.5);
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }
        vector
    }
}

impl SnippetEmbedder for HashingEmbedder {
    fn name(&self) -> &'static str {
        "hashing"
    }

    fn embed(&self, snippets: &[String]) -> Result<Vec<Vec<f32>>, String> {
        if snippets.is_empty() {
            return Err("no snippets to embed".to_string());
        }
        Ok(snippets.iter().map(|s| self.embed_one(s)).collect())
    }
}

fn add_feature(vector: &mut [f32], namespace: &str, feature: &str, weight: f32) {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(feature.as_bytes());
    let digest = hasher.finalize();

    let bucket = u16::from_le_bytes([digest[0], digest[1]]) as usize % vector.len();
    let sign = if digest[2] & 1 == 0 { 1.0 } else { -1.0 };
    vector[bucket] += sign * weight;
}
