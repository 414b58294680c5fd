//! Readability scoring (higher = easier to read).

use crate::segmenter::SentenceSegmenter;
use crate::text;

pub trait ReadabilityScorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the formula cannot be applied to `text`.
    fn score(&self, text: &str) -> Option<f64>;
}

/// Flesch Reading Ease with a vowel-group syllable estimate.
pub struct FleschReadingEase {
    segmenter: &'static dyn SentenceSegmenter,
}

impl FleschReadingEase {
    pub fn new(segmenter: &'static dyn SentenceSegmenter) -> Self {
        Self { segmenter }
    }
}

impl ReadabilityScorer for FleschReadingEase {
    fn name(&self) -> &'static str {
        "flesch"
    }

    fn score(&self, text: &str) -> Option<f64> {
        let words: Vec<&str> = text::words(text).collect();
        let sentences = self.segmenter.segment(text).len();
        if words.is_empty() || sentences == 0 {
            return None;
        }

        let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
        let words_per_sentence = words.len() as f64 / sentences as f64;
        let syllables_per_word = syllables as f64 / words.len() as f64;
        let score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
        score.is_finite().then_some(score)
    }
}

/// `max(0, 120 - 8 * words per sentence)`; always produces a value.
pub struct HeuristicReadability {
    segmenter: &'static dyn SentenceSegmenter,
}

impl HeuristicReadability {
    pub fn new(segmenter: &'static dyn SentenceSegmenter) -> Self {
        Self { segmenter }
    }

    pub fn compute(&self, text: &str) -> f64 {
        let words = text::count_words(text).max(1);
        let sentences = self.segmenter.segment(text).len().max(1);
        let average = words as f64 / sentences as f64;
        (120.0 - average * 8.0).max(0.0)
    }
}

impl ReadabilityScorer for HeuristicReadability {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn score(&self, text: &str) -> Option<f64> {
        Some(self.compute(text))
    }
}

fn count_syllables(word: &str) -> usize {
    let lower = word.to_lowercase();
    let mut count = 0;
    let mut previous_vowel = false;
    for ch in lower.chars() {
        let vowel = matches!(
            ch,
            'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'à' | 'á' | 'â' | 'ä' | 'è' | 'é' | 'ê' | 'ë'
                | 'ì' | 'í' | 'î' | 'ï' | 'ò' | 'ó' | 'ô' | 'ö' | 'ù' | 'ú' | 'û' | 'ü'
        );
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }
    if lower.ends_with('e') && !lower.ends_with("le") && count > 1 {
        count -= 1;
    }
    count.max(1)
}
