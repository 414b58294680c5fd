//! Heuristic conformance score of a text against a style policy.
//!
//! Five equally weighted checks; no external calls.

use serde::{Deserialize, Serialize};

use crate::signature::StylePolicy;
use crate::text;

const INFORMAL_MARKERS: &[&str] = &["hey", "guys", "lol", "haha"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub exclamation_ok: bool,
    pub emoji_policy_ok: bool,
    pub formality_ok: bool,
    pub address_forms_ok: bool,
    pub sentence_length_ok: bool,
}

impl Feedback {
    pub fn passed(&self) -> usize {
        [
            self.exclamation_ok,
            self.emoji_policy_ok,
            self.formality_ok,
            self.address_forms_ok,
            self.sentence_length_ok,
        ]
        .iter()
        .filter(|ok| **ok)
        .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub feedback: Feedback,
}

pub fn score(text: &str, policy: &StylePolicy) -> ScoreResult {
    let feedback = Feedback {
        exclamation_ok: text::count_exclamations(text) as f64 <= policy.exclamation_cap,
        emoji_policy_ok: emoji_policy_ok(text, policy),
        formality_ok: formality_ok(text, policy),
        address_forms_ok: address_forms_ok(text, policy),
        sentence_length_ok: sentence_length_ok(text, policy),
    };
    let score = (feedback.passed() as f64 / 5.0 * 100.0).round() as u8;
    ScoreResult { score, feedback }
}

fn emoji_policy_ok(text: &str, policy: &StylePolicy) -> bool {
    match policy.emoji_policy.as_deref() {
        Some("allow") => true,
        None | Some("none") => !text::contains_emoji(text),
        Some(_) => false,
    }
}

fn formality_ok(text: &str, policy: &StylePolicy) -> bool {
    !policy.is_formal()
        || !INFORMAL_MARKERS
            .iter()
            .any(|marker| text::contains_whole_word(text, marker))
}

fn address_forms_ok(text: &str, policy: &StylePolicy) -> bool {
    !policy
        .address_forms
        .values()
        .flat_map(|address| address.banned.iter())
        .any(|banned| text::contains_whole_word(text, banned))
}

/// Average words per piece of `text` split on `.`, `!` and `?`. The piece
/// after a final mark counts, so "One. Two." has three pieces.
pub fn average_sentence_length(text: &str) -> f64 {
    let words = text::count_words(text);
    let pieces = text.split(&['.', '!', '?'][..]).count().max(1);
    words as f64 / pieces as f64
}

fn sentence_length_ok(text: &str, policy: &StylePolicy) -> bool {
    match policy.sentence_length_range {
        None => true,
        Some((min, max)) => {
            let average = average_sentence_length(text);
            min <= average && average <= max
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_count_includes_trailing_piece() {
        assert_eq!(average_sentence_length("One two. Three four."), 4.0 / 3.0);
        assert_eq!(average_sentence_length(""), 0.0);
    }

    #[test]
    fn unknown_emoji_policy_fails() {
        let policy = StylePolicy {
            emoji_policy: Some("sparingly".to_string()),
            ..StylePolicy::default()
        };
        assert!(!emoji_policy_ok("no emoji", &policy));
    }
}
