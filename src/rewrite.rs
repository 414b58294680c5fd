//! Deterministic, rule-based rewrite used when generation output is unusable.
//!
//! [`apply_fallback`] is a pure function of the policy and the draft. Steps
//! run in a fixed order, each on the previous step's output:
//! emoji strip, exclamation cap, formality substitutions, banned address
//! forms, sentence truncation.

use crate::segmenter::RegexSegmenter;
use crate::signature::StylePolicy;
use crate::text;

const FORMAL_SUBSTITUTIONS: &[(&str, &str)] =
    &[("hey", "Hello"), ("guys", "everyone"), ("can't", "cannot")];

const INFORMAL_SUBSTITUTIONS: &[(&str, &str)] = &[("do not", "don't")];

pub fn apply_fallback(policy: &StylePolicy, draft: &str) -> String {
    let mut out = draft.to_string();

    if policy.emoji_policy.as_deref() == Some("none") {
        out = text::strip_emoji(&out);
    }

    // absolute cap for this draft, not scaled per 1000 words
    if text::count_exclamations(&out) as f64 > policy.exclamation_cap {
        out = out.replace('!', ".");
    }

    if policy.is_formal() {
        out = substitute(&out, FORMAL_SUBSTITUTIONS);
    } else if policy.is_informal() {
        out = substitute(&out, INFORMAL_SUBSTITUTIONS);
    }

    for address in policy.address_forms.values() {
        let replacement = address.replacement();
        for banned in &address.banned {
            out = text::replace_whole_word(&out, banned, replacement);
        }
    }

    if let Some((_, max)) = policy.sentence_length_range {
        out = truncate_sentences(&out, max);
    }

    out
}

fn substitute(input: &str, pairs: &[(&str, &str)]) -> String {
    pairs.iter().fold(input.to_string(), |acc, (from, to)| {
        text::replace_whole_word_keep_capital(&acc, from, to)
    })
}

/// Cut every sentence longer than `max_words` whitespace-separated words
/// down to its leading words. Text between sentences is kept as is, and a
/// sentence always keeps at least one word.
fn truncate_sentences(text: &str, max_words: f64) -> String {
    if max_words.is_nan() || max_words < 0.0 {
        return text.to_string();
    }
    let limit = (max_words.floor() as usize).max(1);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in RegexSegmenter.spans(text) {
        out.push_str(&text[cursor..span.start]);
        let sentence = &text[span.clone()];
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.len() > limit {
            out.push_str(&words[..limit].join(" "));
        } else {
            out.push_str(sentence);
        }
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_leading_words() {
        assert_eq!(
            truncate_sentences("one two three four five six seven eight", 6.0),
            "one two three four five six"
        );
        assert_eq!(truncate_sentences("Short one. Also short.", 6.0), "Short one. Also short.");
    }

    #[test]
    fn nan_bound_leaves_text_alone() {
        assert_eq!(truncate_sentences("a b c", f64::NAN), "a b c");
    }

    #[test]
    fn informal_contracts_do_not() {
        let policy = StylePolicy {
            formality_level: Some("informal".to_string()),
            ..StylePolicy::default()
        };
        assert_eq!(apply_fallback(&policy, "Do not worry."), "Don't worry.");
        assert_eq!(apply_fallback(&policy, "we do not mind"), "we don't mind");
    }

    #[test]
    fn truncation_keeps_paragraph_breaks() {
        assert_eq!(
            truncate_sentences("Hi there.\n\nSecond para.", 10.0),
            "Hi there.\n\nSecond para."
        );
        assert_eq!(
            truncate_sentences("One two three.\n\nFour five six.", 2.0),
            "One two\n\nFour five"
        );
    }

    #[test]
    fn zero_bound_keeps_one_word() {
        assert_eq!(truncate_sentences("Hello there. How are you?", 0.0), "Hello How");
    }
}
