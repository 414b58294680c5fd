//! Lexical helpers shared by the metrics engine, the fallback rewriter and
//! the scorer.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static EMOJI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{1F300}-\x{1FAFF}]").unwrap());

pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD_RE.find_iter(text).map(|m| m.as_str())
}

pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

pub fn count_emoji(text: &str) -> usize {
    EMOJI_RE.find_iter(text).count()
}

pub fn contains_emoji(text: &str) -> bool {
    EMOJI_RE.is_match(text)
}

pub fn strip_emoji(text: &str) -> String {
    EMOJI_RE.replace_all(text, "").into_owned()
}

pub fn count_exclamations(text: &str) -> usize {
    text.matches('!').count()
}

/// Case-insensitive, `\b`-delimited matcher for a literal term.
///
/// Returns `None` for blank terms or terms the regex engine rejects, so
/// callers can skip them instead of failing.
pub fn whole_word_regex(term: &str) -> Option<Regex> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term))).ok()
}

pub fn count_whole_word(text: &str, term: &str) -> usize {
    whole_word_regex(term)
        .map(|re| re.find_iter(text).count())
        .unwrap_or(0)
}

pub fn contains_whole_word(text: &str, term: &str) -> bool {
    whole_word_regex(term)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

pub fn replace_whole_word(text: &str, term: &str, replacement: &str) -> String {
    match whole_word_regex(term) {
        Some(re) => re.replace_all(text, NoExpand(replacement)).into_owned(),
        None => text.to_string(),
    }
}

/// Like [`replace_whole_word`], but a match starting with an uppercase
/// letter gets its replacement capitalized too.
pub fn replace_whole_word_keep_capital(text: &str, term: &str, replacement: &str) -> String {
    let Some(re) = whole_word_regex(term) else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &regex::Captures<'_>| {
        let starts_upper = caps[0].chars().next().map_or(false, char::is_uppercase);
        if starts_upper {
            capitalize(replacement)
        } else {
            replacement.to_string()
        }
    })
    .into_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_unicode_words() {
        assert_eq!(count_words("Hola, ¿cómo estás tú?"), 4);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn emoji_range_is_matched() {
        let text = "launch day 🚀 and 🎉!";
        assert_eq!(count_emoji(text), 2);
        assert_eq!(strip_emoji(text), "launch day  and !");
        assert!(!contains_emoji("plain text ✓"));
    }

    #[test]
    fn whole_word_replacement_ignores_substrings() {
        let out = replace_whole_word("Hey, they said HEY.", "hey", "Hello");
        assert_eq!(out, "Hello, they said Hello.");
    }

    #[test]
    fn replacement_is_literal() {
        assert_eq!(replace_whole_word("sir", "sir", "$1"), "$1");
    }

    #[test]
    fn keep_capital_follows_the_match() {
        assert_eq!(
            replace_whole_word_keep_capital("Do not panic. DO NOT. do not.", "do not", "don't"),
            "Don't panic. Don't. don't."
        );
        assert_eq!(replace_whole_word_keep_capital("hey you", "hey", "Hello"), "Hello you");
    }
}
