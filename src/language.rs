//! Language identification and the fixed address-form vocabulary.

use std::collections::{BTreeMap, HashMap};

use crate::text;

pub const DEFAULT_LANGUAGE: &str = "en";

pub trait LanguageDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Best-guess ISO 639-1 code, or `None` when the text gives no evidence.
    fn detect(&self, text: &str) -> Option<String>;
}

const PROFILES: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "the", "and", "is", "are", "you", "your", "we", "our", "to", "of", "in", "for",
            "with", "this", "that", "it", "be", "have", "not", "will",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "und", "ist", "sie", "wir", "ihr", "nicht", "mit", "für", "ein",
            "eine", "auf", "den", "dem", "zu", "auch", "sich", "du",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "et", "est", "vous", "nous", "une", "des", "pour", "avec", "pas",
            "que", "qui", "dans", "sur", "tu", "votre", "du", "ce",
        ],
    ),
    (
        "es",
        &[
            "el", "los", "las", "y", "es", "usted", "nosotros", "una", "para", "con", "por",
            "que", "del", "muy", "su", "tú", "pero", "como", "está", "gracias",
        ],
    ),
    (
        "it",
        &[
            "il", "gli", "e", "è", "sono", "noi", "una", "per", "con", "che", "non", "della",
            "grazie", "questo", "siamo", "anche", "lei", "tuo",
        ],
    ),
    (
        "nl",
        &[
            "het", "een", "en", "is", "zijn", "wij", "jij", "jullie", "niet", "met", "voor",
            "van", "dat", "ook", "ons", "bedankt",
        ],
    ),
    (
        "pt",
        &[
            "o", "os", "as", "e", "é", "você", "nós", "uma", "para", "com", "não", "que", "do",
            "da", "obrigado", "muito", "seu",
        ],
    ),
];

/// Stopword-frequency identifier over a handful of European languages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopwordDetector;

impl LanguageDetector for StopwordDetector {
    fn name(&self) -> &'static str {
        "stopwords"
    }

    fn detect(&self, text: &str) -> Option<String> {
        let tokens: Vec<String> = text::words(text).map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return None;
        }

        let mut best: Option<(&str, usize)> = None;
        for (code, stopwords) in PROFILES {
            let hits = tokens
                .iter()
                .filter(|token| stopwords.contains(&token.as_str()))
                .count();
            if hits == 0 {
                continue;
            }
            // earlier profiles win ties
            if best.map_or(true, |(_, top)| hits > top) {
                best = Some((*code, hits));
            }
        }
        best.map(|(code, _)| code.to_string())
    }
}

/// Always answers the same code; used when detection is switched off.
#[derive(Debug, Clone)]
pub struct FixedLanguage(pub String);

impl Default for FixedLanguage {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl LanguageDetector for FixedLanguage {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn detect(&self, _text: &str) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Hint first, detector second, `"en"` last.
pub fn detect_or_default(
    detector: &dyn LanguageDetector,
    text: &str,
    hint: Option<&str>,
) -> String {
    if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
        return hint.to_string();
    }
    detector
        .detect(text)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// Most frequent code; ties go to the code seen first.
pub fn primary_language(detections: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for code in detections {
        *counts.entry(code.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for code in detections {
        let count = counts[code.as_str()];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((code.as_str(), count));
        }
    }
    best.map(|(code, _)| code.to_string())
}

pub fn histogram(detections: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for code in detections {
        *counts.entry(code.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn address_vocabulary(language: &str) -> &'static [&'static str] {
    match language {
        "en" => &["you", "sir", "madam", "y'all", "dear"],
        "de" => &["Sie", "Du"],
        "fr" => &["vous", "tu"],
        "es" => &["usted", "ustedes", "tú"],
        _ => &[],
    }
}

/// Whole-word, case-insensitive counts of the language's address forms
/// summed over `texts`. Unknown languages give an empty map.
pub fn address_counts<S: AsRef<str>>(texts: &[S], language: &str) -> BTreeMap<String, usize> {
    address_vocabulary(language)
        .iter()
        .map(|form| {
            let count = texts
                .iter()
                .map(|t| text::count_whole_word(t.as_ref(), form))
                .sum();
            (form.to_string(), count)
        })
        .collect()
}
