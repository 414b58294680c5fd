//! Sentence segmentation.
//!
//! Two strategies sit behind [`SentenceSegmenter`]: the UAX #29 sentence
//! boundary model and a punctuation regex. The model is a process-wide
//! resource obtained through [`sentence_model`]; it is initialized at most
//! once, and a disabled or failed initialization pins the regex strategy for
//! the rest of the process.

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::env;
use std::ops::Range;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

pub trait SentenceSegmenter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Split `text` into trimmed, non-empty sentences in source order.
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Language-agnostic boundary model (Unicode sentence boundaries).
#[derive(Debug)]
pub struct UnicodeSentenceModel {
    _private: (),
}

impl UnicodeSentenceModel {
    fn initialize() -> Option<Self> {
        let model = Self { _private: () };
        let sample = model.segment("First check. Second check!");
        if sample.len() == 2 {
            Some(model)
        } else {
            None
        }
    }
}

impl SentenceSegmenter for UnicodeSentenceModel {
    fn name(&self) -> &'static str {
        "unicode"
    }

    fn segment(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Splits on whitespace that follows `.`, `!` or `?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSegmenter;

impl RegexSegmenter {
    /// Byte ranges of the trimmed, non-empty sentences of `text`.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut start = 0;
        for boundary in BOUNDARY_RE.find_iter(text) {
            // the terminal mark is ASCII, so +1 stays on a char boundary
            push_trimmed(&mut spans, text, start..boundary.start() + 1);
            start = boundary.end();
        }
        push_trimmed(&mut spans, text, start..text.len());
        spans
    }
}

impl SentenceSegmenter for RegexSegmenter {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn segment(&self, text: &str) -> Vec<String> {
        self.spans(text)
            .into_iter()
            .map(|span| text[span].to_string())
            .collect()
    }
}

fn push_trimmed(out: &mut Vec<Range<usize>>, text: &str, span: Range<usize>) {
    let piece = &text[span.clone()];
    let lead = piece.len() - piece.trim_start().len();
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        let start = span.start + lead;
        out.push(start..start + trimmed.len());
    }
}

static SENTENCE_MODEL: OnceCell<Option<UnicodeSentenceModel>> = OnceCell::new();

/// Process-wide boundary model.
///
/// The first caller decides: `TOV_USE_SEGMENTER=0` or a failed self-check yields
/// `None` forever after, with no retry.
pub fn sentence_model() -> Option<&'static UnicodeSentenceModel> {
    let enabled = env::var("TOV_USE_SEGMENTER")
        .map(|value| value.trim() != "0")
        .unwrap_or(true);
    init_model(&SENTENCE_MODEL, enabled, UnicodeSentenceModel::initialize)
}

fn init_model<F>(
    cell: &OnceCell<Option<UnicodeSentenceModel>>,
    enabled: bool,
    initialize: F,
) -> Option<&UnicodeSentenceModel>
where
    F: FnOnce() -> Option<UnicodeSentenceModel>,
{
    cell.get_or_init(|| {
        if !enabled {
            debug!("sentence model disabled by environment");
            return None;
        }
        let model = initialize();
        if model.is_none() {
            debug!("sentence model self-check failed, using regex segmentation");
        }
        model
    })
    .as_ref()
}

/// Pick the model when it is wanted and available, the regex otherwise.
pub fn select_segmenter(prefer_model: bool) -> &'static dyn SentenceSegmenter {
    choose(sentence_model(), prefer_model)
}

fn choose(
    model: Option<&'static UnicodeSentenceModel>,
    prefer_model: bool,
) -> &'static dyn SentenceSegmenter {
    static REGEX: RegexSegmenter = RegexSegmenter;
    match model {
        Some(model) if prefer_model => model as &dyn SentenceSegmenter,
        _ => &REGEX,
    }
}
