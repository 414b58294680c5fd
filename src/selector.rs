//! Picks short, cluster-diverse example sentences for the synthesis prompt.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub pool_cap: usize,
    pub max_examples: usize,
    pub fallback_examples: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            pool_cap: 500,
            max_examples: 8,
            fallback_examples: 4,
        }
    }
}

/// Orders the first `pool_cap` sentences by `(cluster label, char length)`
/// and keeps the first `max_examples`; ties keep source order.
///
/// Labels are reused cyclically when there are fewer labels than sentences.
/// Without sentences the first `fallback_examples` corpus items are returned
/// untouched.
pub fn select_examples(
    sentences: &[String],
    labels: &[usize],
    corpus: &[String],
    limits: SelectionLimits,
) -> Vec<String> {
    let mut pool: Vec<(usize, usize, &String)> = sentences
        .iter()
        .take(limits.pool_cap)
        .enumerate()
        .map(|(i, sentence)| {
            let label = if labels.is_empty() {
                0
            } else {
                labels[i % labels.len()]
            };
            (label, sentence.chars().count(), sentence)
        })
        .collect();

    if pool.is_empty() {
        return corpus
            .iter()
            .take(limits.fallback_examples)
            .cloned()
            .collect();
    }

    pool.sort_by_key(|(label, length, _)| (*label, *length));
    pool.into_iter()
        .take(limits.max_examples)
        .map(|(_, _, sentence)| sentence.clone())
        .collect()
}
