use std::collections::HashMap;

use crate::config::MatchingConfig;

/// Lower-cases a name and drops everything outside `[a-z0-9]`.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Maps digits Tesseract commonly confuses with letters onto those letters.
/// Expects already-normalized input.
pub fn fold_confusables(normalized: &str) -> String {
    normalized
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'l',
            other => other,
        })
        .collect()
}

/// Dice coefficient over the multisets of adjacent character pairs.
///
/// Shared bigrams are counted once per occurrence, so "aaaa" vs "aa"
/// shares one "aa", not three.
pub fn dice_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut remaining: HashMap<&[u8], usize> = HashMap::new();
    for bigram in a.windows(2) {
        *remaining.entry(bigram).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for bigram in b.windows(2) {
        if let Some(count) = remaining.get_mut(bigram) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (a.len() - 1 + b.len() - 1) as f64
}

/// Compares raw OCR names with the configured normalization.
#[derive(Clone, Debug)]
pub struct NameMatcher {
    candidate_threshold: f64,
    assignment_threshold: f64,
    fold_confusables: bool,
}

impl NameMatcher {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            candidate_threshold: config.candidate_threshold,
            assignment_threshold: config.assignment_threshold,
            fold_confusables: config.fold_confusables,
        }
    }

    /// Comparison key for a name.
    pub fn key(&self, name: &str) -> String {
        let normalized = normalize_name(name);
        if self.fold_confusables {
            fold_confusables(&normalized)
        } else {
            normalized
        }
    }

    /// Number of roster names that plausibly appear among `candidates`.
    pub fn count_matches(&self, roster: &[String], candidates: &[String]) -> usize {
        let candidate_keys: Vec<String> = candidates.iter().map(|c| self.key(c)).collect();
        roster
            .iter()
            .filter(|name| {
                let key = self.key(name);
                candidate_keys
                    .iter()
                    .any(|c| dice_similarity(&key, c) > self.candidate_threshold)
            })
            .count()
    }

    /// Index of the candidate most similar to `name`, if any clears the
    /// assignment threshold. Earlier candidates win ties.
    pub fn best_match(&self, name: &str, candidates: &[String]) -> Option<usize> {
        let key = self.key(name);
        let mut best: Option<(usize, f64)> = None;
        for (idx, candidate) in candidates.iter().enumerate() {
            let score = dice_similarity(&key, &self.key(candidate));
            let floor = best.map_or(self.assignment_threshold, |(_, s)| s);
            if score > floor {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| idx)
    }
}

#[cfg(test)]
impl NameMatcher {
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        dice_similarity(&self.key(a), &self.key(b))
    }
}
