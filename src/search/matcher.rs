//! Sliding-window phrase matcher
//!
//! Scans a page's word sequence for runs of consecutive words that each
//! fuzzily match the corresponding query word. Every start position is
//! tried independently, so overlapping occurrences are all reported.

use rapidfuzz::fuzz;

use crate::ocr::Word;

use super::types::{ConfidenceLabel, Match};

/// Matcher tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    /// Minimum per-word similarity (0-100)
    pub fuzzy_threshold: f64,
    /// Words of context on each side of a match
    pub context_words: usize,
    /// Pixels added on every side of a match box
    pub padding: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 80.0,
            context_words: 5,
            padding: 15,
        }
    }
}

/// Indel similarity on a 0-100 scale: `2 * lcs / (len_a + len_b)`
pub fn similarity(a: &str, b: &str) -> f64 {
    fuzz::ratio(a.chars(), b.chars()) * 100.0
}

#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    config: MatcherConfig,
}

impl PhraseMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Find every occurrence of `query` in `words`.
    ///
    /// `page` is 1-indexed and copied into each match.
    pub fn find_matches(&self, words: &[Word], query: &str, page: usize) -> Vec<Match> {
        let query = query.to_lowercase();
        let query_words: Vec<&str> = query.split_whitespace().collect();
        if query_words.is_empty() || words.len() < query_words.len() {
            return Vec::new();
        }

        // Lowercase once per page, not once per window
        let candidates: Vec<String> = words.iter().map(|w| w.text.to_lowercase()).collect();

        let mut matches = Vec::new();
        for start in 0..=(words.len() - query_words.len()) {
            if let Some(scores) = self.match_window(&candidates[start..], &query_words) {
                matches.push(self.build_match(words, start, &scores, page));
            }
        }
        matches
    }

    /// Per-word scores when every query word matches its candidate in order
    fn match_window(&self, candidates: &[String], query_words: &[&str]) -> Option<Vec<f64>> {
        let mut scores = Vec::with_capacity(query_words.len());
        for (candidate, query_word) in candidates.iter().zip(query_words) {
            let score = similarity(candidate, query_word);
            if score < self.config.fuzzy_threshold {
                return None;
            }
            scores.push(score);
        }
        Some(scores)
    }

    fn build_match(&self, words: &[Word], start: usize, scores: &[f64], page: usize) -> Match {
        let end = start + scores.len();
        let span = &words[start..end];

        let left = span.iter().map(|w| w.left).min().unwrap_or(0);
        let top = span.iter().map(|w| w.top).min().unwrap_or(0);
        let right = span.iter().map(Word::right).max().unwrap_or(0);
        let bottom = span.iter().map(Word::bottom).max().unwrap_or(0);

        let padding = self.config.padding;
        let left = left.saturating_sub(padding);
        let top = top.saturating_sub(padding);
        let right = right.saturating_add(padding);
        let bottom = bottom.saturating_add(padding);

        let context_start = start.saturating_sub(self.config.context_words);
        let context_end = (end + self.config.context_words).min(words.len());

        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        let score = (average * 10.0).round() / 10.0;

        Match {
            page,
            left,
            top,
            width: right - left,
            height: bottom - top,
            matched_text: join_text(span),
            context: join_text(&words[context_start..context_end]),
            confidence_label: ConfidenceLabel::from_score(score),
            score,
        }
    }
}

fn join_text(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, left: u32, top: u32) -> Word {
        Word {
            text: text.to_string(),
            left,
            top,
            width: 40,
            height: 12,
            confidence: 95.0,
        }
    }

    fn line(texts: &[&str]) -> Vec<Word> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| word(t, 100 + i as u32 * 50, 200))
            .collect()
    }

    #[test]
    fn test_exact_phrase_match() {
        let words = line(&["invoice", "total", "42"]);
        let matches = PhraseMatcher::default().find_matches(&words, "invoice total", 2);

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.page, 2);
        assert_eq!(m.matched_text, "invoice total");
        assert_eq!(m.context, "invoice total 42");
        assert_eq!(m.score, 100.0);
        assert_eq!(m.confidence_label, ConfidenceLabel::High);
    }

    #[test]
    fn test_bbox_is_padded_union() {
        let words = line(&["invoice", "total"]);
        let m = &PhraseMatcher::default().find_matches(&words, "invoice total", 1)[0];

        // Union is left=100 top=200 right=190 bottom=212, padded by 15
        assert_eq!((m.left, m.top), (85, 185));
        assert_eq!((m.width, m.height), (120, 42));
    }

    #[test]
    fn test_bbox_contains_every_word() {
        let words = vec![word("due", 300, 40), word("date", 20, 44), word("soon", 500, 10)];
        let matcher = PhraseMatcher::default();
        let m = &matcher.find_matches(&words, "due date soon", 1)[0];

        for w in &words {
            assert!(m.left <= w.left);
            assert!(m.top <= w.top);
            assert!(m.left + m.width >= w.right());
            assert!(m.top + m.height >= w.bottom());
        }
    }

    #[test]
    fn test_padding_clamped_at_page_edge() {
        let words = vec![word("edge", 5, 3)];
        let m = &PhraseMatcher::default().find_matches(&words, "edge", 1)[0];
        assert_eq!((m.left, m.top), (0, 0));
        // right = 45 + 15, bottom = 15 + 15
        assert_eq!((m.width, m.height), (60, 30));
    }

    #[test]
    fn test_case_insensitive_and_original_text_kept() {
        let words = line(&["INVOICE", "Total"]);
        let matches = PhraseMatcher::default().find_matches(&words, "  Invoice   TOTAL ", 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "INVOICE Total");
    }

    #[test]
    fn test_fuzzy_match_tolerates_ocr_noise() {
        // Nine shared characters out of ten on each side
        let words = line(&["lnvestment"]);
        let matches = PhraseMatcher::default().find_matches(&words, "investment", 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 90.0);
        assert_eq!(matches[0].confidence_label, ConfidenceLabel::High);
    }

    #[test]
    fn test_medium_label_for_weaker_match() {
        // Five shared characters out of six on each side
        let words = line(&["amovnt"]);
        let matches = PhraseMatcher::default().find_matches(&words, "amount", 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 83.3);
        assert_eq!(matches[0].confidence_label, ConfidenceLabel::Medium);
    }

    #[test]
    fn test_trailing_punctuation_still_matches() {
        let words = line(&["Sales", "tax."]);
        let matches = PhraseMatcher::default().find_matches(&words, "sales tax", 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "Sales tax.");
        // (100 + 85.71) / 2
        assert_eq!(matches[0].score, 92.9);
        assert_eq!(matches[0].confidence_label, ConfidenceLabel::High);
    }

    #[test]
    fn test_similarity_is_indel_ratio() {
        assert_eq!((similarity("tax.", "tax") * 10.0).round() / 10.0, 85.7);
        assert_eq!((similarity("due,", "due") * 10.0).round() / 10.0, 85.7);
        assert_eq!(similarity("invoice", "invoice"), 100.0);
    }

    #[test]
    fn test_plural_scores_high() {
        let words = line(&["invoices"]);
        let matches = PhraseMatcher::default().find_matches(&words, "invoice", 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 93.3);
        assert_eq!(matches[0].confidence_label, ConfidenceLabel::High);
    }

    #[test]
    fn test_below_threshold_rejected() {
        let words = line(&["invoice", "tax"]);
        let matches = PhraseMatcher::default().find_matches(&words, "invoice total", 1);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_window_stops_at_first_mismatch() {
        let words = line(&["invoice", "of", "total"]);
        let matches = PhraseMatcher::default().find_matches(&words, "invoice total", 1);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_overlapping_windows_all_reported() {
        let words = line(&["ha", "ha", "ha"]);
        let matches = PhraseMatcher::default().find_matches(&words, "ha ha", 1);
        assert_eq!(matches.len(), 2);
        assert!(matches[0].left < matches[1].left);
    }

    #[test]
    fn test_context_clamped_to_sequence() {
        let words = line(&[
            "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
            "juliett", "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo",
            "sierra", "tango",
        ]);
        let matcher = PhraseMatcher::default();

        let middle = &matcher.find_matches(&words, "kilo lima", 1)[0];
        assert_eq!(
            middle.context,
            "foxtrot golf hotel india juliett kilo lima mike november oscar papa quebec"
        );

        let head = &matcher.find_matches(&words, "alpha", 1)[0];
        assert_eq!(head.context, "alpha bravo charlie delta echo foxtrot");

        let tail = &matcher.find_matches(&words, "tango", 1)[0];
        assert_eq!(tail.context, "oscar papa quebec romeo sierra tango");
    }

    #[test]
    fn test_matched_word_count_equals_query_word_count() {
        let words = line(&["the", "quick", "brown", "fox", "the", "quick", "brown"]);
        let query = "the quick brown";
        let matches = PhraseMatcher::default().find_matches(&words, query, 1);
        assert_eq!(matches.len(), 2);
        for m in matches {
            assert_eq!(
                m.matched_text.split_whitespace().count(),
                query.split_whitespace().count()
            );
        }
    }

    #[test]
    fn test_blank_query_yields_nothing() {
        let words = line(&["invoice"]);
        let matcher = PhraseMatcher::default();
        assert!(matcher.find_matches(&words, "", 1).is_empty());
        assert!(matcher.find_matches(&words, "   \t ", 1).is_empty());
    }

    #[test]
    fn test_query_longer_than_page() {
        let words = line(&["invoice"]);
        let matches = PhraseMatcher::default().find_matches(&words, "invoice total", 1);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_zero_padding_config() {
        let matcher = PhraseMatcher::new(MatcherConfig {
            padding: 0,
            ..MatcherConfig::default()
        });
        let words = line(&["invoice"]);
        let m = &matcher.find_matches(&words, "invoice", 1)[0];
        assert_eq!((m.left, m.top, m.width, m.height), (100, 200, 40, 12));
    }
}
