//! Search result types

use std::time::Duration;

use serde::Serialize;

/// Match confidence bucket derived from the average word similarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl ConfidenceLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::High
        } else if score >= 80.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One phrase occurrence on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Page number (1-indexed)
    pub page: usize,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub matched_text: String,
    pub context: String,
    #[serde(rename = "confidence")]
    pub confidence_label: ConfidenceLabel,
    #[serde(rename = "match_score")]
    pub score: f64,
}

/// All matches found on one page
#[derive(Debug, Clone, Serialize)]
pub struct PageMatches {
    pub page: usize,
    pub occurrences: usize,
    pub locations: Vec<Match>,
}

/// Wall-clock time spent in each phase, in seconds
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PhaseTimings {
    pub ocr_secs: f64,
    pub search_secs: f64,
    pub total_secs: f64,
}

impl PhaseTimings {
    pub fn new(ocr: Duration, search: Duration, total: Duration) -> Self {
        Self {
            ocr_secs: ocr.as_secs_f64(),
            search_secs: search.as_secs_f64(),
            total_secs: total.as_secs_f64(),
        }
    }
}

/// Aggregated result of one search over one document
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub success: bool,
    pub search_query: String,
    pub total_matches: usize,
    pub total_pages: usize,
    pub pages_with_matches: usize,
    /// Pages whose extraction failed and were skipped
    pub failed_pages: Vec<usize>,
    pub from_cache: bool,
    /// Concurrent page workers used for OCR (0 when served from cache)
    pub workers: usize,
    pub timings: PhaseTimings,
    /// Ascending by page number
    pub matches: Vec<PageMatches>,
}

impl SearchReport {
    /// Iterate all matches in report order
    pub fn all_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().flat_map(|page| page.locations.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_thresholds() {
        assert_eq!(ConfidenceLabel::from_score(100.0), ConfidenceLabel::High);
        assert_eq!(ConfidenceLabel::from_score(90.0), ConfidenceLabel::High);
        assert_eq!(ConfidenceLabel::from_score(89.9), ConfidenceLabel::Medium);
        assert_eq!(ConfidenceLabel::from_score(80.0), ConfidenceLabel::Medium);
        assert_eq!(ConfidenceLabel::from_score(79.9), ConfidenceLabel::Low);
    }

    #[test]
    fn test_match_serializes_with_wire_names() {
        let m = Match {
            page: 2,
            left: 1,
            top: 2,
            width: 3,
            height: 4,
            matched_text: "invoice total".to_string(),
            context: "invoice total 42".to_string(),
            confidence_label: ConfidenceLabel::High,
            score: 100.0,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["match_score"], 100.0);
        assert_eq!(json["page"], 2);
    }
}
