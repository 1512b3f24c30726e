//! Language detection results.

use serde::{Deserialize, Serialize};

/// Candidates below this confidence are discarded.
pub const MIN_CONFIDENCE: f32 = 0.005;

/// A lone candidate at or above this confidence is reported on its own.
pub const HIGH_CONFIDENCE: f32 = 0.7;

/// A single language guess reported by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    /// BCP 47 language tag.
    pub detected_language: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

impl DetectedLanguage {
    pub fn new(detected_language: impl Into<String>, confidence: f32) -> Self {
        Self {
            detected_language: detected_language.into(),
            confidence,
        }
    }
}

/// Outcome of a detection request after filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// One candidate, either requested or collapsed from a confident result.
    Single(DetectedLanguage),
    /// Candidates in descending confidence order.
    Ranked(Vec<DetectedLanguage>),
}

impl Detection {
    /// The highest-confidence candidate.
    pub fn top(&self) -> Option<&DetectedLanguage> {
        match self {
            Self::Single(candidate) => Some(candidate),
            Self::Ranked(candidates) => candidates.first(),
        }
    }

    /// Language tag of the highest-confidence candidate.
    pub fn top_code(&self) -> Option<&str> {
        self.top().map(|c| c.detected_language.as_str())
    }
}

/// Thresholds applied to raw detector output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionPolicy {
    pub min_confidence: f32,
    pub high_confidence: f32,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            min_confidence: MIN_CONFIDENCE,
            high_confidence: HIGH_CONFIDENCE,
        }
    }
}

impl DetectionPolicy {
    /// Filters, ranks and shapes raw candidates for a request of `count`.
    ///
    /// A lone surviving candidate at or above `high_confidence` is returned as
    /// [`Detection::Single`] whatever `count` is. Otherwise `count <= 1` yields
    /// the top candidate and a larger `count` yields up to `count` ranked
    /// candidates. Returns `None` when nothing survives filtering.
    pub fn apply(&self, candidates: Vec<DetectedLanguage>, count: usize) -> Option<Detection> {
        let mut kept: Vec<DetectedLanguage> = candidates
            .into_iter()
            .filter(|c| c.confidence.is_finite() && c.confidence >= self.min_confidence)
            .filter(|c| !c.detected_language.trim().is_empty())
            .collect();
        kept.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        if kept.is_empty() {
            return None;
        }

        if kept.len() == 1 && kept[0].confidence >= self.high_confidence {
            return kept.pop().map(Detection::Single);
        }

        if count <= 1 {
            kept.truncate(1);
            return kept.pop().map(Detection::Single);
        }

        kept.truncate(count);
        Some(Detection::Ranked(kept))
    }
}
