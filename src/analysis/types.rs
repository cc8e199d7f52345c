//! Normalized analysis result and its parts.
//!
//! These types only exist in validated form: the normalizer is the single way raw
//! model output becomes an [`AnalysisResult`]. Serialization uses the same field names
//! as the model contract so stored records stay readable next to raw payloads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive bounds of a score value.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Overall idea score, `value` in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub value: f64,
    #[serde(default)]
    pub reasoning: String,
}

impl Score {
    pub fn grade(&self) -> ScoreGrade {
        ScoreGrade::for_value(self.value)
    }
}

/// Fixed three-way partition of the score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreGrade {
    /// [80, 100]
    Excellent,
    /// [60, 80)
    Good,
    /// [0, 60)
    NeedsWork,
}

impl ScoreGrade {
    pub const ALL: [ScoreGrade; 3] = [ScoreGrade::Excellent, ScoreGrade::Good, ScoreGrade::NeedsWork];

    pub fn for_value(value: f64) -> Self {
        if value >= 80.0 {
            ScoreGrade::Excellent
        } else if value >= 60.0 {
            ScoreGrade::Good
        } else {
            ScoreGrade::NeedsWork
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreGrade::Excellent => "Excellent",
            ScoreGrade::Good => "Good",
            ScoreGrade::NeedsWork => "Needs Work",
        }
    }

    /// Bucket label as shown on distribution charts.
    pub fn range_label(self) -> &'static str {
        match self {
            ScoreGrade::Excellent => "Excellent (80-100)",
            ScoreGrade::Good => "Good (60-79)",
            ScoreGrade::NeedsWork => "Needs Work (0-59)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScoreGrade::Excellent => "Outstanding potential! Ready for investment and development.",
            ScoreGrade::Good => "Good foundation with some areas for improvement.",
            ScoreGrade::NeedsWork => {
                "Requires significant development and refinement before launch."
            }
        }
    }
}

impl fmt::Display for ScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Roadmap quarter. Ordering is Q1 < Q2 < Q3 < Q4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Parse a contract key (`q1`..`q4`, case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "q1" => Some(Quarter::Q1),
            "q2" => Some(Quarter::Q2),
            "q3" => Some(Quarter::Q3),
            "q4" => Some(Quarter::Q4),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quarter -> goal text. Iteration is always Q1..Q4 regardless of input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roadmap(BTreeMap<Quarter, String>);

impl Roadmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quarter: Quarter, goal: impl Into<String>) {
        self.0.insert(quarter, goal.into());
    }

    pub fn get(&self, quarter: Quarter) -> Option<&str> {
        self.0.get(&quarter).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Present quarters in Q1..Q4 order.
    pub fn iter(&self) -> impl Iterator<Item = (Quarter, &str)> {
        self.0.iter().map(|(q, g)| (*q, g.as_str()))
    }

    /// All four slots in order; absent quarters are `None`.
    pub fn slots(&self) -> [(Quarter, Option<&str>); 4] {
        Quarter::ALL.map(|q| (q, self.get(q)))
    }
}

impl FromIterator<(Quarter, String)> for Roadmap {
    fn from_iter<T: IntoIterator<Item = (Quarter, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Normalized model evaluation of one idea.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
    #[serde(default)]
    pub key_developments: Vec<String>,
    #[serde(default)]
    pub deployment_steps: Vec<String>,
    #[serde(default)]
    pub roadmap: Roadmap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investor_pitch: Option<String>,
}

impl AnalysisResult {
    pub fn score_value(&self) -> Option<f64> {
        self.score.as_ref().map(|s| s.value)
    }

    pub fn pitch(&self) -> Option<&str> {
        self.investor_pitch.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_boundaries_are_lower_inclusive() {
        assert_eq!(ScoreGrade::for_value(100.0), ScoreGrade::Excellent);
        assert_eq!(ScoreGrade::for_value(85.0), ScoreGrade::Excellent);
        assert_eq!(ScoreGrade::for_value(80.0), ScoreGrade::Excellent);
        assert_eq!(ScoreGrade::for_value(79.9), ScoreGrade::Good);
        assert_eq!(ScoreGrade::for_value(60.0), ScoreGrade::Good);
        assert_eq!(ScoreGrade::for_value(59.0), ScoreGrade::NeedsWork);
        assert_eq!(ScoreGrade::for_value(0.0), ScoreGrade::NeedsWork);
    }

    #[test]
    fn roadmap_iterates_in_quarter_order() {
        let roadmap: Roadmap = [
            (Quarter::Q4, "scale".to_string()),
            (Quarter::Q2, "beta".to_string()),
        ]
        .into_iter()
        .collect();

        let order: Vec<Quarter> = roadmap.iter().map(|(q, _)| q).collect();
        assert_eq!(order, vec![Quarter::Q2, Quarter::Q4]);

        let slots = roadmap.slots();
        assert_eq!(slots[0], (Quarter::Q1, None));
        assert_eq!(slots[1], (Quarter::Q2, Some("beta")));
        assert_eq!(slots[2], (Quarter::Q3, None));
        assert_eq!(slots[3], (Quarter::Q4, Some("scale")));
    }

    #[test]
    fn analysis_serializes_with_contract_field_names() {
        let mut roadmap = Roadmap::new();
        roadmap.insert(Quarter::Q1, "Launch pilot");
        let result = AnalysisResult {
            score: Some(Score {
                value: 72.0,
                reasoning: "Solid niche market".into(),
            }),
            key_developments: vec!["Build subscription platform".into()],
            deployment_steps: vec![],
            roadmap,
            investor_pitch: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"]["value"], 72.0);
        assert_eq!(json["roadmap"]["q1"], "Launch pilot");
        assert!(json.get("investor_pitch").is_none());

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
