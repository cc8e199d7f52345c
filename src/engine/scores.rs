//! Score trend, distribution, and the overview header.

use serde::Serialize;

use crate::analysis::ScoreGrade;
use crate::store::IdeaRecord;

use super::{excerpt, idea_label};

/// Score at or above which an idea counts as a success.
pub const SUCCESS_THRESHOLD: f64 = 70.0;
/// Score at or above which an idea counts as high potential.
pub const HIGH_POTENTIAL_THRESHOLD: f64 = 80.0;

const EXCERPT_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePoint {
    /// `"Idea {n}"`, numbered among scored records only.
    pub label: String,
    pub value: f64,
    /// `YYYY-MM-DD` of submission.
    pub date: String,
    pub excerpt: String,
}

/// One point per scored record, in input order. Unscored records are skipped.
pub fn score_series(records: &[IdeaRecord]) -> Vec<ScorePoint> {
    records
        .iter()
        .filter_map(|r| r.score_value().map(|v| (r, v)))
        .enumerate()
        .map(|(idx, (record, value))| ScorePoint {
            label: idea_label(idx),
            value,
            date: record.submitted_at.format("%Y-%m-%d").to_string(),
            excerpt: excerpt(&record.idea_text, EXCERPT_CHARS),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBucket {
    pub grade: ScoreGrade,
    pub label: &'static str,
    pub count: usize,
}

/// Grade buckets in Excellent, Good, Needs Work order, omitting empty ones.
pub fn score_distribution(records: &[IdeaRecord]) -> Vec<ScoreBucket> {
    let mut counts = [0usize; 3];
    for value in records.iter().filter_map(IdeaRecord::score_value) {
        let slot = match ScoreGrade::for_value(value) {
            ScoreGrade::Excellent => 0,
            ScoreGrade::Good => 1,
            ScoreGrade::NeedsWork => 2,
        };
        counts[slot] += 1;
    }

    ScoreGrade::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(grade, count)| ScoreBucket {
            grade: *grade,
            label: grade.range_label(),
            count,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_ideas: usize,
    pub scored_ideas: usize,
    /// Rounded mean of present scores; 0 when none.
    pub average_score: f64,
    pub best_score: f64,
    pub ideas_with_pitch: usize,
    pub high_potential: usize,
    /// Percentage of all ideas scoring at least 70.
    pub success_rate: f64,
    pub avg_developments_per_idea: f64,
    pub avg_deployment_steps_per_idea: f64,
}

pub fn overview(records: &[IdeaRecord]) -> OverviewStats {
    let scores: Vec<f64> = records.iter().filter_map(IdeaRecord::score_value).collect();
    let total = records.len();

    let (developments, steps) = records
        .iter()
        .filter_map(|r| r.analysis.as_ref())
        .fold((0usize, 0usize), |(d, s), a| {
            (d + a.key_developments.len(), s + a.deployment_steps.len())
        });

    OverviewStats {
        total_ideas: total,
        scored_ideas: scores.len(),
        average_score: rounded_mean(scores.iter().sum(), scores.len()),
        best_score: scores.iter().copied().fold(0.0, f64::max),
        ideas_with_pitch: records.iter().filter(|r| r.pitch().is_some()).count(),
        high_potential: scores
            .iter()
            .filter(|s| **s >= HIGH_POTENTIAL_THRESHOLD)
            .count(),
        success_rate: percentage(
            scores.iter().filter(|s| **s >= SUCCESS_THRESHOLD).count(),
            total,
        ),
        avg_developments_per_idea: rounded_mean(developments as f64, total),
        avg_deployment_steps_per_idea: rounded_mean(steps as f64, total),
    }
}

pub(crate) fn rounded_mean(sum: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        (sum / n as f64).round()
    }
}

pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 * 100.0 / whole as f64).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{record, scored};

    #[test]
    fn series_skips_unscored_and_numbers_scored_only() {
        let records = vec![scored("a", 72.0), record("b", "x", None), scored("c", 0.0)];
        let series = score_series(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Idea 1");
        assert_eq!(series[0].date, "2026-03-14");
        assert_eq!(series[1].label, "Idea 2");
        assert_eq!(series[1].value, 0.0);
    }

    #[test]
    fn distribution_partitions_scored_records() {
        let records = vec![
            scored("a", 85.0),
            scored("b", 60.0),
            scored("c", 59.0),
            scored("d", 80.0),
            record("e", "x", None),
        ];
        let dist = score_distribution(&records);
        let counts: Vec<(ScoreGrade, usize)> = dist.iter().map(|b| (b.grade, b.count)).collect();
        assert_eq!(
            counts,
            vec![
                (ScoreGrade::Excellent, 2),
                (ScoreGrade::Good, 1),
                (ScoreGrade::NeedsWork, 1)
            ]
        );
        assert_eq!(dist.iter().map(|b| b.count).sum::<usize>(), 4);
    }

    #[test]
    fn distribution_omits_empty_buckets() {
        let dist = score_distribution(&[scored("a", 61.0)]);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].label, "Good (60-79)");
    }

    #[test]
    fn overview_counts() {
        let records = vec![
            scored("a", 90.0),
            scored("b", 70.0),
            scored("c", 41.0),
            record("d", "x", None),
        ];
        let stats = overview(&records);
        assert_eq!(stats.total_ideas, 4);
        assert_eq!(stats.scored_ideas, 3);
        assert_eq!(stats.average_score, 67.0);
        assert_eq!(stats.best_score, 90.0);
        assert_eq!(stats.high_potential, 1);
        assert_eq!(stats.success_rate, 50.0);
        assert_eq!(stats.ideas_with_pitch, 0);
    }

    #[test]
    fn overview_of_nothing_is_zeroed() {
        assert_eq!(overview(&[]), OverviewStats::default());
    }
}
