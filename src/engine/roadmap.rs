//! Roadmap expansion and the quarter x priority matrix.

use rand::Rng;
use serde::Serialize;

use crate::analysis::Quarter;
use crate::store::IdeaRecord;

use super::idea_label;

pub const HIGH_PRIORITY_KEYWORDS: [&str; 5] = ["launch", "mvp", "revenue", "funding", "critical"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// High on a keyword hit, otherwise a coin flip between Medium and Low.
pub fn estimate_priority<R: Rng + ?Sized>(goal: &str, rng: &mut R) -> Priority {
    let lower = goal.to_lowercase();
    if HIGH_PRIORITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Priority::High
    } else if rng.gen_bool(0.5) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapRow {
    pub idea_label: String,
    pub idea_index: usize,
    pub quarter: Quarter,
    pub goal: String,
    pub priority: Priority,
    pub length: usize,
}

/// One row per present quarter, Q1..Q4 within each idea.
pub fn roadmap_rows<R: Rng + ?Sized>(records: &[IdeaRecord], rng: &mut R) -> Vec<RoadmapRow> {
    let mut rows = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let Some(analysis) = &record.analysis else {
            continue;
        };
        for (quarter, goal) in analysis.roadmap.iter() {
            rows.push(RoadmapRow {
                idea_label: idea_label(idx),
                idea_index: idx,
                quarter,
                goal: goal.to_string(),
                priority: estimate_priority(goal, rng),
                length: goal.chars().count(),
            });
        }
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterPriorityCounts {
    pub quarter: Quarter,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Per-quarter priority counts for all four quarters; empty when there are no rows.
pub fn quarter_priority_matrix(rows: &[RoadmapRow]) -> Vec<QuarterPriorityCounts> {
    if rows.is_empty() {
        return Vec::new();
    }
    Quarter::ALL
        .iter()
        .map(|q| {
            let mut counts = QuarterPriorityCounts {
                quarter: *q,
                high: 0,
                medium: 0,
                low: 0,
            };
            for row in rows.iter().filter(|r| r.quarter == *q) {
                match row.priority {
                    Priority::High => counts.high += 1,
                    Priority::Medium => counts.medium += 1,
                    Priority::Low => counts.low += 1,
                }
            }
            counts
        })
        .collect()
}
