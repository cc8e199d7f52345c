//! History fetch and the history-view summary.

use serde::Serialize;

use crate::engine::scores::{rounded_mean, SUCCESS_THRESHOLD};
use crate::store::{IdeaRecord, IdeaStore};

/// All records for `owner_id`, newest first.
///
/// A failed read is logged and returned as an empty history: the views treat "no
/// history" and "history unavailable" the same.
pub async fn load_history(store: &dyn IdeaStore, owner_id: &str) -> Vec<IdeaRecord> {
    match store.list_for_owner(owner_id).await {
        Ok(mut records) => {
            sort_newest_first(&mut records);
            tracing::debug!(owner_id, count = records.len(), "history loaded");
            records
        }
        Err(err) => {
            tracing::warn!(owner_id, error = %err, "history fetch failed; showing empty state");
            Vec::new()
        }
    }
}

pub fn sort_newest_first(records: &mut [IdeaRecord]) {
    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total: usize,
    /// Rounded mean of present scores; 0 when none.
    pub average_score: f64,
    pub best_score: f64,
    /// Ideas scoring at least 70.
    pub successful: usize,
}

pub fn summarize(records: &[IdeaRecord]) -> HistorySummary {
    let scores: Vec<f64> = records.iter().filter_map(IdeaRecord::score_value).collect();
    HistorySummary {
        total: records.len(),
        average_score: rounded_mean(scores.iter().sum(), scores.len()),
        best_score: scores.iter().copied().fold(0.0, f64::max),
        successful: scores.iter().filter(|s| **s >= SUCCESS_THRESHOLD).count(),
    }
}
