//! Score-derived financial projections. Fully deterministic.

use serde::Serialize;

use crate::store::IdeaRecord;

use super::excerpt;

/// Revenue per year as a multiple of the score-scaled base.
pub const REVENUE_CURVE: [f64; 5] = [0.1, 0.3, 0.7, 1.2, 2.0];

const REVENUE_BASE: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialProjection {
    pub idea_id: String,
    pub idea_title: String,
    pub score: f64,
    /// Years 1..=5.
    pub revenue: [i64; 5],
    pub investment_required: i64,
    pub break_even_months: i64,
    pub roi_percent: i64,
    pub market_cap: i64,
}

impl FinancialProjection {
    pub fn for_score(idea_id: &str, idea_text: &str, score: f64) -> Self {
        let s = score / 100.0;
        let inverse = (100.0 - score) / 100.0;
        let base = s * REVENUE_BASE;

        Self {
            idea_id: idea_id.to_string(),
            idea_title: excerpt(idea_text, 30),
            score,
            revenue: REVENUE_CURVE.map(|f| (base * f).round() as i64),
            investment_required: (inverse * 2_000_000.0 + 200_000.0).round() as i64,
            break_even_months: (inverse * 36.0 + 12.0).round() as i64,
            roi_percent: (s * 500.0 + 150.0).round() as i64,
            market_cap: (s * 50_000_000.0 + 5_000_000.0).round() as i64,
        }
    }
}

/// One projection per scored record, in input order.
pub fn financial_projections(records: &[IdeaRecord]) -> Vec<FinancialProjection> {
    records
        .iter()
        .filter_map(|r| {
            r.score_value()
                .map(|score| FinancialProjection::for_score(&r.id, &r.idea_text, score))
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub ideas: usize,
    pub total_investment: i64,
    pub average_roi: i64,
    pub average_break_even_months: i64,
    pub total_market_cap: i64,
}

pub fn portfolio_summary(projections: &[FinancialProjection]) -> PortfolioSummary {
    if projections.is_empty() {
        return PortfolioSummary::default();
    }
    let n = projections.len() as f64;
    let mean = |f: fn(&FinancialProjection) -> i64| {
        (projections.iter().map(f).sum::<i64>() as f64 / n).round() as i64
    };

    PortfolioSummary {
        ideas: projections.len(),
        total_investment: projections.iter().map(|p| p.investment_required).sum(),
        average_roi: mean(|p| p.roi_percent),
        average_break_even_months: mean(|p| p.break_even_months),
        total_market_cap: projections.iter().map(|p| p.market_cap).sum(),
    }
}
