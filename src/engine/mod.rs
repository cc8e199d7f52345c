//! Analytics/derivation engine.
//!
//! Every view is a plain function over an immutable slice of [`IdeaRecord`]s, ordered
//! newest first. Nothing here performs I/O or reads ambient state; empty input yields
//! empty collections (and zeroed scalars) rather than errors.
//!
//! Pseudo-random views draw from a [`Randomness`] handed in by the caller:
//! - the *run* stream (roadmap priority, funding jitter, industry trends) is seeded from
//!   `EngineOptions::rng_seed` when set and from OS entropy otherwise;
//! - *flavor* streams (market and competitive labels) are per idea. In
//!   [`FlavorMode::Stable`] they are seeded from a BLAKE3 hash of the idea id, so the same
//!   idea shows the same labels on every render.

pub mod financial;
pub mod market;
pub mod pitch;
pub mod roadmap;
pub mod scores;
pub mod taxonomy;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::store::IdeaRecord;

pub use financial::{financial_projections, portfolio_summary, FinancialProjection, PortfolioSummary};
pub use market::{
    competitive_analysis, competitive_summary, market_insights, CompetitivePosition,
    CompetitiveSummary, MarketInsight,
};
pub use pitch::{pitch_analytics, PitchAnalytics};
pub use roadmap::{quarter_priority_matrix, roadmap_rows, Priority, QuarterPriorityCounts, RoadmapRow};
pub use scores::{overview, score_distribution, score_series, OverviewStats, ScoreBucket, ScorePoint};
pub use taxonomy::{
    deployment_category_counts, deployment_complexity_counts, deployment_rows,
    development_category_counts, development_rows, CategoryCount, Complexity, DeploymentCategory,
    DeploymentRow, DevelopmentCategory, DevelopmentRow,
};

// =============================================================================
// Options and randomness
// =============================================================================

/// How flavor fields behave across renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlavorMode {
    /// Same labels for the same idea id on every render.
    #[default]
    Stable,
    /// Fresh labels on every render.
    Churn,
}

impl FlavorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FlavorMode::Stable => "stable",
            FlavorMode::Churn => "churn",
        }
    }
}

impl fmt::Display for FlavorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlavorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(FlavorMode::Stable),
            "churn" => Ok(FlavorMode::Churn),
            other => Err(format!("unknown flavor mode `{other}` (expected stable or churn)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub rng_seed: Option<u64>,
    pub flavor: FlavorMode,
}

impl EngineOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_flavor(mut self, flavor: FlavorMode) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn randomness(&self) -> Randomness {
        Randomness::new(self)
    }
}

/// Random sources for one dashboard computation.
pub struct Randomness {
    run: StdRng,
    seed: Option<u64>,
    flavor: FlavorMode,
}

impl Randomness {
    pub fn new(options: &EngineOptions) -> Self {
        let run = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            run,
            seed: options.rng_seed,
            flavor: options.flavor,
        }
    }

    /// Shorthand for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(&EngineOptions::seeded(seed))
    }

    pub fn run(&mut self) -> &mut StdRng {
        &mut self.run
    }

    /// Flavor stream for one (view, idea) pair.
    pub fn for_idea(&mut self, view: &str, idea_id: &str) -> StdRng {
        match self.flavor {
            FlavorMode::Stable => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(b"ideaforge.flavor.v1\0");
                if let Some(seed) = self.seed {
                    hasher.update(&seed.to_le_bytes());
                }
                hasher.update(view.as_bytes());
                hasher.update(b"\0");
                hasher.update(idea_id.as_bytes());
                StdRng::from_seed(*hasher.finalize().as_bytes())
            }
            FlavorMode::Churn => StdRng::seed_from_u64(self.run.gen()),
        }
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Every aggregate view over one owner's history.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub overview: OverviewStats,
    pub score_series: Vec<ScorePoint>,
    pub score_distribution: Vec<ScoreBucket>,
    pub developments: Vec<DevelopmentRow>,
    pub development_categories: Vec<CategoryCount<DevelopmentCategory>>,
    pub deployments: Vec<DeploymentRow>,
    pub deployment_categories: Vec<CategoryCount<DeploymentCategory>>,
    pub deployment_complexity: Vec<CategoryCount<Complexity>>,
    pub roadmap: Vec<RoadmapRow>,
    pub roadmap_matrix: Vec<QuarterPriorityCounts>,
    pub pitch: PitchAnalytics,
    pub market: Vec<MarketInsight>,
    pub competitive: Vec<CompetitivePosition>,
    pub competitive_summary: CompetitiveSummary,
    pub financial: Vec<FinancialProjection>,
    pub portfolio: PortfolioSummary,
}

/// Compute every view. `records` must already be sorted newest first.
pub fn build_dashboard(records: &[IdeaRecord], options: &EngineOptions) -> Dashboard {
    let mut rng = options.randomness();

    let developments = development_rows(records);
    let deployments = deployment_rows(records);
    let roadmap = roadmap_rows(records, rng.run());
    let competitive = competitive_analysis(records, &mut rng);
    let financial = financial_projections(records);

    Dashboard {
        overview: overview(records),
        score_series: score_series(records),
        score_distribution: score_distribution(records),
        development_categories: development_category_counts(&developments),
        deployment_categories: deployment_category_counts(&deployments),
        deployment_complexity: deployment_complexity_counts(&deployments),
        roadmap_matrix: quarter_priority_matrix(&roadmap),
        pitch: pitch_analytics(records, rng.run()),
        market: market_insights(records, &mut rng),
        competitive_summary: competitive_summary(&competitive),
        portfolio: portfolio_summary(&financial),
        developments,
        deployments,
        roadmap,
        competitive,
        financial,
    }
}

/// First `max_chars` characters followed by `...`, as shown on chart tooltips.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// `"Idea {n}"`, 1-based.
pub(crate) fn idea_label(index: usize) -> String {
    format!("Idea {}", index + 1)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_yields_empty_views() {
        let dash = build_dashboard(&[], &EngineOptions::seeded(1));
        assert_eq!(dash.overview.total_ideas, 0);
        assert!(dash.score_series.is_empty());
        assert!(dash.score_distribution.is_empty());
        assert!(dash.developments.is_empty());
        assert!(dash.development_categories.is_empty());
        assert!(dash.deployments.is_empty());
        assert!(dash.deployment_categories.is_empty());
        assert!(dash.deployment_complexity.is_empty());
        assert!(dash.roadmap.is_empty());
        assert!(dash.roadmap_matrix.is_empty());
        assert_eq!(dash.pitch.total_pitches, 0);
        assert!(dash.pitch.keywords.is_empty());
        assert!(dash.pitch.industry_trends.is_empty());
        assert!(dash.pitch.funding_readiness.is_empty());
        assert!(dash.market.is_empty());
        assert!(dash.competitive.is_empty());
        assert!(dash.competitive_summary.position_distribution.is_empty());
        assert!(dash.financial.is_empty());
        assert_eq!(dash.portfolio.ideas, 0);
    }

    #[test]
    fn stable_flavor_is_keyed_by_idea_id() {
        let mut a = Randomness::new(&EngineOptions::default());
        let mut b = Randomness::new(&EngineOptions::default());
        let x: u64 = a.for_idea("market", "idea-1").gen();
        let y: u64 = b.for_idea("market", "idea-1").gen();
        let z: u64 = b.for_idea("market", "idea-2").gen();
        assert_eq!(x, y);
        assert_ne!(x, z);
    }

    #[test]
    fn churn_flavor_changes_between_calls() {
        let mut rng = Randomness::new(&EngineOptions::seeded(3).with_flavor(FlavorMode::Churn));
        let x: u64 = rng.for_idea("market", "idea-1").gen();
        let y: u64 = rng.for_idea("market", "idea-1").gen();
        assert_ne!(x, y);
    }

    #[test]
    fn seeded_dashboards_are_reproducible() {
        let records = vec![
            test_support::scored("a", 91.0),
            test_support::scored("b", 45.0),
        ];
        let one = build_dashboard(&records, &EngineOptions::seeded(42));
        let two = build_dashboard(&records, &EngineOptions::seeded(42));
        assert_eq!(
            serde_json::to_value(&one).unwrap(),
            serde_json::to_value(&two).unwrap()
        );
    }

    #[test]
    fn flavor_mode_parses_case_insensitively() {
        assert_eq!("Stable".parse::<FlavorMode>(), Ok(FlavorMode::Stable));
        assert_eq!("churn".parse::<FlavorMode>(), Ok(FlavorMode::Churn));
        assert!("sometimes".parse::<FlavorMode>().is_err());
    }

    #[test]
    fn excerpt_counts_characters() {
        assert_eq!(excerpt("short", 30), "short...");
        assert_eq!(excerpt("ééééé", 2), "éé...");
    }
}
