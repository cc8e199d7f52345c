//! Market insight and competitive analysis views.
//!
//! These are presentational flavor: labels are drawn at random from fixed lists using
//! the per-idea stream from [`Randomness::for_idea`]. Only their shape (list membership,
//! value ranges) is meaningful.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::store::IdeaRecord;

use super::Randomness;

pub const MARKET_SIZES: [&str; 7] = ["$10M", "$50M", "$100M", "$500M", "$1B", "$5B", "$10B"];

pub const TARGET_AUDIENCES: [&str; 7] = [
    "B2B Enterprise",
    "B2B SMB",
    "B2C Mass Market",
    "B2C Niche",
    "B2B2C",
    "Government",
    "Non-Profit",
];

pub const MARKET_TIMINGS: [(&str, u32); 5] = [
    ("Perfect Timing", 95),
    ("Early Market", 85),
    ("Growing Market", 75),
    ("Mature Market", 60),
    ("Declining Market", 40),
];

pub const RISK_FACTORS: [&str; 6] = [
    "Market Competition",
    "Technology Risk",
    "Regulatory Risk",
    "Execution Risk",
    "Market Adoption",
    "Funding Risk",
];

pub const COMPETITIVE_ADVANTAGES: [&str; 6] = [
    "Technology Innovation",
    "First Mover Advantage",
    "Network Effects",
    "Brand Recognition",
    "Cost Leadership",
    "Differentiation",
];

const MARKET_VIEW: &str = "market";
const COMPETITIVE_VIEW: &str = "competitive";

/// Pick from a non-empty constant list.
fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> T {
    // Lists are constants with at least one entry.
    *items.choose(rng).unwrap_or(&items[0])
}

// =============================================================================
// Market insights
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketTiming {
    pub label: &'static str,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketInsight {
    pub idea_id: String,
    pub market_size: &'static str,
    /// In [0, 100].
    pub competitive_strength: f64,
    pub target_audience: &'static str,
    pub market_timing: MarketTiming,
    pub growth_potential: i64,
    /// Leading 1..=3 entries of [`RISK_FACTORS`].
    pub risk_factors: Vec<&'static str>,
}

pub fn market_insight<R: Rng + ?Sized>(idea_id: &str, score: Option<f64>, rng: &mut R) -> MarketInsight {
    let market_size = pick(&MARKET_SIZES, rng);
    let competitive_strength = match score {
        Some(s) => (s + rng.gen_range(0.0..20.0)).min(100.0),
        None => rng.gen_range(0.0..100.0),
    };
    let target_audience = pick(&TARGET_AUDIENCES, rng);
    let (label, timing_score) = pick(&MARKET_TIMINGS, rng);
    let growth_potential = (score.unwrap_or(50.0) + rng.gen_range(0.0..30.0)).round() as i64;
    let risk_count = rng.gen_range(1..=3);

    MarketInsight {
        idea_id: idea_id.to_string(),
        market_size,
        competitive_strength,
        target_audience,
        market_timing: MarketTiming {
            label,
            score: timing_score,
        },
        growth_potential,
        risk_factors: RISK_FACTORS[..risk_count].to_vec(),
    }
}

/// One insight per record, scored or not.
pub fn market_insights(records: &[IdeaRecord], rng: &mut Randomness) -> Vec<MarketInsight> {
    records
        .iter()
        .map(|r| {
            let mut idea_rng = rng.for_idea(MARKET_VIEW, &r.id);
            market_insight(&r.id, r.score_value(), &mut idea_rng)
        })
        .collect()
}

// =============================================================================
// Competitive analysis
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarketPosition {
    MarketLeader,
    StrongChallenger,
    MarketFollower,
    NichePlayer,
}

impl MarketPosition {
    pub const ALL: [MarketPosition; 4] = [
        MarketPosition::MarketLeader,
        MarketPosition::StrongChallenger,
        MarketPosition::MarketFollower,
        MarketPosition::NichePlayer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MarketPosition::MarketLeader => "Market Leader",
            MarketPosition::StrongChallenger => "Strong Challenger",
            MarketPosition::MarketFollower => "Market Follower",
            MarketPosition::NichePlayer => "Niche Player",
        }
    }

    pub fn is_strong(self) -> bool {
        matches!(self, MarketPosition::MarketLeader | MarketPosition::StrongChallenger)
    }
}

/// Low / Medium / High, used for both threat level and barrier to entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Low, Level::Medium, Level::High];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitivePosition {
    pub idea_id: String,
    pub advantage: &'static str,
    pub position: MarketPosition,
    pub threat_level: Level,
    /// In [60, 100].
    pub uniqueness: i64,
    pub barrier_to_entry: Level,
}

pub fn competitive_position<R: Rng + ?Sized>(idea_id: &str, rng: &mut R) -> CompetitivePosition {
    CompetitivePosition {
        idea_id: idea_id.to_string(),
        advantage: pick(&COMPETITIVE_ADVANTAGES, rng),
        position: pick(&MarketPosition::ALL, rng),
        threat_level: pick(&Level::ALL, rng),
        uniqueness: rng.gen_range(60.0..=100.0_f64).round() as i64,
        barrier_to_entry: pick(&Level::ALL, rng),
    }
}

pub fn competitive_analysis(records: &[IdeaRecord], rng: &mut Randomness) -> Vec<CompetitivePosition> {
    records
        .iter()
        .map(|r| {
            let mut idea_rng = rng.for_idea(COMPETITIVE_VIEW, &r.id);
            competitive_position(&r.id, &mut idea_rng)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionCount {
    pub position: MarketPosition,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompetitiveSummary {
    pub average_uniqueness: i64,
    pub high_barrier: usize,
    pub strong_position: usize,
    pub low_threat: usize,
    /// Non-zero counts in [`MarketPosition::ALL`] order.
    pub position_distribution: Vec<PositionCount>,
}

pub fn competitive_summary(items: &[CompetitivePosition]) -> CompetitiveSummary {
    if items.is_empty() {
        return CompetitiveSummary::default();
    }
    let total: i64 = items.iter().map(|c| c.uniqueness).sum();

    CompetitiveSummary {
        average_uniqueness: (total as f64 / items.len() as f64).round() as i64,
        high_barrier: items
            .iter()
            .filter(|c| c.barrier_to_entry == Level::High)
            .count(),
        strong_position: items.iter().filter(|c| c.position.is_strong()).count(),
        low_threat: items.iter().filter(|c| c.threat_level == Level::Low).count(),
        position_distribution: MarketPosition::ALL
            .iter()
            .map(|p| PositionCount {
                position: *p,
                count: items.iter().filter(|c| c.position == *p).count(),
            })
            .filter(|c| c.count > 0)
            .collect(),
    }
}
