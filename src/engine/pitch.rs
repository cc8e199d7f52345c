//! Investor pitch analytics: keywords, sentiment, complexity, industry trends, and
//! funding readiness.

use std::cmp::Reverse;

use rand::Rng;
use serde::Serialize;

use crate::store::IdeaRecord;

use super::scores::rounded_mean;
use super::taxonomy::Complexity;

pub const KEYWORD_VOCABULARY: [&str; 15] = [
    "ai",
    "machine learning",
    "saas",
    "platform",
    "mobile",
    "web",
    "blockchain",
    "fintech",
    "healthcare",
    "education",
    "e-commerce",
    "social",
    "gaming",
    "iot",
    "cloud",
];

pub const POSITIVE_WORDS: [&str; 7] = [
    "innovative",
    "revolutionary",
    "growth",
    "profitable",
    "scalable",
    "market-leading",
    "competitive advantage",
];

pub const NEGATIVE_WORDS: [&str; 6] = [
    "risk",
    "challenge",
    "difficult",
    "expensive",
    "complex",
    "saturated",
];

pub const INDUSTRIES: [&str; 9] = [
    "Technology",
    "Healthcare",
    "Finance",
    "Education",
    "E-commerce",
    "Gaming",
    "Social Media",
    "IoT",
    "AI/ML",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct PitchAnalytics {
    pub total_pitches: usize,
    pub avg_word_count: f64,
    pub avg_char_length: f64,
    pub keywords: Vec<KeywordStat>,
    pub sentiment: Vec<PitchSentiment>,
    pub sentiment_counts: Vec<SentimentCount>,
    /// Mean of per-pitch sentiment scores; 0 when there are no pitches.
    pub mean_sentiment_score: f64,
    pub complexity: Vec<PitchComplexity>,
    pub industry_trends: Vec<IndustryTrend>,
    pub funding_readiness: Vec<FundingReadiness>,
}

/// All pitch views over the records that have a pitch.
pub fn pitch_analytics<R: Rng + ?Sized>(records: &[IdeaRecord], rng: &mut R) -> PitchAnalytics {
    let pitched: Vec<(&IdeaRecord, &str)> = records
        .iter()
        .filter_map(|r| r.pitch().map(|p| (r, p)))
        .collect();
    if pitched.is_empty() {
        return PitchAnalytics::default();
    }

    let texts: Vec<&str> = pitched.iter().map(|(_, p)| *p).collect();
    let sentiment: Vec<PitchSentiment> = pitched
        .iter()
        .map(|(r, p)| classify_sentiment(&r.id, p))
        .collect();

    PitchAnalytics {
        total_pitches: pitched.len(),
        avg_word_count: rounded_mean(
            texts.iter().map(|t| word_count(t) as f64).sum(),
            texts.len(),
        ),
        avg_char_length: rounded_mean(
            texts.iter().map(|t| t.chars().count() as f64).sum(),
            texts.len(),
        ),
        keywords: keyword_stats(&texts),
        sentiment_counts: sentiment_counts(&sentiment),
        mean_sentiment_score: sentiment.iter().map(|s| s.score as f64).sum::<f64>()
            / sentiment.len() as f64,
        sentiment,
        complexity: pitched
            .iter()
            .map(|(r, p)| pitch_complexity(&r.id, p))
            .collect(),
        industry_trends: industry_trends(pitched.len(), rng),
        funding_readiness: funding_readiness(&pitched, rng),
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// =============================================================================
// Keywords
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordStat {
    pub word: &'static str,
    /// Total occurrences across all pitches.
    pub count: usize,
    /// Share of pitches mentioning the word, 0..=100.
    pub percentage: f64,
}

pub fn keyword_stats(pitches: &[&str]) -> Vec<KeywordStat> {
    if pitches.is_empty() {
        return Vec::new();
    }
    let lowered: Vec<String> = pitches.iter().map(|p| p.to_lowercase()).collect();

    let mut stats: Vec<KeywordStat> = KEYWORD_VOCABULARY
        .iter()
        .map(|&word| {
            let count = lowered.iter().map(|t| t.matches(word).count()).sum();
            let containing = lowered.iter().filter(|t| t.contains(word)).count();
            KeywordStat {
                word,
                count,
                percentage: super::scores::percentage(containing, lowered.len()),
            }
        })
        .filter(|s| s.count > 0)
        .collect();
    // Stable: ties keep vocabulary order.
    stats.sort_by_key(|s| Reverse(s.count));
    stats
}

// =============================================================================
// Sentiment
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchSentiment {
    pub idea_id: String,
    pub sentiment: Sentiment,
    pub positive_hits: usize,
    pub negative_hits: usize,
    pub score: i64,
}

/// Each listed word counts at most once per pitch.
pub fn classify_sentiment(idea_id: &str, pitch: &str) -> PitchSentiment {
    let text = pitch.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| text.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| text.contains(*w)).count();

    let sentiment = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };
    let diff = positive as f64 - negative as f64;

    PitchSentiment {
        idea_id: idea_id.to_string(),
        sentiment,
        positive_hits: positive,
        negative_hits: negative,
        score: (((diff + 5.0) / 10.0) * 100.0).round() as i64,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentCount {
    pub sentiment: Sentiment,
    pub count: usize,
}

fn sentiment_counts(items: &[PitchSentiment]) -> Vec<SentimentCount> {
    Sentiment::ALL
        .iter()
        .map(|s| SentimentCount {
            sentiment: *s,
            count: items.iter().filter(|i| i.sentiment == *s).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

// =============================================================================
// Complexity
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchComplexity {
    pub idea_id: String,
    pub complexity: Complexity,
    pub readability: f64,
}

pub fn pitch_complexity(idea_id: &str, pitch: &str) -> PitchComplexity {
    let chars = pitch.chars().count();
    let complexity = if chars > 1000 {
        Complexity::High
    } else if chars > 500 {
        Complexity::Medium
    } else {
        Complexity::Low
    };
    PitchComplexity {
        idea_id: idea_id.to_string(),
        complexity,
        readability: (120.0 - word_count(pitch) as f64 / 10.0).clamp(1.0, 100.0),
    }
}

// =============================================================================
// Industry trends
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryTrend {
    pub industry: &'static str,
    pub ideas: usize,
    pub growth: u32,
    pub investment_attraction: u32,
}

/// Flavor view: random per-industry figures, sorted by `ideas` descending.
pub fn industry_trends<R: Rng + ?Sized>(pitch_count: usize, rng: &mut R) -> Vec<IndustryTrend> {
    if pitch_count == 0 {
        return Vec::new();
    }
    let mut trends: Vec<IndustryTrend> = INDUSTRIES
        .iter()
        .map(|&industry| IndustryTrend {
            industry,
            ideas: rng.gen_range(0..pitch_count),
            growth: rng.gen_range(0..=100),
            investment_attraction: rng.gen_range(0..=100),
        })
        .collect();
    trends.sort_by_key(|t| Reverse(t.ideas));
    trends
}

// =============================================================================
// Funding readiness
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FundingStage {
    SeriesAReady,
    SeedReady,
    AngelReady,
    PreSeed,
}

impl FundingStage {
    pub fn for_readiness(readiness: f64) -> Self {
        if readiness > 80.0 {
            FundingStage::SeriesAReady
        } else if readiness > 60.0 {
            FundingStage::SeedReady
        } else if readiness > 40.0 {
            FundingStage::AngelReady
        } else {
            FundingStage::PreSeed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FundingStage::SeriesAReady => "Series A Ready",
            FundingStage::SeedReady => "Seed Ready",
            FundingStage::AngelReady => "Angel Ready",
            FundingStage::PreSeed => "Pre-Seed",
        }
    }

    pub fn funding_range(self) -> &'static str {
        match self {
            FundingStage::SeriesAReady => "$2M-5M",
            FundingStage::SeedReady => "$500K-2M",
            FundingStage::AngelReady => "$100K-500K",
            FundingStage::PreSeed => "$25K-100K",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingReadiness {
    pub idea_id: String,
    pub readiness: i64,
    pub stage: FundingStage,
    pub estimated_funding: &'static str,
}

const LONG_PITCH_CHARS: usize = 300;
const MAX_JITTER: f64 = 30.0;

/// `min(100, score + length bonus + U[0, 30))`, staged before rounding.
pub fn readiness_for<R: Rng + ?Sized>(score: Option<f64>, pitch: &str, rng: &mut R) -> f64 {
    let bonus = if pitch.chars().count() > LONG_PITCH_CHARS {
        20.0
    } else {
        10.0
    };
    let jitter = rng.gen_range(0.0..MAX_JITTER);
    (score.unwrap_or(0.0) + bonus + jitter).min(100.0)
}

fn funding_readiness<R: Rng + ?Sized>(
    pitched: &[(&IdeaRecord, &str)],
    rng: &mut R,
) -> Vec<FundingReadiness> {
    let mut out: Vec<FundingReadiness> = pitched
        .iter()
        .map(|(record, pitch)| {
            let raw = readiness_for(record.score_value(), pitch, rng);
            let stage = FundingStage::for_readiness(raw);
            FundingReadiness {
                idea_id: record.id.clone(),
                readiness: raw.round() as i64,
                stage,
                estimated_funding: stage.funding_range(),
            }
        })
        .collect();
    out.sort_by_key(|f| Reverse(f.readiness));
    out
}
