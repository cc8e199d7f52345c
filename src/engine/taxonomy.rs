//! Keyword-table classification of development items and deployment steps.
//!
//! Tables are checked in order and the first category with any keyword contained in the
//! lowercased text wins.

use serde::Serialize;

use crate::store::IdeaRecord;

use super::idea_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DevelopmentCategory {
    Technology,
    Marketing,
    Business,
    Product,
    Other,
}

const DEVELOPMENT_TABLE: &[(DevelopmentCategory, &[&str])] = &[
    (
        DevelopmentCategory::Technology,
        &["tech", "platform", "system", "software", "app", "api", "database"],
    ),
    (
        DevelopmentCategory::Marketing,
        &["market", "brand", "customer", "user", "promotion", "advertising"],
    ),
    (
        DevelopmentCategory::Business,
        &["revenue", "business", "strategy", "partnership", "funding", "monetization"],
    ),
    (
        DevelopmentCategory::Product,
        &["feature", "product", "design", "prototype", "development", "testing"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeploymentCategory {
    Planning,
    Development,
    Testing,
    Launch,
    Marketing,
    Other,
}

const DEPLOYMENT_TABLE: &[(DeploymentCategory, &[&str])] = &[
    (
        DeploymentCategory::Planning,
        &["plan", "strategy", "roadmap", "design", "research"],
    ),
    (
        DeploymentCategory::Development,
        &["develop", "build", "create", "implement", "code"],
    ),
    (
        DeploymentCategory::Testing,
        &["test", "validate", "verify", "quality", "beta"],
    ),
    (
        DeploymentCategory::Launch,
        &["launch", "deploy", "release", "go-live", "publish"],
    ),
    (
        DeploymentCategory::Marketing,
        &["market", "promote", "advertise", "outreach", "campaign"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Complexity {
    High,
    Medium,
    Low,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::High, Complexity::Medium, Complexity::Low];
}

const COMPLEXITY_TABLE: &[(Complexity, &[&str])] = &[
    (
        Complexity::High,
        &["integration", "architecture", "security", "scalability", "optimization"],
    ),
    (
        Complexity::Medium,
        &["development", "testing", "implementation", "deployment"],
    ),
];

fn first_match<C: Copy>(text: &str, table: &[(C, &[&str])], fallback: C) -> C {
    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(fallback)
}

pub fn classify_development(text: &str) -> DevelopmentCategory {
    first_match(text, DEVELOPMENT_TABLE, DevelopmentCategory::Other)
}

pub fn classify_deployment(text: &str) -> DeploymentCategory {
    first_match(text, DEPLOYMENT_TABLE, DeploymentCategory::Other)
}

pub fn estimate_complexity(text: &str) -> Complexity {
    first_match(text, COMPLEXITY_TABLE, Complexity::Low)
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentRow {
    pub idea_label: String,
    pub idea_index: usize,
    pub text: String,
    pub category: DevelopmentCategory,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentRow {
    pub idea_label: String,
    pub idea_index: usize,
    pub step: String,
    /// 1-based position of the step within its idea.
    pub phase: usize,
    pub category: DeploymentCategory,
    pub complexity: Complexity,
}

pub fn development_rows(records: &[IdeaRecord]) -> Vec<DevelopmentRow> {
    let mut rows = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let Some(analysis) = &record.analysis else {
            continue;
        };
        for text in &analysis.key_developments {
            rows.push(DevelopmentRow {
                idea_label: idea_label(idx),
                idea_index: idx,
                text: text.clone(),
                category: classify_development(text),
                length: text.chars().count(),
            });
        }
    }
    rows
}

pub fn deployment_rows(records: &[IdeaRecord]) -> Vec<DeploymentRow> {
    let mut rows = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let Some(analysis) = &record.analysis else {
            continue;
        };
        for (step_idx, step) in analysis.deployment_steps.iter().enumerate() {
            rows.push(DeploymentRow {
                idea_label: idea_label(idx),
                idea_index: idx,
                step: step.clone(),
                phase: step_idx + 1,
                category: classify_deployment(step),
                complexity: estimate_complexity(step),
            });
        }
    }
    rows
}

// =============================================================================
// Counts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount<C> {
    pub category: C,
    pub count: usize,
}

/// Non-zero counts in the order of `order`.
fn counts_in_order<C: Copy + PartialEq>(
    order: &[C],
    values: impl Iterator<Item = C> + Clone,
) -> Vec<CategoryCount<C>> {
    order
        .iter()
        .map(|c| CategoryCount {
            category: *c,
            count: values.clone().filter(|v| v == c).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

pub fn development_category_counts(rows: &[DevelopmentRow]) -> Vec<CategoryCount<DevelopmentCategory>> {
    const ORDER: [DevelopmentCategory; 5] = [
        DevelopmentCategory::Technology,
        DevelopmentCategory::Marketing,
        DevelopmentCategory::Business,
        DevelopmentCategory::Product,
        DevelopmentCategory::Other,
    ];
    counts_in_order(&ORDER, rows.iter().map(|r| r.category))
}

pub fn deployment_category_counts(rows: &[DeploymentRow]) -> Vec<CategoryCount<DeploymentCategory>> {
    const ORDER: [DeploymentCategory; 6] = [
        DeploymentCategory::Planning,
        DeploymentCategory::Development,
        DeploymentCategory::Testing,
        DeploymentCategory::Launch,
        DeploymentCategory::Marketing,
        DeploymentCategory::Other,
    ];
    counts_in_order(&ORDER, rows.iter().map(|r| r.category))
}

pub fn deployment_complexity_counts(rows: &[DeploymentRow]) -> Vec<CategoryCount<Complexity>> {
    counts_in_order(&Complexity::ALL, rows.iter().map(|r| r.complexity))
}
