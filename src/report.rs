//! Markdown rendering for single results, history, and the dashboard.

use crate::analysis::AnalysisResult;
use crate::engine::Dashboard;
use crate::history::HistorySummary;
use crate::store::IdeaRecord;

pub fn render_analysis_markdown(idea_text: &str, result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str("# Idea Analysis\n\n");
    out.push_str(&format!("> {}\n\n", idea_text.trim()));

    out.push_str("## Score\n\n");
    match &result.score {
        Some(score) => {
            let grade = score.grade();
            out.push_str(&format!("**{}/100** ({})\n\n", fmt_num(score.value), grade));
            out.push_str(&format!("{}\n\n", grade.description()));
            if !score.reasoning.is_empty() {
                out.push_str(&format!("{}\n\n", score.reasoning));
            }
        }
        None => out.push_str("No score provided.\n\n"),
    }

    out.push_str("## Key Developments\n\n");
    push_numbered(&mut out, &result.key_developments);

    out.push_str("## Deployment Steps\n\n");
    push_numbered(&mut out, &result.deployment_steps);

    out.push_str("## Roadmap\n\n");
    out.push_str("| Quarter | Goals |\n|---|---|\n");
    for (quarter, goal) in result.roadmap.slots() {
        out.push_str(&format!("| {} | {} |\n", quarter, goal.unwrap_or("")));
    }
    out.push('\n');

    out.push_str("## Investor Pitch\n\n");
    match result.pitch() {
        Some(pitch) => out.push_str(&format!("{pitch}\n")),
        None => out.push_str("No pitch provided.\n"),
    }
    out
}

pub fn render_record_markdown(record: &IdeaRecord) -> String {
    let mut out = match &record.analysis {
        Some(analysis) => render_analysis_markdown(&record.idea_text, analysis),
        None => format!("# Idea\n\n> {}\n\nNot analyzed yet.\n", record.idea_text.trim()),
    };
    out.push_str(&format!(
        "\n---\n- Id: `{}`\n- Submitted: {}\n- Contact: {} <{}>\n",
        record.id,
        record.submitted_at.format("%Y-%m-%d %H:%M UTC"),
        record.contact.name,
        record.contact.email
    ));
    out
}

pub fn render_history_markdown(records: &[IdeaRecord], summary: &HistorySummary) -> String {
    let mut out = String::new();
    out.push_str("# Idea History\n\n");
    if records.is_empty() {
        out.push_str("No ideas yet. Submit one to get started.\n");
        return out;
    }
    out.push_str(&format!("- Total ideas: {}\n", summary.total));
    out.push_str(&format!("- Average score: {}\n", fmt_num(summary.average_score)));
    out.push_str(&format!("- Best score: {}\n", fmt_num(summary.best_score)));
    out.push_str(&format!("- Successful (70+): {}\n\n", summary.successful));

    out.push_str("| Submitted | Score | Idea | Id |\n|---|---|---|---|\n");
    for record in records {
        out.push_str(&format!(
            "| {} | {} | {} | `{}` |\n",
            record.submitted_at.format("%Y-%m-%d"),
            record
                .score_value()
                .map(fmt_num)
                .unwrap_or_else(|| "-".to_string()),
            table_cell(&crate::engine::excerpt(&record.idea_text, 60)),
            record.id
        ));
    }
    out
}

pub fn render_dashboard_markdown(dash: &Dashboard) -> String {
    let mut out = String::new();
    let o = &dash.overview;
    out.push_str("# Ideas Dashboard\n\n");
    if o.total_ideas == 0 {
        out.push_str("No ideas yet. Submit one to see analytics.\n");
        return out;
    }

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- Total ideas: {} ({} scored)\n", o.total_ideas, o.scored_ideas));
    out.push_str(&format!("- Average score: {}\n", fmt_num(o.average_score)));
    out.push_str(&format!("- Best score: {}\n", fmt_num(o.best_score)));
    out.push_str(&format!("- High potential (80+): {}\n", o.high_potential));
    out.push_str(&format!("- Success rate (70+): {}%\n", fmt_num(o.success_rate)));
    out.push_str(&format!("- Ideas with pitch: {}\n", o.ideas_with_pitch));
    out.push_str(&format!(
        "- Avg developments / deployment steps per idea: {} / {}\n",
        fmt_num(o.avg_developments_per_idea),
        fmt_num(o.avg_deployment_steps_per_idea)
    ));

    out.push_str("\n## Scores\n\n");
    for point in &dash.score_series {
        out.push_str(&format!(
            "- {} ({}): {} | {}\n",
            point.label,
            point.date,
            fmt_num(point.value),
            point.excerpt
        ));
    }
    out.push('\n');
    for bucket in &dash.score_distribution {
        out.push_str(&format!("- {}: {}\n", bucket.label, bucket.count));
    }

    out.push_str("\n## Developments\n\n");
    for c in &dash.development_categories {
        out.push_str(&format!("- {:?}: {}\n", c.category, c.count));
    }

    out.push_str("\n## Deployment\n\n");
    for c in &dash.deployment_categories {
        out.push_str(&format!("- {:?}: {}\n", c.category, c.count));
    }
    for c in &dash.deployment_complexity {
        out.push_str(&format!("- {:?} complexity: {}\n", c.category, c.count));
    }

    if !dash.roadmap_matrix.is_empty() {
        out.push_str("\n## Roadmap Priorities\n\n");
        out.push_str("| Quarter | High | Medium | Low |\n|---|---|---|---|\n");
        for row in &dash.roadmap_matrix {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.quarter, row.high, row.medium, row.low
            ));
        }
    }

    let pitch = &dash.pitch;
    if pitch.total_pitches > 0 {
        out.push_str("\n## Pitches\n\n");
        out.push_str(&format!(
            "- Pitches: {} (avg {} words, {} chars)\n",
            pitch.total_pitches,
            fmt_num(pitch.avg_word_count),
            fmt_num(pitch.avg_char_length)
        ));
        out.push_str(&format!(
            "- Mean sentiment score: {}\n",
            fmt_num(pitch.mean_sentiment_score)
        ));
        for s in &pitch.sentiment_counts {
            out.push_str(&format!("- {:?}: {}\n", s.sentiment, s.count));
        }
        if !pitch.keywords.is_empty() {
            let words: Vec<String> = pitch
                .keywords
                .iter()
                .map(|k| format!("{} ({}, {}%)", k.word, k.count, fmt_num(k.percentage)))
                .collect();
            out.push_str(&format!("- Keywords: {}\n", words.join(", ")));
        }
        out.push_str("\n| Idea | Readiness | Stage | Funding |\n|---|---|---|---|\n");
        for f in &pitch.funding_readiness {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                f.idea_id,
                f.readiness,
                f.stage.label(),
                f.estimated_funding
            ));
        }
    }

    if !dash.financial.is_empty() {
        let p = &dash.portfolio;
        out.push_str("\n## Financial Projections\n\n");
        out.push_str(&format!(
            "- Total investment required: ${}\n- Average ROI: {}%\n- Average break-even: {} months\n- Total market cap: ${}\n\n",
            p.total_investment, p.average_roi, p.average_break_even_months, p.total_market_cap
        ));
        out.push_str("| Idea | Score | Year 5 revenue | Investment | ROI |\n|---|---|---|---|---|\n");
        for f in &dash.financial {
            out.push_str(&format!(
                "| {} | {} | ${} | ${} | {}% |\n",
                table_cell(&f.idea_title),
                fmt_num(f.score),
                f.revenue[4],
                f.investment_required,
                f.roi_percent
            ));
        }
    }

    out.push_str("\n## Market\n\n");
    out.push_str("| Idea | Size | Audience | Timing | Growth | Risks |\n|---|---|---|---|---|---|\n");
    for m in &dash.market {
        out.push_str(&format!(
            "| `{}` | {} | {} | {} ({}) | {} | {} |\n",
            m.idea_id,
            m.market_size,
            m.target_audience,
            m.market_timing.label,
            m.market_timing.score,
            m.growth_potential,
            m.risk_factors.join(", ")
        ));
    }

    let cs = &dash.competitive_summary;
    out.push_str("\n## Competition\n\n");
    out.push_str(&format!(
        "- Average uniqueness: {}%\n- High barrier to entry: {}\n- Strong positions: {}\n- Low threat: {}\n",
        cs.average_uniqueness, cs.high_barrier, cs.strong_position, cs.low_threat
    ));
    for p in &cs.position_distribution {
        out.push_str(&format!("- {}: {}\n", p.position.label(), p.count));
    }
    out
}

fn push_numbered(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str("None provided.\n\n");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item));
    }
    out.push('\n');
}

/// Integers without a trailing `.0`.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

fn table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
