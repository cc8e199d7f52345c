//! Prompt for the analysis request.
//!
//! The model is asked for a single JSON object with the keys the normalizer reads:
//! `score{value,reasoning}`, `key_developments`, `deployment_steps`,
//! `roadmap{q1..q4}`, `investor_pitch`.

use crate::gateway::Message;

pub const ANALYSIS_TEMPLATE_SLUG: &str = "idea_analysis_v1";

const SYSTEM_PROMPT: &str = "You are an experienced product strategist and startup investor. \
You evaluate product ideas candidly and answer with a single JSON object and nothing else.";

const OUTPUT_CONTRACT: &str = r#"Provide the output in the following JSON format:
{
  "score": {
    "value": <a number from 0 to 100>,
    "reasoning": "<a brief explanation for the score>"
  },
  "key_developments": [
    "<development step 1>",
    "<development step 2>",
    "<development step 3>"
  ],
  "deployment_steps": [
    "<deployment step 1>",
    "<deployment step 2>",
    "<deployment step 3>"
  ],
  "roadmap": {
    "q1": "<first quarter goals>",
    "q2": "<second quarter goals>",
    "q3": "<third quarter goals>",
    "q4": "<fourth quarter goals>"
  },
  "investor_pitch": "<a compelling investor pitch>"
}"#;

/// Rendered analysis prompt.
#[derive(Debug, Clone)]
pub struct AnalysisPrompt {
    pub template_slug: &'static str,
    pub system: String,
    pub user: String,
}

impl AnalysisPrompt {
    pub fn to_messages(&self) -> Vec<Message> {
        vec![Message::system(&self.system), Message::user(&self.user)]
    }
}

/// Escape XML special characters so idea text cannot close the wrapping tag.
fn escape_xml_chars(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn render_analysis_prompt(idea_text: &str) -> AnalysisPrompt {
    let user = format!(
        "Analyze the following product idea and provide a detailed evaluation.\n\n\
         <idea>\n{}\n</idea>\n\n\
         {OUTPUT_CONTRACT}\n\n\
         Use only the keys shown. The roadmap keys must be q1, q2, q3 and q4.",
        escape_xml_chars(idea_text.trim())
    );

    AnalysisPrompt {
        template_slug: ANALYSIS_TEMPLATE_SLUG,
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}
