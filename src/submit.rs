//! Submission flow: validate, analyze, export, persist.
//!
//! Only validation and analysis failures reach the caller. Export and persistence
//! failures are logged at `warn` and reported through [`SubmitOutcome`]: the user already
//! has a valid analysis by then.

use std::sync::Arc;

use crate::analysis::{request_analysis, AnalysisError, AnalysisResult};
use crate::export::{ExportRow, ExportSink};
use crate::gateway::ChatGateway;
use crate::session::CurrentUser;
use crate::store::{Contact, IdeaStore, NewIdeaRecord};

#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub idea_text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid submission: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl SubmitError {
    /// Message suitable for showing to the submitter.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::InvalidInput(msg) => msg.clone(),
            SubmitError::Analysis(AnalysisError::Malformed(_)) => {
                "The analysis came back in an unexpected format. Please try again.".to_string()
            }
            SubmitError::Analysis(err) => format!("An error occurred: {err}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub analysis: AnalysisResult,
    /// Id of the stored record; `None` for anonymous submissions or failed writes.
    pub record_id: Option<String>,
    pub exported: bool,
}

pub struct SubmissionFlow {
    gateway: Arc<dyn ChatGateway>,
    store: Arc<dyn IdeaStore>,
    export: Arc<dyn ExportSink>,
    model: String,
}

impl SubmissionFlow {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        store: Arc<dyn IdeaStore>,
        export: Arc<dyn ExportSink>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            store,
            export,
            model: model.into(),
        }
    }

    pub async fn submit(
        &self,
        submission: Submission,
        user: Option<&CurrentUser>,
    ) -> Result<SubmitOutcome, SubmitError> {
        let submission = validate(submission, user)?;
        let owner_id = user.map(|u| u.id.as_str());

        let analysis = request_analysis(
            self.gateway.as_ref(),
            &self.model,
            &submission.idea_text,
            owner_id,
        )
        .await?;

        let exported = match self.export.export(&export_row(&submission, &analysis)).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "side-channel export failed");
                false
            }
        };

        let record_id = match user {
            Some(user) => self.persist(user, &submission, &analysis).await,
            None => None,
        };

        tracing::info!(
            owner_id = owner_id.unwrap_or("anonymous"),
            record_id = record_id.as_deref().unwrap_or("-"),
            score = ?analysis.score_value(),
            exported,
            "submission analyzed"
        );

        Ok(SubmitOutcome {
            analysis,
            record_id,
            exported,
        })
    }

    async fn persist(
        &self,
        user: &CurrentUser,
        submission: &Submission,
        analysis: &AnalysisResult,
    ) -> Option<String> {
        let record = NewIdeaRecord {
            owner_id: user.id.clone(),
            owner_email: user
                .email
                .clone()
                .unwrap_or_else(|| submission.email.clone()),
            owner_name: user
                .display_name
                .clone()
                .unwrap_or_else(|| submission.name.clone()),
            idea_text: submission.idea_text.clone(),
            contact: Contact {
                name: submission.name.clone(),
                email: submission.email.clone(),
                phone: submission.phone.clone(),
            },
            analysis: Some(analysis.clone()),
        };

        match self.store.create(record).await {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(owner_id = %user.id, error = %err, "failed to persist idea record");
                None
            }
        }
    }
}

/// Trim fields, fill name/email from the signed-in user, and require name, email, idea.
pub fn validate(submission: Submission, user: Option<&CurrentUser>) -> Result<Submission, SubmitError> {
    let mut name = submission.name.trim().to_string();
    let mut email = submission.email.trim().to_string();
    if let Some(user) = user {
        if name.is_empty() {
            name = user.display_name.clone().unwrap_or_default();
        }
        if email.is_empty() {
            email = user.email.clone().unwrap_or_default();
        }
    }
    let idea_text = submission.idea_text.trim().to_string();

    if name.is_empty() || email.is_empty() || idea_text.is_empty() {
        return Err(SubmitError::InvalidInput(
            "Please fill in your name, email, and product idea.".into(),
        ));
    }

    Ok(Submission {
        name,
        email,
        phone: submission.phone.trim().to_string(),
        idea_text,
    })
}

fn export_row(submission: &Submission, analysis: &AnalysisResult) -> ExportRow {
    ExportRow {
        timestamp: chrono::Local::now()
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        name: submission.name.clone(),
        phone: submission.phone.clone(),
        email: submission.email.clone(),
        idea: submission.idea_text.clone(),
        score: analysis.score_value(),
        remarks: analysis
            .score
            .as_ref()
            .map(|s| s.reasoning.clone())
            .unwrap_or_default(),
    }
}
