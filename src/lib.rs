#![forbid(unsafe_code)]

//! # ideaforge
//!
//! Product-idea evaluation. An idea is sent to an LLM with a fixed JSON contract
//! (score, key developments, deployment steps, quarterly roadmap, investor pitch); the
//! reply is validated by a strict normalizer, stored per owner, and folded into
//! chart-ready analytics across the owner's history.
//!
//! The analytics engine is pure: it takes a snapshot of records and returns aggregates.
//! Randomized "flavor" views take an injected, seedable random source.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod export;
pub mod gateway;
pub mod history;
pub mod report;
pub mod session;
pub mod store;
pub mod submit;

pub use analysis::{
    normalize_analysis, request_analysis, AnalysisError, AnalysisResult, MalformedAnalysisError,
    Quarter, Roadmap, Score, ScoreGrade,
};
pub use config::{AppConfig, ConfigError};
pub use engine::{build_dashboard, Dashboard, EngineOptions, FlavorMode};
pub use export::{ExportError, ExportRow, ExportSink, HttpExportSink, NoopExportSink};
pub use gateway::{Attribution, ChatGateway, ProviderGateway, UsageSink};
pub use history::{load_history, summarize, HistorySummary};
pub use session::CurrentUser;
pub use store::{Contact, IdeaRecord, IdeaStore, NewIdeaRecord, SqliteIdeaStore, StoreError};
pub use submit::{Submission, SubmissionFlow, SubmitError, SubmitOutcome};
