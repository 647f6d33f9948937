//! Adaptive assessment sessions, weighted scoring, analytics, and recommendations.
//!
//! Engine components are synchronous and receive their static tables through [`EngineConfig`]
//! at construction. Persistence sits behind [`AssessmentRepository`] and the question bank
//! behind [`QuestionCatalog`], so the service composes them without owning any storage.

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod history;
pub mod ingest;
pub mod recommendations;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use analytics::{
    AnalyticsAggregator, IndividualAnalytics, IndustryAnalytics, OrganizationAnalytics,
    PeerComparison, PeerRank,
};
pub use catalog::{AssessmentFlow, QuestionBank, QuestionCatalog};
pub use config::{CoverageRule, CoverageTargets, EngineConfig, EngineConfigError, ScoreThresholds};
pub use domain::{
    Answer, AnswerType, AnswerValue, Assessment, AssessmentId, AssessmentStatus, AssessmentType,
    Dimension, DimensionScores, NewAssessment, OrganizationId, Question, QuestionCode,
    ScoreDirection, ScoredAssessment, UserId,
};
pub use history::{HistoryImportError, HistoryImporter};
pub use ingest::{ingest_answer, AnswerSubmission, IngestError, RawAnswer};
pub use recommendations::{
    Priority, Recommendation, RecommendationCategory, RecommendationGenerator,
    RecommendationPlan, RecommendationQuery,
};
pub use repository::{merge_answer, AnalyticsScope, AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use scoring::{
    dimension_score, overall_score, weigh, GapAnalysis, MaturityLevel, MaturityScale,
    ScoreReport, ScoringEngine,
};
pub use service::{AssessmentService, AssessmentServiceError, NextQuestion, SubmitOutcome};
pub use session::{AssessmentSession, SessionError, SessionProgress};
