use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Answer, Assessment, AssessmentId, DimensionScores, OrganizationId, ScoredAssessment, UserId,
};
use super::session::AssessmentSession;

/// Persistence boundary for assessments, their answers and progress cursors.
///
/// Implementations must keep at most one answer per (assessment, question) pair and resolve
/// concurrent writes for the same pair as last-write-wins by `answered_at`.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError>;

    fn load_answers(&self, id: &AssessmentId) -> Result<Vec<Answer>, RepositoryError>;
    fn upsert_answer(&self, id: &AssessmentId, answer: Answer) -> Result<(), RepositoryError>;

    /// Fails with `Conflict` once the assessment has left `in_progress`, so frozen scores stay
    /// frozen.
    fn update_dimension_scores(
        &self,
        id: &AssessmentId,
        scores: DimensionScores,
        overall_score: u8,
    ) -> Result<(), RepositoryError>;
    fn mark_completed(
        &self,
        id: &AssessmentId,
        completed_at: DateTime<Utc>,
    ) -> Result<Assessment, RepositoryError>;
    fn mark_abandoned(&self, id: &AssessmentId) -> Result<Assessment, RepositoryError>;

    fn fetch_session(&self, id: &AssessmentId)
        -> Result<Option<AssessmentSession>, RepositoryError>;
    /// Fails with `Conflict` when a session already exists for the assessment.
    fn insert_session(&self, session: AssessmentSession) -> Result<(), RepositoryError>;
    fn save_session(&self, session: AssessmentSession) -> Result<(), RepositoryError>;

    /// Completed assessments in scope, oldest first.
    fn load_completed(
        &self,
        scope: &AnalyticsScope,
    ) -> Result<Vec<ScoredAssessment>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Selector for historical assessments feeding analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum AnalyticsScope {
    User(UserId),
    Organization(OrganizationId),
    Industry(String),
}

impl AnalyticsScope {
    pub fn matches(&self, assessment: &ScoredAssessment) -> bool {
        match self {
            AnalyticsScope::User(user_id) => &assessment.user_id == user_id,
            AnalyticsScope::Organization(organization_id) => {
                assessment.organization_id.as_ref() == Some(organization_id)
            }
            AnalyticsScope::Industry(industry) => assessment
                .industry
                .as_deref()
                .map(|candidate| candidate.trim().eq_ignore_ascii_case(industry.trim()))
                .unwrap_or(false),
        }
    }
}

/// Last-write-wins upsert keyed on question code. Equal timestamps let the newer call win.
pub fn merge_answer(answers: &mut Vec<Answer>, answer: Answer) {
    match answers
        .iter_mut()
        .find(|existing| existing.question_code == answer.question_code)
    {
        Some(existing) if existing.answered_at <= answer.answered_at => *existing = answer,
        Some(_) => {}
        None => answers.push(answer),
    }
}
