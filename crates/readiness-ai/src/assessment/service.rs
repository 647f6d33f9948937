use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::analytics::{
    AnalyticsAggregator, IndividualAnalytics, IndustryAnalytics, OrganizationAnalytics,
    PeerComparison,
};
use super::catalog::QuestionCatalog;
use super::config::EngineConfig;
use super::domain::{
    Answer, Assessment, AssessmentId, AssessmentStatus, DimensionScores, NewAssessment,
    OrganizationId, Question, ScoredAssessment, UserId,
};
use super::ingest::{ingest_answer, AnswerSubmission, IngestError};
use super::recommendations::{RecommendationGenerator, RecommendationPlan, RecommendationQuery};
use super::repository::{AnalyticsScope, AssessmentRepository, RepositoryError};
use super::scoring::{overall_score, weigh, ScoreReport, ScoringEngine};
use super::session::{ensure_in_progress, AssessmentSession, SessionError, SessionProgress};

/// Service composing the catalog, repository and the engine components.
pub struct AssessmentService<R, C> {
    repository: Arc<R>,
    catalog: Arc<C>,
    config: Arc<EngineConfig>,
    scoring: ScoringEngine,
    analytics: AnalyticsAggregator,
    recommendations: RecommendationGenerator,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

/// Response for a next-question request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextQuestion {
    pub assessment_id: AssessmentId,
    pub question: Option<Question>,
    pub complete: bool,
    pub progress: SessionProgress,
}

/// Response for an accepted answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub success: bool,
    pub assessment_id: AssessmentId,
    pub scores: DimensionScores,
    pub overall_score: u8,
    pub next_question: Option<Question>,
    pub complete: bool,
    pub progress: SessionProgress,
}

impl<R, C> AssessmentService<R, C>
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    pub fn new(repository: Arc<R>, catalog: Arc<C>, config: EngineConfig) -> Self {
        let scoring = ScoringEngine::from_config(&config);
        let analytics = AnalyticsAggregator::new(&config);
        let recommendations = RecommendationGenerator::new(&config);

        Self {
            repository,
            catalog,
            config: Arc::new(config),
            scoring,
            analytics,
            recommendations,
        }
    }

    /// Create an in-progress assessment with all scores at zero.
    pub fn start_assessment(
        &self,
        request: NewAssessment,
    ) -> Result<Assessment, AssessmentServiceError> {
        if request.user_id.0.trim().is_empty() {
            return Err(AssessmentServiceError::Validation(
                "user_id must not be empty".to_string(),
            ));
        }

        let assessment = Assessment {
            id: next_assessment_id(),
            user_id: request.user_id,
            organization_id: request.organization_id,
            industry: request
                .industry
                .map(|industry| industry.trim().to_string())
                .filter(|industry| !industry.is_empty()),
            assessment_type: request.assessment_type,
            status: AssessmentStatus::InProgress,
            scores: DimensionScores::default(),
            overall_score: 0,
            started_at: Utc::now(),
            completed_at: None,
        };

        let stored = self.repository.insert(assessment)?;
        info!(
            assessment_id = %stored.id,
            assessment_type = stored.assessment_type.label(),
            "assessment started"
        );
        Ok(stored)
    }

    /// Create the session cursor once; later calls return the existing cursor.
    pub fn initialize_session(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentSession, AssessmentServiceError> {
        let assessment = self.fetch(assessment_id)?;
        self.session_for(&assessment)
    }

    pub fn next_question(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<NextQuestion, AssessmentServiceError> {
        let assessment = self.fetch(assessment_id)?;
        let mut session = self.session_for(&assessment)?;
        let questions = self.questions_for(&assessment)?;
        let answers = self.repository.load_answers(assessment_id)?;
        // stored counters may lag the answer rows; selection follows the answers
        session.record(&questions, &answers);

        let question = if assessment.status.is_terminal() {
            None
        } else {
            session.next_question(&questions, &answers).cloned()
        };
        debug!(
            assessment_id = %assessment_id,
            question = question.as_ref().map(|q| q.code.as_str()).unwrap_or("none"),
            "selected next question"
        );

        Ok(NextQuestion {
            assessment_id: assessment_id.clone(),
            complete: question.is_none(),
            question,
            progress: session.progress(),
        })
    }

    /// Upsert an answer, recompute every dimension score from the full answer set and return
    /// the next question.
    pub fn submit_answer(
        &self,
        assessment_id: &AssessmentId,
        submission: AnswerSubmission,
    ) -> Result<SubmitOutcome, AssessmentServiceError> {
        let assessment = self.fetch(assessment_id)?;
        if let Err(err) = ensure_in_progress(&assessment) {
            warn!(assessment_id = %assessment_id, "rejected answer: {err}");
            return Err(err.into());
        }

        let mut session = self.session_for(&assessment)?;
        if let Err(err) = session.ensure_answerable(&submission.question_code) {
            warn!(assessment_id = %assessment_id, "rejected answer: {err}");
            return Err(err.into());
        }

        let questions = self.questions_for(&assessment)?;
        let question = questions
            .iter()
            .find(|question| question.code == submission.question_code)
            .ok_or_else(|| SessionError::UnknownQuestion {
                code: submission.question_code.clone(),
            })?;
        let value = ingest_answer(question, &submission.answer).map_err(|err| {
            warn!(assessment_id = %assessment_id, "rejected answer: {err}");
            err
        })?;

        self.repository.upsert_answer(
            assessment_id,
            Answer {
                question_code: submission.question_code.clone(),
                value,
                time_spent_seconds: submission.time_spent_seconds,
                answered_at: Utc::now(),
            },
        )?;
        debug!(
            assessment_id = %assessment_id,
            question = submission.question_code.as_str(),
            "answer upserted"
        );

        let answers = self.repository.load_answers(assessment_id)?;
        let scores = self.scoring.dimension_scores(&weigh(&questions, &answers));
        let overall = overall_score(&scores);
        self.repository
            .update_dimension_scores(assessment_id, scores, overall)?;

        session.record(&questions, &answers);
        let next_question = session.next_question(&questions, &answers).cloned();
        let progress = session.progress();
        self.repository.save_session(session)?;

        Ok(SubmitOutcome {
            success: true,
            assessment_id: assessment_id.clone(),
            scores,
            overall_score: overall,
            complete: next_question.is_none(),
            next_question,
            progress,
        })
    }

    /// Freeze the current scores and move the assessment to `completed`.
    pub fn complete(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Assessment, AssessmentServiceError> {
        let assessment = self.fetch(assessment_id)?;
        if let Err(err) = ensure_in_progress(&assessment) {
            warn!(assessment_id = %assessment_id, "rejected completion: {err}");
            return Err(err.into());
        }

        let questions = self.questions_for(&assessment)?;
        let answers = self.repository.load_answers(assessment_id)?;
        let scores = self.scoring.dimension_scores(&weigh(&questions, &answers));
        let overall = overall_score(&scores);
        self.repository
            .update_dimension_scores(assessment_id, scores, overall)?;

        let completed = self.repository.mark_completed(assessment_id, Utc::now())?;
        let level = self.scoring.classify(completed.overall_score);
        info!(
            assessment_id = %assessment_id,
            overall_score = completed.overall_score,
            maturity = %level.name,
            "assessment completed"
        );
        Ok(completed)
    }

    pub fn abandon(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Assessment, AssessmentServiceError> {
        let assessment = self.fetch(assessment_id)?;
        if let Err(err) = ensure_in_progress(&assessment) {
            warn!(assessment_id = %assessment_id, "rejected abandon: {err}");
            return Err(err.into());
        }

        let abandoned = self.repository.mark_abandoned(assessment_id)?;
        info!(assessment_id = %assessment_id, "assessment abandoned");
        Ok(abandoned)
    }

    /// Live score breakdown for in-progress assessments; completed ones report their frozen
    /// scores.
    pub fn scores(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<ScoreReport, AssessmentServiceError> {
        let assessment = self.fetch(assessment_id)?;
        let questions = self.questions_for(&assessment)?;
        let answers = self.repository.load_answers(assessment_id)?;
        let weighted = weigh(&questions, &answers);
        match assessment.status {
            AssessmentStatus::Completed => Ok(self
                .scoring
                .report_from_scores(assessment.scores, &weighted)),
            _ => Ok(self.scoring.report(&weighted)),
        }
    }

    pub fn recommendations(
        &self,
        assessment_id: &AssessmentId,
        query: &RecommendationQuery,
    ) -> Result<RecommendationPlan, AssessmentServiceError> {
        let scored = self.completed(assessment_id)?;
        let plan = self.recommendations.generate(&scored);
        if query.is_empty() {
            return Ok(plan);
        }
        debug!(assessment_id = %assessment_id, ?query, "filtering recommendations");
        Ok(query.apply(plan))
    }

    pub fn peer_comparison(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<PeerComparison, AssessmentServiceError> {
        let scored = self.completed(assessment_id)?;
        let industry = scored.industry.clone().ok_or_else(|| {
            AssessmentServiceError::Validation(format!(
                "assessment {assessment_id} has no industry to compare against"
            ))
        })?;

        let peers = self
            .repository
            .load_completed(&AnalyticsScope::Industry(industry))?;
        Ok(self.analytics.peer_comparison(&scored, &peers))
    }

    pub fn individual_analytics(
        &self,
        user_id: &UserId,
    ) -> Result<IndividualAnalytics, AssessmentServiceError> {
        let history = self
            .repository
            .load_completed(&AnalyticsScope::User(user_id.clone()))?;
        Ok(self.analytics.individual(user_id, &history))
    }

    pub fn organization_analytics(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<OrganizationAnalytics, AssessmentServiceError> {
        let history = self
            .repository
            .load_completed(&AnalyticsScope::Organization(organization_id.clone()))?;
        Ok(self.analytics.organization(organization_id, &history))
    }

    pub fn industry_analytics(
        &self,
        industry: &str,
    ) -> Result<IndustryAnalytics, AssessmentServiceError> {
        let industry = industry.trim();
        if industry.is_empty() {
            return Err(AssessmentServiceError::Validation(
                "industry must not be empty".to_string(),
            ));
        }
        let history = self
            .repository
            .load_completed(&AnalyticsScope::Industry(industry.to_string()))?;
        Ok(self.analytics.industry(industry, &history))
    }

    fn fetch(&self, assessment_id: &AssessmentId) -> Result<Assessment, AssessmentServiceError> {
        self.repository.fetch(assessment_id)?.ok_or_else(|| {
            AssessmentServiceError::NotFound(format!("assessment {assessment_id} not found"))
        })
    }

    fn completed(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<ScoredAssessment, AssessmentServiceError> {
        let assessment = self.fetch(assessment_id)?;
        assessment.scored().ok_or_else(|| {
            AssessmentServiceError::Conflict(format!(
                "assessment {assessment_id} is not completed (status: {})",
                assessment.status.label()
            ))
        })
    }

    fn questions_for(
        &self,
        assessment: &Assessment,
    ) -> Result<Vec<Question>, AssessmentServiceError> {
        Ok(self
            .catalog
            .load_question_catalog(assessment.assessment_type, assessment.industry.as_deref())?)
    }

    fn session_for(
        &self,
        assessment: &Assessment,
    ) -> Result<AssessmentSession, AssessmentServiceError> {
        if let Some(session) = self.repository.fetch_session(&assessment.id)? {
            return Ok(session);
        }

        let questions = self.questions_for(assessment)?;
        let rule = self.config.coverage.rule_for(assessment.assessment_type);
        let mut session = AssessmentSession::initialize(assessment.id.clone(), &questions, rule)
            .map_err(|err| {
                error!(assessment_id = %assessment.id, "cannot initialize session: {err}");
                err
            })?;
        let answers = self.repository.load_answers(&assessment.id)?;
        session.record(&questions, &answers);

        match self.repository.insert_session(session.clone()) {
            Ok(()) => {
                debug!(
                    assessment_id = %assessment.id,
                    total_questions = session.total_questions,
                    "session initialized"
                );
                Ok(session)
            }
            Err(RepositoryError::Conflict) => self
                .repository
                .fetch_session(&assessment.id)?
                .ok_or(AssessmentServiceError::Repository(RepositoryError::NotFound)),
            Err(other) => Err(other.into()),
        }
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal computation error: {0}")]
    Computation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<IngestError> for AssessmentServiceError {
    fn from(err: IngestError) -> Self {
        AssessmentServiceError::Validation(err.to_string())
    }
}

impl From<SessionError> for AssessmentServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotInProgress { .. } => {
                AssessmentServiceError::Conflict(err.to_string())
            }
            SessionError::UnknownQuestion { .. } => {
                AssessmentServiceError::Validation(err.to_string())
            }
            SessionError::EmptyDimension { .. } => {
                AssessmentServiceError::Computation(err.to_string())
            }
        }
    }
}
