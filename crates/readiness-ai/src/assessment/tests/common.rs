use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::assessment::catalog::QuestionBank;
use crate::assessment::config::EngineConfig;
use crate::assessment::domain::{
    Answer, Assessment, AssessmentId, AssessmentStatus, AssessmentType, DimensionScores,
    NewAssessment, OrganizationId, Question, QuestionCode, ScoredAssessment, UserId,
};
use crate::assessment::ingest::{AnswerSubmission, RawAnswer};
use crate::assessment::repository::{
    merge_answer, AnalyticsScope, AssessmentRepository, RepositoryError,
};
use crate::assessment::scoring::overall_score;
use crate::assessment::service::AssessmentService;
use crate::assessment::session::AssessmentSession;
use crate::assessment::{assessment_router, AnswerType};

pub(super) type MemoryService = AssessmentService<MemoryRepository, QuestionBank>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(
        repository.clone(),
        Arc::new(QuestionBank::standard()),
        EngineConfig::standard(),
    );
    (service, repository)
}

pub(super) fn new_assessment(
    user: &str,
    organization: Option<&str>,
    industry: Option<&str>,
    assessment_type: AssessmentType,
) -> NewAssessment {
    NewAssessment {
        user_id: UserId(user.to_string()),
        organization_id: organization.map(|id| OrganizationId(id.to_string())),
        industry: industry.map(str::to_string),
        assessment_type,
    }
}

pub(super) fn submission(code: &str, value: f64) -> AnswerSubmission {
    AnswerSubmission {
        question_code: QuestionCode::new(code),
        answer: RawAnswer::value(value),
        time_spent_seconds: 15,
    }
}

pub(super) fn raw_for(question: &Question, value: f64) -> RawAnswer {
    match question.answer_type {
        AnswerType::Text => RawAnswer::text("free-form response"),
        _ => RawAnswer::value(value),
    }
}

/// Walk the session until it signals completion, answering every question with `value`.
pub(super) fn answer_everything(
    service: &MemoryService,
    id: &AssessmentId,
    value: f64,
) -> usize {
    let mut answered = 0;
    loop {
        let next = service.next_question(id).expect("next question resolves");
        let Some(question) = next.question else {
            return answered;
        };
        service
            .submit_answer(
                id,
                AnswerSubmission {
                    question_code: question.code.clone(),
                    answer: raw_for(&question, value),
                    time_spent_seconds: 10,
                },
            )
            .expect("answer accepted");
        answered += 1;
    }
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn scored(
    id: &str,
    user: &str,
    organization: Option<&str>,
    industry: Option<&str>,
    scores: DimensionScores,
    completed_at: DateTime<Utc>,
) -> ScoredAssessment {
    ScoredAssessment {
        assessment_id: AssessmentId(id.to_string()),
        user_id: UserId(user.to_string()),
        organization_id: organization.map(|id| OrganizationId(id.to_string())),
        industry: industry.map(str::to_string),
        assessment_type: AssessmentType::Full,
        overall_score: overall_score(&scores),
        scores,
        completed_at,
    }
}

pub(super) fn scores(values: [u8; 5]) -> DimensionScores {
    DimensionScores {
        individual: values[0],
        leadership: values[1],
        cultural: values[2],
        embedding: values[3],
        velocity: values[4],
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) assessments: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
    pub(super) answers: Arc<Mutex<HashMap<AssessmentId, Vec<Answer>>>>,
    pub(super) sessions: Arc<Mutex<HashMap<AssessmentId, AssessmentSession>>>,
}

impl MemoryRepository {
    /// Store a historical completed assessment directly.
    pub(super) fn seed_completed(&self, assessment: ScoredAssessment) {
        let record = Assessment {
            id: assessment.assessment_id.clone(),
            user_id: assessment.user_id,
            organization_id: assessment.organization_id,
            industry: assessment.industry,
            assessment_type: assessment.assessment_type,
            status: AssessmentStatus::Completed,
            scores: assessment.scores,
            overall_score: assessment.overall_score,
            started_at: assessment.completed_at,
            completed_at: Some(assessment.completed_at),
        };
        self.assessments
            .lock()
            .expect("repository mutex poisoned")
            .insert(assessment.assessment_id, record);
    }

    pub(super) fn answers_for(&self, id: &AssessmentId) -> Vec<Answer> {
        self.answers
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    fn update<F>(&self, id: &AssessmentId, change: F) -> Result<Assessment, RepositoryError>
    where
        F: FnOnce(&mut Assessment),
    {
        let mut guard = self.assessments.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record);
        Ok(record.clone())
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.assessments.lock().expect("repository mutex poisoned");
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn load_answers(&self, id: &AssessmentId) -> Result<Vec<Answer>, RepositoryError> {
        Ok(self.answers_for(id))
    }

    fn upsert_answer(&self, id: &AssessmentId, answer: Answer) -> Result<(), RepositoryError> {
        let mut guard = self.answers.lock().expect("repository mutex poisoned");
        merge_answer(guard.entry(id.clone()).or_default(), answer);
        Ok(())
    }

    fn update_dimension_scores(
        &self,
        id: &AssessmentId,
        scores: DimensionScores,
        overall_score: u8,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.assessments.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record.status != AssessmentStatus::InProgress {
            return Err(RepositoryError::Conflict);
        }
        record.scores = scores;
        record.overall_score = overall_score;
        Ok(())
    }

    fn mark_completed(
        &self,
        id: &AssessmentId,
        completed_at: DateTime<Utc>,
    ) -> Result<Assessment, RepositoryError> {
        self.update(id, |record| {
            record.status = AssessmentStatus::Completed;
            record.completed_at = Some(completed_at);
        })
    }

    fn mark_abandoned(&self, id: &AssessmentId) -> Result<Assessment, RepositoryError> {
        self.update(id, |record| record.status = AssessmentStatus::Abandoned)
    }

    fn fetch_session(
        &self,
        id: &AssessmentId,
    ) -> Result<Option<AssessmentSession>, RepositoryError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_session(&self, session: AssessmentSession) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.assessment_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.assessment_id.clone(), session);
        Ok(())
    }

    fn save_session(&self, session: AssessmentSession) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(session.assessment_id.clone(), session);
        Ok(())
    }

    fn load_completed(
        &self,
        scope: &AnalyticsScope,
    ) -> Result<Vec<ScoredAssessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("repository mutex poisoned");
        let mut completed: Vec<ScoredAssessment> = guard
            .values()
            .filter_map(Assessment::scored)
            .filter(|assessment| scope.matches(assessment))
            .collect();
        completed.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
        Ok(completed)
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn load_answers(&self, _id: &AssessmentId) -> Result<Vec<Answer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_answer(&self, _id: &AssessmentId, _answer: Answer) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_dimension_scores(
        &self,
        _id: &AssessmentId,
        _scores: DimensionScores,
        _overall_score: u8,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn mark_completed(
        &self,
        _id: &AssessmentId,
        _completed_at: DateTime<Utc>,
    ) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn mark_abandoned(&self, _id: &AssessmentId) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_session(
        &self,
        _id: &AssessmentId,
    ) -> Result<Option<AssessmentSession>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_session(&self, _session: AssessmentSession) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_session(&self, _session: AssessmentSession) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn load_completed(
        &self,
        _scope: &AnalyticsScope,
    ) -> Result<Vec<ScoredAssessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assessment_router_with_service(service: MemoryService) -> axum::Router {
    assessment_router(Arc::new(service))
}
