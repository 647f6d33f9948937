use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use readiness_ai::assessment::{
    merge_answer, AnalyticsScope, Answer, Assessment, AssessmentId, AssessmentRepository,
    AssessmentSession, AssessmentStatus, AssessmentType, DimensionScores, Priority,
    RecommendationCategory, RepositoryError, ScoredAssessment,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    assessments: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
    answers: Arc<Mutex<HashMap<AssessmentId, Vec<Answer>>>>,
    sessions: Arc<Mutex<HashMap<AssessmentId, AssessmentSession>>>,
}

impl InMemoryAssessmentRepository {
    /// Seed completed assessments, typically from an imported history export.
    pub(crate) fn with_history(history: Vec<ScoredAssessment>) -> Self {
        let repository = Self::default();
        if let Ok(mut guard) = repository.assessments.lock() {
            for scored in history {
                guard.insert(scored.assessment_id.clone(), completed_record(scored));
            }
        }
        repository
    }

    fn update<F>(&self, id: &AssessmentId, change: F) -> Result<Assessment, RepositoryError>
    where
        F: FnOnce(&mut Assessment),
    {
        let mut guard = lock(&self.assessments)?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record);
        Ok(record.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

fn completed_record(scored: ScoredAssessment) -> Assessment {
    Assessment {
        id: scored.assessment_id,
        user_id: scored.user_id,
        organization_id: scored.organization_id,
        industry: scored.industry,
        assessment_type: scored.assessment_type,
        status: AssessmentStatus::Completed,
        scores: scored.scores,
        overall_score: scored.overall_score,
        started_at: scored.completed_at,
        completed_at: Some(scored.completed_at),
    }
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = lock(&self.assessments)?;
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(lock(&self.assessments)?.get(id).cloned())
    }

    fn load_answers(&self, id: &AssessmentId) -> Result<Vec<Answer>, RepositoryError> {
        Ok(lock(&self.answers)?.get(id).cloned().unwrap_or_default())
    }

    fn upsert_answer(&self, id: &AssessmentId, answer: Answer) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.answers)?;
        merge_answer(guard.entry(id.clone()).or_default(), answer);
        Ok(())
    }

    fn update_dimension_scores(
        &self,
        id: &AssessmentId,
        scores: DimensionScores,
        overall_score: u8,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.assessments)?;
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
        Ok(lock(&self.sessions)?.get(id).cloned())
    }

    fn insert_session(&self, session: AssessmentSession) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.sessions)?;
        if guard.contains_key(&session.assessment_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.assessment_id.clone(), session);
        Ok(())
    }

    fn save_session(&self, session: AssessmentSession) -> Result<(), RepositoryError> {
        lock(&self.sessions)?.insert(session.assessment_id.clone(), session);
        Ok(())
    }

    fn load_completed(
        &self,
        scope: &AnalyticsScope,
    ) -> Result<Vec<ScoredAssessment>, RepositoryError> {
        let guard = lock(&self.assessments)?;
        let mut completed: Vec<ScoredAssessment> = guard
            .values()
            .filter_map(Assessment::scored)
            .filter(|assessment| scope.matches(assessment))
            .collect();
        completed.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
        Ok(completed)
    }
}

pub(crate) fn parse_assessment_type(raw: &str) -> Result<AssessmentType, String> {
    AssessmentType::parse(raw).ok_or_else(|| {
        format!("unknown assessment type '{raw}' (expected full, quick or follow_up)")
    })
}

pub(crate) fn parse_priority(raw: &str) -> Result<Priority, String> {
    Priority::parse(raw).ok_or_else(|| {
        format!(
            "unknown priority '{raw}' (expected {}, {}, {} or {})",
            Priority::Critical.label(),
            Priority::High.label(),
            Priority::Medium.label(),
            Priority::Low.label()
        )
    })
}

pub(crate) fn parse_category(raw: &str) -> Result<RecommendationCategory, String> {
    RecommendationCategory::parse(raw)
        .ok_or_else(|| format!("unknown recommendation category '{raw}'"))
}
