use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::config::CoverageRule;
use super::domain::{
    Answer, Assessment, AssessmentId, AssessmentStatus, Dimension, Question, QuestionCode,
};

/// Per-assessment progress cursor. Counters are always derived from the full answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub assessment_id: AssessmentId,
    /// Active question set in catalog order.
    pub question_codes: Vec<QuestionCode>,
    pub dimensions: Vec<DimensionProgress>,
    pub questions_answered: usize,
    pub total_questions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionProgress {
    pub dimension: Dimension,
    pub answered: usize,
    pub target: usize,
    pub available: usize,
}

impl DimensionProgress {
    pub fn is_covered(&self) -> bool {
        self.answered >= self.target
    }

    /// `answered / target` compared exactly via cross-multiplication.
    fn ratio_below(&self, other: &DimensionProgress) -> bool {
        self.answered * other.target < other.answered * self.target
    }
}

/// Snapshot returned alongside every next-question response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub answered: usize,
    pub total: usize,
    pub percentage: u8,
    pub dimensions: Vec<DimensionProgress>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("assessment {id} is not in_progress (status: {status})")]
    NotInProgress {
        id: AssessmentId,
        status: &'static str,
    },
    #[error("question {code} is not part of this assessment")]
    UnknownQuestion { code: QuestionCode },
    #[error("dimension {dimension} has no questions in the active catalog")]
    EmptyDimension { dimension: Dimension },
}

impl AssessmentSession {
    /// Build the cursor for an active question set. Every dimension must be represented.
    pub fn initialize(
        assessment_id: AssessmentId,
        questions: &[Question],
        rule: CoverageRule,
    ) -> Result<Self, SessionError> {
        let mut dimensions = Vec::with_capacity(Dimension::COUNT);
        for dimension in Dimension::ordered() {
            let available = questions
                .iter()
                .filter(|question| question.dimension == dimension)
                .count();
            let target = rule.target(available);
            if target == 0 {
                return Err(SessionError::EmptyDimension { dimension });
            }
            dimensions.push(DimensionProgress {
                dimension,
                answered: 0,
                target,
                available,
            });
        }

        let total_questions = dimensions.iter().map(|progress| progress.target).sum();

        Ok(Self {
            assessment_id,
            question_codes: questions
                .iter()
                .map(|question| question.code.clone())
                .collect(),
            dimensions,
            questions_answered: 0,
            total_questions,
        })
    }

    pub fn contains(&self, code: &QuestionCode) -> bool {
        self.question_codes.contains(code)
    }

    pub fn ensure_answerable(&self, code: &QuestionCode) -> Result<(), SessionError> {
        if self.contains(code) {
            Ok(())
        } else {
            Err(SessionError::UnknownQuestion { code: code.clone() })
        }
    }

    /// Recompute counters from the full current answer set. Skipped answers count toward
    /// coverage.
    pub fn record(&mut self, questions: &[Question], answers: &[Answer]) {
        let answered: HashSet<&QuestionCode> = answers
            .iter()
            .map(|answer| &answer.question_code)
            .filter(|code| self.question_codes.contains(code))
            .collect();

        for progress in &mut self.dimensions {
            progress.answered = questions
                .iter()
                .filter(|question| {
                    question.dimension == progress.dimension && answered.contains(&question.code)
                })
                .count();
        }
        self.questions_answered = answered.len();
    }

    pub fn is_complete(&self) -> bool {
        self.dimensions.iter().all(DimensionProgress::is_covered)
    }

    /// Next unanswered question from the least-covered dimension; catalog order breaks ties.
    /// `None` once every dimension meets its target or nothing is left to ask.
    pub fn next_question<'q>(
        &self,
        questions: &'q [Question],
        answers: &[Answer],
    ) -> Option<&'q Question> {
        if self.is_complete() {
            return None;
        }

        let answered: HashSet<&QuestionCode> =
            answers.iter().map(|answer| &answer.question_code).collect();

        let mut best: Option<(&'q Question, &DimensionProgress)> = None;
        for question in questions {
            if !self.contains(&question.code) || answered.contains(&question.code) {
                continue;
            }
            let Some(progress) = self.progress_for(question.dimension) else {
                continue;
            };
            if progress.is_covered() {
                continue;
            }
            let better = match best {
                Some((_, current)) => progress.ratio_below(current),
                None => true,
            };
            if better {
                best = Some((question, progress));
            }
        }

        best.map(|(question, _)| question)
    }

    pub fn progress(&self) -> SessionProgress {
        let percentage = if self.total_questions == 0 {
            100
        } else {
            let covered: usize = self
                .dimensions
                .iter()
                .map(|progress| progress.answered.min(progress.target))
                .sum();
            ((covered * 100) / self.total_questions).min(100) as u8
        };

        SessionProgress {
            answered: self.questions_answered,
            total: self.total_questions,
            percentage,
            dimensions: self.dimensions.clone(),
        }
    }

    fn progress_for(&self, dimension: Dimension) -> Option<&DimensionProgress> {
        self.dimensions
            .iter()
            .find(|progress| progress.dimension == dimension)
    }
}

/// Mutations are only accepted while the assessment is in progress.
pub fn ensure_in_progress(assessment: &Assessment) -> Result<(), SessionError> {
    if assessment.status == AssessmentStatus::InProgress {
        Ok(())
    } else {
        Err(SessionError::NotInProgress {
            id: assessment.id.clone(),
            status: assessment.status.label(),
        })
    }
}
