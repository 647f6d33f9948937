use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for assessments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

/// Identifier wrapper for the person taking an assessment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Identifier wrapper for organizations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub String);

/// Stable catalog code such as `IND_001`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionCode(pub String);

impl QuestionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QuestionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five maturity axes, declared in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Individual,
    Leadership,
    Cultural,
    Embedding,
    Velocity,
}

impl Dimension {
    pub const COUNT: usize = 5;

    pub const fn ordered() -> [Self; 5] {
        [
            Self::Individual,
            Self::Leadership,
            Self::Cultural,
            Self::Embedding,
            Self::Velocity,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Leadership => "leadership",
            Self::Cultural => "cultural",
            Self::Embedding => "embedding",
            Self::Velocity => "velocity",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "Individual Adaptability",
            Self::Leadership => "Leadership Vision",
            Self::Cultural => "Cultural Readiness",
            Self::Embedding => "AI Embedding",
            Self::Velocity => "Adoption Velocity",
        }
    }

    /// Display grouping only; subdimensions are never scored on their own.
    pub const fn subdimensions(self) -> &'static [&'static str] {
        match self {
            Self::Individual => &[
                "learning_agility",
                "experimentation",
                "resilience",
                "skill_level",
                "change_readiness",
                "continuous_learning",
            ],
            Self::Leadership => &[
                "strategic_clarity",
                "executive_sponsorship",
                "role_modeling",
                "resource_allocation",
                "failure_tolerance",
            ],
            Self::Cultural => &[
                "ai_sentiment",
                "psychological_safety",
                "collaboration",
                "knowledge_sharing",
                "ethics",
            ],
            Self::Embedding => &[
                "process_integration",
                "governance",
                "technical_integration",
                "standardization",
                "measurement",
            ],
            Self::Velocity => &[
                "deployment_speed",
                "responsiveness",
                "user_adoption",
                "iteration_speed",
                "scaling",
            ],
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Individual => 0,
            Self::Leadership => 1,
            Self::Cultural => 2,
            Self::Embedding => 3,
            Self::Velocity => 4,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerType {
    Scale,
    MultiChoice,
    FearToConfidence,
    Text,
}

impl AnswerType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::MultiChoice => "multiChoice",
            Self::FearToConfidence => "fearToConfidence",
            Self::Text => "text",
        }
    }
}

/// Whether a raw answer already points "up" (more mature) or must be inverted at ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDirection {
    #[default]
    Direct,
    Inverse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: u8,
    pub label: String,
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub code: QuestionCode,
    pub text: String,
    pub dimension: Dimension,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdimension: Option<String>,
    pub answer_type: AnswerType,
    pub weight: f64,
    #[serde(default)]
    pub direction: ScoreDirection,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AnswerOption>,
    pub display_order: u16,
}

/// Typed answer payload; each variant carries only the fields valid for its answer type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerValue {
    Scale { value: u8 },
    MultiChoice { value: u8 },
    FearToConfidence { value: u8 },
    Text { text: String },
    Skipped,
}

impl AnswerValue {
    /// Numeric contribution to weighted scoring, if any.
    pub fn score_value(&self) -> Option<u8> {
        match self {
            AnswerValue::Scale { value }
            | AnswerValue::MultiChoice { value }
            | AnswerValue::FearToConfidence { value } => Some(*value),
            AnswerValue::Text { .. } | AnswerValue::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, AnswerValue::Skipped)
    }
}

/// One stored response; unique per (assessment, question).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_code: QuestionCode,
    pub value: AnswerValue,
    pub time_spent_seconds: u32,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    #[default]
    Full,
    Quick,
    FollowUp,
}

impl AssessmentType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Quick => "quick",
            Self::FollowUp => "follow_up",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "quick" => Some(Self::Quick),
            "follow_up" | "follow-up" | "followup" => Some(Self::FollowUp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }
}

/// Integer scores (0-100) for the five dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub individual: u8,
    pub leadership: u8,
    pub cultural: u8,
    pub embedding: u8,
    pub velocity: u8,
}

impl DimensionScores {
    pub fn uniform(score: u8) -> Self {
        Self {
            individual: score,
            leadership: score,
            cultural: score,
            embedding: score,
            velocity: score,
        }
    }

    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Individual => self.individual,
            Dimension::Leadership => self.leadership,
            Dimension::Cultural => self.cultural,
            Dimension::Embedding => self.embedding,
            Dimension::Velocity => self.velocity,
        }
    }

    pub fn set(&mut self, dimension: Dimension, score: u8) {
        let slot = match dimension {
            Dimension::Individual => &mut self.individual,
            Dimension::Leadership => &mut self.leadership,
            Dimension::Cultural => &mut self.cultural,
            Dimension::Embedding => &mut self.embedding,
            Dimension::Velocity => &mut self.velocity,
        };
        *slot = score;
    }

    /// Scores in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u8)> + '_ {
        Dimension::ordered()
            .into_iter()
            .map(move |dimension| (dimension, self.get(dimension)))
    }
}

/// Aggregate root for one assessment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub assessment_type: AssessmentType,
    pub status: AssessmentStatus,
    pub scores: DimensionScores,
    pub overall_score: u8,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Assessment {
    /// Frozen view consumed by analytics and recommendations; `None` until completed.
    pub fn scored(&self) -> Option<ScoredAssessment> {
        if self.status != AssessmentStatus::Completed {
            return None;
        }

        Some(ScoredAssessment {
            assessment_id: self.id.clone(),
            user_id: self.user_id.clone(),
            organization_id: self.organization_id.clone(),
            industry: self.industry.clone(),
            assessment_type: self.assessment_type,
            scores: self.scores,
            overall_score: self.overall_score,
            completed_at: self.completed_at.unwrap_or(self.started_at),
        })
    }
}

/// A completed assessment's frozen scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredAssessment {
    pub assessment_id: AssessmentId,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub assessment_type: AssessmentType,
    pub scores: DimensionScores,
    pub overall_score: u8,
    pub completed_at: DateTime<Utc>,
}

/// Request to begin a new assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssessment {
    pub user_id: UserId,
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub assessment_type: AssessmentType,
}
