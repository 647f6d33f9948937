use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{AssessmentType, Dimension};
use super::recommendations::content::{standard_playbooks, DimensionPlaybook};
use super::scoring::MaturityScale;

/// Versioned static tables injected into every engine component at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub version: String,
    pub maturity_scale: MaturityScale,
    pub thresholds: ScoreThresholds,
    pub top_performers: usize,
    pub coverage: CoverageTargets,
    pub playbooks: Vec<DimensionPlaybook>,
}

/// Score cut-offs shared by analytics and recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    /// Dimensions at or above this are strengths and never get a recommendation.
    pub strength: u8,
    /// Dimensions below this are weaknesses and get a high-priority recommendation.
    pub weakness: u8,
    /// Organization-mean cut-off for areas needing attention.
    pub attention: u8,
    /// Dimensions below this are escalated to critical priority.
    pub critical: u8,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            strength: 70,
            weakness: 40,
            attention: 40,
            critical: 20,
        }
    }
}

/// How many questions per dimension must be answered before a session is covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CoverageRule {
    AllQuestions,
    PerDimension { max: usize },
}

impl CoverageRule {
    /// Target for a dimension that has `available` questions in the active flow.
    pub fn target(self, available: usize) -> usize {
        match self {
            CoverageRule::AllQuestions => available,
            CoverageRule::PerDimension { max } => available.min(max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTargets {
    pub full: CoverageRule,
    pub quick: CoverageRule,
    pub follow_up: CoverageRule,
}

impl CoverageTargets {
    pub fn rule_for(&self, assessment_type: AssessmentType) -> CoverageRule {
        match assessment_type {
            AssessmentType::Full => self.full,
            AssessmentType::Quick => self.quick,
            AssessmentType::FollowUp => self.follow_up,
        }
    }
}

impl Default for CoverageTargets {
    fn default() -> Self {
        Self {
            full: CoverageRule::AllQuestions,
            quick: CoverageRule::AllQuestions,
            follow_up: CoverageRule::PerDimension { max: 3 },
        }
    }
}

impl EngineConfig {
    /// Built-in tables used when no configuration file is supplied.
    pub fn standard() -> Self {
        Self {
            version: "2024.1".to_string(),
            maturity_scale: MaturityScale::standard(),
            thresholds: ScoreThresholds::default(),
            top_performers: 5,
            coverage: CoverageTargets::default(),
            playbooks: standard_playbooks(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineConfigError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, EngineConfigError> {
        let config: EngineConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineConfigError> {
        self.maturity_scale
            .check_contiguous()
            .map_err(EngineConfigError::Invalid)?;

        if self.playbooks.len() != Dimension::COUNT {
            return Err(EngineConfigError::Invalid(format!(
                "expected {} playbooks, found {}",
                Dimension::COUNT,
                self.playbooks.len()
            )));
        }
        for dimension in Dimension::ordered() {
            if !self
                .playbooks
                .iter()
                .any(|playbook| playbook.dimension == dimension)
            {
                return Err(EngineConfigError::Invalid(format!(
                    "missing playbook for {dimension}"
                )));
            }
        }

        if self.top_performers == 0 {
            return Err(EngineConfigError::Invalid(
                "top_performers must be at least 1".to_string(),
            ));
        }

        let thresholds = self.thresholds;
        if thresholds.critical > thresholds.weakness || thresholds.weakness > thresholds.strength
        {
            return Err(EngineConfigError::Invalid(
                "thresholds must satisfy critical <= weakness <= strength".to_string(),
            ));
        }

        Ok(())
    }

    pub fn playbook(&self, dimension: Dimension) -> Option<&DimensionPlaybook> {
        self.playbooks
            .iter()
            .find(|playbook| playbook.dimension == dimension)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("failed to read engine config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse engine config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid engine config: {0}")]
    Invalid(String),
}
