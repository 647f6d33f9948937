use serde::Serialize;

use super::content::{DimensionPlaybook, Effort, Priority, RecommendationCategory};
use crate::assessment::config::{EngineConfig, ScoreThresholds};
use crate::assessment::domain::{AssessmentId, Dimension, ScoredAssessment};
use crate::assessment::scoring::{MaturityLevel, MaturityScale};

/// One generated action item; regenerated on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub dimension: Dimension,
    pub priority: Priority,
    pub category: RecommendationCategory,
    pub effort: Effort,
    pub score: u8,
    pub title: String,
    pub action: String,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationPlan {
    pub assessment_id: AssessmentId,
    pub overall_score: u8,
    pub maturity_level: MaturityLevel,
    pub overall_strategy: String,
    pub quick_wins: Vec<Recommendation>,
    pub medium_term_goals: Vec<Recommendation>,
    pub long_term_initiatives: Vec<Recommendation>,
}

impl RecommendationPlan {
    pub fn is_empty(&self) -> bool {
        self.quick_wins.is_empty()
            && self.medium_term_goals.is_empty()
            && self.long_term_initiatives.is_empty()
    }

    pub fn all(&self) -> impl Iterator<Item = &Recommendation> {
        self.quick_wins
            .iter()
            .chain(self.medium_term_goals.iter())
            .chain(self.long_term_initiatives.iter())
    }
}

/// Maps dimension scores onto the playbook table and buckets the result.
#[derive(Debug, Clone)]
pub struct RecommendationGenerator {
    thresholds: ScoreThresholds,
    playbooks: Vec<DimensionPlaybook>,
    scale: MaturityScale,
}

impl RecommendationGenerator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            thresholds: config.thresholds,
            playbooks: config.playbooks.clone(),
            scale: config.maturity_scale.clone(),
        }
    }

    /// `None` for dimensions strong enough to need no recommendation.
    pub fn priority_for(&self, score: u8) -> Option<Priority> {
        if score >= self.thresholds.strength {
            None
        } else if score < self.thresholds.critical {
            Some(Priority::Critical)
        } else if score < self.thresholds.weakness {
            Some(Priority::High)
        } else {
            Some(Priority::Medium)
        }
    }

    pub fn generate(&self, assessment: &ScoredAssessment) -> RecommendationPlan {
        let mut quick_wins = Vec::new();
        let mut medium_term_goals = Vec::new();
        let mut long_term_initiatives = Vec::new();

        for (dimension, score) in assessment.scores.iter() {
            let Some(priority) = self.priority_for(score) else {
                continue;
            };
            let Some(playbook) = self
                .playbooks
                .iter()
                .find(|playbook| playbook.dimension == dimension)
            else {
                continue;
            };

            let content = match priority {
                Priority::Critical | Priority::High => &playbook.foundational,
                Priority::Medium | Priority::Low => &playbook.developing,
            };
            let recommendation = Recommendation {
                dimension,
                priority,
                category: playbook.category,
                effort: playbook.effort,
                score,
                title: content.title.clone(),
                action: content.action.clone(),
                resources: content.resources.clone(),
            };

            match (priority, playbook.effort) {
                (Priority::Critical | Priority::High, Effort::High) => {
                    long_term_initiatives.push(recommendation)
                }
                (Priority::Critical | Priority::High, _) => quick_wins.push(recommendation),
                _ => medium_term_goals.push(recommendation),
            }
        }

        for bucket in [
            &mut quick_wins,
            &mut medium_term_goals,
            &mut long_term_initiatives,
        ] {
            bucket.sort_by_key(|recommendation| recommendation.priority);
        }

        let maturity_level = self.scale.classify(assessment.overall_score);
        RecommendationPlan {
            assessment_id: assessment.assessment_id.clone(),
            overall_score: assessment.overall_score,
            overall_strategy: overall_strategy(&maturity_level),
            maturity_level,
            quick_wins,
            medium_term_goals,
            long_term_initiatives,
        }
    }
}

fn overall_strategy(level: &MaturityLevel) -> String {
    match level.level {
        0 | 1 => format!(
            "Focus on building foundational AI literacy and leadership buy-in. At the {} level, \
             prioritize cultural change and basic skills before investing in advanced technology.",
            level.name
        ),
        2 | 3 => format!(
            "Balance quick wins with strategic investments. At the {} level, integrate AI into \
             core processes while continuing to build capabilities.",
            level.name
        ),
        _ => format!(
            "Drive innovation and optimization. At the {} level, focus on advanced use cases, \
             continuous improvement and industry leadership in AI adoption.",
            level.name
        ),
    }
}
