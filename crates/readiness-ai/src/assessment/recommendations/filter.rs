use serde::Deserialize;

use super::content::{Priority, RecommendationCategory};
use super::plan::{Recommendation, RecommendationPlan};

/// Query-time filters. Applied to each bucket independently; entries are only removed, never
/// re-ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<RecommendationCategory>,
    /// Maximum entries kept per bucket.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RecommendationQuery {
    pub fn is_empty(&self) -> bool {
        self.priority.is_none() && self.category.is_none() && self.limit.is_none()
    }

    pub fn matches(&self, recommendation: &Recommendation) -> bool {
        self.priority
            .map_or(true, |priority| recommendation.priority == priority)
            && self
                .category
                .map_or(true, |category| recommendation.category == category)
    }

    pub fn apply(&self, mut plan: RecommendationPlan) -> RecommendationPlan {
        for bucket in [
            &mut plan.quick_wins,
            &mut plan.medium_term_goals,
            &mut plan.long_term_initiatives,
        ] {
            bucket.retain(|recommendation| self.matches(recommendation));
            if let Some(limit) = self.limit {
                bucket.truncate(limit);
            }
        }
        plan
    }
}
