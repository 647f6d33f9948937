//! Read-only aggregation over completed assessments.
//!
//! Every entry point accepts the already-loaded history and returns a well-formed view even
//! when the history is empty.

mod cohort;
mod individual;
mod peer;

pub use cohort::{
    AttentionArea, CohortSummary, DimensionStats, IndustryAnalytics, MaturityBucket,
    OrganizationAnalytics, TopPerformer, TrendDirection, TrendPoint,
};
pub use individual::{AssessmentHistoryEntry, IndividualAnalytics, LearningVelocity};
pub use peer::{DimensionComparison, PeerComparison, PeerRank};

use super::config::{EngineConfig, ScoreThresholds};
use super::domain::{OrganizationId, ScoredAssessment, UserId};
use super::scoring::MaturityScale;

/// Aggregator configured with the maturity scale and thresholds it reports against.
#[derive(Debug, Clone)]
pub struct AnalyticsAggregator {
    scale: MaturityScale,
    thresholds: ScoreThresholds,
    top_performers: usize,
}

impl AnalyticsAggregator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scale: config.maturity_scale.clone(),
            thresholds: config.thresholds,
            top_performers: config.top_performers,
        }
    }

    pub fn individual(
        &self,
        user_id: &UserId,
        history: &[ScoredAssessment],
    ) -> IndividualAnalytics {
        individual::analyze(self, user_id, chronological(history))
    }

    pub fn organization(
        &self,
        organization_id: &OrganizationId,
        history: &[ScoredAssessment],
    ) -> OrganizationAnalytics {
        OrganizationAnalytics {
            organization_id: organization_id.clone(),
            summary: cohort::summarize(self, &chronological(history)),
        }
    }

    pub fn industry(&self, industry: &str, history: &[ScoredAssessment]) -> IndustryAnalytics {
        cohort::industry(self, industry, chronological(history))
    }

    /// Position of `target` among the other completed assessments of its industry.
    pub fn peer_comparison(
        &self,
        target: &ScoredAssessment,
        industry_history: &[ScoredAssessment],
    ) -> PeerComparison {
        peer::compare(target, industry_history)
    }
}

/// Oldest first; ties keep a deterministic order by assessment id.
fn chronological(history: &[ScoredAssessment]) -> Vec<&ScoredAssessment> {
    let mut ordered: Vec<&ScoredAssessment> = history.iter().collect();
    ordered.sort_by(|a, b| {
        a.completed_at
            .cmp(&b.completed_at)
            .then_with(|| a.assessment_id.cmp(&b.assessment_id))
    });
    ordered
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - avg).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Least-squares slope of `values` against their index; 0 for fewer than two points.
pub(crate) fn slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);
    let (numerator, denominator) = values.iter().enumerate().fold(
        (0.0, 0.0),
        |(numerator, denominator), (index, value)| {
            let dx = index as f64 - x_mean;
            (numerator + dx * (value - y_mean), denominator + dx * dx)
        },
    );
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
