use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{round_to_tenth, slope, std_dev, AnalyticsAggregator};
use crate::assessment::domain::{
    AssessmentId, Dimension, DimensionScores, ScoredAssessment, UserId,
};
use crate::assessment::scoring::MaturityLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningVelocity {
    Fast,
    Moderate,
    Slow,
}

impl LearningVelocity {
    pub fn from_rate(points_per_assessment: f64) -> Self {
        if points_per_assessment > 5.0 {
            Self::Fast
        } else if points_per_assessment < 1.0 {
            Self::Slow
        } else {
            Self::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentHistoryEntry {
    pub assessment_id: AssessmentId,
    pub completed_at: DateTime<Utc>,
    pub overall_score: u8,
    pub maturity_level: u8,
    pub maturity_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndividualAnalytics {
    pub user_id: UserId,
    pub total_assessments: usize,
    pub current_score: u8,
    pub current_maturity_level: Option<MaturityLevel>,
    pub latest_scores: Option<DimensionScores>,
    /// Latest overall minus earliest overall in the window.
    pub improvement: i16,
    pub since_last: i16,
    pub strengths: Vec<Dimension>,
    pub weaknesses: Vec<Dimension>,
    /// Points gained per assessment (least-squares slope).
    pub learning_velocity: f64,
    pub learning_velocity_label: LearningVelocity,
    /// 0-100, higher means steadier overall scores.
    pub consistency: u8,
    pub history: Vec<AssessmentHistoryEntry>,
}

pub(super) fn analyze(
    aggregator: &AnalyticsAggregator,
    user_id: &UserId,
    history: Vec<&ScoredAssessment>,
) -> IndividualAnalytics {
    let entries: Vec<AssessmentHistoryEntry> = history
        .iter()
        .map(|assessment| {
            let level = aggregator.scale.classify(assessment.overall_score);
            AssessmentHistoryEntry {
                assessment_id: assessment.assessment_id.clone(),
                completed_at: assessment.completed_at,
                overall_score: assessment.overall_score,
                maturity_level: level.level,
                maturity_name: level.name,
            }
        })
        .collect();

    let (Some(first), Some(latest)) = (history.first(), history.last()) else {
        return IndividualAnalytics {
            user_id: user_id.clone(),
            total_assessments: 0,
            current_score: 0,
            current_maturity_level: None,
            latest_scores: None,
            improvement: 0,
            since_last: 0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            learning_velocity: 0.0,
            learning_velocity_label: LearningVelocity::from_rate(0.0),
            consistency: 0,
            history: entries,
        };
    };

    let overall: Vec<f64> = history
        .iter()
        .map(|assessment| f64::from(assessment.overall_score))
        .collect();

    let improvement = i16::from(latest.overall_score) - i16::from(first.overall_score);
    let since_last = match history.len() {
        0 | 1 => 0,
        len => i16::from(latest.overall_score) - i16::from(history[len - 2].overall_score),
    };

    let thresholds = aggregator.thresholds;
    let strengths = latest
        .scores
        .iter()
        .filter(|(_, score)| *score >= thresholds.strength)
        .map(|(dimension, _)| dimension)
        .collect();
    let weaknesses = latest
        .scores
        .iter()
        .filter(|(_, score)| *score < thresholds.weakness)
        .map(|(dimension, _)| dimension)
        .collect();

    let learning_velocity = round_to_tenth(slope(&overall));
    let consistency = (100.0 - 2.0 * std_dev(&overall)).round().max(0.0) as u8;

    IndividualAnalytics {
        user_id: user_id.clone(),
        total_assessments: history.len(),
        current_score: latest.overall_score,
        current_maturity_level: Some(aggregator.scale.classify(latest.overall_score)),
        latest_scores: Some(latest.scores),
        improvement,
        since_last,
        strengths,
        weaknesses,
        learning_velocity,
        learning_velocity_label: LearningVelocity::from_rate(learning_velocity),
        consistency,
        history: entries,
    }
}
