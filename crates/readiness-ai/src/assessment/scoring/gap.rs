use serde::Serialize;

use super::maturity::{MaturityLevel, MaturityScale};
use crate::assessment::domain::{Dimension, DimensionScores};
use crate::assessment::recommendations::Priority;

/// Distance from the current scores to the next maturity band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAnalysis {
    pub current_level: MaturityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level: Option<MaturityLevel>,
    pub points_to_next_level: u8,
    pub percentage_to_next_level: u8,
    pub dimension_gaps: Vec<DimensionGap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionGap {
    pub dimension: Dimension,
    pub current_score: u8,
    pub target_score: u8,
    /// Negative when the dimension already clears the target.
    pub gap: i16,
    pub priority: Priority,
}

pub(crate) fn analyze(
    scale: &MaturityScale,
    overall_score: u8,
    scores: &DimensionScores,
) -> GapAnalysis {
    let current_level = scale.classify(overall_score);
    let next_level = scale.next_after(current_level.level).cloned();

    let (target_score, points_to_next_level, percentage_to_next_level) = match &next_level {
        Some(next) => (
            next.min_score,
            next.min_score.saturating_sub(overall_score),
            percentage_of(overall_score, next.min_score),
        ),
        None => (100, 0, 100),
    };

    let mut dimension_gaps: Vec<DimensionGap> = scores
        .iter()
        .map(|(dimension, score)| {
            let gap = i16::from(target_score) - i16::from(score);
            DimensionGap {
                dimension,
                current_score: score,
                target_score,
                gap,
                priority: gap_priority(gap),
            }
        })
        .collect();
    dimension_gaps.sort_by(|a, b| b.gap.cmp(&a.gap));

    GapAnalysis {
        current_level,
        next_level,
        points_to_next_level,
        percentage_to_next_level,
        dimension_gaps,
    }
}

fn gap_priority(gap: i16) -> Priority {
    if gap > 30 {
        Priority::High
    } else if gap > 15 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn percentage_of(score: u8, target: u8) -> u8 {
    if target == 0 {
        return 100;
    }
    ((f64::from(score) / f64::from(target)) * 100.0)
        .round()
        .min(100.0) as u8
}
