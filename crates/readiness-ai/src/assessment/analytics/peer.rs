use serde::Serialize;

use super::{mean, round_score};
use crate::assessment::domain::{AssessmentId, Dimension, ScoredAssessment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeerRank {
    #[serde(rename = "Top 10%")]
    Top10,
    #[serde(rename = "Top 25%")]
    Top25,
    #[serde(rename = "Above Average")]
    AboveAverage,
    #[serde(rename = "Below Average")]
    BelowAverage,
    #[serde(rename = "Bottom 25%")]
    Bottom25,
}

impl PeerRank {
    pub fn from_percentile(percentile: u8) -> Self {
        match percentile {
            90.. => Self::Top10,
            75..=89 => Self::Top25,
            50..=74 => Self::AboveAverage,
            25..=49 => Self::BelowAverage,
            _ => Self::Bottom25,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Top10 => "Top 10%",
            Self::Top25 => "Top 25%",
            Self::AboveAverage => "Above Average",
            Self::BelowAverage => "Below Average",
            Self::Bottom25 => "Bottom 25%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionComparison {
    pub dimension: Dimension,
    pub score: u8,
    pub industry_average: u8,
    pub difference: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerComparison {
    pub assessment_id: AssessmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub overall_score: u8,
    pub peer_count: usize,
    pub industry_average: u8,
    /// Share of peers scoring strictly lower, 0-100.
    pub percentile: u8,
    pub rank: PeerRank,
    pub dimensions: Vec<DimensionComparison>,
}

pub(super) fn compare(target: &ScoredAssessment, history: &[ScoredAssessment]) -> PeerComparison {
    let peers: Vec<&ScoredAssessment> = history
        .iter()
        .filter(|candidate| candidate.assessment_id != target.assessment_id)
        .collect();

    let (industry_average, percentile) = if peers.is_empty() {
        (target.overall_score, 50)
    } else {
        let scores: Vec<f64> = peers
            .iter()
            .map(|peer| f64::from(peer.overall_score))
            .collect();
        let below = peers
            .iter()
            .filter(|peer| peer.overall_score < target.overall_score)
            .count();
        let percentile = ((below as f64 / peers.len() as f64) * 100.0).round() as u8;
        (round_score(mean(&scores)), percentile)
    };

    let dimensions = target
        .scores
        .iter()
        .map(|(dimension, score)| {
            let average = if peers.is_empty() {
                score
            } else {
                let values: Vec<f64> = peers
                    .iter()
                    .map(|peer| f64::from(peer.scores.get(dimension)))
                    .collect();
                round_score(mean(&values))
            };
            DimensionComparison {
                dimension,
                score,
                industry_average: average,
                difference: i16::from(score) - i16::from(average),
            }
        })
        .collect();

    PeerComparison {
        assessment_id: target.assessment_id.clone(),
        industry: target.industry.clone(),
        overall_score: target.overall_score,
        peer_count: peers.len(),
        industry_average,
        percentile,
        rank: PeerRank::from_percentile(percentile),
        dimensions,
    }
}
