mod gap;
mod maturity;

pub use gap::{DimensionGap, GapAnalysis};
pub use maturity::{MaturityLevel, MaturityScale};

use std::collections::BTreeMap;

use serde::Serialize;

use super::config::EngineConfig;
use super::domain::{Answer, AnswerValue, Dimension, DimensionScores, Question};

/// An answer joined with the catalog entry that weights it.
#[derive(Debug, Clone, Copy)]
pub struct WeightedAnswer<'a> {
    pub question: &'a Question,
    pub value: &'a AnswerValue,
}

/// Pair stored answers with their questions. Answers for codes outside `questions` are dropped.
pub fn weigh<'a>(questions: &'a [Question], answers: &'a [Answer]) -> Vec<WeightedAnswer<'a>> {
    answers
        .iter()
        .filter_map(|answer| {
            questions
                .iter()
                .find(|question| question.code == answer.question_code)
                .map(|question| WeightedAnswer {
                    question,
                    value: &answer.value,
                })
        })
        .collect()
}

/// Weighted mean of the numeric answers in `dimension`, rounded; 0 when none exist.
pub fn dimension_score(answers: &[WeightedAnswer<'_>], dimension: Dimension) -> u8 {
    weighted_mean(
        answers
            .iter()
            .filter(|answer| answer.question.dimension == dimension),
    )
}

/// Unweighted mean of the five dimension scores, rounded.
pub fn overall_score(scores: &DimensionScores) -> u8 {
    let total: u32 = scores.iter().map(|(_, score)| u32::from(score)).sum();
    (f64::from(total) / Dimension::COUNT as f64).round() as u8
}

fn weighted_mean<'a, 'b: 'a>(answers: impl Iterator<Item = &'a WeightedAnswer<'b>>) -> u8 {
    let (weighted_sum, total_weight) = answers
        .filter_map(|answer| {
            answer
                .value
                .score_value()
                .map(|value| (f64::from(value) * answer.question.weight, answer.question.weight))
        })
        .fold((0.0, 0.0), |(sum, weight), (value, w)| (sum + value, weight + w));

    if total_weight <= 0.0 {
        return 0;
    }
    (weighted_sum / total_weight).round().clamp(0.0, 100.0) as u8
}

/// Score computation with the maturity scale injected at construction.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    scale: MaturityScale,
}

impl ScoringEngine {
    pub fn new(scale: MaturityScale) -> Self {
        Self { scale }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.maturity_scale.clone())
    }

    pub fn scale(&self) -> &MaturityScale {
        &self.scale
    }

    pub fn dimension_scores(&self, answers: &[WeightedAnswer<'_>]) -> DimensionScores {
        let mut scores = DimensionScores::default();
        for dimension in Dimension::ordered() {
            scores.set(dimension, dimension_score(answers, dimension));
        }
        scores
    }

    pub fn classify(&self, overall_score: u8) -> MaturityLevel {
        self.scale.classify(overall_score)
    }

    pub fn gap_analysis(&self, scores: &DimensionScores) -> GapAnalysis {
        gap::analyze(&self.scale, overall_score(scores), scores)
    }

    /// Full breakdown for display: per-dimension detail, overall, maturity and gaps.
    pub fn report(&self, answers: &[WeightedAnswer<'_>]) -> ScoreReport {
        self.report_from_scores(self.dimension_scores(answers), answers)
    }

    /// Breakdown around fixed dimension scores, e.g. the frozen scores of a completed
    /// assessment. Answers only feed the per-dimension counts and subdimension averages.
    pub fn report_from_scores(
        &self,
        scores: DimensionScores,
        answers: &[WeightedAnswer<'_>],
    ) -> ScoreReport {
        let overall = overall_score(&scores);

        let dimensions = Dimension::ordered()
            .into_iter()
            .map(|dimension| {
                let in_dimension: Vec<&WeightedAnswer<'_>> = answers
                    .iter()
                    .filter(|answer| answer.question.dimension == dimension)
                    .collect();
                let skipped = in_dimension
                    .iter()
                    .filter(|answer| answer.value.is_skipped())
                    .count();

                let mut grouped: BTreeMap<&str, Vec<&WeightedAnswer<'_>>> = BTreeMap::new();
                for answer in &in_dimension {
                    if let Some(name) = answer.question.subdimension.as_deref() {
                        grouped.entry(name).or_default().push(*answer);
                    }
                }
                let subdimensions = dimension
                    .subdimensions()
                    .iter()
                    .filter_map(|name| {
                        grouped.get(name).map(|group| SubdimensionScore {
                            name: (*name).to_string(),
                            score: weighted_mean(group.iter().copied()),
                            answered: group.len(),
                        })
                    })
                    .collect();

                DimensionDetail {
                    dimension,
                    name: dimension.label(),
                    score: scores.get(dimension),
                    answered: in_dimension.len() - skipped,
                    skipped,
                    subdimensions,
                }
            })
            .collect();

        ScoreReport {
            dimensions,
            scores,
            overall_score: overall,
            maturity_level: self.classify(overall),
            gap_analysis: self.gap_analysis(&scores),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub scores: DimensionScores,
    pub overall_score: u8,
    pub maturity_level: MaturityLevel,
    pub dimensions: Vec<DimensionDetail>,
    pub gap_analysis: GapAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionDetail {
    pub dimension: Dimension,
    pub name: &'static str,
    pub score: u8,
    pub answered: usize,
    pub skipped: usize,
    pub subdimensions: Vec<SubdimensionScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdimensionScore {
    pub name: String,
    pub score: u8,
    pub answered: usize,
}
