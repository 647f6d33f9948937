use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::{mean, round_score, round_to_tenth, std_dev, AnalyticsAggregator};
use crate::assessment::domain::{Dimension, OrganizationId, ScoredAssessment, UserId};

/// Month-over-month movement threshold, in points.
const TREND_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaturityBucket {
    pub level: u8,
    pub name: String,
    pub count: usize,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionStats {
    pub dimension: Dimension,
    pub average: u8,
    pub min: u8,
    pub max: u8,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub period: String,
    pub average_score: u8,
    pub assessments: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPerformer {
    pub user_id: UserId,
    pub score: u8,
    pub improvement: i16,
    pub assessments: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttentionArea {
    pub dimension: Dimension,
    pub average_score: u8,
}

/// Shared shape for organization and industry scopes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub total_assessments: usize,
    pub active_users: usize,
    pub average_score: u8,
    pub maturity_distribution: Vec<MaturityBucket>,
    pub dimension_breakdown: Vec<DimensionStats>,
    pub trends: Vec<TrendPoint>,
    pub trend_direction: TrendDirection,
    pub top_performers: Vec<TopPerformer>,
    pub areas_needing_attention: Vec<AttentionArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationAnalytics {
    pub organization_id: OrganizationId,
    #[serde(flatten)]
    pub summary: CohortSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryAnalytics {
    pub industry: String,
    #[serde(flatten)]
    pub summary: CohortSummary,
    pub total_organizations: usize,
    /// Highest organization average in the industry.
    pub leader_score: u8,
    /// Lowest organization average in the industry.
    pub laggard_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strongest_dimension: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weakest_dimension: Option<Dimension>,
}

pub(super) fn summarize(
    aggregator: &AnalyticsAggregator,
    history: &[&ScoredAssessment],
) -> CohortSummary {
    let total = history.len();
    let overall: Vec<f64> = history
        .iter()
        .map(|assessment| f64::from(assessment.overall_score))
        .collect();

    let maturity_distribution = aggregator
        .scale
        .levels()
        .iter()
        .map(|level| {
            let count = history
                .iter()
                .filter(|assessment| level.contains(assessment.overall_score))
                .count();
            MaturityBucket {
                level: level.level,
                name: level.name.clone(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    let dimension_breakdown: Vec<DimensionStats> = if history.is_empty() {
        Vec::new()
    } else {
        Dimension::ordered()
            .into_iter()
            .map(|dimension| dimension_stats(dimension, history))
            .collect()
    };

    let areas_needing_attention = attention_areas(&dimension_breakdown, aggregator);
    let trends = monthly_trends(history);
    let trend_direction = trend_direction(&trends);

    let active_users = history
        .iter()
        .map(|assessment| &assessment.user_id)
        .collect::<HashSet<_>>()
        .len();

    CohortSummary {
        total_assessments: total,
        active_users,
        average_score: round_score(mean(&overall)),
        maturity_distribution,
        dimension_breakdown,
        trends,
        trend_direction,
        top_performers: top_performers(history, aggregator.top_performers),
        areas_needing_attention,
    }
}

pub(super) fn industry(
    aggregator: &AnalyticsAggregator,
    industry: &str,
    history: Vec<&ScoredAssessment>,
) -> IndustryAnalytics {
    let summary = summarize(aggregator, &history);

    let mut by_organization: BTreeMap<&OrganizationId, Vec<f64>> = BTreeMap::new();
    for assessment in &history {
        if let Some(organization_id) = &assessment.organization_id {
            by_organization
                .entry(organization_id)
                .or_default()
                .push(f64::from(assessment.overall_score));
        }
    }
    let organization_averages: Vec<u8> = by_organization
        .values()
        .map(|scores| round_score(mean(scores)))
        .collect();

    let strongest_dimension = summary
        .dimension_breakdown
        .iter()
        .fold(None::<&DimensionStats>, |best, stats| match best {
            Some(current) if current.average >= stats.average => Some(current),
            _ => Some(stats),
        })
        .map(|stats| stats.dimension);
    let weakest_dimension = summary
        .dimension_breakdown
        .iter()
        .fold(None::<&DimensionStats>, |best, stats| match best {
            Some(current) if current.average <= stats.average => Some(current),
            _ => Some(stats),
        })
        .map(|stats| stats.dimension);

    IndustryAnalytics {
        industry: industry.trim().to_string(),
        total_organizations: by_organization.len(),
        leader_score: organization_averages.iter().copied().max().unwrap_or(0),
        laggard_score: organization_averages.iter().copied().min().unwrap_or(0),
        strongest_dimension,
        weakest_dimension,
        summary,
    }
}

fn dimension_stats(dimension: Dimension, history: &[&ScoredAssessment]) -> DimensionStats {
    let scores: Vec<u8> = history
        .iter()
        .map(|assessment| assessment.scores.get(dimension))
        .collect();
    let values: Vec<f64> = scores.iter().map(|score| f64::from(*score)).collect();

    DimensionStats {
        dimension,
        average: round_score(mean(&values)),
        min: scores.iter().copied().min().unwrap_or(0),
        max: scores.iter().copied().max().unwrap_or(0),
        std_dev: round_to_tenth(std_dev(&values)),
    }
}

/// Dimensions whose cohort mean falls below the attention threshold, weakest first.
fn attention_areas(
    breakdown: &[DimensionStats],
    aggregator: &AnalyticsAggregator,
) -> Vec<AttentionArea> {
    let mut areas: Vec<AttentionArea> = breakdown
        .iter()
        .filter(|stats| stats.average < aggregator.thresholds.attention)
        .map(|stats| AttentionArea {
            dimension: stats.dimension,
            average_score: stats.average,
        })
        .collect();
    areas.sort_by_key(|area| area.average_score);
    areas
}

fn monthly_trends(history: &[&ScoredAssessment]) -> Vec<TrendPoint> {
    let mut months: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for assessment in history {
        months
            .entry(assessment.completed_at.format("%Y-%m").to_string())
            .or_default()
            .push(f64::from(assessment.overall_score));
    }

    months
        .into_iter()
        .map(|(period, scores)| TrendPoint {
            period,
            average_score: round_score(mean(&scores)),
            assessments: scores.len(),
        })
        .collect()
}

/// Compares the mean of the last two months with the mean of the months before them. With
/// only two months, the later month is compared with the earlier one.
fn trend_direction(trends: &[TrendPoint]) -> TrendDirection {
    let averages: Vec<f64> = trends
        .iter()
        .map(|point| f64::from(point.average_score))
        .collect();
    let (recent, older) = match averages.len() {
        0 | 1 => return TrendDirection::Stable,
        2 => (averages[1], averages[0]),
        len => (mean(&averages[len - 2..]), mean(&averages[..len - 2])),
    };

    if recent - older > TREND_THRESHOLD {
        TrendDirection::Improving
    } else if older - recent > TREND_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

/// Top `limit` users by latest overall score; ties resolve by user id.
fn top_performers(history: &[&ScoredAssessment], limit: usize) -> Vec<TopPerformer> {
    let mut users: HashMap<&UserId, (u8, u8, usize)> = HashMap::new();
    for assessment in history {
        users
            .entry(&assessment.user_id)
            .and_modify(|(_, latest, count)| {
                *latest = assessment.overall_score;
                *count += 1;
            })
            .or_insert((assessment.overall_score, assessment.overall_score, 1));
    }

    let mut performers: Vec<TopPerformer> = users
        .into_iter()
        .map(|(user_id, (earliest, latest, assessments))| TopPerformer {
            user_id: user_id.clone(),
            score: latest,
            improvement: i16::from(latest) - i16::from(earliest),
            assessments,
        })
        .collect();
    performers.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.user_id.cmp(&b.user_id)));
    performers.truncate(limit);
    performers
}

fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u8
}
