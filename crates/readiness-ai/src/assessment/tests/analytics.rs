use super::common::*;
use crate::assessment::analytics::{
    AnalyticsAggregator, LearningVelocity, PeerRank, TrendDirection,
};
use crate::assessment::config::EngineConfig;
use crate::assessment::domain::{Dimension, DimensionScores, OrganizationId, UserId};

fn aggregator() -> AnalyticsAggregator {
    AnalyticsAggregator::new(&EngineConfig::standard())
}

fn user() -> UserId {
    UserId("u-1".to_string())
}

#[test]
fn individual_without_history_is_well_formed() {
    let analytics = aggregator().individual(&user(), &[]);
    assert_eq!(analytics.total_assessments, 0);
    assert_eq!(analytics.current_score, 0);
    assert!(analytics.current_maturity_level.is_none());
    assert_eq!(analytics.improvement, 0);
    assert_eq!(analytics.learning_velocity, 0.0);
    assert!(analytics.history.is_empty());
}

#[test]
fn single_assessment_reports_zero_improvement_and_velocity() {
    let history = [scored(
        "asm-1",
        "u-1",
        None,
        None,
        scores([75, 30, 50, 70, 20]),
        at(2024, 1, 5),
    )];
    let analytics = aggregator().individual(&user(), &history);

    assert_eq!(analytics.total_assessments, 1);
    assert_eq!(analytics.current_score, 49);
    assert_eq!(analytics.improvement, 0);
    assert_eq!(analytics.since_last, 0);
    assert_eq!(analytics.learning_velocity, 0.0);
    assert_eq!(analytics.consistency, 100);
    assert_eq!(
        analytics.strengths,
        vec![Dimension::Individual, Dimension::Embedding]
    );
    assert_eq!(
        analytics.weaknesses,
        vec![Dimension::Leadership, Dimension::Velocity]
    );
}

#[test]
fn individual_trends_follow_completion_order() {
    // Deliberately out of order; the aggregator sorts by completion time.
    let history = [
        scored(
            "asm-3",
            "u-1",
            None,
            None,
            DimensionScores::uniform(70),
            at(2024, 3, 1),
        ),
        scored(
            "asm-1",
            "u-1",
            None,
            None,
            DimensionScores::uniform(40),
            at(2024, 1, 1),
        ),
        scored(
            "asm-2",
            "u-1",
            None,
            None,
            DimensionScores::uniform(50),
            at(2024, 2, 1),
        ),
    ];
    let analytics = aggregator().individual(&user(), &history);

    assert_eq!(analytics.current_score, 70);
    assert_eq!(analytics.improvement, 30);
    assert_eq!(analytics.since_last, 20);
    assert_eq!(analytics.learning_velocity, 15.0);
    assert_eq!(analytics.learning_velocity_label, LearningVelocity::Fast);
    // sigma of [40, 50, 70] is 12.47
    assert_eq!(analytics.consistency, 75);
    let ids: Vec<&str> = analytics
        .history
        .iter()
        .map(|entry| entry.assessment_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["asm-1", "asm-2", "asm-3"]);
    assert_eq!(
        analytics
            .current_maturity_level
            .as_ref()
            .map(|level| level.level),
        Some(3)
    );
}

#[test]
fn organization_without_history_is_empty_not_an_error() {
    let analytics = aggregator().organization(&OrganizationId("org-empty".to_string()), &[]);
    let summary = &analytics.summary;

    assert_eq!(summary.total_assessments, 0);
    assert_eq!(summary.active_users, 0);
    assert_eq!(summary.average_score, 0);
    assert_eq!(summary.maturity_distribution.len(), 5);
    assert!(summary
        .maturity_distribution
        .iter()
        .all(|bucket| bucket.count == 0 && bucket.percentage == 0));
    assert!(summary.trends.is_empty());
    assert!(summary.dimension_breakdown.is_empty());
    assert!(summary.top_performers.is_empty());
    assert!(summary.areas_needing_attention.is_empty());
    assert_eq!(summary.trend_direction, TrendDirection::Stable);
}

#[test]
fn organization_summary_aggregates_members() {
    let org = Some("org-1");
    let history = [
        scored(
            "asm-1",
            "u-1",
            org,
            None,
            scores([60, 30, 50, 20, 40]),
            at(2024, 1, 10),
        ),
        scored(
            "asm-2",
            "u-2",
            org,
            None,
            scores([80, 50, 70, 30, 60]),
            at(2024, 1, 20),
        ),
        scored(
            "asm-3",
            "u-1",
            org,
            None,
            scores([90, 40, 80, 40, 70]),
            at(2024, 2, 15),
        ),
    ];
    let analytics = aggregator().organization(&OrganizationId("org-1".to_string()), &history);
    let summary = &analytics.summary;

    // overall scores: 40, 58, 64
    assert_eq!(summary.total_assessments, 3);
    assert_eq!(summary.active_users, 2);
    assert_eq!(summary.average_score, 54);

    let counts: Vec<usize> = summary
        .maturity_distribution
        .iter()
        .map(|bucket| bucket.count)
        .collect();
    assert_eq!(counts, vec![0, 1, 1, 1, 0]);

    let leadership = &summary.dimension_breakdown[1];
    assert_eq!(leadership.dimension, Dimension::Leadership);
    assert_eq!(leadership.average, 40);
    assert_eq!(leadership.min, 30);
    assert_eq!(leadership.max, 50);

    let attention: Vec<Dimension> = summary
        .areas_needing_attention
        .iter()
        .map(|area| area.dimension)
        .collect();
    assert_eq!(attention, vec![Dimension::Embedding]);

    let periods: Vec<&str> = summary
        .trends
        .iter()
        .map(|point| point.period.as_str())
        .collect();
    assert_eq!(periods, vec!["2024-01", "2024-02"]);
    assert_eq!(summary.trends[0].average_score, 49);
    assert_eq!(summary.trend_direction, TrendDirection::Improving);

    let top = &summary.top_performers;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].user_id, UserId("u-1".to_string()));
    assert_eq!(top[0].score, 64);
    assert_eq!(top[0].improvement, 24);
    assert_eq!(top[0].assessments, 2);
}

#[test]
fn top_performers_are_capped() {
    let history: Vec<_> = (0..8)
        .map(|index| {
            scored(
                &format!("asm-{index}"),
                &format!("u-{index}"),
                Some("org-big"),
                None,
                DimensionScores::uniform(40 + index as u8 * 5),
                at(2024, 4, 1 + index),
            )
        })
        .collect();
    let analytics = aggregator().organization(&OrganizationId("org-big".to_string()), &history);
    let scores: Vec<u8> = analytics
        .summary
        .top_performers
        .iter()
        .map(|performer| performer.score)
        .collect();
    assert_eq!(scores, vec![75, 70, 65, 60, 55]);
}

#[test]
fn industry_reports_leader_and_laggard_organizations() {
    let history = [
        scored(
            "asm-1",
            "u-1",
            Some("org-a"),
            Some("finance"),
            scores([80, 70, 60, 50, 90]),
            at(2024, 1, 1),
        ),
        scored(
            "asm-2",
            "u-2",
            Some("org-a"),
            Some("finance"),
            scores([60, 50, 40, 30, 70]),
            at(2024, 1, 2),
        ),
        scored(
            "asm-3",
            "u-3",
            Some("org-b"),
            Some("finance"),
            scores([30, 20, 30, 20, 50]),
            at(2024, 1, 3),
        ),
    ];
    let analytics = aggregator().industry("finance", &history);

    assert_eq!(analytics.industry, "finance");
    assert_eq!(analytics.total_organizations, 2);
    // org-a averages 70 and 50; org-b scores 30
    assert_eq!(analytics.leader_score, 60);
    assert_eq!(analytics.laggard_score, 30);
    assert_eq!(analytics.strongest_dimension, Some(Dimension::Velocity));
    assert_eq!(analytics.weakest_dimension, Some(Dimension::Embedding));
    assert_eq!(analytics.summary.total_assessments, 3);
}

#[test]
fn empty_industry_has_no_envelope() {
    let analytics = aggregator().industry("energy", &[]);
    assert_eq!(analytics.total_organizations, 0);
    assert_eq!(analytics.leader_score, 0);
    assert_eq!(analytics.laggard_score, 0);
    assert!(analytics.strongest_dimension.is_none());
    assert!(analytics.summary.trends.is_empty());
}

#[test]
fn peer_comparison_without_peers_is_its_own_average() {
    let target = scored(
        "asm-solo",
        "u-1",
        None,
        Some("energy"),
        DimensionScores::uniform(64),
        at(2024, 5, 1),
    );
    let comparison = aggregator().peer_comparison(&target, std::slice::from_ref(&target));
    assert_eq!(comparison.peer_count, 0);
    assert_eq!(comparison.industry_average, 64);
    assert_eq!(comparison.percentile, 50);
    assert_eq!(comparison.rank, PeerRank::AboveAverage);
    assert!(comparison
        .dimensions
        .iter()
        .all(|dimension| dimension.difference == 0));
}

#[test]
fn peer_rank_bands() {
    assert_eq!(PeerRank::from_percentile(95), PeerRank::Top10);
    assert_eq!(PeerRank::from_percentile(90), PeerRank::Top10);
    assert_eq!(PeerRank::from_percentile(75), PeerRank::Top25);
    assert_eq!(PeerRank::from_percentile(49), PeerRank::BelowAverage);
    assert_eq!(PeerRank::from_percentile(10), PeerRank::Bottom25);
    assert_eq!(PeerRank::Top25.label(), "Top 25%");
}
