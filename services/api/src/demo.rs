use crate::infra::{
    parse_assessment_type, parse_category, parse_priority, InMemoryAssessmentRepository,
};
use clap::{ArgGroup, Args};
use readiness_ai::assessment::{
    AnalyticsScope, AnswerSubmission, AnswerType, AssessmentService, AssessmentType,
    EngineConfig, HistoryImporter, NewAssessment, OrganizationId, PeerComparison, Priority,
    Question, QuestionBank, RawAnswer, RecommendationCategory, RecommendationPlan,
    RecommendationQuery, ScoreReport, ScoredAssessment, UserId,
};
use readiness_ai::error::AppError;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

type DemoService = AssessmentService<InMemoryAssessmentRepository, QuestionBank>;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Value (0-100) given to every numeric question.
    #[arg(long, default_value_t = 75.0)]
    pub(crate) value: f64,
    /// Assessment type: full, quick or follow_up.
    #[arg(long, default_value = "full", value_parser = parse_assessment_type)]
    pub(crate) assessment_type: AssessmentType,
    /// Industry used for flow selection and peer comparison.
    #[arg(long)]
    pub(crate) industry: Option<String>,
    /// Keep only recommendations of this priority.
    #[arg(long, value_parser = parse_priority)]
    pub(crate) priority: Option<Priority>,
    /// Keep only recommendations of this category.
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Option<RecommendationCategory>,
    /// Maximum recommendations kept per bucket.
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

impl DemoArgs {
    fn query(&self) -> RecommendationQuery {
        RecommendationQuery {
            priority: self.priority,
            category: self.category,
            limit: self.limit,
        }
    }
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("scope")
        .required(true)
        .args(["user", "organization", "industry"])
))]
pub(crate) struct AnalyticsArgs {
    /// Assessment history CSV export.
    #[arg(long)]
    pub(crate) history: PathBuf,
    #[arg(long)]
    pub(crate) user: Option<String>,
    #[arg(long)]
    pub(crate) organization: Option<String>,
    #[arg(long)]
    pub(crate) industry: Option<String>,
}

impl AnalyticsArgs {
    fn scope(&self) -> Option<AnalyticsScope> {
        if let Some(user) = &self.user {
            return Some(AnalyticsScope::User(UserId(user.clone())));
        }
        if let Some(organization) = &self.organization {
            return Some(AnalyticsScope::Organization(OrganizationId(
                organization.clone(),
            )));
        }
        self.industry
            .as_ref()
            .map(|industry| AnalyticsScope::Industry(industry.clone()))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DemoReport {
    pub(crate) assessment_type: AssessmentType,
    pub(crate) answered: usize,
    pub(crate) scores: ScoreReport,
    pub(crate) recommendations: RecommendationPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) peer_comparison: Option<PeerComparison>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    eprintln!(
        "AI readiness demo ({} assessment, every answer = {})",
        args.assessment_type.label(),
        args.value
    );
    let report = demo_report(&args)?;

    let level = &report.scores.maturity_level;
    eprintln!(
        "- {} questions answered | overall {} | Level {} {}",
        report.answered, report.scores.overall_score, level.level, level.name
    );
    match &report.scores.gap_analysis.next_level {
        Some(next) => eprintln!(
            "- {} points to Level {} {}",
            report.scores.gap_analysis.points_to_next_level, next.level, next.name
        ),
        None => eprintln!("- already at the top maturity level"),
    }
    eprintln!(
        "- {} recommendations: {} quick wins | {} medium-term goals | {} long-term initiatives",
        report.recommendations.all().count(),
        report.recommendations.quick_wins.len(),
        report.recommendations.medium_term_goals.len(),
        report.recommendations.long_term_initiatives.len()
    );
    if let Some(comparison) = &report.peer_comparison {
        eprintln!(
            "- {} against {} peers (percentile {})",
            comparison.rank.label(),
            comparison.peer_count,
            comparison.percentile
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn demo_report(args: &DemoArgs) -> Result<DemoReport, AppError> {
    let service: DemoService = AssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(QuestionBank::standard()),
        EngineConfig::standard(),
    );

    let assessment = service.start_assessment(NewAssessment {
        user_id: UserId("demo-user".to_string()),
        organization_id: Some(OrganizationId("demo-org".to_string())),
        industry: args.industry.clone(),
        assessment_type: args.assessment_type,
    })?;

    let mut answered = 0;
    while let Some(question) = service.next_question(&assessment.id)?.question {
        service.submit_answer(
            &assessment.id,
            AnswerSubmission {
                answer: demo_answer(&question, args.value),
                question_code: question.code,
                time_spent_seconds: 20,
            },
        )?;
        answered += 1;
    }

    service.complete(&assessment.id)?;
    let scores = service.scores(&assessment.id)?;
    let recommendations = service.recommendations(&assessment.id, &args.query())?;
    let peer_comparison = if assessment.industry.is_some() {
        Some(service.peer_comparison(&assessment.id)?)
    } else {
        None
    };

    Ok(DemoReport {
        assessment_type: args.assessment_type,
        answered,
        scores,
        recommendations,
        peer_comparison,
    })
}

fn demo_answer(question: &Question, value: f64) -> RawAnswer {
    match question.answer_type {
        AnswerType::Text => RawAnswer::text("Demo response"),
        _ => RawAnswer::value(value),
    }
}

pub(crate) fn run_analytics(args: AnalyticsArgs) -> Result<(), AppError> {
    let history = HistoryImporter::from_path(&args.history)?;
    eprintln!(
        "Imported {} completed assessments from {}",
        history.len(),
        args.history.display()
    );

    let snapshot = analytics_snapshot(history, &args)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn analytics_snapshot(
    history: Vec<ScoredAssessment>,
    args: &AnalyticsArgs,
) -> Result<serde_json::Value, AppError> {
    let service: DemoService = AssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::with_history(history)),
        Arc::new(QuestionBank::standard()),
        EngineConfig::standard(),
    );

    let snapshot = match args.scope() {
        Some(AnalyticsScope::User(user_id)) => {
            serde_json::to_value(service.individual_analytics(&user_id)?)?
        }
        Some(AnalyticsScope::Organization(organization_id)) => {
            serde_json::to_value(service.organization_analytics(&organization_id)?)?
        }
        Some(AnalyticsScope::Industry(industry)) => {
            serde_json::to_value(service.industry_analytics(&industry)?)?
        }
        None => serde_json::Value::Null,
    };
    Ok(snapshot)
}
