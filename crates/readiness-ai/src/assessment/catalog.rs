use serde::{Deserialize, Serialize};

use super::domain::{
    AnswerOption, AnswerType, AssessmentType, Dimension, Question, QuestionCode, ScoreDirection,
};
use super::repository::RepositoryError;

/// Read side of the question catalog; returns the active question set in catalog order.
pub trait QuestionCatalog: Send + Sync {
    fn load_question_catalog(
        &self,
        assessment_type: AssessmentType,
        industry: Option<&str>,
    ) -> Result<Vec<Question>, RepositoryError>;
}

/// Named subset of the bank offered for an assessment type, optionally scoped to industries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentFlow {
    pub name: String,
    pub assessment_type: AssessmentType,
    #[serde(default)]
    pub industries: Vec<String>,
    /// `None` selects every question in the bank.
    #[serde(default)]
    pub question_codes: Option<Vec<QuestionCode>>,
}

impl AssessmentFlow {
    fn serves_industry(&self, industry: &str) -> bool {
        let industry = industry.trim();
        self.industries
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(industry))
    }

    fn includes(&self, code: &QuestionCode) -> bool {
        match &self.question_codes {
            Some(codes) => codes.contains(code),
            None => true,
        }
    }
}

/// In-process catalog holding the standard bank and its flows.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    flows: Vec<AssessmentFlow>,
}

impl QuestionBank {
    pub fn new(mut questions: Vec<Question>, flows: Vec<AssessmentFlow>) -> Self {
        questions.sort_by_key(|question| question.display_order);
        Self { questions, flows }
    }

    pub fn standard() -> Self {
        Self::new(standard_questions(), standard_flows())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, code: &QuestionCode) -> Option<&Question> {
        self.questions.iter().find(|question| &question.code == code)
    }

    /// Industry-specific flows win over the generic flow for the same type. Follow-up
    /// assessments reuse the full-assessment flows.
    pub fn flow_for(
        &self,
        assessment_type: AssessmentType,
        industry: Option<&str>,
    ) -> Option<&AssessmentFlow> {
        let flow_type = match assessment_type {
            AssessmentType::FollowUp => AssessmentType::Full,
            other => other,
        };
        let candidates = || {
            self.flows
                .iter()
                .filter(move |flow| flow.assessment_type == flow_type)
        };

        industry
            .and_then(|industry| candidates().find(|flow| flow.serves_industry(industry)))
            .or_else(|| candidates().find(|flow| flow.industries.is_empty()))
    }

    pub fn active_questions(
        &self,
        assessment_type: AssessmentType,
        industry: Option<&str>,
    ) -> Vec<Question> {
        match self.flow_for(assessment_type, industry) {
            Some(flow) => self
                .questions
                .iter()
                .filter(|question| flow.includes(&question.code))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

impl QuestionCatalog for QuestionBank {
    fn load_question_catalog(
        &self,
        assessment_type: AssessmentType,
        industry: Option<&str>,
    ) -> Result<Vec<Question>, RepositoryError> {
        Ok(self.active_questions(assessment_type, industry))
    }
}

const SCALE: AnswerType = AnswerType::Scale;
const CHOICE: AnswerType = AnswerType::MultiChoice;

fn standard_questions() -> Vec<Question> {
    use Dimension::*;

    let entries: [(&str, Dimension, &str, AnswerType, f64, &str, &[(u8, &str)]); 26] = [
        (
            "IND_001",
            Individual,
            "learning_agility",
            SCALE,
            2.0,
            "How comfortable are you learning new AI tools and technologies?",
            &[
                (0, "Very Uncomfortable"),
                (25, "Somewhat Uncomfortable"),
                (50, "Neutral"),
                (75, "Comfortable"),
                (100, "Very Comfortable"),
            ],
        ),
        (
            "IND_002",
            Individual,
            "experimentation",
            CHOICE,
            2.0,
            "How often do you experiment with AI tools in your daily work?",
            &[
                (0, "Never"),
                (20, "Rarely (once a month or less)"),
                (40, "Sometimes (weekly)"),
                (60, "Often (several times a week)"),
                (80, "Very Often (daily)"),
                (100, "Constantly (multiple times daily)"),
            ],
        ),
        (
            "IND_003",
            Individual,
            "resilience",
            CHOICE,
            2.0,
            "When AI makes a mistake in your work, how do you typically respond?",
            &[
                (0, "I stop using AI entirely"),
                (25, "I get frustrated and avoid that tool"),
                (50, "I try again but remain skeptical"),
                (75, "I try to understand why it failed"),
                (100, "I use it as a learning opportunity to improve my prompts"),
            ],
        ),
        (
            "IND_004",
            Individual,
            "skill_level",
            SCALE,
            1.0,
            "How would you rate your current AI skill level?",
            &[
                (0, "Novice"),
                (25, "Beginner"),
                (50, "Intermediate"),
                (75, "Advanced"),
                (100, "Expert"),
            ],
        ),
        (
            "IND_005",
            Individual,
            "change_readiness",
            AnswerType::FearToConfidence,
            2.0,
            "How do you feel about AI potentially changing your job responsibilities?",
            &[
                (0, "Very Fearful"),
                (25, "Somewhat Anxious"),
                (50, "Neutral"),
                (75, "Optimistic"),
                (100, "Very Confident"),
            ],
        ),
        (
            "IND_006",
            Individual,
            "continuous_learning",
            CHOICE,
            2.0,
            "In the past 6 months, how many new AI skills have you actively developed?",
            &[
                (0, "None"),
                (25, "1-2 skills"),
                (50, "3-4 skills"),
                (75, "5-6 skills"),
                (100, "7+ skills"),
            ],
        ),
        (
            "LEAD_001",
            Leadership,
            "strategic_clarity",
            SCALE,
            2.0,
            "How clearly has leadership communicated the organization's AI strategy?",
            &[
                (0, "No Communication"),
                (25, "Vague"),
                (50, "Somewhat Clear"),
                (75, "Clear"),
                (100, "Very Clear"),
            ],
        ),
        (
            "LEAD_002",
            Leadership,
            "executive_sponsorship",
            SCALE,
            2.0,
            "Does leadership actively champion and support AI initiatives?",
            &[
                (0, "No Support"),
                (25, "Passive"),
                (50, "Moderate"),
                (75, "Strong"),
                (100, "Exceptional"),
            ],
        ),
        (
            "LEAD_003",
            Leadership,
            "role_modeling",
            SCALE,
            2.0,
            "How well does leadership model AI adoption in their own work?",
            &[
                (0, "Not at All"),
                (25, "Rarely"),
                (50, "Sometimes"),
                (75, "Often"),
                (100, "Always"),
            ],
        ),
        (
            "LEAD_004",
            Leadership,
            "resource_allocation",
            SCALE,
            2.0,
            "How effectively does leadership allocate resources for AI training and tools?",
            &[
                (0, "No Resources"),
                (25, "Limited"),
                (50, "Adequate"),
                (75, "Good"),
                (100, "Excellent"),
            ],
        ),
        (
            "LEAD_005",
            Leadership,
            "failure_tolerance",
            SCALE,
            2.0,
            "How well does leadership handle setbacks or failures in AI projects?",
            &[
                (0, "Punitive"),
                (25, "Critical"),
                (50, "Accepting"),
                (75, "Learning-Focused"),
                (100, "Encouraging"),
            ],
        ),
        (
            "CULT_001",
            Cultural,
            "ai_sentiment",
            SCALE,
            2.0,
            "How would you describe your organization's general attitude toward AI?",
            &[
                (0, "Hostile"),
                (25, "Skeptical"),
                (50, "Curious"),
                (75, "Enthusiastic"),
                (100, "AI-First"),
            ],
        ),
        (
            "CULT_002",
            Cultural,
            "psychological_safety",
            SCALE,
            2.0,
            "How safe do employees feel sharing AI experiments or failures?",
            &[
                (0, "Not Safe"),
                (25, "Somewhat Unsafe"),
                (50, "Neutral"),
                (75, "Safe"),
                (100, "Very Safe"),
            ],
        ),
        (
            "CULT_003",
            Cultural,
            "collaboration",
            CHOICE,
            2.0,
            "How often do teams collaborate on AI initiatives across departments?",
            &[
                (0, "Never"),
                (25, "Rarely"),
                (50, "Sometimes"),
                (75, "Often"),
                (100, "Always"),
            ],
        ),
        (
            "CULT_004",
            Cultural,
            "knowledge_sharing",
            SCALE,
            2.0,
            "Is there a culture of knowledge sharing about AI best practices?",
            &[
                (0, "None"),
                (25, "Limited"),
                (50, "Moderate"),
                (75, "Good"),
                (100, "Excellent"),
            ],
        ),
        (
            "CULT_005",
            Cultural,
            "ethics",
            SCALE,
            2.0,
            "How does the organization handle ethical concerns about AI?",
            &[
                (0, "Ignored"),
                (25, "Reactive"),
                (50, "Aware"),
                (75, "Proactive"),
                (100, "Embedded"),
            ],
        ),
        (
            "EMB_001",
            Embedding,
            "process_integration",
            SCALE,
            2.0,
            "How deeply is AI integrated into your core business processes?",
            &[
                (0, "Not at All"),
                (25, "Peripheral"),
                (50, "Supporting"),
                (75, "Integrated"),
                (100, "Core"),
            ],
        ),
        (
            "EMB_002",
            Embedding,
            "governance",
            SCALE,
            2.0,
            "How mature is your AI governance framework?",
            &[
                (0, "None"),
                (25, "Basic"),
                (50, "Developing"),
                (75, "Established"),
                (100, "Advanced"),
            ],
        ),
        (
            "EMB_003",
            Embedding,
            "technical_integration",
            SCALE,
            2.0,
            "How well does AI integrate with existing technology systems?",
            &[
                (0, "No Integration"),
                (25, "Limited"),
                (50, "Moderate"),
                (75, "Good"),
                (100, "Seamless"),
            ],
        ),
        (
            "EMB_004",
            Embedding,
            "standardization",
            SCALE,
            2.0,
            "How standardized are AI practices across your organization?",
            &[
                (0, "None"),
                (25, "Low"),
                (50, "Moderate"),
                (75, "High"),
                (100, "Full"),
            ],
        ),
        (
            "EMB_005",
            Embedding,
            "measurement",
            SCALE,
            2.0,
            "How well does your organization measure AI ROI and impact?",
            &[
                (0, "Not at All"),
                (25, "Basic"),
                (50, "Developing"),
                (75, "Good"),
                (100, "Advanced"),
            ],
        ),
        (
            "VEL_001",
            Velocity,
            "deployment_speed",
            CHOICE,
            2.0,
            "How quickly can your organization deploy new AI solutions?",
            &[
                (0, "Very Slow (1+ year)"),
                (25, "Slow (6-12 months)"),
                (50, "Moderate (3-6 months)"),
                (75, "Fast (1-3 months)"),
                (100, "Very Fast (< 1 month)"),
            ],
        ),
        (
            "VEL_002",
            Velocity,
            "responsiveness",
            SCALE,
            2.0,
            "How responsive is your organization to new AI capabilities?",
            &[
                (0, "Not Responsive"),
                (25, "Slow"),
                (50, "Average"),
                (75, "Quick"),
                (100, "Leading"),
            ],
        ),
        (
            "VEL_003",
            Velocity,
            "user_adoption",
            CHOICE,
            2.0,
            "How quickly do employees adopt new AI tools once introduced?",
            &[
                (0, "Very Slow (6+ months)"),
                (25, "Slow (3-6 months)"),
                (50, "Moderate (1-3 months)"),
                (75, "Fast (2-4 weeks)"),
                (100, "Very Fast (< 2 weeks)"),
            ],
        ),
        (
            "VEL_004",
            Velocity,
            "iteration_speed",
            SCALE,
            2.0,
            "How fast can your organization iterate on AI experiments?",
            &[
                (0, "No Iteration"),
                (25, "Slow"),
                (50, "Moderate"),
                (75, "Fast"),
                (100, "Continuous"),
            ],
        ),
        (
            "VEL_005",
            Velocity,
            "scaling",
            SCALE,
            2.0,
            "How well does your organization scale successful AI pilots?",
            &[
                (0, "Cannot Scale"),
                (25, "Difficult"),
                (50, "Moderate"),
                (75, "Good"),
                (100, "Excellent"),
            ],
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(
            |(index, (code, dimension, subdimension, answer_type, weight, text, options))| {
                Question {
                    code: QuestionCode::new(code),
                    text: text.to_string(),
                    dimension,
                    subdimension: Some(subdimension.to_string()),
                    answer_type,
                    weight,
                    direction: ScoreDirection::Direct,
                    options: options
                        .iter()
                        .map(|(value, label)| AnswerOption {
                            value: *value,
                            label: label.to_string(),
                        })
                        .collect(),
                    display_order: (index + 1) as u16,
                }
            },
        )
        .collect()
}

fn codes(codes: &[&str]) -> Option<Vec<QuestionCode>> {
    Some(codes.iter().map(|code| QuestionCode::new(*code)).collect())
}

fn industries(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn standard_flows() -> Vec<AssessmentFlow> {
    vec![
        AssessmentFlow {
            name: "full_assessment_standard".to_string(),
            assessment_type: AssessmentType::Full,
            industries: Vec::new(),
            question_codes: None,
        },
        AssessmentFlow {
            name: "quick_assessment".to_string(),
            assessment_type: AssessmentType::Quick,
            industries: Vec::new(),
            question_codes: codes(&[
                "IND_001", "IND_005", "LEAD_001", "LEAD_002", "CULT_001", "CULT_002", "EMB_001",
                "EMB_002", "VEL_001", "VEL_002",
            ]),
        },
        AssessmentFlow {
            name: "technology_industry_assessment".to_string(),
            assessment_type: AssessmentType::Full,
            industries: industries(&["technology", "software", "saas"]),
            question_codes: None,
        },
        AssessmentFlow {
            name: "financial_services_assessment".to_string(),
            assessment_type: AssessmentType::Full,
            industries: industries(&["finance", "banking", "insurance", "fintech"]),
            question_codes: codes(&[
                "IND_001", "IND_002", "IND_003", "IND_004", "IND_005", "LEAD_001", "LEAD_002",
                "LEAD_003", "LEAD_004", "LEAD_005", "CULT_001", "CULT_002", "CULT_003",
                "CULT_004", "CULT_005", "EMB_001", "EMB_002", "EMB_003", "EMB_004", "EMB_005",
                "VEL_001", "VEL_002", "VEL_003", "VEL_004", "VEL_005",
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bank_has_twenty_six_weighted_questions() {
        let bank = QuestionBank::standard();
        assert_eq!(bank.questions().len(), 26);
        assert!(bank.questions().iter().all(|question| question.weight > 0.0));

        let skill = bank
            .question(&QuestionCode::new("IND_004"))
            .expect("IND_004 exists");
        assert_eq!(skill.weight, 1.0);
    }

    #[test]
    fn every_dimension_is_represented() {
        let bank = QuestionBank::standard();
        for dimension in Dimension::ordered() {
            assert!(bank
                .questions()
                .iter()
                .any(|question| question.dimension == dimension));
        }
    }

    #[test]
    fn quick_flow_selects_two_questions_per_dimension() {
        let questions =
            QuestionBank::standard().active_questions(AssessmentType::Quick, None);
        assert_eq!(questions.len(), 10);
        for dimension in Dimension::ordered() {
            let count = questions
                .iter()
                .filter(|question| question.dimension == dimension)
                .count();
            assert_eq!(count, 2, "{dimension} should contribute two questions");
        }
    }

    #[test]
    fn industry_flow_wins_over_generic_flow() {
        let bank = QuestionBank::standard();
        let flow = bank
            .flow_for(AssessmentType::Full, Some(" Banking "))
            .expect("flow resolves");
        assert_eq!(flow.name, "financial_services_assessment");

        let questions = bank.active_questions(AssessmentType::Full, Some("banking"));
        assert_eq!(questions.len(), 25);
        assert!(questions
            .iter()
            .all(|question| question.code.as_str() != "IND_006"));
    }

    #[test]
    fn unknown_industry_falls_back_to_standard_flow() {
        let bank = QuestionBank::standard();
        let flow = bank
            .flow_for(AssessmentType::Full, Some("agriculture"))
            .expect("flow resolves");
        assert_eq!(flow.name, "full_assessment_standard");
    }

    #[test]
    fn follow_up_reuses_full_flow() {
        let bank = QuestionBank::standard();
        let questions = bank.active_questions(AssessmentType::FollowUp, None);
        assert_eq!(questions.len(), 26);
    }

    #[test]
    fn active_questions_keep_catalog_order() {
        let questions = QuestionBank::standard().active_questions(AssessmentType::Quick, None);
        let orders: Vec<u16> = questions.iter().map(|q| q.display_order).collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted);
    }
}
