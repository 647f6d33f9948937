use serde::{Deserialize, Serialize};

use crate::assessment::domain::Dimension;

/// Urgency of a recommendation, declared from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Training,
    Strategy,
    Culture,
    Process,
    Tools,
}

impl RecommendationCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Strategy => "strategy",
            Self::Culture => "culture",
            Self::Process => "process",
            Self::Tools => "tools",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "training" => Some(Self::Training),
            "strategy" => Some(Self::Strategy),
            "culture" => Some(Self::Culture),
            "process" => Some(Self::Process),
            "tools" => Some(Self::Tools),
            _ => None,
        }
    }
}

/// Static per-dimension effort tag used for bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookAction {
    pub title: String,
    pub action: String,
    pub resources: Vec<String>,
}

/// Remediation content for one dimension: `foundational` for weak scores, `developing`
/// for middling ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionPlaybook {
    pub dimension: Dimension,
    pub category: RecommendationCategory,
    pub effort: Effort,
    pub foundational: PlaybookAction,
    pub developing: PlaybookAction,
}

pub(crate) fn standard_playbooks() -> Vec<DimensionPlaybook> {
    vec![
        DimensionPlaybook {
            dimension: Dimension::Individual,
            category: RecommendationCategory::Training,
            effort: Effort::Medium,
            foundational: action(
                "Launch AI Literacy Program",
                "Roll out baseline AI literacy training covering core concepts, everyday tools and responsible use.",
                &[
                    "AI Fundamentals Course",
                    "Prompt Writing Workshop",
                    "AI Tools Starter Kit",
                ],
            ),
            developing: action(
                "Advanced AI Skills Development",
                "Build role-specific AI skills through hands-on projects and peer mentoring.",
                &[
                    "Applied AI Project Sprints",
                    "AI Mentorship Program",
                    "Role-Based AI Playbooks",
                ],
            ),
        },
        DimensionPlaybook {
            dimension: Dimension::Leadership,
            category: RecommendationCategory::Strategy,
            effort: Effort::Medium,
            foundational: action(
                "Executive AI Immersion",
                "Align the leadership team on AI opportunities, risks and a shared strategic direction.",
                &[
                    "Executive AI Briefing Series",
                    "AI Strategy Canvas",
                    "Peer Executive Roundtables",
                ],
            ),
            developing: action(
                "Visible AI Leadership",
                "Have leaders sponsor pilots publicly and model AI use in their own work.",
                &[
                    "Leadership AI Showcase",
                    "Sponsor Playbook",
                    "Quarterly AI Town Halls",
                ],
            ),
        },
        DimensionPlaybook {
            dimension: Dimension::Cultural,
            category: RecommendationCategory::Culture,
            effort: Effort::Low,
            foundational: action(
                "Build Psychological Safety for AI",
                "Create explicit permission to experiment with AI and to share failures without penalty.",
                &[
                    "Team Safety Workshop",
                    "Experiment Charter Template",
                    "Failure Retrospective Guide",
                ],
            ),
            developing: action(
                "AI Community of Practice",
                "Stand up a cross-functional community that shares use cases, prompts and lessons learned.",
                &[
                    "Community Launch Kit",
                    "Use Case Library",
                    "Monthly Show and Tell",
                ],
            ),
        },
        DimensionPlaybook {
            dimension: Dimension::Embedding,
            category: RecommendationCategory::Process,
            effort: Effort::High,
            foundational: action(
                "AI Process Assessment",
                "Map core workflows and identify where AI can be integrated with measurable value.",
                &[
                    "Process Mapping Toolkit",
                    "AI Opportunity Matrix",
                    "Governance Starter Framework",
                ],
            ),
            developing: action(
                "AI Integration Roadmap",
                "Sequence the integration of AI into core systems with owners, standards and success metrics.",
                &[
                    "Integration Roadmap Template",
                    "AI Standards Handbook",
                    "Value Tracking Dashboard",
                ],
            ),
        },
        DimensionPlaybook {
            dimension: Dimension::Velocity,
            category: RecommendationCategory::Tools,
            effort: Effort::Low,
            foundational: action(
                "Streamline AI Approval Process",
                "Replace ad hoc sign-offs with a lightweight, time-boxed approval path for AI tools.",
                &[
                    "Fast-Track Approval Checklist",
                    "Pre-Approved Tool Catalog",
                    "Risk Tiering Guide",
                ],
            ),
            developing: action(
                "AI Sandbox Environment",
                "Provide a governed sandbox where teams can trial AI tools and move winners to production quickly.",
                &[
                    "Sandbox Setup Guide",
                    "Pilot-to-Production Checklist",
                    "Adoption Metrics Template",
                ],
            ),
        },
    ]
}

fn action(title: &str, text: &str, resources: &[&str]) -> PlaybookAction {
    PlaybookAction {
        title: title.to_string(),
        action: text.to_string(),
        resources: resources.iter().map(|name| name.to_string()).collect(),
    }
}
