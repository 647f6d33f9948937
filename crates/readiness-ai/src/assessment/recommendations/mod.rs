pub mod content;
mod filter;
mod plan;

pub use content::{DimensionPlaybook, Effort, PlaybookAction, Priority, RecommendationCategory};
pub use filter::RecommendationQuery;
pub use plan::{Recommendation, RecommendationGenerator, RecommendationPlan};
