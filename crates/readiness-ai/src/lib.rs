//! Adaptive AI-readiness assessment engine.
//!
//! The [`assessment`] module holds the engine itself: the question bank, the session state
//! machine that picks the next question, the weighted scoring rules, the analytics aggregator,
//! and the recommendation generator. Persistence, routing, and delivery concerns sit behind the
//! traits in [`assessment::repository`] so the engine stays synchronous and testable in memory.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
