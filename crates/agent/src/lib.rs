//! Registration agent integration
//!
//! - [`ConversationSession`]: per-screen-visit conversation state
//! - [`RegistrationClient`]: `/agent/chat` and `/agent/run` backend calls
//! - [`eligibility`]: local PMFBY eligibility rule with background agent sync

pub mod client;
pub mod eligibility;
pub mod session;

pub use client::RegistrationClient;
pub use eligibility::{evaluate_pmfby, EligibilityAnswers, EligibilityOutcome};
pub use session::{ConversationSession, SessionConfig};
