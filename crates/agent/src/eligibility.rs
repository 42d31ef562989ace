//! Local PMFBY eligibility evaluation
//!
//! The quick non-conversational check: a local rule gives an immediate
//! verdict while a background `/agent/run` call verifies it against the
//! backend agent. Background sync failures are logged, not surfaced.

use serde_json::Value;

use sahayak_core::profile::documents;
use sahayak_core::{ProfileSnapshot, Result};

use crate::client::RegistrationClient;

/// Answers collected from the user before the check
///
/// `None` means the question was never answered, which keeps the check
/// incomplete rather than counting as a "no".
#[derive(Debug, Clone, Default)]
pub struct EligibilityAnswers {
    /// Cultivator or sharecropper on the insured land
    pub is_cultivator: Option<bool>,
    /// Valid land ownership certificate or tenancy agreement
    pub has_land_documents: Option<bool>,
    /// Crop being insured
    pub crop: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityOutcome {
    /// Not all answers were provided
    Incomplete,
    Eligible,
    NotEligible,
}

/// Evaluate the PMFBY rule against the profile and the user's answers
pub fn evaluate_pmfby(
    profile: &ProfileSnapshot,
    answers: &EligibilityAnswers,
) -> EligibilityOutcome {
    let (Some(is_cultivator), Some(has_land_documents)) =
        (answers.is_cultivator, answers.has_land_documents)
    else {
        return EligibilityOutcome::Incomplete;
    };
    if answers.crop.trim().is_empty() {
        return EligibilityOutcome::Incomplete;
    }

    let eligible = is_cultivator
        && has_land_documents
        && profile.has_document(documents::AADHAAR)
        && profile.has_document(documents::BANK_PASSBOOK);

    if eligible {
        EligibilityOutcome::Eligible
    } else {
        EligibilityOutcome::NotEligible
    }
}

/// Kick the backend agent verification for an eligibility check
pub async fn sync_check(client: &RegistrationClient, profile: &ProfileSnapshot) -> Result<Value> {
    client
        .run("Check my eligibility for PMFBY based on my profile.", profile)
        .await
}
