//! Profile snapshot sent to the registration backend
//!
//! A read-only projection of onboarding data, assembled fresh on every agent
//! call and never cached inside a client.

use serde::{Deserialize, Serialize};

/// Snapshot of the user's onboarding profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub name: String,
    pub mobile: String,
    pub state: String,
    pub district: String,
    pub taluka: String,
    /// ISO 639-1 code of the user's selected language
    pub language: String,
    /// Names of verified documents available on the profile
    pub documents: Vec<String>,
}

impl ProfileSnapshot {
    pub fn has_document(&self, name: &str) -> bool {
        self.documents.iter().any(|d| d == name)
    }
}

/// Well-known document names used in profiles and eligibility rules
pub mod documents {
    pub const AADHAAR: &str = "aadhaar";
    pub const BANK_PASSBOOK: &str = "bank_passbook";
    pub const RATION_CARD: &str = "ration_card";
    pub const LAND_RECORD: &str = "land_record";
}
