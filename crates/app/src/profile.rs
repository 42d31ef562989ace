//! Profile snapshot loading for the terminal harness
//!
//! The onboarding profile normally lives in the host application; here it is
//! read once from a JSON file at startup.

use std::path::Path;

use anyhow::Context;
use parking_lot::Mutex;

use sahayak_core::{ProfileSnapshot, ProfileSource};

pub struct FileProfileSource {
    snapshot: Mutex<ProfileSnapshot>,
}

impl FileProfileSource {
    /// Load the snapshot from a JSON file; a missing file yields an empty
    /// profile so generic sessions still work
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let snapshot = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read profile file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("malformed profile file {}", path.display()))?
        } else {
            tracing::warn!(path = %path.display(), "profile file not found, using empty profile");
            ProfileSnapshot::default()
        };
        Ok(Self {
            snapshot: Mutex::new(snapshot),
        })
    }
}

impl ProfileSource for FileProfileSource {
    fn snapshot(&self) -> ProfileSnapshot {
        self.snapshot.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_profile() {
        let source = FileProfileSource::load("/nonexistent/profile.json").unwrap();
        assert!(source.snapshot().name.is_empty());
    }

    #[test]
    fn json_profile_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"name":"Sunita","mobile":"9876543210","state":"Maharashtra",
               "district":"Nashik","taluka":"Dindori","language":"mr",
               "documents":["aadhaar","bank_passbook"]}"#,
        )
        .unwrap();

        let source = FileProfileSource::load(&path).unwrap();
        let snapshot = source.snapshot();
        assert_eq!(snapshot.district, "Nashik");
        assert!(snapshot.has_document("aadhaar"));
    }
}
