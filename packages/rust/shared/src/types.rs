//! Core domain types for kbload knowledge bases.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field separator used by KB source files unless configured otherwise.
pub const DEFAULT_DELIMITER: &str = "---";

// ---------------------------------------------------------------------------
// KbId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for knowledge base identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KbId(pub Uuid);

impl KbId {
    /// Generate a new time-sortable KB identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for KbId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for KbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for KbId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// KbRecord
// ---------------------------------------------------------------------------

/// Stored metadata for one knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbRecord {
    /// Unique identifier for this KB.
    pub id: KbId,
    /// Unique human-readable name; the lookup key for every operation.
    pub name: String,
    /// Free-text description (may be empty).
    pub description: String,
    /// When the KB was first created.
    pub created_at: DateTime<Utc>,
    /// When the KB metadata was last written.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// KbEntry
// ---------------------------------------------------------------------------

/// One key → value mapping belonging to a KB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbEntry {
    pub key: String,
    pub value: String,
}

impl KbEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoadRequest
// ---------------------------------------------------------------------------

/// A validated request to load one file into one KB.
///
/// Built once per invocation by the CLI; help requests are answered during
/// argument parsing and never produce a `LoadRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Source file, already checked to exist.
    pub file_path: PathBuf,
    /// Target KB name (trimmed, non-empty).
    pub kb_name: String,
    /// Description to store on the KB record.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kb_id_display_and_parse() {
        let id = KbId::new();
        let parsed: KbId = id.to_string().parse().expect("parse kb id");
        assert_eq!(id, parsed);
    }

    #[test]
    fn kb_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<KbId>().is_err());
    }

    #[test]
    fn kb_ids_are_time_sortable() {
        let a = KbId::new();
        let b = KbId::new();
        assert!(a.0 <= b.0);
    }
}
