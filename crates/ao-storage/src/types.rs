//! Session, index and provenance record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Artifact type recorded for session files.
pub const ARTIFACT_SESSION: &str = "session";

/// Source type recorded for agent transcripts.
pub const SOURCE_TRANSCRIPT: &str = "transcript";

/// Knowledge extracted from one agent transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Stable identifier, usually taken from the transcript
    #[serde(rename = "session_id")]
    pub id: String,
    #[serde(with = "session_date")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files_changed: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    /// Invocation count per tool name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tool_calls: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "TokenUsage::is_empty")]
    pub tokens: TokenUsage,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transcript_path: String,
}

impl Session {
    pub fn new(id: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            date,
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }
}

/// Token consumption for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
    #[serde(default)]
    pub total: u64,
    /// Counts were estimated rather than reported by the provider
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub estimated: bool,
}

impl TokenUsage {
    pub fn is_empty(&self) -> bool {
        self.input == 0 && self.output == 0 && self.total == 0 && !self.estimated
    }
}

/// One line of the session index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub session_id: String,
    #[serde(with = "session_date")]
    pub date: DateTime<Utc>,
    pub session_path: PathBuf,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl IndexEntry {
    /// Index entry pointing at a written session file
    pub fn for_session(session: &Session, session_path: impl Into<PathBuf>) -> Self {
        Self {
            session_id: session.id.clone(),
            date: session.date,
            session_path: session_path.into(),
            summary: session.summary.clone(),
            tags: Vec::new(),
        }
    }
}

/// Derivation fact: `artifact_path` was produced from `source_path`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub id: String,
    pub artifact_path: String,
    pub artifact_type: String,
    pub source_path: String,
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ProvenanceRecord {
    pub fn new(
        id: impl Into<String>,
        artifact_path: impl Into<String>,
        artifact_type: impl Into<String>,
        source_path: impl Into<String>,
        source_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            artifact_path: artifact_path.into(),
            artifact_type: artifact_type.into(),
            source_path: source_path.into(),
            source_type: source_type.into(),
            session_id: None,
            created_at: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// RFC 3339 on write; RFC 3339 or a bare `YYYY-MM-DD` on read.
mod session_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }
}
