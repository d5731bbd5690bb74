//! Core data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored note
///
/// Identity is the `id`, assigned monotonically starting at 1 and never
/// reused. `created_at` is fixed at creation; `updated_at` advances on every
/// successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
}

/// Partial update for a note; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotePatch {
    pub title: Option<String>,
    pub text: Option<String>,
}

/// One page of the note listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    /// Total number of pages available
    pub pages: u64,
    /// Total number of live notes
    pub notes_count: u64,
    /// Notes for the requested page, newest id first
    pub notes: Vec<Note>,
}

/// Current time truncated to millisecond precision.
///
/// Stored timestamps are RFC 3339 with millisecond resolution, so in-memory
/// values are truncated up front to keep a note byte-identical across an
/// encode/decode round trip.
pub(crate) fn now_ms() -> DateTime<Utc> {
    let ms = Utc::now().timestamp_millis();
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}
