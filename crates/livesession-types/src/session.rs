//! Live session and transcript types.
//!
//! A `LiveSession` is one realtime conversation window owned by a single
//! user. Every conversational turn is recorded as a `TranscriptEntry` so the
//! conversation can be restored after the realtime connection drops.
//!
//! All timestamps are integer epoch seconds.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a live session.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('active', 'timeout', 'ended'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Timeout,
    Ended,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Timeout => write!(f, "timeout"),
            SessionStatus::Ended => write!(f, "ended"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "timeout" => Ok(SessionStatus::Timeout),
            "ended" => Ok(SessionStatus::Ended),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// Speaker of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for TranscriptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptRole::User => write!(f, "user"),
            TranscriptRole::Assistant => write!(f, "assistant"),
            TranscriptRole::System => write!(f, "system"),
        }
    }
}

impl FromStr for TranscriptRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TranscriptRole::User),
            "assistant" => Ok(TranscriptRole::Assistant),
            "system" => Ok(TranscriptRole::System),
            other => Err(format!("invalid transcript role: '{other}'")),
        }
    }
}

/// A live conversation session owned by one user.
///
/// `message_count` tracks the number of transcript entries appended to the
/// session and only ever grows; `updated_at` is refreshed on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveSession {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    /// Rolling summary of the conversation so far.
    pub summary: Option<String>,
    pub status: SessionStatus,
    pub model: Option<String>,
    pub voice: Option<String>,
    pub message_count: u64,
    /// When `summary` was last written.
    pub last_summary_at: Option<i64>,
    pub updated_at: i64,
    pub created_at: i64,
}

impl LiveSession {
    /// Whether `user_id` owns this session.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// One recorded turn of dialogue within a session.
///
/// Entries are immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: String,
    pub session_id: String,
    pub role: TranscriptRole,
    pub content: String,
    /// Duration of the spoken audio in milliseconds, if the turn was audio.
    pub audio_duration: Option<i64>,
    pub timestamp: i64,
}

/// Partial update applied to a session. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub status: Option<SessionStatus>,
}

/// Request to open a new session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub model: Option<String>,
    pub voice: Option<String>,
}

/// Partial update as submitted by a client; `status` is validated on use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
}

/// A transcript turn as submitted by a client; `role` is validated on use.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTranscriptRequest {
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub audio_duration: Option<i64>,
}

/// Everything a client needs to re-establish a dropped live conversation.
#[derive(Debug, Clone, Serialize)]
pub struct RestorationContext {
    pub session_id: String,
    pub summary: Option<String>,
    pub transcripts: Vec<TranscriptEntry>,
    /// Total entries stored for the session, not just the returned window.
    pub transcript_count: u64,
    pub context_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_roundtrip() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Timeout,
            SessionStatus::Ended,
        ] {
            let s = status.to_string();
            let parsed: SessionStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_session_status_rejects_unknown() {
        let err = "paused".parse::<SessionStatus>().unwrap_err();
        assert!(err.contains("paused"));
    }

    #[test]
    fn test_session_status_default() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn test_transcript_role_parse_is_case_insensitive() {
        assert_eq!("USER".parse::<TranscriptRole>().unwrap(), TranscriptRole::User);
        assert_eq!(
            "Assistant".parse::<TranscriptRole>().unwrap(),
            TranscriptRole::Assistant
        );
        assert!("gemini".parse::<TranscriptRole>().is_err());
    }

    #[test]
    fn test_live_session_serialize() {
        let session = LiveSession {
            id: "s-1".to_string(),
            user_id: "u-1".to_string(),
            title: None,
            summary: Some("talked about rust".to_string()),
            status: SessionStatus::Timeout,
            model: Some("gemini-2.0-flash-live-001".to_string()),
            voice: Some("Puck".to_string()),
            message_count: 3,
            last_summary_at: Some(1_700_000_000),
            updated_at: 1_700_000_000,
            created_at: 1_699_999_000,
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"status\":\"timeout\""));
        assert!(json.contains("\"message_count\":3"));
        assert!(session.is_owned_by("u-1"));
        assert!(!session.is_owned_by("u-2"));
    }
}
