//! LiveSessionRepository trait definition.
//!
//! Provides CRUD operations for live sessions and their transcripts.
//! Implementations receive fully-built records; ids and timestamps are
//! generated by the service layer.

use livesession_types::error::RepositoryError;
use livesession_types::session::{LiveSession, SessionUpdate, TranscriptEntry};

/// Repository trait for session and transcript persistence.
///
/// Implementations live in livesession-infra (e.g., `SqliteLiveRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait LiveSessionRepository: Send + Sync {
    /// Insert a new session.
    fn create_session(
        &self,
        session: &LiveSession,
    ) -> impl std::future::Future<Output = Result<LiveSession, RepositoryError>> + Send;

    /// Get a session by its unique ID.
    fn get_session(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<LiveSession>, RepositoryError>> + Send;

    /// List a user's sessions, ordered by updated_at DESC.
    fn list_sessions(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<Vec<LiveSession>, RepositoryError>> + Send;

    /// The user's most recently updated session with status `active`.
    fn get_active_session(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<LiveSession>, RepositoryError>> + Send;

    /// Apply a partial update to a session owned by `user_id`.
    ///
    /// Returns `None` when no session with that id is owned by `user_id`;
    /// the stored record is left unchanged in that case. Setting a summary
    /// also sets `last_summary_at = now`; `updated_at` is always set to `now`.
    fn update_session(
        &self,
        id: &str,
        user_id: &str,
        update: &SessionUpdate,
        now: i64,
    ) -> impl std::future::Future<Output = Result<Option<LiveSession>, RepositoryError>> + Send;

    /// Atomically increment message_count and set updated_at.
    fn increment_message_count(
        &self,
        id: &str,
        now: i64,
    ) -> impl std::future::Future<Output = Result<Option<LiveSession>, RepositoryError>> + Send;

    /// Delete a session owned by `user_id` together with its transcripts.
    ///
    /// Returns `false` when nothing owned by `user_id` matched.
    fn delete_session(
        &self,
        id: &str,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Insert a transcript entry and bump the parent session's message_count
    /// as one unit. Fails with `NotFound` if the session does not exist.
    fn add_transcript(
        &self,
        entry: &TranscriptEntry,
    ) -> impl std::future::Future<Output = Result<TranscriptEntry, RepositoryError>> + Send;

    /// Transcripts for a session, oldest first.
    fn list_transcripts(
        &self,
        session_id: &str,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<Vec<TranscriptEntry>, RepositoryError>> + Send;

    /// The newest `limit` transcripts, returned oldest first.
    fn recent_transcripts(
        &self,
        session_id: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<TranscriptEntry>, RepositoryError>> + Send;

    /// Number of stored transcripts for a session.
    fn count_transcripts(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Transcripts with timestamp strictly greater than `since`, oldest first.
    fn transcripts_since(
        &self,
        session_id: &str,
        since: i64,
    ) -> impl std::future::Future<Output = Result<Vec<TranscriptEntry>, RepositoryError>> + Send;

    /// Remove every transcript of a session. The session row is kept.
    fn delete_transcripts(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
