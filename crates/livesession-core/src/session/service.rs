//! Live session service: ownership rules and transcript bookkeeping.
//!
//! `LiveSessionService` sits between the HTTP/CLI layers and the repository.
//! It generates ids and timestamps, validates client input before any write,
//! and checks that the caller owns the session for every read or mutation.

use chrono::Utc;
use livesession_types::config::GeminiConfig;
use livesession_types::error::LiveSessionError;
use livesession_types::session::{
    CreateSessionRequest, CreateTranscriptRequest, LiveSession, RestorationContext,
    SessionStatus, SessionUpdate, TranscriptEntry, TranscriptRole, UpdateSessionRequest,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::ContextFormatter;
use crate::session::repository::LiveSessionRepository;

/// Default page size for session listings.
pub const DEFAULT_SESSION_LIMIT: i64 = 50;
/// Default page size for transcript listings.
pub const DEFAULT_TRANSCRIPT_LIMIT: i64 = 100;
/// Default transcript window used for context restoration.
pub const DEFAULT_RECENT_LIMIT: i64 = 50;

/// Orchestrates session lifecycle and transcript persistence.
///
/// Generic over `LiveSessionRepository` to maintain clean architecture
/// (livesession-core never depends on livesession-infra).
pub struct LiveSessionService<R: LiveSessionRepository> {
    repo: R,
}

impl<R: LiveSessionRepository> LiveSessionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // --- Sessions ---

    /// Open a new `active` session for `user_id`.
    ///
    /// A requested voice must be one of the configured live voices.
    pub async fn create_session(
        &self,
        user_id: &str,
        request: CreateSessionRequest,
        gemini: &GeminiConfig,
    ) -> Result<LiveSession, LiveSessionError> {
        if let Some(voice) = request.voice.as_deref() {
            if !gemini.is_supported_voice(voice) {
                return Err(LiveSessionError::Validation(format!(
                    "Invalid voice. Must be one of: {}",
                    gemini.live_voices.join(", ")
                )));
            }
        }

        let now = now();
        let session = LiveSession {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            title: None,
            summary: None,
            status: SessionStatus::Active,
            model: request.model,
            voice: request.voice,
            message_count: 0,
            last_summary_at: None,
            updated_at: now,
            created_at: now,
        };

        let session = self.repo.create_session(&session).await?;
        info!(session_id = %session.id, user_id = %user_id, "Live session created");
        Ok(session)
    }

    /// Get a session by id regardless of owner.
    pub async fn get_session(&self, id: &str) -> Result<LiveSession, LiveSessionError> {
        self.repo
            .get_session(id)
            .await?
            .ok_or(LiveSessionError::NotFound)
    }

    /// Get a session, failing with `Forbidden` if `user_id` is not the owner.
    pub async fn get_owned_session(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<LiveSession, LiveSessionError> {
        let session = self.get_session(id).await?;
        if !session.is_owned_by(user_id) {
            debug!(session_id = %id, user_id = %user_id, "Session access denied");
            return Err(LiveSessionError::Forbidden);
        }
        Ok(session)
    }

    /// List the user's sessions, most recently updated first.
    pub async fn list_sessions(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LiveSession>, LiveSessionError> {
        check_page(limit, offset)?;
        Ok(self.repo.list_sessions(user_id, limit, offset).await?)
    }

    /// The user's most recently updated `active` session, if any.
    pub async fn get_active_session(
        &self,
        user_id: &str,
    ) -> Result<Option<LiveSession>, LiveSessionError> {
        Ok(self.repo.get_active_session(user_id).await?)
    }

    /// Apply a partial update. Unknown status values are rejected before
    /// anything is written; a non-owner gets `Forbidden` and the record is
    /// left unchanged.
    pub async fn update_session(
        &self,
        id: &str,
        user_id: &str,
        request: UpdateSessionRequest,
    ) -> Result<LiveSession, LiveSessionError> {
        let status = request
            .status
            .as_deref()
            .map(str::parse::<SessionStatus>)
            .transpose()
            .map_err(LiveSessionError::Validation)?;

        let update = SessionUpdate {
            title: request.title,
            summary: request.summary,
            status,
        };

        match self.repo.update_session(id, user_id, &update, now()).await? {
            Some(session) => {
                info!(session_id = %id, "Live session updated");
                Ok(session)
            }
            // Nothing owned by the caller matched: tell missing from foreign.
            None => match self.repo.get_session(id).await? {
                Some(_) => Err(LiveSessionError::Forbidden),
                None => Err(LiveSessionError::NotFound),
            },
        }
    }

    /// Bump the session's message counter by one.
    pub async fn increment_message_count(&self, id: &str) -> Result<LiveSession, LiveSessionError> {
        self.repo
            .increment_message_count(id, now())
            .await?
            .ok_or(LiveSessionError::NotFound)
    }

    /// Delete a session and all of its transcripts.
    pub async fn delete_session(&self, id: &str, user_id: &str) -> Result<(), LiveSessionError> {
        self.get_owned_session(id, user_id).await?;
        if !self.repo.delete_session(id, user_id).await? {
            return Err(LiveSessionError::NotFound);
        }
        info!(session_id = %id, "Live session deleted");
        Ok(())
    }

    // --- Transcripts ---

    /// Append one turn to a session owned by `user_id`.
    ///
    /// The repository increments the session's message_count in the same
    /// transaction as the insert.
    pub async fn add_transcript(
        &self,
        user_id: &str,
        request: CreateTranscriptRequest,
    ) -> Result<TranscriptEntry, LiveSessionError> {
        let role: TranscriptRole = request
            .role
            .parse()
            .map_err(LiveSessionError::Validation)?;
        if matches!(request.audio_duration, Some(ms) if ms < 0) {
            return Err(LiveSessionError::Validation(
                "audio_duration must not be negative".to_string(),
            ));
        }

        self.get_owned_session(&request.session_id, user_id).await?;

        let entry = TranscriptEntry {
            id: Uuid::now_v7().to_string(),
            session_id: request.session_id,
            role,
            content: request.content,
            audio_duration: request.audio_duration,
            timestamp: now(),
        };

        let entry = self.repo.add_transcript(&entry).await?;
        debug!(session_id = %entry.session_id, role = %entry.role, "Transcript appended");
        Ok(entry)
    }

    /// Page through a session's transcripts, oldest first.
    pub async fn list_transcripts(
        &self,
        session_id: &str,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TranscriptEntry>, LiveSessionError> {
        check_page(limit, offset)?;
        self.get_owned_session(session_id, user_id).await?;
        Ok(self.repo.list_transcripts(session_id, limit, offset).await?)
    }

    /// The last `limit` turns of the conversation, oldest first.
    pub async fn recent_transcripts(
        &self,
        session_id: &str,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<TranscriptEntry>, LiveSessionError> {
        check_page(limit, 0)?;
        self.get_owned_session(session_id, user_id).await?;
        Ok(self.repo.recent_transcripts(session_id, limit).await?)
    }

    pub async fn count_transcripts(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<u64, LiveSessionError> {
        self.get_owned_session(session_id, user_id).await?;
        Ok(self.repo.count_transcripts(session_id).await?)
    }

    /// Turns recorded strictly after `since` (epoch seconds), oldest first.
    pub async fn transcripts_since(
        &self,
        session_id: &str,
        user_id: &str,
        since: i64,
    ) -> Result<Vec<TranscriptEntry>, LiveSessionError> {
        self.get_owned_session(session_id, user_id).await?;
        Ok(self.repo.transcripts_since(session_id, since).await?)
    }

    /// Drop every transcript of a session while keeping the session itself.
    pub async fn delete_transcripts(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<(), LiveSessionError> {
        self.get_owned_session(session_id, user_id).await?;
        self.repo.delete_transcripts(session_id).await?;
        info!(session_id = %session_id, "Transcripts cleared");
        Ok(())
    }

    /// Summary, recent turns, and a ready-made restoration prompt.
    pub async fn restoration_context(
        &self,
        session_id: &str,
        user_id: &str,
        transcript_limit: i64,
    ) -> Result<RestorationContext, LiveSessionError> {
        check_page(transcript_limit, 0)?;
        let session = self.get_owned_session(session_id, user_id).await?;
        let transcripts = self
            .repo
            .recent_transcripts(session_id, transcript_limit)
            .await?;
        let transcript_count = self.repo.count_transcripts(session_id).await?;

        let context_prompt =
            ContextFormatter::restoration_prompt(session.summary.as_deref(), &transcripts);

        Ok(RestorationContext {
            session_id: session.id,
            summary: session.summary,
            transcripts,
            transcript_count,
            context_prompt,
        })
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

/// Reject negative paging values (SQLite treats a negative LIMIT as unbounded).
fn check_page(limit: i64, offset: i64) -> Result<(), LiveSessionError> {
    if limit < 0 {
        return Err(LiveSessionError::Validation(format!(
            "limit must not be negative, got {limit}"
        )));
    }
    if offset < 0 {
        return Err(LiveSessionError::Validation(format!(
            "offset must not be negative, got {offset}"
        )));
    }
    Ok(())
}
