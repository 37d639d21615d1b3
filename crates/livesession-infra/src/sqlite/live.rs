//! SQLite live session repository implementation.
//!
//! Implements `LiveSessionRepository` from `livesession-core` using sqlx with
//! split read/write pools. Transcript appends and session deletes run in a
//! writer transaction so message_count never drifts from the transcript rows.
//!
//! Every statement is also exposed as a `*_in` function over any executor, so
//! a caller can compose several operations inside one transaction opened with
//! [`SqliteLiveRepository::begin`].

use livesession_core::session::repository::LiveSessionRepository;
use livesession_types::error::RepositoryError;
use livesession_types::session::{
    LiveSession, SessionStatus, SessionUpdate, TranscriptEntry, TranscriptRole,
};
use sqlx::sqlite::SqliteConnection;
use sqlx::{Row, Sqlite, SqliteExecutor, Transaction};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `LiveSessionRepository`.
pub struct SqliteLiveRepository {
    pool: DatabasePool,
}

impl SqliteLiveRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Open a transaction on the writer pool.
    ///
    /// The writer has a single connection: repository methods that write
    /// will wait until the returned transaction is committed or dropped.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, RepositoryError> {
        self.pool.writer.begin().await.map_err(query_err)
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    id: String,
    user_id: String,
    title: Option<String>,
    summary: Option<String>,
    status: String,
    model: Option<String>,
    voice: Option<String>,
    message_count: i64,
    last_summary_at: Option<i64>,
    updated_at: i64,
    created_at: i64,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            summary: row.try_get("summary")?,
            status: row.try_get("status")?,
            model: row.try_get("model")?,
            voice: row.try_get("voice")?,
            message_count: row.try_get("message_count")?,
            last_summary_at: row.try_get("last_summary_at")?,
            updated_at: row.try_get("updated_at")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<LiveSession, RepositoryError> {
        let status: SessionStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(LiveSession {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            summary: self.summary,
            status,
            model: self.model,
            voice: self.voice,
            message_count: self.message_count.max(0) as u64,
            last_summary_at: self.last_summary_at,
            updated_at: self.updated_at,
            created_at: self.created_at,
        })
    }
}

struct TranscriptRow {
    id: String,
    session_id: String,
    role: String,
    content: String,
    audio_duration: Option<i64>,
    timestamp: i64,
}

impl TranscriptRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            audio_duration: row.try_get("audio_duration")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_entry(self) -> Result<TranscriptEntry, RepositoryError> {
        let role: TranscriptRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(TranscriptEntry {
            id: self.id,
            session_id: self.session_id,
            role,
            content: self.content,
            audio_duration: self.audio_duration,
            timestamp: self.timestamp,
        })
    }
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::error!(error = %e, "Database connection unavailable");
            RepositoryError::Connection
        }
        _ => RepositoryError::Query(e.to_string()),
    }
}

fn map_session(row: &sqlx::sqlite::SqliteRow) -> Result<LiveSession, RepositoryError> {
    SessionRow::from_row(row).map_err(query_err)?.into_session()
}

fn map_sessions(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<LiveSession>, RepositoryError> {
    rows.iter().map(map_session).collect()
}

fn map_entries(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<TranscriptEntry>, RepositoryError> {
    rows.iter()
        .map(|row| TranscriptRow::from_row(row).map_err(query_err)?.into_entry())
        .collect()
}

// ---------------------------------------------------------------------------
// Executor-generic statements (pool or open transaction)
// ---------------------------------------------------------------------------

/// Insert a fully-built session. A duplicate id is a `Conflict`.
pub async fn create_session_in<'e, E>(
    executor: E,
    session: &LiveSession,
) -> Result<LiveSession, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"INSERT INTO session (id, user_id, title, summary, status, model, voice,
            message_count, last_summary_at, updated_at, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(&session.title)
    .bind(&session.summary)
    .bind(session.status.to_string())
    .bind(&session.model)
    .bind(&session.voice)
    .bind(session.message_count as i64)
    .bind(session.last_summary_at)
    .bind(session.updated_at)
    .bind(session.created_at)
    .execute(executor)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(format!("session '{}' already exists", session.id))
        }
        _ => query_err(e),
    })?;

    Ok(session.clone())
}

pub async fn get_session_in<'e, E>(executor: E, id: &str) -> Result<Option<LiveSession>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT * FROM session WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(query_err)?;

    row.as_ref().map(map_session).transpose()
}

pub async fn list_sessions_in<'e, E>(
    executor: E,
    user_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LiveSession>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "SELECT * FROM session WHERE user_id = ? \
         ORDER BY updated_at DESC, rowid DESC LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(query_err)?;

    map_sessions(&rows)
}

pub async fn get_active_session_in<'e, E>(
    executor: E,
    user_id: &str,
) -> Result<Option<LiveSession>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(
        "SELECT * FROM session WHERE user_id = ? AND status = 'active' \
         ORDER BY updated_at DESC, rowid DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(query_err)?;

    row.as_ref().map(map_session).transpose()
}

/// Apply `update` to the session when `user_id` owns it. `None` means no row matched.
pub async fn update_session_in<'e, E>(
    executor: E,
    id: &str,
    user_id: &str,
    update: &SessionUpdate,
    now: i64,
) -> Result<Option<LiveSession>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(
        r#"UPDATE session SET
               title = COALESCE(?1, title),
               summary = COALESCE(?2, summary),
               status = COALESCE(?3, status),
               last_summary_at = CASE WHEN ?2 IS NULL THEN last_summary_at ELSE ?4 END,
               updated_at = ?4
           WHERE id = ?5 AND user_id = ?6
           RETURNING *"#,
    )
    .bind(&update.title)
    .bind(&update.summary)
    .bind(update.status.map(|s| s.to_string()))
    .bind(now)
    .bind(id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(query_err)?;

    row.as_ref().map(map_session).transpose()
}

/// Atomically bump message_count and refresh updated_at.
pub async fn increment_message_count_in<'e, E>(
    executor: E,
    id: &str,
    now: i64,
) -> Result<Option<LiveSession>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(
        "UPDATE session SET message_count = message_count + 1, updated_at = ? \
         WHERE id = ? RETURNING *",
    )
    .bind(now)
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(query_err)?;

    row.as_ref().map(map_session).transpose()
}

/// Delete an owned session and its transcripts on one connection.
///
/// Not atomic by itself: run it inside a transaction.
pub async fn delete_session_in(
    conn: &mut SqliteConnection,
    id: &str,
    user_id: &str,
) -> Result<bool, RepositoryError> {
    sqlx::query(
        "DELETE FROM transcript WHERE session_id IN \
         (SELECT id FROM session WHERE id = ? AND user_id = ?)",
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *conn)
    .await
    .map_err(query_err)?;

    let result = sqlx::query("DELETE FROM session WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .map_err(query_err)?;

    Ok(result.rows_affected() > 0)
}

/// Bump the parent counter, then insert the entry, on one connection.
///
/// Returns `NotFound` before inserting when the session is missing. Not
/// atomic by itself: run it inside a transaction.
pub async fn add_transcript_in(
    conn: &mut SqliteConnection,
    entry: &TranscriptEntry,
) -> Result<TranscriptEntry, RepositoryError> {
    if increment_message_count_in(&mut *conn, &entry.session_id, entry.timestamp)
        .await?
        .is_none()
    {
        return Err(RepositoryError::NotFound);
    }

    sqlx::query(
        r#"INSERT INTO transcript (id, session_id, role, content, audio_duration, timestamp)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&entry.id)
    .bind(&entry.session_id)
    .bind(entry.role.to_string())
    .bind(&entry.content)
    .bind(entry.audio_duration)
    .bind(entry.timestamp)
    .execute(&mut *conn)
    .await
    .map_err(query_err)?;

    Ok(entry.clone())
}

pub async fn list_transcripts_in<'e, E>(
    executor: E,
    session_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<TranscriptEntry>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "SELECT * FROM transcript WHERE session_id = ? \
         ORDER BY timestamp ASC, rowid ASC LIMIT ? OFFSET ?",
    )
    .bind(session_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(query_err)?;

    map_entries(&rows)
}

/// Newest `limit` entries, returned oldest first.
pub async fn recent_transcripts_in<'e, E>(
    executor: E,
    session_id: &str,
    limit: i64,
) -> Result<Vec<TranscriptEntry>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "SELECT * FROM transcript WHERE session_id = ? \
         ORDER BY timestamp DESC, rowid DESC LIMIT ?",
    )
    .bind(session_id)
    .bind(limit)
    .fetch_all(executor)
    .await
    .map_err(query_err)?;

    let mut entries = map_entries(&rows)?;
    entries.reverse();
    Ok(entries)
}

pub async fn count_transcripts_in<'e, E>(executor: E, session_id: &str) -> Result<u64, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT COUNT(*) AS count FROM transcript WHERE session_id = ?")
        .bind(session_id)
        .fetch_one(executor)
        .await
        .map_err(query_err)?;

    let count: i64 = row.try_get("count").map_err(query_err)?;
    Ok(count.max(0) as u64)
}

/// Entries with a timestamp strictly after `since`, oldest first.
pub async fn transcripts_since_in<'e, E>(
    executor: E,
    session_id: &str,
    since: i64,
) -> Result<Vec<TranscriptEntry>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "SELECT * FROM transcript WHERE session_id = ? AND timestamp > ? \
         ORDER BY timestamp ASC, rowid ASC",
    )
    .bind(session_id)
    .bind(since)
    .fetch_all(executor)
    .await
    .map_err(query_err)?;

    map_entries(&rows)
}

/// Remove every transcript of a session. message_count is left as is.
pub async fn delete_transcripts_in<'e, E>(executor: E, session_id: &str) -> Result<bool, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM transcript WHERE session_id = ?")
        .bind(session_id)
        .execute(executor)
        .await
        .map_err(query_err)?;

    Ok(true)
}

impl LiveSessionRepository for SqliteLiveRepository {
    async fn create_session(&self, session: &LiveSession) -> Result<LiveSession, RepositoryError> {
        create_session_in(&self.pool.writer, session).await
    }

    async fn get_session(&self, id: &str) -> Result<Option<LiveSession>, RepositoryError> {
        get_session_in(&self.pool.reader, id).await
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LiveSession>, RepositoryError> {
        list_sessions_in(&self.pool.reader, user_id, limit, offset).await
    }

    async fn get_active_session(&self, user_id: &str) -> Result<Option<LiveSession>, RepositoryError> {
        get_active_session_in(&self.pool.reader, user_id).await
    }

    async fn update_session(
        &self,
        id: &str,
        user_id: &str,
        update: &SessionUpdate,
        now: i64,
    ) -> Result<Option<LiveSession>, RepositoryError> {
        update_session_in(&self.pool.writer, id, user_id, update, now).await
    }

    async fn increment_message_count(
        &self,
        id: &str,
        now: i64,
    ) -> Result<Option<LiveSession>, RepositoryError> {
        increment_message_count_in(&self.pool.writer, id, now).await
    }

    async fn delete_session(&self, id: &str, user_id: &str) -> Result<bool, RepositoryError> {
        let mut tx = self.begin().await?;
        let deleted = delete_session_in(&mut tx, id, user_id).await?;
        tx.commit().await.map_err(query_err)?;
        Ok(deleted)
    }

    async fn add_transcript(&self, entry: &TranscriptEntry) -> Result<TranscriptEntry, RepositoryError> {
        let mut tx = self.begin().await?;
        // An early return drops `tx`, which rolls it back.
        let entry = add_transcript_in(&mut tx, entry).await?;
        tx.commit().await.map_err(query_err)?;
        Ok(entry)
    }

    async fn list_transcripts(
        &self,
        session_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TranscriptEntry>, RepositoryError> {
        list_transcripts_in(&self.pool.reader, session_id, limit, offset).await
    }

    async fn recent_transcripts(
        &self,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<TranscriptEntry>, RepositoryError> {
        recent_transcripts_in(&self.pool.reader, session_id, limit).await
    }

    async fn count_transcripts(&self, session_id: &str) -> Result<u64, RepositoryError> {
        count_transcripts_in(&self.pool.reader, session_id).await
    }

    async fn transcripts_since(
        &self,
        session_id: &str,
        since: i64,
    ) -> Result<Vec<TranscriptEntry>, RepositoryError> {
        transcripts_since_in(&self.pool.reader, session_id, since).await
    }

    async fn delete_transcripts(&self, session_id: &str) -> Result<bool, RepositoryError> {
        delete_transcripts_in(&self.pool.writer, session_id).await
    }
}
