//! Session inspection CLI commands: list, transcript, restoration context.
//!
//! These read the local database directly and act on behalf of the given
//! user, so the same ownership rules as the REST API apply.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use livesession_types::session::{SessionStatus, TranscriptRole};

use crate::state::AppState;

/// List a user's sessions with status, message count, and last activity.
///
/// # Examples
///
/// ```bash
/// livesession sessions alice
/// livesession sessions alice --limit 10 --json
/// ```
pub async fn list_sessions(state: &AppState, user: &str, limit: i64, json: bool) -> Result<()> {
    let sessions = state.session_service.list_sessions(user, limit, 0).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions found for '{}'.",
            style("i").blue().bold(),
            style(user).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for session in &sessions {
        let title = session.title.as_deref().unwrap_or("(untitled)");
        let title_display = if title.chars().count() > 40 {
            format!("{}...", title.chars().take(37).collect::<String>())
        } else {
            title.to_string()
        };

        let status_cell = match session.status {
            SessionStatus::Active => Cell::new("active").fg(Color::Green),
            SessionStatus::Timeout => Cell::new("timeout").fg(Color::Yellow),
            SessionStatus::Ended => Cell::new("ended").fg(Color::DarkGrey),
        };

        table.add_row(vec![
            Cell::new(&session.id).fg(Color::DarkGrey),
            Cell::new(title_display).fg(Color::Cyan),
            status_cell,
            Cell::new(session.message_count.to_string()).fg(Color::White),
            Cell::new(format_epoch(session.updated_at)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("  Sessions for '{}'", style(user).cyan().bold());
    println!("{table}");
    println!();
    Ok(())
}

/// Print a session's transcript, oldest first.
pub async fn show_transcript(
    state: &AppState,
    session_id: &str,
    user: &str,
    limit: i64,
    json: bool,
) -> Result<()> {
    let transcripts = state
        .session_service
        .list_transcripts(session_id, user, limit, 0)
        .await
        .with_context(|| format!("Cannot read transcript of session '{session_id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&transcripts)?);
        return Ok(());
    }

    println!();
    if transcripts.is_empty() {
        println!("  {} No transcript entries yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    for entry in &transcripts {
        let label = match entry.role {
            TranscriptRole::User => style("user").green().bold(),
            TranscriptRole::Assistant => style("assistant").magenta().bold(),
            TranscriptRole::System => style("system").dim(),
        };
        println!(
            "  {} {} {}",
            style(format_epoch(entry.timestamp)).dim(),
            label,
            entry.content
        );
    }
    println!();
    Ok(())
}

/// Print the restoration prompt a client would send after a dropped connection.
pub async fn show_context(
    state: &AppState,
    session_id: &str,
    user: &str,
    limit: i64,
    json: bool,
) -> Result<()> {
    let context = state
        .session_service
        .restoration_context(session_id, user, limit)
        .await
        .with_context(|| format!("Cannot build context for session '{session_id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&context)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} of {} entries included",
        style("↺").cyan().bold(),
        context.transcripts.len(),
        context.transcript_count
    );
    println!();
    println!("{}", context.context_prompt);
    println!();
    Ok(())
}

fn format_epoch(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
