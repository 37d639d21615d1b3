//! Restoration prompt builder for dropped live sessions.
//!
//! When the realtime connection to the model is lost, the client opens a new
//! one and sends this prompt first so the model can pick the conversation up
//! where it stopped.
//!
//! Layout:
//! ```text
//! === SESSION RESTORATION ===
//! <explanation line>
//!
//! PREVIOUS CONTEXT:
//! {summary}
//!
//! RECENT CONVERSATION:
//! [USER]: ...
//! [GEMINI]: ...
//!
//! INSTRUCTIONS FOR RESUMING:
//! ...
//! ```
//!
//! The context and conversation blocks are omitted when empty. Output depends
//! only on the inputs.

use livesession_types::session::{TranscriptEntry, TranscriptRole};

const HEADER: &str = "=== SESSION RESTORATION ===\n\
This is a continuation of an earlier live conversation whose connection was interrupted.";

const INSTRUCTIONS: &str = "INSTRUCTIONS FOR RESUMING:\n\
1. Read the previous context and the recent conversation before responding.\n\
2. Work out what the user was trying to do and the last point that was discussed.\n\
3. Do not repeat answers that were already given unless the user asks again.\n\
4. Keep the same language, tone, and level of detail as before.\n\
5. Start by confirming the restored context in a single short sentence, using this template:\n\
   \"I'm back. We were talking about <topic>, and the last thing we covered was <last point>.\"\n\
6. Then wait for the user to continue.";

/// Builds restoration prompts and plain transcript text.
pub struct ContextFormatter;

impl ContextFormatter {
    /// Render transcripts as `[USER]: ...` / `[GEMINI]: ...` lines.
    ///
    /// Every non-user role, including `system`, is labelled `GEMINI`.
    pub fn format_transcript(transcripts: &[TranscriptEntry]) -> String {
        transcripts
            .iter()
            .map(|t| {
                let label = match t.role {
                    TranscriptRole::User => "USER",
                    _ => "GEMINI",
                };
                format!("[{label}]: {}", t.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the full restoration prompt from a summary and a transcript window.
    ///
    /// A blank summary is treated as absent.
    pub fn restoration_prompt(summary: Option<&str>, transcripts: &[TranscriptEntry]) -> String {
        let mut sections = Vec::with_capacity(4);
        sections.push(HEADER.to_string());

        if let Some(summary) = summary.filter(|s| !s.trim().is_empty()) {
            sections.push(format!("PREVIOUS CONTEXT:\n{summary}"));
        }

        if !transcripts.is_empty() {
            sections.push(format!(
                "RECENT CONVERSATION:\n{}",
                Self::format_transcript(transcripts)
            ));
        }

        sections.push(INSTRUCTIONS.to_string());
        sections.join("\n\n")
    }
}
