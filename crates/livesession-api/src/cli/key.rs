//! API key CLI commands.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Mint a key for `user` and print it once.
///
/// # Examples
///
/// ```bash
/// livesession key create --user alice
/// livesession key create --user ops --admin --name dashboard
/// ```
pub async fn create_key(state: &AppState, user: &str, admin: bool, name: &str, json: bool) -> Result<()> {
    let key = state.api_keys.create_key(user, name, admin).await?;

    if json {
        let out = serde_json::json!({
            "user_id": user,
            "name": name,
            "is_admin": admin,
            "api_key": key,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} API key for '{}'{} (save this -- it won't be shown again):",
        style("🔑").bold(),
        style(user).cyan(),
        if admin { " [admin]" } else { "" }
    );
    println!();
    println!("  {}", style(&key).yellow().bold());
    println!();
    Ok(())
}
