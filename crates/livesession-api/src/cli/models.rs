//! Model listing CLI command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

/// List models available to the configured key, marking live-capable ones.
pub async fn list_models(state: &AppState, json: bool) -> Result<()> {
    let gemini = state.gemini_config().await;
    let models = state.gateway_service.models(&gemini).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    if models.is_empty() {
        println!();
        if gemini.primary_api_key().is_none() {
            println!(
                "  {} No Gemini API key configured. Set {} or add one to {}.",
                style("!").yellow().bold(),
                style("GEMINI_API_KEY").yellow(),
                style(state.data_dir.join("config.toml").display()).cyan()
            );
        } else {
            println!(
                "  {} No models returned (see -v output for upstream errors).",
                style("i").blue().bold()
            );
        }
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Input").fg(Color::White),
        Cell::new("Output").fg(Color::White),
        Cell::new("Live").fg(Color::White),
    ]);

    for model in &models {
        let live = if model.supports_live {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("-").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(&model.id).fg(Color::Cyan),
            Cell::new(&model.name),
            Cell::new(model.input_token_limit.to_string()).fg(Color::DarkGrey),
            Cell::new(model.output_token_limit.to_string()).fg(Color::DarkGrey),
            live,
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
