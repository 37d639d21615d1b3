//! Reshaping of upstream model listings into the client-facing catalog.

use livesession_types::gateway::{LiveModelInfo, ModelInfo, RawModel};

const MODEL_PREFIX: &str = "models/";
const GENERATE_CONTENT: &str = "generateContent";

/// Convert raw upstream models into `ModelInfo`s.
///
/// A model is live-capable when any configured live model id occurs in its
/// id. Models that can neither generate content nor go live are dropped.
pub fn build_catalog(raw: &[RawModel], live_models: &[String]) -> Vec<ModelInfo> {
    raw.iter()
        .filter_map(|model| {
            let id = model
                .name
                .strip_prefix(MODEL_PREFIX)
                .unwrap_or(&model.name)
                .to_string();

            let supports_live = live_models.iter().any(|live| id.contains(live.as_str()));
            let generates = model
                .supported_generation_methods
                .iter()
                .any(|m| m == GENERATE_CONTENT);
            if !generates && !supports_live {
                return None;
            }

            Some(ModelInfo {
                name: model.display_name.clone().unwrap_or_else(|| id.clone()),
                description: model.description.clone().unwrap_or_default(),
                input_token_limit: model.input_token_limit.unwrap_or(0),
                output_token_limit: model.output_token_limit.unwrap_or(0),
                supports_live,
                id,
            })
        })
        .collect()
}

/// One entry per configured live model.
pub fn live_catalog(live_models: &[String]) -> Vec<LiveModelInfo> {
    live_models
        .iter()
        .map(|id| LiveModelInfo {
            id: id.clone(),
            name: display_name(id),
            supports_live: true,
        })
        .collect()
}

/// `gemini-2.0-flash-live-001` -> `Gemini 2.0 Flash Live 001`.
///
/// Dashes become spaces; the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased.
pub fn display_name(model_id: &str) -> String {
    let mut out = String::with_capacity(model_id.len());
    let mut prev_alpha = false;
    for c in model_id.replace('-', " ").chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
