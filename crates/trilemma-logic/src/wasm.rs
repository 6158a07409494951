//! WASM bindings for browser match replay

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::strategy::describe_strategy;
use crate::{
    calculate_match_count, generate_all_triples, get_triple_for_match, run_match, run_tournament,
    Configs, PayoffMatrix, Registry, Reporter, StrategyBase, StrategyParams,
};

fn js_error(context: &str, e: impl core::fmt::Display) -> JsError {
    JsError::new(&format!("{}: {}", context, e))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_error("Serialization error", e))
}

/// Empty text means the built-in matrix
fn parse_matrix(matrix_text: &str) -> Result<PayoffMatrix, JsError> {
    if matrix_text.trim().is_empty() {
        return Ok(PayoffMatrix::default());
    }
    PayoffMatrix::parse(matrix_text).map_err(|e| js_error("Invalid matrix", e))
}

fn parse_names(names_json: &str) -> Result<Vec<String>, JsError> {
    serde_json::from_str(names_json).map_err(|e| js_error("Invalid names", e))
}

fn parse_base(base: &str) -> Result<StrategyBase, JsError> {
    StrategyBase::ALL
        .into_iter()
        .find(|b| b.name() == base)
        .ok_or_else(|| JsError::new(&format!("Unknown strategy: {}", base)))
}

/// Replay a match with full round-by-round details
///
/// # Arguments
/// * `matrix_text` - payoff matrix records, or empty for the built-in matrix
/// * `configs_text` - whitespace-separated config tokens
/// * `names_json` - JSON array of exactly three strategy names
/// * `steps` - rounds to play
///
/// # Returns
/// JSON serialized MatchResult
#[wasm_bindgen]
pub fn replay_match(
    matrix_text: &str,
    configs_text: &str,
    names_json: &str,
    steps: u32,
) -> Result<JsValue, JsError> {
    let matrix = parse_matrix(matrix_text)?;
    let names = parse_names(names_json)?;
    let configs = Configs::parse(configs_text);

    let result = run_match(&names, &Registry::builtin(), &matrix, &configs, steps)
        .map_err(|e| js_error("Match failed", e))?;
    to_js(&result)
}

/// Replay a whole tournament, returning the JSON serialized TournamentResult
#[wasm_bindgen]
pub fn replay_tournament(
    matrix_text: &str,
    configs_text: &str,
    names_json: &str,
    steps: u32,
) -> Result<JsValue, JsError> {
    let matrix = parse_matrix(matrix_text)?;
    let names = parse_names(names_json)?;
    let configs = Configs::parse(configs_text);

    let registry = Registry::builtin();
    let mut reporter = Reporter::silent();
    let result = run_tournament(&names, &registry, &matrix, &configs, steps, &mut reporter)
        .map_err(|e| js_error("Tournament failed", e))?;
    to_js(&result)
}

/// Get human-readable description of a strategy with optional params JSON
#[wasm_bindgen]
pub fn get_strategy_description(base: &str, params_json: &str) -> Result<String, JsError> {
    let base = parse_base(base)?;
    let params = if params_json.trim().is_empty() {
        StrategyParams::default()
    } else {
        serde_json::from_str(params_json).map_err(|e| js_error("Invalid params", e))?
    };
    Ok(describe_strategy(base, &params))
}

#[derive(serde::Serialize)]
struct StrategyInfo {
    id: &'static str,
    description: String,
}

/// Get all registered strategy names
#[wasm_bindgen]
pub fn get_strategy_types() -> Result<JsValue, JsError> {
    let types: Vec<StrategyInfo> = StrategyBase::ALL
        .into_iter()
        .map(|base| StrategyInfo {
            id: base.name(),
            description: describe_strategy(base, &StrategyParams::default()),
        })
        .collect();
    to_js(&types)
}

#[derive(serde::Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Validate payoff matrix text
///
/// Returns `{valid: true}` or `{valid: false, error: "..."}`.
#[wasm_bindgen]
pub fn validate_matrix(matrix_text: &str) -> JsValue {
    let result = match PayoffMatrix::parse(matrix_text) {
        Ok(_) => ValidationResult { valid: true, error: None },
        Err(e) => ValidationResult { valid: false, error: Some(e.to_string()) },
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Get every triple a tournament of this size plays
#[wasm_bindgen]
pub fn get_tournament_triples(participant_count: u32) -> Result<JsValue, JsError> {
    to_js(&generate_all_triples(participant_count))
}

/// Get the triple played as match `match_index`
#[wasm_bindgen]
pub fn get_match_triple(participant_count: u32, match_index: u32) -> Result<JsValue, JsError> {
    let triple = get_triple_for_match(participant_count, match_index as u64)
        .ok_or_else(|| JsError::new("Match index out of range"))?;
    to_js(&triple)
}

/// Get total match count for a tournament
#[wasm_bindgen]
pub fn get_match_count(participant_count: u32) -> f64 {
    calculate_match_count(participant_count) as f64
}
