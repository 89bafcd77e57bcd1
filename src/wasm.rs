//! WASM bindings for browser extension.

use wasm_bindgen::prelude::*;

use crate::entry_ranker::{
    add_url, rank_entries, AddUrlOutput, RankInput, RankedMatches, VaultEntry,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Entry Ranker WASM Bindings
// ═══════════════════════════════════════════════════════════════════════════════

/// Rank vault entries against the AutoFill candidate domains.
///
/// Takes a JsValue (RankInput) and returns a JsValue (RankedMatches).
#[wasm_bindgen(js_name = rankEntries)]
pub fn rank_entries_js(input: JsValue) -> Result<JsValue, JsValue> {
    let input: RankInput = serde_wasm_bindgen::from_value(input)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse input: {}", e)))?;

    let output: RankedMatches = rank_entries(input);

    serde_wasm_bindgen::to_value(&output)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize output: {}", e)))
}

/// Rank entries using JSON strings (alternative API).
///
/// Takes a JSON string and returns a JSON string.
#[wasm_bindgen(js_name = rankEntriesJson)]
pub fn rank_entries_json_js(input_json: &str) -> Result<String, JsValue> {
    crate::entry_ranker::rank_entries_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Ranking failed: {}", e)))
}

/// Append a URL association to an entry after a successful fill.
///
/// Takes a JsValue (VaultEntry) and the new URL; returns a JsValue
/// (AddUrlOutput) carrying the mutation flag and the updated entry. When
/// `mutated` is false the entry came back untouched and the caller skips
/// the vault save; otherwise it persists the entry.
#[wasm_bindgen(js_name = addEntryUrl)]
pub fn add_entry_url_js(entry: JsValue, new_url: &str) -> Result<JsValue, JsValue> {
    let mut entry: VaultEntry = serde_wasm_bindgen::from_value(entry)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse entry: {}", e)))?;

    let mutated = add_url(&mut entry, new_url);

    serde_wasm_bindgen::to_value(&AddUrlOutput { mutated, entry })
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize output: {}", e)))
}

/// Append a URL association using JSON strings (alternative API).
///
/// Takes a JSON string (AddUrlInput) and returns a JSON string
/// (AddUrlOutput).
#[wasm_bindgen(js_name = addEntryUrlJson)]
pub fn add_entry_url_json_js(input_json: &str) -> Result<String, JsValue> {
    crate::entry_ranker::add_entry_url_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Adding URL failed: {}", e)))
}

/// Resolve the registrable domain of a hostname.
///
/// E.g., "login.example.co.uk" -> "example.co.uk"
/// Returns undefined when the host has no recognised public suffix.
#[wasm_bindgen(js_name = registrableDomain)]
pub fn registrable_domain_js(host: &str) -> Option<String> {
    crate::entry_ranker::registrable_domain(host)
}
