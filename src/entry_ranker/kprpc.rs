//! Handling of the `"KPRPC JSON"` secondary field.
//!
//! KeePassRPC-compatible clients store extended entry metadata (alternate
//! URLs, hide flag, autofill behaviour) as a JSON-encoded string in a custom
//! field. That field is owned by other tools too, so mutation is a targeted
//! textual patch of the `altURLs` array literal rather than a
//! deserialize/reserialize round trip: every other attribute's text must
//! survive byte-for-byte.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use url::Url;

use super::domain::normalize_url;
use super::VaultEntry;

/// Name of the secondary field carrying the KeePassRPC entry config.
pub const KPRPC_FIELD_NAME: &str = "KPRPC JSON";

/// Default entry config template, all attributes at their default values.
/// Used as the starting point when an entry has no config field yet.
const DEFAULT_CONFIG: &str = r#"{"version":1,"alwaysAutoFill":false,"neverAutoFill":false,"alwaysAutoSubmit":false,"neverAutoSubmit":false,"priority":0,"hide":false,"blockHostnameOnlyMatch":false,"blockDomainOnlyMatch":false,"altURLs":[],"regExURLs":[],"blockedURLs":[],"regExBlockedURLs":[]}"#;

/// Matches the `altURLs` key up to and including the opening bracket of its
/// array literal.
static ALT_URLS_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""altURLs"\s*:\s*\["#).expect("altURLs pattern is valid"));

/// The subset of the entry config this core reads. Unknown attributes are
/// ignored so config written by newer clients still parses.
#[derive(Debug, Clone, Default, Deserialize)]
struct EntryConfig {
    #[serde(default, rename = "altURLs")]
    alt_urls: Vec<String>,
    #[serde(default)]
    hide: bool,
}

/// Parse the entry's config field, absorbing parse failures.
fn parse_config(entry: &VaultEntry) -> Option<EntryConfig> {
    let raw = entry.fields.get(KPRPC_FIELD_NAME)?;
    match serde_json::from_str(raw) {
        Ok(config) => Some(config),
        Err(err) => {
            log::debug!(
                "ignoring unparseable {KPRPC_FIELD_NAME} field on entry {}: {err}",
                entry.id
            );
            None
        }
    }
}

/// Whether the entry is flagged as hidden from AutoFill.
pub(crate) fn is_hidden(entry: &VaultEntry) -> bool {
    parse_config(entry).map_or(false, |config| config.hide)
}

/// Collect every URL associated with an entry: the primary URL field first,
/// then the `altURLs` of the config field, in stored order. Invalid or
/// unparseable URLs are skipped, not substituted.
pub fn extract_urls(entry: &VaultEntry) -> Vec<Url> {
    let mut urls = Vec::new();
    if let Some(url) = normalize_url(&entry.url) {
        urls.push(url);
    }

    let alt_urls = parse_config(entry).map(|c| c.alt_urls).unwrap_or_default();
    for alt in &alt_urls {
        if let Some(url) = normalize_url(alt) {
            urls.push(url);
        }
    }

    urls
}

/// Remember a new URL association on an entry.
///
/// An empty primary URL is set directly. Otherwise `new_url` is appended to
/// the `altURLs` array of the config field, synthesizing the field from the
/// default template when absent. Returns whether the entry was mutated; the
/// modification timestamp is touched on success and the caller is expected
/// to persist the entry afterwards.
pub fn add_url(entry: &mut VaultEntry, new_url: &str) -> bool {
    if entry.url.is_empty() {
        entry.url = new_url.to_string();
        entry.touch();
        return true;
    }

    let config = entry
        .fields
        .get(KPRPC_FIELD_NAME)
        .cloned()
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let Some((open, close)) = locate_alt_urls(&config) else {
        // Config exists but its altURLs array cannot be located; leave the
        // tool-owned text alone rather than risk corrupting it.
        log::debug!(
            "cannot locate altURLs array in {KPRPC_FIELD_NAME} field on entry {}",
            entry.id
        );
        return false;
    };

    let Ok(url_literal) = serde_json::to_string(new_url) else {
        return false;
    };

    let patched = if config[open + 1..close].trim().is_empty() {
        // Empty array: replace its contents with the single new element.
        format!("{}{}{}", &config[..=open], url_literal, &config[close..])
    } else {
        // Non-empty: append just before the closing bracket.
        format!("{},{}{}", &config[..close], url_literal, &config[close..])
    };

    entry.fields.insert(KPRPC_FIELD_NAME.to_string(), patched);
    entry.touch();
    true
}

/// Find the byte offsets of the opening and closing brackets of the
/// `altURLs` array literal. The scan is string-literal aware so brackets
/// inside stored URLs cannot end the array early.
fn locate_alt_urls(config: &str) -> Option<(usize, usize)> {
    let key = ALT_URLS_KEY.find(config)?;
    let open = key.end() - 1;

    let mut in_string = false;
    let mut escaped = false;
    let mut depth = 0usize;
    for (i, b) in config.bytes().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open, i));
                }
            }
            _ => {}
        }
    }
    None
}
