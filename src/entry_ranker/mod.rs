//! Entry ranking for AutoFill.
//!
//! Given the login entries of a vault and the ordered list of domains the
//! current AutoFill request concerns, decide which entries are relevant,
//! assign each a priority, and produce a stable, grouped, sorted
//! presentation order.
//!
//! Priority numbering:
//! 1. `1..=N` - the entry matched candidate domain `i - 1`, either on a
//!    full hostname or on its registrable domain (`1` is the best match)
//! 2. `0` - the entry has a resolvable hostname but matched no candidate
//! 3. `1000` - the entry carries no usable URL at all
//!
//! Malformed URLs, unresolvable domains and unparseable `KPRPC JSON`
//! payloads contribute no signal but never fail a ranking pass.

mod domain;
mod kprpc;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VaultResult;

pub use domain::{normalize_url, registrable_domain};
pub use kprpc::{add_url, extract_urls, KPRPC_FIELD_NAME};

/// Priority assigned to entries without any usable URL.
///
/// The value doubles as the upper bound on distinguishable candidate
/// positions: a genuine match at candidate index 999 produces this same
/// priority and lands in the `None` tier with the URL-less entries.
/// AutoFill requests carry a handful of domains, so the collision is
/// accepted rather than widening the sentinel.
pub const NO_URL_PRIORITY: i32 = 1000;

/// Priority signalling an entry hidden from AutoFill; such entries are
/// dropped from the ranked output entirely.
pub const HIDDEN_PRIORITY: i32 = -1;

/// One stored login, as loaded from the vault by the host platform.
///
/// This core only reads and mutates the URL-bearing fields; entry lifecycle
/// and persistence stay with the vault layer.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VaultEntry {
    /// Opaque identifier, stable across sessions
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Primary URL field, possibly empty
    #[serde(default)]
    pub url: String,
    /// Secondary string fields by name, including `"KPRPC JSON"`
    #[serde(default)]
    pub fields: HashMap<String, String>,
    /// Modification timestamp, touched by mutation helpers
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl VaultEntry {
    pub(crate) fn touch(&mut self) {
        self.last_modified = Some(Utc::now());
    }
}

// Manual Debug so the password never reaches host logs.
impl fmt::Debug for VaultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultEntry")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("fields", &self.fields.keys())
            .field("last_modified", &self.last_modified)
            .finish()
    }
}

/// Coarse grouping of ranked entries shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    /// No candidate matched, or no usable URL
    None,
    /// Matched the first (most preferred) candidate domain
    Exact,
    /// Matched a later candidate domain
    Close,
}

impl PriorityTier {
    /// Classify a numeric priority into its display tier.
    pub fn from_priority(priority: i32) -> Self {
        match priority {
            1 => PriorityTier::Exact,
            p if p > 0 && p < NO_URL_PRIORITY => PriorityTier::Close,
            _ => PriorityTier::None,
        }
    }
}

/// One ranked entry; derived and transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMatch {
    /// Identifier of the source entry
    pub entry_id: String,
    /// Candidate domain (or first hostname) the entry matched; empty if none
    pub matched_domain: String,
    /// Display title
    pub title: String,
    pub username: String,
    /// Lowercased username, cached for the host's search field
    pub username_lower: String,
    pub priority: i32,
    /// Index of the source entry in the input snapshot
    pub entry_index: usize,
}

impl CandidateMatch {
    fn new(entry: &VaultEntry, entry_index: usize, priority: i32, matched_domain: String) -> Self {
        CandidateMatch {
            entry_id: entry.id.clone(),
            matched_domain,
            title: entry.title.clone(),
            username: entry.username.clone(),
            username_lower: entry.username.to_lowercase(),
            priority,
            entry_index,
        }
    }
}

/// Input for one ranking pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankInput {
    /// Snapshot of the vault's login entries, in vault order
    pub entries: Vec<VaultEntry>,
    /// Domains the AutoFill request concerns, most preferred first
    #[serde(default)]
    pub candidate_domains: Vec<String>,
}

/// Ranked entries grouped by tier; each tier preserves the sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedMatches {
    pub exact: Vec<CandidateMatch>,
    pub close: Vec<CandidateMatch>,
    pub none: Vec<CandidateMatch>,
}

impl RankedMatches {
    /// The ordered matches of one tier.
    pub fn tier(&self, tier: PriorityTier) -> &[CandidateMatch] {
        match tier {
            PriorityTier::Exact => &self.exact,
            PriorityTier::Close => &self.close,
            PriorityTier::None => &self.none,
        }
    }

    /// True when no entry survived the ranking pass. A normal state, not an
    /// error; the host shows its empty-state UI.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.close.is_empty() && self.none.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.close.len() + self.none.len()
    }
}

/// Score one entry against the ordered candidate domains.
///
/// Returns the numeric priority and the matched domain. Entries without any
/// usable URL get `(NO_URL_PRIORITY, "")` so they still appear (lowest
/// tier) for manual selection. Entries whose hostnames and registrable
/// domains match no candidate get `(0, first_hostname)`.
pub fn entry_priority(entry: &VaultEntry, candidate_domains: &[String]) -> (i32, String) {
    let urls = kprpc::extract_urls(entry);
    if urls.is_empty() {
        return (NO_URL_PRIORITY, String::new());
    }

    let mut hostnames: Vec<String> = Vec::new();
    let mut domains: Vec<String> = Vec::new();
    for url in &urls {
        if let Some(host) = url.host_str() {
            let host = host.to_lowercase();
            if let Some(domain) = domain::registrable_domain(&host) {
                domains.push(domain);
            }
            hostnames.push(host);
        }
    }

    // First candidate to match a hostname or registrable domain wins.
    for (index, candidate) in candidate_domains.iter().enumerate() {
        let wanted = candidate.to_lowercase();
        if hostnames.iter().any(|h| *h == wanted) || domains.iter().any(|d| *d == wanted) {
            return (index as i32 + 1, candidate.clone());
        }
    }

    // Extracted URLs can lack a host component entirely.
    match hostnames.first() {
        Some(host) => (0, host.clone()),
        None => (NO_URL_PRIORITY, String::new()),
    }
}

/// Priority for the ranking pass: hidden entries signal `HIDDEN_PRIORITY`
/// so `rank_entries` can drop them.
fn ranked_priority(entry: &VaultEntry, candidate_domains: &[String]) -> (i32, String) {
    if kprpc::is_hidden(entry) {
        return (HIDDEN_PRIORITY, String::new());
    }
    entry_priority(entry, candidate_domains)
}

/// Rank a snapshot of entries against the candidate domains and group the
/// result into priority tiers.
///
/// Deterministic for a given input: deduplication keeps the first-seen
/// position of each entry id, and the sort is stable so full priority+title
/// ties retain their pre-sort order.
pub fn rank_entries(input: RankInput) -> RankedMatches {
    let RankInput {
        entries,
        candidate_domains,
    } = input;

    // Compute one match per distinct entry id. On a duplicate id the
    // occurrence with the higher priority number wins in place; ties keep
    // the first-seen occurrence.
    let mut matches: Vec<CandidateMatch> = Vec::new();
    let mut slot_by_id: HashMap<String, usize> = HashMap::new();

    for (entry_index, entry) in entries.iter().enumerate() {
        let (priority, matched_domain) = ranked_priority(entry, &candidate_domains);
        if priority == HIDDEN_PRIORITY {
            continue;
        }

        let candidate = CandidateMatch::new(entry, entry_index, priority, matched_domain);
        match slot_by_id.get(&candidate.entry_id).copied() {
            Some(slot) => {
                log::debug!("duplicate entry id {}, keeping higher priority", candidate.entry_id);
                if candidate.priority > matches[slot].priority {
                    matches[slot] = candidate;
                }
            }
            None => {
                slot_by_id.insert(candidate.entry_id.clone(), matches.len());
                matches.push(candidate);
            }
        }
    }

    // Positive priorities ascending, then 0, then the no-URL sentinel;
    // equal priorities order by title, case-insensitively. Stable.
    matches.sort_by(|a, b| {
        sort_ordinal(a.priority)
            .cmp(&sort_ordinal(b.priority))
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });

    let mut ranked = RankedMatches::default();
    for candidate in matches {
        match PriorityTier::from_priority(candidate.priority) {
            PriorityTier::Exact => ranked.exact.push(candidate),
            PriorityTier::Close => ranked.close.push(candidate),
            PriorityTier::None => ranked.none.push(candidate),
        }
    }
    ranked
}

/// Maps a priority onto the total sort order: `0` sorts after every
/// positive priority but before `NO_URL_PRIORITY`.
fn sort_ordinal(priority: i32) -> i64 {
    match priority {
        NO_URL_PRIORITY => i64::MAX,
        0 => i64::MAX - 1,
        p => p as i64,
    }
}

/// Rank entries from JSON input (convenience function for FFI).
///
/// Takes a JSON-encoded [`RankInput`] and returns a JSON-encoded
/// [`RankedMatches`].
pub fn rank_entries_json(input_json: &str) -> VaultResult<String> {
    let input: RankInput = serde_json::from_str(input_json)?;
    let output = rank_entries(input);
    Ok(serde_json::to_string(&output)?)
}

/// Input for [`add_entry_url_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUrlInput {
    /// The entry to mutate
    pub entry: VaultEntry,
    /// The URL to remember on it
    pub new_url: String,
}

/// Output of [`add_entry_url_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUrlOutput {
    /// Whether the entry changed; callers skip the vault save when false
    pub mutated: bool,
    /// The (possibly updated) entry
    pub entry: VaultEntry,
}

/// Append a URL association from JSON input (convenience function for FFI).
///
/// Takes a JSON-encoded [`AddUrlInput`] and returns a JSON-encoded
/// [`AddUrlOutput`] carrying the mutation flag and the updated entry.
pub fn add_entry_url_json(input_json: &str) -> VaultResult<String> {
    let mut input: AddUrlInput = serde_json::from_str(input_json)?;
    let mutated = kprpc::add_url(&mut input.entry, &input.new_url);
    let output = AddUrlOutput {
        mutated,
        entry: input.entry,
    };
    Ok(serde_json::to_string(&output)?)
}
