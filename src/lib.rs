//! KeeVault Core Library
//!
//! Cross-platform core functionality for KeeVault AutoFill:
//! - **entry_ranker**: matches vault entries against the domains an AutoFill
//!   request concerns, assigns each a priority, and groups the result into
//!   tiers for display.
//!
//! This library works on an in-memory snapshot of entries. Each platform
//! (iOS credential provider, browser extension, .NET host) handles its own
//! vault I/O and Keychain access, and calls this library for the matching
//! logic. Inputs and outputs are serde types with JSON convenience wrappers.
//!
//! # Example (conceptual)
//! ```ignore
//! // Host loads the decrypted vault and receives the AutoFill request
//! let entries = load_entries(vault);
//! let input = RankInput { entries, candidate_domains };
//!
//! // Rust ranks and groups the entries
//! let ranked = rank_entries(input);
//! show_credential_list(ranked.exact, ranked.close, ranked.none);
//!
//! // After the user fills a credential on a new site
//! add_url(&mut entry, "https://new-site.example");
//! save_vault(vault);
//! ```

pub mod entry_ranker;
pub mod error;

pub use entry_ranker::{
    add_entry_url_json, add_url, entry_priority, extract_urls, normalize_url, rank_entries,
    rank_entries_json, registrable_domain, AddUrlInput, AddUrlOutput, CandidateMatch,
    PriorityTier, RankInput, RankedMatches, VaultEntry, HIDDEN_PRIORITY, KPRPC_FIELD_NAME,
    NO_URL_PRIORITY,
};
pub use error::VaultError;

// WASM bindings
#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::*;

// C FFI exports for native host apps
#[cfg(feature = "ffi")]
pub mod ffi;
