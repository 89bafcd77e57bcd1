//! C FFI exports for native host apps.
//!
//! These functions provide a C-compatible interface for calling Rust from
//! Swift or C#. All functions use JSON strings for input/output to simplify
//! marshalling.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::entry_ranker::{add_entry_url_json, rank_entries, RankInput};

/// Rank vault entries against the AutoFill candidate domains.
///
/// # Safety
///
/// - `input_json` must be a valid null-terminated C string
/// - The returned pointer must be freed by calling `free_string`
///
/// # Returns
///
/// A null-terminated C string containing the JSON result (RankedMatches).
/// Returns null on error.
#[no_mangle]
pub unsafe extern "C" fn rank_entries_ffi(input_json: *const c_char) -> *mut c_char {
    if input_json.is_null() {
        return ptr::null_mut();
    }

    let c_str = match CStr::from_ptr(input_json).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    let input: RankInput = match serde_json::from_str(c_str) {
        Ok(i) => i,
        Err(e) => {
            return create_error_response(&format!("Failed to parse input: {}", e));
        }
    };

    let output = rank_entries(input);

    match serde_json::to_string(&output) {
        Ok(json) => string_to_c_char(json),
        Err(e) => create_error_response(&format!("Failed to serialize output: {}", e)),
    }
}

/// Append a URL association to an entry after a successful fill.
///
/// # Safety
///
/// - `input_json` must be a valid null-terminated C string holding an
///   object `{ "entry": VaultEntry, "new_url": string }`
/// - The returned pointer must be freed by calling `free_string`
///
/// # Returns
///
/// A null-terminated C string containing the JSON result (AddUrlOutput,
/// `{ "mutated": bool, "entry": VaultEntry }`). When `mutated` is false the
/// entry came back untouched and the caller skips the vault save; otherwise
/// it persists the entry via the vault's save operation. Returns null on
/// error.
#[no_mangle]
pub unsafe extern "C" fn add_entry_url_ffi(input_json: *const c_char) -> *mut c_char {
    if input_json.is_null() {
        return ptr::null_mut();
    }

    let c_str = match CStr::from_ptr(input_json).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    match add_entry_url_json(c_str) {
        Ok(json) => string_to_c_char(json),
        Err(e) => create_error_response(&format!("Failed to add URL: {}", e)),
    }
}

/// Free a string that was allocated by Rust.
///
/// # Safety
///
/// - `s` must be a pointer that was returned by one of the FFI functions
/// - This function must only be called once per pointer
/// - After calling this function, the pointer is invalid
#[no_mangle]
pub unsafe extern "C" fn free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Convert a Rust string to a C string pointer.
fn string_to_c_char(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Create an error response JSON string.
fn create_error_response(message: &str) -> *mut c_char {
    let error_json = format!(r#"{{"success":false,"error":"{}"}}"#, message.replace('"', r#"\""#));
    string_to_c_char(error_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_null_input() {
        unsafe {
            let result = rank_entries_ffi(ptr::null());
            assert!(result.is_null());

            let result = add_entry_url_ffi(ptr::null());
            assert!(result.is_null());
        }
    }

    #[test]
    fn test_invalid_json_input() {
        let invalid_json = CString::new("not valid json").unwrap();
        unsafe {
            let result = rank_entries_ffi(invalid_json.as_ptr());
            assert!(!result.is_null());

            let c_str = CStr::from_ptr(result);
            let json = c_str.to_str().unwrap();
            assert!(json.contains("error"));
            free_string(result);
        }
    }

    #[test]
    fn test_rank_entries_round_trip() {
        let input = CString::new(
            r#"{"entries":[{"Id":"a","Title":"GitHub","Url":"github.com"}],"candidate_domains":["github.com"]}"#,
        )
        .unwrap();
        unsafe {
            let result = rank_entries_ffi(input.as_ptr());
            assert!(!result.is_null());

            let c_str = CStr::from_ptr(result);
            let json = c_str.to_str().unwrap();
            assert!(json.contains("\"exact\""));
            assert!(json.contains("GitHub"));
            free_string(result);
        }
    }

    #[test]
    fn test_add_entry_url_round_trip() {
        let input = CString::new(
            r#"{"entry":{"Id":"a","Title":"GitHub","Url":""},"new_url":"https://github.com"}"#,
        )
        .unwrap();
        unsafe {
            let result = add_entry_url_ffi(input.as_ptr());
            assert!(!result.is_null());

            let c_str = CStr::from_ptr(result);
            let json = c_str.to_str().unwrap();
            assert!(json.contains("\"mutated\":true"));
            assert!(json.contains("https://github.com"));
            free_string(result);
        }
    }
}
