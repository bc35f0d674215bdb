//! Header normalization between the gateway and the internal call.

use std::collections::HashMap;

use edge_core::{Headers, ResponseHeaders};

/// Name of the cookie header, which never travels in the flat header map.
pub const SET_COOKIE: &str = "set-cookie";

/// Delimiter used when flattening sequence-valued response headers.
pub const HEADER_JOIN_DELIMITER: &str = ",";

/// Normalize incoming gateway headers to lowercase names.
///
/// Values are kept as received. Names that only differ in case are combined
/// into one value joined with `", "`, in sorted order of the original names.
pub fn normalize_incoming_headers(headers: &HashMap<String, String>) -> Headers {
    let mut names: Vec<&String> = headers.keys().collect();
    names.sort();

    let mut normalized = Headers::with_capacity(headers.len());
    for name in names {
        let value = &headers[name];
        normalized
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.clone());
    }
    normalized
}

/// Flatten response headers into the gateway's string-valued map.
///
/// Sequence values are joined with [`HEADER_JOIN_DELIMITER`]. With
/// `strip_cookies`, `set-cookie` in any casing is left out; cookies are
/// carried in `multiValueHeaders` instead.
pub fn normalize_outgoing_headers(
    headers: &ResponseHeaders,
    strip_cookies: bool,
) -> HashMap<String, String> {
    headers
        .iter()
        .filter(|(name, _)| !(strip_cookies && name.eq_ignore_ascii_case(SET_COOKIE)))
        .map(|(name, value)| (name.clone(), value.join(HEADER_JOIN_DELIMITER)))
        .collect()
}
