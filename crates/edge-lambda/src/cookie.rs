//! Splitting of combined `set-cookie` header values.
//!
//! Providers join several cookies into one header value with commas, but
//! `Expires=Wed, 21 Oct 2025 07:28:00 GMT` carries a comma of its own. A comma
//! only separates cookies when the token after it (up to the next `=`, `;`
//! or `,`) ends at `=`, i.e. it starts a new `name=value` pair.

use edge_core::HeaderValue;

/// Values that stand for "no cookie set".
const PLACEHOLDERS: [&str; 2] = ["undefined", "null"];

/// Split every value of a `set-cookie` header into individual cookies.
///
/// Absent, empty and placeholder values yield no cookies.
pub fn normalize_cookie_header(value: Option<&HeaderValue>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };

    value
        .values()
        .filter(|v| !is_placeholder(v))
        .flat_map(split_cookies_string)
        .collect()
}

/// Split one combined cookie string, leaving commas inside dates intact.
pub fn split_cookies_string(input: &str) -> Vec<String> {
    let bytes = input.as_bytes();
    let len = bytes.len();

    let mut cookies = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < len {
        if bytes[pos] != b',' {
            pos += 1;
            continue;
        }

        let comma = pos;
        let mut scan = comma + 1;
        while scan < len && bytes[scan].is_ascii_whitespace() {
            scan += 1;
        }
        while scan < len && !matches!(bytes[scan], b'=' | b';' | b',') {
            scan += 1;
        }

        if scan < len && bytes[scan] == b'=' {
            push_cookie(&mut cookies, &input[start..comma]);
            start = comma + 1;
            pos = comma + 1;
        } else {
            pos = scan;
        }
    }

    push_cookie(&mut cookies, &input[start..]);
    cookies
}

fn push_cookie(cookies: &mut Vec<String>, raw: &str) {
    let cookie = raw.trim_matches(|c: char| c.is_ascii_whitespace() || c == ',');
    if !cookie.is_empty() {
        cookies.push(cookie.to_string());
    }
}

fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || PLACEHOLDERS.contains(&value)
}
