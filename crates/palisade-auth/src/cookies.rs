//! Request cookie parsing.

use http::header::COOKIE;
use palisade_core::Request;
use std::collections::HashMap;

/// Parses every `Cookie` header of a request into a name → value map.
///
/// Pairs that do not parse (no `=`, empty name) are skipped; cookie
/// headers are client input and a broken pair should not poison the rest.
#[must_use]
pub fn cookies_of(request: &Request) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for header in request.headers().get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    cookies.insert(name.to_string(), value.trim().to_string());
                }
            }
        }
    }
    cookies
}
