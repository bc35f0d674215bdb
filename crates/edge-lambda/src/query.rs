//! Query parameter merging and effective URL construction.

use std::collections::HashMap;

use edge_core::{QueryParams, QueryValue};
use url::form_urlencoded;

/// Merge single-value and multi-value query maps.
///
/// Keys from the multi-value map replace the same key from the single-value
/// map; keys present in only one map pass through unchanged.
pub fn merge_query(
    single: &HashMap<String, String>,
    multi: &HashMap<String, Vec<String>>,
) -> QueryParams {
    let mut merged: QueryParams = single
        .iter()
        .map(|(k, v)| (k.clone(), QueryValue::Single(v.clone())))
        .collect();

    merged.extend(
        multi
            .iter()
            .map(|(k, vs)| (k.clone(), QueryValue::Multi(vs.clone()))),
    );

    merged
}

/// Serialize a query map onto a path.
///
/// A query string already in `path` is kept; keys present in `query` replace
/// its entries in place and new keys are appended in sorted order. Sequence
/// values become repeated `key=value` pairs. A fragment stays at the end.
pub fn with_query(path: &str, query: &QueryParams) -> String {
    if query.is_empty() {
        return path.to_string();
    }

    let (rest, fragment) = match path.find('#') {
        Some(idx) => path.split_at(idx),
        None => (path, ""),
    };
    let (base, existing) = match rest.find('?') {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };

    let mut pairs = parse_query(existing);

    let mut keys: Vec<&String> = query.keys().collect();
    keys.sort();
    for key in keys {
        let value = query[key].clone();
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => pairs.push((key.clone(), value)),
        }
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        for v in value.values() {
            serializer.append_pair(key, v);
        }
    }
    let encoded = serializer.finish();

    if encoded.is_empty() {
        format!("{}{}", base, fragment)
    } else {
        format!("{}?{}{}", base, encoded, fragment)
    }
}

/// Parse a raw query string, grouping repeated keys in first-seen order.
fn parse_query(raw: &str) -> Vec<(String, QueryValue)> {
    let mut pairs: Vec<(String, QueryValue)> = Vec::new();

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        let value = value.into_owned();
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => {
                let mut values = std::mem::replace(slot, QueryValue::Multi(Vec::new())).into_values();
                values.push(value);
                *slot = QueryValue::Multi(values);
            }
            None => pairs.push((key.into_owned(), QueryValue::Single(value))),
        }
    }

    pairs
}
