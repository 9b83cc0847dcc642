//! URL helpers: path joining and query-string encoding.

use serde_json::Value;
use ::url::form_urlencoded;

use crate::item::Query;

/// Appends `suffix` to `base` with exactly one separating `/`, then
/// appends the encoded `query` if it yields a non-empty string.
///
/// `base` may be relative or absolute and may or may not end in a slash.
pub fn build_full_url(base: &str, suffix: Option<&str>, query: Option<&Query>) -> String {
    let mut url = base.to_string();
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(suffix);
    }

    if let Some(query) = query {
        let query_string = build_query_string(query);
        if !query_string.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query_string);
        }
    }

    url
}

/// Encodes key/value pairs as a query string without a leading `?`.
///
/// Pairs keep the query's insertion order. Falsy values (null, `false`,
/// `0`, `""`) are skipped. Arrays expand to one `key[]=value` pair per
/// element, with the brackets written literally after the encoded key.
pub fn build_query_string(query: &Query) -> String {
    let mut pairs = Vec::new();
    for (key, value) in query {
        if key.is_empty() || is_falsy(value) {
            continue;
        }
        let key = encode(key);
        match value {
            Value::Array(values) => {
                for v in values {
                    pairs.push(format!("{key}[]={}", encode(&display_value(v))));
                }
            }
            other => pairs.push(format!("{key}={}", encode(&display_value(other)))),
        }
    }
    pairs.join("&")
}

fn encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
