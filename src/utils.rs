// src/utils.rs

/// Collapse inner whitespace and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a query part for cache key usage
pub fn normalize_key_part(part: &str, empty_marker: &str) -> String {
    let collapsed = collapse_whitespace(part).to_lowercase();
    if collapsed.is_empty() {
        empty_marker.to_string()
    } else {
        collapsed
    }
}

/// Turn free text into a URL path slug ("Data Engineer" -> "data-engineer")
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a limit coming from a query string. Non-numeric input yields None,
/// fractional input is truncated.
pub fn parse_limit(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
}

/// Parse a limit coming from a JSON body, where it may be a number or a string
pub fn parse_limit_value(raw: &serde_json::Value) -> Option<i64> {
    match raw {
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value.trunc() as i64)),
        serde_json::Value::String(text) => parse_limit(text),
        _ => None,
    }
}
