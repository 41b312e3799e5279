//! Query-string encoding
//!
//! Trailing action params and list metadata travel as `key=value` pairs
//! joined by `&`, percent-encoded. Array values flatten to comma-joined text.

use serde_json::Value;

use crate::instance::{FilterCriterion, Pagination, Sorting};

/// Text of a param when it fills a path slot
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(","),
        Value::Object(map) => encode_pairs(map.iter()),
        other => other.to_string(),
    }
}

/// Query token for a param left over after the path slots are filled.
///
/// `null`, empty strings and empty objects produce no token.
pub fn param_token(value: &Value) -> Option<String> {
    let token = scalar_text(value);
    (!token.is_empty()).then_some(token)
}

/// Percent-encodes `key=value` pairs and joins them with `&`.
///
/// `null` values and empty arrays are skipped.
///
/// ```
/// use serde_json::json;
/// use silverghost_actions::query::encode_pairs;
///
/// let tags = json!(["a", "b c"]);
/// let q = json!("x&y");
/// assert_eq!(encode_pairs([("tags", &tags), ("q", &q)]), "tags=a%2Cb%20c&q=x%26y");
/// ```
pub fn encode_pairs<'a, I, K>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, &'a Value)>,
    K: AsRef<str>,
{
    pairs
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::Array(items) if items.is_empty() => return None,
                other => scalar_text(other),
            };
            Some(format!(
                "{}={}",
                urlencoding::encode(key.as_ref()),
                urlencoding::encode(&text)
            ))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Encodes pagination, sorting and filter state as a query string
/// (without the leading `?`).
pub fn encode_psf(
    pagination: &Pagination,
    sorting: Option<&Sorting>,
    filter: &[FilterCriterion],
) -> String {
    let mut pairs: Vec<(String, Value)> = Vec::new();
    if let Some(number) = pagination.number {
        pairs.push(("page".to_string(), number.into()));
    }
    if let Some(size) = pagination.size {
        pairs.push(("size".to_string(), size.into()));
    }
    if let Some(column) = sorting.and_then(Sorting::column) {
        let direction = sorting.map(Sorting::direction).unwrap_or_default();
        pairs.push((
            "sort".to_string(),
            Value::String(format!("{},{}", column, direction.as_str())),
        ));
    }
    for criterion in filter {
        pairs.push((criterion.column_name.clone(), criterion.value.clone()));
    }

    encode_pairs(pairs.iter().map(|(key, value)| (key, value)))
}

/// Splits a `?a=b&c` string into its non-empty tokens
pub fn parse_query(search: &str) -> Vec<String> {
    search
        .strip_prefix('?')
        .unwrap_or(search)
        .split('&')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
