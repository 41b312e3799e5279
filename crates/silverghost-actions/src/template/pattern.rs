/// Segment classification for path templates
///
/// Pure functions: same input → same output, no side effects.

/// A single segment of a path template
///
/// # Examples
///
/// ```
/// use silverghost_actions::template::pattern::{classify_segment, SegmentType};
///
/// assert_eq!(classify_segment("welcome"), SegmentType::Static("welcome".to_string()));
/// assert_eq!(classify_segment(":channel"), SegmentType::Param("channel".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentType {
    /// Literal text that must appear verbatim in the path
    Static(String),
    /// `:name` slot filled by a parameter value
    Param(String),
}

impl SegmentType {
    pub fn is_param(&self) -> bool {
        matches!(self, SegmentType::Param(_))
    }

    /// Parameter name, or `None` for static segments
    pub fn param_name(&self) -> Option<&str> {
        match self {
            SegmentType::Param(name) => Some(name),
            SegmentType::Static(_) => None,
        }
    }
}

/// Classifies one template segment; a leading `:` marks a parameter.
pub fn classify_segment(segment: &str) -> SegmentType {
    match segment.strip_prefix(':') {
        Some(name) => SegmentType::Param(name.to_string()),
        None => SegmentType::Static(segment.to_string()),
    }
}

/// Splits a path on `/`, `#` and `?`, dropping empty parts.
///
/// Hash- and query-delimited values count as ordinary segments, so
/// `/tree/a#b?c` yields `["tree", "a", "b", "c"]`.
///
/// ```
/// use silverghost_actions::template::pattern::split_path_parts;
///
/// assert_eq!(split_path_parts("/tree/a#b?c"), vec!["tree", "a", "b", "c"]);
/// assert!(split_path_parts("").is_empty());
/// ```
pub fn split_path_parts(path: &str) -> Vec<&str> {
    path.split(['/', '#', '?'])
        .filter(|part| !part.is_empty())
        .collect()
}
