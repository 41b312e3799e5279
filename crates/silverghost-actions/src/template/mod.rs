//! Path templates
//!
//! A template is a `/`-separated route such as `/welcome/:channel/:query`,
//! where a leading `:` marks a parametric segment. Concrete paths are split on
//! `/`, `#` and `?`, so parameters may also travel in the hash or the query.
//!
//! ## Implicit parameters
//!
//! Parametric segments declared in an action's pathgroups are *implicit*: a
//! path may omit them and they resolve to a default. Matching therefore
//! tolerates paths up to `implicit_count` segments shorter (or longer) than
//! the template.

pub mod pathgroup;
pub mod pattern;

use serde_json::Value;

use crate::query;
use pattern::{classify_segment, split_path_parts, SegmentType};

/// A parsed path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<SegmentType>,
}

impl PathTemplate {
    /// Parses a template like `/users/:id/:tab`
    ///
    /// # Examples
    ///
    /// ```
    /// use silverghost_actions::template::PathTemplate;
    ///
    /// let template = PathTemplate::parse("/users/:id/:tab");
    /// assert_eq!(template.param_names().collect::<Vec<_>>(), vec!["id", "tab"]);
    /// assert_eq!(template.last_static_index(), Some(0));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let segments = split_path_parts(raw)
            .into_iter()
            .map(classify_segment)
            .collect();
        PathTemplate {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[SegmentType] {
        &self.segments
    }

    /// Index of the last non-parametric segment
    pub fn last_static_index(&self) -> Option<usize> {
        self.segments.iter().rposition(|seg| !seg.is_param())
    }

    /// Parameter names in template order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(SegmentType::param_name)
    }

    pub fn param_count(&self) -> usize {
        self.param_names().count()
    }

    /// Position of `name` among the parametric segments
    pub fn param_position(&self, name: &str) -> Option<usize> {
        self.param_names().position(|param| param == name)
    }

    /// Checks whether `path` fits this template.
    ///
    /// The path length must lie within `implicit_count` of the template
    /// length, and every template segment up to the last static one (or up
    /// to the path length, whichever is further) must be parametric or equal
    /// to the corresponding path segment.
    pub fn is_matching(&self, path: &str, implicit_count: usize) -> bool {
        let parts = split_path_parts(path);
        let template_len = self.segments.len();

        let within_implicit = template_len.saturating_sub(implicit_count) <= parts.len()
            && parts.len() <= template_len + implicit_count;
        if template_len != parts.len() && !within_implicit {
            return false;
        }

        let bound = self
            .last_static_index()
            .map_or(0, |index| index + 1)
            .max(parts.len());

        (0..bound).all(|index| match self.segments.get(index) {
            None => false,
            Some(SegmentType::Param(_)) => true,
            Some(SegmentType::Static(text)) => parts.get(index) == Some(&text.as_str()),
        })
    }

    /// Substitutes `params` into the parametric slots in template order.
    ///
    /// Static segments are always emitted; a parametric slot is emitted only
    /// while params remain. A `null` param takes its slot but emits nothing.
    /// Params beyond the template's slots are appended to `query_string`.
    pub fn fill(&self, params: &[Value], query_string: &str) -> String {
        let mut url = String::new();
        let mut next = 0;

        for segment in &self.segments {
            let part = match segment {
                SegmentType::Static(text) => Some(text.clone()),
                SegmentType::Param(_) => {
                    let value = params.get(next);
                    if value.is_some() {
                        next += 1;
                    }
                    value.filter(|p| !p.is_null()).map(query::scalar_text)
                }
            };
            if let Some(part) = part.filter(|p| !p.is_empty()) {
                url.push('/');
                url.push_str(&part);
            }
        }

        let mut query = query_string.to_string();
        for token in params.iter().skip(next).filter_map(query::param_token) {
            if !query.is_empty() && !query.ends_with('?') {
                query.push('&');
            }
            query.push_str(&token);
        }
        if !query.is_empty() && !query.starts_with('?') {
            query.insert(0, '?');
        }

        url + &query
    }

    /// Minimal route pattern for external route registration.
    ///
    /// Keeps every segment through the last static one plus as many further
    /// parametric segments as are explicit (`param_count - implicit_count`).
    /// A route keeps at least its first segment.
    pub fn route_path(&self, implicit_count: usize, query_params: &[&str]) -> String {
        let required = self.param_count().saturating_sub(implicit_count);
        let through_static = self.last_static_index().map_or(0, |index| index + 1);

        let mut route = String::new();
        let mut explicit = 0;
        for (index, segment) in self.segments.iter().enumerate() {
            let needed = index < through_static || explicit < required || index == 0;
            if !needed {
                break;
            }
            route.push('/');
            match segment {
                SegmentType::Static(text) => route.push_str(text),
                SegmentType::Param(name) => {
                    explicit += 1;
                    route.push(':');
                    route.push_str(name);
                }
            }
        }

        if !query_params.is_empty() {
            route.push('?');
            route.push_str(&query_params.join("&"));
        }
        route
    }
}
