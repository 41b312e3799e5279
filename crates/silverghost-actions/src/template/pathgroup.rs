//! Pathgroups: depth-ordered enumerations of legal implicit values
//!
//! Each pathgroup-declared segment resolves against a nested array. The index
//! chosen at one pathgroup segment selects the sub-array used by the next, so
//!
//! ```text
//! section:    ["home", "reference"]
//! subsection: [["presentation", "links"], ["store", "actions", "reducers"]]
//! ```
//!
//! allows `/reference/actions` but resolves `/reference/links` to
//! `/reference/store` (or rejects it when matching).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::pattern::{split_path_parts, SegmentType};
use super::PathTemplate;
use crate::error::{ActionError, Result};

/// A pathgroup declaration: a fixed value or a (nested) group of options.
///
/// An empty group is an open level and accepts any concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathgroupValue {
    Value(String),
    Group(Vec<PathgroupValue>),
}

impl PathgroupValue {
    /// A flat group of string options
    pub fn options<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PathgroupValue::Group(
            values
                .into_iter()
                .map(|v| PathgroupValue::Value(v.into()))
                .collect(),
        )
    }

    /// A group of sub-groups, one per option of the previous pathgroup
    pub fn nested<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = PathgroupValue>,
    {
        PathgroupValue::Group(groups.into_iter().collect())
    }

    /// An open level (no declared options)
    pub fn open() -> Self {
        PathgroupValue::Group(Vec::new())
    }
}

/// Pathgroup declarations keyed by segment name
pub type Pathgroups = BTreeMap<String, PathgroupValue>;

/// Which parameters to resolve and how strictly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathgroupOptions {
    /// Include values of parametric segments without a pathgroup
    pub include_explicit: bool,
    /// Include values of pathgroup-declared segments
    pub include_implicit: bool,
    /// Report values outside the declared options instead of defaulting
    pub fail_on_mismatch: bool,
}

impl Default for PathgroupOptions {
    fn default() -> Self {
        PathgroupOptions {
            include_explicit: false,
            include_implicit: true,
            fail_on_mismatch: false,
        }
    }
}

impl PathgroupOptions {
    /// Explicit and implicit values, defaulting on mismatch
    pub fn all() -> Self {
        PathgroupOptions {
            include_explicit: true,
            ..Self::default()
        }
    }

    /// Explicit and implicit values, rejecting mismatches
    pub fn strict() -> Self {
        PathgroupOptions {
            fail_on_mismatch: true,
            ..Self::all()
        }
    }

    /// Explicit values only
    pub fn explicit_only() -> Self {
        PathgroupOptions {
            include_explicit: true,
            include_implicit: false,
            fail_on_mismatch: false,
        }
    }
}

/// Walks the parametric segments of `template` and resolves their values
/// from `path`.
///
/// Values for pathgroup segments are looked up in the level selected by the
/// indices resolved so far; an unresolvable implicit slot yields `null`.
pub(crate) fn resolve(
    action: &str,
    template: &PathTemplate,
    pathgroups: &Pathgroups,
    path: &str,
    options: PathgroupOptions,
) -> Result<Vec<Value>> {
    let parts = split_path_parts(path);
    let mut params = Vec::new();
    let mut index_path: Vec<usize> = Vec::new();

    for (position, segment) in template.segments().iter().enumerate() {
        let SegmentType::Param(key) = segment else {
            continue;
        };
        let supplied = parts.get(position).copied();

        match pathgroups.get(key) {
            Some(declared) => {
                if !options.include_implicit {
                    continue;
                }
                let value = match declared {
                    PathgroupValue::Value(fixed) => Value::String(fixed.clone()),
                    PathgroupValue::Group(_) => {
                        let options_at_depth = descend(action, key, declared, &index_path)?;
                        let (index, value) =
                            choose(action, key, options_at_depth, supplied, options)?;
                        index_path.push(index);
                        value
                    }
                };
                params.push(value);
            }
            None => {
                if let Some(value) = supplied.filter(|_| options.include_explicit) {
                    params.push(Value::String(value.to_string()));
                }
            }
        }
    }

    Ok(params)
}

/// Follows `index_path` into the nested declaration
fn descend<'a>(
    action: &str,
    key: &str,
    declared: &'a PathgroupValue,
    index_path: &[usize],
) -> Result<&'a [PathgroupValue]> {
    let invalid = |reason: String| ActionError::InvalidPathgroup {
        action: action.to_string(),
        key: key.to_string(),
        reason,
    };

    let mut level = declared;
    for &index in index_path {
        level = match level {
            // An open level stays open at every deeper depth.
            PathgroupValue::Group(items) if items.is_empty() => level,
            PathgroupValue::Group(items) => items
                .get(index)
                .ok_or_else(|| invalid(format!("no group at index {index}")))?,
            PathgroupValue::Value(value) => {
                return Err(invalid(format!("expected array but received \"{value}\"")))
            }
        };
    }

    match level {
        PathgroupValue::Group(items) => Ok(items),
        PathgroupValue::Value(value) => {
            Err(invalid(format!("expected array but received \"{value}\"")))
        }
    }
}

/// Picks the value at one depth, returning its index and resolved value
fn choose(
    action: &str,
    key: &str,
    options_at_depth: &[PathgroupValue],
    supplied: Option<&str>,
    strictness: PathgroupOptions,
) -> Result<(usize, Value)> {
    if options_at_depth.is_empty() {
        let value = supplied.map_or(Value::Null, |v| Value::String(v.to_string()));
        return Ok((0, value));
    }

    let legal = |value: &str| {
        options_at_depth
            .iter()
            .position(|option| matches!(option, PathgroupValue::Value(v) if v == value))
    };

    if let Some((index, value)) = supplied.and_then(|v| legal(v).map(|index| (index, v))) {
        return Ok((index, Value::String(value.to_string())));
    }

    let default = match &options_at_depth[0] {
        PathgroupValue::Value(value) => value.clone(),
        PathgroupValue::Group(_) => {
            return Err(ActionError::InvalidPathgroup {
                action: action.to_string(),
                key: key.to_string(),
                reason: "expected a value but received a nested group".to_string(),
            })
        }
    };

    if let Some(value) = supplied {
        if strictness.fail_on_mismatch {
            return Err(ActionError::PathgroupMismatch {
                action: action.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        debug!(
            "Path group parameter {} not defined for {}; defaulting to {}",
            value, action, default
        );
    }

    Ok((0, Value::String(default)))
}
