//! Addressing reductions inside the state tree
//!
//! A state tree is keyed by the parameters a path resolves to: the action
//! `WELCOME` with params `["room", "hi"]` lands at `tree["room"]["hi"]`.

use serde_json::Value;
use silverghost_actions::query::scalar_text;
use silverghost_actions::{ActionDefinition, ActionInstance, PathgroupOptions};

use crate::error::Result;

/// Where a reduction lives in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    /// Resolved explicit and implicit params, `null` where unresolved
    pub pathgroup_params: Vec<Value>,
    /// Tree keys, stopping at the first unresolved param
    pub path: Vec<String>,
}

/// Resolves the tree address of `params` under `definition`.
///
/// The params are rendered into a path and resolved back through the
/// pathgroups, so implicit values omitted from `params` take their
/// defaults. A `null` slot falls back to the raw param at the same
/// position; when that is missing too the address ends there.
pub fn address(definition: &ActionDefinition, params: &[Value]) -> Result<Address> {
    let pathname = definition.pathname_for(params, "");
    let pathgroup_params = definition.pathgroup_params(&pathname, PathgroupOptions::all())?;

    let path = pathgroup_params
        .iter()
        .enumerate()
        .map_while(|(index, value)| {
            let value = match value {
                Value::Null => params.get(index).filter(|param| !param.is_null())?,
                other => other,
            };
            Some(scalar_text(value))
        })
        .collect();

    Ok(Address {
        pathgroup_params,
        path,
    })
}

/// Branch continuity: whether `reduction` may be layered onto `state`.
///
/// Both must share the action type, and the reduction's params that are
/// not pathgroup values must all appear among the state's (compared as
/// text, over the first `pathgroup_params.len()` of each).
pub fn is_same_pathgroup(
    pathgroup_params: &[Value],
    state: Option<&ActionInstance>,
    reduction: &ActionInstance,
) -> bool {
    let Some(state) = state else {
        return false;
    };
    if state.action_type != reduction.action_type {
        return false;
    }

    let extra = |action: &ActionInstance| -> Vec<String> {
        action
            .params_or_empty()
            .iter()
            .filter(|param| !pathgroup_params.contains(param))
            .map(scalar_text)
            .take(pathgroup_params.len())
            .collect()
    };
    let state_extra = extra(state);
    extra(reduction)
        .iter()
        .all(|param| state_extra.contains(param))
}
