//! Structural equality over payload graphs
//!
//! The walk is iterative and keeps a visited set keyed by pairs of branch
//! addresses, so a pair of branches shared in several places is only
//! compared once.

use std::collections::HashSet;
use std::sync::Arc;

use silverghost_actions::Node;

/// Address of a shared branch, or `None` for scalars
fn branch_id(node: &Node) -> Option<usize> {
    match node {
        Node::Map(map) => Some(Arc::as_ptr(map) as *const () as usize),
        Node::List(items) => Some(Arc::as_ptr(items) as *const () as usize),
        _ => None,
    }
}

fn equal_scalars(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Number(x), Node::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Deep structural equality.
///
/// Numbers compare by value (`1` equals `1.0`); map key order is irrelevant.
///
/// ```
/// use serde_json::json;
/// use silverghost_actions::Node;
/// use silverghost_reducers::graph::equal_graphs;
///
/// let a = Node::from(json!(["timestamp", "desc"]));
/// let b = Node::from(json!(["timestamp", "desc"]));
/// assert!(equal_graphs(&a, &b));
/// assert!(!equal_graphs(&a, &Node::from(json!(["timestamp", "asc"]))));
/// ```
pub fn equal_graphs(a: &Node, b: &Node) -> bool {
    equal_graphs_excluding(a, b, |_, _| false)
}

/// Deep structural equality ignoring map entries for which `exclude`
/// returns true.
fn equal_graphs_excluding<F>(a: &Node, b: &Node, exclude: F) -> bool
where
    F: Fn(&str, &Node) -> bool,
{
    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    let mut pending = vec![(a, b)];

    while let Some((a, b)) = pending.pop() {
        if a.shares_with(b) {
            continue;
        }
        if let (Some(x), Some(y)) = (branch_id(a), branch_id(b)) {
            if !visited.insert((x, y)) {
                continue;
            }
        }

        match (a, b) {
            (Node::Map(x), Node::Map(y)) => {
                let kept_x: Vec<_> = x.iter().filter(|(k, v)| !exclude(k, v)).collect();
                let kept_y: Vec<_> = y.iter().filter(|(k, v)| !exclude(k, v)).collect();
                if kept_x.len() != kept_y.len() {
                    return false;
                }
                for ((key_x, value_x), (key_y, value_y)) in kept_x.into_iter().zip(kept_y) {
                    if key_x != key_y {
                        return false;
                    }
                    pending.push((value_x, value_y));
                }
            }
            (Node::List(x), Node::List(y)) => {
                if x.len() != y.len() {
                    return false;
                }
                pending.extend(x.iter().zip(y.iter()));
            }
            _ => {
                if !equal_scalars(a, b) {
                    return false;
                }
            }
        }
    }
    true
}
