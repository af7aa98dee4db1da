//! Depth of a tree item below its tree.

use std::collections::HashSet;

use crate::runner::ds::accessible::AccessibleRef;
use crate::runner::ds::error::AccessError;
use crate::runner::ds::role::Role;

fn is_tree(role: Role) -> bool {
    matches!(role, Role::Tree | Role::TreeTable)
}

/// Whether `obj` lives somewhere below a tree or tree table.
pub fn in_tree(obj: &AccessibleRef) -> Result<bool, AccessError> {
    let mut visited = HashSet::new();
    let mut current = obj.parent()?;
    while let Some(node) = current {
        if !visited.insert(node.id().clone()) {
            return Ok(false);
        }
        if is_tree(node.role()?) {
            return Ok(true);
        }
        current = node.parent()?;
    }
    Ok(false)
}

/// Zero-based level of `obj` in its tree, or `None` outside a tree.
///
/// A `level` attribute (1-based) wins. Otherwise the node-child-of relation
/// is followed up to the tree, one level per hop.
pub fn node_level(obj: &AccessibleRef) -> Result<Option<usize>, AccessError> {
    if !in_tree(obj)? {
        return Ok(None);
    }
    if let Some(level) = obj.attribute("level")? {
        if let Ok(level) = level.trim().parse::<usize>() {
            if level > 0 {
                return Ok(Some(level - 1));
            }
        }
    }

    let mut visited = HashSet::new();
    visited.insert(obj.id().clone());
    let mut level = 0;
    let mut node = obj.node_child_of()?;
    while let Some(current) = node {
        if !visited.insert(current.id().clone()) || is_tree(current.role()?) {
            break;
        }
        level += 1;
        node = current.node_child_of()?;
    }
    Ok(Some(level))
}

/// How many lists enclose the list containing `obj`.
pub fn nesting_level(obj: &AccessibleRef) -> Result<usize, AccessError> {
    let mut visited = HashSet::new();
    let mut lists = 0usize;
    let mut current = obj.parent()?;
    while let Some(node) = current {
        if !visited.insert(node.id().clone()) {
            break;
        }
        if node.role()? == Role::List {
            lists += 1;
        }
        current = node.parent()?;
    }
    Ok(lists.saturating_sub(1))
}
