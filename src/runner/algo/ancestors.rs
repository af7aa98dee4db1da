//! The context breadcrumb: the named containers around an object.

use std::collections::HashSet;

use crate::runner::api::Presenter;
use crate::runner::ds::accessible::AccessibleRef;
use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::AccessError;
use crate::runner::ds::role::Role;
use crate::runner::script::Script;
use crate::runner::std_lib::naming::role_name_text;

/// U+FFFC, which toolkits put in text where a child object is embedded.
pub const EMBEDDED_OBJECT_CHAR: char = '\u{fffc}';

/// Describe the ancestors of `obj` up to (not including) `stop`, outermost
/// first. Each described ancestor is one nested element list.
pub fn collect_context(
    presenter: &Presenter,
    obj: &AccessibleRef,
    stop: Option<&AccessibleRef>,
) -> Result<ElementList, AccessError> {
    let script = presenter.script();
    let settings = presenter.settings();

    let mut parent = obj.parent()?;
    // A cell inside a cell is presented together with its container.
    if obj.role()?.is_table_cell() {
        if let Some(p) = &parent {
            if p.role()? == Role::TableCell {
                parent = p.parent()?;
            }
        }
    }

    let mut visited = HashSet::new();
    visited.insert(obj.id().clone());
    let mut entries = vec![];
    while let Some(current) = parent {
        if !visited.insert(current.id().clone()) {
            break;
        }
        if let Some(stop) = stop {
            if script.is_same_object(&current, stop) {
                break;
            }
        }
        // A container that went defunct ends the breadcrumb; what was
        // collected below it is still presented.
        let role = match live(current.role())? {
            Some(role) => role,
            None => break,
        };
        if settings.context_stop_roles.contains(&role) {
            break;
        }
        let next = live(current.parent())?.flatten();

        if role == Role::Menu {
            if let Some(combo) = &next {
                if live(combo.role())? == Some(Role::ComboBox) {
                    parent = next;
                    continue;
                }
            }
        }
        let layout_only = match live(script.is_layout_only(&current))? {
            Some(layout_only) => layout_only,
            None => break,
        };
        if settings.context_skip_roles.contains(&role) || layout_only {
            parent = next;
            continue;
        }
        match live(describe(presenter, &current, role))? {
            Some(Some(entry)) => entries.push(entry),
            Some(None) => {}
            None => break,
        }
        parent = next;
    }

    let mut out = ElementList::new();
    for entry in entries.into_iter().rev() {
        out.push_nested(entry);
    }
    Ok(out)
}

/// `None` when the object behind `result` has gone defunct.
fn live<T>(result: Result<T, AccessError>) -> Result<Option<T>, AccessError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AccessError::StaleObject(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn describe(
    presenter: &Presenter,
    obj: &AccessibleRef,
    role: Role,
) -> Result<Option<ElementList>, AccessError> {
    let script = presenter.script();
    let settings = presenter.settings();

    if only_embeds_children(obj, role)? {
        return Ok(None);
    }
    let text = script
        .displayed_text(obj)?
        .filter(|t| !settings.is_internal_text(t));
    let label = script
        .displayed_label(obj)?
        .filter(|l| !settings.is_internal_text(l) && Some(l) != text.as_ref());
    if text.is_none() && label.is_none() {
        return Ok(None);
    }

    let mut entry = ElementList::new();
    if !settings.context_dont_announce_roles.contains(&role) {
        if let Some(name) = role_name_text(presenter, obj, role)? {
            entry.push_text(name);
        }
    }
    if let Some(label) = label {
        entry.push_text(label);
    }
    if let Some(text) = text {
        entry.push_text(text);
    }
    Ok(Some(entry))
}

/// Text that is nothing but an embedded child, or a table cell that embeds
/// one.
fn only_embeds_children(obj: &AccessibleRef, role: Role) -> Result<bool, AccessError> {
    let text = match obj.query_text() {
        Ok(info) => info.text,
        Err(AccessError::CapabilityUnavailable(_)) => return Ok(false),
        Err(e) => return Err(e),
    };
    let mut chars = text.chars();
    let single = chars.next() == Some(EMBEDDED_OBJECT_CHAR) && chars.next().is_none();
    Ok(single || (role == Role::TableCell && text.contains(EMBEDDED_OBJECT_CHAR)))
}

/// The nearest ancestor of `obj` that also contains `prior` (or is it).
///
/// `None` when `prior` is defunct; context then runs to the top.
pub fn common_ancestor(
    script: &dyn Script,
    prior: &AccessibleRef,
    obj: &AccessibleRef,
) -> Result<Option<AccessibleRef>, AccessError> {
    if prior.is_defunct() {
        return Ok(None);
    }
    let mut chain = vec![];
    let mut current = Some(prior.clone());
    while let Some(node) = current {
        if chain.iter().any(|seen: &AccessibleRef| seen.id() == node.id()) {
            break;
        }
        current = match node.parent() {
            Ok(parent) => parent,
            // Stale links above the prior object only shorten its chain.
            Err(AccessError::StaleObject(_)) => None,
            Err(e) => return Err(e),
        };
        chain.push(node);
    }

    let mut visited = HashSet::new();
    let mut current = obj.parent()?;
    while let Some(node) = current {
        if !visited.insert(node.id().clone()) {
            break;
        }
        if chain.iter().any(|p| script.is_same_object(p, &node)) {
            return Ok(Some(node));
        }
        current = node.parent()?;
    }
    Ok(None)
}
