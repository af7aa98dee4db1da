//! Generators that look at an object's place in the tree.

use std::collections::HashSet;

use crate::runner::algo::ancestors::{collect_context, common_ancestor};
use crate::runner::algo::node_level::{nesting_level, node_level as level_in_tree};
use crate::runner::api::Presenter;
use crate::runner::ds::accessible::AccessibleRef;
use crate::runner::ds::context::{Context, OutputChannel, PorValue, LAST_NODE_LEVEL};
use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::{AccessError, GeneratorResult};
use crate::runner::ds::role::Role;
use crate::runner::plugin::registry::GeneratorRegistry;

use super::{formatted, optional_text};

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_native("ancestors", ancestors);
    registry.register_native("nodeLevel", node_level);
    registry.register_native("nestingLevel", nesting_level_gen);
    registry.register_native("radioButtonGroup", radio_button_group);
    registry.register_native("namedContainingPanel", named_containing_panel);
}

/// Context that changed since the prior object. Nothing without one.
fn ancestors(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    let prior = match &ctx.prior_object {
        Some(prior) => prior.clone(),
        None => return Ok(ElementList::new()),
    };
    let stop = common_ancestor(presenter.script(), &prior, obj)?;
    Ok(collect_context(presenter, obj, stop.as_ref())?)
}

/// "tree level n", spoken when the level changed or on request.
fn node_level(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    let level = match level_in_tree(obj)? {
        Some(level) => level,
        None => return Ok(ElementList::new()),
    };
    let changed = ctx.point_of_reference().get_int(LAST_NODE_LEVEL) != Some(level as i64);
    ctx.stage(LAST_NODE_LEVEL, PorValue::Int(level as i64));
    let always = ctx.format_mode.is_where_am_i() || ctx.channel == OutputChannel::Braille;
    if !(changed || always) {
        return Ok(ElementList::new());
    }
    Ok(formatted(presenter, "node_level", &[&(level + 1)]))
}

fn nesting_level_gen(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    if !matches!(ctx.role_for(obj)?, Role::ListItem | Role::List) {
        return Ok(ElementList::new());
    }
    match nesting_level(obj)? {
        0 => Ok(ElementList::new()),
        level => Ok(formatted(presenter, "nesting_level", &[&level])),
    }
}

/// Walk the ancestors of `obj` below the enclosing window, returning the
/// first `Some` that `pick` yields.
fn find_enclosing<T>(
    obj: &AccessibleRef,
    mut pick: impl FnMut(&AccessibleRef, Role) -> Result<Option<T>, AccessError>,
) -> Result<Option<T>, AccessError> {
    let mut visited = HashSet::new();
    let mut current = obj.parent()?;
    while let Some(node) = current {
        if !visited.insert(node.id().clone()) {
            break;
        }
        let role = node.role()?;
        if matches!(role, Role::Frame | Role::Dialog | Role::Application) {
            break;
        }
        if let Some(found) = pick(&node, role)? {
            return Ok(Some(found));
        }
        current = node.parent()?;
    }
    Ok(None)
}

/// The label of the group a radio button belongs to.
fn radio_button_group(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    if ctx.role_for(obj)? != Role::RadioButton {
        return Ok(ElementList::new());
    }
    let script = presenter.script();
    let label = find_enclosing(obj, |node, role| {
        if !matches!(role, Role::Panel | Role::Grouping | Role::Filler) {
            return Ok(None);
        }
        match script.displayed_label(node)? {
            Some(label) => Ok(Some(label)),
            None => node.name(),
        }
    })?;
    Ok(optional_text(label))
}

fn named_containing_panel(
    _presenter: &Presenter,
    obj: &AccessibleRef,
    _ctx: &mut Context,
) -> GeneratorResult {
    let name = find_enclosing(obj, |node, role| {
        if role != Role::Panel {
            return Ok(None);
        }
        node.name()
    })?;
    Ok(optional_text(name))
}
