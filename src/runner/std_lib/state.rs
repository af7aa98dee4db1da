//! State indicators: checked, pressed, expanded and friends.

use crate::runner::api::Presenter;
use crate::runner::ds::accessible::AccessibleRef;
use crate::runner::ds::context::Context;
use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::GeneratorResult;
use crate::runner::ds::role::Role;
use crate::runner::ds::state::StateSet;
use crate::runner::plugin::registry::GeneratorRegistry;

use super::indicator;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_native("checkedState", checked_state);
    registry.register_native("checkedStateIfCheckable", checked_state_if_checkable);
    registry.register_native("radioState", radio_state);
    registry.register_native("toggleState", toggle_state);
    registry.register_native("expandableState", expandable_state);
    registry.register_native("menuItemCheckedState", menu_item_checked_state);
    registry.register_native("availability", availability);
    registry.register_native("required", required);
    registry.register_native("readOnly", read_only);
}

/// Checked, not checked or partially checked, for anything presented as a
/// check box.
pub(crate) fn checked_state(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    let role = ctx.role_for(obj)?;
    let states = obj.states()?;
    let checkable = matches!(role, Role::CheckBox | Role::CheckMenuItem)
        || states.contains(StateSet::CHECKABLE);
    if !checkable {
        return Ok(ElementList::new());
    }
    let index = if states.contains(StateSet::INDETERMINATE) {
        2
    } else if states.contains(StateSet::CHECKED) {
        1
    } else {
        0
    };
    Ok(indicator(presenter, "checkbox", index))
}

fn checked_state_if_checkable(
    presenter: &Presenter,
    obj: &AccessibleRef,
    ctx: &mut Context,
) -> GeneratorResult {
    if !obj.has_state(StateSet::CHECKABLE)? && ctx.role_for(obj)? != Role::CheckMenuItem {
        return Ok(ElementList::new());
    }
    checked_state(presenter, obj, ctx)
}

fn radio_state(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    if !matches!(ctx.role_for(obj)?, Role::RadioButton | Role::RadioMenuItem) {
        return Ok(ElementList::new());
    }
    let index = usize::from(obj.has_state(StateSet::CHECKED)?);
    Ok(indicator(presenter, "radiobutton", index))
}

fn toggle_state(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    let states = obj.states()?;
    let on = states.intersects(StateSet::PRESSED | StateSet::CHECKED);
    Ok(indicator(presenter, "togglebutton", usize::from(on)))
}

fn expandable_state(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    let states = obj.states()?;
    if !states.contains(StateSet::EXPANDABLE) {
        return Ok(ElementList::new());
    }
    let index = usize::from(states.contains(StateSet::EXPANDED));
    Ok(indicator(presenter, "expansion", index))
}

fn menu_item_checked_state(
    presenter: &Presenter,
    obj: &AccessibleRef,
    ctx: &mut Context,
) -> GeneratorResult {
    if !matches!(ctx.role_for(obj)?, Role::CheckMenuItem | Role::RadioMenuItem) {
        return Ok(ElementList::new());
    }
    let index = usize::from(obj.has_state(StateSet::CHECKED)?);
    Ok(indicator(presenter, "menuitem_check", index))
}

fn availability(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    if obj.has_state(StateSet::SENSITIVE)? {
        return Ok(ElementList::new());
    }
    Ok(indicator(presenter, "insensitive", 0))
}

fn required(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    if !obj.has_state(StateSet::REQUIRED)? {
        return Ok(ElementList::new());
    }
    Ok(indicator(presenter, "required", 0))
}

fn read_only(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    if !ctx.role_for(obj)?.is_editable_text() || !obj.has_state(StateSet::READ_ONLY)? {
        return Ok(ElementList::new());
    }
    Ok(indicator(presenter, "readonly", 0))
}
