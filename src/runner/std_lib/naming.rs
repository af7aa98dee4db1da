//! Names, labels, role names and other plain text about an object.

use crate::runner::api::Presenter;
use crate::runner::ds::accessible::AccessibleRef;
use crate::runner::ds::context::Context;
use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::{AccessError, GeneratorResult};
use crate::runner::ds::role::Role;
use crate::runner::ds::state::StateSet;
use crate::runner::plugin::config::Verbosity;
use crate::runner::plugin::registry::GeneratorRegistry;

use super::{fill, formatted, optional_text};

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_native("name", name);
    registry.register_native("label", label);
    registry.register_native("labelAndName", label_and_name);
    registry.register_native("labelOrName", label_or_name);
    registry.register_native("description", description);
    registry.register_native("roleName", role_name);
    registry.register_native("displayedText", displayed_text);
    registry.register_native("placeholderText", placeholder_text);
    registry.register_native("imageDescription", image_description);
    registry.register_native("value", value);
    registry.register_native("applicationName", application_name);
    registry.register_native("currentLineText", current_line_text);
    registry.register_native("positionInList", position_in_list);
}

fn name(_presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    Ok(optional_text(obj.name()?))
}

fn label(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    Ok(optional_text(presenter.script().displayed_label(obj)?))
}

/// The label followed by the name, the name dropped when it repeats the label.
fn label_and_name(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    let label = presenter.script().displayed_label(obj)?;
    let name = obj.name()?;
    let mut out = ElementList::new();
    if let Some(label) = &label {
        out.push_text(label.clone());
    }
    if let Some(name) = name {
        if label.as_deref() != Some(name.as_str()) {
            out.push_text(name);
        }
    }
    Ok(out)
}

fn label_or_name(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    match presenter.script().displayed_label(obj)? {
        Some(label) => Ok(ElementList::text(label)),
        None => Ok(optional_text(obj.name()?)),
    }
}

fn description(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    let description = match obj.description()? {
        Some(d) => d,
        None => return Ok(ElementList::new()),
    };
    let needle = description.to_lowercase();
    let repeats = |text: Option<String>| {
        text.map(|t| t.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };
    if repeats(obj.name()?) || repeats(presenter.script().displayed_label(obj)?) {
        return Ok(ElementList::new());
    }
    Ok(ElementList::text(description))
}

fn role_name(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    let role = ctx.role_for(obj)?;
    Ok(optional_text(role_name_text(presenter, obj, role)?))
}

/// How `role` is announced for `obj`, or `None` when it is not announced.
pub fn role_name_text(
    presenter: &Presenter,
    obj: &AccessibleRef,
    role: Role,
) -> Result<Option<String>, AccessError> {
    let role = match role {
        Role::RealTableCell => Role::TableCell,
        other => other,
    };
    match role {
        Role::Unknown | Role::Filler | Role::Redundant | Role::Extended => return Ok(None),
        Role::Icon | Role::Canvas if presenter.settings().verbosity == Verbosity::Brief => {
            return Ok(None)
        }
        Role::Menu => {
            if let Some(parent) = obj.parent()? {
                if parent.role()? == Role::ComboBox {
                    return Ok(Some(Role::ComboBox.spoken_name().to_string()));
                }
            }
        }
        Role::Heading => {
            let level = obj
                .attribute("level")?
                .and_then(|l| l.trim().parse::<usize>().ok());
            if let (Some(level), Some(template)) =
                (level, presenter.formats().string("heading_level", 0))
            {
                return Ok(Some(fill(template, &[&level])));
            }
        }
        _ => {}
    }
    Ok(Some(role.spoken_name().to_string()))
}

fn displayed_text(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    Ok(optional_text(presenter.script().displayed_text(obj)?))
}

/// The placeholder hint of an empty entry.
fn placeholder_text(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    if presenter.script().displayed_text(obj)?.is_some() {
        return Ok(ElementList::new());
    }
    let placeholder = obj
        .attribute("placeholder-text")?
        .filter(|p| !p.trim().is_empty());
    Ok(optional_text(placeholder))
}

fn image_description(_presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    match obj.query_image() {
        Ok(image) if !image.description.trim().is_empty() => {
            Ok(ElementList::text(image.description))
        }
        Ok(_) | Err(AccessError::CapabilityUnavailable(_)) => Ok(ElementList::new()),
        Err(e) => Err(e.into()),
    }
}

fn value(_presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    let value = obj.query_value()?;
    Ok(ElementList::text(value.as_text()))
}

fn application_name(_presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    Ok(optional_text(obj.application_name()?))
}

fn current_line_text(_presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    let text = obj.query_text()?;
    let line = text.current_line().trim();
    Ok(if line.is_empty() {
        ElementList::new()
    } else {
        ElementList::text(line)
    })
}

/// "n of m" among the siblings that share the object's role.
fn position_in_list(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    if !(presenter.settings().enable_position_speaking || ctx.format_mode.is_where_am_i()) {
        return Ok(ElementList::new());
    }
    let (position, size) = match list_position(obj)? {
        Some(found) => found,
        None => return Ok(ElementList::new()),
    };
    Ok(formatted(presenter, "position", &[&position, &size]))
}

/// 1-based position and set size, from the posinset/setsize attributes when
/// the toolkit supplies them.
pub fn list_position(obj: &AccessibleRef) -> Result<Option<(usize, usize)>, AccessError> {
    let parse = |v: Option<String>| v.and_then(|v| v.trim().parse::<usize>().ok());
    if let (Some(position), Some(size)) = (
        parse(obj.attribute("posinset")?),
        parse(obj.attribute("setsize")?),
    ) {
        return Ok(Some((position, size)));
    }

    let parent = match obj.parent()? {
        Some(parent) => parent,
        None => return Ok(None),
    };
    let role = obj.role()?;
    let mut position = None;
    let mut size = 0;
    for sibling in parent.children()? {
        if sibling.role()? != role || !sibling.has_state(StateSet::SHOWING)? {
            continue;
        }
        size += 1;
        if sibling == *obj {
            position = Some(size);
        }
    }
    Ok(position.map(|p| (p, size)))
}
