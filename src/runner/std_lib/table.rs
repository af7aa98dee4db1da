//! Table, row and cell generators.
//!
//! Cells are presented through the `real_table_cell` pseudo-role so that a
//! profile can format a cell's content separately from its row.

use std::collections::{HashSet, VecDeque};

use crate::runner::algo::table_row::{locate_cell, row_presentation, CellPosition, RowPresentation};
use crate::runner::api::Presenter;
use crate::runner::ds::accessible::{AccessibleRef, NativeId};
use crate::runner::ds::context::{Context, FormatMode, OutputChannel, PorValue, LAST_COLUMN, LAST_ROW};
use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::{AccessError, GeneratorResult};
use crate::runner::ds::role::Role;
use crate::runner::ds::state::StateSet;
use crate::runner::plugin::registry::GeneratorRegistry;

use super::naming::role_name_text;
use super::state::checked_state;
use super::{formatted, optional_text};

/// How deep to look for a descendant carrying a cell's text.
const DESCENDANT_SEARCH_DEPTH: usize = 4;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_native("table", table);
    registry.register_native("rowHeader", row_header);
    registry.register_native("columnHeader", column_header);
    registry.register_native("tableCellRow", table_cell_row);
    registry.register_native("realTableCell", real_table_cell);
    registry.register_native("cellCheckedState", cell_checked_state);
    registry.register_native("tableCell2ChildLabel", table_cell_2_child_label);
    registry.register_native("tableCell2ChildToggle", table_cell_2_child_toggle);
    registry.register_native(
        "realActiveDescendantDisplayedText",
        real_active_descendant_displayed_text,
    );
    registry.register_native("realActiveDescendantRoleName", real_active_descendant_role_name);
}

fn table(presenter: &Presenter, obj: &AccessibleRef, _ctx: &mut Context) -> GeneratorResult {
    let info = obj.query_table()?;
    Ok(formatted(presenter, "table_size", &[&info.n_rows, &info.n_columns]))
}

fn row_header(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    if ctx.reading_row {
        return Ok(ElementList::new());
    }
    let position = match locate_cell(presenter.script(), obj)? {
        Some(position) => position,
        None => return Ok(ElementList::new()),
    };
    let unchanged = ctx.point_of_reference().last_row() == Some(position.row);
    if unchanged && !ctx.format_mode.is_where_am_i() {
        return Ok(ElementList::new());
    }
    header_text(presenter, &position, position.info.row_header(position.row))
}

fn column_header(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    if ctx.reading_row {
        return Ok(ElementList::new());
    }
    let position = match locate_cell(presenter.script(), obj)? {
        Some(position) => position,
        None => return Ok(ElementList::new()),
    };
    let unchanged = ctx.point_of_reference().last_column() == Some(position.column);
    if unchanged && !ctx.format_mode.is_where_am_i() {
        return Ok(ElementList::new());
    }
    header_text(
        presenter,
        &position,
        position.info.column_header(position.column),
    )
}

fn header_text(
    presenter: &Presenter,
    position: &CellPosition,
    header: Option<&NativeId>,
) -> GeneratorResult {
    let header = match header {
        Some(id) => position.table.lookup(id)?,
        None => return Ok(ElementList::new()),
    };
    Ok(optional_text(presenter.script().displayed_text(&header)?))
}

/// The focused cell, or its whole row when navigation moved between rows.
fn table_cell_row(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    // Detailed where-am-i presents the row even when row reading is off.
    let detailed = ctx.format_mode == FormatMode::DetailedWhereAmI;
    if !presenter.settings().read_table_cell_row && !detailed {
        return real_table_cell(presenter, obj, ctx);
    }

    if obj.role()? == Role::TableRow {
        let cells = obj.children()?;
        let position = match cells.first() {
            Some(first) => locate_cell(presenter.script(), first)?,
            None => None,
        };
        return read_row(presenter, &cells, position.as_ref(), ctx);
    }

    let position = match locate_cell(presenter.script(), obj)? {
        Some(position) => position,
        None => return real_table_cell(presenter, obj, ctx),
    };
    ctx.stage(LAST_ROW, PorValue::Int(position.row as i64));
    ctx.stage(LAST_COLUMN, PorValue::Int(position.column as i64));

    if detailed && position.info.n_columns <= 1 {
        return Ok(ElementList::new());
    }

    let por = ctx.point_of_reference();
    let last = por.last_row().zip(por.last_column());
    let whole_row = ctx.channel == OutputChannel::Braille
        || detailed
        || row_presentation(last, position.row, position.column, position.info.n_rows)
            == RowPresentation::WholeRow;
    if !whole_row {
        return real_table_cell(presenter, obj, ctx);
    }
    let cells = position.row_cells();
    read_row(presenter, &cells, Some(&position), ctx)
}

fn read_row(
    presenter: &Presenter,
    cells: &[AccessibleRef],
    position: Option<&CellPosition>,
    ctx: &mut Context,
) -> GeneratorResult {
    let reading = std::mem::replace(&mut ctx.reading_row, true);
    let result = walk_row(presenter, cells, position, ctx);
    ctx.reading_row = reading;
    result
}

fn walk_row(
    presenter: &Presenter,
    cells: &[AccessibleRef],
    position: Option<&CellPosition>,
    ctx: &mut Context,
) -> GeneratorResult {
    let delimiter = match ctx.channel {
        OutputChannel::Braille => presenter.formats().string("cell_delimiter", 0),
        OutputChannel::Speech => None,
    };
    let mut out = ElementList::new();
    for cell in cells {
        // Scrolled-off and stale cells are not read.
        if !cell.has_state(StateSet::SHOWING).unwrap_or(false) {
            continue;
        }
        let mut content = ElementList::new();
        if let Some(position) = position {
            if is_unlabelled_toggle(presenter, cell, ctx)? {
                let column = position.info.position_of(cell.id()).map(|(_, c)| c);
                if let Some(header) = column.and_then(|c| position.info.column_header(c)) {
                    content.extend(header_text(presenter, position, Some(header))?);
                }
            }
        }
        {
            let mut cell_ctx = ctx.scoped_role(Role::RealTableCell);
            content.extend(presenter.generate_nested(cell, &mut cell_ctx));
        }
        if content.is_empty() {
            continue;
        }
        if let Some(delimiter) = delimiter {
            if !out.is_empty() {
                out.push_text(delimiter);
            }
        }
        out.push_nested(content);
    }
    Ok(out)
}

fn is_unlabelled_toggle(
    presenter: &Presenter,
    cell: &AccessibleRef,
    ctx: &Context,
) -> Result<bool, AccessError> {
    if !cell.has_action("toggle")? {
        return Ok(false);
    }
    let descendant = real_active_descendant(presenter, cell, ctx)?;
    Ok(presenter.script().displayed_text(&descendant)?.is_none())
}

/// The cell's own content, formatted as the `real_table_cell` pseudo-role.
fn real_table_cell(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    let mut cell_ctx = ctx.scoped_role(Role::RealTableCell);
    Ok(presenter.generate_nested(obj, &mut cell_ctx))
}

/// Checked state of a cell that toggles, presented as a check box.
fn cell_checked_state(presenter: &Presenter, obj: &AccessibleRef, ctx: &mut Context) -> GeneratorResult {
    if !obj.has_action("toggle")? {
        return Ok(ElementList::new());
    }
    let mut cell_ctx = ctx.scoped_role(Role::CheckBox);
    checked_state(presenter, obj, &mut cell_ctx)
}

/// A cell made of a toggle child and a label child, as `(toggle, label)`.
fn toggle_and_label(obj: &AccessibleRef) -> Result<Option<(AccessibleRef, AccessibleRef)>, AccessError> {
    let children = obj.children()?;
    match children.as_slice() {
        [first, second] => {
            if first.has_action("toggle")? {
                Ok(Some((first.clone(), second.clone())))
            } else if second.has_action("toggle")? {
                Ok(Some((second.clone(), first.clone())))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

fn table_cell_2_child_label(
    presenter: &Presenter,
    obj: &AccessibleRef,
    _ctx: &mut Context,
) -> GeneratorResult {
    match toggle_and_label(obj)? {
        Some((_, label)) => Ok(optional_text(presenter.script().displayed_text(&label)?)),
        None => Ok(ElementList::new()),
    }
}

fn table_cell_2_child_toggle(
    presenter: &Presenter,
    obj: &AccessibleRef,
    ctx: &mut Context,
) -> GeneratorResult {
    match toggle_and_label(obj)? {
        Some((toggle, _)) => {
            let mut toggle_ctx = ctx.scoped_role(Role::CheckBox);
            checked_state(presenter, &toggle, &mut toggle_ctx)
        }
        None => Ok(ElementList::new()),
    }
}

/// The object that actually carries a cell's text: the cell itself, or its
/// first descendant with displayed text when the cell has none.
fn real_active_descendant(
    presenter: &Presenter,
    obj: &AccessibleRef,
    ctx: &Context,
) -> Result<AccessibleRef, AccessError> {
    let script = presenter.script();
    if !ctx.role_for(obj)?.is_table_cell() || script.displayed_text(obj)?.is_some() {
        return Ok(obj.clone());
    }
    let mut visited = HashSet::new();
    visited.insert(obj.id().clone());
    let mut queue: VecDeque<(AccessibleRef, usize)> = VecDeque::new();
    queue.push_back((obj.clone(), 0));
    while let Some((node, depth)) = queue.pop_front() {
        if depth >= DESCENDANT_SEARCH_DEPTH {
            continue;
        }
        for child in node.children()? {
            if !visited.insert(child.id().clone()) {
                continue;
            }
            if script.displayed_text(&child)?.is_some() {
                return Ok(child);
            }
            queue.push_back((child, depth + 1));
        }
    }
    Ok(obj.clone())
}

fn real_active_descendant_displayed_text(
    presenter: &Presenter,
    obj: &AccessibleRef,
    ctx: &mut Context,
) -> GeneratorResult {
    let descendant = real_active_descendant(presenter, obj, ctx)?;
    Ok(optional_text(presenter.script().displayed_text(&descendant)?))
}

fn real_active_descendant_role_name(
    presenter: &Presenter,
    obj: &AccessibleRef,
    ctx: &mut Context,
) -> GeneratorResult {
    let descendant = real_active_descendant(presenter, obj, ctx)?;
    let role = if descendant == *obj {
        ctx.role_for(obj)?
    } else {
        descendant.role()?
    };
    Ok(optional_text(role_name_text(presenter, &descendant, role)?))
}
