//! Where a table cell sits, and whether moving to it reads the whole row.

use crate::runner::ds::accessible::{AccessibleRef, TableInfo};
use crate::runner::ds::error::AccessError;
use crate::runner::ds::role::Role;
use crate::runner::script::Script;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPresentation {
    WholeRow,
    SingleCell,
}

/// Decide how to present the cell at (`row`, `column`) given the last
/// presented position.
///
/// The whole row is read when the row changed. It is also read when the
/// column did not change on the first or last row: navigation pinned
/// against a table edge re-announces the row.
pub fn row_presentation(
    last: Option<(usize, usize)>,
    row: usize,
    column: usize,
    n_rows: usize,
) -> RowPresentation {
    let (last_row, last_column) = match last {
        Some(last) => last,
        None => return RowPresentation::WholeRow,
    };
    if last_row != row {
        return RowPresentation::WholeRow;
    }
    let at_edge = row == 0 || row + 1 == n_rows;
    if at_edge && last_column == column {
        RowPresentation::WholeRow
    } else {
        RowPresentation::SingleCell
    }
}

/// A cell located inside its table.
#[derive(Debug, Clone)]
pub struct CellPosition {
    pub table: AccessibleRef,
    pub info: TableInfo,
    pub row: usize,
    pub column: usize,
}

impl CellPosition {
    /// The cells of this cell's row, left to right. Empty slots and stale
    /// cells are left out.
    pub fn row_cells(&self) -> Vec<AccessibleRef> {
        (0..self.info.n_columns)
            .filter_map(|column| self.info.cell_at(self.row, column))
            .filter_map(|id| self.table.lookup(id).ok())
            .collect()
    }
}

/// Find the table containing `cell` and the cell's coordinates in it.
///
/// `None` when there is no usable table: no parent, a layout-only table, a
/// parent without the table capability, or a cell the table does not list.
pub fn locate_cell(
    script: &dyn Script,
    cell: &AccessibleRef,
) -> Result<Option<CellPosition>, AccessError> {
    let mut table = cell.parent()?;
    if let Some(parent) = &table {
        if parent.role()? == Role::TableRow {
            table = parent.parent()?;
        }
    }
    let table = match table {
        Some(table) => table,
        None => return Ok(None),
    };
    if script.is_layout_only(&table)? {
        return Ok(None);
    }
    let info = match table.query_table() {
        Ok(info) => info,
        Err(AccessError::CapabilityUnavailable(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    Ok(info.position_of(cell.id()).map(|(row, column)| CellPosition {
        table,
        info,
        row,
        column,
    }))
}
