//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use utter::runner::api::Presenter;
use utter::runner::ds::{
    AccessibleRef, ElementList, MemoryTree, NativeId, ObjectCache, OutputChannel, Role, Snapshot,
    StateSet,
};
use utter::runner::format::FormatTable;
use utter::runner::plugin::{GeneratorFn, GeneratorRegistry, Settings};
use utter::runner::script::DefaultScript;

/// An in-memory tree and a cache over it.
pub struct Fixture {
    pub tree: MemoryTree,
    pub cache: ObjectCache,
}

impl Fixture {
    pub fn new() -> Self {
        let tree = MemoryTree::new();
        let cache = ObjectCache::new(Box::new(tree.clone()));
        Fixture { tree, cache }
    }

    /// Add a node under `parent` with a readable id.
    pub fn add(&self, id: &str, parent: Option<&str>, snapshot: Snapshot) -> NativeId {
        let parent = parent.map(NativeId::new);
        self.tree
            .add_with_id(NativeId::new(id), parent.as_ref(), snapshot)
    }

    pub fn get(&self, id: &str) -> AccessibleRef {
        self.cache
            .get(&NativeId::new(id))
            .unwrap_or_else(|e| panic!("fixture object {}: {}", id, e))
    }
}

pub fn named(role: Role, name: &str) -> Snapshot {
    Snapshot::new(role).with_name(name)
}

pub fn speech() -> Presenter {
    Presenter::with_defaults(OutputChannel::Speech)
}

pub fn braille() -> Presenter {
    Presenter::with_defaults(OutputChannel::Braille)
}

/// A presenter over `table` alone, with stock settings and script.
pub fn presenter_with(
    channel: OutputChannel,
    table: FormatTable,
    generators: GeneratorRegistry,
) -> Presenter {
    Presenter::new(
        channel,
        &table,
        generators,
        Rc::new(DefaultScript),
        Settings::default(),
    )
}

/// A generator that always says `text`.
pub fn says(text: &'static str) -> GeneratorFn {
    GeneratorFn::Plugin(Box::new(move |_, _, _| Ok(ElementList::text(text))))
}

pub fn checked() -> StateSet {
    StateSet::CHECKABLE | StateSet::CHECKED
}

/// A `frame` holding a `table` of `rows` x `columns` cells. Cells have ids
/// `cell_{row}_{column}` and names `r{row}c{column}`; column headers are
/// `Column {n}`.
pub fn build_table(fixture: &Fixture, rows: usize, columns: usize) {
    build_table_with(fixture, rows, columns, |_, _, snapshot| snapshot);
}

pub fn build_table_with<F>(fixture: &Fixture, rows: usize, columns: usize, mut cell: F)
where
    F: FnMut(usize, usize, Snapshot) -> Snapshot,
{
    use utter::runner::ds::TableInfo;

    fixture.add("frame", None, named(Role::Frame, "Files"));
    let mut info = TableInfo::new(rows, columns);
    for row in 0..rows {
        for column in 0..columns {
            info.set_cell(row, column, cell_id(row, column));
        }
    }
    let mut headers = vec![];
    for column in 0..columns {
        let id = format!("header_{}", column);
        headers.push(Some(NativeId::new(id.as_str())));
    }
    info.column_headers = headers;
    fixture.add("table", Some("frame"), named(Role::Table, "Listing").with_table(info));
    for column in 0..columns {
        fixture.add(
            &format!("header_{}", column),
            Some("table"),
            named(Role::TableColumnHeader, &format!("Column {}", column)),
        );
    }
    for row in 0..rows {
        for column in 0..columns {
            let snapshot = named(Role::TableCell, &format!("r{}c{}", row, column));
            fixture.add(
                cell_id(row, column).as_str(),
                Some("table"),
                cell(row, column, snapshot),
            );
        }
    }
}

pub fn cell_id(row: usize, column: usize) -> NativeId {
    NativeId::new(format!("cell_{}_{}", row, column))
}
