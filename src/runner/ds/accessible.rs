//! The object facade.
//!
//! An [`AccessibleRef`] wraps one native accessible object. Attributes are
//! served from a [`Snapshot`] taken when the facade was created (or last
//! refreshed). Once the owning cache delivers a defunct notification every
//! query fails with [`AccessError::StaleObject`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use uuid::Uuid;

use super::cache::CacheInner;
use super::error::AccessError;
use super::role::Role;
use super::state::StateSet;

/// Native identity of an accessible object. Cache key and identity token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeId(String);

impl NativeId {
    pub fn new(id: impl Into<String>) -> Self {
        NativeId(id.into())
    }

    /// A fresh, unique identity.
    pub fn generate() -> Self {
        NativeId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NativeId {
    fn from(s: &str) -> Self {
        NativeId::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Text,
    Table,
    Value,
    Action,
    Image,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Text => "text",
            Capability::Table => "table",
            Capability::Value => "value",
            Capability::Action => "action",
            Capability::Image => "image",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInfo {
    pub text: String,
    pub caret_offset: usize,
}

impl TextInfo {
    pub fn new(text: impl Into<String>) -> Self {
        TextInfo {
            text: text.into(),
            caret_offset: 0,
        }
    }

    /// The line holding the caret, without its terminator.
    pub fn current_line(&self) -> &str {
        let mut start = 0;
        for line in self.text.split_inclusive('\n') {
            let end = start + line.len();
            if self.caret_offset < end || end == self.text.len() {
                return line.trim_end_matches(['\n', '\r']);
            }
            start = end;
        }
        ""
    }
}

/// Table capability: dimensions plus row-major cell identities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableInfo {
    pub n_rows: usize,
    pub n_columns: usize,
    pub cells: Vec<Option<NativeId>>,
    pub column_headers: Vec<Option<NativeId>>,
    pub row_headers: Vec<Option<NativeId>>,
}

impl TableInfo {
    pub fn new(n_rows: usize, n_columns: usize) -> Self {
        TableInfo {
            n_rows,
            n_columns,
            cells: vec![None; n_rows * n_columns],
            column_headers: vec![],
            row_headers: vec![],
        }
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Option<&NativeId> {
        if row >= self.n_rows || column >= self.n_columns {
            return None;
        }
        self.cells.get(row * self.n_columns + column)?.as_ref()
    }

    pub fn set_cell(&mut self, row: usize, column: usize, id: NativeId) {
        let index = row * self.n_columns + column;
        if row < self.n_rows && column < self.n_columns {
            if self.cells.len() <= index {
                self.cells.resize(self.n_rows * self.n_columns, None);
            }
            self.cells[index] = Some(id);
        }
    }

    /// `(row, column)` of the cell with identity `id`.
    pub fn position_of(&self, id: &NativeId) -> Option<(usize, usize)> {
        if self.n_columns == 0 {
            return None;
        }
        let index = self.cells.iter().position(|c| c.as_ref() == Some(id))?;
        Some((index / self.n_columns, index % self.n_columns))
    }

    pub fn column_header(&self, column: usize) -> Option<&NativeId> {
        self.column_headers.get(column)?.as_ref()
    }

    pub fn row_header(&self, row: usize) -> Option<&NativeId> {
        self.row_headers.get(row)?.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueInfo {
    pub current: f64,
    pub minimum: f64,
    pub maximum: f64,
    /// Toolkit-provided rendering of the value, preferred over `current`.
    pub text: Option<String>,
}

impl ValueInfo {
    pub fn as_text(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        if self.current.fract() == 0.0 && self.current.abs() < 1e15 {
            format!("{:.0}", self.current)
        } else {
            self.current.to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionInfo {
    pub names: Vec<String>,
}

impl ActionInfo {
    pub fn has(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageInfo {
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relations {
    pub labelled_by: Vec<NativeId>,
    pub node_child_of: Option<NativeId>,
}

/// Everything the facade knows about one native object.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub role: Role,
    pub states: StateSet,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<NativeId>,
    pub children: Vec<NativeId>,
    pub index_in_parent: Option<usize>,
    pub attributes: HashMap<String, String>,
    pub relations: Relations,
    pub application: Option<String>,
    pub text: Option<TextInfo>,
    pub table: Option<TableInfo>,
    pub value: Option<ValueInfo>,
    pub action: Option<ActionInfo>,
    pub image: Option<ImageInfo>,
}

impl Snapshot {
    pub fn new(role: Role) -> Self {
        Snapshot {
            role,
            states: StateSet::interactive(),
            name: None,
            description: None,
            parent: None,
            children: vec![],
            index_in_parent: None,
            attributes: HashMap::new(),
            relations: Relations::default(),
            application: None,
            text: None,
            table: None,
            value: None,
            action: None,
            image: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_states(mut self, states: StateSet) -> Self {
        self.states = states;
        self
    }

    pub fn add_states(mut self, states: StateSet) -> Self {
        self.states |= states;
        self
    }

    pub fn remove_states(mut self, states: StateSet) -> Self {
        self.states.remove(states);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(TextInfo::new(text));
        self
    }

    pub fn with_table(mut self, table: TableInfo) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_value(mut self, value: ValueInfo) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_actions(mut self, names: &[&str]) -> Self {
        self.action = Some(ActionInfo {
            names: names.iter().map(|n| n.to_string()).collect(),
        });
        self
    }

    pub fn with_image_description(mut self, description: impl Into<String>) -> Self {
        self.image = Some(ImageInfo {
            description: description.into(),
        });
        self
    }

    pub fn labelled_by(mut self, label: NativeId) -> Self {
        self.relations.labelled_by.push(label);
        self
    }

    pub fn node_child_of(mut self, node: NativeId) -> Self {
        self.relations.node_child_of = Some(node);
        self
    }

    pub fn with_application(mut self, name: impl Into<String>) -> Self {
        self.application = Some(name.into());
        self
    }
}

pub(crate) struct AccessibleInner {
    id: NativeId,
    snapshot: RefCell<Snapshot>,
    defunct: Cell<bool>,
    cache: Weak<CacheInner>,
}

/// Shared handle to one cached accessible object.
///
/// Cloning shares the facade. Equality is identity of the facade, which the
/// cache guarantees is one per native object.
#[derive(Clone)]
pub struct AccessibleRef(Rc<AccessibleInner>);

impl AccessibleRef {
    pub(crate) fn new(id: NativeId, snapshot: Snapshot, cache: Weak<CacheInner>) -> Self {
        AccessibleRef(Rc::new(AccessibleInner {
            id,
            snapshot: RefCell::new(snapshot),
            defunct: Cell::new(false),
            cache,
        }))
    }

    pub fn id(&self) -> &NativeId {
        &self.0.id
    }

    pub fn is_defunct(&self) -> bool {
        self.0.defunct.get()
    }

    pub(crate) fn mark_defunct(&self) {
        self.0.defunct.set(true);
    }

    pub(crate) fn replace_snapshot(&self, snapshot: Snapshot) {
        *self.0.snapshot.borrow_mut() = snapshot;
    }

    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> Result<T, AccessError> {
        if self.is_defunct() {
            return Err(AccessError::StaleObject(self.0.id.clone()));
        }
        Ok(f(&self.0.snapshot.borrow()))
    }

    fn capability<T: Clone>(
        &self,
        capability: Capability,
        f: impl FnOnce(&Snapshot) -> Option<&T>,
    ) -> Result<T, AccessError> {
        self.read(|s| f(s).cloned())?
            .ok_or(AccessError::CapabilityUnavailable(capability))
    }

    /// Resolve another object through the cache this facade belongs to.
    pub fn lookup(&self, id: &NativeId) -> Result<AccessibleRef, AccessError> {
        let cache = self
            .0
            .cache
            .upgrade()
            .ok_or_else(|| AccessError::StaleObject(id.clone()))?;
        CacheInner::get(&cache, id)
    }

    pub fn role(&self) -> Result<Role, AccessError> {
        self.read(|s| s.role)
    }

    pub fn states(&self) -> Result<StateSet, AccessError> {
        self.read(|s| s.states)
    }

    pub fn has_state(&self, state: StateSet) -> Result<bool, AccessError> {
        self.read(|s| s.states.contains(state))
    }

    /// The accessible name, `None` when absent or empty.
    pub fn name(&self) -> Result<Option<String>, AccessError> {
        self.read(|s| s.name.clone().filter(|n| !n.is_empty()))
    }

    pub fn description(&self) -> Result<Option<String>, AccessError> {
        self.read(|s| s.description.clone().filter(|d| !d.is_empty()))
    }

    pub fn parent(&self) -> Result<Option<AccessibleRef>, AccessError> {
        match self.read(|s| s.parent.clone())? {
            Some(id) => Ok(Some(self.lookup(&id)?)),
            None => Ok(None),
        }
    }

    pub fn child_count(&self) -> Result<usize, AccessError> {
        self.read(|s| s.children.len())
    }

    pub fn child_at(&self, index: usize) -> Result<Option<AccessibleRef>, AccessError> {
        match self.read(|s| s.children.get(index).cloned())? {
            Some(id) => Ok(Some(self.lookup(&id)?)),
            None => Ok(None),
        }
    }

    pub fn children(&self) -> Result<Vec<AccessibleRef>, AccessError> {
        let ids = self.read(|s| s.children.clone())?;
        ids.iter().map(|id| self.lookup(id)).collect()
    }

    pub fn index_in_parent(&self) -> Result<Option<usize>, AccessError> {
        self.read(|s| s.index_in_parent)
    }

    pub fn attribute(&self, key: &str) -> Result<Option<String>, AccessError> {
        self.read(|s| s.attributes.get(key).cloned())
    }

    pub fn application_name(&self) -> Result<Option<String>, AccessError> {
        self.read(|s| s.application.clone())
    }

    pub fn labelled_by(&self) -> Result<Vec<AccessibleRef>, AccessError> {
        let ids = self.read(|s| s.relations.labelled_by.clone())?;
        ids.iter().map(|id| self.lookup(id)).collect()
    }

    pub fn node_child_of(&self) -> Result<Option<AccessibleRef>, AccessError> {
        match self.read(|s| s.relations.node_child_of.clone())? {
            Some(id) => Ok(Some(self.lookup(&id)?)),
            None => Ok(None),
        }
    }

    pub fn supports(&self, capability: Capability) -> Result<bool, AccessError> {
        self.read(|s| match capability {
            Capability::Text => s.text.is_some(),
            Capability::Table => s.table.is_some(),
            Capability::Value => s.value.is_some(),
            Capability::Action => s.action.is_some(),
            Capability::Image => s.image.is_some(),
        })
    }

    pub fn query_text(&self) -> Result<TextInfo, AccessError> {
        self.capability(Capability::Text, |s| s.text.as_ref())
    }

    pub fn query_table(&self) -> Result<TableInfo, AccessError> {
        self.capability(Capability::Table, |s| s.table.as_ref())
    }

    pub fn query_value(&self) -> Result<ValueInfo, AccessError> {
        self.capability(Capability::Value, |s| s.value.as_ref())
    }

    pub fn query_action(&self) -> Result<ActionInfo, AccessError> {
        self.capability(Capability::Action, |s| s.action.as_ref())
    }

    pub fn query_image(&self) -> Result<ImageInfo, AccessError> {
        self.capability(Capability::Image, |s| s.image.as_ref())
    }

    /// Whether the object exposes an action called `name`. Objects without
    /// the Action capability simply have none.
    pub fn has_action(&self, name: &str) -> Result<bool, AccessError> {
        match self.query_action() {
            Ok(actions) => Ok(actions.has(name)),
            Err(AccessError::CapabilityUnavailable(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl PartialEq for AccessibleRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for AccessibleRef {}

impl Hash for AccessibleRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for AccessibleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessibleRef")
            .field("id", &self.0.id)
            .field("defunct", &self.is_defunct())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_positions() {
        let mut table = TableInfo::new(2, 3);
        table.set_cell(1, 2, NativeId::new("c12"));
        assert_eq!(table.cell_at(1, 2), Some(&NativeId::new("c12")));
        assert_eq!(table.position_of(&NativeId::new("c12")), Some((1, 2)));
        assert_eq!(table.cell_at(2, 0), None);
        assert_eq!(table.position_of(&NativeId::new("missing")), None);
    }

    #[test]
    fn test_current_line() {
        let mut text = TextInfo::new("first\nsecond\nthird");
        assert_eq!(text.current_line(), "first");
        text.caret_offset = 8;
        assert_eq!(text.current_line(), "second");
        text.caret_offset = 17;
        assert_eq!(text.current_line(), "third");
    }

    #[test]
    fn test_value_text() {
        let value = ValueInfo {
            current: 40.0,
            minimum: 0.0,
            maximum: 100.0,
            text: None,
        };
        assert_eq!(value.as_text(), "40");
        let value = ValueInfo {
            text: Some("40%".to_string()),
            ..value
        };
        assert_eq!(value.as_text(), "40%");
    }
}
