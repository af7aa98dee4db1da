//! In-memory accessible tree.
//!
//! Stands in for the accessibility bus in tests, benches and the `utter`
//! binary. Clones share the same nodes, so a test can keep a handle, mutate
//! a node, and then tell the [`ObjectCache`](super::cache::ObjectCache) to
//! refresh or drop it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use super::accessible::{
    ActionInfo, ImageInfo, NativeId, Snapshot, TableInfo, TextInfo, ValueInfo,
};
use super::cache::AccessibleProvider;
use super::error::{AccessError, ConfigError};
use super::role::Role;
use super::state::StateSet;

#[derive(Clone, Default)]
pub struct MemoryTree {
    nodes: Rc<RefCell<HashMap<NativeId, Snapshot>>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        MemoryTree {
            nodes: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Add a node under `parent` with a freshly generated identity.
    pub fn add(&self, parent: Option<&NativeId>, snapshot: Snapshot) -> NativeId {
        self.add_with_id(NativeId::generate(), parent, snapshot)
    }

    /// Add a node with a caller-chosen identity, linking it as the last
    /// child of `parent`.
    pub fn add_with_id(
        &self,
        id: NativeId,
        parent: Option<&NativeId>,
        mut snapshot: Snapshot,
    ) -> NativeId {
        let mut nodes = self.nodes.borrow_mut();
        snapshot.parent = None;
        snapshot.index_in_parent = None;
        if let Some(parent_id) = parent {
            if let Some(parent_node) = nodes.get_mut(parent_id) {
                snapshot.index_in_parent = Some(parent_node.children.len());
                parent_node.children.push(id.clone());
                snapshot.parent = Some(parent_id.clone());
            }
        }
        nodes.insert(id.clone(), snapshot);
        id
    }

    /// Apply `f` to the stored node. Returns false if there is no such node.
    pub fn update<F: FnOnce(&mut Snapshot)>(&self, id: &NativeId, f: F) -> bool {
        match self.nodes.borrow_mut().get_mut(id) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }

    /// Remove a node from the tree and from its parent's child list.
    pub fn remove(&self, id: &NativeId) -> Option<Snapshot> {
        let mut nodes = self.nodes.borrow_mut();
        let removed = nodes.remove(id)?;
        if let Some(parent) = removed.parent.as_ref().and_then(|p| nodes.get_mut(p)) {
            parent.children.retain(|c| c != id);
        }
        Some(removed)
    }

    pub fn contains(&self, id: &NativeId) -> bool {
        self.nodes.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Build a tree from a TOML fixture.
    ///
    /// ```toml
    /// [[node]]
    /// id = "frame"
    /// role = "frame"
    /// name = "Preferences"
    ///
    /// [[node]]
    /// id = "wrap"
    /// parent = "frame"
    /// role = "check_box"
    /// name = "Wrap long lines"
    /// states = ["showing", "sensitive", "checked"]
    /// ```
    ///
    /// Parents must appear before their children. A `table` sub-table lists
    /// cell ids row by row, with `""` for an empty slot.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let fixture: Fixture = toml::from_str(content)?;
        let tree = MemoryTree::new();
        for node in fixture.node {
            let id = NativeId::new(node.id.clone());
            if tree.contains(&id) {
                return Err(ConfigError::Fixture(format!("duplicate node `{}`", node.id)));
            }
            let parent = match &node.parent {
                Some(p) => {
                    let parent = NativeId::new(p.clone());
                    if !tree.contains(&parent) {
                        return Err(ConfigError::Fixture(format!(
                            "node `{}` names parent `{}` before it is declared",
                            node.id, p
                        )));
                    }
                    Some(parent)
                }
                None => None,
            };
            let snapshot = node.into_snapshot()?;
            tree.add_with_id(id, parent.as_ref(), snapshot);
        }
        Ok(tree)
    }
}

impl AccessibleProvider for MemoryTree {
    fn fetch(&self, id: &NativeId) -> Result<Snapshot, AccessError> {
        self.nodes
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| AccessError::StaleObject(id.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    node: Vec<FixtureNode>,
}

#[derive(Debug, Deserialize)]
struct FixtureNode {
    id: String,
    parent: Option<String>,
    role: Role,
    name: Option<String>,
    description: Option<String>,
    /// Replaces the default interactive state set when present.
    states: Option<Vec<String>>,
    #[serde(default)]
    attributes: HashMap<String, String>,
    #[serde(default)]
    labelled_by: Vec<String>,
    node_child_of: Option<String>,
    application: Option<String>,
    text: Option<String>,
    caret_offset: Option<usize>,
    actions: Option<Vec<String>>,
    image_description: Option<String>,
    value: Option<FixtureValue>,
    table: Option<FixtureTable>,
}

#[derive(Debug, Deserialize)]
struct FixtureValue {
    current: f64,
    #[serde(default)]
    minimum: f64,
    #[serde(default)]
    maximum: f64,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureTable {
    #[serde(default)]
    rows: Vec<Vec<String>>,
    #[serde(default)]
    column_headers: Vec<String>,
    #[serde(default)]
    row_headers: Vec<String>,
}

fn optional_id(s: &str) -> Option<NativeId> {
    if s.is_empty() {
        None
    } else {
        Some(NativeId::new(s))
    }
}

impl FixtureNode {
    fn into_snapshot(self) -> Result<Snapshot, ConfigError> {
        let mut snapshot = Snapshot::new(self.role);
        if let Some(states) = &self.states {
            snapshot.states = StateSet::from_names(states)?;
        }
        snapshot.name = self.name;
        snapshot.description = self.description;
        snapshot.attributes = self.attributes;
        snapshot.relations.labelled_by = self
            .labelled_by
            .iter()
            .map(|l| NativeId::new(l.clone()))
            .collect();
        snapshot.relations.node_child_of = self.node_child_of.as_deref().map(NativeId::new);
        snapshot.application = self.application;
        snapshot.text = self.text.map(|text| TextInfo {
            text,
            caret_offset: self.caret_offset.unwrap_or(0),
        });
        snapshot.action = self.actions.map(|names| ActionInfo { names });
        snapshot.image = self
            .image_description
            .map(|description| ImageInfo { description });
        snapshot.value = self.value.map(|v| ValueInfo {
            current: v.current,
            minimum: v.minimum,
            maximum: v.maximum,
            text: v.text,
        });
        if let Some(table) = self.table {
            let n_rows = table.rows.len();
            let n_columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
            let mut info = TableInfo::new(n_rows, n_columns);
            for (row, cells) in table.rows.iter().enumerate() {
                for (column, cell) in cells.iter().enumerate() {
                    if let Some(id) = optional_id(cell) {
                        info.set_cell(row, column, id);
                    }
                }
            }
            info.column_headers = table.column_headers.iter().map(|h| optional_id(h)).collect();
            info.row_headers = table.row_headers.iter().map(|h| optional_id(h)).collect();
            snapshot.table = Some(info);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        [[node]]
        id = "frame"
        role = "frame"
        name = "Preferences"

        [[node]]
        id = "wrap"
        parent = "frame"
        role = "check_box"
        name = "Wrap long lines"
        states = ["showing", "sensitive", "checked"]

        [[node]]
        id = "grid"
        parent = "frame"
        role = "table"

        [node.table]
        rows = [["a", "b"], ["c", ""]]
        column_headers = ["h1", "h2"]
    "#;

    #[test]
    fn test_fixture_links_parents_and_children() {
        let tree = MemoryTree::from_toml_str(FIXTURE).unwrap();
        assert_eq!(tree.len(), 3);
        let frame = tree.fetch(&NativeId::new("frame")).unwrap();
        assert_eq!(frame.children, vec![NativeId::new("wrap"), NativeId::new("grid")]);
        let wrap = tree.fetch(&NativeId::new("wrap")).unwrap();
        assert_eq!(wrap.parent, Some(NativeId::new("frame")));
        assert_eq!(wrap.index_in_parent, Some(0));
        assert!(wrap.states.contains(StateSet::CHECKED));
        let grid = tree.fetch(&NativeId::new("grid")).unwrap().table.unwrap();
        assert_eq!(grid.n_columns, 2);
        assert_eq!(grid.cell_at(1, 0), Some(&NativeId::new("c")));
        assert_eq!(grid.cell_at(1, 1), None);
    }

    #[test]
    fn test_fixture_rejects_forward_parent() {
        let content = r#"
            [[node]]
            id = "child"
            parent = "later"
            role = "label"
        "#;
        assert!(matches!(
            MemoryTree::from_toml_str(content),
            Err(ConfigError::Fixture(_))
        ));
    }

    #[test]
    fn test_fixture_rejects_unknown_role() {
        let content = r#"
            [[node]]
            id = "x"
            role = "warp_drive"
        "#;
        assert!(MemoryTree::from_toml_str(content).is_err());
    }

    #[test]
    fn test_remove_unlinks_from_parent() {
        let tree = MemoryTree::new();
        let root = tree.add(None, Snapshot::new(Role::Frame));
        let child = tree.add(Some(&root), Snapshot::new(Role::PushButton));
        assert!(tree.remove(&child).is_some());
        assert!(tree.fetch(&root).unwrap().children.is_empty());
        assert!(matches!(tree.fetch(&child), Err(AccessError::StaleObject(_))));
    }
}
