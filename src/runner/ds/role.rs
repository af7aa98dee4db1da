//! Semantic roles of accessible objects.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::error::ConfigError;

/// The semantic category of an accessible object.
///
/// `RealTableCell` is a pseudo-role: no toolkit reports it. Generators
/// override a table cell's role with it to reach the per-cell format while
/// the `TableCell` entry decides between row and cell presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Role {
    Unknown,
    Application,
    Autocomplete,
    Canvas,
    CheckBox,
    CheckMenuItem,
    ComboBox,
    Dialog,
    DocumentFrame,
    Entry,
    Extended,
    Filler,
    Frame,
    Grouping,
    Heading,
    Icon,
    Image,
    InternalFrame,
    Label,
    Link,
    List,
    ListBox,
    ListItem,
    Menu,
    MenuBar,
    MenuItem,
    PageTab,
    PageTabList,
    Panel,
    Paragraph,
    PasswordText,
    ProgressBar,
    PushButton,
    RadioButton,
    RadioMenuItem,
    Redundant,
    ScrollPane,
    Section,
    Separator,
    Slider,
    SpinButton,
    StatusBar,
    Table,
    TableCell,
    TableColumnHeader,
    TableRow,
    TableRowHeader,
    Text,
    ToggleButton,
    ToolBar,
    Tree,
    TreeItem,
    TreeTable,
    RealTableCell,
}

const ROLE_KEYS: &[(Role, &str, &str)] = &[
    (Role::Unknown, "unknown", "unknown"),
    (Role::Application, "application", "application"),
    (Role::Autocomplete, "autocomplete", "autocomplete"),
    (Role::Canvas, "canvas", "canvas"),
    (Role::CheckBox, "check_box", "check box"),
    (Role::CheckMenuItem, "check_menu_item", "check menu item"),
    (Role::ComboBox, "combo_box", "combo box"),
    (Role::Dialog, "dialog", "dialog"),
    (Role::DocumentFrame, "document_frame", "document"),
    (Role::Entry, "entry", "entry"),
    (Role::Extended, "extended", "extended"),
    (Role::Filler, "filler", "filler"),
    (Role::Frame, "frame", "frame"),
    (Role::Grouping, "grouping", "grouping"),
    (Role::Heading, "heading", "heading"),
    (Role::Icon, "icon", "icon"),
    (Role::Image, "image", "image"),
    (Role::InternalFrame, "internal_frame", "internal frame"),
    (Role::Label, "label", "label"),
    (Role::Link, "link", "link"),
    (Role::List, "list", "list"),
    (Role::ListBox, "list_box", "list box"),
    (Role::ListItem, "list_item", "list item"),
    (Role::Menu, "menu", "menu"),
    (Role::MenuBar, "menu_bar", "menu bar"),
    (Role::MenuItem, "menu_item", "menu item"),
    (Role::PageTab, "page_tab", "tab"),
    (Role::PageTabList, "page_tab_list", "tab list"),
    (Role::Panel, "panel", "panel"),
    (Role::Paragraph, "paragraph", "paragraph"),
    (Role::PasswordText, "password_text", "password text"),
    (Role::ProgressBar, "progress_bar", "progress bar"),
    (Role::PushButton, "push_button", "push button"),
    (Role::RadioButton, "radio_button", "radio button"),
    (Role::RadioMenuItem, "radio_menu_item", "radio menu item"),
    (Role::Redundant, "redundant", "redundant"),
    (Role::ScrollPane, "scroll_pane", "scroll pane"),
    (Role::Section, "section", "section"),
    (Role::Separator, "separator", "separator"),
    (Role::Slider, "slider", "slider"),
    (Role::SpinButton, "spin_button", "spin button"),
    (Role::StatusBar, "status_bar", "status bar"),
    (Role::Table, "table", "table"),
    (Role::TableCell, "table_cell", "cell"),
    (Role::TableColumnHeader, "table_column_header", "column header"),
    (Role::TableRow, "table_row", "row"),
    (Role::TableRowHeader, "table_row_header", "row header"),
    (Role::Text, "text", "text"),
    (Role::ToggleButton, "toggle_button", "toggle button"),
    (Role::ToolBar, "tool_bar", "tool bar"),
    (Role::Tree, "tree", "tree"),
    (Role::TreeItem, "tree_item", "tree item"),
    (Role::TreeTable, "tree_table", "tree table"),
    (Role::RealTableCell, "real_table_cell", "cell"),
];

lazy_static! {
    static ref ROLES_BY_KEY: HashMap<&'static str, Role> =
        ROLE_KEYS.iter().map(|(role, key, _)| (*key, *role)).collect();
    static ref NAMES_BY_ROLE: HashMap<Role, (&'static str, &'static str)> = ROLE_KEYS
        .iter()
        .map(|(role, key, spoken)| (*role, (*key, *spoken)))
        .collect();
}

impl Role {
    /// The snake_case key used in format tables and fixtures.
    pub fn key(self) -> &'static str {
        NAMES_BY_ROLE.get(&self).map(|(key, _)| *key).unwrap_or("unknown")
    }

    /// The phrase presented for this role, e.g. "check box".
    pub fn spoken_name(self) -> &'static str {
        NAMES_BY_ROLE
            .get(&self)
            .map(|(_, spoken)| *spoken)
            .unwrap_or("unknown")
    }

    pub fn all() -> impl Iterator<Item = Role> {
        ROLE_KEYS.iter().map(|(role, _, _)| *role)
    }

    pub fn is_table_cell(self) -> bool {
        matches!(
            self,
            Role::TableCell
                | Role::RealTableCell
                | Role::TableColumnHeader
                | Role::TableRowHeader
        )
    }

    pub fn is_editable_text(self) -> bool {
        matches!(
            self,
            Role::Entry | Role::Text | Role::PasswordText | Role::ComboBox | Role::SpinButton
        )
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROLES_BY_KEY
            .get(s)
            .copied()
            .ok_or_else(|| ConfigError::UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_round_trips_through_its_key() {
        for role in Role::all() {
            assert_eq!(role.key().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(matches!(
            "spaceship".parse::<Role>(),
            Err(ConfigError::UnknownRole(k)) if k == "spaceship"
        ));
    }

    #[test]
    fn test_spoken_names() {
        assert_eq!(Role::CheckBox.spoken_name(), "check box");
        assert_eq!(Role::RealTableCell.spoken_name(), "cell");
    }
}
