//! Built-in format tables. Profiles merge over these.

use crate::runner::ds::context::OutputChannel;

use super::table::FormatTable;

type RoleFormats = (&'static str, &'static [(&'static str, &'static str)]);

const SPEECH_ROLES: &[RoleFormats] = &[
    (
        "default",
        &[
            ("focused", "labelAndName + roleName + availability"),
            ("unfocused", "labelAndName + roleName + @states"),
            ("basicWhereAmI", "labelAndName + roleName + positionInList"),
            (
                "detailedWhereAmI",
                "labelAndName + roleName + description + positionInList + availability",
            ),
            ("ancestor", "labelAndName + roleName"),
        ],
    ),
    (
        "check_box",
        &[
            ("focused", "checkedState"),
            ("unfocused", "labelOrName + roleName + checkedState + @states"),
            ("basicWhereAmI", "labelOrName + roleName + checkedState + description"),
        ],
    ),
    (
        "check_menu_item",
        &[
            ("focused", "menuItemCheckedState"),
            (
                "unfocused",
                "labelOrName + roleName + menuItemCheckedState + availability + positionInList",
            ),
        ],
    ),
    (
        "radio_button",
        &[
            ("focused", "radioState"),
            (
                "unfocused",
                "radioButtonGroup + labelOrName + roleName + radioState + positionInList + availability",
            ),
        ],
    ),
    (
        "radio_menu_item",
        &[
            ("focused", "menuItemCheckedState"),
            (
                "unfocused",
                "labelOrName + roleName + menuItemCheckedState + availability + positionInList",
            ),
        ],
    ),
    (
        "toggle_button",
        &[
            ("focused", "toggleState"),
            ("unfocused", "labelOrName + roleName + toggleState + availability"),
        ],
    ),
    (
        "menu_item",
        &[(
            "unfocused",
            "labelOrName + menuItemCheckedState + expandableState + availability + positionInList",
        )],
    ),
    (
        "combo_box",
        &[
            ("focused", "name"),
            ("unfocused", "label + name + roleName + expandableState + availability"),
        ],
    ),
    (
        "entry",
        &[
            ("focused", "readOnly"),
            (
                "unfocused",
                "label + (displayedText or placeholderText) + roleName + @states",
            ),
            ("basicWhereAmI", "label + roleName + currentLineText + readOnly"),
        ],
    ),
    (
        "password_text",
        &[("unfocused", "label + roleName + @states")],
    ),
    (
        "text",
        &[
            ("focused", "readOnly"),
            ("unfocused", "label + roleName + currentLineText + @states"),
        ],
    ),
    (
        "spin_button",
        &[
            ("focused", "value"),
            ("unfocused", "labelOrName + roleName + value + @states"),
        ],
    ),
    (
        "slider",
        &[
            ("focused", "value"),
            ("unfocused", "labelOrName + roleName + value + availability"),
        ],
    ),
    (
        "progress_bar",
        &[("unfocused", "labelOrName + roleName + value")],
    ),
    ("heading", &[("unfocused", "displayedText + roleName")]),
    ("label", &[("unfocused", "displayedText")]),
    ("link", &[("unfocused", "displayedText + roleName + availability")]),
    (
        "image",
        &[("unfocused", "labelAndName + imageDescription + roleName")],
    ),
    (
        "icon",
        &[("unfocused", "labelAndName + imageDescription + roleName")],
    ),
    (
        "page_tab",
        &[("unfocused", "labelAndName + roleName + positionInList + availability")],
    ),
    (
        "list_item",
        &[
            ("focused", "expandableState"),
            (
                "unfocused",
                "labelOrName + checkedStateIfCheckable + expandableState + availability + positionInList + nestingLevel",
            ),
        ],
    ),
    (
        "tree_item",
        &[
            ("focused", "expandableState + nodeLevel"),
            (
                "unfocused",
                "labelOrName + expandableState + availability + positionInList + nodeLevel",
            ),
        ],
    ),
    (
        "table",
        &[
            ("focused", "labelAndName + table"),
            ("unfocused", "labelAndName + table"),
        ],
    ),
    (
        "table_cell",
        &[
            ("focused", "tableCellRow"),
            ("unfocused", "tableCellRow"),
            ("basicWhereAmI", "columnHeader + rowHeader + realTableCell"),
            ("detailedWhereAmI", "columnHeader + rowHeader + tableCellRow"),
        ],
    ),
    (
        "real_table_cell",
        &[
            ("focused", "@cellContent"),
            ("unfocused", "@cellContent"),
            ("basicWhereAmI", "@cellContent"),
        ],
    ),
    (
        "table_column_header",
        &[("unfocused", "displayedText + roleName")],
    ),
    (
        "table_row_header",
        &[("unfocused", "displayedText + roleName")],
    ),
    ("frame", &[("unfocused", "labelAndName + roleName + description")]),
    ("dialog", &[("unfocused", "labelAndName + roleName + description")]),
];

const SPEECH_MACROS: &[(&str, &str)] = &[
    ("states", "availability + required + readOnly"),
    (
        "cellContent",
        "(tableCell2ChildLabel + tableCell2ChildToggle) or (cellCheckedState + (realActiveDescendantDisplayedText or imageDescription) + (expandableState and (expandableState + nodeLevel)) + required)",
    ),
];

const SPEECH_STRINGS: &[(&str, &[&str])] = &[
    ("checkbox", &["not checked", "checked", "partially checked"]),
    ("radiobutton", &["not selected", "selected"]),
    ("togglebutton", &["not pressed", "pressed"]),
    ("expansion", &["collapsed", "expanded"]),
    ("menuitem_check", &["", "checked"]),
    ("required", &["required"]),
    ("readonly", &["read only"]),
    ("insensitive", &["grayed"]),
    ("node_level", &["tree level {}"]),
    ("nesting_level", &["nesting level {}"]),
    ("heading_level", &["heading level {}"]),
    ("position", &["{} of {}"]),
    ("table_size", &["table with {} rows {} columns"]),
    ("cell_delimiter", &[]),
];

const BRAILLE_ROLES: &[RoleFormats] = &[
    (
        "default",
        &[
            ("focused", "labelAndName + roleName"),
            ("unfocused", "labelAndName + roleName"),
        ],
    ),
    (
        "check_box",
        &[("unfocused", "checkedState + labelOrName + roleName")],
    ),
    (
        "radio_button",
        &[("unfocused", "radioState + labelOrName + roleName")],
    ),
    (
        "toggle_button",
        &[("unfocused", "toggleState + labelOrName")],
    ),
    (
        "check_menu_item",
        &[("unfocused", "menuItemCheckedState + labelOrName")],
    ),
    ("entry", &[("unfocused", "label + currentLineText")]),
    ("text", &[("unfocused", "currentLineText")]),
    ("heading", &[("unfocused", "displayedText + roleName")]),
    ("label", &[("unfocused", "displayedText")]),
    ("slider", &[("unfocused", "labelOrName + value")]),
    ("spin_button", &[("unfocused", "labelOrName + value")]),
    ("progress_bar", &[("unfocused", "labelOrName + value")]),
    (
        "tree_item",
        &[("unfocused", "expandableState + labelOrName + nodeLevel")],
    ),
    (
        "list_item",
        &[("unfocused", "checkedStateIfCheckable + expandableState + labelOrName")],
    ),
    ("table_cell", &[("unfocused", "tableCellRow")]),
    (
        "real_table_cell",
        &[(
            "unfocused",
            "(tableCell2ChildToggle + tableCell2ChildLabel) or (cellCheckedState + (realActiveDescendantDisplayedText or imageDescription) + expandableState + nodeLevel)",
        )],
    ),
];

const BRAILLE_STRINGS: &[(&str, &[&str])] = &[
    ("checkbox", &["< >", "<x>", "<->"]),
    ("radiobutton", &["& y", "&=y"]),
    ("togglebutton", &["& y", "&=y"]),
    ("expansion", &["+", "-"]),
    ("menuitem_check", &["< >", "<x>"]),
    ("required", &["required"]),
    ("readonly", &["rdonly"]),
    ("insensitive", &[]),
    ("node_level", &["TREE LEVEL {}"]),
    ("nesting_level", &["LEVEL {}"]),
    ("heading_level", &["h{}"]),
    ("position", &["{}/{}"]),
    ("table_size", &["{}x{}"]),
    ("cell_delimiter", &["|"]),
];

fn build(
    roles: &[RoleFormats],
    macros: &[(&str, &str)],
    strings: &[(&str, &[&str])],
) -> FormatTable {
    let mut table = FormatTable::new()
        .with_prefix("focused", "ancestors")
        .with_prefix("unfocused", "ancestors");
    for (role, modes) in roles {
        for (mode, expression) in modes.iter() {
            table = table.with_role(role, mode, expression);
        }
    }
    for (name, expression) in macros {
        table = table.with_macro(name, expression);
    }
    for (key, values) in strings {
        table = table.with_strings(key, values);
    }
    table
}

lazy_static! {
    static ref SPEECH_DEFAULTS: FormatTable =
        build(SPEECH_ROLES, SPEECH_MACROS, SPEECH_STRINGS);
    static ref BRAILLE_DEFAULTS: FormatTable = build(BRAILLE_ROLES, &[], BRAILLE_STRINGS);
}

/// The built-in table for `channel`.
pub fn default_table(channel: OutputChannel) -> FormatTable {
    match channel {
        OutputChannel::Speech => SPEECH_DEFAULTS.clone(),
        OutputChannel::Braille => BRAILLE_DEFAULTS.clone(),
    }
}
