//! Raw format tables as written in a profile.

use std::collections::HashMap;

use serde::Deserialize;

use crate::runner::ds::error::ConfigError;

/// Format expressions by mode key (`focused`, `unfocused`, ...).
pub type ModeFormats = HashMap<String, String>;

/// One channel's format table, before parsing.
///
/// ```toml
/// [prefix]
/// focused = "ancestors"
///
/// [macros]
/// state = "checkedState + availability"
///
/// [strings]
/// checkbox = ["not checked", "checked", "partially checked"]
///
/// [roles.check_box]
/// unfocused = "labelOrName + roleName + @state"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormatTable {
    pub prefix: ModeFormats,
    pub suffix: ModeFormats,
    pub strings: HashMap<String, Vec<String>>,
    pub macros: HashMap<String, String>,
    /// Role key (or `default`) to per-mode expressions.
    pub roles: HashMap<String, ModeFormats>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_role(mut self, role_key: &str, mode_key: &str, expression: &str) -> Self {
        self.roles
            .entry(role_key.to_string())
            .or_default()
            .insert(mode_key.to_string(), expression.to_string());
        self
    }

    pub fn with_macro(mut self, name: &str, expression: &str) -> Self {
        self.macros.insert(name.to_string(), expression.to_string());
        self
    }

    pub fn with_prefix(mut self, mode_key: &str, expression: &str) -> Self {
        self.prefix
            .insert(mode_key.to_string(), expression.to_string());
        self
    }

    pub fn with_suffix(mut self, mode_key: &str, expression: &str) -> Self {
        self.suffix
            .insert(mode_key.to_string(), expression.to_string());
        self
    }

    pub fn with_strings(mut self, key: &str, values: &[&str]) -> Self {
        self.strings.insert(
            key.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Overlay `other` on this table. Role entries merge mode by mode, so a
    /// profile can replace one mode of a role and inherit the rest.
    pub fn merge(&mut self, other: FormatTable) {
        self.prefix.extend(other.prefix);
        self.suffix.extend(other.suffix);
        self.strings.extend(other.strings);
        self.macros.extend(other.macros);
        for (role, modes) in other.roles {
            self.roles.entry(role).or_default().extend(modes);
        }
    }
}
