//! Application profiles: settings plus per-channel format tables.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::runner::ds::context::OutputChannel;
use crate::runner::ds::error::ConfigError;
use crate::runner::ds::role::Role;
use crate::runner::format::defaults::default_table;
use crate::runner::format::table::FormatTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Brief,
    #[default]
    Verbose,
}

/// Behaviour switches read by the generators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Speak the whole row when moving between rows of a table.
    pub read_table_cell_row: bool,
    pub verbosity: Verbosity,
    /// Ancestors with these roles never appear in the context breadcrumb.
    pub context_skip_roles: Vec<Role>,
    /// Context collection stops at the first ancestor with one of these roles.
    pub context_stop_roles: Vec<Role>,
    /// Ancestors with these roles contribute their text but not their role name.
    pub context_dont_announce_roles: Vec<Role>,
    /// Text starting with one of these is internal and not presented.
    pub internal_scheme_prefixes: Vec<String>,
    /// Nesting limit for generators that generate other objects.
    pub max_generation_depth: usize,
    pub enable_position_speaking: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            read_table_cell_row: true,
            verbosity: Verbosity::Verbose,
            context_skip_roles: vec![
                Role::Unknown,
                Role::MenuBar,
                Role::Label,
                Role::Autocomplete,
                Role::ListItem,
            ],
            context_stop_roles: vec![Role::DocumentFrame, Role::InternalFrame],
            context_dont_announce_roles: vec![Role::TableCell, Role::Filler],
            internal_scheme_prefixes: vec![
                "chrome://".to_string(),
                "resource://".to_string(),
                "about:".to_string(),
            ],
            max_generation_depth: 16,
            enable_position_speaking: false,
        }
    }
}

impl Settings {
    pub fn is_internal_text(&self, text: &str) -> bool {
        self.internal_scheme_prefixes
            .iter()
            .any(|prefix| text.starts_with(prefix.as_str()))
    }
}

/// One application profile.
///
/// ```toml
/// name = "gedit"
///
/// [settings]
/// read_table_cell_row = false
///
/// [speech.roles.check_box]
/// unfocused = "labelOrName + checkedState"
/// ```
///
/// Format tables merge over the built-in defaults.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub settings: Settings,
    pub speech: FormatTable,
    pub braille: FormatTable,
}

impl Profile {
    /// The built-in profile.
    pub fn new() -> Self {
        Profile {
            name: "default".to_string(),
            ..Default::default()
        }
    }

    /// Load a profile from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse a profile from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut profile: Profile = toml::from_str(content)?;
        if profile.name.is_empty() {
            profile.name = "default".to_string();
        }
        Ok(profile)
    }

    /// The effective table for `channel`: defaults with this profile on top.
    pub fn format_table(&self, channel: OutputChannel) -> FormatTable {
        let mut table = default_table(channel);
        let overlay = match channel {
            OutputChannel::Speech => &self.speech,
            OutputChannel::Braille => &self.braille,
        };
        table.merge(overlay.clone());
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_uses_defaults() {
        let profile = Profile::parse("").unwrap();
        assert_eq!(profile.name, "default");
        assert_eq!(profile.settings, Settings::default());
        assert!(profile.settings.read_table_cell_row);
    }

    #[test]
    fn test_settings_and_overlay() {
        let profile = Profile::parse(
            r#"
            name = "mail"

            [settings]
            read_table_cell_row = false
            verbosity = "brief"
            context_stop_roles = ["frame"]

            [speech.roles.check_box]
            focused = "name"
            "#,
        )
        .unwrap();
        assert_eq!(profile.name, "mail");
        assert!(!profile.settings.read_table_cell_row);
        assert_eq!(profile.settings.verbosity, Verbosity::Brief);
        assert_eq!(profile.settings.context_stop_roles, vec![Role::Frame]);
        assert_eq!(profile.settings.max_generation_depth, 16);

        let table = profile.format_table(OutputChannel::Speech);
        assert_eq!(table.roles["check_box"]["focused"], "name");
        assert!(table.roles["check_box"].contains_key("unfocused"));
    }

    #[test]
    fn test_unknown_role_in_settings_is_rejected() {
        let result = Profile::parse(
            r#"
            [settings]
            context_skip_roles = ["hovercraft"]
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_internal_text() {
        let settings = Settings::default();
        assert!(settings.is_internal_text("chrome://browser/content"));
        assert!(!settings.is_internal_text("Inbox"));
    }
}
