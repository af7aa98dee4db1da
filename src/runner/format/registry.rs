//! The compiled, immutable format registry for one output channel.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use tracing::{debug, error};

use crate::parser::ast::Expr;
use crate::parser::parse_to_ast;
use crate::parser::static_semantics::{get_macro_references, substitute_macros};
use crate::runner::ds::context::{FormatMode, OutputChannel};
use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::{ConfigError, EvaluationError};
use crate::runner::ds::role::Role;
use crate::runner::eval::DemandEvaluator;

use super::report::{Diagnostic, DiagnosticKind, ValidationReport};
use super::table::{FormatTable, ModeFormats};

/// A role entry key: a concrete role or the `default` fallback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleKey {
    Role(Role),
    Default,
}

impl FromStr for RoleKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "default" {
            Ok(RoleKey::Default)
        } else {
            s.parse().map(RoleKey::Role)
        }
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleKey::Role(role) => write!(f, "{}", role),
            RoleKey::Default => f.write_str("default"),
        }
    }
}

/// One parsed format expression, or the reason it cannot be used.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatEntry {
    pub location: String,
    pub source: String,
    compiled: Result<Expr, EvaluationError>,
}

impl FormatEntry {
    pub fn expr(&self) -> Result<&Expr, EvaluationError> {
        self.compiled.as_ref().map_err(Clone::clone)
    }

    pub fn is_broken(&self) -> bool {
        self.compiled.is_err()
    }
}

pub struct FormatRegistry {
    channel: OutputChannel,
    entries: HashMap<(RoleKey, FormatMode), FormatEntry>,
    prefixes: HashMap<FormatMode, FormatEntry>,
    suffixes: HashMap<FormatMode, FormatEntry>,
    strings: HashMap<String, Vec<String>>,
    diagnostics: Vec<Diagnostic>,
}

impl FormatRegistry {
    /// Parse every expression in `table`, inlining macros. Problems become
    /// diagnostics; broken entries stay in the registry and evaluate to an
    /// error instead of output.
    pub fn load(channel: OutputChannel, table: &FormatTable) -> Self {
        let channel_name = channel_key(channel);
        let mut compiler = Compiler::new(&table.macros, channel_name);
        compiler.expand_all_macros();

        let mut entries = HashMap::new();
        let sorted_roles: BTreeMap<&String, &ModeFormats> = table.roles.iter().collect();
        for (role_key, modes) in sorted_roles {
            let key = match role_key.parse::<RoleKey>() {
                Ok(key) => key,
                Err(_) => {
                    compiler.report(
                        format!("{} roles", channel_name),
                        DiagnosticKind::UnknownRole(role_key.clone()),
                    );
                    continue;
                }
            };
            for (mode, entry) in compiler.compile_modes(&format!("{}", key), modes) {
                entries.insert((key, mode), entry);
            }
        }
        let prefixes = compiler.compile_modes("prefix", &table.prefix).into_iter().collect();
        let suffixes = compiler.compile_modes("suffix", &table.suffix).into_iter().collect();

        debug!(
            channel = channel_name,
            entries = entries.len(),
            diagnostics = compiler.diagnostics.len(),
            "format registry loaded"
        );
        FormatRegistry {
            channel,
            entries,
            prefixes,
            suffixes,
            strings: table.strings.clone(),
            diagnostics: compiler.diagnostics,
        }
    }

    pub fn channel(&self) -> OutputChannel {
        self.channel
    }

    /// Exact entry for `key` and `mode`, no fallback.
    pub fn entry(&self, key: RoleKey, mode: FormatMode) -> Option<&FormatEntry> {
        self.entries.get(&(key, mode))
    }

    /// The entry used to present `role` in `mode`.
    ///
    /// Falls back from the exact entry to the role's related mode (`ancestor`
    /// to `focused`, `detailedWhereAmI` to `basicWhereAmI`), then the role's
    /// `unfocused` entry, then the same steps on the `default` entry.
    pub fn lookup(&self, role: Role, mode: FormatMode) -> Option<&FormatEntry> {
        [RoleKey::Role(role), RoleKey::Default]
            .into_iter()
            .flat_map(|key| fallback_modes(mode).into_iter().map(move |m| (key, m)))
            .find_map(|k| self.entries.get(&k))
    }

    pub fn prefix(&self, mode: FormatMode) -> Option<&FormatEntry> {
        self.prefixes.get(&mode)
    }

    pub fn suffix(&self, mode: FormatMode) -> Option<&FormatEntry> {
        self.suffixes.get(&mode)
    }

    pub fn strings(&self, key: &str) -> &[String] {
        self.strings.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The indicator string `key[index]`; `None` when absent or empty.
    pub fn string(&self, key: &str, index: usize) -> Option<&str> {
        self.strings(key)
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Problems found while loading: syntax, macro cycles, unknown keys.
    pub fn load_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn all_entries(&self) -> Vec<&FormatEntry> {
        let mut all: Vec<&FormatEntry> = self
            .entries
            .values()
            .chain(self.prefixes.values())
            .chain(self.suffixes.values())
            .collect();
        all.sort_by(|a, b| a.location.cmp(&b.location));
        all
    }

    /// Dry-run every entry, checking that each referenced name satisfies
    /// `is_known`. Load diagnostics are included in the report.
    pub fn validate<F: Fn(&str) -> bool>(&self, is_known: F) -> ValidationReport {
        let mut diagnostics = self.diagnostics.clone();
        for entry in self.all_entries() {
            let expr = match entry.expr() {
                Ok(expr) => expr,
                Err(_) => continue,
            };
            let mut resolver = |name: &str| {
                if is_known(name) {
                    Some(Ok(ElementList::new()))
                } else {
                    None
                }
            };
            match DemandEvaluator::new(expr).exhaustive(true).run(&mut resolver) {
                Ok(evaluation) => {
                    for name in evaluation.unknown {
                        diagnostics.push(Diagnostic::new(
                            entry.location.clone(),
                            DiagnosticKind::UnknownGenerator(name),
                        ));
                    }
                }
                Err(e) => diagnostics.push(Diagnostic::new(
                    entry.location.clone(),
                    DiagnosticKind::Evaluation(e),
                )),
            }
        }
        for diagnostic in &diagnostics {
            error!(diagnostic = %diagnostic, "format table diagnostic");
        }
        ValidationReport::new(diagnostics)
    }
}

fn channel_key(channel: OutputChannel) -> &'static str {
    match channel {
        OutputChannel::Speech => "speech",
        OutputChannel::Braille => "braille",
    }
}

fn fallback_modes(mode: FormatMode) -> Vec<FormatMode> {
    let mut modes = vec![mode];
    match mode {
        FormatMode::Ancestor => modes.push(FormatMode::Focused),
        FormatMode::DetailedWhereAmI => modes.push(FormatMode::BasicWhereAmI),
        _ => {}
    }
    if mode != FormatMode::Unfocused {
        modes.push(FormatMode::Unfocused);
    }
    modes
}

struct Compiler<'t> {
    macros: &'t HashMap<String, String>,
    channel: &'static str,
    expanded: HashMap<String, Result<Expr, EvaluationError>>,
    visiting: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Compiler<'t> {
    fn new(macros: &'t HashMap<String, String>, channel: &'static str) -> Self {
        Compiler {
            macros,
            channel,
            expanded: HashMap::new(),
            visiting: vec![],
            diagnostics: vec![],
        }
    }

    fn report(&mut self, location: String, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic::new(location, kind));
    }

    fn expand_all_macros(&mut self) {
        let macros = self.macros;
        let mut names: Vec<&String> = macros.keys().collect();
        names.sort();
        for name in names {
            let location = format!("{} macro {}", self.channel, name);
            if let Some(source) = macros.get(name) {
                if let Ok(expr) = parse_to_ast(source) {
                    self.report_unknown_macros(&location, &expr);
                }
            }
            if let Err(e) = self.expand(name) {
                self.report(location, DiagnosticKind::Evaluation(e));
            }
        }
    }

    fn report_unknown_macros(&mut self, location: &str, expr: &Expr) {
        for name in get_macro_references(expr) {
            if !self.macros.contains_key(&name) {
                self.report(location.to_string(), DiagnosticKind::UnknownMacro(name));
            }
        }
    }

    fn expand(&mut self, name: &str) -> Result<Expr, EvaluationError> {
        if let Some(done) = self.expanded.get(name) {
            return done.clone();
        }
        if self.visiting.iter().any(|v| v == name) {
            return Err(EvaluationError::CyclicReference(name.to_string()));
        }
        let macros = self.macros;
        let source = match macros.get(name) {
            Some(source) => source,
            None => return Ok(Expr::Empty),
        };
        self.visiting.push(name.to_string());
        let result =
            parse(source).and_then(|expr| substitute_macros(&expr, &mut |n| self.expand(n)));
        self.visiting.pop();
        self.expanded.insert(name.to_string(), result.clone());
        result
    }

    fn compile(&mut self, location: String, source: &str) -> FormatEntry {
        let compiled = match parse(source) {
            Ok(expr) => {
                self.report_unknown_macros(&location, &expr);
                substitute_macros(&expr, &mut |n| self.expand(n))
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &compiled {
            self.report(location.clone(), DiagnosticKind::Evaluation(e.clone()));
        }
        FormatEntry {
            location,
            source: source.to_string(),
            compiled,
        }
    }

    fn compile_modes(
        &mut self,
        owner: &str,
        modes: &ModeFormats,
    ) -> Vec<(FormatMode, FormatEntry)> {
        let sorted: BTreeMap<&String, &String> = modes.iter().collect();
        let mut out = vec![];
        for (mode_key, source) in sorted {
            let location = format!("{} {}.{}", self.channel, owner, mode_key);
            match mode_key.parse::<FormatMode>() {
                Ok(mode) => out.push((mode, self.compile(location, source))),
                Err(_) => self.report(location, DiagnosticKind::UnknownMode(mode_key.clone())),
            }
        }
        out
    }
}

fn parse(source: &str) -> Result<Expr, EvaluationError> {
    parse_to_ast(source).map_err(|e| EvaluationError::Syntax {
        expression: source.to_string(),
        message: e.variant.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(table: FormatTable) -> FormatRegistry {
        FormatRegistry::load(OutputChannel::Speech, &table)
    }

    #[test]
    fn test_lookup_fallback_chain() {
        let reg = registry(
            FormatTable::new()
                .with_role("check_box", "focused", "checkedState")
                .with_role("check_box", "unfocused", "name + checkedState")
                .with_role("check_box", "basicWhereAmI", "name")
                .with_role("default", "focused", "labelAndName")
                .with_role("default", "unfocused", "labelAndName + roleName"),
        );
        let source = |role, mode| reg.lookup(role, mode).map(|e| e.source.as_str());
        assert_eq!(source(Role::CheckBox, FormatMode::Focused), Some("checkedState"));
        assert_eq!(source(Role::CheckBox, FormatMode::Ancestor), Some("checkedState"));
        assert_eq!(source(Role::CheckBox, FormatMode::DetailedWhereAmI), Some("name"));
        assert_eq!(source(Role::PushButton, FormatMode::Focused), Some("labelAndName"));
        assert_eq!(
            source(Role::PushButton, FormatMode::BasicWhereAmI),
            Some("labelAndName + roleName")
        );
    }

    #[test]
    fn test_lookup_without_any_entry() {
        let reg = registry(FormatTable::new());
        assert!(reg.lookup(Role::PushButton, FormatMode::Focused).is_none());
    }

    #[test]
    fn test_macros_are_inlined() {
        let reg = registry(
            FormatTable::new()
                .with_macro("state", "checkedState + @grey")
                .with_macro("grey", "availability")
                .with_role("check_box", "unfocused", "name + @state"),
        );
        let entry = reg.entry(RoleKey::Role(Role::CheckBox), FormatMode::Unfocused).unwrap();
        assert_eq!(
            entry.expr().unwrap().to_string(),
            "name + (checkedState + availability)"
        );
        assert!(reg.load_diagnostics().is_empty());
    }

    #[test]
    fn test_macro_cycle_breaks_entry() {
        let reg = registry(
            FormatTable::new()
                .with_macro("a", "name + @b")
                .with_macro("b", "@a")
                .with_role("label", "unfocused", "@a")
                .with_role("label", "focused", "name"),
        );
        let broken = reg.entry(RoleKey::Role(Role::Label), FormatMode::Unfocused).unwrap();
        assert!(matches!(
            broken.expr(),
            Err(EvaluationError::CyclicReference(_))
        ));
        let fine = reg.entry(RoleKey::Role(Role::Label), FormatMode::Focused).unwrap();
        assert!(!fine.is_broken());
        assert!(reg.load_diagnostics().iter().any(Diagnostic::is_cyclic_reference));
    }

    #[test]
    fn test_unknown_keys_and_syntax_are_reported() {
        let reg = registry(
            FormatTable::new()
                .with_role("spaceship", "focused", "name")
                .with_role("label", "sideways", "name")
                .with_role("label", "focused", "name +")
                .with_role("label", "unfocused", "@nowhere"),
        );
        let kinds: Vec<&DiagnosticKind> = reg.load_diagnostics().iter().map(|d| &d.kind).collect();
        assert!(kinds.contains(&&DiagnosticKind::UnknownRole("spaceship".to_string())));
        assert!(kinds.contains(&&DiagnosticKind::UnknownMode("sideways".to_string())));
        assert!(kinds.contains(&&DiagnosticKind::UnknownMacro("nowhere".to_string())));
        assert!(kinds
            .iter()
            .any(|k| matches!(k, DiagnosticKind::Evaluation(EvaluationError::Syntax { .. }))));
    }

    #[test]
    fn test_validate_reports_unknown_generators() {
        let reg = registry(
            FormatTable::new()
                .with_role("check_box", "unfocused", "name or bogus if checkedState else other")
                .with_prefix("focused", "ancestors"),
        );
        let known = ["name", "checkedState", "ancestors"];
        let report = reg.validate(|n| known.contains(&n));
        assert_eq!(report.unknown_generators(), vec!["bogus", "other"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_strings() {
        let reg = registry(FormatTable::new().with_strings("checkbox", &["off", "on", ""]));
        assert_eq!(reg.string("checkbox", 1), Some("on"));
        assert_eq!(reg.string("checkbox", 2), None);
        assert_eq!(reg.string("missing", 0), None);
    }
}
