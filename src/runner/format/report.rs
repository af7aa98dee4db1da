use std::fmt;

use crate::runner::ds::error::EvaluationError;

/// A configuration problem found while loading or validating a format table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnknownGenerator(String),
    UnknownMacro(String),
    UnknownRole(String),
    UnknownMode(String),
    /// Syntax errors, macro cycles and anything else that breaks an entry.
    Evaluation(EvaluationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the problem is, e.g. `speech check_box.unfocused`.
    pub location: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(location: impl Into<String>, kind: DiagnosticKind) -> Self {
        Diagnostic {
            location: location.into(),
            kind,
        }
    }

    pub fn is_cyclic_reference(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::Evaluation(EvaluationError::CyclicReference(_))
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnknownGenerator(name) => {
                write!(f, "{}: unknown generator `{}`", self.location, name)
            }
            DiagnosticKind::UnknownMacro(name) => {
                write!(f, "{}: unknown macro `@{}`", self.location, name)
            }
            DiagnosticKind::UnknownRole(key) => write!(f, "{}: unknown role `{}`", self.location, key),
            DiagnosticKind::UnknownMode(key) => {
                write!(f, "{}: unknown format mode `{}`", self.location, key)
            }
            DiagnosticKind::Evaluation(e) => write!(f, "{}: {}", self.location, e),
        }
    }
}

/// Outcome of the load-time dry run over a format registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        ValidationReport { diagnostics }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Names referenced somewhere but bound to no generator.
    pub fn unknown_generators(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .diagnostics
            .iter()
            .filter_map(|d| match &d.kind {
                DiagnosticKind::UnknownGenerator(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("format tables are valid");
        }
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}
