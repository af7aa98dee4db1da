//! Format tables: raw profile data, built-in defaults, and the compiled
//! registry the presenter looks expressions up in.

pub mod defaults;
pub mod registry;
pub mod report;
pub mod table;

pub use defaults::default_table;
pub use registry::{FormatEntry, FormatRegistry, RoleKey};
pub use report::{Diagnostic, DiagnosticKind, ValidationReport};
pub use table::FormatTable;
