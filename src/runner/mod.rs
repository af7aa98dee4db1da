//! Generation core: object facade, format registry, generators and the
//! demand-driven evaluator that ties them together.

pub mod algo;
pub mod api;
pub mod ds;
pub mod eval;
pub mod format;
pub mod plugin;
pub mod script;
pub mod std_lib;
