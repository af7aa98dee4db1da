//! Tree walks and policies shared by several generators.

pub mod ancestors;
pub mod node_level;
pub mod table_row;
