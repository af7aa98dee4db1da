//! Data structures shared by the evaluator and the generators.

pub mod accessible;
pub mod cache;
pub mod context;
pub mod element;
pub mod error;
pub mod memory;
pub mod role;
pub mod state;

pub use accessible::{AccessibleRef, Capability, NativeId, Snapshot, TableInfo};
pub use cache::{AccessibleProvider, ObjectCache};
pub use context::{Context, FormatMode, OutputChannel, PointOfReference, PorValue};
pub use element::{Element, ElementList, VoiceId};
pub use error::{AccessError, ConfigError, EvaluationError, GenerationError, GeneratorResult};
pub use memory::MemoryTree;
pub use role::Role;
pub use state::StateSet;
