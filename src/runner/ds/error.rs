use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::accessible::{Capability, NativeId};
use super::element::ElementList;
use super::role::Role;

/// Failure of a query against the object facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The object received a defunct notification, or was never reachable.
    #[error("object {0} is defunct")]
    StaleObject(NativeId),
    /// The object does not implement the requested capability. Expected for
    /// most objects and never worth more than a trace line.
    #[error("{0} capability unavailable")]
    CapabilityUnavailable(Capability),
}

/// Failure that aborts a whole `generate()` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("malformed format expression `{expression}`: {message}")]
    Syntax { expression: String, message: String },
    #[error("cyclic macro reference through `@{0}`")]
    CyclicReference(String),
    #[error("expression did not settle within {bound} resolution steps")]
    ResolutionBound { bound: usize },
    #[error("re-entrant generation of {role} for object {id}")]
    Reentrant { id: NativeId, role: Role },
    #[error("generation nested deeper than {0} levels")]
    DepthExceeded(usize),
}

/// Failure of a single generator call. Everything except `Evaluation` is
/// contained to that generator's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("unknown generator `{0}`")]
    UnknownGenerator(String),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Failure loading a profile or tree fixture.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown role `{0}`")]
    UnknownRole(String),
    #[error("unknown state `{0}`")]
    UnknownState(String),
    #[error("unknown format mode `{0}`")]
    UnknownMode(String),
    #[error("unknown output channel `{0}`")]
    UnknownChannel(String),
    #[error("invalid tree fixture: {0}")]
    Fixture(String),
}

pub type GeneratorResult = Result<ElementList, GenerationError>;
