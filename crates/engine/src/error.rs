use std::error::Error;

use serde::{Deserialize, Serialize};

/// The kind of engine failure that occurred.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The engine could not be reached.
    Network,
    /// The engine did not produce a reply in time.
    Timeout,
    /// The engine rejected the request.
    Rejected,
    /// Any other errors.
    Other,
}

/// The error type for a chat engine.
///
/// Engines may fail in engine-specific ways; callers must not assume
/// any structure beyond what this trait exposes.
pub trait EngineError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}
