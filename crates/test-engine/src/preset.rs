use glimmer_engine::ErrorKind;
use serde::{Deserialize, Serialize};

/// A scripted outcome for one reply request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// The request succeeds with the given reply text.
    #[serde(rename = "text")]
    Text(String),
    /// The request fails with an error of the given kind.
    #[serde(rename = "failure")]
    Failure(ErrorKind),
}

impl PresetReply {
    /// Creates a successful preset reply with the specified text.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(text.into())
    }

    /// Creates a failing preset reply with the specified error kind.
    #[inline]
    pub fn failure(kind: ErrorKind) -> Self {
        Self::Failure(kind)
    }
}
