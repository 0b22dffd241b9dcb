use crate::error::EngineError;
use crate::turn::Turn;

/// An opaque value selecting the engine's response style.
///
/// The mode is fixed configuration chosen by the embedder and passed
/// through verbatim; neither the session core nor this crate interprets
/// it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResponseMode(String);

impl ResponseMode {
    /// Creates a response mode from the given literal.
    #[inline]
    pub fn new<S: Into<String>>(mode: S) -> Self {
        Self(mode.into())
    }

    /// Returns the mode as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResponseMode {
    #[inline]
    fn default() -> Self {
        Self::new("chat")
    }
}

/// A handle to an externally supplied conversational engine.
///
/// The engine is constructed by the embedder with a fixed behavior
/// description (its persona), and keeps the full turn history for the
/// session internally. Implementations should treat the history as
/// append-only: a `push_turn` call must never reorder or rewrite
/// previously appended turns.
///
/// One engine handle backs exactly one session and is driven by a
/// single caller at a time; implementations don't need any internal
/// synchronization.
pub trait ChatEngine: Send + 'static {
    /// The error type that may be returned by the engine.
    type Error: EngineError;

    /// Appends a turn to the engine's history.
    fn push_turn(&mut self, turn: Turn);

    /// Requests the next assistant reply from the engine.
    ///
    /// This is a single best-effort round trip: implementations must
    /// not retry internally, and a failed request must leave the
    /// history exactly as it was before the call.
    fn request_reply(
        &mut self,
        mode: ResponseMode,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
