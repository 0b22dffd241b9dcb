//! A local fake engine for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use glimmer_engine::{
    ChatEngine, EngineError, ErrorKind, ResponseMode, Turn,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl EngineError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A cloneable view of a scripted engine's turn history.
///
/// The handle stays valid after the engine has been moved into an
/// adapter, so tests can assert the append protocol from outside.
#[derive(Clone, Debug, Default)]
pub struct History(Arc<Mutex<Vec<Turn>>>);

impl History {
    /// Returns a snapshot of the recorded turns.
    pub fn turns(&self) -> Vec<Turn> {
        self.0.lock().unwrap().clone()
    }

    /// Returns the number of recorded turns.
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Returns `true` if no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, turn: Turn) {
        self.0.lock().unwrap().push(turn);
    }
}

/// A local fake engine for testing purpose.
///
/// Before requesting replies, you need to setup the reply script, which
/// is how the engine should respond to each request. Scripted replies
/// are consumed in order; if the script runs out, an error will be
/// returned.
///
/// # Note
///
/// This type is not optimized for production use. You should only use
/// it for testing.
pub struct ScriptedEngine {
    persona: String,
    history: History,
    replies: VecDeque<PresetReply>,
    delay: Option<Duration>,
}

impl ScriptedEngine {
    /// Creates a scripted engine with the given behavior description.
    pub fn new<S: Into<String>>(persona: S) -> Self {
        Self {
            persona: persona.into(),
            history: History::default(),
            replies: VecDeque::new(),
            delay: None,
        }
    }

    /// Appends a scripted reply to the script.
    #[inline]
    pub fn push_reply(&mut self, reply: PresetReply) {
        self.replies.push_back(reply);
    }

    /// Sets an artificial delay before each reply resolves.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns a handle to the engine's turn history.
    #[inline]
    pub fn history(&self) -> History {
        self.history.clone()
    }

    /// Returns the behavior description this engine was created with.
    #[inline]
    pub fn persona(&self) -> &str {
        &self.persona
    }
}

impl ChatEngine for ScriptedEngine {
    type Error = Error;

    fn push_turn(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    fn request_reply(
        &mut self,
        _mode: ResponseMode,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        let delay = self.delay;
        let next = self.replies.pop_front();
        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            match next {
                Some(PresetReply::Text(text)) => Ok(text),
                Some(PresetReply::Failure(kind)) => Err(Error {
                    message: "scripted failure",
                    kind,
                }),
                None => Err(Error {
                    message: "no scripted replies left",
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}
