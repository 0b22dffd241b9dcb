use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use glimmer_engine::{
    ChatEngine, EngineError, ErrorKind, ResponseMode, Role, Turn,
};
use tokio::time::sleep;

#[derive(Debug)]
struct EchoEngineError(ErrorKind);

impl Display for EchoEngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for EchoEngineError {}

impl EngineError for EchoEngineError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// An engine that echoes the latest user turn back after a tiny delay.
#[derive(Default)]
struct EchoEngine {
    history: Vec<Turn>,
}

impl ChatEngine for EchoEngine {
    type Error = EchoEngineError;

    fn push_turn(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    fn request_reply(
        &mut self,
        _mode: ResponseMode,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        let last = self.history.last().cloned();
        async move {
            sleep(Duration::from_millis(1)).await;
            match last {
                Some(Turn {
                    role: Role::User,
                    text,
                }) => Ok(format!("You said {text}")),
                _ => Err(EchoEngineError(ErrorKind::Rejected)),
            }
        }
    }
}

#[tokio::test]
async fn test_reply_round_trip() {
    let mut engine = EchoEngine::default();
    engine.push_turn(Turn::user("Good morning"));

    let reply = engine
        .request_reply(ResponseMode::default())
        .await
        .unwrap();
    assert_eq!(reply, "You said Good morning");

    engine.push_turn(Turn::assistant(reply));
    assert_eq!(engine.history.len(), 2);
    assert_eq!(engine.history[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_reply_without_user_turn() {
    let mut engine = EchoEngine::default();
    let err = engine
        .request_reply(ResponseMode::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
}
