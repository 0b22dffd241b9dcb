//! A chat engine backed by OpenAI-compatible APIs.
//!
//! Each reply is a single plain HTTP round trip (no SSE streaming);
//! the typewriter reveal in the session core is purely cosmetic and
//! doesn't need partial replies. The engine handle keeps the session's
//! turn history internally, seeded with the behavior description as
//! the system message.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use glimmer_engine::{
    ChatEngine, EngineError, ErrorKind, ResponseMode, Turn,
};
use reqwest::{Client, Response, header};

pub use config::{EngineConfig, EngineConfigBuilder};

/// Error type for [`OpenAIEngine`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl EngineError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

fn kind_of(err: &reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::Timeout
    } else if err.is_connect() {
        ErrorKind::Network
    } else if err.is_status() {
        ErrorKind::Rejected
    } else {
        ErrorKind::Other
    }
}

/// Chat engine for OpenAI-compatible APIs.
#[derive(Clone, Debug)]
pub struct OpenAIEngine {
    client: Client,
    config: Arc<EngineConfig>,
    messages: Vec<proto::Message>,
}

impl OpenAIEngine {
    /// Creates a new engine with the given configuration and behavior
    /// description.
    pub fn new<S: Into<String>>(config: EngineConfig, persona: S) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
            messages: vec![proto::Message::System {
                content: persona.into(),
            }],
        }
    }
}

impl ChatEngine for OpenAIEngine {
    type Error = Error;

    fn push_turn(&mut self, turn: Turn) {
        self.messages.push(proto::from_turn(&turn));
    }

    // The response style of this engine is driven entirely by the
    // persona in the system message; the mode is accepted but unused.
    fn request_reply(
        &mut self,
        _mode: ResponseMode,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        let request = proto::create_request(&self.messages, &self.config);
        let resp_fut = self
            .client
            .post(format!("{}{}", self.config.base_url, "/chat/completions"))
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(self.config.request_timeout)
            .json(&request)
            .send();

        async move {
            let resp = match resp_fut.await.and_then(Response::error_for_status)
            {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(format!("{err}"), kind_of(&err)));
                }
            };

            let completion: proto::ChatCompletion = match resp.json().await {
                Ok(completion) => completion,
                Err(err) => {
                    return Err(Error::new(
                        format!("{err}"),
                        ErrorKind::Other,
                    ));
                }
            };

            let Some(reply) = completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
            else {
                return Err(Error::new(
                    "response contains no reply",
                    ErrorKind::Rejected,
                ));
            };
            trace!("received a reply of {} bytes", reply.len());
            Ok(reply)
        }
    }
}
