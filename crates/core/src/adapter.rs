use std::pin::Pin;

use glimmer_engine::{ChatEngine, EngineError, ResponseMode, Turn};

type BoxedReplyFuture<'a> = Pin<
    Box<dyn Future<Output = Result<String, Box<dyn EngineError>>> + Send + 'a>,
>;

/// Object-safe view of a [`ChatEngine`].
///
/// We have to erase the engine type, since `ConversationAdapter`
/// doesn't have a generic parameter and we don't want it either.
trait ErasedEngine: Send {
    fn push_turn(&mut self, turn: Turn);
    fn request_reply(&mut self, mode: ResponseMode) -> BoxedReplyFuture<'_>;
}

impl<E: ChatEngine> ErasedEngine for E {
    #[inline]
    fn push_turn(&mut self, turn: Turn) {
        ChatEngine::push_turn(self, turn);
    }

    fn request_reply(&mut self, mode: ResponseMode) -> BoxedReplyFuture<'_> {
        let fut = ChatEngine::request_reply(self, mode);
        Box::pin(async move {
            fut.await
                .map_err(|err| Box::new(err) as Box<dyn EngineError>)
        })
    }
}

/// Single choke-point for all traffic to the external engine.
///
/// The adapter exclusively owns its engine handle for the lifetime of a
/// session and keeps the engine's history consistent with what the user
/// actually saw: the user turn is appended before the reply request is
/// made, and the assistant turn only after a reply has actually been
/// received.
///
/// One adapter serves one session; it must not be shared across
/// concurrent controllers.
pub struct ConversationAdapter {
    engine: Box<dyn ErasedEngine>,
    mode: ResponseMode,
}

impl ConversationAdapter {
    /// Creates an adapter owning the given engine handle.
    ///
    /// The engine is expected to have been constructed with its fixed
    /// behavior description already; the adapter never reconfigures it.
    #[inline]
    pub fn new<E: ChatEngine + 'static>(engine: E) -> Self {
        Self {
            engine: Box::new(engine),
            mode: ResponseMode::default(),
        }
    }

    /// Sets the response mode passed to the engine on every request.
    #[inline]
    pub fn set_response_mode(&mut self, mode: ResponseMode) {
        self.mode = mode;
    }

    /// Submits `prompt` and returns the engine's reply.
    ///
    /// Callers are expected to reject blank prompts before calling;
    /// the adapter does not re-validate.
    ///
    /// On failure no assistant turn is appended and the error
    /// propagates to the caller unchanged. The dangling user turn is
    /// left in the history, and the request is never retried.
    pub async fn get_response(
        &mut self,
        prompt: &str,
    ) -> Result<String, Box<dyn EngineError>> {
        trace!("submitting prompt: {prompt:?}");
        self.engine.push_turn(Turn::user(prompt));

        let reply = self.engine.request_reply(self.mode.clone()).await?;
        trace!("received reply: {reply:?}");

        self.engine.push_turn(Turn::assistant(reply.clone()));
        Ok(reply)
    }
}
