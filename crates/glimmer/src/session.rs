use std::time::Duration;

use glimmer_core::{Controller, ControllerBuilder, InteractionState};
use glimmer_engine::{ChatEngine, ResponseMode};
use tokio::sync::watch;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    controller_builder: ControllerBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified engine.
    ///
    /// The engine should already carry its behavior description; the
    /// session never reconfigures it.
    pub fn with_engine<E: ChatEngine + 'static>(engine: E) -> Self {
        Self {
            controller_builder: ControllerBuilder::with_engine(engine),
        }
    }

    /// Sets the response mode requested from the engine.
    #[inline]
    pub fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.controller_builder =
            self.controller_builder.with_response_mode(mode);
        self
    }

    /// Sets the period between reveal steps.
    #[inline]
    pub fn with_reveal_period(mut self, period: Duration) -> Self {
        self.controller_builder =
            self.controller_builder.with_reveal_period(period);
        self
    }

    /// Attaches a callback to be invoked whenever a submission cycle
    /// returns to idle.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder = self.controller_builder.on_idle(on_idle);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            controller: self.controller_builder.build(),
        }
    }
}

/// A chat session, like a view that displays a reply and has an input
/// box.
///
/// The session holds a fully configured interaction loop, and it is
/// basically a wrapper around [`Controller`].
pub struct Session {
    controller: Controller,
}

impl Session {
    /// Submits a prompt to the session.
    #[inline]
    pub fn submit(&self, prompt: &str) {
        self.controller.submit(prompt);
    }

    /// Returns a receiver observing the session's interaction state.
    #[inline]
    pub fn state(&self) -> watch::Receiver<InteractionState> {
        self.controller.state()
    }

    /// Shuts the session down, canceling any reveal in progress.
    #[inline]
    pub fn shutdown(&self) {
        self.controller.shutdown();
    }
}
