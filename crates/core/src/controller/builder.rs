use std::time::Duration;

use glimmer_engine::{ChatEngine, ResponseMode};

use super::Controller;
use crate::adapter::ConversationAdapter;

/// The period between reveal steps when none is specified.
const DEFAULT_REVEAL_PERIOD: Duration = Duration::from_millis(30);

/// [`Controller`] builder.
pub struct ControllerBuilder {
    pub(crate) adapter: ConversationAdapter,
    pub(crate) reveal_period: Duration,
    pub(crate) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified engine.
    #[inline]
    pub fn with_engine<E: ChatEngine + 'static>(engine: E) -> Self {
        Self {
            adapter: ConversationAdapter::new(engine),
            reveal_period: DEFAULT_REVEAL_PERIOD,
            on_idle: None,
        }
    }

    /// Sets the response mode passed to the engine on every request.
    #[inline]
    pub fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.adapter.set_response_mode(mode);
        self
    }

    /// Sets the period between reveal steps.
    #[inline]
    pub fn with_reveal_period(mut self, period: Duration) -> Self {
        self.reveal_period = period;
        self
    }

    /// Attaches a callback to be invoked whenever a submission cycle
    /// returns to idle.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the controller.
    #[inline]
    pub fn build(self) -> Controller {
        Controller::spawn_from_builder(self)
    }
}
