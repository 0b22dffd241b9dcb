mod builder;
mod state;
#[cfg(test)]
mod tests;

use tokio::sync::{mpsc, watch};
use tracing::Instrument;

pub use builder::ControllerBuilder;
use state::{Command, ControllerState, run_controller};

/// Snapshot of the user-visible interaction state.
///
/// Snapshots are published through a watch channel; a front-end renders
/// `revealed` and disables its submit control while `is_loading` is
/// set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// The prompt of the submission currently being processed.
    pub prompt: String,
    /// Whether a reply request is currently in flight.
    pub is_loading: bool,
    /// The full text of the most recent reply.
    pub latest_reply: String,
    /// The revealed prefix of `latest_reply`.
    pub revealed: String,
}

impl InteractionState {
    /// Returns `true` when the reveal has caught up with the reply.
    #[inline]
    pub fn reveal_done(&self) -> bool {
        self.revealed.len() == self.latest_reply.len()
    }
}

/// Handle to the submit/reveal interaction loop.
///
/// The loop runs as its own task and owns the conversation adapter.
/// Submissions dispatched to it are handled immediately no matter what
/// phase the loop is in: while a reply request is in flight a new
/// submission is ignored (not queued, not merged), and a submission
/// during a reveal cancels the remaining reveal before the next cycle
/// begins.
pub struct Controller {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<InteractionState>,
    kill_tx: watch::Sender<bool>,
}

impl Controller {
    /// Submits a prompt for processing.
    ///
    /// Prompts that trim to an empty string are ignored without any
    /// observable state change.
    pub fn submit<S: Into<String>>(&self, prompt: S) {
        self.cmd_tx
            .send(Command::Submit(prompt.into()))
            .expect("controller task has been dropped too early");
    }

    /// Returns a receiver observing interaction state snapshots.
    #[inline]
    pub fn state(&self) -> watch::Receiver<InteractionState> {
        self.state_rx.clone()
    }

    /// Shuts the interaction loop down.
    ///
    /// Any reveal in progress is canceled. An in-flight engine request
    /// keeps running in the background and its result is discarded.
    /// The loop is not guaranteed to stop immediately, but it will
    /// stop handling further messages and quit soon.
    #[inline]
    pub fn shutdown(&self) {
        self.kill_tx.send(true).ok();
    }
}

impl Clone for Controller {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            state_rx: self.state_rx.clone(),
            kill_tx: self.kill_tx.clone(),
        }
    }
}

impl Controller {
    fn spawn_from_builder(builder: ControllerBuilder) -> Self {
        let ControllerBuilder {
            adapter,
            reveal_period,
            on_idle,
        } = builder;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(InteractionState::default());
        let (kill_tx, kill_rx) = watch::channel(false);

        let state = ControllerState::new(
            adapter,
            reveal_period,
            on_idle,
            state_tx,
            cmd_tx.clone(),
        );
        tokio::spawn(
            run_controller(state, cmd_rx, kill_rx)
                .instrument(trace_span!("controller")),
        );

        Self {
            cmd_tx,
            state_rx,
            kill_tx,
        }
    }
}
