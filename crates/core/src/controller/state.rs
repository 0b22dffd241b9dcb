use std::fmt::{self, Debug};
use std::time::Duration;

use glimmer_engine::EngineError;
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};

use super::InteractionState;
use crate::adapter::ConversationAdapter;

/// The phase of the submit/reveal cycle.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Submitting,
    Revealing,
}

pub(super) enum Command {
    Submit(String),
    RequestFinished {
        adapter: ConversationAdapter,
        result: Result<String, Box<dyn EngineError>>,
    },
}

impl Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submit(prompt) => {
                f.debug_tuple("Submit").field(prompt).finish()
            }
            Self::RequestFinished { result, .. } => f
                .debug_struct("RequestFinished")
                .field("result", result)
                .finish_non_exhaustive(),
        }
    }
}

pub(super) struct ControllerState {
    adapter: Option<ConversationAdapter>,
    phase: Phase,
    reveal_period: Duration,
    next_reveal_at: Option<Instant>,
    state_tx: watch::Sender<InteractionState>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ControllerState {
    pub(super) fn new(
        adapter: ConversationAdapter,
        reveal_period: Duration,
        on_idle: Option<Box<dyn Fn() + Send + Sync>>,
        state_tx: watch::Sender<InteractionState>,
        cmd_tx: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self {
            adapter: Some(adapter),
            phase: Phase::default(),
            reveal_period,
            next_reveal_at: None,
            state_tx,
            cmd_tx,
            on_idle,
        }
    }

    #[inline]
    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Submit(prompt) => self.submit(prompt),
            Command::RequestFinished { adapter, result } => {
                self.request_finished(adapter, result);
            }
        }
    }

    fn submit(&mut self, prompt: String) {
        if self.phase == Phase::Submitting {
            // A request is already in flight. The input is dropped,
            // not queued.
            debug!("ignoring submission while a request is in flight");
            return;
        }
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return;
        }

        // A submission during a reveal cancels the remaining reveal.
        self.next_reveal_at = None;
        self.phase = Phase::Submitting;
        self.state_tx.send_replace(InteractionState {
            prompt: prompt.to_owned(),
            is_loading: true,
            latest_reply: String::new(),
            revealed: String::new(),
        });

        let mut adapter =
            self.adapter.take().expect("adapter is already in use");
        let cmd_tx = self.cmd_tx.clone();
        let prompt = prompt.to_owned();
        tokio::spawn(async move {
            let result = adapter.get_response(&prompt).await;
            // The loop may have been shut down in the meantime, in
            // which case the result is discarded.
            cmd_tx
                .send(Command::RequestFinished { adapter, result })
                .ok();
        });
    }

    fn request_finished(
        &mut self,
        adapter: ConversationAdapter,
        result: Result<String, Box<dyn EngineError>>,
    ) {
        self.adapter = Some(adapter);
        match result {
            Ok(reply) => {
                self.phase = Phase::Revealing;
                let empty = reply.is_empty();
                self.state_tx.send_modify(|state| {
                    state.is_loading = false;
                    state.latest_reply = reply;
                });
                if empty {
                    // Nothing to reveal.
                    self.finish_cycle();
                } else {
                    self.next_reveal_at =
                        Some(Instant::now() + self.reveal_period);
                }
            }
            Err(err) => {
                error!("engine request failed: {err}");
                self.phase = Phase::Idle;
                self.state_tx.send_modify(|state| state.is_loading = false);
                self.notify_idle();
            }
        }
    }

    #[inline]
    fn next_deadline(&self) -> Option<Instant> {
        self.next_reveal_at
    }

    fn advance_reveal(&mut self) {
        let Some(deadline) = self.next_reveal_at else {
            return;
        };
        let mut done = false;
        self.state_tx.send_modify(|state| {
            let rest = &state.latest_reply[state.revealed.len()..];
            if let Some(c) = rest.chars().next() {
                state.revealed.push(c);
            }
            done = state.revealed.len() == state.latest_reply.len();
        });
        if done {
            self.finish_cycle();
        } else {
            self.next_reveal_at = Some(deadline + self.reveal_period);
        }
    }

    fn finish_cycle(&mut self) {
        self.next_reveal_at = None;
        self.phase = Phase::Idle;
        self.notify_idle();
    }

    fn notify_idle(&self) {
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }
}

pub(super) async fn run_controller(
    mut state: ControllerState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("started");
    loop {
        // Re-armed on every turn of the loop, so a cleared deadline
        // deterministically stops the reveal.
        let deadline = state.next_deadline();
        select! {
            biased;

            _ = kill_rx.changed() => {
                break;
            }
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    break;
                };
                trace!("received command: {cmd:?}");
                state.handle(cmd);
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)),
                if deadline.is_some() =>
            {
                state.advance_reveal();
            }
        }
    }
    debug!("will terminate");
}
