use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::select;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

const FRAME_PERIOD: Duration = Duration::from_millis(80);

/// Decorative background animation for the terminal.
///
/// The backdrop runs on its own task and shares no state with the
/// session; it only owns its spinner line, which must be released
/// before the process gives the terminal back. [`Backdrop::shutdown`]
/// returns once the line has actually been cleared.
pub struct Backdrop {
    kill_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Backdrop {
    /// Spawns the backdrop animation.
    pub fn spawn() -> Self {
        let style = ProgressStyle::with_template("{spinner} {wide_msg}")
            .unwrap()
            .tick_chars("·∙✦✶✦∙");
        let bar = ProgressBar::new_spinner();
        bar.set_style(style);

        let (kill_tx, mut kill_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            loop {
                select! {
                    _ = kill_rx.changed() => {
                        break;
                    }
                    _ = sleep(FRAME_PERIOD) => {
                        bar.tick();
                    }
                }
            }
            bar.finish_and_clear();
        });

        Self { kill_tx, task }
    }

    /// Stops the animation and clears its terminal line.
    pub async fn shutdown(self) {
        self.kill_tx.send(true).ok();
        self.task.await.ok();
    }
}
