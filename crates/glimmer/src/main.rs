//! A terminal front-end for the glimmer chat session.

#[macro_use]
extern crate tracing;

mod backdrop;

use std::env;
use std::io::Write as _;

use glimmer::SessionBuilder;
use glimmer_openai_engine::{EngineConfigBuilder, OpenAIEngine};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;

use backdrop::Backdrop;

enum SessionEvent {
    Idle,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return;
    };
    let Ok(base_url) = env::var("OPENAI_BASE_URL") else {
        eprintln!("OPENAI_BASE_URL environment variable is not set");
        return;
    };
    let Ok(model) = env::var("OPENAI_MODEL") else {
        eprintln!("OPENAI_MODEL environment variable is not set");
        return;
    };

    let config = EngineConfigBuilder::with_api_key(api_key)
        .with_base_url(base_url)
        .with_model(model)
        .build();
    debug!("engine configured: {config:?}");
    let engine = OpenAIEngine::new(config, include_str!("./persona.md"));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let session = SessionBuilder::with_engine(engine)
        .on_idle(move || {
            event_tx.send(SessionEvent::Idle).ok();
        })
        .build();
    let mut state_rx = session.state();

    let backdrop = Backdrop::spawn();

    'outer: loop {
        print!("{} ", ">".bright_magenta());
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        session.submit(line);

        let mut printed = 0;
        loop {
            select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    match event {
                        SessionEvent::Idle => {
                            let state = state_rx.borrow_and_update().clone();
                            if state.latest_reply.is_empty() {
                                println!(
                                    "{}",
                                    "(the engine did not reply, try again)"
                                        .dimmed()
                                );
                            } else {
                                println!(
                                    "{}",
                                    (&state.revealed[printed..]).bright_white()
                                );
                            }
                            break;
                        }
                    }
                }
                res = state_rx.changed() => {
                    if res.is_err() {
                        break 'outer;
                    }
                    let state = state_rx.borrow_and_update().clone();
                    if state.revealed.len() > printed {
                        print!(
                            "{}",
                            (&state.revealed[printed..]).bright_white()
                        );
                        std::io::stdout().flush().unwrap();
                        printed = state.revealed.len();
                    }
                }
            }
        }
    }

    session.shutdown();
    // Release the backdrop's terminal line before giving the terminal
    // back to the shell.
    backdrop.shutdown().await;
}

async fn read_line() -> Option<String> {
    let mut lines = io::BufReader::new(io::stdin()).lines();
    lines.next_line().await.ok().flatten()
}
