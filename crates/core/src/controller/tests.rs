use std::time::Duration;

use glimmer_engine::{ErrorKind, Role};
use glimmer_test_engine::{PresetReply, ScriptedEngine};
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use super::{Controller, ControllerBuilder};

const WAIT: Duration = Duration::from_secs(5);

fn build_controller(
    engine: ScriptedEngine,
) -> (Controller, watch::Receiver<u32>) {
    let (idle_tx, idle_rx) = watch::channel(0u32);
    let controller = ControllerBuilder::with_engine(engine)
        .on_idle(move || idle_tx.send_modify(|n| *n += 1))
        .build();
    (controller, idle_rx)
}

#[tokio::test(start_paused = true)]
async fn test_submit_reveals_full_reply() {
    let mut engine = ScriptedEngine::new("persona");
    engine.push_reply(PresetReply::text("It's a field..."));
    let history = engine.history();

    let (controller, mut idle_rx) = build_controller(engine);
    controller.submit("What is quantum computing?");

    timeout(WAIT, idle_rx.wait_for(|n| *n == 1))
        .await
        .unwrap()
        .unwrap();

    let state = controller.state().borrow().clone();
    assert!(!state.is_loading);
    assert_eq!(state.prompt, "What is quantum computing?");
    assert_eq!(state.latest_reply, "It's a field...");
    assert_eq!(state.revealed, state.latest_reply);

    let turns = history.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[1].role, Role::Assistant);

    controller.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_blank_prompts_are_ignored() {
    let mut engine = ScriptedEngine::new("persona");
    engine.push_reply(PresetReply::text("hello"));
    let history = engine.history();

    let (controller, mut idle_rx) = build_controller(engine);
    controller.submit("");
    controller.submit("   ");

    sleep(Duration::from_millis(100)).await;
    let state = controller.state().borrow().clone();
    assert!(!state.is_loading);
    assert!(state.latest_reply.is_empty());
    assert!(history.is_empty());

    // A real prompt afterwards still goes through.
    controller.submit("real");
    timeout(WAIT, idle_rx.wait_for(|n| *n == 1))
        .await
        .unwrap()
        .unwrap();

    let turns = history.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].text, "real");

    controller.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_submission_ignored_while_loading() {
    let mut engine = ScriptedEngine::new("persona");
    engine.set_delay(Duration::from_millis(100));
    engine.push_reply(PresetReply::text("first reply"));
    let history = engine.history();

    let (controller, mut idle_rx) = build_controller(engine);
    let mut state_rx = controller.state();

    controller.submit("first");
    timeout(WAIT, state_rx.wait_for(|s| s.is_loading))
        .await
        .unwrap()
        .unwrap();

    // Dropped, not queued.
    controller.submit("second");

    timeout(WAIT, idle_rx.wait_for(|n| *n == 1))
        .await
        .unwrap()
        .unwrap();

    let state = state_rx.borrow().clone();
    assert_eq!(state.prompt, "first");
    assert_eq!(state.latest_reply, "first reply");

    // Give a dropped submission plenty of time to surface if it were
    // queued after all.
    sleep(Duration::from_secs(1)).await;
    assert_eq!(*idle_rx.borrow(), 1);
    let turns = history.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].text, "first");

    controller.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_engine_failure_returns_to_idle() {
    let mut engine = ScriptedEngine::new("persona");
    engine.push_reply(PresetReply::failure(ErrorKind::Network));
    let history = engine.history();

    let (controller, mut idle_rx) = build_controller(engine);
    controller.submit("Hello?");

    timeout(WAIT, idle_rx.wait_for(|n| *n == 1))
        .await
        .unwrap()
        .unwrap();

    let state = controller.state().borrow().clone();
    assert!(!state.is_loading);
    assert!(state.latest_reply.is_empty());
    assert!(state.revealed.is_empty());

    // The dangling user turn stays; no assistant turn was appended.
    let turns = history.turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::User);

    controller.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_reveal_is_prefix_monotonic() {
    let reply = "héllo ✨";
    let mut engine = ScriptedEngine::new("persona");
    engine.push_reply(PresetReply::text(reply));

    let (controller, _idle_rx) = build_controller(engine);
    let mut state_rx = controller.state();
    controller.submit("hi");

    let mut seen = vec![String::new()];
    loop {
        timeout(WAIT, state_rx.changed()).await.unwrap().unwrap();
        let state = state_rx.borrow_and_update().clone();
        if state.is_loading || state.latest_reply.is_empty() {
            continue;
        }
        let last = seen.last().unwrap();
        if state.revealed != *last {
            assert!(state.revealed.starts_with(last.as_str()));
            seen.push(state.revealed.clone());
        }
        if state.reveal_done() {
            break;
        }
    }

    assert_eq!(seen.last().unwrap(), reply);
    // One snapshot per character, plus the empty prefix.
    assert_eq!(seen.len(), reply.chars().count() + 1);

    controller.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_resubmission_mid_reveal_cancels() {
    let mut engine = ScriptedEngine::new("persona");
    engine.push_reply(PresetReply::text("0123456789"));
    engine.push_reply(PresetReply::text("ok"));
    let history = engine.history();

    let (controller, mut idle_rx) = build_controller(engine);
    let mut state_rx = controller.state();

    controller.submit("first");
    timeout(
        WAIT,
        state_rx.wait_for(|s| !s.revealed.is_empty() && !s.reveal_done()),
    )
    .await
    .unwrap()
    .unwrap();

    // The first cycle never reaches idle; the submission cancels its
    // reveal and starts a fresh cycle.
    controller.submit("second");
    timeout(WAIT, idle_rx.wait_for(|n| *n == 1))
        .await
        .unwrap()
        .unwrap();

    let state = state_rx.borrow().clone();
    assert_eq!(state.prompt, "second");
    assert_eq!(state.latest_reply, "ok");
    assert_eq!(state.revealed, "ok");

    assert_eq!(history.len(), 4);

    controller.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_freezes_reveal() {
    let mut engine = ScriptedEngine::new("persona");
    engine.push_reply(PresetReply::text("0123456789"));

    let (controller, _idle_rx) = build_controller(engine);
    let mut state_rx = controller.state();

    controller.submit("first");
    timeout(WAIT, state_rx.wait_for(|s| !s.revealed.is_empty()))
        .await
        .unwrap()
        .unwrap();

    controller.shutdown();

    // Let any already-scheduled step land, then verify nothing grows.
    sleep(Duration::from_millis(100)).await;
    let frozen = state_rx.borrow().clone();
    sleep(Duration::from_secs(1)).await;
    let later = state_rx.borrow().clone();
    assert_eq!(frozen.revealed, later.revealed);
    assert!(!later.reveal_done());
}

#[tokio::test(start_paused = true)]
async fn test_empty_reply_completes_immediately() {
    let mut engine = ScriptedEngine::new("persona");
    engine.push_reply(PresetReply::text(""));

    let (controller, mut idle_rx) = build_controller(engine);
    controller.submit("hi");

    timeout(WAIT, idle_rx.wait_for(|n| *n == 1))
        .await
        .unwrap()
        .unwrap();

    let state = controller.state().borrow().clone();
    assert!(!state.is_loading);
    assert!(state.latest_reply.is_empty());
    assert!(state.reveal_done());

    controller.shutdown();
}
