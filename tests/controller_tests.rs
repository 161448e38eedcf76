//! Session controller scenarios
//!
//! Drives `CallController` against the loopback client with explicit
//! instants, so timers and retries are checked without sleeping.

use converso::client::{EventKind, TranscriptMessage};
use converso::messages::Role;
use converso::{
    AlertLevel, CallController, CallStatus, CompanionProps, ControllerConfig, LoopbackClient,
    MemoryHistory, Shortcut, VoiceEvent,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Fixture {
    controller: CallController,
    client: Arc<LoopbackClient>,
    history: Arc<MemoryHistory>,
}

fn fixture_with(client: LoopbackClient) -> Fixture {
    let client = Arc::new(client);
    let history = Arc::new(MemoryHistory::new());
    let controller = CallController::new(
        client.clone(),
        history.clone(),
        CompanionProps::default(),
        ControllerConfig::default(),
    );
    Fixture {
        controller,
        client,
        history,
    }
}

fn fixture() -> Fixture {
    fixture_with(LoopbackClient::new())
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Start a call and deliver call-start
fn connect(f: &mut Fixture, now: Instant) {
    f.controller.start();
    f.controller.poll(now);
    f.client.emit(VoiceEvent::CallStart);
    f.controller.poll(now);
    assert_eq!(f.controller.status(), CallStatus::Active);
}

#[test]
fn test_hello_scenario() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);

    f.client.emit(VoiceEvent::TranscriptStart);
    f.client.emit(VoiceEvent::Message(TranscriptMessage::partial(
        Role::User,
        "hel",
    )));
    f.controller.poll(now);
    assert!(f.controller.state().listening);
    assert!(f.controller.silence_timer_pending());

    f.client.emit(VoiceEvent::Message(TranscriptMessage::final_(
        Role::User,
        "hello",
    )));
    f.controller.poll(now);
    assert!(f.controller.state().partial.is_none());

    let transcript = f.controller.transcript();
    assert_eq!(transcript.len(), 1);
    let latest = transcript.latest().unwrap();
    assert_eq!(latest.role, Role::User);
    assert_eq!(latest.content, "hello");
    assert_eq!(f.controller.context().window.len(), 1);
}

#[test]
fn test_transcript_is_newest_first() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);

    for i in 0..5 {
        let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
        f.client.emit(VoiceEvent::Message(TranscriptMessage::final_(
            role,
            format!("line {}", i),
        )));
    }
    f.controller.poll(now);

    let contents: Vec<String> = f
        .controller
        .transcript()
        .iter()
        .map(|m| m.content.clone())
        .collect();
    assert_eq!(
        contents,
        vec!["line 4", "line 3", "line 2", "line 1", "line 0"]
    );
}

#[test]
fn test_context_window_is_bounded() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);

    for i in 0..25 {
        f.client.emit(VoiceEvent::Message(TranscriptMessage::final_(
            Role::User,
            format!("utterance {}", i),
        )));
        f.controller.poll(now);
        assert!(f.controller.context().window.len() <= 10);
    }

    assert_eq!(f.controller.transcript().len(), 25);
    let window: Vec<&str> = f
        .controller
        .context()
        .window
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(window.len(), 10);
    assert_eq!(window.first(), Some(&"utterance 15"));
    assert_eq!(window.last(), Some(&"utterance 24"));
}

#[test]
fn test_partials_do_not_enter_transcript() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);

    f.client.emit(VoiceEvent::Message(TranscriptMessage::partial(
        Role::User,
        "hel",
    )));
    f.controller.poll(now);
    assert!(f.controller.transcript().is_empty());
    assert_eq!(
        f.controller.state().partial.as_ref().map(|p| p.text.as_str()),
        Some("hel")
    );

    f.client.emit(VoiceEvent::Message(TranscriptMessage::final_(
        Role::User,
        "hello",
    )));
    f.controller.poll(now);
    assert_eq!(f.controller.transcript().len(), 1);
    assert!(f.controller.state().partial.is_none());
}

#[test]
fn test_only_call_events_move_past_connecting() {
    let mut f = fixture();
    let now = Instant::now();

    f.controller.start();
    assert_eq!(f.controller.status(), CallStatus::Connecting);

    // Accepted start and unrelated events leave the phase alone
    f.client.emit(VoiceEvent::SpeechStart);
    f.client.emit(VoiceEvent::VolumeLevel(0.3));
    f.controller.poll(now);
    assert_eq!(f.controller.status(), CallStatus::Connecting);

    f.client.emit(VoiceEvent::CallStart);
    f.controller.poll(now);
    assert_eq!(f.controller.status(), CallStatus::Active);

    f.client.emit(VoiceEvent::CallEnd);
    f.controller.poll(now);
    assert_eq!(f.controller.status(), CallStatus::Finished);
}

#[test]
fn test_call_end_while_connecting_finishes() {
    let mut f = fixture();
    f.controller.start();
    f.client.emit(VoiceEvent::CallEnd);
    f.controller.poll(Instant::now());
    assert_eq!(f.controller.status(), CallStatus::Finished);
}

#[test]
fn test_retry_schedule_and_exhaustion() {
    let mut f = fixture();
    for _ in 0..4 {
        f.client.fail_next_start("network unreachable");
    }
    let t0 = Instant::now();

    f.controller.start();
    assert_eq!(f.client.start_calls(), 1);

    // First retry has no delay: failure and relaunch in the same frame
    f.controller.poll(t0);
    assert_eq!(f.controller.state().retry_count, 1);
    assert_eq!(f.client.start_calls(), 2);
    assert_eq!(f.controller.status(), CallStatus::Connecting);
    assert_eq!(f.controller.alert().map(|a| a.level), Some(AlertLevel::Warning));

    // Second failure waits 1000ms
    f.controller.poll(t0);
    assert_eq!(f.controller.state().retry_count, 2);
    assert_eq!(f.controller.status(), CallStatus::Inactive);
    assert!(f.controller.retry_pending());
    f.controller.poll(t0 + ms(999));
    assert_eq!(f.client.start_calls(), 2);
    f.controller.poll(t0 + ms(1000));
    assert_eq!(f.client.start_calls(), 3);

    // Third failure waits 2000ms
    f.controller.poll(t0 + ms(1000));
    assert_eq!(f.controller.state().retry_count, 3);
    f.controller.poll(t0 + ms(2999));
    assert_eq!(f.client.start_calls(), 3);
    f.controller.poll(t0 + ms(3000));
    assert_eq!(f.client.start_calls(), 4);

    // Fourth failure is terminal
    f.controller.poll(t0 + ms(3000));
    assert_eq!(f.controller.status(), CallStatus::Inactive);
    assert_eq!(f.controller.state().retry_count, 3);
    assert!(!f.controller.retry_pending());
    let alert = f.controller.alert().unwrap();
    assert_eq!(alert.level, AlertLevel::Terminal);
    assert!(alert.message.contains("multiple attempts"));

    f.controller.poll(t0 + ms(60_000));
    assert_eq!(f.client.start_calls(), 4);
    assert!(f.history.is_empty());
}

#[test]
fn test_successful_connect_resets_retry_count() {
    let mut f = fixture();
    f.client.fail_next_start("busy");
    let t0 = Instant::now();

    f.controller.start();
    f.controller.poll(t0);
    assert_eq!(f.controller.state().retry_count, 1);
    assert_eq!(f.client.start_calls(), 2);

    f.client.emit(VoiceEvent::CallStart);
    f.controller.poll(t0);
    assert_eq!(f.controller.status(), CallStatus::Active);
    assert_eq!(f.controller.state().retry_count, 0);
    assert!(f.controller.alert().is_none());
}

#[test]
fn test_manual_start_supersedes_pending_retry() {
    let mut f = fixture();
    f.client.fail_next_start("busy");
    f.client.fail_next_start("busy");
    let t0 = Instant::now();

    f.controller.start();
    f.controller.poll(t0);
    f.controller.poll(t0);
    assert!(f.controller.retry_pending());
    assert_eq!(f.client.start_calls(), 2);

    f.controller.start();
    assert_eq!(f.client.start_calls(), 3);
    assert_eq!(f.controller.state().retry_count, 0);
    assert!(!f.controller.retry_pending());

    // The cancelled retry never fires
    f.controller.poll(t0 + ms(5000));
    assert_eq!(f.client.start_calls(), 3);
}

#[test]
fn test_silence_timer_double_arm_fires_once() {
    let mut f = fixture();
    let t0 = Instant::now();
    connect(&mut f, t0);

    f.client.emit(VoiceEvent::TranscriptStart);
    f.controller.poll(t0);
    f.client.emit(VoiceEvent::TranscriptStart);
    f.controller.poll(t0 + ms(1000));
    assert!(f.controller.state().listening);

    // First arm would have fired at 3000; the re-arm moved it to 4000
    f.controller.poll(t0 + ms(3000));
    assert!(f.controller.state().listening);
    f.controller.poll(t0 + ms(4000));
    assert!(!f.controller.state().listening);
    assert!(!f.controller.silence_timer_pending());

    f.client.emit(VoiceEvent::SpeechEnd);
    f.controller.poll(t0 + ms(4000));
    f.controller.poll(t0 + ms(10_000));
    assert!(!f.controller.state().listening);
}

#[test]
fn test_mute_is_noop_outside_active() {
    let mut f = fixture();
    assert!(!f.controller.handle_shortcut(Shortcut::ToggleMute));
    assert!(!f.controller.state().muted);

    connect(&mut f, Instant::now());
    assert!(f.controller.handle_shortcut(Shortcut::ToggleMute));
    assert!(f.controller.state().muted);

    f.controller.disconnect();
    assert!(!f.controller.toggle_mute());
    assert!(f.controller.state().muted);
}

#[test]
fn test_history_recorded_once_per_call_end() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);

    f.controller.disconnect();
    assert_eq!(f.controller.status(), CallStatus::Finished);
    f.client.emit(VoiceEvent::CallEnd);
    f.client.emit(VoiceEvent::CallEnd);
    f.controller.poll(now);

    assert_eq!(f.history.len(), 1);
    assert_eq!(f.history.count_for("demo"), 1);

    // A second call records a second entry
    connect(&mut f, now);
    f.client.emit(VoiceEvent::CallEnd);
    f.controller.poll(now);
    assert_eq!(f.history.count_for("demo"), 2);
}

#[test]
fn test_stop_failure_still_finishes() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);

    f.client.fail_next_stop("socket closed");
    f.controller.disconnect();
    assert_eq!(f.controller.status(), CallStatus::Finished);
    f.controller.poll(now);
    assert_eq!(f.controller.status(), CallStatus::Finished);
    assert_eq!(f.client.stop_calls(), 1);
}

#[test]
fn test_finished_session_can_restart() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);
    f.controller.disconnect();
    assert!(f.controller.handle_shortcut(Shortcut::StartSession));
    assert_eq!(f.controller.status(), CallStatus::Connecting);
    assert_eq!(f.client.start_calls(), 2);
}

#[test]
fn test_listener_failure_does_not_block_mount() {
    let client = LoopbackClient::new();
    client.fail_subscriptions_for(EventKind::VolumeLevel);
    let mut f = fixture_with(client);
    assert!(f.controller.is_mounted());
    assert_eq!(f.client.listener_count(), 8);

    connect(&mut f, Instant::now());
    f.client.emit(VoiceEvent::VolumeLevel(0.9));
    f.controller.poll(Instant::now());
    assert_eq!(f.controller.state().audio_level, 0.0);
}

#[test]
fn test_start_passes_companion_overrides() {
    let mut f = fixture();
    f.controller.start();

    let overrides = f.client.last_overrides().unwrap();
    let props = CompanionProps::default();
    assert_eq!(overrides.variable_values.subject, props.subject);
    assert_eq!(overrides.variable_values.topic, props.topic);
    assert_eq!(overrides.variable_values.style, props.style);
}

#[test]
fn test_auto_connect_round_trip() {
    let mut f = fixture_with(LoopbackClient::new().with_auto_connect(true));
    let now = Instant::now();

    f.controller.start();
    f.controller.poll(now);
    assert_eq!(f.controller.status(), CallStatus::Active);

    f.controller.disconnect();
    f.controller.poll(now);
    assert_eq!(f.controller.status(), CallStatus::Finished);
    assert_eq!(f.history.len(), 1);
}

#[test]
fn test_unmount_stops_event_delivery() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);

    f.controller.unmount();
    assert_eq!(f.client.listener_count(), 0);
    assert_eq!(f.client.emit(VoiceEvent::CallEnd), 0);
    f.controller.poll(now);
    assert_eq!(f.controller.status(), CallStatus::Active);
}

#[test]
fn test_end_session_shortcut_only_when_active() {
    let mut f = fixture();
    let now = Instant::now();

    assert!(!f.controller.handle_shortcut(Shortcut::EndSession));
    assert_eq!(f.controller.status(), CallStatus::Inactive);

    f.controller.start();
    assert!(!f.controller.handle_shortcut(Shortcut::EndSession));
    assert_eq!(f.controller.status(), CallStatus::Connecting);
    assert_eq!(f.client.stop_calls(), 0);

    f.controller.poll(now);
    f.client.emit(VoiceEvent::CallStart);
    f.controller.poll(now);

    assert!(f.controller.handle_shortcut(Shortcut::EndSession));
    assert_eq!(f.controller.status(), CallStatus::Finished);
    assert_eq!(f.client.stop_calls(), 1);
}

#[test]
fn test_start_shortcut_ignored_during_call() {
    let mut f = fixture();
    let now = Instant::now();

    f.controller.start();
    assert!(!f.controller.handle_shortcut(Shortcut::StartSession));
    assert_eq!(f.client.start_calls(), 1);

    f.controller.poll(now);
    f.client.emit(VoiceEvent::CallStart);
    f.controller.poll(now);
    assert!(!f.controller.handle_shortcut(Shortcut::StartSession));
    assert_eq!(f.controller.status(), CallStatus::Active);
    assert_eq!(f.client.start_calls(), 1);
}

#[test]
fn test_clear_transcript_empties_next_call_context() {
    let mut f = fixture();
    let now = Instant::now();
    connect(&mut f, now);

    for text in ["what is chlorophyll?", "It's the green pigment."] {
        f.client.emit(VoiceEvent::Message(TranscriptMessage::final_(
            Role::User,
            text,
        )));
    }
    f.controller.poll(now);
    f.controller.disconnect();
    assert_eq!(f.controller.context().window.len(), 2);

    f.controller.clear_transcript();
    assert!(f.controller.transcript().is_empty());
    assert!(f.controller.context().window.is_empty());

    f.controller.start();
    let overrides = f.client.last_overrides().unwrap();
    assert!(overrides.context.is_empty());
}

#[test]
fn test_max_retries_counts_retries_not_attempts() {
    let client = Arc::new(LoopbackClient::new());
    for _ in 0..3 {
        client.fail_next_start("offline");
    }
    let mut controller = CallController::new(
        client.clone(),
        Arc::new(MemoryHistory::new()),
        CompanionProps::default(),
        ControllerConfig::default().with_max_retries(1),
    );
    let t0 = Instant::now();

    controller.start();
    controller.poll(t0);
    assert_eq!(client.start_calls(), 2);

    controller.poll(t0);
    assert_eq!(controller.alert().map(|a| a.level), Some(AlertLevel::Terminal));
    controller.poll(t0 + ms(10_000));
    assert_eq!(client.start_calls(), 2);
}
