use std::{sync::Arc, time::Duration};

use mywatch_shared::{
    commands::Commands,
    domain::{DrawRequest, FaceMode, TimeZoneState, WatchProperties},
    events::Events,
    message_bus::MessageBus,
    modules::watch_face::WatchFaceEngine,
};
use time::macros::{datetime, offset};
use tokio::{
    sync::{broadcast::Receiver, watch},
    time::sleep,
};

use crate::fixtures::FixedClock;

fn engine() -> (WatchFaceEngine, watch::Sender<TimeZoneState>) {
    let clock = Arc::new(FixedClock(datetime!(2015-11-11 9:05:03.123 UTC)));
    let (timezone_tx, timezone_rx) = watch::channel(TimeZoneState::utc());

    let engine = WatchFaceEngine::new(clock, timezone_rx, Duration::from_millis(1000));

    (engine, timezone_tx)
}

fn invalidates(commands: &mut Receiver<Commands>) -> Vec<DrawRequest> {
    let mut requests = vec![];

    while let Ok(command) = commands.try_recv() {
        if let Commands::Invalidate(request) = command {
            requests.push(request);
        }
    }

    requests
}

fn timezone_changes(events: &mut Receiver<Events>) -> Vec<TimeZoneState> {
    let mut changes = vec![];

    while let Ok(event) = events.try_recv() {
        if let Events::TimezoneChanged(timezone) = event {
            changes.push(timezone);
        }
    }

    changes
}

fn ticks(events: &mut Receiver<Events>) -> Vec<u64> {
    let mut generations = vec![];

    while let Ok(event) = events.try_recv() {
        if let Events::UpdateTimeTick(generation) = event {
            generations.push(generation);
        }
    }

    generations
}

async fn settle() {
    sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn should_keep_timer_pending_only_when_visible_and_interactive() {
    for (visible, ambient) in [(false, false), (false, true), (true, false), (true, true)] {
        let message_bus = MessageBus::new();
        let (mut engine, _timezone_tx) = engine();

        engine.on_visibility_changed(message_bus.sender(), visible);
        engine.on_ambient_mode_changed(message_bus.sender(), ambient);

        assert_eq!(
            engine.is_timer_pending(),
            visible && !ambient,
            "visible {} ambient {}",
            visible,
            ambient
        );
        assert_eq!(engine.state().should_timer_run(), visible && !ambient);
    }
}

#[tokio::test]
async fn should_redraw_only_when_ambient_actually_changes() {
    let message_bus = MessageBus::new();
    let mut commands = message_bus.subscribe_commands();
    let (mut engine, _timezone_tx) = engine();

    engine.on_ambient_mode_changed(message_bus.sender(), true);
    assert_eq!(invalidates(&mut commands).len(), 1);

    engine.on_ambient_mode_changed(message_bus.sender(), true);
    assert!(invalidates(&mut commands).is_empty());

    engine.on_ambient_mode_changed(message_bus.sender(), false);
    assert_eq!(invalidates(&mut commands).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn should_keep_running_timer_when_ambient_repeats() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();
    let mut commands = message_bus.subscribe_commands();
    let (mut engine, _timezone_tx) = engine();

    engine.on_visibility_changed(message_bus.sender(), true);
    sleep(Duration::from_millis(1)).await;

    let first = ticks(&mut events);
    assert_eq!(first.len(), 1);

    engine.on_update_tick(message_bus.sender(), first[0]);
    assert_eq!(invalidates(&mut commands).len(), 1);

    engine.on_ambient_mode_changed(message_bus.sender(), false);

    assert!(engine.is_timer_pending());
    assert!(invalidates(&mut commands).is_empty());

    sleep(Duration::from_millis(100)).await;
    assert!(ticks(&mut events).is_empty());

    sleep(Duration::from_millis(800)).await;

    let next = ticks(&mut events);
    assert_eq!(next.len(), 1);

    engine.on_update_tick(message_bus.sender(), next[0]);
    assert_eq!(invalidates(&mut commands).len(), 1);
}

#[tokio::test]
async fn should_request_aliased_ambient_frame_on_low_bit_display() {
    let message_bus = MessageBus::new();
    let mut commands = message_bus.subscribe_commands();
    let (mut engine, _timezone_tx) = engine();

    engine.on_properties_changed(WatchProperties {
        low_bit_ambient: true,
    });
    engine.on_ambient_mode_changed(message_bus.sender(), true);
    engine.on_time_tick(message_bus.sender());

    let requests = invalidates(&mut commands);

    assert_eq!(requests.len(), 2);
    for request in requests {
        assert_eq!(request.mode, FaceMode::Ambient);
        assert!(!request.anti_alias);
    }

    engine.on_ambient_mode_changed(message_bus.sender(), false);

    let requests = invalidates(&mut commands);
    assert_eq!(requests[0].mode, FaceMode::Interactive);
    assert!(requests[0].anti_alias);
}

#[tokio::test]
async fn should_register_timezone_receiver_once() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();
    let (mut engine, timezone_tx) = engine();

    engine.on_visibility_changed(message_bus.sender(), true);
    engine.on_visibility_changed(message_bus.sender(), true);

    assert!(engine.is_receiver_registered());

    settle().await;
    timezone_tx.send_replace(TimeZoneState::parse("UTC+9").unwrap());
    settle().await;

    let changes = timezone_changes(&mut events);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].offset, offset!(+9));
}

#[tokio::test]
async fn should_stop_listening_while_hidden() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();
    let (mut engine, timezone_tx) = engine();

    engine.on_visibility_changed(message_bus.sender(), true);
    engine.on_visibility_changed(message_bus.sender(), false);
    engine.on_visibility_changed(message_bus.sender(), false);

    assert!(!engine.is_receiver_registered());
    assert!(!engine.is_timer_pending());

    timezone_tx.send_replace(TimeZoneState::parse("UTC-3").unwrap());
    settle().await;

    assert!(timezone_changes(&mut events).is_empty());
}

#[tokio::test]
async fn should_pick_up_timezone_changed_while_hidden() {
    let message_bus = MessageBus::new();
    let mut commands = message_bus.subscribe_commands();
    let (mut engine, timezone_tx) = engine();

    engine.on_visibility_changed(message_bus.sender(), true);
    engine.on_visibility_changed(message_bus.sender(), false);

    timezone_tx.send_replace(TimeZoneState::parse("UTC+9").unwrap());

    engine.on_visibility_changed(message_bus.sender(), true);

    assert!(engine.is_receiver_registered());
    assert_eq!(engine.timezone().offset, offset!(+9));

    settle().await;

    engine.on_time_tick(message_bus.sender());

    let requests = invalidates(&mut commands);
    assert_eq!(requests.last().map(|request| request.offset), Some(offset!(+9)));
}

#[tokio::test]
async fn should_forward_once_after_visibility_cycle() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();
    let (mut engine, timezone_tx) = engine();

    engine.on_visibility_changed(message_bus.sender(), true);
    engine.on_visibility_changed(message_bus.sender(), false);
    engine.on_visibility_changed(message_bus.sender(), true);

    settle().await;
    timezone_tx.send_replace(TimeZoneState::parse("GMT-05:30").unwrap());
    settle().await;

    assert_eq!(timezone_changes(&mut events).len(), 1);
}

#[tokio::test]
async fn should_apply_forwarded_timezone() {
    let (mut engine, _timezone_tx) = engine();

    engine.on_timezone_changed(TimeZoneState::parse("UTC+2").unwrap());

    assert_eq!(engine.timezone().offset, offset!(+2));
    assert_eq!(engine.draw_request().offset, offset!(+2));
}

#[tokio::test]
async fn should_ignore_tick_from_cancelled_timer() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();
    let mut commands = message_bus.subscribe_commands();
    let (mut engine, _timezone_tx) = engine();

    engine.on_visibility_changed(message_bus.sender(), true);
    settle().await;

    let generations = ticks(&mut events);
    assert_eq!(generations.len(), 1);

    engine.on_ambient_mode_changed(message_bus.sender(), true);
    invalidates(&mut commands);

    engine.on_update_tick(message_bus.sender(), generations[0]);

    assert!(invalidates(&mut commands).is_empty());
    assert!(!engine.is_timer_pending());
}

#[tokio::test(start_paused = true)]
async fn should_redraw_and_rearm_on_current_tick() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();
    let mut commands = message_bus.subscribe_commands();
    let (mut engine, _timezone_tx) = engine();

    engine.on_visibility_changed(message_bus.sender(), true);
    sleep(Duration::from_millis(1)).await;

    let first = ticks(&mut events);
    assert_eq!(first.len(), 1);

    engine.on_update_tick(message_bus.sender(), first[0]);

    let requests = invalidates(&mut commands);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].mode, FaceMode::Interactive);
    assert!(engine.is_timer_pending());

    sleep(Duration::from_millis(800)).await;
    assert!(ticks(&mut events).is_empty());

    sleep(Duration::from_millis(100)).await;
    assert_eq!(ticks(&mut events).len(), 1);
}

#[tokio::test]
async fn should_release_timer_and_receiver_on_destroy() {
    let message_bus = MessageBus::new();
    let (mut engine, _timezone_tx) = engine();

    engine.on_visibility_changed(message_bus.sender(), true);

    assert!(engine.is_timer_pending());
    assert!(engine.is_receiver_registered());

    engine.on_destroy();

    assert!(!engine.is_timer_pending());
    assert!(!engine.is_receiver_registered());
}
