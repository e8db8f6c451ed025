use std::time::Duration;

use mywatch_shared::{
    events::Events,
    message_bus::MessageBus,
    modules::update_timer::{next_tick_delay, UpdateTimer},
};
use tokio::{sync::broadcast::Receiver, time::sleep};

fn ticks(events: &mut Receiver<Events>) -> Vec<u64> {
    let mut generations = vec![];

    while let Ok(event) = events.try_recv() {
        if let Events::UpdateTimeTick(generation) = event {
            generations.push(generation);
        }
    }

    generations
}

#[test]
fn should_align_delay_to_next_period_boundary() {
    let second = Duration::from_millis(1000);

    assert_eq!(next_tick_delay(1_447_232_703_123, second), Duration::from_millis(877));
    assert_eq!(next_tick_delay(1_447_232_703_999, second), Duration::from_millis(1));
    assert_eq!(next_tick_delay(1_447_232_703_000, second), second);
}

#[test]
fn should_keep_delay_within_one_period() {
    let period = Duration::from_millis(250);

    for epoch_millis in [-1_001, -1, 0, 1, 249, 250, 251, 1_447_232_703_123] {
        let delay = next_tick_delay(epoch_millis, period);

        assert!(delay > Duration::ZERO, "{}", epoch_millis);
        assert!(delay <= period, "{}", epoch_millis);
        assert_eq!((epoch_millis + delay.as_millis() as i128).rem_euclid(250), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn should_send_tick_after_delay() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();

    let mut timer = UpdateTimer::new();
    timer.schedule(message_bus.sender(), Duration::from_millis(250));

    assert!(timer.is_pending());

    sleep(Duration::from_millis(100)).await;
    assert!(ticks(&mut events).is_empty());

    sleep(Duration::from_millis(200)).await;

    let generations = ticks(&mut events);
    assert_eq!(generations.len(), 1);
    assert!(timer.is_current(generations[0]));
    assert!(!timer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn should_not_tick_after_cancel() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();

    let mut timer = UpdateTimer::new();
    timer.schedule(message_bus.sender(), Duration::from_millis(250));
    let armed = timer.generation();

    timer.cancel();

    assert!(!timer.is_pending());
    assert!(!timer.is_current(armed));

    sleep(Duration::from_millis(500)).await;
    assert!(ticks(&mut events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn should_keep_only_the_latest_schedule() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();

    let mut timer = UpdateTimer::new();
    timer.schedule(message_bus.sender(), Duration::from_millis(100));
    timer.schedule(message_bus.sender(), Duration::from_millis(200));

    sleep(Duration::from_millis(500)).await;

    let generations = ticks(&mut events);
    assert_eq!(generations, vec![timer.generation()]);
}

#[tokio::test]
async fn should_stop_pending_once_current_tick_is_delivered() {
    let message_bus = MessageBus::new();

    let mut timer = UpdateTimer::new();
    timer.schedule(message_bus.sender(), Duration::ZERO);
    let armed = timer.generation();

    assert!(timer.is_pending());
    assert!(!timer.complete(armed.wrapping_sub(1)));
    assert!(timer.is_pending());

    assert!(timer.complete(armed));
    assert!(!timer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn should_tick_immediately_only_when_running() {
    let message_bus = MessageBus::new();
    let mut events = message_bus.subscribe_events();

    let mut timer = UpdateTimer::new();

    timer.update(message_bus.sender(), false);
    assert!(!timer.is_pending());

    timer.update(message_bus.sender(), true);
    assert!(timer.is_pending());

    sleep(Duration::from_millis(1)).await;

    assert_eq!(ticks(&mut events), vec![timer.generation()]);
}
