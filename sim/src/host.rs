use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use mywatch_shared::clock::{SystemClock, WallClock};
use mywatch_shared::commands::Commands;
use mywatch_shared::domain::{TimeZoneState, WatchProperties};
use mywatch_shared::events::Events;
use mywatch_shared::message_bus::MessageBus;
use mywatch_shared::modules::update_timer::next_tick_delay;
use tokio::select;
use tokio::sync::watch;
use tokio::time::sleep;

const AMBIENT_TICK: Duration = Duration::from_secs(60);

/// Plays the wearable OS: lifecycle callbacks from stdin, minute ticks in ambient mode.
pub struct Host {}

struct HostState {
    visible: bool,
    low_bit_ambient: bool,
    ambient: Arc<AtomicBool>,
}

impl Host {
    pub async fn start(
        bus: MessageBus,
        timezone: watch::Sender<TimeZoneState>,
        low_bit_ambient: bool,
    ) {
        info!("starting...");

        let ambient = Arc::new(AtomicBool::new(false));

        let ticker_task = tokio::spawn(Self::ambient_ticker(bus.clone(), ambient.clone()));

        bus.send_event(Events::PropertiesChanged(WatchProperties { low_bit_ambient }));
        bus.send_event(Events::VisibilityChanged(true));

        let state = HostState {
            visible: true,
            low_bit_ambient,
            ambient,
        };

        let input_task = tokio::task::spawn_blocking(move || {
            Self::read_input(bus, timezone, state);
        });

        if let Err(err) = input_task.await {
            error!("{:?}", err);
        }

        if let Err(err) = ticker_task.await {
            error!("{:?}", err);
        }

        info!("done.");
    }

    async fn ambient_ticker(bus: MessageBus, ambient: Arc<AtomicBool>) {
        let mut commands = bus.subscribe_commands();
        let clock = SystemClock;

        loop {
            let delay = next_tick_delay(clock.epoch_millis(), AMBIENT_TICK);

            select! {
                _ = sleep(delay) => {
                    if ambient.load(Ordering::Relaxed) {
                        bus.send_event(Events::TimeTick);
                    }
                }
                Ok(command) = commands.recv() => {
                    if matches!(command, Commands::Destroy) {
                        break;
                    }
                }
            }
        }
    }

    fn read_input(bus: MessageBus, timezone: watch::Sender<TimeZoneState>, mut state: HostState) {
        info!("commands: a (ambient), v (visibility), l (low-bit), tz <id>, q (quit)");

        let mut input = String::new();

        loop {
            input.clear();

            match std::io::stdin().read_line(&mut input) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    error!("{}", err);
                    break;
                }
            }

            let line = input.trim();

            match line {
                "a" => {
                    let ambient = !state.ambient.load(Ordering::Relaxed);
                    state.ambient.store(ambient, Ordering::Relaxed);
                    bus.send_event(Events::AmbientModeChanged(ambient));
                }
                "v" => {
                    state.visible = !state.visible;
                    bus.send_event(Events::VisibilityChanged(state.visible));
                }
                "l" => {
                    state.low_bit_ambient = !state.low_bit_ambient;
                    bus.send_event(Events::PropertiesChanged(WatchProperties {
                        low_bit_ambient: state.low_bit_ambient,
                    }));
                }
                "q" => break,
                _ => match line.strip_prefix("tz ") {
                    Some(id) => match TimeZoneState::parse(id) {
                        Ok(zone) => {
                            timezone.send_replace(zone);
                        }
                        Err(err) => error!("{}", err),
                    },
                    None => info!("unknown command {:?}", line),
                },
            }
        }

        bus.send_cmd(Commands::Destroy);
    }
}
