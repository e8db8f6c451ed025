use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;

use crate::clock::WallClock;
use crate::commands::Commands;
use crate::domain::{DrawRequest, RenderState, TimeZoneState, WatchProperties};
use crate::events::Events;
use crate::message_bus::{BusHandler, BusSender, MessageBus};

use super::timezone_receiver::TimezoneReceiver;
use super::update_timer::{next_tick_delay, UpdateTimer};

pub struct WatchFace {}

/// State machine behind the face: two flags, one derived predicate, one timer.
pub struct WatchFaceEngine {
    state: RenderState,
    timezone: TimeZoneState,
    receiver: TimezoneReceiver,
    timer: UpdateTimer,
    clock: Arc<dyn WallClock>,
    update_rate: Duration,
}

impl BusHandler<WatchFaceEngine> for WatchFace {
    async fn event_handler(bus: &BusSender, context: &mut WatchFaceEngine, event: Events) {
        match event {
            Events::PropertiesChanged(properties) => {
                context.on_properties_changed(properties);
            }
            Events::TimeTick => {
                context.on_time_tick(bus);
            }
            Events::AmbientModeChanged(ambient) => {
                context.on_ambient_mode_changed(bus, ambient);
            }
            Events::VisibilityChanged(visible) => {
                context.on_visibility_changed(bus, visible);
            }
            Events::TimezoneChanged(timezone) => {
                context.on_timezone_changed(timezone);
            }
            Events::UpdateTimeTick(generation) => {
                context.on_update_tick(bus, generation);
            }
            _ => {}
        }
    }

    async fn command_handler(_bus: &BusSender, context: &mut WatchFaceEngine, command: Commands) {
        if matches!(command, Commands::Destroy) {
            context.on_destroy();
        }
    }
}

impl WatchFace {
    pub async fn start(
        bus: MessageBus,
        clock: Arc<dyn WallClock>,
        timezone_source: watch::Receiver<TimeZoneState>,
        update_rate: Duration,
    ) {
        info!("starting...");

        let context = WatchFaceEngine::new(clock, timezone_source, update_rate);

        MessageBus::handle::<WatchFaceEngine, Self>(bus, context).await;

        info!("done.");
    }
}

impl WatchFaceEngine {
    pub fn new(
        clock: Arc<dyn WallClock>,
        timezone_source: watch::Receiver<TimeZoneState>,
        update_rate: Duration,
    ) -> Self {
        let timezone = timezone_source.borrow().clone();

        Self {
            state: RenderState::default(),
            timezone,
            receiver: TimezoneReceiver::new(timezone_source),
            timer: UpdateTimer::new(),
            clock,
            update_rate,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn timezone(&self) -> &TimeZoneState {
        &self.timezone
    }

    pub fn is_timer_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn is_receiver_registered(&self) -> bool {
        self.receiver.is_registered()
    }

    pub fn draw_request(&self) -> DrawRequest {
        DrawRequest {
            mode: self.state.mode(),
            anti_alias: self.state.anti_alias(),
            offset: self.timezone.offset,
        }
    }

    pub fn on_properties_changed(&mut self, properties: WatchProperties) {
        self.state.low_bit_ambient = properties.low_bit_ambient;
    }

    pub fn on_time_tick(&mut self, bus: &BusSender) {
        self.invalidate(bus);
    }

    pub fn on_ambient_mode_changed(&mut self, bus: &BusSender, ambient: bool) {
        if self.state.set_ambient(ambient) {
            if self.state.low_bit_ambient {
                info!("ambient mode now, anti-aliasing {}", self.state.anti_alias());
            }

            self.invalidate(bus);
            self.update_timer(bus);
        }
    }

    pub fn on_visibility_changed(&mut self, bus: &BusSender, visible: bool) {
        self.state.visible = visible;

        if visible {
            // picks up a timezone change made while hidden
            if let Some(current) = self.receiver.register(bus) {
                self.timezone = current;
            }
        } else {
            self.receiver.unregister();
        }

        self.update_timer(bus);
    }

    pub fn on_timezone_changed(&mut self, timezone: TimeZoneState) {
        info!("timezone {} -> {}", self.timezone.id, timezone.id);
        self.timezone = timezone;
    }

    pub fn on_update_tick(&mut self, bus: &BusSender, generation: u64) {
        if !self.timer.complete(generation) {
            debug!("stale tick {}", generation);
            return;
        }

        self.invalidate(bus);

        if self.state.should_timer_run() {
            let delay = next_tick_delay(self.clock.epoch_millis(), self.update_rate);
            self.timer.schedule(bus, delay);
        }
    }

    pub fn on_destroy(&mut self) {
        self.timer.cancel();
        self.receiver.unregister();
    }

    fn update_timer(&mut self, bus: &BusSender) {
        self.timer.update(bus, self.state.should_timer_run());
    }

    fn invalidate(&self, bus: &BusSender) {
        bus.send_cmd(Commands::Invalidate(self.draw_request()));
    }
}
