use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;

use crate::events::Events;
use crate::message_bus::BusSender;

/// Delay until the next whole multiple of `period`, always in `(0, period]`.
pub fn next_tick_delay(epoch_millis: i128, period: Duration) -> Duration {
    let period_ms = period.as_millis().max(1) as i128;
    let remainder = epoch_millis.rem_euclid(period_ms);

    Duration::from_millis((period_ms - remainder) as u64)
}

/// Single pending tick. Scheduling always cancels whatever was armed before.
pub struct UpdateTimer {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Default for UpdateTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateTimer {
    pub fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Ticks carrying an older generation were cancelled and must be ignored.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Marks the armed tick as delivered. Returns `false` for a stale generation.
    pub fn complete(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.pending = None;
        true
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);

        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn update(&mut self, bus: &BusSender, should_run: bool) {
        self.cancel();

        if should_run {
            self.schedule(bus, Duration::ZERO);
        }
    }

    pub fn schedule(&mut self, bus: &BusSender, delay: Duration) {
        self.cancel();

        let generation = self.generation;
        let bus = bus.clone();

        debug!("next tick in {} ms", delay.as_millis());

        self.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            bus.send_event(Events::UpdateTimeTick(generation));
        }));
    }
}

impl Drop for UpdateTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
