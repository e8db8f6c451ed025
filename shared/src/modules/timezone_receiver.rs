use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::TimeZoneState;
use crate::events::Events;
use crate::message_bus::BusSender;

/// Listener for system timezone changes. Registration and unregistration are idempotent.
pub struct TimezoneReceiver {
    source: watch::Receiver<TimeZoneState>,
    forwarder: Option<JoinHandle<()>>,
}

impl TimezoneReceiver {
    pub fn new(source: watch::Receiver<TimeZoneState>) -> Self {
        Self {
            source,
            forwarder: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.forwarder.is_some()
    }

    /// Returns the current system timezone when this call registered the receiver,
    /// `None` when it was already registered.
    pub fn register(&mut self, bus: &BusSender) -> Option<TimeZoneState> {
        if self.forwarder.is_some() {
            return None;
        }

        let mut receiver = self.source.clone();
        let current = receiver.borrow_and_update().clone();
        let bus = bus.clone();

        info!("timezone receiver registered, current {}", current.id);

        self.forwarder = Some(tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let timezone = receiver.borrow_and_update().clone();
                bus.send_event(Events::TimezoneChanged(timezone));
            }

            warn!("timezone source closed");
        }));

        Some(current)
    }

    pub fn unregister(&mut self) -> bool {
        match self.forwarder.take() {
            Some(forwarder) => {
                forwarder.abort();
                info!("timezone receiver unregistered");
                true
            }
            None => false,
        }
    }
}

impl Drop for TimezoneReceiver {
    fn drop(&mut self) {
        self.unregister();
    }
}
