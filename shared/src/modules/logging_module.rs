use log::{debug, info};

use crate::commands::Commands;
use crate::events::Events;
use crate::message_bus::{BusHandler, BusSender, MessageBus};

pub struct LoggingModule {}

pub struct Context {
    frames: u64,
}

impl BusHandler<Context> for LoggingModule {
    async fn event_handler(_bus: &BusSender, context: &mut Context, event: Events) {
        match event {
            Events::Drawn(summary) => {
                context.frames += 1;

                match summary.date_text {
                    Some(date) => info!(
                        "frame {} {:?} {} {}",
                        context.frames, summary.mode, date, summary.time_text
                    ),
                    None => info!(
                        "frame {} {:?} {}",
                        context.frames, summary.mode, summary.time_text
                    ),
                }
            }
            Events::UpdateTimeTick(_) => {
                debug!("{:?}", event);
            }
            _ => {
                info!("{} {:?}", event.as_ref(), event);
            }
        }
    }

    async fn command_handler(_bus: &BusSender, _context: &mut Context, command: Commands) {
        debug!("{:?}", command);
    }
}

impl LoggingModule {
    pub async fn start(bus: MessageBus) {
        let context = Context { frames: 0 };

        let context = MessageBus::handle::<Context, Self>(bus, context).await;

        info!("done, {} frames drawn", context.frames);
    }
}
