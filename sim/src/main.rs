use std::path::PathBuf;
use std::sync::Arc;

use display::SimDisplay;
use host::Host;
use log::{info, warn};
use mywatch_shared::assets::WatchFaceAssets;
use mywatch_shared::clock::{SystemClock, WallClock};
use mywatch_shared::config::WatchFaceConfig;
use mywatch_shared::domain::TimeZoneState;
use mywatch_shared::error::Error;
use mywatch_shared::message_bus::MessageBus;
use mywatch_shared::modules::logging_module::LoggingModule;
use mywatch_shared::modules::renderer::{FaceStyle, Renderer};
use mywatch_shared::modules::watch_face::WatchFace;
use time::UtcOffset;
use tokio::join;
use tokio::sync::watch;

mod display;
mod host;

extern crate mywatch_shared;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = WatchFaceConfig::load(config_path.as_deref())?;

    let background_path = &config.assets.background;
    let background = std::fs::read(background_path)
        .map_err(|err| Error(format!("{}: {}", background_path.display(), err)))?;

    let assets = WatchFaceAssets::load(&config.assets, &background)?;
    let style = FaceStyle::from_config(&config)?;

    // the local offset can only be read soundly before other threads exist
    let timezone = match UtcOffset::current_local_offset() {
        Ok(offset) => TimeZoneState::from_offset(offset),
        Err(err) => {
            warn!("local offset unavailable, using UTC: {}", err);
            TimeZoneState::utc()
        }
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .worker_threads(2)
        .build()?;

    rt.block_on(main_async(config, assets, style, timezone));

    Ok(())
}

async fn main_async(
    config: WatchFaceConfig,
    assets: WatchFaceAssets,
    style: FaceStyle,
    timezone: TimeZoneState,
) {
    info!("main_async...");

    let message_bus = MessageBus::new();

    let clock: Arc<dyn WallClock> = Arc::new(SystemClock);
    let (timezone_sender, timezone_source) = watch::channel(timezone);

    let mb = message_bus.clone();
    let watch_face_task = WatchFace::start(mb, clock.clone(), timezone_source, config.update_rate());

    let mb = message_bus.clone();
    let renderer_task = Renderer::<SimDisplay>::start(mb, assets, style, clock);

    let mb = message_bus.clone();
    let host_task = Host::start(mb, timezone_sender, config.host.low_bit_ambient);

    let logging_task = LoggingModule::start(message_bus);

    join!(logging_task, watch_face_task, renderer_task, host_task);

    info!("done.");
}
