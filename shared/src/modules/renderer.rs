use std::marker::PhantomData;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{error, info};

use crate::assets::WatchFaceAssets;
use crate::clock::WallClock;
use crate::commands::Commands;
use crate::config::{parse_color, FaceLayout, WatchFaceConfig};
use crate::display_interface::WatchDisplayInterface;
use crate::domain::{ClockSample, DrawRequest, FaceMode, FrameSummary};
use crate::error::Error;
use crate::events::Events;
use crate::message_bus::{BusHandler, BusSender, MessageBus};

use super::graphics::{quantize, Graphics};

pub struct Renderer<TDisplay> {
    _inner: PhantomData<TDisplay>,
}

/// Resolved colors and anchors.
#[derive(Clone, Debug)]
pub struct FaceStyle {
    pub layout: FaceLayout,
    pub background: Rgb565,
    pub time_color: Rgb565,
    pub date_color: Rgb565,
}

impl FaceStyle {
    pub fn from_config(config: &WatchFaceConfig) -> Result<Self, Error> {
        Ok(Self {
            layout: config.layout.clone(),
            background: parse_color(&config.palette.background)?,
            time_color: parse_color(&config.palette.time)?,
            date_color: parse_color(&config.palette.date)?,
        })
    }

    fn text_color(&self, color: Rgb565, anti_alias: bool) -> Rgb565 {
        if anti_alias {
            color
        } else {
            quantize(color)
        }
    }
}

enum RenderRequest {
    Draw(DrawRequest),
    Term,
}

pub struct Context {
    tx: Sender<RenderRequest>,
}

impl<TDisplay> BusHandler<Context> for Renderer<TDisplay>
where
    TDisplay: WatchDisplayInterface,
{
    async fn event_handler(_bus: &BusSender, _context: &mut Context, _event: Events) {}

    async fn command_handler(_bus: &BusSender, context: &mut Context, command: Commands) {
        let request = match command {
            Commands::Invalidate(request) => RenderRequest::Draw(request),
            Commands::Destroy => RenderRequest::Term,
        };

        if context.tx.send(request).is_err() {
            error!("render loop is gone");
        }
    }
}

impl<TDisplay> Renderer<TDisplay>
where
    TDisplay: WatchDisplayInterface + 'static,
{
    pub async fn start(
        bus: MessageBus,
        assets: WatchFaceAssets,
        style: FaceStyle,
        clock: Arc<dyn WallClock>,
    ) {
        info!("starting...");

        let (tx, rx) = channel::<RenderRequest>();

        let message_bus = bus.clone();
        let render_loop_task = tokio::task::spawn_blocking(move || {
            Self::render_loop(message_bus, rx, assets, style, clock);
        });

        MessageBus::handle::<Context, Self>(bus, Context { tx }).await;

        if let Err(err) = render_loop_task.await {
            error!("{:?}", err);
        }

        info!("done.");
    }

    fn render_loop(
        bus: MessageBus,
        rx: Receiver<RenderRequest>,
        assets: WatchFaceAssets,
        style: FaceStyle,
        clock: Arc<dyn WallClock>,
    ) {
        let mut display = TDisplay::create();

        while let Ok(RenderRequest::Draw(request)) = rx.recv() {
            let sample = ClockSample::at(clock.now(), request.offset);

            let mut outcome = None;

            display.render(|mut frame| {
                outcome = Some(Self::paint(&mut frame, &assets, &style, &request, &sample));
                frame
            });

            display.commit();

            match outcome {
                Some(Ok(summary)) => bus.send_event(Events::Drawn(summary)),
                Some(Err(err)) => error!("draw failed {:?}", err),
                None => error!("frame was not rendered"),
            }
        }

        info!("render loop done.");
    }

    /// Paints one full frame for `request` at `sample`.
    pub fn paint(
        frame: &mut TDisplay::FrameBuffer<'_>,
        assets: &WatchFaceAssets,
        style: &FaceStyle,
        request: &DrawRequest,
        sample: &ClockSample,
    ) -> Result<FrameSummary, TDisplay::Error> {
        let bounds = TDisplay::bounds();
        let time_position = Point::new(style.layout.time.x, style.layout.time.y);

        let time_color = TDisplay::color(style.text_color(style.time_color, request.anti_alias));

        match request.mode {
            FaceMode::Interactive => {
                Graphics::<TDisplay>::bitmap_scaled(frame, &assets.background, bounds)?;

                let date_text = sample.date_text();
                let date_position = Point::new(style.layout.date.x, style.layout.date.y);
                let date_color =
                    TDisplay::color(style.text_color(style.date_color, request.anti_alias));

                Graphics::<TDisplay>::text(
                    frame,
                    &date_text,
                    date_position,
                    assets.date_font.text_style(date_color),
                )?;

                let time_text = sample.time_text();

                Graphics::<TDisplay>::text(
                    frame,
                    &time_text,
                    time_position,
                    assets.time_font.text_style(time_color),
                )?;

                Ok(FrameSummary {
                    mode: FaceMode::Interactive,
                    anti_alias: request.anti_alias,
                    time_text,
                    date_text: Some(date_text),
                })
            }
            FaceMode::Ambient => {
                Self::clear(frame, bounds, style)?;

                let time_text = sample.ambient_time_text();

                Graphics::<TDisplay>::text(
                    frame,
                    &time_text,
                    time_position,
                    assets.time_font.text_style(time_color),
                )?;

                Ok(FrameSummary {
                    mode: FaceMode::Ambient,
                    anti_alias: request.anti_alias,
                    time_text,
                    date_text: None,
                })
            }
        }
    }

    fn clear(
        frame: &mut TDisplay::FrameBuffer<'_>,
        bounds: Rectangle,
        style: &FaceStyle,
    ) -> Result<(), TDisplay::Error> {
        Graphics::<TDisplay>::rect(frame, bounds, TDisplay::color(style.background))
    }
}
