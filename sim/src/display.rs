use std::{convert::Infallible, time::Instant};

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::{Rgb565, RgbColor},
    Pixel,
};
use embedded_graphics_framebuf::FrameBuf;
use embedded_graphics_simulator::SimulatorDisplay;
#[cfg(feature = "window")]
use embedded_graphics_simulator::{OutputSettingsBuilder, Window};
use log::{debug, error};
use mywatch_shared::display_interface::WatchDisplayInterface;

const SIDE: usize = 240;
const SIZE: usize = SIDE * SIDE;

pub struct SimDisplay {
    display: SimulatorDisplay<Rgb565>,
    buffer: Box<[Rgb565; SIZE]>,
    #[cfg(feature = "window")]
    window: Window,
}

impl WatchDisplayInterface for SimDisplay {
    type Error = Infallible;

    type ColorModel = Rgb565;

    type FrameBuffer<'b> = FrameBuf<Self::ColorModel, &'b mut [Self::ColorModel; SIZE]>;

    const FRAME_BUFFER_SIDE: usize = SIDE;

    fn create() -> Self {
        let display = SimulatorDisplay::<Rgb565>::new(Size::new(SIDE as u32, SIDE as u32));

        #[cfg(feature = "window")]
        let window = {
            let output_settings = OutputSettingsBuilder::new()
                .scale(2)
                .pixel_spacing(1)
                .max_fps(5)
                .build();

            Window::new("mywatch sim", &output_settings)
        };

        SimDisplay {
            display,
            buffer: Box::new([Rgb565::BLACK; SIZE]),
            #[cfg(feature = "window")]
            window,
        }
    }

    fn render<'c, 'd: 'c>(
        &'d mut self,
        func: impl FnOnce(Self::FrameBuffer<'c>) -> Self::FrameBuffer<'c>,
    ) {
        let buf: &'c mut [Self::ColorModel; SIZE] = self.buffer.as_mut();

        let frame = FrameBuf::new(buf, SIDE, SIDE);

        let now = Instant::now();

        func(frame);

        debug!("render timing: frame {}", now.elapsed().as_millis());
    }

    fn commit(&mut self) {
        let pixels = self.buffer.iter().enumerate().map(|(i, color)| {
            Pixel(Point::new((i % SIDE) as i32, (i / SIDE) as i32), *color)
        });

        if let Err(err) = self.display.draw_iter(pixels) {
            error!("{:?}", err);
        }

        #[cfg(feature = "window")]
        self.window.update(&self.display);
    }
}
