use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use std::marker::PhantomData;

use crate::assets::Bitmap;
use crate::display_interface::WatchDisplayInterface;

pub struct Graphics<TDisplay> {
    _inner: PhantomData<TDisplay>,
}

impl<TDisplay> Graphics<TDisplay>
where
    TDisplay: WatchDisplayInterface,
{
    pub fn rect(
        frame: &mut TDisplay::FrameBuffer<'_>,
        area: Rectangle,
        color: TDisplay::ColorModel,
    ) -> Result<(), TDisplay::Error> {
        area.into_styled(PrimitiveStyle::with_fill(color))
            .draw(frame)
    }

    /// Nearest-neighbour scale of `bitmap` onto `destination`.
    pub fn bitmap_scaled(
        frame: &mut TDisplay::FrameBuffer<'_>,
        bitmap: &Bitmap,
        destination: Rectangle,
    ) -> Result<(), TDisplay::Error> {
        let source = bitmap.size();
        let target = destination.size;

        if target.width == 0 || target.height == 0 {
            return Ok(());
        }

        let pixels = destination.points().map(|point| {
            let relative = point - destination.top_left;
            let src_x = relative.x as u32 * source.width / target.width;
            let src_y = relative.y as u32 * source.height / target.height;

            Pixel(point, TDisplay::color(bitmap.pixel(src_x, src_y)))
        });

        frame.draw_iter(pixels)
    }

    /// Draws text with its baseline at `coord`, clipped to its own bounding box.
    pub fn text(
        frame: &mut TDisplay::FrameBuffer<'_>,
        text: &str,
        coord: Point,
        style: impl TextRenderer<Color = TDisplay::ColorModel>,
    ) -> Result<Rectangle, TDisplay::Error> {
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Left)
            .baseline(Baseline::Alphabetic)
            .build();

        let text = Text::with_text_style(text, coord, style, text_style);
        let bounding_box = text.bounding_box();

        let mut clipped = frame.clipped(&bounding_box);

        text.draw(&mut clipped)?;

        Ok(bounding_box)
    }
}

/// Snaps a color to black or white for displays with few bits in ambient mode.
pub fn quantize(color: Rgb565) -> Rgb565 {
    let luma = color.r() as u32 * 299 / Rgb565::MAX_R as u32
        + color.g() as u32 * 587 / Rgb565::MAX_G as u32
        + color.b() as u32 * 114 / Rgb565::MAX_B as u32;

    if luma >= 500 {
        Rgb565::WHITE
    } else {
        Rgb565::BLACK
    }
}
