use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::{raw::RawU16, IntoStorage, Rgb565, RgbColor},
    primitives::Rectangle,
};
use std::fmt::Debug;

pub trait WatchDisplayInterface {
    type Error: Debug;
    type ColorModel: RgbColor + From<RawU16>;
    type FrameBuffer<'b>: DrawTarget<Error = Self::Error, Color = Self::ColorModel>;

    const FRAME_BUFFER_SIDE: usize;

    fn create() -> Self;

    fn render<'b, 'a: 'b>(
        &'a mut self,
        func: impl FnOnce(Self::FrameBuffer<'b>) -> Self::FrameBuffer<'b>,
    );

    fn commit(&mut self);

    fn bounds() -> Rectangle {
        let side = Self::FRAME_BUFFER_SIDE as u32;
        Rectangle::new(Point::zero(), Size::new(side, side))
    }

    fn color(color: Rgb565) -> Self::ColorModel {
        Self::ColorModel::from(RawU16::new(color.into_storage()))
    }
}
