use embedded_graphics::{
    geometry::{OriginDimensions, Size},
    pixelcolor::Rgb565,
};
use log::info;
use tinytga::Tga;

use crate::config::AssetsConfig;
use crate::error::Error;
use crate::modules::fonts_set::FaceFont;

/// Decoded image kept in memory for scaled blits.
#[derive(Clone, Debug)]
pub struct Bitmap {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl Bitmap {
    pub fn from_tga(data: &[u8]) -> Result<Self, Error> {
        let tga: Tga<Rgb565> = Tga::from_slice(data)?;

        let size = tga.size();

        if size.width == 0 || size.height == 0 {
            return Err(Error::from("image has no pixels"));
        }

        let mut pixels = vec![Rgb565::new(0, 0, 0); (size.width * size.height) as usize];

        for pixel in tga.pixels() {
            let (x, y) = (pixel.0.x, pixel.0.y);

            if x < 0 || y < 0 || x as u32 >= size.width || y as u32 >= size.height {
                continue;
            }

            pixels[y as usize * size.width as usize + x as usize] = pixel.1;
        }

        Ok(Self { size, pixels })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb565 {
        self.pixels[(y * self.size.width + x) as usize]
    }
}

/// Everything the face loads once at creation.
#[derive(Clone, Debug)]
pub struct WatchFaceAssets {
    pub background: Bitmap,
    pub time_font: FaceFont,
    pub date_font: FaceFont,
}

impl WatchFaceAssets {
    /// Fails when the background cannot be decoded or a font is unknown. No fallback exists.
    pub fn load(config: &AssetsConfig, background: &[u8]) -> Result<Self, Error> {
        let time_font = FaceFont::from_name(&config.time_font)?;
        let date_font = FaceFont::from_name(&config.date_font)?;

        let background = Bitmap::from_tga(background)
            .map_err(|err| Error(format!("{}: {}", config.background.display(), err)))?;

        info!(
            "assets loaded, background {}x{}",
            background.size().width,
            background.size().height
        );

        Ok(Self {
            background,
            time_font,
            date_font,
        })
    }
}
