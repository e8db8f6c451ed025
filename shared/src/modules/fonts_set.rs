use embedded_graphics::pixelcolor::PixelColor;
use u8g2_fonts::{fonts, U8g2TextStyle};

use crate::error::Error;

/// Fonts bundled with the watch face, addressed by name from the config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceFont {
    Spleen12x24,
    Spleen16x32,
    Spleen32x64,
}

impl FaceFont {
    pub const NAMES: [&'static str; 3] = ["spleen12x24", "spleen16x32", "spleen32x64"];

    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "spleen12x24" => Ok(FaceFont::Spleen12x24),
            "spleen16x32" => Ok(FaceFont::Spleen16x32),
            "spleen32x64" => Ok(FaceFont::Spleen32x64),
            _ => Err(Error(format!(
                "font asset missing: {} (available: {})",
                name,
                Self::NAMES.join(", ")
            ))),
        }
    }

    pub fn text_style<C: PixelColor>(&self, color: C) -> U8g2TextStyle<C> {
        match self {
            FaceFont::Spleen12x24 => U8g2TextStyle::new(fonts::u8g2_font_spleen12x24_mf, color),
            FaceFont::Spleen16x32 => U8g2TextStyle::new(fonts::u8g2_font_spleen16x32_mn, color),
            FaceFont::Spleen32x64 => U8g2TextStyle::new(fonts::u8g2_font_spleen32x64_mn, color),
        }
    }
}
