use std::path::{Path, PathBuf};
use std::time::Duration;

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchFaceConfig {
    #[serde(default = "default_update_rate_ms")]
    pub update_rate_ms: u64,

    #[serde(default)]
    pub layout: FaceLayout,

    #[serde(default)]
    pub palette: Palette,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub host: HostConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Fixed text anchors, measured from the top-left corner to the text baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceLayout {
    #[serde(default = "default_time_position")]
    pub time: Position,
    #[serde(default = "default_date_position")]
    pub date: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_foreground")]
    pub time: String,
    #[serde(default = "default_foreground")]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_background_asset")]
    pub background: PathBuf,
    #[serde(default = "default_time_font")]
    pub time_font: String,
    #[serde(default = "default_date_font")]
    pub date_font: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub low_bit_ambient: bool,
}

impl Default for WatchFaceConfig {
    fn default() -> Self {
        Self {
            update_rate_ms: default_update_rate_ms(),
            layout: FaceLayout::default(),
            palette: Palette::default(),
            assets: AssetsConfig::default(),
            host: HostConfig::default(),
        }
    }
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self {
            time: default_time_position(),
            date: default_date_position(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: default_background(),
            time: default_foreground(),
            date: default_foreground(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            background: default_background_asset(),
            time_font: default_time_font(),
            date_font: default_date_font(),
        }
    }
}

fn default_update_rate_ms() -> u64 {
    1000
}

fn default_time_position() -> Position {
    Position { x: 100, y: 80 }
}

fn default_date_position() -> Position {
    Position { x: 150, y: 30 }
}

fn default_background() -> String {
    "#000000".to_string()
}

fn default_foreground() -> String {
    "#ffffff".to_string()
}

fn default_background_asset() -> PathBuf {
    PathBuf::from("assets/background.tga")
}

fn default_time_font() -> String {
    "spleen16x32".to_string()
}

fn default_date_font() -> String {
    "spleen12x24".to_string()
}

impl WatchFaceConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        let config: WatchFaceConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path first, then `<config dir>/mywatch/config.toml`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let config_path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => dirs::config_dir().map(|dir| dir.join("mywatch").join("config.toml")),
        };

        match config_path {
            Some(config_path) if path.is_some() || config_path.exists() => {
                info!("loading config from {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                Self::from_toml_str(&contents)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.update_rate_ms == 0 {
            return Err(Error::from("update_rate_ms must be positive"));
        }

        parse_color(&self.palette.background)?;
        parse_color(&self.palette.time)?;
        parse_color(&self.palette.date)?;

        Ok(())
    }

    pub fn update_rate(&self) -> Duration {
        Duration::from_millis(self.update_rate_ms)
    }
}

/// Parses `#RRGGBB`.
pub fn parse_color(value: &str) -> Result<Rgb565, Error> {
    let hex = value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| Error(format!("invalid color: {}", value)))?;

    let rgb = u32::from_str_radix(hex, 16).map_err(|_| Error(format!("invalid color: {}", value)))?;

    let color = Rgb888::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);

    Ok(Rgb565::from(color))
}
