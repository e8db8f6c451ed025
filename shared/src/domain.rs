use time::{OffsetDateTime, UtcOffset};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceMode {
    Interactive,
    Ambient,
}

/// Lifecycle state of the watch face. Only host callbacks mutate it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderState {
    pub visible: bool,
    pub ambient: bool,
    pub low_bit_ambient: bool,
}

impl RenderState {
    /// The update timer runs only while visible and interactive.
    pub fn should_timer_run(&self) -> bool {
        self.visible && !self.ambient
    }

    /// Returns `true` when the stored value actually changed.
    pub fn set_ambient(&mut self, ambient: bool) -> bool {
        if self.ambient == ambient {
            return false;
        }

        self.ambient = ambient;
        true
    }

    pub fn anti_alias(&self) -> bool {
        !(self.ambient && self.low_bit_ambient)
    }

    pub fn mode(&self) -> FaceMode {
        if self.ambient {
            FaceMode::Ambient
        } else {
            FaceMode::Interactive
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatchProperties {
    pub low_bit_ambient: bool,
}

/// Wall-clock fields read at draw time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockSample {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockSample {
    pub fn at(now: OffsetDateTime, offset: UtcOffset) -> Self {
        let local = now.to_offset(offset);

        Self {
            year: local.year(),
            month: u8::from(local.month()),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
        }
    }

    pub fn time_text(&self) -> String {
        format!("{}:{}:{}", self.hour, self.minute, self.second)
    }

    pub fn ambient_time_text(&self) -> String {
        format!("{}:{}", self.hour, self.minute)
    }

    pub fn date_text(&self) -> String {
        format!("{}/{}/{}", self.year, self.month, self.day)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeZoneState {
    pub id: String,
    pub offset: UtcOffset,
}

impl TimeZoneState {
    pub fn utc() -> Self {
        Self {
            id: "UTC".to_string(),
            offset: UtcOffset::UTC,
        }
    }

    pub fn from_offset(offset: UtcOffset) -> Self {
        let (hours, minutes, _) = offset.as_hms();
        let sign = if offset.is_negative() { '-' } else { '+' };

        Self {
            id: format!("UTC{}{:02}:{:02}", sign, hours.abs(), minutes.abs()),
            offset,
        }
    }

    /// Accepts `UTC`, `GMT`, `Z`, `UTC+9`, `GMT-05:30`, `+02:00` and the like.
    pub fn parse(id: &str) -> Result<Self, Error> {
        let trimmed = id.trim();
        let unknown = || Error(format!("unknown timezone id: {}", id));

        let prefixed = ["UTC", "GMT"]
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix));

        let rest = prefixed.unwrap_or(trimmed);

        if (prefixed.is_some() && rest.is_empty()) || (prefixed.is_none() && rest == "Z") {
            return Ok(Self {
                id: trimmed.to_string(),
                offset: UtcOffset::UTC,
            });
        }

        let (negative, digits) = if let Some(digits) = rest.strip_prefix('+') {
            (false, digits)
        } else if let Some(digits) = rest.strip_prefix('-') {
            (true, digits)
        } else {
            return Err(unknown());
        };

        let (hours, minutes) = match digits.split_once(':') {
            Some((hours, minutes)) => (hours, Some(minutes)),
            None => (digits, None),
        };

        // a bare offset needs the full `±HH:MM` form
        let hours_ok = if prefixed.is_some() {
            is_number(hours, 1..=2)
        } else {
            is_number(hours, 2..=2) && minutes.is_some()
        };

        if !hours_ok || !minutes.map_or(true, |minutes| is_number(minutes, 2..=2)) {
            return Err(unknown());
        }

        let hours: i8 = hours.parse().map_err(|_| unknown())?;
        let minutes: i8 = minutes.unwrap_or("0").parse().map_err(|_| unknown())?;

        let offset = if negative {
            UtcOffset::from_hms(-hours, -minutes, 0)?
        } else {
            UtcOffset::from_hms(hours, minutes, 0)?
        };

        Ok(Self {
            id: trimmed.to_string(),
            offset,
        })
    }
}

fn is_number(value: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

/// Snapshot handed to the renderer on every invalidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawRequest {
    pub mode: FaceMode,
    pub anti_alias: bool,
    pub offset: UtcOffset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSummary {
    pub mode: FaceMode,
    pub anti_alias: bool,
    pub time_text: String,
    pub date_text: Option<String>,
}
