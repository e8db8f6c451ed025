use time::OffsetDateTime;

/// Source of the current instant. Draws and the update timer read it fresh every time.
pub trait WallClock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    fn epoch_millis(&self) -> i128 {
        self.now().unix_timestamp_nanos() / 1_000_000
    }
}

pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
