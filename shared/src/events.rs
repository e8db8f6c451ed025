use crate::domain::{FrameSummary, TimeZoneState, WatchProperties};
use strum_macros::AsRefStr;

#[derive(Clone, Debug, AsRefStr)]
pub enum Events {
    PropertiesChanged(WatchProperties),
    TimeTick,
    AmbientModeChanged(bool),
    VisibilityChanged(bool),
    TimezoneChanged(TimeZoneState),
    UpdateTimeTick(u64),
    Drawn(FrameSummary),
}
