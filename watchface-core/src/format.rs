//! Text shown on the face, derived from state and the clock.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::model::DisplayState;

/// Shown in place of a temperature the phone has not sent yet.
pub const TEMP_NONE: &str = "--";

pub fn temperature(value: Option<f64>) -> String {
    match value {
        Some(t) => format!("{}°", t.round() as i64),
        None => TEMP_NONE.to_string(),
    }
}

/// High and low separated by a space, e.g. `25° 16°`.
pub fn temperature_line(state: &DisplayState) -> String {
    format!("{} {}", temperature(state.high), temperature(state.low))
}

/// `H:MM`, or `H:MM:SS` when seconds are shown.
pub fn time_text(time: NaiveTime, show_seconds: bool) -> String {
    if show_seconds {
        format!("{}:{:02}:{:02}", time.hour(), time.minute(), time.second())
    } else {
        format!("{}:{:02}", time.hour(), time.minute())
    }
}

/// Abbreviated weekday, month and day of month, e.g. `Mon Oct 19`.
pub fn date_text(date: NaiveDate) -> String {
    date.format("%a %b %d").to_string()
}
