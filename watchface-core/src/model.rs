use serde::{Deserialize, Serialize};

use crate::condition::{DisplayMode, IconId, classify};

/// Weather data currently shown on the face.
///
/// Fields are `None` until the phone has sent a value for them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayState {
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub condition_code: Option<i32>,
}

impl DisplayState {
    pub fn apply(&self, update: &WeatherUpdate) -> DisplayState {
        apply_update(self, update)
    }

    pub fn icon(&self, mode: DisplayMode) -> Option<IconId> {
        self.condition_code.and_then(|code| classify(code, mode))
    }
}

/// One weather message from the phone. Absent fields leave the
/// corresponding display field untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherUpdate {
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub condition_code: Option<i32>,
}

impl WeatherUpdate {
    pub fn new(high: f64, low: f64, condition_code: i32) -> Self {
        Self {
            high: Some(high),
            low: Some(low),
            condition_code: Some(condition_code),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_none() && self.low.is_none() && self.condition_code.is_none()
    }
}

/// Next display state after `update`. Temperatures are not range checked.
pub fn apply_update(previous: &DisplayState, update: &WeatherUpdate) -> DisplayState {
    DisplayState {
        high: update.high.or(previous.high),
        low: update.low.or(previous.low),
        condition_code: update.condition_code.or(previous.condition_code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;

    fn state(high: f64, low: f64, code: i32) -> DisplayState {
        DisplayState { high: Some(high), low: Some(low), condition_code: Some(code) }
    }

    #[test]
    fn full_update_replaces_every_field() {
        let prev = state(70.0, 50.0, 800);
        let next = apply_update(&prev, &WeatherUpdate::new(72.0, 48.0, 601));
        assert_eq!(next, state(72.0, 48.0, 601));
    }

    #[test]
    fn apply_is_idempotent() {
        let prev = state(70.0, 50.0, 800);
        let update = WeatherUpdate::new(72.0, 48.0, 601);

        let once = prev.apply(&update);
        let twice = once.apply(&update);
        assert_eq!(once, twice);
    }

    #[test]
    fn partial_update_keeps_missing_fields() {
        let prev = state(70.0, 50.0, 800);
        let update = WeatherUpdate { high: Some(75.0), ..Default::default() };

        let next = prev.apply(&update);
        assert_eq!(next, state(75.0, 50.0, 800));

        assert_eq!(prev.apply(&WeatherUpdate::default()), prev);
        assert!(WeatherUpdate::default().is_empty());
    }

    #[test]
    fn absurd_temperatures_are_accepted() {
        let next = DisplayState::default().apply(&WeatherUpdate::new(-400.0, 9000.5, 42));
        assert_eq!(next, state(-400.0, 9000.5, 42));
    }

    #[test]
    fn icon_follows_condition_code() {
        assert_eq!(DisplayState::default().icon(DisplayMode::Interactive), None);

        let snowy = state(1.0, -4.0, 601);
        assert_eq!(
            snowy.icon(DisplayMode::Ambient),
            Some(Condition::Snow.icon(DisplayMode::Ambient))
        );
        assert_eq!(state(1.0, -4.0, 999).icon(DisplayMode::Ambient), None);
    }
}
