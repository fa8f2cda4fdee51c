use chrono::NaiveDateTime;
use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    condition::{DisplayMode, IconId},
    format,
    message::{self, DecodeMode, MessageKeys, UpdateError},
    model::{DisplayState, WeatherUpdate},
};

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub mode: String,
    pub time: String,
    pub date: String,
    pub temperatures: String,
    pub icon: Option<String>,
}

/// Owns the display state of the face and turns it into frames.
#[derive(Debug, Clone)]
pub struct WatchFace {
    state: DisplayState,
    mode: DisplayMode,
    keys: MessageKeys,
    decode_mode: DecodeMode,
    show_seconds: bool,
}

impl Default for WatchFace {
    fn default() -> Self {
        Self::new(MessageKeys::default(), DecodeMode::default())
    }
}

impl WatchFace {
    pub fn new(keys: MessageKeys, decode_mode: DecodeMode) -> Self {
        Self {
            state: DisplayState::default(),
            mode: DisplayMode::Interactive,
            keys,
            decode_mode,
            show_seconds: false,
        }
    }

    pub fn with_seconds(mut self, show_seconds: bool) -> Self {
        self.show_seconds = show_seconds;
        self
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Decode and apply one inbound message. A rejected message leaves the
    /// state as it was; reporting the error is up to the caller.
    pub fn on_message(
        &mut self,
        message: &Map<String, Value>,
    ) -> Result<&DisplayState, UpdateError> {
        let update = message::decode(message, &self.keys, self.decode_mode)
            .inspect_err(|err| debug!("Rejected weather update: {err}"))?;

        if update.is_empty() {
            warn!("Weather message carried none of the configured keys");
        }
        Ok(self.apply(&update))
    }

    pub fn apply(&mut self, update: &WeatherUpdate) -> &DisplayState {
        self.state = self.state.apply(update);
        debug!("Applied weather update {update:?}, now {:?}", self.state);
        &self.state
    }

    /// Returns true when the mode actually changed and the face needs redrawing.
    pub fn on_ambient_mode_changed(&mut self, ambient: bool) -> bool {
        let mode = DisplayMode::from_ambient(ambient);
        if mode == self.mode {
            return false;
        }

        debug!("Display mode {} -> {}", self.mode, mode);
        self.mode = mode;
        true
    }

    pub fn icon(&self) -> Option<IconId> {
        self.state.icon(self.mode)
    }

    pub fn frame(&self, now: NaiveDateTime) -> Frame {
        let show_seconds = self.show_seconds && !self.mode.is_ambient();

        Frame {
            mode: self.mode.to_string(),
            time: format::time_text(now.time(), show_seconds),
            date: format::date_text(now.date()),
            temperatures: format::temperature_line(&self.state),
            icon: self.icon().map(|icon| icon.asset_name()),
        }
    }
}
