//! Core library for the Sunshine watch face.
//!
//! This crate defines:
//! - Weather condition code to icon classification
//! - The display state and how weather updates are applied to it
//! - Decoding of the key-value messages sent by the phone
//! - Text formatting and the face engine that ties them together
//! - Configuration handling
//!
//! It is used by `watchface-cli`, but has no dependency on any drawing backend.

pub mod condition;
pub mod config;
pub mod face;
pub mod format;
pub mod message;
pub mod model;

pub use condition::{Condition, DisplayMode, IconId, classify};
pub use config::Config;
pub use face::{Frame, WatchFace};
pub use message::{DecodeMode, JsonLinesSource, MessageKeys, UpdateError, UpdateSource};
pub use model::{DisplayState, WeatherUpdate, apply_update};
