//! Core library for the `weather` screen.
//!
//! This crate defines:
//! - Configuration handling
//! - The weather service client and the last-city store
//! - Debounced location search
//! - Screen state, its reducer, and the controller that runs its effects
//! - The view tree the presentation layer renders
//!
//! It is used by `weather-cli`, but can also drive other front ends.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod screen;
pub mod search;
pub mod storage;
pub mod view;

#[cfg(test)]
mod test_support;

pub use client::{WeatherApi, WeatherApiClient};
pub use config::{Config, ScreenSettings};
pub use controller::ScreenController;
pub use error::ApiError;
pub use model::{ForecastBundle, Location};
pub use screen::{Event, Phase, ScreenState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use view::View;
