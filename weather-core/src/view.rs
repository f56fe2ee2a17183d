//! Declarative view tree derived from [`ScreenState`].
//!
//! Nothing here talks to the controller; the rendering layer rebuilds the view
//! after each state change and draws it however it likes. The `Display` impl is
//! the plain-text rendering used by the CLI.

use std::fmt;

use crate::screen::{Phase, ScreenState};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Ready(ReadyView),
    Failed { search: SearchBar, message: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchBar {
    pub visible: bool,
    /// Result labels; empty unless the bar is open.
    pub results: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub search: SearchBar,
    pub name: String,
    pub country: String,
    pub temp_c: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub humidity_pct: u8,
    pub sunrise: Option<String>,
    pub days: Vec<DayCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub weekday: String,
    pub avg_temp_c: f64,
    pub condition: String,
}

impl View {
    pub fn from_state(state: &ScreenState) -> Self {
        let search = SearchBar {
            visible: state.search_visible,
            results: if state.search_visible {
                state.locations.iter().map(|l| l.label()).collect()
            } else {
                Vec::new()
            },
        };

        match &state.phase {
            Phase::Loading => View::Loading,
            Phase::Failed { message } => View::Failed { search, message: message.clone() },
            Phase::Ready => match state.weather_for_display() {
                Some(weather) => View::Ready(ReadyView {
                    search,
                    name: weather.location.name.clone(),
                    country: weather.location.country.clone(),
                    temp_c: weather.current.temp_c,
                    condition: weather.current.condition.clone(),
                    wind_kph: weather.current.wind_kph,
                    humidity_pct: weather.current.humidity_pct,
                    sunrise: weather.sunrise().map(str::to_string),
                    days: weather
                        .forecast
                        .forecastday
                        .iter()
                        .map(|d| DayCard {
                            weekday: d.weekday(),
                            avg_temp_c: d.avg_temp_c,
                            condition: d.condition.clone(),
                        })
                        .collect(),
                }),
                None => View::Loading,
            },
        }
    }
}

impl fmt::Display for SearchBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.visible {
            return writeln!(f, "[search: closed]");
        }
        writeln!(f, "[search: open]")?;
        for (i, label) in self.results.iter().enumerate() {
            writeln!(f, "  {}) {}", i + 1, label)?;
        }
        Ok(())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Loading => writeln!(f, "Loading..."),
            View::Failed { search, message } => {
                write!(f, "{search}")?;
                writeln!(f, "Could not load forecast: {message}")
            }
            View::Ready(ready) => {
                write!(f, "{}", ready.search)?;
                writeln!(f, "{}, {}", ready.name, ready.country)?;
                writeln!(f, "{:.1}\u{b0}  {}", ready.temp_c, ready.condition)?;
                write!(f, "wind {:.0}km  humidity {}%", ready.wind_kph, ready.humidity_pct)?;
                match &ready.sunrise {
                    Some(sunrise) => writeln!(f, "  sunrise {sunrise}")?,
                    None => writeln!(f)?,
                }
                writeln!(f, "Daily forecast")?;
                for day in &ready.days {
                    writeln!(f, "  {:<10} {:>5.1}\u{b0}  {}", day.weekday, day.avg_temp_c, day.condition)?;
                }
                Ok(())
            }
        }
    }
}
