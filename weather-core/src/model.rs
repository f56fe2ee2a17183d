use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A search hit. Only `name` outlives the result list (it becomes the persisted city).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Option<i64>,
    pub name: String,
    pub region: String,
    pub country: String,
}

impl Location {
    /// Label shown in the result list, e.g. "London, United Kingdom".
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub city: String,
    pub days: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub region: String,
    pub country: String,
    pub localtime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub humidity_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub avg_temp_c: f64,
    pub condition: String,
    pub sunrise: Option<String>,
}

impl DayForecast {
    /// Full English weekday name, e.g. "Monday".
    pub fn weekday(&self) -> String {
        self.date.format("%A").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<DayForecast>,
}

/// Current conditions plus the multi-day forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub location: LocationInfo,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

impl ForecastBundle {
    pub fn sunrise(&self) -> Option<&str> {
        self.forecast.forecastday.first().and_then(|d| d.sunrise.as_deref())
    }
}
