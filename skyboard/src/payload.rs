//! Weather payload served by the insights API
//!
//! The endpoint wraps the processed summary in an envelope:
//!
//! ```json
//! {
//!   "status": "success",
//!   "source": "processed_weather_data/processed-20240101-000000.json",
//!   "data": {
//!     "processed_at": "2024-01-01T00:00:00+00:00",
//!     "model": "gemini-2.5-flash",
//!     "source_file": "raw_weather_data/weather-20240101-000000.json",
//!     "result": { "Delhi": { "mood": "Sunny", "summary": "Clear skies" } }
//!   }
//! }
//! ```
//!
//! Only `data.result` is required. City order follows the source object.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde_json::Value;
use thiserror::Error;

/// Display format for `processed_at`, e.g. `Jan 1, 2024 05:30:00`
pub const PROCESSED_AT_FORMAT: &str = "%b %-d, %Y %H:%M:%S";

/// Mood and summary for one city
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CityWeather {
    /// One-word sentiment label, also the styling key (case-insensitive)
    pub mood: String,
    /// Free-text description
    pub summary: String,
}

impl CityWeather {
    /// Styling key for the mood
    pub fn mood_key(&self) -> String {
        self.mood.trim().to_lowercase()
    }
}

/// City name -> weather, in source order with unique keys
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CityTable(Vec<(String, CityWeather)>);

impl CityTable {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CityWeather)> {
        self.0
            .iter()
            .map(|(city, weather)| (city.as_str(), weather))
    }

    pub fn get(&self, city: &str) -> Option<&CityWeather> {
        self.0
            .iter()
            .find(|(name, _)| name == city)
            .map(|(_, weather)| weather)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert or replace. A replaced city keeps its original position.
    pub fn insert(&mut self, city: impl Into<String>, weather: CityWeather) {
        let city = city.into();
        match self.0.iter_mut().find(|(name, _)| *name == city) {
            Some(entry) => entry.1 = weather,
            None => self.0.push((city, weather)),
        }
    }
}

impl FromIterator<(String, CityWeather)> for CityTable {
    fn from_iter<I: IntoIterator<Item = (String, CityWeather)>>(iter: I) -> Self {
        let mut table = CityTable::default();
        for (city, weather) in iter {
            table.insert(city, weather);
        }
        table
    }
}

impl<'de> Deserialize<'de> for CityTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CityTableVisitor;

        impl<'de> Visitor<'de> for CityTableVisitor {
            type Value = CityTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping city names to mood and summary")
            }

            fn visit_map<M>(self, mut map: M) -> Result<CityTable, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut table = CityTable(Vec::with_capacity(map.size_hint().unwrap_or(0)));
                while let Some((city, weather)) = map.next_entry::<String, CityWeather>()? {
                    table.insert(city, weather);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(CityTableVisitor)
    }
}

/// Why a response body could not be turned into a [`WeatherPayload`]
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("response body is not a JSON object")]
    NotAnObject,
    #[error("response has no `data` object")]
    MissingData,
    #[error("response has no `data.result`")]
    MissingResult,
    #[error("malformed `data`: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct Data {
    #[serde(default, deserialize_with = "lenient_string")]
    processed_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    source_file: Option<String>,
    result: CityTable,
}

/// Accepts any JSON value; keeps it only if it is a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Decoded weather summary
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeatherPayload {
    /// Raw `processed_at` timestamp
    pub processed_at: Option<String>,
    /// Model that produced the summaries
    pub model: Option<String>,
    /// Raw collector file the summaries were built from
    pub source_file: Option<String>,
    /// Processed file the API served
    pub source: Option<String>,
    pub result: CityTable,
}

impl WeatherPayload {
    /// Decode an API response body.
    ///
    /// Requires `data.result` to be an object of `{ mood, summary }` entries.
    /// A `null` result counts as missing.
    pub fn from_body(body: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut envelope) = body else {
            return Err(PayloadError::NotAnObject);
        };

        let source = match envelope.remove("source") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };

        let data = match envelope.remove("data") {
            Some(Value::Object(data)) => data,
            _ => return Err(PayloadError::MissingData),
        };
        if matches!(data.get("result"), None | Some(Value::Null)) {
            return Err(PayloadError::MissingResult);
        }

        let data: Data = serde_json::from_value(Value::Object(data))?;
        Ok(Self {
            processed_at: data.processed_at,
            model: data.model,
            source_file: data.source_file,
            source,
            result: data.result,
        })
    }

    /// `processed_at` parsed as a UTC instant, if it is ISO 8601.
    ///
    /// Timestamps without an offset are taken as UTC.
    pub fn processed_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.processed_at.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// `processed_at` rendered in `tz`.
    ///
    /// Falls back to the raw string when it does not parse, and to `"unknown"`
    /// when it is absent.
    pub fn processed_at_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match (self.processed_at_utc(), self.processed_at.as_deref()) {
            (Some(utc), _) => utc
                .with_timezone(tz)
                .format(PROCESSED_AT_FORMAT)
                .to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => "unknown".to_string(),
        }
    }

    /// `processed_at` in the local time zone.
    pub fn processed_at_local(&self) -> String {
        self.processed_at_in(&chrono::Local)
    }
}
