use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit system the caller wants values converted into.
///
/// Bright Sky itself always answers in DWD units (°C, hPa, km/h, mm);
/// conversion into the requested system happens after the response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported systems: metric, imperial."
            )),
        }
    }
}

/// The query intent: which endpoint to hit and how to interpret the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMode {
    Current,
    Forecast,
    Historical,
    HistoricalTimeLine,
}

/// Classification of one returned record relative to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Current,
    Forecast,
    Historical,
}

impl WeatherKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherKind::Current => "current",
            WeatherKind::Forecast => "forecast",
            WeatherKind::Historical => "historical",
        }
    }
}

/// What the caller asks a provider for: a coordinate, an optional
/// point in time ("now" when absent) and the target unit system.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub date_time: Option<DateTime<Utc>>,
    pub units: UnitSystem,
}

impl WeatherQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            date_time: None,
            units: UnitSystem::default(),
        }
    }

    #[must_use]
    pub fn at(mut self, when: DateTime<Utc>) -> Self {
        self.date_time = Some(when);
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }
}

/// Attribution metadata identifying where a record's data came from.
///
/// Providers hand these out as `'static` slices, so every record of a
/// provider shares the same two instances instead of cloning strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Source {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

/// One timestamped weather observation or forecast point.
///
/// Latitude, longitude, timestamp and kind are always present; the
/// measured fields are optional because the upstream API omits them
/// freely. Unit-dependent fields are already converted into the unit
/// system of the query that produced this record.
#[derive(Debug, Clone, Serialize)]
pub struct Weather {
    pub latitude: f64,
    pub longitude: f64,
    pub utc_time: DateTime<Utc>,
    pub kind: WeatherKind,
    pub temperature: Option<f64>,
    pub dew_point: Option<f64>,
    /// Relative humidity on a 0–100 percentage scale.
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Degrees, never converted.
    pub wind_direction: Option<f64>,
    pub precipitation: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub weather_code: Option<u8>,
    pub icon: Option<&'static str>,
    pub sources: &'static [Source],
}

/// Ordered sequence of records; insertion order is the API response order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeatherCollection(Vec<Weather>);

impl WeatherCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, weather: Weather) {
        self.0.push(weather);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Weather> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Weather> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&Weather> {
        self.0.first()
    }
}

impl IntoIterator for WeatherCollection {
    type Item = Weather;
    type IntoIter = std::vec::IntoIter<Weather>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a WeatherCollection {
    type Item = &'a Weather;
    type IntoIter = std::slice::Iter<'a, Weather>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Weather> for WeatherCollection {
    fn from_iter<T: IntoIterator<Item = Weather>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_system_as_str_roundtrip() {
        for units in [UnitSystem::Metric, UnitSystem::Imperial] {
            let parsed = UnitSystem::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(units, parsed);
        }
    }

    #[test]
    fn unknown_unit_system_error() {
        let err = UnitSystem::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn query_builder_defaults_to_metric_and_now() {
        let query = WeatherQuery::new(47.873, 8.004);
        assert_eq!(query.units, UnitSystem::Metric);
        assert!(query.date_time.is_none());
    }

    #[test]
    fn query_builder_sets_time_and_units() {
        let when = DateTime::parse_from_rfc3339("2023-06-10T08:00:00+00:00")
            .unwrap()
            .with_timezone(&Utc);
        let query = WeatherQuery::new(47.873, 8.004)
            .at(when)
            .with_units(UnitSystem::Imperial);

        assert_eq!(query.date_time, Some(when));
        assert_eq!(query.units, UnitSystem::Imperial);
    }

    #[test]
    fn collection_preserves_insertion_order() {
        let sources: &'static [Source] = &[];
        let base = Weather {
            latitude: 0.0,
            longitude: 0.0,
            utc_time: Utc::now(),
            kind: WeatherKind::Historical,
            temperature: None,
            dew_point: None,
            humidity: None,
            pressure: None,
            wind_speed: None,
            wind_direction: None,
            precipitation: None,
            cloud_cover: None,
            weather_code: None,
            icon: None,
            sources,
        };

        let mut collection = WeatherCollection::new();
        for temp in [1.0, 2.0, 3.0] {
            let mut record = base.clone();
            record.temperature = Some(temp);
            collection.push(record);
        }

        assert_eq!(collection.len(), 3);
        let temps: Vec<f64> = collection.iter().filter_map(|w| w.temperature).collect();
        assert_eq!(temps, vec![1.0, 2.0, 3.0]);
    }
}
