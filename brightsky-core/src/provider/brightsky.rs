use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::model::{
    RequestMode, Source, Weather, WeatherCollection, WeatherKind, WeatherQuery,
};
use crate::units;

use super::{WeatherPayload, WeatherProvider};

const BASE_URL: &str = "https://api.brightsky.dev";

/// The two origins behind every Bright Sky record: the Bright Sky API
/// itself and the Deutscher Wetterdienst it re-serves.
static SOURCES: [Source; 2] = [
    Source {
        id: "brightsky",
        name: "Bright Sky",
        url: "https://brightsky.dev/",
    },
    Source {
        id: "dwd",
        name: "Deutscher Wetterdienst",
        url: "https://www.dwd.de/",
    },
];

/// Provider adapter for the Bright Sky API (DWD data, no API key).
#[derive(Debug, Clone)]
pub struct Brightsky {
    http: Client,
}

impl Brightsky {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Reuse an already-configured client (timeouts, proxies, ...).
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// The exact request URL for one query mode.
    ///
    /// Bright Sky is always asked for `units=dwd` (°C, hPa, km/h, mm)
    /// regardless of the query's unit system; conversion happens in
    /// [`Self::parse_response`]. Latitude/longitude keep their full
    /// float `Display` representation.
    pub fn request_url(&self, mode: RequestMode, query: &WeatherQuery) -> String {
        let lat = query.latitude;
        let lon = query.longitude;

        match mode {
            RequestMode::Current => {
                format!("{BASE_URL}/current_weather?lat={lat}&lon={lon}&units=dwd")
            }
            RequestMode::Forecast | RequestMode::HistoricalTimeLine => {
                let date = query.date_time.unwrap_or_else(Utc::now);
                format!(
                    "{BASE_URL}/weather?lat={lat}&lon={lon}&units=dwd&date={}",
                    iso8601_param(date)
                )
            }
            RequestMode::Historical => {
                let date = query.date_time.unwrap_or_else(Utc::now);
                let last_date = date + Duration::hours(2);
                format!(
                    "{BASE_URL}/weather?lat={lat}&lon={lon}&units=dwd&date={}&last_date={}",
                    iso8601_param(date),
                    iso8601_param(last_date)
                )
            }
        }
    }

    /// Map a raw response body into the shared model.
    ///
    /// Current-weather bodies carry a single record under `weather`;
    /// every other mode carries an ordered list. A body without the
    /// `weather` envelope is a [`ProviderError::Server`].
    pub fn parse_response(
        &self,
        mode: RequestMode,
        query: &WeatherQuery,
        body: &str,
    ) -> Result<WeatherPayload> {
        match mode {
            RequestMode::Current => self.parse_current(query, body).map(WeatherPayload::Record),
            RequestMode::Forecast | RequestMode::Historical | RequestMode::HistoricalTimeLine => {
                self.parse_series(query, body).map(WeatherPayload::Collection)
            }
        }
    }

    fn parse_current(&self, query: &WeatherQuery, body: &str) -> Result<Weather> {
        let envelope: CurrentEnvelope = decode(body)?;
        map_record(query, &envelope.weather, Some(WeatherKind::Current), Utc::now())
    }

    fn parse_series(&self, query: &WeatherQuery, body: &str) -> Result<WeatherCollection> {
        let envelope: SeriesEnvelope = decode(body)?;
        let now = Utc::now();
        envelope
            .weather
            .iter()
            .map(|raw| map_record(query, raw, None, now))
            .collect()
    }

    async fn fetch(&self, url: String) -> Result<String> {
        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Server(format!(
                "status {status}: {}",
                truncate_body(&body)
            )));
        }

        Ok(body)
    }

    async fn fetch_series(
        &self,
        mode: RequestMode,
        query: &WeatherQuery,
    ) -> Result<WeatherCollection> {
        let body = self.fetch(self.request_url(mode, query)).await?;
        self.parse_series(query, &body)
    }
}

impl Default for Brightsky {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for Brightsky {
    fn sources(&self) -> &'static [Source] {
        &SOURCES
    }

    async fn current_weather(&self, query: &WeatherQuery) -> Result<Weather> {
        let body = self
            .fetch(self.request_url(RequestMode::Current, query))
            .await?;
        self.parse_current(query, &body)
    }

    async fn forecast(&self, query: &WeatherQuery) -> Result<WeatherCollection> {
        self.fetch_series(RequestMode::Forecast, query).await
    }

    async fn historical(&self, query: &WeatherQuery) -> Result<WeatherCollection> {
        self.fetch_series(RequestMode::Historical, query).await
    }

    async fn historical_time_line(&self, query: &WeatherQuery) -> Result<WeatherCollection> {
        self.fetch_series(RequestMode::HistoricalTimeLine, query)
            .await
    }
}

/// One record as Bright Sky sends it. Measured fields come and go per
/// station, and the ten-minute observation endpoints rename wind and
/// precipitation with a `_10` suffix.
#[derive(Debug, Deserialize)]
struct RawRecord {
    timestamp: String,
    temperature: Option<f64>,
    dew_point: Option<f64>,
    relative_humidity: Option<f64>,
    pressure_msl: Option<f64>,
    wind_speed: Option<f64>,
    wind_speed_10: Option<f64>,
    wind_direction: Option<f64>,
    wind_direction_10: Option<f64>,
    precipitation: Option<f64>,
    precipitation_10: Option<f64>,
    cloud_cover: Option<f64>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentEnvelope {
    weather: RawRecord,
}

#[derive(Debug, Deserialize)]
struct SeriesEnvelope {
    weather: Vec<RawRecord>,
}

fn decode<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T> {
    serde_json::from_str(body).map_err(|err| ProviderError::Server(err.to_string()))
}

/// RFC 3339 timestamp, percent-encoded for use as a query-string value.
/// The offset's `+` would otherwise decode as a space on the server side.
fn iso8601_param(date: DateTime<Utc>) -> String {
    urlencoding::encode(&date.to_rfc3339_opts(SecondsFormat::Secs, false)).into_owned()
}

/// Build one domain record from one raw record.
///
/// `forced` pins the kind for current-weather responses; otherwise the
/// record classifies itself against `now` (strictly in the future means
/// forecast, everything else historical).
fn map_record(
    query: &WeatherQuery,
    raw: &RawRecord,
    forced: Option<WeatherKind>,
    now: DateTime<Utc>,
) -> Result<Weather> {
    let utc_time = DateTime::parse_from_rfc3339(&raw.timestamp)
        .map_err(|err| {
            ProviderError::Server(format!("bad record timestamp '{}': {err}", raw.timestamp))
        })?
        .with_timezone(&Utc);

    let kind = forced.unwrap_or(if utc_time > now {
        WeatherKind::Forecast
    } else {
        WeatherKind::Historical
    });

    let target = query.units;
    let icon = raw.icon.as_deref();

    Ok(Weather {
        latitude: query.latitude,
        longitude: query.longitude,
        utc_time,
        kind,
        temperature: raw
            .temperature
            .map(|v| units::temperature_from_celsius(v, target)),
        dew_point: raw
            .dew_point
            .map(|v| units::temperature_from_celsius(v, target)),
        // Already a 0–100 percentage in this API; stored untouched.
        humidity: raw.relative_humidity,
        pressure: raw.pressure_msl.map(|v| units::pressure_from_hpa(v, target)),
        wind_speed: raw
            .wind_speed
            .or(raw.wind_speed_10)
            .map(|v| units::speed_from_kmh(v, target)),
        wind_direction: raw.wind_direction.or(raw.wind_direction_10),
        precipitation: raw
            .precipitation
            .or(raw.precipitation_10)
            .map(|v| units::precipitation_from_mm(v, target)),
        cloud_cover: raw.cloud_cover,
        weather_code: icon.and_then(map_weather_code),
        icon: icon.and_then(map_icon),
        sources: &SOURCES,
    })
}

/// Bright Sky icon names onto the WMO-style codes the shared model uses.
fn map_weather_code(icon: &str) -> Option<u8> {
    match icon {
        "clear-day" | "clear-night" => Some(0),
        "partly-cloudy-day" | "partly-cloudy-night" => Some(2),
        "cloudy" => Some(3),
        "fog" => Some(45),
        "rain" => Some(63),
        "snow" => Some(73),
        "thunderstorm" => Some(95),
        _ => None,
    }
}

/// Bright Sky icon names onto the weather-icons naming scheme.
fn map_icon(icon: &str) -> Option<&'static str> {
    match icon {
        "clear-day" => Some("day-sunny"),
        "clear-night" => Some("night-clear"),
        "partly-cloudy-day" => Some("day-cloudy"),
        "partly-cloudy-night" => Some("night-cloudy"),
        "cloudy" => Some("cloudy"),
        "rain" => Some("rain"),
        "fog" => Some("fog"),
        "snow" => Some("snow"),
        "thunderstorm" => Some("thunderstorm"),
        "sleet" => Some("sleet"),
        "hail" => Some("hail"),
        "wind" => Some("strong-wind"),
        _ => None,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back off to a char boundary so multi-byte content can't panic here.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}
