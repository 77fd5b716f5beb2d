use crate::error::Result;
use crate::model::{Source, Weather, WeatherCollection, WeatherQuery};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod brightsky;

/// What `parse_response` hands back: a single record for current-weather
/// queries, an ordered collection for everything else.
#[derive(Debug, Clone)]
pub enum WeatherPayload {
    Record(Weather),
    Collection(WeatherCollection),
}

impl WeatherPayload {
    pub fn into_record(self) -> Option<Weather> {
        match self {
            WeatherPayload::Record(weather) => Some(weather),
            WeatherPayload::Collection(_) => None,
        }
    }

    pub fn into_collection(self) -> Option<WeatherCollection> {
        match self {
            WeatherPayload::Record(_) => None,
            WeatherPayload::Collection(collection) => Some(collection),
        }
    }
}

/// A data source adapter translating one external API into the shared
/// weather model. One instance is safe to share across callers; the
/// only state a provider keeps is its HTTP client and static
/// attribution data.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Attribution sources attached to every record this provider returns.
    fn sources(&self) -> &'static [Source];

    /// Current conditions at the query coordinate.
    async fn current_weather(&self, query: &WeatherQuery) -> Result<Weather>;

    /// Forecast series starting at the query time (or now).
    async fn forecast(&self, query: &WeatherQuery) -> Result<WeatherCollection>;

    /// Observations around the query time.
    async fn historical(&self, query: &WeatherQuery) -> Result<WeatherCollection>;

    /// Mixed observation/forecast timeline around the query time.
    async fn historical_time_line(&self, query: &WeatherQuery) -> Result<WeatherCollection>;
}
