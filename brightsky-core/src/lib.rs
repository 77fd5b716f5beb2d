//! Core library for the `brightsky` CLI.
//!
//! This crate defines:
//! - The shared weather data model (queries, records, attribution sources)
//! - Unit conversion out of the DWD units Bright Sky reports in
//! - Abstraction over weather providers, plus the Bright Sky adapter
//! - Configuration handling for the CLI
//!
//! It is used by `brightsky-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod units;

pub use config::{Config, HomeLocation};
pub use error::{ProviderError, Result};
pub use model::{
    RequestMode, Source, UnitSystem, Weather, WeatherCollection, WeatherKind, WeatherQuery,
};
pub use provider::{WeatherPayload, WeatherProvider, brightsky::Brightsky};
