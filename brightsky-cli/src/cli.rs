use anyhow::{Context, Result};
use brightsky_core::{
    Brightsky, Config, UnitSystem, Weather, WeatherCollection, WeatherProvider, WeatherQuery,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "brightsky", version, about = "Bright Sky (DWD) weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by every query subcommand.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Latitude; falls back to the configured home location.
    #[arg(long)]
    pub lat: Option<f64>,

    /// Longitude; falls back to the configured home location.
    #[arg(long)]
    pub lon: Option<f64>,

    /// Unit system, "metric" or "imperial"; falls back to config.
    #[arg(long)]
    pub units: Option<String>,

    /// Print raw records as JSON instead of the human-readable lines.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions.
    Current {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show the forecast from a point in time onwards.
    Forecast {
        #[command(flatten)]
        query: QueryArgs,

        /// Point in time (RFC 3339 or YYYY-MM-DD); "now" when absent.
        #[arg(long)]
        date: Option<String>,
    },

    /// Show observations around a point in time.
    Historical {
        #[command(flatten)]
        query: QueryArgs,

        /// Point in time (RFC 3339 or YYYY-MM-DD); "now" when absent.
        #[arg(long)]
        date: Option<String>,
    },

    /// Interactively set default units and home location.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let provider = Brightsky::new();

        match self.command {
            Command::Current { query } => {
                let json = query.json;
                let query = build_query(&config, &query, None)?;
                let record = provider.current_weather(&query).await?;
                print_record(&record, query.units, json)?;
            }
            Command::Forecast { query, date } => {
                let json = query.json;
                let when = parse_date(date.as_deref())?;
                let query = build_query(&config, &query, when)?;
                let records = provider.forecast(&query).await?;
                print_collection(&records, query.units, json)?;
            }
            Command::Historical { query, date } => {
                let json = query.json;
                let when = parse_date(date.as_deref())?;
                let query = build_query(&config, &query, when)?;
                let records = provider.historical(&query).await?;
                print_collection(&records, query.units, json)?;
            }
            Command::Configure => configure(config)?,
        }

        Ok(())
    }
}

/// Resolve coordinates and units from arguments, falling back to config.
fn build_query(
    config: &Config,
    args: &QueryArgs,
    when: Option<DateTime<Utc>>,
) -> Result<WeatherQuery> {
    let (latitude, longitude) = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        (None, None) => {
            let home = config.home()?;
            (home.latitude, home.longitude)
        }
        _ => anyhow::bail!("--lat and --lon must be given together"),
    };

    let units = match &args.units {
        Some(value) => UnitSystem::try_from(value.as_str())?,
        None => config.units(),
    };

    let mut query = WeatherQuery::new(latitude, longitude).with_units(units);
    if let Some(when) = when {
        query = query.at(when);
    }

    Ok(query)
}

/// Accept RFC 3339 timestamps or bare dates (interpreted as UTC midnight).
fn parse_date(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = value else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Cannot parse date '{value}' (expected RFC 3339 or YYYY-MM-DD)"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("Invalid midnight for parsed date")?;

    Ok(Some(midnight.and_utc()))
}

fn configure(mut config: Config) -> Result<()> {
    let units = inquire::Select::new(
        "Preferred unit system:",
        vec![UnitSystem::Metric, UnitSystem::Imperial],
    )
    .prompt()
    .context("Unit selection aborted")?;

    let latitude = inquire::CustomType::<f64>::new("Home latitude:")
        .with_help_message("e.g. 47.873")
        .prompt()
        .context("Latitude input aborted")?;

    let longitude = inquire::CustomType::<f64>::new("Home longitude:")
        .with_help_message("e.g. 8.004")
        .prompt()
        .context("Longitude input aborted")?;

    config.set_units(units);
    config.set_home(latitude, longitude);
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_record(record: &Weather, units: UnitSystem, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    println!("{}", format_record(record, units));
    for source in record.sources {
        println!("  source: {} ({})", source.name, source.url);
    }
    Ok(())
}

fn print_collection(records: &WeatherCollection, units: UnitSystem, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No records returned.");
        return Ok(());
    }

    for record in records {
        println!("{}", format_record(record, units));
    }
    if let Some(first) = records.first() {
        for source in first.sources {
            println!("  source: {} ({})", source.name, source.url);
        }
    }
    Ok(())
}

fn format_record(record: &Weather, units: UnitSystem) -> String {
    let (temp_unit, speed_unit, precip_unit, pressure_unit) = match units {
        UnitSystem::Metric => ("°C", "km/h", "mm", "hPa"),
        UnitSystem::Imperial => ("°F", "mph", "in", "inHg"),
    };

    let mut line = format!(
        "{} [{}]",
        record.utc_time.format("%Y-%m-%d %H:%M UTC"),
        record.kind.as_str()
    );

    if let Some(temperature) = record.temperature {
        line.push_str(&format!("  {temperature:.1}{temp_unit}"));
    }
    if let Some(icon) = record.icon {
        line.push_str(&format!("  {icon}"));
    }
    if let Some(humidity) = record.humidity {
        line.push_str(&format!("  humidity {humidity:.0}%"));
    }
    if let Some(wind_speed) = record.wind_speed {
        line.push_str(&format!("  wind {wind_speed:.1} {speed_unit}"));
        if let Some(direction) = record.wind_direction {
            line.push_str(&format!(" @ {direction:.0}°"));
        }
    }
    if let Some(precipitation) = record.precipitation {
        line.push_str(&format!("  precip {precipitation:.1} {precip_unit}"));
    }
    if let Some(pressure) = record.pressure {
        line.push_str(&format!("  {pressure:.1} {pressure_unit}"));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use brightsky_core::{Source, WeatherKind};

    fn sample_record() -> Weather {
        static SOURCES: [Source; 1] = [Source {
            id: "brightsky",
            name: "Bright Sky",
            url: "https://brightsky.dev/",
        }];

        Weather {
            latitude: 47.873,
            longitude: 8.004,
            utc_time: DateTime::parse_from_rfc3339("2022-07-19T12:30:00+00:00")
                .unwrap()
                .with_timezone(&Utc),
            kind: WeatherKind::Current,
            temperature: Some(32.1),
            dew_point: Some(16.4),
            humidity: Some(40.0),
            pressure: Some(1017.0),
            wind_speed: Some(11.2),
            wind_direction: Some(230.0),
            precipitation: Some(0.0),
            cloud_cover: Some(62.5),
            weather_code: Some(2),
            icon: Some("day-cloudy"),
            sources: &SOURCES,
        }
    }

    #[test]
    fn parse_date_accepts_rfc3339_and_bare_dates() {
        let full = parse_date(Some("2023-06-10T08:00:00+00:00")).unwrap().unwrap();
        assert_eq!(full.to_rfc3339(), "2023-06-10T08:00:00+00:00");

        let bare = parse_date(Some("2023-06-10")).unwrap().unwrap();
        assert_eq!(bare.to_rfc3339(), "2023-06-10T00:00:00+00:00");

        assert!(parse_date(None).unwrap().is_none());
        assert!(parse_date(Some("not-a-date")).is_err());
    }

    #[test]
    fn build_query_requires_both_coordinates() {
        let config = Config::default();
        let args = QueryArgs {
            lat: Some(47.873),
            lon: None,
            units: None,
            json: false,
        };
        let err = build_query(&config, &args, None).unwrap_err();
        assert!(err.to_string().contains("given together"));
    }

    #[test]
    fn build_query_prefers_explicit_units() {
        let mut config = Config::default();
        config.set_units(UnitSystem::Metric);

        let args = QueryArgs {
            lat: Some(47.873),
            lon: Some(8.004),
            units: Some("imperial".to_string()),
            json: false,
        };
        let query = build_query(&config, &args, None).unwrap();
        assert_eq!(query.units, UnitSystem::Imperial);
    }

    #[test]
    fn format_record_shows_units_of_the_target_system() {
        let record = sample_record();

        let metric = format_record(&record, UnitSystem::Metric);
        assert!(metric.contains("32.1°C"));
        assert!(metric.contains("km/h"));
        assert!(metric.contains("[current]"));
        assert!(metric.contains("day-cloudy"));

        let imperial = format_record(&record, UnitSystem::Imperial);
        assert!(imperial.contains("°F"));
        assert!(imperial.contains("mph"));
    }
}
