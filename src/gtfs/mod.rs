use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{future::Future, io, time::Instant};
use thiserror::Error;
use tracing::debug;

mod config;
pub mod models;
mod source;
pub use config::*;
pub use models::*;
pub use source::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Fetching {name} failed with status {status}")]
    Status { name: String, status: u16 },
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("Background read failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Where raw tables come from: a directory, a zip archive, a web server.
pub trait Source: Send + Sync {
    /// Returns the raw bytes of the table called `name`.
    fn fetch(&self, name: &str) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;
}

/// The three tables of one load cycle. Each one succeeds or fails on its own.
#[derive(Debug)]
pub struct Tables {
    pub stops: Result<Vec<GtfsStop>, Error>,
    pub stop_times: Result<Vec<GtfsStopTime>, Error>,
    pub trips: Result<Vec<GtfsTrip>, Error>,
}

pub async fn load_stops<S: Source>(source: &S, config: &Config) -> Result<Vec<GtfsStop>, Error> {
    load_table(source, &config.stops_file_name).await
}

pub async fn load_stop_times<S: Source>(
    source: &S,
    config: &Config,
) -> Result<Vec<GtfsStopTime>, Error> {
    load_table(source, &config.stop_times_file_name).await
}

pub async fn load_trips<S: Source>(source: &S, config: &Config) -> Result<Vec<GtfsTrip>, Error> {
    load_table(source, &config.trips_file_name).await
}

/// Fetches all three tables concurrently and waits for every one of them.
pub async fn load_tables<S: Source>(source: &S, config: &Config) -> Tables {
    let (stops, stop_times, trips) = tokio::join!(
        load_stops(source, config),
        load_stop_times(source, config),
        load_trips(source, config),
    );
    Tables {
        stops,
        stop_times,
        trips,
    }
}

async fn load_table<S, T>(source: &S, name: &str) -> Result<Vec<T>, Error>
where
    S: Source,
    T: DeserializeOwned,
{
    debug!("Fetching {name}...");
    let now = Instant::now();
    let bytes = source.fetch(name).await?;
    let rows = parse_rows(name, &bytes)?;
    debug!(
        "Fetching {name} took {:?} ({} rows)",
        now.elapsed(),
        rows.len()
    );
    Ok(rows)
}

/// Parses a table by its file name, JSON for `.json` and CSV otherwise.
pub fn parse_rows<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<Vec<T>, Error> {
    if name.ends_with(".json") {
        parse_json(bytes)
    } else {
        parse_csv(bytes)
    }
}

fn parse_csv<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let mut buf = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result?;
        buf.push(record);
    }
    Ok(buf)
}

fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, Error> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(serde_json::from_value(stringify(value))?)
}

// JSON exports mix numbers and strings in the same column,
// every scalar becomes a string and nulls become missing fields.
fn stringify(value: Value) -> Value {
    match value {
        Value::Array(rows) => Value::Array(rows.into_iter().map(stringify).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key, stringify(value)))
                .collect(),
        ),
        Value::Number(number) => Value::String(number.to_string()),
        Value::Bool(flag) => Value::String(flag.to_string()),
        other => other,
    }
}
