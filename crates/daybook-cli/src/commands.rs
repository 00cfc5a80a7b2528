use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;
use daybook::{
    chunk, current_year, flatten, get_holidays, holidays, is_date_before, is_holiday,
    is_same_day, is_within_range, unique_by_key, validate_password, Clock, DateOptions, DateUnit,
    FixedClock, InvalidInput, Nested, SystemClock,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cli::{Cli, Command};

#[derive(Serialize)]
struct HolidayEntry {
    name: &'static str,
    date: NaiveDate,
    timestamp: DateTime<Utc>,
}

/// Build the date options from global flags.
fn date_options(cli: &Cli) -> Result<DateOptions> {
    let timezone: Tz = cli
        .tz
        .parse()
        .map_err(|_| anyhow!("unknown timezone '{}'", cli.tz))?;
    Ok(DateOptions::default()
        .with_timezone(timezone)
        .with_holiday_delay(Duration::from_millis(cli.holiday_delay_ms)))
}

fn parse_json_array(json: &str) -> Result<Vec<Value>> {
    serde_json::from_str(json).context("expected a JSON array")
}

/// Rewrite every number as `f64`, so `1` and `1.0` (and `0` and `-0.0`)
/// compare equal the way JSON's single number type does.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(|f| if f == 0.0 { 0.0 } else { f })
            .and_then(serde_json::Number::from_f64)
            .map_or_else(|| value.clone(), Value::Number),
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), canonical(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Parse a chunk size. Integral floats such as `2.0` are accepted.
fn parse_chunk_size(size: &str) -> Result<usize, InvalidInput> {
    let size: f64 = size.trim().parse().map_err(|_| InvalidInput::ChunkSize)?;
    if size.fract() != 0.0 || size <= 0.0 || size > usize::MAX as f64 {
        return Err(InvalidInput::ChunkSize);
    }
    Ok(size as usize)
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Run the selected command and return its JSON result.
pub async fn run(cli: &Cli) -> Result<Value> {
    let options = date_options(cli)?;
    // Arguments stay out of the log; `password` carries a secret.
    info!(timezone = %options.timezone, "running command");

    let value = match &cli.command {
        Command::Year => {
            let clock: Box<dyn Clock> = match &cli.now {
                Some(now) => Box::new(FixedClock::new(options.parse_timestamp(now)?)),
                None => Box::new(SystemClock),
            };
            Value::from(current_year(clock.as_ref(), &options))
        }
        Command::Add {
            timestamp,
            amount,
            unit,
        } => {
            let timestamp = options.parse_timestamp(timestamp)?;
            let amount: f64 = amount.trim().parse().map_err(|_| InvalidInput::Amount)?;
            let unit: DateUnit = unit.parse()?;
            Value::from(rfc3339(daybook::add(timestamp, amount, unit, &options)?))
        }
        Command::Within {
            timestamp,
            from,
            to,
        } => Value::from(is_within_range(
            options.parse_timestamp(timestamp)?,
            options.parse_timestamp(from)?,
            options.parse_timestamp(to)?,
        )?),
        Command::Before { timestamp, other } => Value::from(is_date_before(
            options.parse_timestamp(timestamp)?,
            options.parse_timestamp(other)?,
        )),
        Command::SameDay { timestamp, other } => Value::from(is_same_day(
            options.parse_timestamp(timestamp)?,
            options.parse_timestamp(other)?,
            &options,
        )),
        Command::Holidays { year } => {
            let calendar = holidays(*year)?;
            let timestamps = get_holidays(*year, &options).await?;
            let entries: Vec<HolidayEntry> = calendar
                .into_iter()
                .zip(timestamps)
                .map(|(holiday, timestamp)| HolidayEntry {
                    name: holiday.name,
                    date: holiday.date,
                    timestamp,
                })
                .collect();
            serde_json::to_value(entries)?
        }
        Command::IsHoliday { timestamp } => {
            Value::from(is_holiday(options.parse_timestamp(timestamp)?, &options).await?)
        }
        Command::Unique { json } => {
            // JSON values are not hashable; de-duplicate on their canonical text.
            let values = parse_json_array(json)?;
            Value::Array(unique_by_key(&values, |value| canonical(value).to_string()))
        }
        Command::Flatten { json } => {
            let nested: Vec<Nested<Value>> =
                serde_json::from_str(json).context("expected a JSON array")?;
            Value::Array(flatten(&nested))
        }
        Command::Chunk { json, size } => {
            let size = parse_chunk_size(size)?;
            let chunks = chunk(&parse_json_array(json)?, size)?;
            Value::Array(chunks.into_iter().map(Value::Array).collect())
        }
        Command::Password { candidate } => serde_json::to_value(validate_password(candidate))?,
    };

    Ok(value)
}
