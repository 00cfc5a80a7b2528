//! Calendar-day date utilities.
//!
//! Pure functions over `DateTime<Utc>` instants, plus an asynchronous
//! holiday lookup. Every calendar projection (which year, which day, where
//! midnight falls) happens in the single timezone carried by
//! [`DateOptions`], so results do not depend on the host's local zone.
//!
//! # Functions
//!
//! - [`current_year`] — Calendar year of "now", read from a [`Clock`]
//! - [`add`] / [`add_days`] — Shift an instant by whole calendar units or exact sub-day units
//! - [`is_within_range`] — Strict (exclusive) range containment
//! - [`is_date_before`] — Strict chronological ordering
//! - [`is_same_day`] — Calendar-date equality, ignoring time of day
//! - [`holidays`] — The fixed holiday calendar for a year
//! - [`get_holidays`] / [`is_holiday`] — Deferred holiday lookup and test
//!
//! Validation failures are reported as [`InvalidInput`] and are never
//! retried or logged away.

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, Months, NaiveDate, NaiveDateTime,
    Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::error::{InvalidInput, Result};

/// How long [`get_holidays`] suspends before resolving, unless overridden.
pub const HOLIDAY_LOOKUP_DELAY: StdDuration = StdDuration::from_millis(100);

// ── Options ─────────────────────────────────────────────────────────────────

/// Settings shared by the calendar-aware operations.
#[derive(Debug, Clone, PartialEq)]
pub struct DateOptions {
    /// Timezone used for every calendar projection.
    pub timezone: Tz,
    /// Suspension before a holiday lookup resolves.
    pub holiday_delay: StdDuration,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            holiday_delay: HOLIDAY_LOOKUP_DELAY,
        }
    }
}

impl DateOptions {
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_holiday_delay(mut self, delay: StdDuration) -> Self {
        self.holiday_delay = delay;
        self
    }

    /// Parse a timestamp from text.
    ///
    /// Accepted forms, tried in order:
    ///
    /// - RFC 3339 (`2024-12-25T15:30:00Z`, `2024-12-25T10:30:00-05:00`)
    /// - Local wall-clock time (`2024-12-25T15:30`, `2024-12-25T15:30:00.250`)
    /// - Local date (`2024-12-25`), read as midnight
    ///
    /// Local forms are interpreted in [`DateOptions::timezone`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::Date`] for anything else. A local time that
    /// falls in a spring-forward gap is moved past the gap, not rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use daybook::date::DateOptions;
    ///
    /// let options = DateOptions::default();
    /// let ts = options.parse_timestamp("2024-12-25").unwrap();
    /// assert_eq!(ts.to_rfc3339(), "2024-12-25T00:00:00+00:00");
    /// assert!(options.parse_timestamp("invalid").is_err());
    /// ```
    pub fn parse_timestamp(&self, s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return self.resolve_local(naive, None);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return self.local_midnight(date);
        }

        Err(InvalidInput::Date)
    }

    /// Midnight at the start of `date` in the calendar timezone.
    ///
    /// In zones that skip midnight (spring-forward at 00:00) this is the
    /// first instant of the day, e.g. 01:00.
    pub fn local_midnight(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        self.resolve_local(date.and_time(chrono::NaiveTime::MIN), None)
    }

    /// Map a wall-clock time to an instant.
    ///
    /// An ambiguous time (DST fall-back) takes the occurrence whose UTC
    /// offset is `prefer`, else the earlier one. A skipped time
    /// (spring-forward) is read with the offset in effect before the
    /// transition, which moves it forward by the length of the gap.
    fn resolve_local(
        &self,
        naive: NaiveDateTime,
        prefer: Option<FixedOffset>,
    ) -> Result<DateTime<Utc>> {
        let resolved = match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(a, b) => {
                let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
                match prefer {
                    Some(offset) if later.offset().fix() == offset => later,
                    _ => earlier,
                }
            }
            LocalResult::None => return self.resolve_skipped(naive),
        };
        Ok(resolved.with_timezone(&Utc))
    }

    fn resolve_skipped(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
        let before = naive
            .checked_sub_signed(Duration::days(1))
            .ok_or(InvalidInput::Date)?;
        let offset = self.timezone.offset_from_utc_datetime(&before).fix();
        naive
            .checked_sub_signed(Duration::seconds(offset.local_minus_utc().into()))
            .map(|utc| utc.and_utc())
            .ok_or(InvalidInput::Date)
    }

    fn calendar_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.timezone).date_naive()
    }
}

// ── Duration units ──────────────────────────────────────────────────────────

/// The granularity of a date-arithmetic offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    #[default]
    Days,
    Weeks,
    Months,
    Years,
}

impl DateUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DateUnit::Milliseconds => "milliseconds",
            DateUnit::Seconds => "seconds",
            DateUnit::Minutes => "minutes",
            DateUnit::Hours => "hours",
            DateUnit::Days => "days",
            DateUnit::Weeks => "weeks",
            DateUnit::Months => "months",
            DateUnit::Years => "years",
        }
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateUnit {
    type Err = InvalidInput;

    /// Accepts singular, plural and short forms, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "millisecond" | "milliseconds" | "ms" => Ok(DateUnit::Milliseconds),
            "second" | "seconds" | "s" => Ok(DateUnit::Seconds),
            "minute" | "minutes" | "m" => Ok(DateUnit::Minutes),
            "hour" | "hours" | "h" => Ok(DateUnit::Hours),
            "day" | "days" | "d" => Ok(DateUnit::Days),
            "week" | "weeks" | "w" => Ok(DateUnit::Weeks),
            "month" | "months" | "mo" => Ok(DateUnit::Months),
            "year" | "years" | "y" => Ok(DateUnit::Years),
            _ => Err(InvalidInput::Unit),
        }
    }
}

// ── current_year ────────────────────────────────────────────────────────────

/// The calendar year of the clock's current instant, in the calendar timezone.
///
/// The clock is read on every call.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use daybook::clock::FixedClock;
/// use daybook::date::{current_year, DateOptions};
///
/// let clock = FixedClock::new(Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap());
/// assert_eq!(current_year(&clock, &DateOptions::default()), 1999);
/// ```
pub fn current_year<C: Clock + ?Sized>(clock: &C, options: &DateOptions) -> i32 {
    clock.now().with_timezone(&options.timezone).year()
}

// ── add ─────────────────────────────────────────────────────────────────────

/// Shift `timestamp` by `amount` units of `unit`.
///
/// # Arithmetic
///
/// - Sub-day units (`milliseconds` through `hours`) are exact elapsed time,
///   rounded to the millisecond.
/// - Calendar units (`days`, `weeks`, `months`, `years`) move the wall-clock
///   date in the calendar timezone and keep the time of day. The count is
///   rounded half away from zero, so `1.5` days is two days. Month and year
///   steps clamp to the end of a shorter month.
/// - A shifted wall-clock time that occurs twice keeps the input's UTC
///   offset when it can. One that the timezone skips moves forward by the
///   length of the gap (02:30 on a spring-forward day becomes 03:30).
///
/// Negative amounts subtract; a count that rounds to zero returns the same
/// instant.
///
/// # Errors
///
/// - [`InvalidInput::Amount`] if `amount` is NaN or infinite
/// - [`InvalidInput::Date`] if the result leaves the representable range
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use daybook::date::{add, DateOptions, DateUnit};
///
/// let jan_31 = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
/// let feb = add(jan_31, 1.0, DateUnit::Months, &DateOptions::default()).unwrap();
/// assert_eq!(feb, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
/// ```
pub fn add(
    timestamp: DateTime<Utc>,
    amount: f64,
    unit: DateUnit,
    options: &DateOptions,
) -> Result<DateTime<Utc>> {
    if !amount.is_finite() {
        return Err(InvalidInput::Amount);
    }
    trace!(%timestamp, amount, %unit, "shifting timestamp");

    match unit {
        DateUnit::Milliseconds | DateUnit::Seconds | DateUnit::Minutes | DateUnit::Hours => {
            let scale = match unit {
                DateUnit::Milliseconds => 1.0,
                DateUnit::Seconds => 1_000.0,
                DateUnit::Minutes => 60_000.0,
                _ => 3_600_000.0,
            };
            let millis = round_to_i64(amount * scale)?;
            let delta = Duration::try_milliseconds(millis).ok_or(InvalidInput::Date)?;
            timestamp
                .checked_add_signed(delta)
                .ok_or(InvalidInput::Date)
        }
        DateUnit::Days | DateUnit::Weeks => {
            let factor = if unit == DateUnit::Weeks { 7.0 } else { 1.0 };
            let days = round_to_i64(amount * factor)?;
            if days == 0 {
                return Ok(timestamp);
            }
            let delta = Duration::try_days(days).ok_or(InvalidInput::Date)?;
            shift_wall_clock(timestamp, options, |local| local.checked_add_signed(delta))
        }
        DateUnit::Months | DateUnit::Years => {
            let factor = if unit == DateUnit::Years { 12.0 } else { 1.0 };
            let months = round_to_i64(amount * factor)?;
            if months == 0 {
                return Ok(timestamp);
            }
            let step = u32::try_from(months.unsigned_abs())
                .map(Months::new)
                .map_err(|_| InvalidInput::Date)?;
            shift_wall_clock(timestamp, options, |local| {
                if months >= 0 {
                    local.checked_add_months(step)
                } else {
                    local.checked_sub_months(step)
                }
            })
        }
    }
}

/// [`add`] with the default unit, days.
pub fn add_days(
    timestamp: DateTime<Utc>,
    amount: f64,
    options: &DateOptions,
) -> Result<DateTime<Utc>> {
    add(timestamp, amount, DateUnit::Days, options)
}

/// Round half away from zero into an `i64`, rejecting magnitudes that do not fit.
fn round_to_i64(value: f64) -> Result<i64> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
        return Err(InvalidInput::Date);
    }
    Ok(rounded as i64)
}

/// Apply `shift` to the local wall-clock time and map the result back to UTC.
fn shift_wall_clock(
    timestamp: DateTime<Utc>,
    options: &DateOptions,
    shift: impl FnOnce(NaiveDateTime) -> Option<NaiveDateTime>,
) -> Result<DateTime<Utc>> {
    let local = timestamp.with_timezone(&options.timezone);
    let shifted = shift(local.naive_local()).ok_or(InvalidInput::Date)?;
    options.resolve_local(shifted, Some(local.offset().fix()))
}

// ── comparisons ─────────────────────────────────────────────────────────────

/// Whether `timestamp` lies strictly between `from` and `to`.
///
/// Both boundaries are excluded. `from == to` is a valid, empty range.
///
/// # Errors
///
/// Returns [`InvalidInput::Range`] if `from` is after `to`.
pub fn is_within_range(
    timestamp: DateTime<Utc>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<bool> {
    if from > to {
        return Err(InvalidInput::Range);
    }
    Ok(from < timestamp && timestamp < to)
}

/// Whether `timestamp` is strictly earlier than `compare`.
pub fn is_date_before(timestamp: DateTime<Utc>, compare: DateTime<Utc>) -> bool {
    timestamp < compare
}

/// Whether both instants fall on the same calendar date in the calendar timezone.
pub fn is_same_day(timestamp: DateTime<Utc>, compare: DateTime<Utc>, options: &DateOptions) -> bool {
    options.calendar_date(timestamp) == options.calendar_date(compare)
}

// ── holidays ────────────────────────────────────────────────────────────────

/// A named fixed-date holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub name: &'static str,
    pub date: NaiveDate,
}

/// (name, month, day), in calendar order.
const FIXED_HOLIDAYS: [(&str, u32, u32); 3] = [
    ("New Year's Day", 1, 1),
    ("Christmas Day", 12, 25),
    ("New Year's Eve", 12, 31),
];

/// The holiday calendar for `year`: New Year's Day, Christmas Day, New Year's Eve.
///
/// # Errors
///
/// Returns [`InvalidInput::Year`] if `year` is outside the supported date range.
pub fn holidays(year: i32) -> Result<Vec<Holiday>> {
    FIXED_HOLIDAYS
        .iter()
        .map(|&(name, month, day)| {
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|date| Holiday { name, date })
                .ok_or(InvalidInput::Year)
        })
        .collect()
}

/// Look up the holidays of `year` as local-midnight instants.
///
/// The lookup suspends for [`DateOptions::holiday_delay`] on the tokio timer
/// before resolving, so it must be awaited inside a tokio runtime. The result
/// is always ordered Jan 1, Dec 25, Dec 31. Dropping the future early has no
/// side effects.
///
/// # Errors
///
/// Returns [`InvalidInput::Year`] for an unsupported year. A holiday whose
/// midnight the timezone skips starts at its first instant instead.
/// Errors are returned on the first poll, before any suspension.
pub async fn get_holidays(year: i32, options: &DateOptions) -> Result<Vec<DateTime<Utc>>> {
    let resolved = holidays(year)?
        .iter()
        .map(|holiday| options.local_midnight(holiday.date))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        year,
        timezone = %options.timezone,
        delay_ms = options.holiday_delay.as_millis() as u64,
        "holiday lookup started"
    );
    tokio::time::sleep(options.holiday_delay).await;
    debug!(year, count = resolved.len(), "holiday lookup resolved");

    Ok(resolved)
}

/// Whether `timestamp` falls on one of its year's holidays.
///
/// Suspends through [`get_holidays`].
pub async fn is_holiday(timestamp: DateTime<Utc>, options: &DateOptions) -> Result<bool> {
    let year = options.calendar_date(timestamp).year();
    let holidays = get_holidays(year, options).await?;
    Ok(holidays
        .iter()
        .any(|&holiday| is_same_day(timestamp, holiday, options)))
}
