//! # daybook
//!
//! Small, deterministic utility functions.
//!
//! Every operation is an independent entry point with no shared state. Date
//! operations take their "now" from an injected [`Clock`] and their calendar
//! timezone from [`DateOptions`], so tests never depend on the host clock or
//! zone.
//!
//! ## Modules
//!
//! - [`date`] — Date arithmetic, range and day comparisons, holiday lookup
//! - [`array`] — `unique`, `unique_by_key`, `flatten`, `chunk`
//! - [`password`] — Rule-based password validation
//! - [`clock`] — The clock capability and its system/fixed implementations
//! - [`error`] — Error types

pub mod array;
pub mod clock;
pub mod date;
pub mod error;
pub mod password;

pub use array::{chunk, flatten, unique, unique_by_key, Nested};
pub use clock::{Clock, FixedClock, SystemClock};
pub use date::{
    add, add_days, current_year, get_holidays, holidays, is_date_before, is_holiday,
    is_same_day, is_within_range, DateOptions, DateUnit, Holiday, HOLIDAY_LOOKUP_DELAY,
};
pub use error::InvalidInput;
pub use password::{validate_password, PasswordRule, PasswordValidation};
