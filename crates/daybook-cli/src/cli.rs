use clap::{Parser, Subcommand};

/// Date, array and password utilities. Every command prints one JSON value.
#[derive(Parser, Debug)]
#[command(name = "daybook", version, about)]
pub struct Cli {
    /// IANA timezone used for calendar dates (year, day, midnight).
    #[arg(long, global = true, env = "DAYBOOK_TZ", default_value = "UTC")]
    pub tz: String,

    /// Freeze "now" at this timestamp instead of reading the system clock.
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// Simulated holiday lookup latency, in milliseconds.
    #[arg(long, global = true, default_value_t = 100)]
    pub holiday_delay_ms: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current calendar year.
    Year,

    /// Shift a timestamp by an amount of some unit.
    Add {
        timestamp: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// days, weeks, months, years, hours, minutes, seconds, milliseconds.
        #[arg(long, default_value = "days")]
        unit: String,
    },

    /// Whether a timestamp lies strictly between two others.
    Within {
        timestamp: String,
        from: String,
        to: String,
    },

    /// Whether a timestamp is strictly earlier than another.
    Before { timestamp: String, other: String },

    /// Whether two timestamps share a calendar date.
    SameDay { timestamp: String, other: String },

    /// List the holidays of a year.
    Holidays {
        #[arg(allow_hyphen_values = true)]
        year: i32,
    },

    /// Whether a timestamp falls on a holiday.
    IsHoliday { timestamp: String },

    /// Remove duplicates from a JSON array, keeping first occurrences.
    Unique { json: String },

    /// Flatten a nested JSON array.
    Flatten { json: String },

    /// Split a JSON array into chunks.
    Chunk {
        json: String,
        #[arg(allow_hyphen_values = true)]
        size: String,
    },

    /// Validate a password against the strength rules.
    Password { candidate: String },
}
