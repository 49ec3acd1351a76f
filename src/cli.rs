use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser};

use crate::archive::Month;
use crate::tz::Zone;

/// Average rating change per hour of the day, per time class, from a
/// chess.com player's game archives.
#[derive(Parser, Debug)]
#[command(name = "chesstime", version)]
pub struct Cli {
    /// chess.com username
    #[arg(env = "CHESSTIME_USER")]
    pub user: String,

    /// Start from this month (inclusive).
    #[arg(long, alias = "from", value_name = "YYYY-MM")]
    pub since: Option<Month>,

    /// Stop after this month (inclusive).
    #[arg(long, value_name = "YYYY-MM")]
    pub until: Option<Month>,

    /// Skip this month; repeatable. Only honoured when a bound is set
    /// (--since, --until or --switch-at).
    #[arg(long = "exclude", value_name = "YYYY-MM")]
    pub excludes: Vec<Month>,

    /// Timezone games were played in: "UTC", "+05:30", "America/Denver".
    /// Defaults to the config file's `timezone`.
    #[arg(long, value_name = "ZONE", allow_hyphen_values = true)]
    pub tz: Option<Zone>,

    /// Date the player moved to --tz-after; halves are averaged.
    #[arg(long, value_name = "YYYY-MM-DD", requires = "tz_after")]
    pub switch_at: Option<NaiveDate>,

    /// Timezone in effect from --switch-at onwards.
    #[arg(long, value_name = "ZONE", requires = "switch_at", allow_hyphen_values = true)]
    pub tz_after: Option<Zone>,

    /// Output .dat file, "-" for stdout.
    #[arg(short, long, default_value = "perf.dat")]
    pub out: PathBuf,

    #[arg(long, env = "CHESSTIME_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Print the selected archives and exit without fetching games.
    #[arg(long)]
    pub list: bool,

    /// -v debug, -vv trace (RUST_LOG overrides).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
