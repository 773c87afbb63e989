//! Value objects - slash commands and the away-time policy

mod away_policy;
mod command;

pub use away_policy::{
    next_day_boundary, seconds_until, seconds_until_next_day_boundary, NEXT_DAY_BOUNDARY_HOURS,
};
pub use command::{AwayArgs, Command, DEFAULT_LUNCH_MINUTES};
