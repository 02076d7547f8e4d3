mod command;
mod coverage;

pub use command::{CommandOracle, DEFAULT_ANALYSIS_COMMAND, DEFAULT_MEASUREMENT_COMMAND};
pub use coverage::parse_coverage;
