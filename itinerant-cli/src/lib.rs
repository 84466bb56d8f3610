//! Command-line interface for the Itinerant trip planner.
//!
//! The `plan` subcommand reads a JSON [`PlanRequest`](itinerant_core::PlanRequest)
//! and a JSON candidate pool, runs the default planner and emits the
//! itinerary as JSON. Options layer from CLI flags, `ITINERANT_*`
//! environment variables and configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod files;
mod plan;

pub use error::CliError;

use plan::PlanArgs;

pub(crate) const ARG_PLAN_REQUEST: &str = "request";
pub(crate) const ARG_PLAN_CANDIDATES: &str = "candidates";
pub(crate) const ARG_PLAN_OUTPUT: &str = "output";
pub(crate) const ARG_PLAN_PLANNER_CONFIG: &str = "planner-config";
pub(crate) const ARG_PLAN_SEED: &str = "seed";
pub(crate) const ENV_PLAN_REQUEST: &str = "ITINERANT_CMDS_PLAN_REQUEST_PATH";
pub(crate) const ENV_PLAN_CANDIDATES: &str = "ITINERANT_CMDS_PLAN_CANDIDATES";

/// Run the Itinerant CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, an
/// input cannot be read, planning fails or the itinerary cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => plan::run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "itinerant",
    about = "Plan multi-day travel itineraries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a day-by-day itinerary from a request and a candidate pool.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
