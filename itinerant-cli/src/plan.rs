//! Plan command implementation for the Itinerant CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use itinerant_core::{InMemoryPlaceSource, ItineraryOutput, Place, PlanRequest, Planner, PlannerConfig};
use itinerant_planner::ItineraryPlanner;
use itinerant_scorer::PlaceScoreCalculator;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::files::{file_is_file, open_utf8_file, write_utf8_file};
use crate::{
    ARG_PLAN_CANDIDATES, ARG_PLAN_OUTPUT, ARG_PLAN_PLANNER_CONFIG, ARG_PLAN_REQUEST, ARG_PLAN_SEED,
    CliError, ENV_PLAN_CANDIDATES, ENV_PLAN_REQUEST,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a trip from a JSON-encoded PlanRequest and a JSON array \
                 of candidate places for the destination. The itinerary is \
                 printed as JSON unless --output names a file.",
    about = "Plan a multi-day itinerary"
)]
#[ortho_config(prefix = "ITINERANT")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file containing a PlanRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to a JSON array of candidate places.
    #[arg(long = ARG_PLAN_CANDIDATES, value_name = "path")]
    #[serde(default)]
    pub(crate) candidates: Option<Utf8PathBuf>,
    /// Write the itinerary here instead of stdout.
    #[arg(long = ARG_PLAN_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// JSON file overriding planner tunables.
    #[arg(long = ARG_PLAN_PLANNER_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) planner_config: Option<Utf8PathBuf>,
    /// Override the request's clustering seed.
    #[arg(long = ARG_PLAN_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) candidates: Utf8PathBuf,
    pub(crate) output: Option<Utf8PathBuf>,
    pub(crate) planner_config: Option<Utf8PathBuf>,
    pub(crate) seed: Option<u64>,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.request_path, ARG_PLAN_REQUEST)?;
        Self::require_existing(&self.candidates, ARG_PLAN_CANDIDATES)?;
        if let Some(path) = &self.planner_config {
            Self::require_existing(path, ARG_PLAN_PLANNER_CONFIG)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_REQUEST,
            env: ENV_PLAN_REQUEST,
        })?;
        let candidates = args.candidates.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_CANDIDATES,
            env: ENV_PLAN_CANDIDATES,
        })?;
        Ok(Self {
            request_path,
            candidates,
            output: args.output,
            planner_config: args.planner_config,
            seed: args.seed,
        })
    }
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &mut stdout)
}

/// Run `plan`, sending the itinerary to `writer` unless an output path is
/// configured.
pub(crate) fn run_plan_with(args: PlanArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let itinerary = execute_plan(&config)?;
    let mut payload =
        serde_json::to_string_pretty(&itinerary).map_err(CliError::SerialiseItinerary)?;
    payload.push('\n');
    match &config.output {
        Some(path) => {
            write_utf8_file(path, payload.as_bytes()).map_err(|source| {
                CliError::WriteItinerary {
                    target: path.to_string(),
                    source,
                }
            })?;
            info!("wrote itinerary to {path}");
            Ok(())
        }
        None => writer
            .write_all(payload.as_bytes())
            .map_err(|source| CliError::WriteItinerary {
                target: "stdout".to_owned(),
                source,
            }),
    }
}

pub(crate) fn execute_plan(config: &PlanConfig) -> Result<ItineraryOutput, CliError> {
    let mut request: PlanRequest = load_json(&config.request_path, ARG_PLAN_REQUEST)?;
    if let Some(seed) = config.seed {
        request.seed = seed;
    }
    let candidates: Vec<Place> = load_json(&config.candidates, ARG_PLAN_CANDIDATES)?;
    let tunables = match &config.planner_config {
        Some(path) => load_json(path, ARG_PLAN_PLANNER_CONFIG)?,
        None => PlannerConfig::default(),
    };
    info!(
        "planning {} with {} candidate(s)",
        request.trip.destination,
        candidates.len()
    );
    let planner = ItineraryPlanner::with_config(
        InMemoryPlaceSource::with_places(candidates),
        PlaceScoreCalculator::default(),
        tunables,
    );
    planner.plan(&request).map_err(CliError::from)
}

/// Decode the JSON document at `path`.
pub(crate) fn load_json<T: DeserializeOwned>(
    path: &Utf8Path,
    field: &'static str,
) -> Result<T, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
