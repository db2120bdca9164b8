//! Configuration file loading.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use quiz_defence_core::CellCoord;
use quiz_defence_session::SessionConfig;
use serde::Deserialize;

/// Contents of a `--config` TOML document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    /// Simulation tunables.
    pub(crate) session: SessionConfig,
    /// Scripted player behaviour.
    pub(crate) autopilot: AutopilotConfig,
}

/// How the scripted player builds.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct AutopilotConfig {
    /// Cells tried in order, as `[column, row]` pairs.
    pub(crate) build_cells: Vec<[u32; 2]>,
    /// Frames between two build attempts.
    pub(crate) frames_between_builds: u32,
    /// Experience spent to unlock the ice tower.
    pub(crate) ice_unlock_cost: u32,
}

impl AutopilotConfig {
    pub(crate) fn cells(&self) -> Vec<CellCoord> {
        self.build_cells
            .iter()
            .map(|&[column, row]| CellCoord::new(column, row))
            .collect()
    }
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            build_cells: vec![
                [1, 0],
                [3, 2],
                [6, 3],
                [5, 5],
                [9, 3],
                [12, 3],
                [16, 5],
                [11, 8],
                [6, 8],
                [3, 9],
            ],
            frames_between_builds: 90,
            ice_unlock_cost: 50,
        }
    }
}

/// Reads the configuration file, or returns the defaults when none is given.
pub(crate) fn load(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(text: &str) -> Result<CliConfig> {
    toml::from_str(text).context("failed to parse TOML")
}
