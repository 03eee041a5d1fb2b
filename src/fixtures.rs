//! Fixtures
//!
//! Cart scenarios stored as YAML. A scenario is a [`CartInput`] with an optional description and
//! an optional expected outcome used to check the calculation against.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{input::CartInput, solvers::Strategy, strategy::StrategyResult};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Outcome a scenario expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExpectedOutcome {
    /// Whether splitting into two orders should be recommended
    #[serde(default)]
    pub split: bool,

    /// Expected final payment
    pub final_pay: i64,

    /// Expected amount saved against the baseline
    pub saved: i64,
}

impl ExpectedOutcome {
    /// Whether a result matches this expectation.
    pub fn is_met_by(&self, result: &StrategyResult) -> bool {
        let strategy = if self.split {
            Strategy::SplitOrder
        } else {
            Strategy::SingleOrder
        };

        result.chosen == strategy && result.final_pay == self.final_pay && result.saved == self.saved
    }
}

/// A cart scenario.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScenarioFixture {
    /// What the scenario shows
    #[serde(default)]
    pub description: Option<String>,

    /// The calculation request
    #[serde(flatten)]
    pub input: CartInput,

    /// Expected outcome, if the scenario records one
    #[serde(default)]
    pub expected: Option<ExpectedOutcome>,
}

/// Parse a scenario from YAML.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or doesn't describe a scenario.
pub fn parse_scenario(contents: &str) -> Result<ScenarioFixture, FixtureError> {
    Ok(serde_norway::from_str(contents)?)
}

/// Load a scenario from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_scenario_file(path: impl AsRef<Path>) -> Result<ScenarioFixture, FixtureError> {
    let contents = fs::read_to_string(path)?;

    parse_scenario(&contents)
}

/// Named scenarios under a fixtures directory.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Fixtures under `./fixtures`
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Fixtures under a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Path of the named scenario file.
    pub fn scenario_path(&self, name: &str) -> PathBuf {
        self.base_path.join("scenarios").join(format!("{name}.yml"))
    }

    /// Load the named scenario from `scenarios/{name}.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_scenario(&self, name: &str) -> Result<ScenarioFixture, FixtureError> {
        load_scenario_file(self.scenario_path(name))
    }
}
