/* ************************************************************************ **
** This file is part of aimdx, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of aimdx is provided under this permissive         **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */


//! Settings for the conductivity pipeline.
//!
//! Every field has a default, so an empty file (or no file at all) is valid.
//! Command line flags are applied on top of whatever is read here.

// NOTE: Please make sure to use the YamlRead trait when deserializing these types!

#![allow(non_snake_case)]

use crate::YamlRead;
use serde::de;
use std::path::PathBuf;

pub use aimdx_diffusion::Smoothing;

pub const MAX_VERSION: u32 = 1;

/// Root settings object, after validation.
///
/// This is what you should deserialize.
#[derive(Serialize)]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings(pub Settings);

/// Raw deserialized form of settings.
///
/// Call [`Settings::validate`] (or deserialize `ValidatedSettings`) before use.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Identifies the version of the settings that this file uses.
    ///
    /// If not specified, assumes a value of 1.
    #[serde(default)]
    pub version: Option<u32>,

    /// Log of the results.  Appended to, never truncated.
    #[serde(default="settings__outfile")]
    pub outfile: PathBuf,

    /// Simulation time step in fs.
    #[serde(default="settings__time_step")]
    pub time_step: f64,

    /// Frames dropped from the start of each temperature's trajectory.
    #[serde(default="settings__ballistic_skip")]
    pub ballistic_skip: usize,

    /// Ionic steps between consecutive frames of the XDATCAR.
    #[serde(default="settings__step_skip")]
    pub step_skip: usize,

    #[serde(default)]
    pub smoothed: Smoothing,

    /// Temperatures to analyze.  `None` scans the working directory instead.
    #[serde(default)]
    pub temperatures: Option<Vec<u32>>,

    /// Leave out `run_0` (usually equilibration) when collecting runs.
    #[serde(default)]
    pub skip_run_zero: bool,

    /// Abort on the first temperature that cannot be analyzed, instead of
    /// skipping it.
    #[serde(default)]
    pub strict: bool,

    /// Temperature (K) at which the conductivity is extrapolated.
    #[serde(default="settings__reference_temperature")]
    pub reference_temperature: f64,
}
derive_yaml_read!{Settings}
derive_yaml_read!{ValidatedSettings}

fn settings__outfile() -> PathBuf { "conductivity.txt".into() }
fn settings__time_step() -> f64 { 2.0 }
fn settings__ballistic_skip() -> usize { 50 }
fn settings__step_skip() -> usize { 1 }
fn settings__reference_temperature() -> f64 { 300.0 }

impl Default for Settings {
    fn default() -> Self { crate::from_empty_mapping().expect("all settings have defaults") }
}

impl<'de> de::Deserialize<'de> for ValidatedSettings {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cereal: Settings = de::Deserialize::deserialize(deserializer)?;

        cereal.validate().map_err(de::Error::custom)
    }
}

impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Settings { &self.0 }
}
