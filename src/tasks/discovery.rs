/* ********************************************************************** **
**  This file is part of aimdx.                                           **
**                                                                        **
**  aimdx is free software: you can redistribute it and/or modify it      **
**  under the terms of the GNU General Public License as published by     **
**  the Free Software Foundation, either version 3 of the License, or     **
**  (at your option) any later version.                                   **
**                                                                        **
**      http://www.gnu.org/licenses/                                      **
**                                                                        **
** Do note that, while the whole of aimdx is licensed under the GPL, many **
** parts of it are licensed under more permissive terms.                  **
** ********************************************************************** */

//! Locating the temperature directories of an AIMD study.
//!
//! A study directory holds one subdirectory per temperature, whose name
//! contains the temperature in Kelvin (`600`, `T_900K`, `1200K_NVT`, ...).

use crate::FailResult;

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;

/// Temperatures outside of `MIN_TEMPERATURE..=MAX_TEMPERATURE` are assumed to
/// be some other number that happens to appear in the name.
pub const MIN_TEMPERATURE: u32 = 100;
pub const MAX_TEMPERATURE: u32 = 1999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperatureDir {
    /// Kelvin.
    pub temperature: u32,
    pub path: PathBuf,
}

#[derive(Debug)]
pub enum DiscoveryError {
    InvalidTemperatureFormat(String),
    AmbiguousTemperature { name: String, candidates: Vec<String> },
    TemperatureOutOfRange { name: String, value: u32 },
    MissingDirectory(PathBuf),
    NoRunDirs(PathBuf),
    NoTemperatureDirs(PathBuf),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::InvalidTemperatureFormat(name) => {
                write!(f, "Invalid temperature format for '{}'.", name)
            },
            DiscoveryError::AmbiguousTemperature { name, candidates } => {
                write!(f, "Ignoring directory: {} - can't confirm temperature (candidates: {}).", name, candidates.join(", "))
            },
            DiscoveryError::TemperatureOutOfRange { name, value } => {
                write!(f, "Found a number '{}' but it does not meet the criteria in the directory: {}", value, name)
            },
            DiscoveryError::MissingDirectory(path) => {
                write!(f, "Temperature directory '{}' does not exist.", path.display())
            },
            DiscoveryError::NoRunDirs(path) => {
                write!(f, "No run directories found inside '{}'.", path.display())
            },
            DiscoveryError::NoTemperatureDirs(path) => {
                write!(f, "No temperature directories found in '{}'.", path.display())
            },
        }
    }
}

impl failure::Fail for DiscoveryError {}

/// Read the temperature encoded in a directory name.
///
/// The name must contain exactly one maximal run of ASCII digits that is
/// three or four digits long and does not start with `0`, and its value must
/// lie in `MIN_TEMPERATURE..=MAX_TEMPERATURE`.
pub fn parse_temperature(name: &str) -> Result<u32, DiscoveryError>
{
    lazy_static! {
        static ref DIGITS: Regex = Regex::new("[0-9]+").expect("valid regex");
    }

    let candidates = {
        DIGITS.find_iter(name)
            .map(|m| m.as_str())
            .filter(|s| (3..=4).contains(&s.len()) && !s.starts_with('0'))
            .collect::<Vec<_>>()
    };

    match candidates[..] {
        [] => Err(DiscoveryError::InvalidTemperatureFormat(name.to_string())),
        [digits] => {
            let value = digits.parse::<u32>().map_err(|_| {
                DiscoveryError::InvalidTemperatureFormat(name.to_string())
            })?;
            match (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
                true => Ok(value),
                false => Err(DiscoveryError::TemperatureOutOfRange { name: name.to_string(), value }),
            }
        },
        _ => Err(DiscoveryError::AmbiguousTemperature {
            name: name.to_string(),
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

/// Every immediate subdirectory of `root` that names a temperature, sorted by
/// temperature.
///
/// When two directories name the same temperature, the first in name order
/// is kept.
pub fn find_temperature_dirs(root: &Path) -> FailResult<Vec<TemperatureDir>>
{
    let mut found: Vec<TemperatureDir> = vec![];
    for (name, path) in aimdx_fs_util::subdirectories(root)? {
        match parse_temperature(&name) {
            Ok(temperature) => {
                if let Some(existing) = found.iter().find(|d| d.temperature == temperature) {
                    warn!(
                        "Ignoring directory: {} - temperature {} K is already provided by {}",
                        name, temperature, existing.path.display(),
                    );
                    continue;
                }
                debug!("Found temperature '{}' in directory: {}", temperature, name);
                found.push(TemperatureDir { temperature, path });
            },
            Err(e@DiscoveryError::InvalidTemperatureFormat(_)) => trace!("{}", e),
            Err(e) => info!("{}", e),
        }
    }

    if found.is_empty() {
        return Err(DiscoveryError::NoTemperatureDirs(root.to_owned()).into());
    }
    found.sort_by_key(|d| d.temperature);
    Ok(found)
}

/// Directories for an explicit list of temperatures.
///
/// Temperatures with no matching directory are reported and left out.
/// The output is sorted and free of duplicates.
pub fn resolve_temperature_dirs(root: &Path, temperatures: &[u32]) -> FailResult<Vec<TemperatureDir>>
{
    let mut wanted = temperatures.to_vec();
    wanted.sort();
    wanted.dedup();

    let available = {
        aimdx_fs_util::subdirectories(root)?.into_iter()
            .filter_map(|(name, path)| {
                parse_temperature(&name).ok().map(|temperature| TemperatureDir { temperature, path })
            })
            .collect::<Vec<_>>()
    };

    let mut out = vec![];
    for temperature in wanted {
        match available.iter().find(|d| d.temperature == temperature) {
            Some(dir) => out.push(dir.clone()),
            None => warn!("Temperature directory for {}K not found.", temperature),
        }
    }

    if out.is_empty() {
        return Err(DiscoveryError::NoTemperatureDirs(root.to_owned()).into());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn names() {
        assert_eq!(parse_temperature("600").unwrap(), 600);
        assert_eq!(parse_temperature("T_1200K").unwrap(), 1200);
        assert_eq!(parse_temperature("run-at-900K-nvt").unwrap(), 900);
        assert_eq!(parse_temperature("100").unwrap(), 100);
        assert_eq!(parse_temperature("1999").unwrap(), 1999);

        match parse_temperature("analysis") {
            Err(DiscoveryError::InvalidTemperatureFormat(_)) => {},
            r => panic!("unexpected: {:?}", r),
        }
        // too long, too short, or zero-padded digit runs never count
        for name in &["12345", "T_60", "0600", "run_1"] {
            match parse_temperature(name) {
                Err(DiscoveryError::InvalidTemperatureFormat(_)) => {},
                r => panic!("{}: unexpected: {:?}", name, r),
            }
        }
        match parse_temperature("2500K") {
            Err(DiscoveryError::TemperatureOutOfRange { value: 2500, .. }) => {},
            r => panic!("unexpected: {:?}", r),
        }
        match parse_temperature("600_to_900") {
            Err(DiscoveryError::AmbiguousTemperature { candidates, .. }) => assert_eq!(candidates, vec!["600", "900"]),
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    fn parse_is_idempotent() {
        for name in &["T_900K", "1500", "nothing", "600_900", "5000"] {
            assert_eq!(
                format!("{:?}", parse_temperature(name)),
                format!("{:?}", parse_temperature(name)),
            );
        }
    }

    fn tree(dirs: &[&str]) -> TempDir {
        let root = TempDir::new("aimdx").unwrap();
        for dir in dirs {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        root
    }

    #[test]
    fn scans_subdirectories() {
        let root = tree(&["1000K", "600K", "T800", "plots", "2500K", "600_900"]);
        // plain files are never candidates
        std::fs::write(root.path().join("700.txt"), "").unwrap();

        let found = find_temperature_dirs(root.path()).unwrap();
        let temps = found.iter().map(|d| d.temperature).collect::<Vec<_>>();
        assert_eq!(temps, vec![600, 800, 1000]);
        assert_eq!(found[0].path, root.path().join("600K"));
    }

    #[test]
    fn duplicates_keep_first_name() {
        let root = tree(&["600K_b", "600K_a"]);
        let found = find_temperature_dirs(root.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, root.path().join("600K_a"));
    }

    #[test]
    fn nothing_found() {
        let root = tree(&["plots", "scripts"]);
        let err = find_temperature_dirs(root.path()).unwrap_err();
        match err.downcast::<DiscoveryError>() {
            Ok(DiscoveryError::NoTemperatureDirs(_)) => {},
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    fn explicit_temperatures() {
        let root = tree(&["600K", "800K", "1000K"]);
        let found = resolve_temperature_dirs(root.path(), &[1000, 600, 700, 600]).unwrap();
        let temps = found.iter().map(|d| d.temperature).collect::<Vec<_>>();
        assert_eq!(temps, vec![600, 1000]);

        assert!(resolve_temperature_dirs(root.path(), &[1500]).is_err());
    }
}
