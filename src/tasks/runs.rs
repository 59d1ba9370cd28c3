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

//! The `run_N` subdirectories of a temperature directory.
//!
//! Each run continues the trajectory of the one before it, so the frames of
//! a temperature are the concatenation of `run_first` through `run_last`.

use crate::discovery::DiscoveryError;
use crate::FailResult;

use std::path::{Path, PathBuf};

use regex::Regex;

pub const TRAJECTORY_FILENAME: &str = "XDATCAR";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunZeroPolicy {
    Include,
    /// `run_0` is often a separate equilibration run.
    Exclude,
}

/// An inclusive range of run indices.  Gaps are not checked for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RunRange {
    pub first: u32,
    pub last: u32,
}

impl RunRange {
    pub fn iter(&self) -> impl Iterator<Item=u32>
    { self.first..=self.last }

    pub fn len(&self) -> usize
    { (self.last - self.first) as usize + 1 }

    /// `dir/run_N/XDATCAR` for every run in the range, in order.
    pub fn xdatcar_paths(&self, dir: &Path) -> Vec<PathBuf>
    {
        self.iter()
            .map(|index| dir.join(format!("run_{}", index)).join(TRAJECTORY_FILENAME))
            .collect()
    }
}

/// The `N` of a directory named like `run_N`.
pub fn parse_run_index(name: &str) -> Option<u32>
{
    lazy_static! {
        static ref RUN: Regex = Regex::new("run_([0-9]+)").expect("valid regex");
    }
    RUN.captures(name)?.get(1)?.as_str().parse().ok()
}

/// The smallest and largest run index under a temperature directory.
pub fn find_run_range(temperature_dir: &Path, policy: RunZeroPolicy) -> FailResult<RunRange>
{
    if !temperature_dir.is_dir() {
        return Err(DiscoveryError::MissingDirectory(temperature_dir.to_owned()).into());
    }

    let indices = {
        aimdx_fs_util::subdirectories(temperature_dir)?.iter()
            .filter_map(|(name, _)| parse_run_index(name))
            .filter(|&index| !(index == 0 && policy == RunZeroPolicy::Exclude))
            .collect::<Vec<_>>()
    };

    match (indices.iter().min(), indices.iter().max()) {
        (Some(&first), Some(&last)) => {
            trace!("{}: runs {} to {}", temperature_dir.display(), first, last);
            Ok(RunRange { first, last })
        },
        _ => Err(DiscoveryError::NoRunDirs(temperature_dir.to_owned()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn indices() {
        assert_eq!(parse_run_index("run_0"), Some(0));
        assert_eq!(parse_run_index("run_12"), Some(12));
        assert_eq!(parse_run_index("old_run_3_backup"), Some(3));
        assert_eq!(parse_run_index("run-3"), None);
        assert_eq!(parse_run_index("run_"), None);
        assert_eq!(parse_run_index("analysis"), None);
    }

    fn temperature_dir(runs: &[&str]) -> TempDir {
        let root = TempDir::new("aimdx").unwrap();
        for run in runs {
            std::fs::create_dir(root.path().join(run)).unwrap();
        }
        root
    }

    #[test]
    fn min_and_max() {
        let dir = temperature_dir(&["run_10", "run_2", "run_0", "run_7", "plots"]);
        let range = find_run_range(dir.path(), RunZeroPolicy::Include).unwrap();
        assert_eq!(range, RunRange { first: 0, last: 10 });
        assert_eq!(range.len(), 11);

        let range = find_run_range(dir.path(), RunZeroPolicy::Exclude).unwrap();
        assert_eq!(range, RunRange { first: 2, last: 10 });
    }

    #[test]
    fn files_are_not_runs() {
        let dir = temperature_dir(&["run_1"]);
        std::fs::write(dir.path().join("run_5"), "").unwrap();
        assert_eq!(find_run_range(dir.path(), RunZeroPolicy::Include).unwrap(), RunRange { first: 1, last: 1 });
    }

    #[test]
    fn no_runs() {
        let dir = temperature_dir(&["run_0", "plots"]);
        let err = find_run_range(dir.path(), RunZeroPolicy::Exclude).unwrap_err();
        match err.downcast::<DiscoveryError>() {
            Ok(DiscoveryError::NoRunDirs(_)) => {},
            r => panic!("unexpected: {:?}", r),
        }

        let err = find_run_range(&dir.path().join("nope"), RunZeroPolicy::Include).unwrap_err();
        match err.downcast::<DiscoveryError>() {
            Ok(DiscoveryError::MissingDirectory(_)) => {},
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    fn paths_are_inclusive() {
        let paths = RunRange { first: 1, last: 3 }.xdatcar_paths(Path::new("600K"));
        assert_eq!(paths, vec![
            PathBuf::from("600K/run_1/XDATCAR"),
            PathBuf::from("600K/run_2/XDATCAR"),
            PathBuf::from("600K/run_3/XDATCAR"),
        ]);
    }
}
