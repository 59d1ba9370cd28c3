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


//! All of the checks that occur after the config file and the command line
//! have been merged.

use crate::config::*;
use failure::Error;

impl Settings {
    pub fn validate(mut self) -> Result<ValidatedSettings, Error> {
        fix_version(&mut self.version)?;

        ensure!(
            self.time_step > 0.0 && self.time_step.is_finite(),
            "time-step must be positive (got {})", self.time_step,
        );
        ensure!(self.step_skip > 0, "step-skip must be at least 1");
        ensure!(
            self.reference_temperature > 0.0,
            "reference-temperature must be positive (got {})", self.reference_temperature,
        );
        if let Some(temperatures) = &mut self.temperatures {
            ensure!(!temperatures.is_empty(), "temperatures, when given, must not be empty");
            temperatures.sort();
            temperatures.dedup();
        }

        Ok(ValidatedSettings(self))
    }
}

fn fix_version(it: &mut Option<u32>) -> Result<(), Error> {
    match *it {
        Some(x) if x == 0 || x > MAX_VERSION => {
            bail!("`version: {}` is invalid. (1 <= version <= {})", x, MAX_VERSION);
        },
        None => *it = Some(1),
        _ => {},
    };

    Ok(())
}
