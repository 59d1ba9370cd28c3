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

//! Everything between the command line and the diffusion analysis.

#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate aimdx_clap;
#[cfg(test)] #[macro_use] extern crate aimdx_assert_close;

pub type FailResult<T> = Result<T, ::failure::Error>;

pub mod discovery;
pub mod runs;
pub mod pipeline;
pub mod entry_points;

mod ui;

pub use crate::discovery::{DiscoveryError, TemperatureDir};
pub use crate::pipeline::{run_conductivity, Summary, TemperatureResult};
pub use crate::runs::{RunRange, RunZeroPolicy};
pub use crate::ui::logging::{DelayedLogFile, GlobalLogger};
