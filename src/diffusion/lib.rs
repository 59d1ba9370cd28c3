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


//! Diffusion analysis of a molecular dynamics trajectory.
//!
//! [`DiffusionAnalyzer`] turns the frames of a single temperature into a
//! mean squared displacement curve and a diffusivity.  The free functions
//! combine diffusivities from several temperatures into an Arrhenius fit
//! and an extrapolated ionic conductivity.

#[macro_use] extern crate failure;
#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;
#[cfg(test)] #[macro_use] extern crate aimdx_assert_close;

pub type FailResult<T> = Result<T, ::failure::Error>;

pub mod constants;

mod analyzer;
mod arrhenius;
mod conductivity;
mod displacements;
mod lstsq;

pub use crate::analyzer::{AnalysisError, AnalyzerSettings, DiffusionAnalyzer, Smoothing};
pub use crate::arrhenius::{ArrheniusFit, fit_arrhenius, extrapolated_diffusivity};
pub use crate::conductivity::{ReferenceStructure, conversion_factor, extrapolated_conductivity};
pub use crate::displacements::unwrapped_displacements;
