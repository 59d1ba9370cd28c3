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


//! Structure types shared by the trajectory reader and the diffusion analysis.
//!
//! A row-based [`Lattice`], fractional [`Frame`]s, and a [`Trajectory`]
//! that owns the per-site element list.

#[macro_use] extern crate failure;
#[macro_use] extern crate lazy_static;
#[cfg(test)] #[macro_use] extern crate aimdx_assert_close;

mod core;
mod element;
mod species;
mod util;

//---------------------------
// public reexports; API

pub use crate::core::lattice::Lattice;
pub use crate::core::trajectory::{Frame, Trajectory, TrajectoryMismatch};

pub use crate::element::{Element, ElementParseError};
pub use crate::species::{Species, SpeciesParseError};
