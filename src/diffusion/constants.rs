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


//! CODATA 2018 values, in SI units unless noted.

/// Boltzmann constant (J/K).
pub const BOLTZMANN: f64 = 1.380649e-23;
/// Elementary charge (C).
pub const ELEMENTARY_CHARGE: f64 = 1.602176634e-19;
/// Avogadro constant (1/mol).
pub const AVOGADRO: f64 = 6.02214076e23;
/// Molar gas constant (J/(mol K)).
pub const GAS_CONSTANT: f64 = BOLTZMANN * AVOGADRO;

/// Boltzmann constant in eV/K.
pub const BOLTZMANN_EV: f64 = BOLTZMANN / ELEMENTARY_CHARGE;
