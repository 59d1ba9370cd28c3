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


use crate::arrhenius::extrapolated_diffusivity;
use crate::analyzer::AnalysisError;
use crate::constants::{AVOGADRO, ELEMENTARY_CHARGE, GAS_CONSTANT};

use aimdx_structure::{Element, Lattice, Species, Trajectory};

/// The cell and site elements used to turn diffusivity into conductivity.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceStructure {
    pub lattice: Lattice,
    pub elements: Vec<Element>,
}

impl ReferenceStructure {
    /// `None` for a trajectory with no frames.
    pub fn from_first_frame(traj: &Trajectory) -> Option<Self> {
        traj.first().map(|frame| ReferenceStructure {
            lattice: frame.lattice,
            elements: traj.elements().to_vec(),
        })
    }

    pub fn count_of(&self, element: Element) -> usize
    { self.elements.iter().filter(|&&e| e == element).count() }
}

/// Factor converting a diffusivity in cm^2/s into a conductivity in mS/cm
/// (Nernst-Einstein), for `species` in `reference` at `temperature` (K).
///
/// The charge is the species' oxidation state when given, or else the
/// number of electrons in the element's outermost subshell.
pub fn conversion_factor(reference: &ReferenceStructure, species: &Species, temperature: f64) -> f64
{
    let z = species.charge();
    let n = reference.count_of(species.element) as f64;
    // cm^3
    let volume = reference.lattice.volume() * 1e-24;
    let faraday = AVOGADRO * ELEMENTARY_CHARGE;
    1000.0 * n / (volume * AVOGADRO) * z * z * faraday * faraday / (GAS_CONSTANT * temperature)
}

/// Conductivity (mS/cm) at `new_temp` from an Arrhenius fit of `diffusivities`.
pub fn extrapolated_conductivity(
    temps: &[f64],
    diffusivities: &[f64],
    new_temp: f64,
    reference: &ReferenceStructure,
    species: &Species,
) -> Result<f64, AnalysisError>
{
    let diffusivity = extrapolated_diffusivity(temps, diffusivities, new_temp)?;
    Ok(diffusivity * conversion_factor(reference, species, new_temp))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(symbols: &[&str], a: f64) -> ReferenceStructure {
        ReferenceStructure {
            lattice: Lattice::cubic(a),
            elements: symbols.iter().map(|s| Element::from_symbol(s).unwrap()).collect(),
        }
    }

    #[test]
    fn factor() {
        let li = "Li".parse().unwrap();
        assert_close!(rel=1e-9, conversion_factor(&reference(&["Li", "O"], 10.0), &li, 300.0), 6197495.927725703);

        // explicit oxidation state, two sites, double temperature
        let mg = "Mg2+".parse().unwrap();
        let structure = reference(&["Mg", "O", "Mg"], 10.0);
        assert_close!(rel=1e-9, conversion_factor(&structure, &mg, 600.0), 24789983.710902814);
    }

    #[test]
    fn extrapolation() {
        let li: Species = "Li+".parse().unwrap();
        let structure = reference(&["Li", "O"], 10.0);
        let temps = [600.0, 900.0];
        let ds = [1e-6, 1e-6];
        // flat Arrhenius line: D is the same everywhere
        let sigma = extrapolated_conductivity(&temps, &ds, 300.0, &structure, &li).unwrap();
        assert_close!(rel=1e-9, sigma, 1e-6 * 6197495.927725703);
    }

    #[test]
    fn from_trajectory() {
        let empty = Trajectory::new(vec![], vec![]).unwrap();
        assert_eq!(ReferenceStructure::from_first_frame(&empty), None);
    }
}
