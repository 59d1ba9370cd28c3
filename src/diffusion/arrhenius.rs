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


use crate::analyzer::AnalysisError;
use crate::constants::BOLTZMANN_EV;
use crate::lstsq;

/// `D = c * exp(-ea / (k T))`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArrheniusFit {
    /// Activation energy in eV.
    pub ea: f64,
    /// Prefactor, in the units of the fitted diffusivities.
    pub c: f64,
    /// Standard deviation of `ea`.  Needs at least three temperatures.
    pub ea_std: Option<f64>,
}

impl ArrheniusFit {
    pub fn diffusivity_at(&self, temperature: f64) -> f64
    { self.c * (-self.ea / (BOLTZMANN_EV * temperature)).exp() }
}

/// Linear fit of `ln(D)` against `1/T`.
pub fn fit_arrhenius(temps: &[f64], diffusivities: &[f64]) -> Result<ArrheniusFit, AnalysisError>
{
    if temps.len() != diffusivities.len() {
        return Err(AnalysisError::BadInput(format!(
            "{} temperatures but {} diffusivities", temps.len(), diffusivities.len(),
        )));
    }
    if let Some(&t) = temps.iter().find(|&&t| !(t > 0.0)) {
        return Err(AnalysisError::BadInput(format!("bad temperature for Arrhenius fit: {}", t)));
    }
    if let Some(&d) = diffusivities.iter().find(|&&d| !(d > 0.0)) {
        return Err(AnalysisError::BadInput(format!("bad diffusivity for Arrhenius fit: {}", d)));
    }

    let inv_t = temps.iter().map(|t| 1.0 / t).collect::<Vec<_>>();
    let ln_d = diffusivities.iter().map(|d| d.ln()).collect::<Vec<_>>();
    let fit = lstsq::fit_line(&inv_t, &ln_d, None).ok_or_else(|| {
        AnalysisError::NotEnoughData("an Arrhenius fit needs at least two distinct temperatures".to_string())
    })?;

    let n = temps.len();
    let ea_std = match n > 2 {
        true => {
            let mean = inv_t.iter().sum::<f64>() / n as f64;
            let spread = inv_t.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>();
            Some((fit.residual / (n - 2) as f64 / spread).sqrt() * BOLTZMANN_EV)
        },
        false => None,
    };
    Ok(ArrheniusFit {
        ea: -fit.slope * BOLTZMANN_EV,
        c: fit.intercept.exp(),
        ea_std,
    })
}

/// Diffusivity at `new_temp` from an Arrhenius fit.
pub fn extrapolated_diffusivity(temps: &[f64], diffusivities: &[f64], new_temp: f64) -> Result<f64, AnalysisError>
{ Ok(fit_arrhenius(temps, diffusivities)?.diffusivity_at(new_temp)) }
