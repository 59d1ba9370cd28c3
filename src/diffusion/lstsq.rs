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


/// Result of fitting `y = slope * x + intercept`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Weighted sum of squared residuals.
    pub residual: f64,
}

/// Weighted linear least squares, minimizing `sum(w * (y - slope * x - intercept)^2)`.
///
/// Returns `None` when fewer than two points are given or all `x` coincide.
pub(crate) fn fit_line(x: &[f64], y: &[f64], weights: Option<&[f64]>) -> Option<LineFit>
{
    assert_eq!(x.len(), y.len());
    if x.len() < 2 {
        return None;
    }
    let weight = |i: usize| weights.map_or(1.0, |w| w[i]);

    let total: f64 = (0..x.len()).map(weight).sum();
    let x_mean = (0..x.len()).map(|i| weight(i) * x[i]).sum::<f64>() / total;
    let y_mean = (0..x.len()).map(|i| weight(i) * y[i]).sum::<f64>() / total;

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for i in 0..x.len() {
        let dx = x[i] - x_mean;
        sxx += weight(i) * dx * dx;
        sxy += weight(i) * dx * (y[i] - y_mean);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    let residual = (0..x.len())
        .map(|i| {
            let r = y[i] - slope * x[i] - intercept;
            weight(i) * r * r
        })
        .sum();
    Some(LineFit { slope, intercept, residual })
}
