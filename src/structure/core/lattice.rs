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


use crate::util::{self, M33, V3};

/// Defines a vector basis for periodic boundary conditions in three dimensions.
///
/// The rows of the matrix are the lattice vectors, so fractional row vectors
/// are multiplied on the left to produce cartesian coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lattice {
    matrix: M33,
}

impl Lattice {
    /// Create a lattice from a matrix where the rows are lattice vectors.
    #[inline]
    pub fn new(matrix: &M33) -> Self
    { Lattice { matrix: *matrix } }

    /// An orthorhombic lattice ((a, b, c), (90, 90, 90))
    #[inline]
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self
    { Self::new(&[[a, 0., 0.], [0., b, 0.], [0., 0., c]]) }

    /// A cubic lattice ((a, a, a), (90, 90, 90))
    #[inline]
    pub fn cubic(a: f64) -> Self
    { Self::orthorhombic(a, a, a) }

    /// Matrix where lattice vectors are rows.
    #[inline]
    pub fn matrix(&self) -> &M33
    { &self.matrix }

    /// Get the (positive) volume of the lattice cell.
    pub fn volume(&self) -> f64
    { util::det(&self.matrix).abs() }

    /// Multiply every lattice vector by `factor`.
    pub fn scaled(&self, factor: f64) -> Lattice
    {
        let mut matrix = self.matrix;
        for x in matrix.iter_mut().flat_map(|row| row.iter_mut()) {
            *x *= factor;
        }
        Lattice { matrix }
    }

    pub fn frac_to_cart(&self, frac: &V3) -> V3
    { util::dot_3_33(frac, &self.matrix) }

    /// Returns `None` for a degenerate lattice.
    pub fn carts_to_fracs(&self, carts: &[V3]) -> Option<Vec<V3>>
    { util::inv(&self.matrix).map(|inv| util::dot_n3_33(carts, &inv)) }
}
