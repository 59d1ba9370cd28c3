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


pub(crate) type V3 = [f64; 3];
pub(crate) type M33 = [[f64; 3]; 3];

#[inline]
pub(crate) fn dot(a: &V3, b: &V3) -> f64
{ a[0] * b[0] + a[1] * b[1] + a[2] * b[2] }

/// Row vector times matrix.
#[inline]
pub(crate) fn dot_3_33(v: &V3, m: &M33) -> V3
{
    let mut out = [0.0; 3];
    for (k, row) in m.iter().enumerate() {
        for c in 0..3 {
            out[c] += v[k] * row[c];
        }
    }
    out
}

pub(crate) fn dot_n3_33(vs: &[V3], m: &M33) -> Vec<V3>
{ vs.iter().map(|v| dot_3_33(v, m)).collect() }

#[inline]
pub(crate) fn cross(a: &V3, b: &V3) -> V3
{[
    a[1] * b[2] - a[2] * b[1],
    a[2] * b[0] - a[0] * b[2],
    a[0] * b[1] - a[1] * b[0],
]}

#[inline]
pub(crate) fn det(m: &M33) -> f64
{ dot(&m[0], &cross(&m[1], &m[2])) }

/// Inverse of a 3x3 matrix, or `None` if it is singular.
pub(crate) fn inv(m: &M33) -> Option<M33>
{
    let det = det(m);
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    // rows of the inverse-transpose are the cross products of pairs of rows
    let cof = [
        cross(&m[1], &m[2]),
        cross(&m[2], &m[0]),
        cross(&m[0], &m[1]),
    ];
    let mut out = [[0.0; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            out[r][c] = cof[c][r] / det;
        }
    }
    Some(out)
}
