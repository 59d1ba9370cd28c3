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


use aimdx_structure::Trajectory;

/// Cartesian displacement of every site relative to the first frame,
/// indexed as `[site][frame]`.
///
/// Each step between consecutive frames is taken as the shortest fractional
/// image, so atoms crossing a periodic boundary are unwrapped.  The
/// accumulated fractional displacement is converted using the lattice of the
/// frame it belongs to, so variable-cell runs are handled.
pub fn unwrapped_displacements(traj: &Trajectory) -> Vec<Vec<[f64; 3]>>
{
    let num_atoms = traj.num_atoms();
    let mut out = vec![Vec::with_capacity(traj.len()); num_atoms];

    let frames = traj.frames();
    let first = match frames.first() {
        Some(frame) => frame,
        None => return out,
    };

    let mut prev = &first.fracs;
    let mut accum = vec![[0.0; 3]; num_atoms];
    for frame in frames {
        for (site, (cur, prev)) in frame.fracs.iter().zip(prev).enumerate() {
            for k in 0..3 {
                let step = cur[k] - prev[k];
                accum[site][k] += step - step.round();
            }
        }
        for (site, frac) in accum.iter().enumerate() {
            out[site].push(frame.lattice.frac_to_cart(frac));
        }
        prev = &frame.fracs;
    }
    out
}
