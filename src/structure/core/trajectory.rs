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


use crate::{Element, Lattice};
use itertools::Itertools;

/// A single snapshot: a cell and the fractional positions of every site.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub lattice: Lattice,
    pub fracs: Vec<[f64; 3]>,
}

impl Frame {
    pub fn num_atoms(&self) -> usize
    { self.fracs.len() }
}

/// An ordered sequence of frames sharing one list of site elements.
///
/// Invariant: every frame has exactly `elements.len()` sites.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    elements: Vec<Element>,
    frames: Vec<Frame>,
}

#[derive(Debug, Fail)]
pub enum TrajectoryMismatch {
    #[fail(display = "frame {} has {} sites, but the trajectory has {}", index, found, expected)]
    SiteCount { index: usize, found: usize, expected: usize },
    #[fail(display = "cannot join trajectories with different site elements ({} vs {})", left, right)]
    Elements { left: String, right: String },
}

impl Trajectory {
    pub fn new(elements: Vec<Element>, frames: Vec<Frame>) -> Result<Self, TrajectoryMismatch>
    {
        for (index, frame) in frames.iter().enumerate() {
            if frame.num_atoms() != elements.len() {
                return Err(TrajectoryMismatch::SiteCount {
                    index,
                    found: frame.num_atoms(),
                    expected: elements.len(),
                });
            }
        }
        Ok(Trajectory { elements, frames })
    }

    pub fn elements(&self) -> &[Element]
    { &self.elements }

    pub fn frames(&self) -> &[Frame]
    { &self.frames }

    pub fn num_atoms(&self) -> usize
    { self.elements.len() }

    pub fn len(&self) -> usize
    { self.frames.len() }

    pub fn is_empty(&self) -> bool
    { self.frames.is_empty() }

    pub fn first(&self) -> Option<&Frame>
    { self.frames.first() }

    /// Number of sites occupied by `element`.
    pub fn count_of(&self, element: Element) -> usize
    { self.elements.iter().filter(|&&e| e == element).count() }

    /// Append the frames of another trajectory with the same sites.
    pub fn extend(&mut self, other: Trajectory) -> Result<(), TrajectoryMismatch>
    {
        if self.elements != other.elements {
            return Err(TrajectoryMismatch::Elements {
                left: summarize(&self.elements),
                right: summarize(&other.elements),
            });
        }
        self.frames.extend(other.frames);
        Ok(())
    }

    /// Drop the first `count` frames (or all of them, if there are fewer).
    ///
    /// Returns the number of frames actually removed.
    pub fn skip_frames(&mut self, count: usize) -> usize
    {
        let count = count.min(self.frames.len());
        self.frames.drain(..count);
        count
    }
}

// "Li4 P1 S4" style description of an element list.
fn summarize(elements: &[Element]) -> String
{
    elements.iter()
        .group_by(|&&e| e).into_iter()
        .map(|(e, group)| format!("{}{}", e, group.count()))
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize, sites: usize) -> Vec<Frame> {
        (0..n).map(|i| Frame {
            lattice: Lattice::cubic(10.0),
            fracs: vec![[i as f64 * 0.01, 0.0, 0.0]; sites],
        }).collect()
    }

    fn li2o() -> Vec<Element> {
        let (li, o) = (Element::from_symbol("Li").unwrap(), Element::from_symbol("O").unwrap());
        vec![li, li, o]
    }

    #[test]
    fn rejects_wrong_site_count() {
        let err = Trajectory::new(li2o(), frames(2, 2)).unwrap_err();
        match err {
            TrajectoryMismatch::SiteCount { index: 0, found: 2, expected: 3 } => {},
            e => panic!("unexpected: {}", e),
        }
    }

    #[test]
    fn skip_removes_exact_prefix() {
        let mut traj = Trajectory::new(li2o(), frames(10, 3)).unwrap();
        assert_eq!(traj.skip_frames(4), 4);
        assert_eq!(traj.len(), 6);
        assert_close!(traj.first().unwrap().fracs[0][0], 0.04);

        assert_eq!(traj.skip_frames(100), 6);
        assert!(traj.is_empty());
    }

    #[test]
    fn extend_concatenates_in_order() {
        let mut a = Trajectory::new(li2o(), frames(3, 3)).unwrap();
        let b = Trajectory::new(li2o(), frames(2, 3)).unwrap();
        a.extend(b).unwrap();
        assert_eq!(a.len(), 5);
        assert_close!(a.frames()[3].fracs[0][0], 0.0);
    }

    #[test]
    fn extend_rejects_different_sites() {
        let mut a = Trajectory::new(li2o(), frames(1, 3)).unwrap();
        let mut elements = li2o();
        elements.reverse();
        let b = Trajectory::new(elements, frames(1, 3)).unwrap();
        let message = a.extend(b).unwrap_err().to_string();
        assert!(message.contains("Li2 O1"), "{}", message);
    }

    #[test]
    fn counts() {
        let traj = Trajectory::new(li2o(), vec![]).unwrap();
        assert_eq!(traj.count_of(Element::from_symbol("Li").unwrap()), 2);
        assert_eq!(traj.num_atoms(), 3);
    }
}
