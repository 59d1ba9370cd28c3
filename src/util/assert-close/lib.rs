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


use failure::Fail;
use std::fmt;

pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

/// `assert_eq!` for floating point data.
///
/// ```ignore
/// assert_close!(a, b);
/// assert_close!(rel=1e-6, a, b);
/// assert_close!(abs=1e-12, rel=1e-6, a, b, "while checking {}", thing);
/// ```
#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        $crate::assert_close_impl!{@parsing [$($t)*] [$crate::DEFAULT_NONZERO_TOL] [0.0]}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! assert_close_impl {
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$rel:expr] [$abs:expr]) => {
        $crate::assert_close_impl!{@parsing [$($rest)*] [$tol] [$abs]}
    };
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$rel:expr] [$abs:expr]) => {
        $crate::assert_close_impl!{@parsing [$($rest)*] [$rel] [$tol]}
    };
    (@parsing [$a:expr, $b:expr $(,)*] [$rel:expr] [$abs:expr]) => {
        $crate::assert_close_impl!{@expand [$a, $b] [$rel] [$abs] ["not nearly equal!"]}
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] [$rel:expr] [$abs:expr]) => {
        $crate::assert_close_impl!{@expand [$a, $b] [$rel] [$abs] [$($fmt)+]}
    };
    (@expand [$a:expr, $b:expr] [$rel:expr] [$abs:expr] [$($fmt:tt)+]) => {{
        let (a, b) = (&$a, &$b);
        let tol = $crate::Tolerances { rel: $rel, abs: $abs };
        if let Err(e) = $crate::CheckClose::check_close(a, b, tol) {
            panic!(
                "{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}",
                format!($($fmt)+), tol.rel, tol.abs, a, b, e,
            );
        }
    }};
}

/// Same semantics as Python's `math.isclose`.
#[inline]
pub fn is_close(a: f64, b: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);

    // catches infinities of the same sign
    if a == b { return true; }
    if a.is_infinite() || b.is_infinite() { return false; }

    (a - b).abs() <= abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Copy, Clone)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

#[derive(Debug, Fail)]
pub enum CheckCloseError {
    #[fail(display = "lengths differ: {} vs {}", _0, _1)]
    Length(usize, usize),
    #[fail(display = "{}", _0)]
    Values(ValuesError),
}

#[derive(Debug)]
pub struct ValuesError {
    pub index: Option<usize>,
    pub values: (f64, f64),
}

impl fmt::Display for ValuesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = self.values;
        if let Some(index) = self.index {
            writeln!(f, "first mismatch at index {}", index)?;
        }
        write!(f, "failed at:\n  left: {:?}\n right: {:?}", left, right)
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>;
}

impl CheckClose for f64 {
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError> {
        match is_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(CheckCloseError::Values(ValuesError { index: None, values: (*self, *other) })),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { (**self).check_close(*other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        if self.len() != other.len() {
            return Err(CheckCloseError::Length(self.len(), other.len()));
        }
        for (index, (a, b)) in self.iter().zip(other).enumerate() {
            match a.check_close(b, tol) {
                Err(CheckCloseError::Values(ValuesError { index: None, values })) => {
                    return Err(CheckCloseError::Values(ValuesError { index: Some(index), values }));
                },
                result => result?,
            }
        }
        Ok(())
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}
