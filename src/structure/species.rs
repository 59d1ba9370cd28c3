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


use crate::{Element, ElementParseError};
use std::fmt;
use std::str::FromStr;

/// An element, optionally with an oxidation state: `Li`, `Li+`, `O2-`, `Fe3+`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Species {
    pub element: Element,
    pub oxidation_state: Option<i32>,
}

#[derive(Debug, Fail)]
pub enum SpeciesParseError {
    #[fail(display = "{}", _0)]
    Element(#[cause] ElementParseError),
    #[fail(display = "invalid oxidation state in species {:?}", _0)]
    OxidationState(String),
}

impl From<ElementParseError> for SpeciesParseError {
    fn from(e: ElementParseError) -> Self { SpeciesParseError::Element(e) }
}

impl Species {
    pub fn new(element: Element) -> Self
    { Species { element, oxidation_state: None } }

    /// Magnitude of the ionic charge used for conductivity.
    ///
    /// Without an explicit oxidation state, this falls back to the number of
    /// electrons in the element's outermost subshell.
    pub fn charge(&self) -> f64
    {
        match self.oxidation_state {
            Some(oxi) => f64::from(oxi),
            None => f64::from(self.element.outer_shell_electrons()),
        }
    }
}

impl FromStr for Species {
    type Err = SpeciesParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(s.len());
        let (symbol, suffix) = s.split_at(split);
        let element = Element::from_symbol(symbol)?;

        let oxidation_state = match suffix {
            "" => None,
            _ => Some(parse_oxidation_suffix(suffix).ok_or_else(|| {
                SpeciesParseError::OxidationState(s.to_string())
            })?),
        };
        Ok(Species { element, oxidation_state })
    }
}

// "+", "-", "2+", "3-"
fn parse_oxidation_suffix(suffix: &str) -> Option<i32>
{
    let (magnitude, sign) = match (suffix.strip_suffix('+'), suffix.strip_suffix('-')) {
        (Some(magnitude), _) => (magnitude, 1),
        (_, Some(magnitude)) => (magnitude, -1),
        _ => return None,
    };
    let magnitude = match magnitude {
        "" => 1,
        digits if digits.bytes().all(|b| b.is_ascii_digit()) => digits.parse::<i32>().ok()?,
        _ => return None,
    };
    Some(sign * magnitude)
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.element)?;
        match self.oxidation_state {
            None => Ok(()),
            Some(oxi) if oxi.abs() == 1 => write!(f, "{}", if oxi > 0 { "+" } else { "-" }),
            Some(oxi) => write!(f, "{}{}", oxi.abs(), if oxi > 0 { "+" } else { "-" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(s: &str) -> Species { s.parse().unwrap() }

    #[test]
    fn parse_forms() {
        assert_eq!(sp("Li"), Species::new(Element::from_symbol("Li").unwrap()));
        assert_eq!(sp("Li+").oxidation_state, Some(1));
        assert_eq!(sp("O2-").oxidation_state, Some(-2));
        assert_eq!(sp("Fe3+").oxidation_state, Some(3));
        assert_eq!(sp(" Na ").element.symbol(), "Na");

        assert!("Li2".parse::<Species>().is_err());
        assert!("Q+".parse::<Species>().is_err());
        assert!("".parse::<Species>().is_err());
        assert!("Li+2+".parse::<Species>().is_err());
    }

    #[test]
    fn non_ascii_charge_is_an_error() {
        // unicode minus and superscript plus, as pasted from typeset text
        for s in &["O2\u{2212}", "Li\u{207A}", "Li\u{2212}+", "Fe3\u{207A}"] {
            match s.parse::<Species>() {
                Err(SpeciesParseError::OxidationState(_)) => {},
                r => panic!("{:?}: unexpected: {:?}", s, r),
            }
        }
    }

    #[test]
    fn display_roundtrips() {
        for s in &["Li", "Li+", "O2-", "Fe3+", "Cl-"] {
            assert_eq!(sp(s).to_string(), *s);
        }
    }

    #[test]
    fn charge() {
        assert_close!(sp("Li").charge(), 1.0);
        assert_close!(sp("Mg2+").charge(), 2.0);
        assert_close!(sp("O2-").charge(), -2.0);
    }
}
