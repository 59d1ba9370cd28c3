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


use std::collections::HashMap;
use std::fmt;
use std::str;

/// Represents a specific atomic number.
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Element(u16);

#[derive(Debug, Fail)]
#[fail(display = "Unable to parse element symbol: {:?}", text)]
pub struct ElementParseError {
    text: String,
}

impl Element {
    /// Parse a symbol such as `"Li"`.  Matching is exact (case-sensitive),
    /// the way VASP writes them.
    pub fn from_symbol(s: &str) -> Result<Self, ElementParseError>
    {
        let &n = SYMBOL_TO_NUMBER.get(s).ok_or_else(|| ElementParseError { text: s.to_string() })?;
        Ok(Element(n))
    }

    pub fn symbol(&self) -> &'static str
    { SYMBOLS[usize::from(self.0) - 1] }

    /// Number of electrons in the last subshell of the ground state
    /// configuration, with subshells ordered by (n, l).
    ///
    /// This is the charge assumed for a species written without an oxidation
    /// state, e.g. 1 for Li (`[He] 2s1`), 2 for Fe (`[Ar] 3d6 4s2`), and 4 for
    /// O (`[He] 2s2 2p4`).
    pub fn outer_shell_electrons(&self) -> u32
    {
        match self.0 {
            // ns1 (n-1)d(x+1) instead of the Madelung ns2 (n-1)dx
            24 | 29 | 41 | 42 | 44 | 45 | 47 | 78 | 79 => 1,
            // [Kr] 4d10, no 5s at all
            46 => 10,
            z => madelung_outer_shell(u32::from(z)),
        }
    }
}

// Fill subshells in Madelung order (n + l, then n) and report the occupation
// of the largest (n, l) that has any electrons.
fn madelung_outer_shell(mut remaining: u32) -> u32
{
    let mut subshells = vec![];
    for n in 1..=7u32 {
        for l in 0..n.min(4) {
            subshells.push((n, l));
        }
    }
    subshells.sort_by_key(|&(n, l)| (n + l, n));

    let mut filled = vec![];
    for (n, l) in subshells {
        if remaining == 0 {
            break;
        }
        let count = remaining.min(2 * (2 * l + 1));
        remaining -= count;
        filled.push(((n, l), count));
    }
    filled.into_iter().max_by_key(|&(nl, _)| nl).map_or(0, |(_, count)| count)
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { fmt::Display::fmt(self.symbol(), f) }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { fmt::Debug::fmt(self.symbol(), f) }
}

impl str::FromStr for Element {
    type Err = ElementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    { Element::from_symbol(s) }
}

// Indexed by atomic number minus one, one period per paragraph.
const SYMBOLS: [&str; 112] = [
    "H", "He",

    "Li", "Be", "B", "C", "N", "O", "F", "Ne",

    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",

    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni",
    "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",

    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd",
    "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe",

    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W",
    "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po",
    "At", "Rn",

    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg",
    "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
];

lazy_static!{
    static ref SYMBOL_TO_NUMBER: HashMap<&'static str, u16> = {
        SYMBOLS.iter().enumerate()
            .map(|(i, &sym)| (sym, i as u16 + 1))
            .collect()
    };
}
