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


//! Reader for VASP 5 `XDATCAR` trajectories.
//!
//! Both fixed-cell files (one header, many configurations) and variable-cell
//! files (a header before every configuration) are understood.  The most
//! recently read header supplies the lattice for the configurations after it.

use crate::FailResult;

use std::io::prelude::*;
use std::path::Path;

use aimdx_structure::{Element, Frame, Lattice, Trajectory};

//--------------------------------------------------------------------------------------
// public API

#[derive(Debug, Clone, PartialEq)]
pub struct Xdatcar {
    /// Comment line of the first header.
    pub comment: String,
    pub trajectory: Trajectory,
}

/// A malformed XDATCAR, with the 1-based line number where it was noticed.
#[derive(Debug, Fail)]
#[fail(display = "XDATCAR line {}: {}", line, kind)]
pub struct XdatcarError {
    pub line: usize,
    #[cause]
    pub kind: XdatcarErrorKind,
}

#[derive(Debug, Fail)]
pub enum XdatcarErrorKind {
    #[fail(display = "unexpected end of file while reading {}", _0)]
    UnexpectedEof(&'static str),
    #[fail(display = "could not parse {} from {:?}", what, text)]
    Parse { what: &'static str, text: String },
    #[fail(display = "element symbols are missing (only the VASP 5 format is supported)")]
    MissingSymbols,
    #[fail(display = "{} element symbols but {} counts", symbols, counts)]
    CountMismatch { symbols: usize, counts: usize },
    #[fail(display = "lattice vectors are degenerate")]
    DegenerateLattice,
    #[fail(display = "a repeated header lists different elements than the first one")]
    ChangedElements,
    #[fail(display = "configuration appears before any header")]
    MissingHeader,
    #[fail(display = "file contains no configurations")]
    NoConfigurations,
    #[fail(display = "{}", _0)]
    Io(#[cause] std::io::Error),
}

impl Xdatcar {
    /// Read an XDATCAR from a file.
    pub fn from_path(path: impl AsRef<Path>) -> FailResult<Self> {
        let path = path.as_ref();
        let file = aimdx_fs_util::open_text(path)?;
        let out = Self::from_reader(file).map_err(|e| {
            e.context(format!("while reading {}", path.display()))
        })?;
        debug!("{}: {} frames of {} atoms", path.display(), out.trajectory.len(), out.trajectory.num_atoms());
        Ok(out)
    }

    /// Read an XDATCAR from an open file.
    pub fn from_reader(f: impl BufRead) -> FailResult<Self> {
        Ok(parse(&mut LineReader::new(f))?)
    }

    pub fn into_trajectory(self) -> Trajectory
    { self.trajectory }
}

//--------------------------------------------------------------------------------------
// implementation

struct LineReader<R> {
    inner: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(r: R) -> Self
    { LineReader { inner: r.lines(), line: 0 } }

    fn error(&self, kind: XdatcarErrorKind) -> XdatcarError
    { XdatcarError { line: self.line, kind } }

    fn next(&mut self) -> Result<Option<String>, XdatcarError> {
        match self.inner.next() {
            None => Ok(None),
            Some(result) => {
                self.line += 1;
                result.map(Some).map_err(|e| self.error(XdatcarErrorKind::Io(e)))
            },
        }
    }

    fn expect(&mut self, what: &'static str) -> Result<String, XdatcarError> {
        match self.next()? {
            Some(line) => Ok(line),
            None => Err(self.error(XdatcarErrorKind::UnexpectedEof(what))),
        }
    }

    fn parse_error(&self, what: &'static str, text: &str) -> XdatcarError {
        self.error(XdatcarErrorKind::Parse { what, text: text.to_string() })
    }

    /// Parse the first three whitespace-separated floats of a line.
    fn v3(&self, what: &'static str, text: &str) -> Result<[f64; 3], XdatcarError> {
        let mut words = text.split_whitespace();
        let mut out = [0.0; 3];
        for x in &mut out {
            *x = words.next()
                .and_then(|w| w.parse().ok())
                .ok_or_else(|| self.parse_error(what, text))?;
        }
        Ok(out)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CoordKind { Direct, Cartesian }

struct Header {
    lattice: Lattice,
    // multiplies cartesian positions
    scale: f64,
    elements: Vec<Element>,
}

fn parse(lines: &mut LineReader<impl BufRead>) -> Result<Xdatcar, XdatcarError> {
    let mut comment = None;
    let mut header: Option<Header> = None;
    let mut elements: Option<Vec<Element>> = None;
    let mut frames = vec![];

    while let Some(line) = lines.next()? {
        if line.trim().is_empty() {
            continue;
        }

        let kind = match comment {
            None => None,
            Some(_) => configuration_kind(&line),
        };
        match kind {
            Some(kind) => {
                let header = header.as_ref().ok_or_else(|| lines.error(XdatcarErrorKind::MissingHeader))?;
                frames.push(read_configuration(lines, header, kind)?);
            },
            None => {
                let new_header = read_header(lines)?;
                match &elements {
                    None => elements = Some(new_header.elements.clone()),
                    Some(elements) => {
                        if elements != &new_header.elements {
                            return Err(lines.error(XdatcarErrorKind::ChangedElements));
                        }
                    },
                }
                if comment.is_none() {
                    comment = Some(line.trim().to_string());
                }
                header = Some(new_header);
            },
        }
    }

    let (comment, elements) = match (comment, elements) {
        (Some(c), Some(e)) => (c, e),
        _ => return Err(lines.error(XdatcarErrorKind::UnexpectedEof("the header"))),
    };
    if frames.is_empty() {
        return Err(lines.error(XdatcarErrorKind::NoConfigurations));
    }

    // every frame was read with exactly elements.len() lines
    let trajectory = Trajectory::new(elements, frames)
        .map_err(|_| lines.error(XdatcarErrorKind::ChangedElements))?;
    Ok(Xdatcar { comment, trajectory })
}

fn configuration_kind(line: &str) -> Option<CoordKind> {
    let lower = line.trim().to_ascii_lowercase();
    if !lower.contains("configuration") {
        return None;
    }
    match lower.chars().next() {
        Some('d') => Some(CoordKind::Direct),
        Some('c') | Some('k') => Some(CoordKind::Cartesian),
        _ => None,
    }
}

// Reads everything after the comment line, up to and including the counts.
fn read_header(lines: &mut LineReader<impl BufRead>) -> Result<Header, XdatcarError> {
    let scale_line = lines.expect("the scale factor")?;
    let scale: f64 = scale_line.split_whitespace().next()
        .and_then(|w| w.parse().ok())
        .ok_or_else(|| lines.parse_error("the scale factor", &scale_line))?;

    let mut matrix = [[0.0; 3]; 3];
    for row in &mut matrix {
        let text = lines.expect("the lattice vectors")?;
        *row = lines.v3("a lattice vector", &text)?;
    }
    let unscaled = Lattice::new(&matrix);
    if unscaled.volume() == 0.0 {
        return Err(lines.error(XdatcarErrorKind::DegenerateLattice));
    }

    // a negative scale is the desired cell volume
    let scale = match scale < 0.0 {
        true => (-scale / unscaled.volume()).cbrt(),
        false => scale,
    };
    let lattice = unscaled.scaled(scale);

    let symbol_line = lines.expect("the element symbols")?;
    let symbols = symbol_line.split_whitespace().collect::<Vec<_>>();
    if symbols.first().map_or(true, |s| s.parse::<usize>().is_ok()) {
        return Err(lines.error(XdatcarErrorKind::MissingSymbols));
    }
    let symbols = symbols.into_iter()
        .map(|s| {
            // POTCAR labels such as "Li_sv" or "O/3a01e1"
            let s = s.split(|c: char| c == '_' || c == '/').next().unwrap_or(s);
            Element::from_symbol(s).map_err(|_| lines.parse_error("an element symbol", s))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count_line = lines.expect("the element counts")?;
    let counts = count_line.split_whitespace()
        .map(|w| w.parse::<usize>().map_err(|_| lines.parse_error("an element count", &count_line)))
        .collect::<Result<Vec<_>, _>>()?;
    if counts.len() != symbols.len() {
        return Err(lines.error(XdatcarErrorKind::CountMismatch {
            symbols: symbols.len(),
            counts: counts.len(),
        }));
    }

    let elements = symbols.iter().zip(&counts)
        .flat_map(|(&elem, &count)| std::iter::repeat(elem).take(count))
        .collect();
    Ok(Header { lattice, scale, elements })
}

fn read_configuration(
    lines: &mut LineReader<impl BufRead>,
    header: &Header,
    kind: CoordKind,
) -> Result<Frame, XdatcarError> {
    let mut coords = Vec::with_capacity(header.elements.len());
    for _ in 0..header.elements.len() {
        let text = lines.expect("a configuration")?;
        coords.push(lines.v3("a position", &text)?);
    }

    let fracs = match kind {
        CoordKind::Direct => coords,
        CoordKind::Cartesian => {
            let carts = coords.iter()
                .map(|v| [v[0] * header.scale, v[1] * header.scale, v[2] * header.scale])
                .collect::<Vec<_>>();
            header.lattice.carts_to_fracs(&carts)
                .ok_or_else(|| lines.error(XdatcarErrorKind::DegenerateLattice))?
        },
    };
    Ok(Frame { lattice: header.lattice, fracs })
}
