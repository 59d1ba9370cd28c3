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


use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

#[macro_use]
extern crate log;

/// An io error annotated with what we were doing at the time.
#[derive(Debug, thiserror::Error)]
#[error("{context}")]
pub struct Error {
    context: String,
    #[source]
    source: io::Error,
}

impl Error {
    pub fn kind(&self) -> io::ErrorKind { self.source.kind() }
}

pub type Result<T> = std::result::Result<T, Error>;

trait ResultExt<T> {
    fn with_context<S: Into<String>>(self, context: impl FnOnce() -> S) -> Result<T>;
}

impl<T> ResultExt<T> for io::Result<T> {
    fn with_context<S: Into<String>>(self, context: impl FnOnce() -> S) -> Result<T>
    { self.map_err(|source| Error { context: context().into(), source }) }
}

/// Wrapper around `File::open` that adds context.
pub fn open<P: AsRef<Path>>(path: P) -> Result<File>
{
    File::open(path.as_ref())
        .with_context(|| format!("while opening file: '{}'", path.as_ref().display()))
}

/// Wrapper around `File::open` that adds context and makes a `BufReader`.
pub fn open_text<P: AsRef<Path>>(path: P) -> Result<BufReader<File>>
{ open(path).map(BufReader::new) }

/// Wrapper around `File::create` that adds context.
pub fn create<P: AsRef<Path>>(path: P) -> Result<File>
{
    File::create(path.as_ref())
        .with_context(|| format!("could not create file: '{}'", path.as_ref().display()))
}

/// Opens a file for appending, creating it if necessary.
pub fn append<P: AsRef<Path>>(path: P) -> Result<File>
{
    OpenOptions::new().create(true).append(true).open(path.as_ref())
        .with_context(|| format!("could not open for appending: '{}'", path.as_ref().display()))
}

/// Wrapper around `std::fs::canonicalize` that adds context.
pub fn canonicalize<P: AsRef<Path>>(dir: P) -> Result<PathBuf>
{
    fs::canonicalize(dir.as_ref())
        .with_context(|| format!("could not normalize: '{}'", dir.as_ref().display()))
}

/// Names and paths of the immediate subdirectories of `dir`, sorted by name.
///
/// Entries that are not valid UTF-8 are skipped with a warning, as are
/// entries whose type cannot be determined.  Symlinks to directories count
/// as directories.
pub fn subdirectories<P: AsRef<Path>>(dir: P) -> Result<Vec<(String, PathBuf)>>
{
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("could not list directory: '{}'", dir.display()))?;

    let mut out = vec![];
    for entry in entries {
        let entry = entry.with_context(|| format!("while listing directory: '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => out.push((name, path)),
            Err(name) => warn!("skipping non-UTF-8 directory name: {:?}", name),
        }
    }
    out.sort();
    Ok(out)
}
