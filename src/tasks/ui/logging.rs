/* ********************************************************************** **
**  This file is part of aimdx.                                           **
**                                                                        **
**  aimdx is free software: you can redistribute it and/or modify it      **
**  under the terms of the GNU General Public License as published by     **
**  the Free Software Foundation, either version 3 of the License, or     **
**  (at your option) any later version.                                   **
**                                                                        **
**      http://www.gnu.org/licenses/                                      **
**                                                                        **
** Do note that, while the whole of aimdx is licensed under the GPL, many **
** parts of it are licensed under more permissive terms.                  **
** ********************************************************************** */

use crate::FailResult;

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter};

/// Builder-style setup for logging.
#[derive(Debug, Clone, Default)]
pub struct GlobalLogger {
    verbosity: Verbosity,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity { Default, Loud }

impl Default for Verbosity {
    fn default() -> Self { Verbosity::Default }
}

impl GlobalLogger {
    /// Any integer will be accepted; the level will be truncated
    /// to the most extreme value supported.
    pub fn verbosity(&mut self, level: i32) -> &mut Self
    {
        self.verbosity = match level > 0 {
            true => Verbosity::Loud,
            false => Verbosity::Default,
        };
        self
    }

    /// Install the global logger.
    ///
    /// Records go to stdout immediately.  The returned handle decides where
    /// (and whether) the results log is written; until it is started, records
    /// are only shown on stdout.
    pub fn apply(&mut self) -> FailResult<DelayedLogFile>
    {
        use std::time::Instant;

        let logfile = DelayedLogFile::default();
        let ours = match self.verbosity {
            Verbosity::Default => LevelFilter::Debug,
            Verbosity::Loud => LevelFilter::Trace,
        };

        let start = Instant::now();
        let stdout = fern::Dispatch::new()
            .format(move |out, message, record| {
                let t = start.elapsed();
                out.finish(format_args!("[{:>4}.{:03}s][{}][{}] {}",
                    t.as_secs(),
                    t.subsec_millis(),
                    record.target(),
                    ColorizedLevel(record.level()),
                    message))
            })
            .level(LevelFilter::Info)
            .level_for("aimdx_tasks", ours)
            .level_for("aimdx_diffusion", ours)
            .level_for("aimdx_structure_io", ours)
            .level_for("aimdx_tasks_config", ours)
            .chain(io::stdout());

        // the results log holds bare messages
        let file = fern::Dispatch::new()
            .format(|out, message, _| out.finish(format_args!("{}", message)))
            .level(LevelFilter::Info)
            .chain(Box::new(logfile.clone()) as Box<dyn Write + Send>);

        fern::Dispatch::new()
            .chain(stdout)
            .chain(file)
            .apply()?;

        Ok(logfile)
    }
}

/// Log file whose destination is only known after the config has been read.
#[derive(Debug, Clone, Default)]
pub struct DelayedLogFile(Arc<Mutex<Option<File>>>);

impl DelayedLogFile {
    /// Begin appending records to `path`, creating it if necessary.
    pub fn start(&self, path: impl AsRef<Path>) -> FailResult<()>
    {
        let file = aimdx_fs_util::append(path.as_ref())?;
        *self.lock()? = Some(file);
        Ok(())
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<File>>>
    {
        self.0.lock().map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))
    }
}

impl Write for DelayedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>
    {
        match &mut *self.lock()? {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()>
    {
        match &mut *self.lock()? {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ColorizedLevel(pub Level);
impl fmt::Display for ColorizedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match self.0 {
            Level::Error => ansi_term::Colour::Red.bold(),
            Level::Warn  => ansi_term::Colour::Red.normal(),
            Level::Info  => ansi_term::Colour::Cyan.bold(),
            Level::Debug => ansi_term::Colour::Yellow.dimmed(),
            Level::Trace => ansi_term::Colour::Cyan.normal(),
        };
        write!(f, "{}", style.paint(self.0.to_string()))
    }
}
