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
use crate::pipeline;
use crate::ui::cli_deserialize::{parse_value_of, parse_values_of, CliDeserialize};
use crate::ui::logging::GlobalLogger;

use std::ffi::OsStr;
use std::path::PathBuf;

use aimdx_structure::Species;
use failure::ResultExt;
use aimdx_tasks_config::{Settings, Smoothing, ValidatedSettings, YamlRead};

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        for cause in e.iter_chain() {
            error!("{}", cause);
        }

        if std::env::var_os("RUST_BACKTRACE") == Some(OsStr::new("1").to_owned()) {
            error!("{}", e.backtrace());
        }
        std::process::exit(1);
    });
}

/// Which directory to study, and for what.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyArgs {
    species: Species,
    dir: PathBuf,
}

impl CliDeserialize for StudyArgs {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.args(&[
            arg!( species=SPECIES "diffusing species, optionally charged (Li, Li+, O2-). \
                                   Without a charge, the number of outer shell electrons is used."),
            arg!( dir [-C][--dir]=DIR "directory holding the temperature directories [default: .]"),
        ])
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self> {
        let species = match parse_value_of::<Species>(m, "species")? {
            Some(species) => species,
            None => bail!("BUG! (species is a required argument)"),
        };
        let dir = PathBuf::from(m.value_of("dir").unwrap_or("."));
        Ok(StudyArgs { species, dir })
    }
}

/// A config file and command line overrides of its settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsArgs {
    config: Option<PathBuf>,
    outfile: Option<PathBuf>,
    time_step: Option<f64>,
    ballistic_skip: Option<usize>,
    step_skip: Option<usize>,
    smoothed: Option<Smoothing>,
    temperatures: Option<Vec<u32>>,
    skip_run_zero: bool,
    strict: bool,
}

impl CliDeserialize for SettingsArgs {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.args(&[
            arg!( config [-c][--config]=CONFIG "settings yaml file. Options given on the command line take precedence."),
            arg!( outfile [-o][--outfile]=FILE "results log, appended to [default: conductivity.txt]"),
            arg!( time_step [--time-step]=FS "simulation time step in fs [default: 2]"),
            arg!( ballistic_skip [--ballistic-skip]=N "frames dropped from the start of each temperature [default: 50]"),
            arg!( step_skip [--step-skip]=N "ionic steps between stored frames [default: 1]"),
            arg!( smoothed [--smoothed]=MODE "time origin averaging: max, constant, or none [default: max]"),
            arg!( temperatures [-T][--temperatures]=KELVIN... "only analyze these temperatures"),
            arg!( skip_run_zero [--skip-run-zero] "leave out run_0 (equilibration)"),
            arg!( strict [--strict] "fail instead of skipping a temperature that cannot be analyzed"),
        ])
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self> {
        Ok(SettingsArgs {
            config: m.value_of("config").map(PathBuf::from),
            outfile: m.value_of("outfile").map(PathBuf::from),
            time_step: parse_value_of(m, "time_step")?,
            ballistic_skip: parse_value_of(m, "ballistic_skip")?,
            step_skip: parse_value_of(m, "step_skip")?,
            smoothed: parse_value_of(m, "smoothed")?,
            temperatures: parse_values_of(m, "temperatures")?,
            skip_run_zero: m.is_present("skip_run_zero"),
            strict: m.is_present("strict"),
        })
    }
}

impl SettingsArgs {
    /// Defaults, overridden by the config file, overridden by the command line.
    pub fn resolve(&self) -> FailResult<ValidatedSettings> {
        let mut settings = match &self.config {
            None => Settings::default(),
            Some(path) => {
                let file = aimdx_fs_util::open_text(path)?;
                Settings::from_reader(file).with_context(|_| {
                    format!("while reading config: '{}'", path.display())
                })?
            },
        };

        if let Some(outfile) = &self.outfile { settings.outfile = outfile.clone(); }
        if let Some(x) = self.time_step { settings.time_step = x; }
        if let Some(x) = self.ballistic_skip { settings.ballistic_skip = x; }
        if let Some(x) = self.step_skip { settings.step_skip = x; }
        if let Some(x) = self.smoothed { settings.smoothed = x; }
        if let Some(x) = &self.temperatures { settings.temperatures = Some(x.clone()); }
        settings.skip_run_zero |= self.skip_run_zero;
        settings.strict |= self.strict;

        settings.validate()
    }
}

fn app<'a, 'b>() -> clap::App<'a, 'b> {
    clap::App::new("aimdx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Diffusivities, activation energies and conductivity from VASP AIMD runs.")
        .args(&[
            arg!( verbose [-v][--verbose]... "show debug output (trace with -vv)"),
        ])
}

pub fn aimdx() {
    wrap_result_main(|| {
        let (app, de) = <(StudyArgs, SettingsArgs)>::augment_clap_app(app());
        let matches = app.get_matches();

        // before anything else, so that errors below are visible
        let verbosity = matches.occurrences_of("verbose") as i32;
        let logfile = GlobalLogger::default().verbosity(verbosity).apply()?;

        let (study, settings_args) = de.resolve_args(&matches)?;
        let settings = settings_args.resolve()?;
        trace!("settings: {:?}", *settings);

        let root = aimdx_fs_util::canonicalize(&study.dir)?;
        // a relative outfile lives alongside the other outputs
        logfile.start(root.join(&settings.outfile))?;

        pipeline::run_conductivity(&root, study.species, &settings)?;
        Ok(())
    });
}
