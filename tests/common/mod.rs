//! Synthetic AIMD study directories.

use std::fmt::Write;
use std::path::Path;

pub const FRAMES_PER_RUN: usize = 20;

/// One Li and one fixed O in a 10 A cubic cell.  The Li moves along x by
/// `amplitude * sqrt(t)` Angstrom at frame `t`, so its MSD is exactly
/// `amplitude^2 * t`.
pub fn xdatcar(amplitude: f64, frames: std::ops::Range<usize>) -> String {
    let mut text = String::from("\
Li O test cell
           1
    10.000000    0.000000    0.000000
     0.000000   10.000000    0.000000
     0.000000    0.000000   10.000000
   Li   O
     1     1
");
    for (i, t) in frames.enumerate() {
        let x = 0.1 + amplitude * (t as f64).sqrt() / 10.0;
        writeln!(text, "Direct configuration= {:>5}", i + 1).unwrap();
        writeln!(text, "  {:.10}  0.2000000000  0.3000000000", x).unwrap();
        writeln!(text, "  0.5000000000  0.5000000000  0.5000000000").unwrap();
    }
    text
}

/// `<root>/<dir>/run_N/XDATCAR` for each run index, continuing one trajectory.
pub fn write_temperature(root: &Path, dir: &str, amplitude: f64, runs: &[usize]) {
    for (k, &run) in runs.iter().enumerate() {
        let run_dir = root.join(dir).join(format!("run_{}", run));
        std::fs::create_dir_all(&run_dir).unwrap();
        let frames = k * FRAMES_PER_RUN..(k + 1) * FRAMES_PER_RUN;
        std::fs::write(run_dir.join("XDATCAR"), xdatcar(amplitude, frames)).unwrap();
    }
}
