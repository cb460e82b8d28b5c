use std::io::Write;
use std::path::Path;

use crate::histogram::Histogram;

pub fn write_summary<W: Write>(out: &mut W, path: &Path, histograms: &[Histogram]) -> std::io::Result<()> {
    writeln!(out, "{:<16} {}", "Output:", path.display())?;
    writeln!(out, "{:<16} {}", "Histograms:", histograms.len())?;
    if let Some(first) = histograms.first() {
        writeln!(out, "{:<16} {} [{}, {}]", "Bins:", first.n_bins(), first.x_min(), first.x_max())?;
    }
    for h in histograms {
        writeln!(out, "  {:<14} integral {:.4}", h.name(), h.integral())?;
    }
    Ok(())
}

pub fn print_summary(path: &Path, histograms: &[Histogram]) {
    let stdout = std::io::stdout();
    let _ = write_summary(&mut stdout.lock(), path, histograms); // closed stdout is not an error
}
