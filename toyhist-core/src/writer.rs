use std::path::Path;

use toyhist_common::Result;

use crate::dataset::ToyDataset;
use crate::histogram::{build_histogram, Histogram};
use crate::store::HistogramStore;

/// signal, data and bkg over the shared bin edges; touches no files
pub fn build_histograms(dataset: &ToyDataset) -> Result<Vec<Histogram>> {
    dataset
        .samples()
        .iter()
        .map(|s| build_histogram(&dataset.bin_edges, s.base, s.stat, s.name))
        .collect()
}

/// Recreate `path` holding the three dataset histograms.
///
/// Every histogram is built before the store is touched, so a shape error
/// leaves an existing file at `path` as it was.
pub fn create_file<S: HistogramStore + ?Sized>(store: &S, dataset: &ToyDataset, path: &Path) -> Result<Vec<Histogram>> {
    let histograms = build_histograms(dataset)?;
    for h in &histograms {
        tracing::debug!(name = h.name(), n_bins = h.n_bins(), integral = h.integral(), "histogram built");
    }
    store.write(path, &histograms)?;
    tracing::info!(path = %path.display(), count = histograms.len(), "histogram file written");
    Ok(histograms)
}
