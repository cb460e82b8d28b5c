pub mod dataset;
pub mod fetch;
pub mod histogram;
pub mod pipeline;
pub mod store;
pub mod summary;
pub mod writer;

pub use dataset::{Sample, ToyDataset, BACKGROUND, DATA, SIGNAL};
pub use fetch::{download, Fetcher};
pub use histogram::{build_histogram, Histogram};
pub use pipeline::{prepare, run, RunOptions};
pub use store::{HistogramStore, ParquetStore, FORMAT_KEY, FORMAT_VERSION};
pub use summary::{print_summary, write_summary};
pub use toyhist_common::{Config, Result, ToyHistError};
pub use writer::{build_histograms, create_file};
