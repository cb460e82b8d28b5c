use std::path::{Path, PathBuf};

use toyhist_common::{Config, Result};

use crate::fetch::Fetcher;
use crate::histogram::Histogram;
use crate::store::{parse_compression, HistogramStore, ParquetStore};
use crate::writer::create_file;

/// everything one invocation needs, resolved up front
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output: PathBuf,
    pub source_url: String,
    pub compression: String,
}

impl RunOptions {
    pub fn from_config(config: &Config, output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            source_url: config.source.url.clone(),
            compression: config.output.compression.clone(),
        }
    }
}

/// download, then write; the output is not touched if the download fails
pub fn prepare<S: HistogramStore + ?Sized>(fetcher: &Fetcher, store: &S, output: &Path) -> Result<Vec<Histogram>> {
    let dataset = fetcher.download()?;
    create_file(store, &dataset, output)
}

pub fn run(opts: &RunOptions) -> Result<Vec<Histogram>> {
    let store = ParquetStore::new(parse_compression(&opts.compression)?);
    let fetcher = Fetcher::new(&opts.source_url)?;
    prepare(&fetcher, &store, &opts.output)
}
