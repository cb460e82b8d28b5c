//! Persistence of named histograms.
//!
//! [`HistogramStore`] is the narrow capability the pipeline needs from a
//! container format. [`ParquetStore`] keeps one row per histogram:
//! `name (Utf8)`, `bin_edges (List<Float64>)`, `content (List<Float32>)`,
//! `error (List<Float32>)`, with the Arrow schema tagged by [`FORMAT_KEY`].

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float32Builder, Float64Builder, ListArray, ListBuilder, StringBuilder};
use arrow::datatypes::{ArrowPrimitiveType, DataType, Field, Float32Type, Float64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use memmap2::Mmap;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use toyhist_common::{OutputConfig, Result, ToyHistError};

use crate::histogram::{build_histogram, Histogram};

pub const FORMAT_KEY: &str = "toyhist.format";
pub const FORMAT_VERSION: &str = "histogram-v1";

pub trait HistogramStore {
    /// Replace whatever is at `path` with exactly `histograms`.
    ///
    /// Implementations must commit all histograms or leave `path` untouched.
    fn write(&self, path: &Path, histograms: &[Histogram]) -> Result<()>;

    /// every histogram in the container, in stored order
    fn read_all(&self, path: &Path) -> Result<Vec<Histogram>>;

    fn list(&self, path: &Path) -> Result<Vec<String>> {
        Ok(self.read_all(path)?.iter().map(|h| h.name().to_owned()).collect())
    }

    fn read(&self, path: &Path, name: &str) -> Result<Histogram> {
        self.read_all(path)?
            .into_iter()
            .find(|h| h.name() == name)
            .ok_or_else(|| ToyHistError::NotFound(format!("{name} in {}", path.display())))
    }
}

#[derive(Debug, Clone)]
pub struct ParquetStore {
    compression: Compression,
}

impl Default for ParquetStore {
    fn default() -> Self {
        Self { compression: Compression::SNAPPY }
    }
}

impl ParquetStore {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }

    pub fn from_config(cfg: &OutputConfig) -> Result<Self> {
        Ok(Self::new(parse_compression(&cfg.compression)?))
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }
}

impl HistogramStore for ParquetStore {
    fn write(&self, path: &Path, histograms: &[Histogram]) -> Result<()> {
        let batch = histograms_to_record_batch(histograms)?;
        let props = WriterProperties::builder().set_compression(self.compression).build();

        // stage next to the target so the final rename stays on one filesystem
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut builder = tempfile::Builder::new();
        builder.prefix(".toyhist-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }
        let tmp = builder.tempfile_in(dir)?;

        encode_batch(tmp.as_file(), &batch, props)?;
        tmp.as_file().sync_all()?;

        // on failure the staged file is dropped and removed
        tmp.persist(path).map_err(|e| ToyHistError::Io(e.error))?;
        sync_dir(dir)?;
        tracing::debug!(path = %path.display(), count = histograms.len(), "histogram file committed");
        Ok(())
    }

    fn read_all(&self, path: &Path) -> Result<Vec<Histogram>> {
        let file = std::fs::File::open(path)?;
        let mmap: Mmap = unsafe { Mmap::map(&file)? };
        let bytes = Bytes::copy_from_slice(&mmap);
        let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
        check_format(builder.schema(), path)?;
        let reader = builder.build()?;
        let mut out = Vec::new();
        for batch in reader {
            extract_histograms(&batch?, &mut out)?;
        }
        Ok(out)
    }
}

/// encode and finalize one batch; encoder failures surface as IO errors
fn encode_batch<W: Write + Send>(sink: W, batch: &RecordBatch, props: WriterProperties) -> Result<()> {
    let io_err = |e: parquet::errors::ParquetError| ToyHistError::Io(std::io::Error::other(e));
    let mut writer = ArrowWriter::try_new(sink, batch.schema(), Some(props)).map_err(io_err)?;
    writer.write(batch).map_err(io_err)?;
    writer.close().map_err(io_err)?;
    Ok(())
}

/// persist the rename itself
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    std::fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

pub fn parse_compression(name: &str) -> Result<Compression> {
    match name.to_ascii_lowercase().as_str() {
        "snappy" => Ok(Compression::SNAPPY),
        "zstd" => Ok(Compression::ZSTD(ZstdLevel::default())),
        "none" | "uncompressed" => Ok(Compression::UNCOMPRESSED),
        other => Err(ToyHistError::Other(format!("unknown compression: {other} (use snappy, zstd or none)"))),
    }
}

pub fn histogram_schema() -> SchemaRef {
    let f64_list = DataType::List(Arc::new(Field::new_list_field(DataType::Float64, true)));
    let f32_list = DataType::List(Arc::new(Field::new_list_field(DataType::Float32, true)));
    let metadata = HashMap::from([(FORMAT_KEY.to_owned(), FORMAT_VERSION.to_owned())]);
    Arc::new(Schema::new_with_metadata(
        vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("bin_edges", f64_list, false),
            Field::new("content", f32_list.clone(), false),
            Field::new("error", f32_list, false),
        ],
        metadata,
    ))
}

/// one row per histogram; names must be unique
pub fn histograms_to_record_batch(histograms: &[Histogram]) -> Result<RecordBatch> {
    let mut seen = HashSet::new();
    let mut name_builder = StringBuilder::new();
    let mut edges_builder = ListBuilder::new(Float64Builder::new());
    let mut content_builder = ListBuilder::new(Float32Builder::new());
    let mut error_builder = ListBuilder::new(Float32Builder::new());

    for h in histograms {
        if !seen.insert(h.name()) {
            return Err(ToyHistError::Other(format!("duplicate histogram name: {}", h.name())));
        }
        name_builder.append_value(h.name());
        edges_builder.values().append_slice(h.bin_edges());
        edges_builder.append(true);
        content_builder.values().append_slice(h.contents());
        content_builder.append(true);
        error_builder.values().append_slice(h.errors());
        error_builder.append(true);
    }

    let batch = RecordBatch::try_new(
        histogram_schema(),
        vec![
            Arc::new(name_builder.finish()) as ArrayRef,
            Arc::new(edges_builder.finish()) as ArrayRef,
            Arc::new(content_builder.finish()) as ArrayRef,
            Arc::new(error_builder.finish()) as ArrayRef,
        ],
    )?;
    Ok(batch)
}

fn check_format(schema: &SchemaRef, path: &Path) -> Result<()> {
    match schema.metadata().get(FORMAT_KEY) {
        Some(v) if v == FORMAT_VERSION => Ok(()),
        Some(v) => Err(ToyHistError::Format(format!("{}: unsupported histogram format {v}", path.display()))),
        None => Err(ToyHistError::Format(format!("{}: not a histogram file", path.display()))),
    }
}

fn list_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ListArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ToyHistError::Format(format!("missing column: {name}")))?
        .as_list_opt::<i32>()
        .ok_or_else(|| ToyHistError::Format(format!("column '{name}' is not a list")))
}

fn list_values<T>(list: &ListArray, row: usize, column: &str) -> Result<Vec<f64>>
where
    T: ArrowPrimitiveType,
    T::Native: Into<f64>,
{
    if list.is_null(row) {
        return Err(ToyHistError::Format(format!("row {row}: '{column}' is null")));
    }
    let values = list.value(row);
    let prim = values
        .as_primitive_opt::<T>()
        .ok_or_else(|| ToyHistError::Format(format!("column '{column}' has wrong element type {}", values.data_type())))?;
    if prim.null_count() > 0 {
        return Err(ToyHistError::Format(format!("row {row}: '{column}' has {} null elements", prim.null_count())));
    }
    Ok(prim.values().iter().map(|&v| v.into()).collect())
}

fn extract_histograms(batch: &RecordBatch, out: &mut Vec<Histogram>) -> Result<()> {
    let names = batch
        .column_by_name("name")
        .ok_or_else(|| ToyHistError::Format("missing column: name".into()))?
        .as_string_opt::<i32>()
        .ok_or_else(|| ToyHistError::Format("column 'name' is not Utf8".into()))?;
    let edges = list_column(batch, "bin_edges")?;
    let content = list_column(batch, "content")?;
    let error = list_column(batch, "error")?;

    for row in 0..batch.num_rows() {
        if names.is_null(row) {
            return Err(ToyHistError::Format(format!("row {row}: histogram name is null")));
        }
        let name = names.value(row);
        let bin_edges = list_values::<Float64Type>(edges, row, "bin_edges")?;
        let base = list_values::<Float32Type>(content, row, "content")?;
        let stat = list_values::<Float32Type>(error, row, "error")?;
        // f32 -> f64 -> f32 is exact
        out.push(build_histogram(&bin_edges, &base, &stat, name)?);
    }
    Ok(())
}
