use serde::{Deserialize, Serialize};
use toyhist_common::{Result, ToyHistError};

/// Toy histogram payload: shared bin edges plus central values and stat
/// uncertainties for the signal, data and background samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToyDataset {
    pub bin_edges: Vec<f64>,
    pub sig: Vec<f64>,
    pub sig_stat: Vec<f64>,
    pub data: Vec<f64>,
    pub data_stat: Vec<f64>,
    pub bkg: Vec<f64>,
    pub bkg_stat: Vec<f64>,
}

/// one (values, uncertainties) pair and the name it is stored under
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub name: &'static str,
    pub base: &'a [f64],
    pub stat: &'a [f64],
}

pub const SIGNAL: &str = "signal";
pub const DATA: &str = "data";
pub const BACKGROUND: &str = "bkg";

impl ToyDataset {
    /// parse and type-check a JSON document; unknown fields are ignored
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| ToyHistError::Format(e.to_string()))
    }

    pub fn n_bins(&self) -> usize {
        self.bin_edges.len().saturating_sub(1)
    }

    /// samples in output order: signal, data, bkg
    pub fn samples(&self) -> [Sample<'_>; 3] {
        [
            Sample { name: SIGNAL, base: &self.sig, stat: &self.sig_stat },
            Sample { name: DATA, base: &self.data, stat: &self.data_stat },
            Sample { name: BACKGROUND, base: &self.bkg, stat: &self.bkg_stat },
        ]
    }
}
