use std::cmp::Ordering;

use toyhist_common::{Result, ToyHistError};

/// Fixed-binning 1D histogram with single-precision contents and errors.
///
/// Bin numbering follows the usual physics convention: bin 0 is underflow,
/// bins `1..=n_bins` are the regular bins and `n_bins + 1` is overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    name: String,
    bin_edges: Vec<f64>,
    contents: Vec<f32>, // n_bins + 2, flow bins included
    errors: Vec<f32>,
}

impl Histogram {
    /// empty histogram over `bin_edges`
    pub fn new(name: &str, bin_edges: &[f64]) -> Result<Self> {
        if bin_edges.len() < 2 {
            return Err(ToyHistError::shape(name, format!("need at least 2 bin edges, got {}", bin_edges.len())));
        }
        // also rejects NaN edges
        if let Some(i) = bin_edges.windows(2).position(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less)) {
            return Err(ToyHistError::shape(
                name,
                format!("bin edges not strictly increasing at index {}: {} >= {}", i + 1, bin_edges[i], bin_edges[i + 1]),
            ));
        }
        let slots = bin_edges.len() + 1;
        Ok(Self {
            name: name.to_owned(),
            bin_edges: bin_edges.to_vec(),
            contents: vec![0.0; slots],
            errors: vec![0.0; slots],
        })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn set_name(&mut self, name: &str) { self.name = name.to_owned(); }

    pub fn n_bins(&self) -> usize { self.bin_edges.len() - 1 }

    pub fn bin_edges(&self) -> &[f64] { &self.bin_edges }

    pub fn x_min(&self) -> f64 { self.bin_edges[0] }

    pub fn x_max(&self) -> f64 { self.bin_edges[self.n_bins()] }

    /// content of bin `i`, flow bins included; `None` past overflow
    pub fn bin_content(&self, i: usize) -> Option<f32> { self.contents.get(i).copied() }

    pub fn bin_error(&self, i: usize) -> Option<f32> { self.errors.get(i).copied() }

    pub fn set_bin_content(&mut self, i: usize, value: f32) -> Result<()> {
        let n = self.n_bins();
        let slot = self.contents.get_mut(i).ok_or_else(|| out_of_range(&self.name, i, n))?;
        *slot = value;
        Ok(())
    }

    pub fn set_bin_error(&mut self, i: usize, value: f32) -> Result<()> {
        let n = self.n_bins();
        let slot = self.errors.get_mut(i).ok_or_else(|| out_of_range(&self.name, i, n))?;
        *slot = value;
        Ok(())
    }

    /// regular-bin contents, underflow and overflow excluded
    pub fn contents(&self) -> &[f32] { &self.contents[1..=self.n_bins()] }

    pub fn errors(&self) -> &[f32] { &self.errors[1..=self.n_bins()] }

    pub fn underflow(&self) -> f32 { self.contents[0] }

    pub fn overflow(&self) -> f32 { self.contents[self.n_bins() + 1] }

    /// bin number holding `x`; lower edges are inclusive
    pub fn find_bin(&self, x: f64) -> usize {
        if x < self.x_min() { return 0; }
        if x >= self.x_max() { return self.n_bins() + 1; }
        // edges are sorted, so the partition point is the first edge > x
        self.bin_edges.partition_point(|&e| e <= x)
    }

    /// sum over regular bins
    pub fn integral(&self) -> f64 {
        self.contents().iter().map(|&c| c as f64).sum()
    }
}

fn out_of_range(name: &str, i: usize, n_bins: usize) -> ToyHistError {
    ToyHistError::shape(name, format!("bin {i} out of range 0..={}", n_bins + 1))
}

/// Build a histogram from shared edges, central values and stat errors.
///
/// `base[0]` and `stat[0]` land in bin 1; the flow bins stay empty.
pub fn build_histogram(bin_edges: &[f64], base: &[f64], stat: &[f64], name: &str) -> Result<Histogram> {
    let mut histo = Histogram::new(name, bin_edges)?;
    let n_bins = histo.n_bins();
    if base.len() != n_bins || stat.len() != n_bins {
        return Err(ToyHistError::shape(
            name,
            format!("expected {n_bins} values and errors, got {} values and {} errors", base.len(), stat.len()),
        ));
    }
    for (i, (&base_val, &stat_val)) in base.iter().zip(stat).enumerate() {
        histo.set_bin_content(i + 1, base_val as f32)?;
        histo.set_bin_error(i + 1, stat_val as f32)?;
    }
    Ok(histo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Histogram {
        build_histogram(&[0.0, 1.0, 2.0, 3.0], &[10.0, 20.0, 30.0], &[1.0, 2.0, 3.0], "toy").unwrap()
    }

    #[test]
    fn first_value_lands_in_bin_one() {
        let h = toy();
        assert_eq!(h.n_bins(), 3);
        assert_eq!(h.bin_content(0), Some(0.0));
        assert_eq!((h.bin_content(1), h.bin_error(1)), (Some(10.0), Some(1.0)));
        assert_eq!((h.bin_content(2), h.bin_error(2)), (Some(20.0), Some(2.0)));
        assert_eq!((h.bin_content(3), h.bin_error(3)), (Some(30.0), Some(3.0)));
        assert_eq!(h.bin_content(4), Some(0.0));
        assert_eq!(h.bin_content(5), None);
    }

    #[test]
    fn regular_bin_slices_exclude_flows() {
        let h = toy();
        assert_eq!(h.contents(), &[10.0, 20.0, 30.0]);
        assert_eq!(h.errors(), &[1.0, 2.0, 3.0]);
        assert_eq!(h.underflow(), 0.0);
        assert_eq!(h.overflow(), 0.0);
        assert_eq!(h.integral(), 60.0);
    }

    #[test]
    fn variable_width_edges_kept_exactly() {
        let edges = [0.0, 0.5, 2.0, 10.0];
        let h = build_histogram(&edges, &[1.0; 3], &[0.0; 3], "var").unwrap();
        assert_eq!(h.bin_edges(), &edges);
        assert_eq!((h.x_min(), h.x_max()), (0.0, 10.0));
    }

    #[test]
    fn values_stored_as_f32() {
        let h = build_histogram(&[0.0, 1.0], &[0.1], &[0.25], "p").unwrap();
        assert_eq!(h.bin_content(1), Some(0.1f32));
        assert_eq!(h.bin_error(1), Some(0.25f32));
    }

    #[test]
    fn find_bin_uses_inclusive_lower_edges() {
        let h = toy();
        assert_eq!(h.find_bin(-0.1), 0);
        assert_eq!(h.find_bin(0.0), 1);
        assert_eq!(h.find_bin(0.99), 1);
        assert_eq!(h.find_bin(1.0), 2);
        assert_eq!(h.find_bin(2.5), 3);
        assert_eq!(h.find_bin(3.0), 4);
    }

    #[test]
    fn base_length_mismatch_is_shape_error() {
        let err = build_histogram(&[0.0, 1.0, 2.0, 3.0], &[1.0, 2.0], &[1.0, 2.0, 3.0], "bad").unwrap_err();
        assert!(matches!(err, ToyHistError::Shape { ref name, .. } if name == "bad"));
    }

    #[test]
    fn stat_length_mismatch_is_shape_error() {
        let err = build_histogram(&[0.0, 1.0, 2.0], &[1.0, 2.0], &[1.0], "bad").unwrap_err();
        assert!(matches!(err, ToyHistError::Shape { .. }));
    }

    #[test]
    fn both_too_long_is_shape_error() {
        let err = build_histogram(&[0.0, 1.0], &[1.0, 2.0], &[1.0, 2.0], "bad").unwrap_err();
        assert!(matches!(err, ToyHistError::Shape { .. }));
    }

    #[test]
    fn unsorted_or_degenerate_edges_rejected() {
        assert!(matches!(Histogram::new("h", &[0.0, 2.0, 1.0]), Err(ToyHistError::Shape { .. })));
        assert!(matches!(Histogram::new("h", &[0.0, 1.0, 1.0]), Err(ToyHistError::Shape { .. })));
        assert!(matches!(Histogram::new("h", &[0.0, f64::NAN]), Err(ToyHistError::Shape { .. })));
        assert!(matches!(Histogram::new("h", &[0.0]), Err(ToyHistError::Shape { .. })));
    }

    #[test]
    fn setters_reject_bins_past_overflow() {
        let mut h = toy();
        assert!(h.set_bin_content(4, 7.0).is_ok());
        assert_eq!(h.overflow(), 7.0);
        assert!(h.set_bin_content(5, 1.0).is_err());
        assert!(h.set_bin_error(5, 1.0).is_err());
    }
}
