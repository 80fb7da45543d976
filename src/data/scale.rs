use super::filter::Subsets;
use super::model::PrevalenceDataset;

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// Axis domains for one frame of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    /// Horizontal magnitude domain, `[0, max mean over the whole dataset]`.
    pub magnitude: (f64, f64),
    /// Bar categories (`age_group` labels) in first-occurrence order.
    pub categories: Vec<String>,
}

/// Derive the domains for the current subsets.
///
/// The magnitude domain ignores the selection so bar lengths stay comparable
/// between selections.
pub fn compute_scales(dataset: &PrevalenceDataset, subsets: &Subsets) -> Scales {
    let mut categories: Vec<String> = Vec::new();
    for &i in &subsets.local_all {
        let label = &dataset.record(i).age_group;
        if !categories.iter().any(|c| c == label) {
            categories.push(label.clone());
        }
    }

    Scales {
        magnitude: (0.0, dataset.max_mean()),
        categories,
    }
}

// ---------------------------------------------------------------------------
// BandScale
// ---------------------------------------------------------------------------

/// Ordinal scale giving each category an equal band separated by padding.
///
/// The first category sits nearest the low end of the range, which is the
/// bottom of a plot whose y axis points up.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    categories: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    pub fn new(categories: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        Self {
            categories,
            range,
            padding: padding.clamp(0.0, 1.0),
        }
    }

    fn step(&self) -> f64 {
        let n = self.categories.len() as f64;
        let extent = (self.range.1 - self.range.0).abs();
        // n bands, n - 1 inner gaps, two outer gaps
        extent / (n - self.padding + 2.0 * self.padding).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        if self.categories.is_empty() {
            return 0.0;
        }
        self.step() * (1.0 - self.padding)
    }

    /// Lower edge of the band for `label`, or `None` for unknown categories.
    pub fn position(&self, label: &str) -> Option<f64> {
        let index = self.categories.iter().position(|c| c == label)?;
        let step = self.step();
        let lo = self.range.0.min(self.range.1);
        Some(lo + step * self.padding + step * index as f64)
    }

    /// Centre of the band for `label`.
    pub fn center(&self, label: &str) -> Option<f64> {
        self.position(label).map(|p| p + self.bandwidth() / 2.0)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}
