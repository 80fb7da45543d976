use super::model::{
    AgeBand, Metric, PrevalenceDataset, PrevalenceRecord, Scope, INITIAL_LOCAL_LOCATION,
};
use crate::state::Selection;

// ---------------------------------------------------------------------------
// Subsets: the six partitions the chart binds to
// ---------------------------------------------------------------------------

/// Row indices for every local/global × age band combination.
///
/// Each list keeps dataset order so marks can be bound positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subsets {
    pub local_all: Vec<usize>,
    pub local_children: Vec<usize>,
    pub local_adults: Vec<usize>,
    pub global_all: Vec<usize>,
    pub global_children: Vec<usize>,
    pub global_adults: Vec<usize>,
}

impl Subsets {
    pub fn get(&self, scope: Scope, band: AgeBand) -> &[usize] {
        match (scope, band) {
            (Scope::Local, AgeBand::Other) => &self.local_all,
            (Scope::Local, AgeBand::Children) => &self.local_children,
            (Scope::Local, AgeBand::Adults) => &self.local_adults,
            (Scope::Global, AgeBand::Other) => &self.global_all,
            (Scope::Global, AgeBand::Children) => &self.global_children,
            (Scope::Global, AgeBand::Adults) => &self.global_adults,
        }
    }

    fn bucket_mut(&mut self, scope: Scope, band: AgeBand) -> &mut Vec<usize> {
        match (scope, band) {
            (Scope::Local, AgeBand::Other) => &mut self.local_all,
            (Scope::Local, AgeBand::Children) => &mut self.local_children,
            (Scope::Local, AgeBand::Adults) => &mut self.local_adults,
            (Scope::Global, AgeBand::Other) => &mut self.global_all,
            (Scope::Global, AgeBand::Children) => &mut self.global_children,
            (Scope::Global, AgeBand::Adults) => &mut self.global_adults,
        }
    }

    /// First row of a bucket; arcs and legend captions bind to one row.
    pub fn first<'a>(
        &self,
        dataset: &'a PrevalenceDataset,
        scope: Scope,
        band: AgeBand,
    ) -> Option<&'a PrevalenceRecord> {
        self.get(scope, band).first().map(|&i| dataset.record(i))
    }

    pub fn is_empty(&self) -> bool {
        self.local_all.is_empty()
            && self.local_children.is_empty()
            && self.local_adults.is_empty()
            && self.global_all.is_empty()
            && self.global_children.is_empty()
            && self.global_adults.is_empty()
    }

    /// Split rows that pass `keep` into buckets by scope and age band.
    fn partition<F>(dataset: &PrevalenceDataset, mut keep: F) -> Self
    where
        F: FnMut(&PrevalenceRecord, Scope) -> bool,
    {
        let mut subsets = Subsets::default();
        for (i, rec) in dataset.records().iter().enumerate() {
            let scope = rec.scope();
            if keep(rec, scope) {
                subsets.bucket_mut(scope, rec.age_band()).push(i);
            }
        }
        subsets
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Partition the dataset for the current selection.
///
/// A row is kept when:
/// * its year, sex and metric equal the selection's
/// * it is a local row whose `location_name` equals the selected country, or
///   it is a global row (the country does not apply to global rows)
///
/// An unset country never matches, so it leaves every local bucket empty. An
/// unset sex falls back to the selector's initial entry
/// ([`Sex::DEFAULT`](crate::data::model::Sex::DEFAULT)).
pub fn aggregate(dataset: &PrevalenceDataset, selection: &Selection) -> Subsets {
    Subsets::partition(dataset, |rec, scope| {
        if rec.year != selection.year || rec.metric != selection.bmi {
            return false;
        }
        if rec.sex != selection.effective_sex() {
            return false;
        }
        match scope {
            Scope::Global => true,
            Scope::Local => selection.country.as_deref() == Some(rec.location_name.as_str()),
        }
    })
}

/// The first paint before any user interaction.
///
/// This deliberately differs from [`aggregate`]: the sex is picked by
/// `sex_id == "1"` and the metric is fixed to overweight, and the local half
/// comes from the `D0` location code instead of a country name.
pub fn initial_view(dataset: &PrevalenceDataset, year: u16) -> Subsets {
    Subsets::partition(dataset, |rec, scope| {
        if rec.year != year || rec.sex_id != "1" || rec.metric != Metric::Overweight {
            return false;
        }
        match scope {
            Scope::Global => true,
            Scope::Local => rec.location_code == INITIAL_LOCAL_LOCATION,
        }
    })
}
