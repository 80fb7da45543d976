use std::time::Instant;

use crate::color::ChartPalette;
use crate::config::ViewerConfig;
use crate::data::filter::{aggregate, initial_view, Subsets};
use crate::data::model::{
    year_options, AgeBand, Metric, PrevalenceDataset, Scope, Sex, FIRST_YEAR,
};
use crate::data::scale::{compute_scales, Scales};
use crate::playback::Playback;
use crate::tween::{MarkKey, Transitions};

// ---------------------------------------------------------------------------
// Selection: the user's current filter choice
// ---------------------------------------------------------------------------

/// Immutable `(year, sex, country, bmi)` value. Updates produce a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub year: u16,
    /// Unset until the user picks one.
    pub sex: Option<Sex>,
    /// Unset until the user picks one.
    pub country: Option<String>,
    pub bmi: Metric,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            year: FIRST_YEAR,
            sex: None,
            country: None,
            bmi: Metric::Overweight,
        }
    }
}

/// A partial update: `Some` fields replace the current value, `None` keep it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPatch {
    pub year: Option<u16>,
    pub sex: Option<Sex>,
    pub country: Option<String>,
    pub bmi: Option<Metric>,
}

impl SelectionPatch {
    pub fn year(year: u16) -> Self {
        Self {
            year: Some(year),
            ..Default::default()
        }
    }

    pub fn sex(sex: Sex) -> Self {
        Self {
            sex: Some(sex),
            ..Default::default()
        }
    }

    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            ..Default::default()
        }
    }

    pub fn bmi(bmi: Metric) -> Self {
        Self {
            bmi: Some(bmi),
            ..Default::default()
        }
    }
}

impl Selection {
    pub fn apply(&self, patch: SelectionPatch) -> Selection {
        Selection {
            year: patch.year.unwrap_or(self.year),
            sex: patch.sex.or(self.sex),
            country: patch.country.or_else(|| self.country.clone()),
            bmi: patch.bmi.unwrap_or(self.bmi),
        }
    }

    /// The sex the filters use: the chosen one, or what the selector shows
    /// while nothing has been chosen yet.
    pub fn effective_sex(&self) -> Sex {
        self.sex.unwrap_or(Sex::DEFAULT)
    }
}

// ---------------------------------------------------------------------------
// ChartView: the render-ready payload
// ---------------------------------------------------------------------------

/// Everything the display layer needs for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub subsets: Subsets,
    pub scales: Scales,
    /// `false` for the first paint built by the initial-view filter.
    pub from_selection: bool,
}

impl ChartView {
    pub fn for_selection(dataset: &PrevalenceDataset, selection: &Selection) -> Self {
        let subsets = aggregate(dataset, selection);
        let scales = compute_scales(dataset, &subsets);
        Self {
            subsets,
            scales,
            from_selection: true,
        }
    }

    pub fn initial(dataset: &PrevalenceDataset, year: u16) -> Self {
        let subsets = initial_view(dataset, year);
        let scales = compute_scales(dataset, &subsets);
        Self {
            subsets,
            scales,
            from_selection: false,
        }
    }

    /// Target value for every mark, used to drive transitions.
    pub fn mark_targets(&self, dataset: &PrevalenceDataset) -> Vec<(MarkKey, f64)> {
        let mut targets = Vec::new();
        for band in [AgeBand::Children, AgeBand::Adults] {
            for scope in [Scope::Local, Scope::Global] {
                if let Some(rec) = self.subsets.first(dataset, scope, band) {
                    targets.push((MarkKey::Arc(band, scope), rec.mean));
                }
            }
        }
        for scope in [Scope::Local, Scope::Global] {
            for &i in self.subsets.get(scope, AgeBand::Other) {
                let rec = dataset.record(i);
                targets.push((MarkKey::Bar(scope, rec.age_group.clone()), rec.mean));
            }
        }
        targets
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<PrevalenceDataset>,

    pub selection: Selection,

    /// Derived payload for the current selection.
    pub view: Option<ChartView>,

    pub playback: Playback,

    pub transitions: Transitions,

    pub palette: ChartPalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        let playback = Playback::new(year_options(), config.playback_interval());
        let palette = if config.colorblind_palette {
            ChartPalette::ColorBlind
        } else {
            ChartPalette::Standard
        };
        Self {
            config,
            dataset: None,
            selection: Selection::default(),
            view: None,
            playback,
            transitions: Transitions::default(),
            palette,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and paint the initial view.
    pub fn set_dataset(&mut self, dataset: PrevalenceDataset, now: Instant) {
        self.selection = Selection::default();
        if self.playback.is_playing() {
            self.playback.toggle(now);
        }
        self.transitions.clear();

        let view = ChartView::initial(&dataset, self.selection.year);
        self.publish(view, &dataset, now);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Drop any dataset after a failed load so nothing stale is drawn.
    pub fn fail_load(&mut self, message: String) {
        self.dataset = None;
        self.view = None;
        self.transitions.clear();
        self.status_message = Some(message);
    }

    /// The single entry point for selection changes.
    ///
    /// Applies `patch`, recomputes subsets and scales, and retargets the
    /// in-flight transitions. Returns the new view, or `None` without a dataset.
    pub fn update_selection(&mut self, patch: SelectionPatch, now: Instant) -> Option<&ChartView> {
        self.selection = self.selection.apply(patch);
        log::debug!("selection changed: {:?}", self.selection);

        let dataset = self.dataset.take()?;
        let view = ChartView::for_selection(&dataset, &self.selection);
        self.publish(view, &dataset, now);
        self.dataset = Some(dataset);
        self.view.as_ref()
    }

    fn publish(&mut self, view: ChartView, dataset: &PrevalenceDataset, now: Instant) {
        self.transitions
            .retarget_all(view.mark_targets(dataset), now, self.config.transition());
        self.view = Some(view);
    }

    /// Start or stop stepping through the years.
    pub fn toggle_playback(&mut self, now: Instant) {
        self.playback.toggle(now);
    }

    /// Apply a due playback step, if any. Call once per frame.
    pub fn advance_playback(&mut self, now: Instant) -> bool {
        match self.playback.poll(now) {
            Some(year) => {
                log::debug!("playback step to {year}");
                self.update_selection(SelectionPatch::year(year), now);
                true
            }
            None => false,
        }
    }

    pub fn toggle_palette(&mut self) {
        self.palette = self.palette.toggled();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data::model::fixtures::record;

    fn dataset() -> PrevalenceDataset {
        let mut rows = Vec::new();
        for year in year_options() {
            let t = (year - FIRST_YEAR) as f64 / 100.0;
            rows.push(record("D0", "Developed", "36", "2 to 19", year, Sex::Male, Metric::Overweight, 0.2 + t));
            rows.push(record("KEN", "Kenya", "2", "2 to 4", year, Sex::Female, Metric::Obese, 0.05 + t));
            rows.push(record("KEN", "Kenya", "38", "20+", year, Sex::Female, Metric::Obese, 0.1 + t));
            rows.push(record("G", "Global", "38", "20+", year, Sex::Female, Metric::Obese, 0.15 + t));
            rows.push(record("G", "Global", "38", "20+", year, Sex::Male, Metric::Overweight, 0.3 + t));
        }
        PrevalenceDataset::from_records(rows)
    }

    fn loaded() -> (AppState, Instant) {
        let now = Instant::now();
        let mut state = AppState::default();
        state.set_dataset(dataset(), now);
        (state, now)
    }

    #[test]
    fn patch_changes_only_its_field() {
        let base = Selection {
            year: 2000,
            sex: Some(Sex::Female),
            country: Some("Kenya".into()),
            bmi: Metric::Obese,
        };

        let changed = base.apply(SelectionPatch::year(2005));
        assert_eq!(changed, Selection { year: 2005, ..base.clone() });

        let changed = base.apply(SelectionPatch::sex(Sex::Both));
        assert_eq!(changed, Selection { sex: Some(Sex::Both), ..base.clone() });

        let changed = base.apply(SelectionPatch::country("Chile"));
        assert_eq!(changed, Selection { country: Some("Chile".into()), ..base.clone() });

        let changed = base.apply(SelectionPatch::bmi(Metric::Overweight));
        assert_eq!(changed, Selection { bmi: Metric::Overweight, ..base.clone() });

        assert_eq!(base.apply(SelectionPatch::default()), base);
    }

    #[test]
    fn defaults_match_first_paint() {
        let selection = Selection::default();
        assert_eq!(selection.year, 1990);
        assert_eq!(selection.sex, None);
        assert_eq!(selection.country, None);
        assert_eq!(selection.bmi, Metric::Overweight);
        assert_eq!(selection.effective_sex(), Sex::Male);
    }

    #[test]
    fn playback_right_after_load_keeps_global_rows() {
        let (mut state, start) = loaded();
        let before = state.view.as_ref().unwrap().subsets.global_adults.len();
        assert_eq!(before, 1);

        let interval = state.config.playback_interval();
        state.toggle_playback(start);
        assert!(state.advance_playback(start + interval));

        assert_eq!(state.selection.sex, None);
        let view = state.view.as_ref().unwrap();
        assert!(view.from_selection);
        assert_eq!(view.subsets.global_adults.len(), 1);
        let ds = state.dataset.as_ref().unwrap();
        let global = view.subsets.first(ds, Scope::Global, AgeBand::Adults).unwrap();
        assert_eq!(global.sex, Sex::Male);
        assert_eq!(global.mean, 0.3);
    }

    #[test]
    fn loading_paints_the_initial_view() {
        let (state, _) = loaded();
        let view = state.view.as_ref().unwrap();
        let ds = state.dataset.as_ref().unwrap();

        assert!(!view.from_selection);
        let local = view.subsets.first(ds, Scope::Local, AgeBand::Children).unwrap();
        assert_eq!(local.location_code, "D0");
        assert_eq!(local.year, 1990);
        let global = view.subsets.first(ds, Scope::Global, AgeBand::Adults).unwrap();
        assert_eq!(global.mean, 0.3);
    }

    #[test]
    fn update_selection_recomputes_the_view() {
        let (mut state, now) = loaded();
        state.update_selection(SelectionPatch::sex(Sex::Female), now);
        state.update_selection(SelectionPatch::bmi(Metric::Obese), now);
        let view = state
            .update_selection(SelectionPatch::country("Kenya"), now)
            .unwrap()
            .clone();
        let ds = state.dataset.as_ref().unwrap();

        assert!(view.from_selection);
        assert_eq!(view.subsets.local_all.len(), 1);
        assert_eq!(view.subsets.local_adults.len(), 1);
        assert_eq!(view.subsets.global_adults.len(), 1);
        assert_eq!(view.scales.categories, ["2 to 4"]);
        assert_eq!(view.scales.magnitude.1, ds.max_mean());
    }

    #[test]
    fn update_without_dataset_only_changes_selection() {
        let mut state = AppState::default();
        assert!(state
            .update_selection(SelectionPatch::year(2001), Instant::now())
            .is_none());
        assert_eq!(state.selection.year, 2001);
        assert!(state.view.is_none());
    }

    #[test]
    fn playback_walks_years_then_stops() {
        let (mut state, start) = loaded();
        state.update_selection(SelectionPatch::sex(Sex::Female), start);
        state.update_selection(SelectionPatch::country("Kenya"), start);
        state.toggle_playback(start);

        let interval = state.config.playback_interval();
        for n in 1..=3u32 {
            assert!(state.advance_playback(start + interval * n));
        }
        assert_eq!(state.selection.year, 1992);
        assert_eq!(state.selection.country.as_deref(), Some("Kenya"));
        assert!(state.view.as_ref().unwrap().from_selection);

        for n in 4..=30u32 {
            state.advance_playback(start + interval * n);
        }
        assert_eq!(state.selection.year, 2013);
        assert!(!state.playback.is_playing());
    }

    #[test]
    fn cancelling_keeps_the_year() {
        let (mut state, start) = loaded();
        state.update_selection(SelectionPatch::year(2004), start);
        state.toggle_playback(start);
        state.toggle_playback(start);

        assert!(!state.advance_playback(start + Duration::from_secs(5)));
        assert_eq!(state.selection.year, 2004);
    }

    #[test]
    fn transitions_retarget_on_update() {
        let (mut state, now) = loaded();
        let key = MarkKey::Arc(AgeBand::Adults, Scope::Global);
        let settled = now + state.config.transition();
        assert_eq!(state.transitions.value(&key, settled), Some(0.3));

        state.update_selection(SelectionPatch::sex(Sex::Male), settled);
        state.update_selection(SelectionPatch::year(2000), settled);
        let done = settled + state.config.transition();
        assert_eq!(state.transitions.value(&key, done), Some(0.3 + 0.1));
    }

    #[test]
    fn failed_load_clears_the_chart() {
        let (mut state, _) = loaded();
        state.fail_load("Error: bad file".into());
        assert!(state.dataset.is_none());
        assert!(state.view.is_none());
        assert_eq!(state.status_message.as_deref(), Some("Error: bad file"));
    }
}
