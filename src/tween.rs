//! Easing and retargetable numeric transitions.
//!
//! Marks on the chart animate between plain numeric snapshots. A new target
//! arriving mid-flight restarts the transition from whatever is currently on
//! screen; pending targets are never queued.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::data::model::{AgeBand, Scope};

/// Cubic ease-in-out on `t ∈ [0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Linear interpolation that returns `a` and `b` exactly at the endpoints.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start: Instant,
    pub duration: Duration,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Fraction of the duration elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        lerp(self.from, self.to, ease_cubic_in_out(self.progress(now)))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Head for `to`, starting from the value shown at `now`.
    pub fn retarget(&mut self, now: Instant, to: f64) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
    }
}

// ---------------------------------------------------------------------------
// Transitions keyed by chart mark
// ---------------------------------------------------------------------------

/// Identity of an animated mark.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MarkKey {
    /// Ring sweep for an age band.
    Arc(AgeBand, Scope),
    /// Bar length for an age-group category.
    Bar(Scope, String),
}

/// All in-flight transitions for one chart.
#[derive(Debug, Clone, Default)]
pub struct Transitions {
    tweens: BTreeMap<MarkKey, Tween>,
}

impl Transitions {
    /// Move every mark towards its new target.
    ///
    /// Marks missing from `targets` are dropped. New marks grow from zero.
    pub fn retarget_all(
        &mut self,
        targets: impl IntoIterator<Item = (MarkKey, f64)>,
        now: Instant,
        duration: Duration,
    ) {
        let mut next = BTreeMap::new();
        for (key, to) in targets {
            let tween = match self.tweens.remove(&key) {
                Some(mut tween) => {
                    tween.duration = duration;
                    tween.retarget(now, to);
                    tween
                }
                None => Tween::new(0.0, to, now, duration),
            };
            next.insert(key, tween);
        }
        self.tweens = next;
    }

    pub fn value(&self, key: &MarkKey, now: Instant) -> Option<f64> {
        self.tweens.get(key).map(|t| t.value_at(now))
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.tweens.values().any(|t| !t.is_finished(now))
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_250: Duration = Duration::from_millis(250);

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
        assert_eq!(ease_cubic_in_out(-3.0), 0.0);
        assert_eq!(ease_cubic_in_out(7.0), 1.0);
    }

    #[test]
    fn easing_is_monotone() {
        let samples: Vec<f64> = (0..=100).map(|i| ease_cubic_in_out(i as f64 / 100.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn tween_runs_from_start_to_target() {
        let start = Instant::now();
        let tween = Tween::new(0.2, 0.6, start, MS_250);

        assert_eq!(tween.value_at(start), 0.2);
        assert!((tween.value_at(start + MS_250 / 2) - 0.4).abs() < 1e-9);
        assert_eq!(tween.value_at(start + MS_250), 0.6);
        assert_eq!(tween.value_at(start + MS_250 * 4), 0.6);
        assert!(tween.is_finished(start + MS_250));
        assert!(!tween.is_finished(start + MS_250 / 2));
    }

    #[test]
    fn zero_duration_jumps() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 1.0, start, Duration::ZERO);
        assert_eq!(tween.value_at(start), 1.0);
    }

    #[test]
    fn retarget_continues_from_displayed_value() {
        let start = Instant::now();
        let mut tween = Tween::new(0.0, 1.0, start, MS_250);
        let mid = start + MS_250 / 2;
        let shown = tween.value_at(mid);

        tween.retarget(mid, 0.0);
        assert!((tween.value_at(mid) - shown).abs() < 1e-12);
        assert_eq!(tween.value_at(mid + MS_250), 0.0);
    }

    #[test]
    fn transitions_add_retarget_and_drop_marks() {
        let start = Instant::now();
        let arc = MarkKey::Arc(AgeBand::Children, Scope::Local);
        let bar = MarkKey::Bar(Scope::Global, "2 to 4".into());
        let mut transitions = Transitions::default();

        transitions.retarget_all([(arc.clone(), 0.4), (bar.clone(), 0.2)], start, MS_250);
        assert_eq!(transitions.value(&arc, start), Some(0.0));
        assert!(transitions.is_animating(start));

        let later = start + MS_250;
        assert_eq!(transitions.value(&arc, later), Some(0.4));
        assert!(!transitions.is_animating(later));

        transitions.retarget_all([(arc.clone(), 0.1)], later, MS_250);
        assert_eq!(transitions.value(&arc, later), Some(0.4));
        assert_eq!(transitions.value(&arc, later + MS_250), Some(0.1));
        assert_eq!(transitions.value(&bar, later), None);
    }
}
