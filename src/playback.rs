use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Playback driver: steps through the year list on a fixed interval
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Playing {
        /// Index into `years` of the next year to emit.
        next: usize,
        /// When that year is due.
        due: Instant,
    },
}

/// Non-looping year sequencer with toggle semantics.
///
/// Owns at most one pending deadline. Time is passed in by the caller so the
/// frame loop (or a test) decides what "now" is.
#[derive(Debug, Clone)]
pub struct Playback {
    years: Vec<u16>,
    interval: Duration,
    phase: Phase,
}

impl Playback {
    pub fn new(years: Vec<u16>, interval: Duration) -> Self {
        Self {
            years,
            interval,
            phase: Phase::Idle,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing { .. })
    }

    /// Start from the first year, or cancel if already running.
    ///
    /// The first year is emitted one interval after starting. Cancelling
    /// emits nothing, so the selected year stays where it was.
    pub fn toggle(&mut self, now: Instant) {
        self.phase = match self.phase {
            Phase::Playing { .. } => {
                log::debug!("playback cancelled");
                Phase::Idle
            }
            Phase::Idle if self.years.is_empty() => Phase::Idle,
            Phase::Idle => {
                log::debug!("playback started, {} years", self.years.len());
                Phase::Playing {
                    next: 0,
                    due: now + self.interval,
                }
            }
        };
    }

    /// Emit the next year immediately, ignoring the deadline.
    ///
    /// Returns `None` when idle. Emitting the last year returns to idle.
    pub fn tick(&mut self) -> Option<u16> {
        let Phase::Playing { next, due } = self.phase else {
            return None;
        };
        let year = self.years[next];
        self.phase = if next + 1 < self.years.len() {
            Phase::Playing {
                next: next + 1,
                due: due + self.interval,
            }
        } else {
            log::debug!("playback finished at {year}");
            Phase::Idle
        };
        Some(year)
    }

    /// Emit at most one year if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<u16> {
        match self.phase {
            Phase::Playing { due, .. } if now >= due => self.tick(),
            _ => None,
        }
    }

    /// How long until the next year is due, for scheduling a repaint.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        match self.phase {
            Phase::Playing { due, .. } => Some(due.saturating_duration_since(now)),
            Phase::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::year_options;

    const INTERVAL: Duration = Duration::from_millis(750);

    fn driver() -> Playback {
        Playback::new(year_options(), INTERVAL)
    }

    #[test]
    fn n_ticks_reach_the_nth_year() {
        for n in 1..=24usize {
            let mut playback = driver();
            playback.toggle(Instant::now());
            let mut last = None;
            for _ in 0..n {
                last = playback.tick();
            }
            assert_eq!(last, Some(1990 + n as u16 - 1));
        }
    }

    #[test]
    fn stops_after_the_last_year() {
        let mut playback = driver();
        playback.toggle(Instant::now());
        let emitted: Vec<u16> = std::iter::from_fn(|| playback.tick()).collect();

        assert_eq!(emitted, year_options());
        assert!(!playback.is_playing());
        assert_eq!(playback.tick(), None);
    }

    #[test]
    fn toggling_twice_returns_to_idle_without_emitting() {
        let mut playback = driver();
        let now = Instant::now();
        playback.toggle(now);
        playback.toggle(now);

        assert!(!playback.is_playing());
        assert_eq!(playback.poll(now + INTERVAL * 5), None);
        assert_eq!(playback.time_until_next(now), None);
    }

    #[test]
    fn restarting_begins_at_the_first_year() {
        let mut playback = driver();
        let now = Instant::now();
        playback.toggle(now);
        playback.tick();
        playback.tick();
        playback.toggle(now);
        playback.toggle(now);
        assert_eq!(playback.tick(), Some(1990));
    }

    #[test]
    fn poll_respects_the_interval() {
        let mut playback = driver();
        let start = Instant::now();
        playback.toggle(start);

        assert_eq!(playback.poll(start), None);
        assert_eq!(playback.poll(start + INTERVAL / 2), None);
        assert_eq!(playback.poll(start + INTERVAL), Some(1990));
        assert_eq!(playback.poll(start + INTERVAL), None);
        assert_eq!(playback.poll(start + INTERVAL * 2), Some(1991));
        assert_eq!(
            playback.time_until_next(start + INTERVAL * 2),
            Some(INTERVAL)
        );
    }

    #[test]
    fn late_poll_emits_one_year_at_a_time() {
        let mut playback = driver();
        let start = Instant::now();
        playback.toggle(start);

        let late = start + INTERVAL * 10;
        assert_eq!(playback.poll(late), Some(1990));
        assert_eq!(playback.poll(late), Some(1991));
    }

    #[test]
    fn empty_year_list_never_plays() {
        let mut playback = Playback::new(Vec::new(), INTERVAL);
        playback.toggle(Instant::now());
        assert!(!playback.is_playing());
        assert_eq!(playback.tick(), None);
    }
}
