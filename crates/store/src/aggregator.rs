//! Global loading indicator.
//!
//! Watches the loading flag of every slice and drives one progress bar.
//! The percentage is simulated: it creeps up on each tick while anything
//! is loading, snaps to 100 when everything settles, then hides after a
//! short delay.

use rand::Rng;

use crate::LoadingSnapshot;

/// Timing and progress parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    /// Interval between ticks, in milliseconds
    pub tick_ms: u32,
    /// Smallest random progress step per tick
    pub min_step: f64,
    /// Largest random progress step per tick
    pub max_step: f64,
    /// Progress never passes this while loading
    pub ceiling: f64,
    /// How long the finished bar stays visible, in milliseconds
    pub hide_delay_ms: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            min_step: 2.0,
            max_step: 8.0,
            ceiling: 90.0,
            hide_delay_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Hidden
    Idle,
    /// At least one slice is loading
    Active,
    /// Everything settled at `since_ms`; shown at 100% until the hide delay
    Settling { since_ms: u64 },
}

/// State machine behind the loading bar.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingAggregator {
    config: AggregatorConfig,
    phase: Phase,
    progress: f64,
    message: String,
}

impl Default for LoadingAggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::default())
    }
}

impl LoadingAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            progress: 0.0,
            message: String::new(),
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Progress in percent.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// React to a new snapshot of slice loading flags.
    pub fn observe(&mut self, snapshot: &LoadingSnapshot, now_ms: u64) {
        if snapshot.any_loading() {
            if self.phase != Phase::Active {
                log::debug!("loading started: {}", snapshot.message());
                self.phase = Phase::Active;
                self.progress = 0.0;
            }
            self.message = snapshot.message();
        } else if self.phase == Phase::Active {
            self.phase = Phase::Settling { since_ms: now_ms };
            self.progress = 100.0;
        }
    }

    /// Advance the simulated progress, or hide once the delay has passed.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, now_ms: u64) {
        match self.phase {
            Phase::Active => {
                let (lo, hi) = (self.config.min_step, self.config.max_step);
                let step = lo + rng.r#gen::<f64>() * (hi - lo);
                self.progress = (self.progress + step).min(self.config.ceiling);
            }
            Phase::Settling { since_ms }
                if now_ms.saturating_sub(since_ms) >= self.config.hide_delay_ms =>
            {
                self.phase = Phase::Idle;
                self.progress = 0.0;
                self.message.clear();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SliceKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn snapshot(auth: bool, tasks: bool) -> LoadingSnapshot {
        LoadingSnapshot::from_flags([(SliceKind::Auth, auth), (SliceKind::Tasks, tasks)])
    }

    #[test]
    fn test_starts_idle() {
        let aggregator = LoadingAggregator::default();
        assert_eq!(aggregator.phase(), Phase::Idle);
        assert!(!aggregator.is_visible());
    }

    #[test]
    fn test_auth_loading_activates_with_message() {
        let mut aggregator = LoadingAggregator::default();

        aggregator.observe(&snapshot(true, false), 0);

        assert!(aggregator.is_active());
        assert_eq!(aggregator.progress(), 0.0);
        assert!(aggregator.message().contains("authenticating"));
    }

    #[test]
    fn test_idle_only_after_hide_delay() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut aggregator = LoadingAggregator::default();
        let delay = aggregator.config().hide_delay_ms;

        aggregator.observe(&snapshot(true, false), 0);
        aggregator.tick(&mut rng, 200);
        aggregator.observe(&snapshot(false, false), 1_000);

        assert_eq!(aggregator.phase(), Phase::Settling { since_ms: 1_000 });
        assert_eq!(aggregator.progress(), 100.0);

        aggregator.tick(&mut rng, 1_000 + delay - 1);
        assert!(aggregator.is_visible());

        aggregator.tick(&mut rng, 1_000 + delay);
        assert_eq!(aggregator.phase(), Phase::Idle);
        assert_eq!(aggregator.progress(), 0.0);
        assert!(aggregator.message().is_empty());
    }

    #[test]
    fn test_stays_active_while_any_slice_loads() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut aggregator = LoadingAggregator::default();

        aggregator.observe(&snapshot(true, true), 0);
        aggregator.observe(&snapshot(false, true), 100);
        for t in 0..50 {
            aggregator.tick(&mut rng, 200 + t * 200);
        }

        assert!(aggregator.is_active());
        assert_eq!(aggregator.message(), "loading tasks");
    }

    #[test]
    fn test_progress_stays_below_ceiling() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut aggregator = LoadingAggregator::default();
        let ceiling = aggregator.config().ceiling;

        aggregator.observe(&snapshot(true, false), 0);
        let mut last = 0.0;
        for t in 1..200 {
            aggregator.tick(&mut rng, t * 200);
            assert!(aggregator.progress() >= last);
            assert!(aggregator.progress() <= ceiling);
            last = aggregator.progress();
        }
        assert!(aggregator.progress() < 100.0);
    }

    #[test]
    fn test_step_within_configured_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = AggregatorConfig {
            min_step: 5.0,
            max_step: 5.0,
            ..AggregatorConfig::default()
        };
        let mut aggregator = LoadingAggregator::new(config);

        aggregator.observe(&snapshot(true, false), 0);
        aggregator.tick(&mut rng, 200);
        aggregator.tick(&mut rng, 400);

        assert!((aggregator.progress() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_reload_during_settling_restarts() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut aggregator = LoadingAggregator::default();

        aggregator.observe(&snapshot(true, false), 0);
        aggregator.observe(&snapshot(false, false), 500);
        aggregator.observe(&snapshot(false, true), 600);

        assert!(aggregator.is_active());
        assert_eq!(aggregator.progress(), 0.0);

        // The old settling deadline no longer applies.
        aggregator.tick(&mut rng, 5_000);
        assert!(aggregator.is_active());
    }

    #[test]
    fn test_idle_ignores_settled_snapshots_and_ticks() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut aggregator = LoadingAggregator::default();

        aggregator.observe(&snapshot(false, false), 0);
        aggregator.tick(&mut rng, 10_000);

        assert_eq!(aggregator.phase(), Phase::Idle);
        assert_eq!(aggregator.progress(), 0.0);
    }
}
