use serde::{Deserialize, Serialize};

/// Staged growth shared by crops and trees.
///
/// Stages run `0..=max_stage`; `max_stage` is mature. A single `update` never
/// advances more than one stage. After a fruit harvest the final stage takes
/// `cooldown_secs` instead of the regular stage time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Growable {
    stage: u32,
    max_stage: u32,
    stage_secs: f32,
    elapsed_secs: f32,
    cooldown_secs: Option<f32>,
}

impl Growable {
    /// `total_secs` is the time from planting to maturity.
    pub(crate) fn new(max_stage: u32, total_secs: f32) -> Self {
        let max_stage = max_stage.max(1);
        Self {
            stage: 0,
            max_stage,
            stage_secs: (total_secs / max_stage as f32).max(0.0),
            elapsed_secs: 0.0,
            cooldown_secs: None,
        }
    }

    pub(crate) fn stage(&self) -> u32 {
        self.stage
    }

    pub(crate) fn max_stage(&self) -> u32 {
        self.max_stage
    }

    pub(crate) fn is_mature(&self) -> bool {
        self.stage >= self.max_stage
    }

    /// Mature, or regrowing fruit after a harvest.
    pub(crate) fn is_grown(&self) -> bool {
        self.is_mature() || self.cooldown_secs.is_some()
    }

    pub(crate) fn progress(&self) -> f32 {
        if self.is_mature() {
            return 1.0;
        }
        let duration = self.current_stage_secs();
        let fraction = if duration > 0.0 {
            (self.elapsed_secs / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((self.stage as f32 + fraction) / self.max_stage as f32).clamp(0.0, 1.0)
    }

    pub(crate) fn update(&mut self, dt_secs: f32) -> bool {
        if self.is_mature() || !dt_secs.is_finite() {
            return false;
        }
        self.elapsed_secs += dt_secs.max(0.0);
        if self.elapsed_secs >= self.current_stage_secs() {
            self.advance_one_stage();
            return true;
        }
        false
    }

    /// Applies `total_secs` of growth, one stage at a time. Time beyond a
    /// stage boundary carries into the next stage. Returns stages gained.
    pub(crate) fn fast_forward(&mut self, total_secs: f32) -> u32 {
        if !total_secs.is_finite() {
            return 0;
        }
        let mut remaining = total_secs.max(0.0);
        let mut advanced = 0;
        while !self.is_mature() {
            let needed = (self.current_stage_secs() - self.elapsed_secs).max(0.0);
            if remaining < needed {
                self.elapsed_secs += remaining;
                break;
            }
            remaining -= needed;
            self.advance_one_stage();
            advanced += 1;
        }
        advanced
    }

    /// Drops back to the last growing stage and starts the fruit cooldown.
    pub(crate) fn harvest_fruit(&mut self, cooldown_secs: f32) -> bool {
        if !self.is_mature() {
            return false;
        }
        self.stage = self.max_stage - 1;
        self.elapsed_secs = 0.0;
        self.cooldown_secs = Some(cooldown_secs.max(0.0));
        true
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.stage_secs.is_finite()
            && self.elapsed_secs.is_finite()
            && self.cooldown_secs.map_or(true, f32::is_finite)
    }

    fn current_stage_secs(&self) -> f32 {
        match self.cooldown_secs {
            Some(cooldown) if self.stage + 1 == self.max_stage => cooldown,
            _ => self.stage_secs,
        }
    }

    fn advance_one_stage(&mut self) {
        self.stage = (self.stage + 1).min(self.max_stage);
        self.elapsed_secs = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_advances_at_most_one_stage_per_call() {
        let mut growable = Growable::new(3, 30.0);

        assert!(growable.update(100.0));
        assert_eq!(growable.stage(), 1);
        assert!(!growable.update(0.0));
        assert_eq!(growable.stage(), 1);
    }

    #[test]
    fn update_resets_the_accumulator_on_advance() {
        let mut growable = Growable::new(2, 20.0);

        assert!(!growable.update(6.0));
        assert!(growable.update(6.0));
        assert_eq!(growable.stage(), 1);
        assert!(!growable.update(9.0));
        assert!(growable.update(1.0));
        assert!(growable.is_mature());
    }

    #[test]
    fn fast_forward_reaches_the_stage_implied_by_total_time() {
        let mut growable = Growable::new(3, 30.0);

        assert_eq!(growable.fast_forward(25.0), 2);
        assert_eq!(growable.stage(), 2);
        assert!((growable.progress() - 25.0 / 30.0).abs() < 0.0001);

        assert_eq!(growable.fast_forward(1000.0), 1);
        assert!(growable.is_mature());
        assert_eq!(growable.progress(), 1.0);
    }

    #[test]
    fn progress_interpolates_within_a_stage() {
        let mut growable = Growable::new(2, 20.0);
        growable.fast_forward(5.0);

        assert!((growable.progress() - 0.25).abs() < 0.0001);
    }

    #[test]
    fn fruit_harvest_requires_maturity_and_starts_cooldown() {
        let mut growable = Growable::new(3, 120.0);
        assert!(!growable.harvest_fruit(40.0));

        growable.fast_forward(120.0);
        assert!(growable.harvest_fruit(40.0));
        assert_eq!(growable.stage(), 2);
        assert!(!growable.is_mature());
        assert!(growable.is_grown());

        growable.fast_forward(39.0);
        assert!(!growable.is_mature());
        growable.fast_forward(1.0);
        assert!(growable.is_mature());
    }

    #[test]
    fn non_finite_time_is_ignored() {
        let mut growable = Growable::new(2, 20.0);

        assert_eq!(growable.fast_forward(f32::NAN), 0);
        assert!(!growable.update(f32::INFINITY));
        assert!(growable.is_finite());
        assert_eq!(growable.progress(), 0.0);
    }
}
