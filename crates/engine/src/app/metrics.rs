use std::time::{Duration, Instant};

/// Per-interval loop rates plus renderable churn.
///
/// Churn counts how many renderables were created and destroyed during the
/// interval. A farm that is only growing between buckets should show zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub renderables_created: u64,
    pub renderables_destroyed: u64,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    frame_time_sum: Duration,
    added_at_start: u64,
    removed_at_start: u64,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval_start: Instant::now(),
            interval,
            frames: 0,
            ticks: 0,
            frame_time_sum: Duration::ZERO,
            added_at_start: 0,
            removed_at_start: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// `lifetime_added`/`lifetime_removed` are the scene's running totals.
    pub(crate) fn maybe_snapshot(
        &mut self,
        now: Instant,
        lifetime_added: u64,
        lifetime_removed: u64,
    ) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };

        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
            renderables_created: lifetime_added.saturating_sub(self.added_at_start),
            renderables_destroyed: lifetime_removed.saturating_sub(self.removed_at_start),
        };

        self.interval_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time_sum = Duration::ZERO;
        self.added_at_start = lifetime_added;
        self.removed_at_start = lifetime_removed;

        Some(snapshot)
    }
}
