//! Pointer velocity estimation
//!
//! Impulse strategy: the velocity is derived from the kinetic energy the
//! pointer imparted over its recent samples, which weights late movement more
//! heavily than a plain least-squares fit and reacts well to flicks.

use nestscroll_core::events::{MotionEvent, PointerId};
use rustc_hash::FxHashMap;

/// Ring buffer capacity
const HISTORY_SIZE: usize = 20;

/// Samples older than this, relative to the newest, are ignored
const HORIZON_MS: u64 = 100;

/// A gap this long between consecutive samples means the pointer stopped
const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: u64,
    position: f64,
}

/// Velocity along one axis
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    /// Slot of the newest sample
    head: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            head: 0,
        }
    }

    /// Record an absolute position at `time_ms`
    pub fn add(&mut self, time_ms: u64, position: f64) {
        self.head = (self.head + 1) % HISTORY_SIZE;
        self.samples[self.head] = Some(Sample { time_ms, position });
    }

    pub fn clear(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.head = 0;
    }

    /// Newest-first samples inside the horizon, cut at the first stop gap or
    /// at the first sample stamped later than the one after it
    fn recent(&self) -> Vec<Sample> {
        let mut out = Vec::with_capacity(HISTORY_SIZE);
        let Some(newest) = self.samples[self.head] else {
            return out;
        };

        let mut previous = newest;
        let mut slot = self.head;
        while let Some(sample) = self.samples[slot] {
            if sample.time_ms > previous.time_ms
                || newest.time_ms - sample.time_ms > HORIZON_MS
                || previous.time_ms - sample.time_ms > ASSUME_STOPPED_MS
            {
                break;
            }
            out.push(sample);
            previous = sample;

            if out.len() == HISTORY_SIZE {
                break;
            }
            slot = (slot + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }
        out
    }

    /// Velocity in units per second; 0 with fewer than two usable samples
    pub fn velocity(&self) -> f64 {
        let samples = self.recent();
        if samples.len() < 2 {
            return 0.0;
        }

        // Walk oldest to newest, accumulating kinetic energy (unit mass)
        let mut work = 0.0;
        let oldest = samples.len() - 1;
        for i in (1..=oldest).rev() {
            let older = samples[i];
            let newer = samples[i - 1];
            let Some(dt) = newer.time_ms.checked_sub(older.time_ms).filter(|&dt| dt > 0) else {
                continue;
            };
            let dt = dt as f64;
            let v_curr = (newer.position - older.position) / dt;
            let v_prev = energy_to_velocity(work);
            work += (v_curr - v_prev) * v_curr.abs();
            if i == oldest {
                work *= 0.5;
            }
        }

        energy_to_velocity(work) * 1000.0
    }

    /// Velocity clamped to `[-max, max]`
    pub fn velocity_with_max(&self, max: f64) -> f64 {
        if !max.is_finite() || max <= 0.0 {
            return 0.0;
        }
        let v = self.velocity();
        if v.is_nan() {
            return 0.0;
        }
        v.clamp(-max, max)
    }
}

#[inline]
fn energy_to_velocity(energy: f64) -> f64 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

/// Vertical velocity for every pointer of a gesture
#[derive(Clone, Debug, Default)]
pub struct PointerVelocityTracker {
    trackers: FxHashMap<PointerId, VelocityTracker1D>,
}

impl PointerVelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every pointer in `event`, shifting y by `y_offset` so samples
    /// stay in a frame that does not move with nested-scroll offsets.
    pub fn add_movement(&mut self, event: &MotionEvent, y_offset: i32) {
        for pointer in &event.pointers {
            self.trackers
                .entry(pointer.id)
                .or_default()
                .add(event.timestamp, pointer.y as f64 + y_offset as f64);
        }
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.trackers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Y velocity of pointer `id` in px/s, clamped to `[-max, max]`
    pub fn velocity_y(&self, id: PointerId, max: f64) -> f64 {
        self.trackers
            .get(&id)
            .map(|t| t.velocity_with_max(max))
            .unwrap_or(0.0)
    }
}
