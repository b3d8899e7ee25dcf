//! Overscroll edge glow model
//!
//! Tracks how far content has been pulled past a boundary and the amplitude of
//! the glow drawn there. Rendering is left to the host: this module only owns
//! the numbers.
//!
//! Each edge runs a small state machine:
//!
//! ```text
//! Idle ──pull──▶ Pull ──release──▶ Recede ──settled──▶ Idle
//!   │              │                  ▲
//!   └───absorb─────┴──▶ Absorb ──settled┘
//! ```

use nestscroll_core::events::EventType;
use nestscroll_core::fsm::{Fsm, StateTransitions};

use crate::easing::Easing;

/// Edge glow events
pub mod edge_events {
    use nestscroll_core::events::EventType;

    pub const PULL: EventType = 40;
    pub const RELEASE: EventType = 41;
    pub const ABSORB: EventType = 42;
    /// Current animation segment ran to completion
    pub const SETTLED: EventType = 43;
}

/// Recede animation length, ms
const RECEDE_TIME_MS: f64 = 600.0;
const MIN_ABSORB_VELOCITY: f64 = 100.0;
const MAX_ABSORB_VELOCITY: f64 = 10_000.0;

/// Glow state for one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlowState {
    #[default]
    Idle,
    /// Finger is actively pulling past the edge
    Pull,
    /// Absorbing a fling that hit the edge
    Absorb,
    /// Fading out
    Recede,
}

impl StateTransitions for GlowState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use edge_events::*;
        match (self, event) {
            (_, PULL) => Some(GlowState::Pull),
            (_, ABSORB) => Some(GlowState::Absorb),
            (GlowState::Pull, RELEASE) => Some(GlowState::Recede),
            (GlowState::Absorb, SETTLED) => Some(GlowState::Recede),
            (GlowState::Recede, SETTLED) => Some(GlowState::Idle),
            _ => None,
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self, GlowState::Idle)
    }
}

/// Overscroll state for a single edge
#[derive(Debug, Clone)]
pub struct EdgeEffect {
    state: Fsm<GlowState>,
    /// Pull distance as a fraction of the view height, `[0, 1]`
    distance: f64,
    /// Where along the edge the pull happens, `[0, 1]`
    displacement: f64,
    /// Glow amplitude, `[0, 1]`
    amplitude: f64,
    distance_start: f64,
    distance_finish: f64,
    amplitude_start: f64,
    amplitude_finish: f64,
    start_time: u64,
    duration_ms: f64,
    /// Last time seen by `update`, `absorb` or `release`
    last_time: u64,
}

impl Default for EdgeEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeEffect {
    pub fn new() -> Self {
        Self {
            state: Fsm::new(GlowState::Idle).with_history(false),
            distance: 0.0,
            displacement: 0.5,
            amplitude: 0.0,
            distance_start: 0.0,
            distance_finish: 0.0,
            amplitude_start: 0.0,
            amplitude_finish: 0.0,
            start_time: 0,
            duration_ms: 0.0,
            last_time: 0,
        }
    }

    pub fn state(&self) -> GlowState {
        self.state.current()
    }

    /// Current pull distance, `[0, 1]`
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// True once every animation has completed
    pub fn is_finished(&self) -> bool {
        self.state.is_in(GlowState::Idle)
    }

    /// Pull the edge by `delta` (fraction of view height, may be negative to
    /// relax it). `displacement` is the pointer position along the edge.
    ///
    /// Returns the part of `delta` actually applied; it is smaller than
    /// `delta` when the distance hits 0 or 1. Relaxing the edge all the way to
    /// 0 releases it.
    pub fn pull(&mut self, delta: f64, displacement: f64) -> f64 {
        let target = (self.distance + delta).clamp(0.0, 1.0);
        let consumed = target - self.distance;
        if consumed == 0.0 && self.distance == 0.0 {
            return 0.0;
        }

        self.state.send(edge_events::PULL);
        self.displacement = displacement.clamp(0.0, 1.0);
        self.distance = target;
        self.amplitude = target;

        if self.distance == 0.0 {
            self.release(self.last_time);
        }

        consumed
    }

    /// Start a glow seeded by a fling `velocity` (px/s) that reached the edge
    pub fn absorb(&mut self, velocity: f64, now_ms: u64) {
        let velocity = velocity.abs().clamp(MIN_ABSORB_VELOCITY, MAX_ABSORB_VELOCITY);
        self.state.send(edge_events::ABSORB);
        self.last_time = now_ms;
        self.start_time = now_ms;
        self.duration_ms = 0.15 + velocity * 0.02;

        self.distance_start = self.distance;
        self.distance_finish = 0.0;
        self.amplitude_start = self.amplitude.max(0.0);
        self.amplitude_finish = (0.025 + velocity * (velocity / 100.0) * 0.00015 / 2.0).min(1.0);

        tracing::debug!(
            "edge absorb velocity={:.0} amplitude -> {:.3} over {:.1}ms",
            velocity,
            self.amplitude_finish,
            self.duration_ms
        );
    }

    /// Let go of a pulled edge. No effect unless the edge is being pulled.
    pub fn release(&mut self, now_ms: u64) {
        if !self.state.is_in(GlowState::Pull) {
            return;
        }
        self.state.send(edge_events::RELEASE);
        self.begin_recede(now_ms);
    }

    fn begin_recede(&mut self, now_ms: u64) {
        self.last_time = now_ms;
        self.start_time = now_ms;
        self.duration_ms = RECEDE_TIME_MS;
        self.distance_start = self.distance;
        self.distance_finish = 0.0;
        self.amplitude_start = self.amplitude;
        self.amplitude_finish = 0.0;
    }

    /// Advance animations to `now_ms`. Returns true while not finished.
    pub fn update(&mut self, now_ms: u64) -> bool {
        self.last_time = self.last_time.max(now_ms);

        let state = self.state.current();
        if matches!(state, GlowState::Absorb | GlowState::Recede) {
            let elapsed = now_ms.saturating_sub(self.start_time) as f64;
            let t = if self.duration_ms > 0.0 {
                (elapsed / self.duration_ms).min(1.0)
            } else {
                1.0
            };

            self.distance = Easing::DECELERATE.lerp(self.distance_start, self.distance_finish, t);
            self.amplitude =
                Easing::DECELERATE.lerp(self.amplitude_start, self.amplitude_finish, t);

            if t >= 1.0 {
                self.state.send(edge_events::SETTLED);
                if state == GlowState::Absorb {
                    self.begin_recede(now_ms);
                } else {
                    self.distance = 0.0;
                    self.amplitude = 0.0;
                }
            }
        }

        !self.is_finished()
    }

    /// Snap straight to the idle state
    pub fn finish(&mut self) {
        self.state.reset();
        self.distance = 0.0;
        self.amplitude = 0.0;
    }
}

/// Which edge of a vertical scroll view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
}

impl Edge {
    pub fn opposite(&self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }
}

/// Top and bottom edge glows of one view
#[derive(Debug, Clone, Default)]
pub struct EdgeEffectModel {
    top: EdgeEffect,
    bottom: EdgeEffect,
}

impl EdgeEffectModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edge(&self, edge: Edge) -> &EdgeEffect {
        match edge {
            Edge::Top => &self.top,
            Edge::Bottom => &self.bottom,
        }
    }

    pub fn edge_mut(&mut self, edge: Edge) -> &mut EdgeEffect {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Bottom => &mut self.bottom,
        }
    }

    pub fn pull(&mut self, edge: Edge, delta: f64, displacement: f64) -> f64 {
        self.edge_mut(edge).pull(delta, displacement)
    }

    pub fn absorb(&mut self, edge: Edge, velocity: f64, now_ms: u64) {
        self.edge_mut(edge).absorb(velocity, now_ms);
    }

    pub fn release(&mut self, edge: Edge, now_ms: u64) {
        self.edge_mut(edge).release(now_ms);
    }

    /// Release both edges
    pub fn release_all(&mut self, now_ms: u64) {
        self.top.release(now_ms);
        self.bottom.release(now_ms);
    }

    pub fn distance(&self, edge: Edge) -> f64 {
        self.edge(edge).distance()
    }

    pub fn is_finished(&self, edge: Edge) -> bool {
        self.edge(edge).is_finished()
    }

    /// The edge that currently owns boundary interaction: top wins when both
    /// are pulled.
    pub fn active_edge(&self) -> Option<Edge> {
        if self.top.distance() != 0.0 {
            Some(Edge::Top)
        } else if self.bottom.distance() != 0.0 {
            Some(Edge::Bottom)
        } else {
            None
        }
    }

    pub fn is_any_active(&self) -> bool {
        !self.top.is_finished() || !self.bottom.is_finished()
    }

    /// Advance both edges. Returns true while either is animating.
    pub fn update_all(&mut self, now_ms: u64) -> bool {
        let top = self.top.update(now_ms);
        let bottom = self.bottom.update(now_ms);
        top || bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_accumulates_and_clamps() {
        let mut edge = EdgeEffect::new();
        assert_eq!(edge.pull(0.3, 0.5), 0.3);
        assert_eq!(edge.state(), GlowState::Pull);

        let consumed = edge.pull(0.9, 0.5);
        assert!((consumed - 0.7).abs() < 1e-12);
        assert_eq!(edge.distance(), 1.0);

        // Already at the clamp: nothing more is consumed
        assert_eq!(edge.pull(0.2, 0.5), 0.0);
        assert_eq!(edge.distance(), 1.0);
    }

    #[test]
    fn test_pull_at_zero_consumes_nothing() {
        let mut edge = EdgeEffect::new();
        assert_eq!(edge.pull(-0.4, 0.5), 0.0);
        assert!(edge.is_finished());
    }

    #[test]
    fn test_relaxing_to_zero_releases() {
        let mut edge = EdgeEffect::new();
        edge.pull(0.2, 0.5);
        let consumed = edge.pull(-0.5, 0.5);
        assert!((consumed + 0.2).abs() < 1e-12);
        assert_eq!(edge.distance(), 0.0);
        assert_eq!(edge.state(), GlowState::Recede);
    }

    #[test]
    fn test_release_recedes_to_zero() {
        let mut edge = EdgeEffect::new();
        edge.pull(0.5, 0.5);
        edge.release(1000);
        assert_eq!(edge.state(), GlowState::Recede);

        assert!(edge.update(1300));
        assert!(edge.distance() > 0.0 && edge.distance() < 0.5);

        assert!(!edge.update(1600));
        assert!(edge.is_finished());
        assert_eq!(edge.distance(), 0.0);
        assert_eq!(edge.amplitude(), 0.0);
    }

    #[test]
    fn test_finish_snaps_to_idle() {
        let mut edge = EdgeEffect::new();
        edge.pull(0.3, 0.5);
        edge.finish();
        assert!(edge.is_finished());
        assert_eq!(edge.distance(), 0.0);
        assert_eq!(edge.amplitude(), 0.0);

        edge.absorb(3000.0, 0);
        edge.finish();
        assert_eq!(edge.state(), GlowState::Idle);
        assert!(!edge.update(10));
    }

    #[test]
    fn test_release_is_safe_when_idle() {
        let mut edge = EdgeEffect::new();
        edge.release(0);
        edge.release(10);
        assert!(edge.is_finished());
    }

    #[test]
    fn test_absorb_then_recede() {
        let mut edge = EdgeEffect::new();
        edge.absorb(-2000.0, 0);
        assert_eq!(edge.state(), GlowState::Absorb);
        assert!(!edge.is_finished());

        // 0.15 + 2000 * 0.02 = 40.15ms
        edge.update(41);
        assert_eq!(edge.state(), GlowState::Recede);
        assert!(edge.amplitude() > 0.0);

        edge.update(41 + 600);
        assert!(edge.is_finished());
    }

    #[test]
    fn test_active_edge_prefers_top() {
        let mut model = EdgeEffectModel::new();
        assert_eq!(model.active_edge(), None);
        model.pull(Edge::Bottom, 0.1, 0.5);
        assert_eq!(model.active_edge(), Some(Edge::Bottom));
        model.pull(Edge::Top, 0.1, 0.5);
        assert_eq!(model.active_edge(), Some(Edge::Top));
    }

    #[test]
    fn test_release_all() {
        let mut model = EdgeEffectModel::new();
        model.pull(Edge::Top, 0.4, 0.2);
        model.release_all(0);
        assert!(model.is_any_active());
        assert!(!model.update_all(600));
        assert!(model.is_finished(Edge::Top));
        assert!(model.is_finished(Edge::Bottom));
        assert_eq!(Edge::Top.opposite(), Edge::Bottom);
    }
}
