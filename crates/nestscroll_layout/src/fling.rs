//! Animated scrolling
//!
//! Replays an [`OverScroller`] curve one display frame at a time, routing each
//! frame's delta through the same pre-scroll / local / post-scroll sequence a
//! finger drag uses. A fling that runs into a bound hands its velocity to the
//! edge glow and stops; it never bounces.

use nestscroll_animation::{Edge, EdgeEffectModel, OverScroller, ScrollerMode};
use nestscroll_core::events::{fling_events, EventType};
use nestscroll_core::fsm::{Fsm, StateTransitions};

use crate::clamp::{ClampResult, OverscrollClamp};
use crate::config::ScrollConfig;
use crate::host::ScrollHost;
use crate::nested::{NestedScrollCoordinator, ScrollType};

/// Animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlingState {
    #[default]
    Idle,
    Running,
}

impl StateTransitions for FlingState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use fling_events::*;
        match (self, event) {
            (_, START) => Some(FlingState::Running),
            (FlingState::Running, FINISHED) | (FlingState::Running, ABORT) => {
                Some(FlingState::Idle)
            }
            _ => None,
        }
    }

    fn is_active(&self) -> bool {
        matches!(self, FlingState::Running)
    }
}

/// Frame-stepped fling and spring-back driver
#[derive(Debug, Clone)]
pub struct FlingSimulator {
    state: Fsm<FlingState>,
    scroller: OverScroller,
    clamp: OverscrollClamp,
    /// Scroller position already delivered to the host
    last_scroller_y: i32,
}

impl Default for FlingSimulator {
    fn default() -> Self {
        Self::new(&ScrollConfig::default())
    }
}

impl FlingSimulator {
    pub fn new(config: &ScrollConfig) -> Self {
        let mut scroller = OverScroller::new(config.density);
        scroller.set_friction(config.scroll_friction);
        Self {
            state: Fsm::new(FlingState::Idle).with_history(false),
            scroller,
            clamp: OverscrollClamp::new(config.max_overscroll),
            last_scroller_y: 0,
        }
    }

    pub fn state(&self) -> FlingState {
        self.state.current()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_active()
    }

    pub fn scroller(&self) -> &OverScroller {
        &self.scroller
    }

    pub fn clamp(&self) -> OverscrollClamp {
        self.clamp
    }

    /// Fling from the host's current position at `velocity_y` px/s and join
    /// the programmatic nested-scroll session
    pub fn start<H: ScrollHost + ?Sized>(
        &mut self,
        host: &mut H,
        coordinator: &mut NestedScrollCoordinator,
        velocity_y: f64,
        now_ms: u64,
    ) {
        let start_y = host.scroll_y();
        self.scroller.fling(start_y, velocity_y, now_ms);
        coordinator.start(ScrollType::Programmatic);
        self.last_scroller_y = start_y;
        self.state.send(fling_events::START);
        host.post_invalidate_on_animation();
    }

    /// Ease the host back into `[0, range]` if it is outside. Any running
    /// fling ends either way. Returns true if a spring-back started.
    pub fn spring_back<H: ScrollHost + ?Sized>(&mut self, host: &mut H, now_ms: u64) -> bool {
        let y = host.scroll_y();
        let started = self.restart_spring_back(y, host.scroll_range(), now_ms);
        if started {
            host.post_invalidate_on_animation();
        }
        started
    }

    fn restart_spring_back(&mut self, y: i32, range: i32, now_ms: u64) -> bool {
        if self.scroller.spring_back(y, 0, range, now_ms) {
            self.last_scroller_y = y;
            self.state.send(fling_events::START);
            true
        } else {
            self.state.send(fling_events::FINISHED);
            false
        }
    }

    /// Stop the animation where it is and leave the programmatic session
    pub fn abort(&mut self, coordinator: &mut NestedScrollCoordinator) {
        self.scroller.abort();
        coordinator.stop(ScrollType::Programmatic);
        if self.is_running() {
            self.state.send(fling_events::ABORT);
            tracing::debug!("animated scroll aborted");
        }
    }

    /// Apply `delta` to the host through the clamp.
    ///
    /// A truncated delta with no programmatic ancestor to hand it to settles
    /// the scroller at the clamped position, springing back if that position
    /// lies in the overscroll slack.
    pub fn overscroll_by<H: ScrollHost + ?Sized>(
        &mut self,
        host: &mut H,
        coordinator: &NestedScrollCoordinator,
        delta: i32,
        now_ms: u64,
    ) -> ClampResult {
        let (x, old_y) = host.scroll_position();
        let range = host.scroll_range();
        let result = self.clamp.apply(delta, old_y, range, host.can_overscroll());

        if result.position != old_y {
            host.set_scroll_position(x, result.position, result.clamped);
            host.on_scroll_applied();
        } else if result.clamped {
            host.set_scroll_position(x, result.position, true);
        }

        tracing::trace!(
            "overscroll_by delta={} {} -> {} (range={}, clamped={})",
            delta,
            old_y,
            result.position,
            range,
            result.clamped
        );

        if result.clamped && !coordinator.has_ancestor(ScrollType::Programmatic) {
            self.restart_spring_back(result.position, range, now_ms);
        }
        result
    }

    /// Advance one display frame
    pub fn tick<H: ScrollHost + ?Sized>(
        &mut self,
        host: &mut H,
        coordinator: &mut NestedScrollCoordinator,
        edges: &mut EdgeEffectModel,
        now_ms: u64,
    ) {
        if self.scroller.is_finished() {
            if self.is_running() {
                self.state.send(fling_events::FINISHED);
                coordinator.stop(ScrollType::Programmatic);
            }
            return;
        }

        self.scroller.compute_scroll_offset(now_ms);
        let y = self.scroller.curr_y();
        let mut unconsumed = y - self.last_scroller_y;
        self.last_scroller_y = y;

        unconsumed -= coordinator.pre_scroll(ScrollType::Programmatic, unconsumed).consumed;

        let range = host.scroll_range();
        if unconsumed != 0 {
            let old_y = host.scroll_y();
            self.overscroll_by(host, coordinator, unconsumed, now_ms);
            let scrolled = host.scroll_y() - old_y;
            unconsumed -= scrolled;

            unconsumed -= coordinator
                .post_scroll(ScrollType::Programmatic, scrolled, unconsumed)
                .consumed;
        }

        if unconsumed != 0 {
            if host.overscroll_policy().allows(range) {
                let edge = if unconsumed < 0 { Edge::Top } else { Edge::Bottom };
                if edges.is_finished(edge) {
                    edges.absorb(edge, self.scroller.curr_velocity(), now_ms);
                }
            }

            let springing =
                self.scroller.mode() == ScrollerMode::SpringBack && !self.scroller.is_finished();
            if !springing {
                tracing::debug!(
                    "fling hit a bound at {} with {} px left",
                    host.scroll_y(),
                    unconsumed
                );
                self.abort(coordinator);
            }
        }

        if !self.scroller.is_finished() {
            host.post_invalidate_on_animation();
        } else {
            if self.is_running() {
                self.state.send(fling_events::FINISHED);
            }
            coordinator.stop(ScrollType::Programmatic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::OverscrollPolicy;

    struct Host {
        y: i32,
        range: i32,
        frames: u32,
        policy: OverscrollPolicy,
    }

    impl Host {
        fn new(y: i32, range: i32) -> Self {
            Self {
                y,
                range,
                frames: 0,
                policy: OverscrollPolicy::IfContentScrolls,
            }
        }
    }

    impl ScrollHost for Host {
        fn scroll_position(&self) -> (i32, i32) {
            (0, self.y)
        }
        fn set_scroll_position(&mut self, _x: i32, y: i32, _clamped_y: bool) {
            self.y = y;
        }
        fn viewport_width(&self) -> i32 {
            400
        }
        fn viewport_height(&self) -> i32 {
            1000
        }
        fn content_extent(&self) -> i32 {
            1000 + self.range
        }
        fn overscroll_policy(&self) -> OverscrollPolicy {
            self.policy
        }
        fn request_disallow_intercept(&mut self) {}
        fn invalidate(&mut self) {}
        fn post_invalidate_on_animation(&mut self) {
            self.frames += 1;
        }
    }

    fn run(
        sim: &mut FlingSimulator,
        host: &mut Host,
        coordinator: &mut NestedScrollCoordinator,
        edges: &mut EdgeEffectModel,
    ) -> u64 {
        let mut now = 0;
        while sim.is_running() {
            now += 16;
            sim.tick(host, coordinator, edges, now);
            assert!((0..=host.range).contains(&host.y), "position {} out of range", host.y);
            assert!(now < 60_000, "fling never finished");
        }
        now
    }

    #[test]
    fn test_fling_settles_in_range() {
        let mut sim = FlingSimulator::default();
        let mut host = Host::new(100, 5000);
        let mut coordinator = NestedScrollCoordinator::new();
        let mut edges = EdgeEffectModel::new();

        sim.start(&mut host, &mut coordinator, 2000.0, 0);
        assert!(sim.is_running());
        assert_eq!(host.frames, 1);

        run(&mut sim, &mut host, &mut coordinator, &mut edges);
        assert_eq!(sim.state(), FlingState::Idle);
        assert_eq!(host.y, sim.scroller().final_y());
        assert!(host.y > 100);
        assert!(!edges.is_any_active());
    }

    #[test]
    fn test_fling_into_bound_absorbs() {
        let mut sim = FlingSimulator::default();
        let mut host = Host::new(400, 500);
        let mut coordinator = NestedScrollCoordinator::new();
        let mut edges = EdgeEffectModel::new();

        sim.start(&mut host, &mut coordinator, 6000.0, 0);
        run(&mut sim, &mut host, &mut coordinator, &mut edges);

        assert_eq!(host.y, 500);
        assert!(!edges.is_finished(Edge::Bottom));
        assert!(edges.is_finished(Edge::Top));
    }

    #[test]
    fn test_no_absorb_when_overscroll_disabled() {
        let mut sim = FlingSimulator::default();
        let mut host = Host::new(100, 500);
        host.policy = OverscrollPolicy::Never;
        let mut coordinator = NestedScrollCoordinator::new();
        let mut edges = EdgeEffectModel::new();

        sim.start(&mut host, &mut coordinator, -6000.0, 0);
        run(&mut sim, &mut host, &mut coordinator, &mut edges);

        assert_eq!(host.y, 0);
        assert!(!edges.is_any_active());
    }

    #[test]
    fn test_spring_back_only_when_out_of_range() {
        let mut sim = FlingSimulator::default();
        let mut host = Host::new(30, 500);
        assert!(!sim.spring_back(&mut host, 0));
        assert_eq!(host.frames, 0);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_spring_back_from_slack() {
        let config = ScrollConfig {
            max_overscroll: 60,
            ..Default::default()
        };
        let mut sim = FlingSimulator::new(&config);
        let mut host = Host::new(-40, 500);
        let mut coordinator = NestedScrollCoordinator::new();
        let mut edges = EdgeEffectModel::new();

        assert!(sim.spring_back(&mut host, 0));
        let mut now = 0;
        while sim.is_running() && now < 1000 {
            now += 16;
            sim.tick(&mut host, &mut coordinator, &mut edges, now);
        }
        assert!(!sim.is_running());
        assert_eq!(host.y, 0);
        // Lives as long as the view; transitions are not recorded
        assert!(sim.state.history().is_empty());
    }

    #[test]
    fn test_abort_keeps_position() {
        let mut sim = FlingSimulator::default();
        let mut host = Host::new(100, 5000);
        let mut coordinator = NestedScrollCoordinator::new();
        let mut edges = EdgeEffectModel::new();

        sim.start(&mut host, &mut coordinator, 3000.0, 0);
        sim.tick(&mut host, &mut coordinator, &mut edges, 48);
        let y = host.y;

        sim.abort(&mut coordinator);
        assert!(!sim.is_running());
        sim.tick(&mut host, &mut coordinator, &mut edges, 64);
        assert_eq!(host.y, y);
    }

    #[test]
    fn test_clamp_without_ancestor_settles_scroller() {
        let mut sim = FlingSimulator::default();
        let mut host = Host::new(500, 500);
        let coordinator = NestedScrollCoordinator::new();

        let result = sim.overscroll_by(&mut host, &coordinator, 50, 0);
        assert_eq!(result, ClampResult { position: 500, clamped: true });
        assert!(sim.scroller().is_finished());
        assert!(!sim.is_running());
    }
}
