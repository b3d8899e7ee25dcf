//! Touch gesture controller
//!
//! Turns raw multi-touch events into vertical scrolling for one view. Every
//! drag step is negotiated with the nested-scroll ancestor in a fixed order:
//!
//! 1. `pre_scroll` offers the delta to the ancestor
//! 2. the remainder is clamped and applied to the host
//! 3. `post_scroll` offers whatever the host could not take
//! 4. anything still left pulls the edge glow
//!
//! Ancestors that move this view while consuming report an offset. The
//! offset is folded into `nested_y_offset` and taken back out of
//! `last_motion_y`, so the next delta is measured in the view's new frame.
//!
//! On release the controller hands off to [`FlingSimulator`], which the host
//! drives through [`TouchGestureController::compute_scroll`] once per frame.

use nestscroll_animation::{Edge, EdgeEffectModel, PointerVelocityTracker};
use nestscroll_core::events::{touch_events, EventType, MotionEvent, PointerId, TouchAction};
use nestscroll_core::fsm::{Fsm, StateTransitions};
use nestscroll_core::{Result, ScrollError};

use crate::config::ScrollConfig;
use crate::fling::FlingSimulator;
use crate::host::ScrollHost;
use crate::nested::{NestedScrollCoordinator, NestedScrollParent, ScrollType};

/// Touch phase of the current gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Finger down, movement still within the slop
    Pressed,
    /// Movement passed the slop; deltas scroll the view
    Dragging,
}

impl StateTransitions for GestureState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use touch_events::*;
        match (self, event) {
            (GestureState::Idle, DOWN) => Some(GestureState::Pressed),
            (_, SLOP_EXCEEDED) => Some(GestureState::Dragging),
            (GestureState::Pressed, UP) | (GestureState::Pressed, CANCEL) => {
                Some(GestureState::Idle)
            }
            (GestureState::Dragging, UP) | (GestureState::Dragging, CANCEL) => {
                Some(GestureState::Idle)
            }
            _ => None,
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self, GestureState::Idle)
    }
}

/// Nested-scrolling touch handler for one vertical scroll view
#[derive(Debug)]
pub struct TouchGestureController {
    config: ScrollConfig,
    touch_slop: i32,
    min_fling_velocity: f64,
    max_fling_velocity: f64,

    state: Fsm<GestureState>,
    active_pointer: PointerId,
    last_motion_y: i32,
    nested_y_offset: i32,

    coordinator: NestedScrollCoordinator,
    fling: FlingSimulator,
    edges: EdgeEffectModel,
    velocity: PointerVelocityTracker,
}

impl Default for TouchGestureController {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl TouchGestureController {
    /// Controller with no nested-scrolling ancestor
    pub fn new(config: ScrollConfig) -> Self {
        Self::with_coordinator(config, NestedScrollCoordinator::new())
    }

    pub fn with_parent(config: ScrollConfig, parent: Box<dyn NestedScrollParent>) -> Self {
        Self::with_coordinator(config, NestedScrollCoordinator::with_parent(parent))
    }

    fn with_coordinator(config: ScrollConfig, mut coordinator: NestedScrollCoordinator) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!("scroll config: {}", e);
        }
        coordinator.set_enabled(config.nested_scrolling_enabled);

        Self {
            touch_slop: config.touch_slop(),
            min_fling_velocity: config.min_fling_velocity(),
            max_fling_velocity: config.max_fling_velocity(),
            state: Fsm::new(GestureState::Idle).with_history(false),
            active_pointer: PointerId::INVALID,
            last_motion_y: 0,
            nested_y_offset: 0,
            coordinator,
            fling: FlingSimulator::new(&config),
            edges: EdgeEffectModel::new(),
            velocity: PointerVelocityTracker::new(),
            config,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.state.current()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_in(GestureState::Dragging)
    }

    pub fn is_flinging(&self) -> bool {
        self.fling.is_running()
    }

    /// Total on-screen shift ancestors applied during this gesture
    pub fn nested_y_offset(&self) -> i32 {
        self.nested_y_offset
    }

    pub fn last_motion_y(&self) -> i32 {
        self.last_motion_y
    }

    pub fn active_pointer(&self) -> PointerId {
        self.active_pointer
    }

    pub fn edge_effects(&self) -> &EdgeEffectModel {
        &self.edges
    }

    /// Advance edge glow animations. Returns true while any is still visible.
    pub fn update_edge_effects(&mut self, now_ms: u64) -> bool {
        self.edges.update_all(now_ms)
    }

    pub fn coordinator(&self) -> &NestedScrollCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut NestedScrollCoordinator {
        &mut self.coordinator
    }

    pub fn fling_simulator(&self) -> &FlingSimulator {
        &self.fling
    }

    /// Feed one touch event. Returns whether the event was handled.
    pub fn on_touch_event<H: ScrollHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &MotionEvent,
    ) -> bool {
        if event.action == TouchAction::Down {
            self.nested_y_offset = 0;
        }
        // Velocity samples live in the frame the event arrived in
        let velocity_offset = self.nested_y_offset;
        let now = event.timestamp;

        match event.action {
            TouchAction::Down => {
                if !self.on_down(host, event) {
                    return false;
                }
            }
            TouchAction::Move => self.on_move(host, event),
            TouchAction::Up => {
                self.on_up(host, now);
                return true;
            }
            TouchAction::Cancel => {
                if self.is_dragging() {
                    self.fling.spring_back(host, now);
                }
                self.active_pointer = PointerId::INVALID;
                self.end_drag(touch_events::CANCEL, now);
                return true;
            }
            TouchAction::PointerDown => match event.pointer(event.action_index) {
                Some(pointer) => {
                    self.last_motion_y = pointer.y as i32;
                    self.active_pointer = pointer.id;
                }
                None => tracing::warn!(
                    "pointer down with action index {} out of range",
                    event.action_index
                ),
            },
            TouchAction::PointerUp => self.on_pointer_up(event),
        }

        self.velocity.add_movement(event, velocity_offset);
        true
    }

    fn on_down<H: ScrollHost + ?Sized>(&mut self, host: &mut H, event: &MotionEvent) -> bool {
        let Some(pointer) = event.pointer(0) else {
            tracing::warn!("down event without pointers");
            return false;
        };

        if self.is_dragging() {
            host.request_disallow_intercept();
        }
        if !self.fling.scroller().is_finished() || self.fling.is_running() {
            self.fling.abort(&mut self.coordinator);
        }

        self.velocity.clear();
        self.last_motion_y = pointer.y as i32;
        self.active_pointer = pointer.id;
        self.state.send(touch_events::DOWN);
        self.coordinator.start(ScrollType::Interactive);

        tracing::debug!("gesture down pointer={} y={}", pointer.id, self.last_motion_y);
        true
    }

    fn active_index(&self, event: &MotionEvent) -> Result<usize> {
        event
            .find_pointer_index(self.active_pointer)
            .ok_or(ScrollError::InvalidPointer(self.active_pointer))
    }

    fn on_move<H: ScrollHost + ?Sized>(&mut self, host: &mut H, event: &MotionEvent) {
        let index = match self.active_index(event) {
            Ok(index) => index,
            Err(e) => {
                tracing::error!("{}", e);
                return;
            }
        };
        let pointer = event.pointers[index];
        let now = event.timestamp;
        let y = pointer.y as i32;

        let mut delta_y = self.last_motion_y - y;
        delta_y -= self.release_vertical_glow(host, delta_y, pointer.x);

        if !self.is_dragging() && delta_y.abs() > self.touch_slop {
            host.request_disallow_intercept();
            self.state.send(touch_events::SLOP_EXCEEDED);
            if delta_y > 0 {
                delta_y -= self.touch_slop;
            } else {
                delta_y += self.touch_slop;
            }
            tracing::debug!("drag started, first delta {}", delta_y);
        }

        if !self.is_dragging() {
            return;
        }

        let pre = self.coordinator.pre_scroll(ScrollType::Interactive, delta_y);
        delta_y -= pre.consumed;
        self.nested_y_offset += pre.offset;
        self.last_motion_y = y - pre.offset;

        let old_y = host.scroll_y();
        let range = host.scroll_range();
        let can_overscroll = host.overscroll_policy().allows(range);

        let result = self.fling.overscroll_by(host, &self.coordinator, delta_y, now);
        let mut clear_velocity =
            result.clamped && !self.coordinator.has_ancestor(ScrollType::Interactive);

        let scrolled = host.scroll_y() - old_y;
        let unconsumed = delta_y - scrolled;

        let post = self.coordinator.post_scroll(ScrollType::Interactive, scrolled, unconsumed);
        self.last_motion_y -= post.offset;
        self.nested_y_offset += post.offset;

        let remainder = unconsumed - post.consumed;
        tracing::trace!(
            "drag step pre={} local={} post={} left={}",
            pre.consumed,
            scrolled,
            post.consumed,
            remainder
        );

        if can_overscroll {
            self.pull_edge(host, remainder, pointer.x, now);
            if self.edges.is_any_active() {
                host.post_invalidate_on_animation();
                clear_velocity = false;
            }
        }

        if clear_velocity {
            // Hard stop with nobody to hand off to: no fling from here
            self.velocity.clear();
        }
    }

    /// Let an already pulled edge take back some of `delta_y` before it
    /// scrolls anything. Returns the pixels consumed.
    fn release_vertical_glow<H: ScrollHost + ?Sized>(
        &mut self,
        host: &mut H,
        delta_y: i32,
        x: f32,
    ) -> i32 {
        let height = host.viewport_height();
        let Some(edge) = self.edges.active_edge() else {
            return 0;
        };
        if height <= 0 {
            return 0;
        }

        let height = height as f64;
        let displacement = displacement(x, host.viewport_width());
        let pull = delta_y as f64 / height;
        let consumed = match edge {
            Edge::Top => -self.edges.pull(Edge::Top, -pull, displacement),
            Edge::Bottom => self.edges.pull(Edge::Bottom, pull, 1.0 - displacement),
        };

        let pixels = (consumed * height).round() as i32;
        if pixels != 0 {
            host.invalidate();
        }
        pixels
    }

    /// Pull the glow on the edge `remainder` points at and release the other
    fn pull_edge<H: ScrollHost + ?Sized>(
        &mut self,
        host: &mut H,
        remainder: i32,
        x: f32,
        now: u64,
    ) {
        let height = host.viewport_height();
        if remainder == 0 || height <= 0 {
            return;
        }

        let displacement = displacement(x, host.viewport_width());
        let fraction = remainder as f64 / height as f64;
        let (edge, pulled, displacement) = if remainder < 0 {
            (Edge::Top, -fraction, displacement)
        } else {
            (Edge::Bottom, fraction, 1.0 - displacement)
        };

        self.edges.pull(edge, pulled, displacement);
        let other = edge.opposite();
        if !self.edges.is_finished(other) {
            self.edges.release(other, now);
        }
    }

    fn on_up<H: ScrollHost + ?Sized>(&mut self, host: &mut H, now: u64) {
        let velocity = self
            .velocity
            .velocity_y(self.active_pointer, self.max_fling_velocity)
            .trunc();

        if velocity.abs() >= self.min_fling_velocity {
            if !self.edge_effect_fling(velocity, now) && !self.coordinator.pre_fling(-velocity) {
                self.coordinator.fling(-velocity, true);
                self.fling.start(host, &mut self.coordinator, -velocity, now);
            }
        } else {
            self.fling.spring_back(host, now);
        }

        self.active_pointer = PointerId::INVALID;
        self.end_drag(touch_events::UP, now);
    }

    /// A pulled edge swallows the fling
    fn edge_effect_fling(&mut self, velocity: f64, now: u64) -> bool {
        match self.edges.active_edge() {
            Some(Edge::Top) => self.edges.absorb(Edge::Top, velocity, now),
            Some(Edge::Bottom) => self.edges.absorb(Edge::Bottom, -velocity, now),
            None => return false,
        }
        true
    }

    fn on_pointer_up(&mut self, event: &MotionEvent) {
        let index = event.action_index;
        if event.pointer_id(index) == Some(self.active_pointer) {
            let new_index = if index == 0 { 1 } else { 0 };
            if let Some(pointer) = event.pointer(new_index) {
                self.last_motion_y = pointer.y as i32;
                self.active_pointer = pointer.id;
            }
            self.velocity.clear();
        }

        match self.active_index(event) {
            Ok(i) => self.last_motion_y = event.pointers[i].y as i32,
            Err(e) => tracing::error!("{}", e),
        }
    }

    fn end_drag(&mut self, event: EventType, now: u64) {
        self.state.send(event);
        self.velocity.clear();
        self.coordinator.stop(ScrollType::Interactive);
        self.edges.release_all(now);
    }

    /// Per-frame animation step; call whenever the host was asked for one
    pub fn compute_scroll<H: ScrollHost + ?Sized>(&mut self, host: &mut H, now_ms: u64) {
        self.fling
            .tick(host, &mut self.coordinator, &mut self.edges, now_ms);
    }

    /// Fling the view programmatically at `velocity_y` px/s
    pub fn fling<H: ScrollHost + ?Sized>(&mut self, host: &mut H, velocity_y: f64, now_ms: u64) {
        self.fling.start(host, &mut self.coordinator, velocity_y, now_ms);
    }

    /// Stop a running fling or spring-back in place
    pub fn abort_animated_scroll(&mut self) {
        self.fling.abort(&mut self.coordinator);
    }
}

fn displacement(x: f32, width: i32) -> f64 {
    if width > 0 {
        x as f64 / width as f64
    } else {
        0.5
    }
}
