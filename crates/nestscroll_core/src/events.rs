//! Pointer event model
//!
//! Platform-agnostic multi-touch motion events. A platform layer converts its
//! native touch events (Android `MotionEvent`, UIKit touches, winit touch) into
//! [`MotionEvent`] before handing them to a gesture controller.

use smallvec::SmallVec;

/// Event type identifier used by state transitions
pub type EventType = u32;

/// Touch sequence events
pub mod touch_events {
    use super::EventType;

    /// First pointer went down
    pub const DOWN: EventType = 1;
    /// One or more pointers moved
    pub const MOVE: EventType = 2;
    /// Last pointer went up
    pub const UP: EventType = 3;
    /// Gesture was cancelled by the platform or an intercepting ancestor
    pub const CANCEL: EventType = 4;
    /// Additional pointer went down mid-gesture
    pub const POINTER_DOWN: EventType = 5;
    /// Non-final pointer went up mid-gesture
    pub const POINTER_UP: EventType = 6;
    /// Cumulative movement crossed the touch slop
    pub const SLOP_EXCEEDED: EventType = 7;
}

/// Animated scroll events
pub mod fling_events {
    use super::EventType;

    /// Fling or spring-back animation started
    pub const START: EventType = 20;
    /// Animation curve reported completion
    pub const FINISHED: EventType = 21;
    /// Animation aborted (new touch, boundary hit, explicit stop)
    pub const ABORT: EventType = 22;
}

/// Identifier of a single pointer (finger) for the lifetime of its contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i32);

impl PointerId {
    /// Sentinel for "no active pointer"
    pub const INVALID: PointerId = PointerId(-1);

    pub const fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl Default for PointerId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One pointer's position inside a motion event, in view-local pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn new(id: i32, x: f32, y: f32) -> Self {
        Self {
            id: PointerId(id),
            x,
            y,
        }
    }
}

/// Phase of a motion event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    /// First pointer down, starts a gesture
    Down,
    /// Pointer positions changed
    Move,
    /// Last pointer up, ends the gesture
    Up,
    /// Gesture aborted
    Cancel,
    /// Additional pointer added; `action_index` names it
    PointerDown,
    /// Non-final pointer removed; `action_index` names it
    PointerUp,
}

impl TouchAction {
    /// Map to the transition event id
    pub fn event_type(&self) -> EventType {
        match self {
            TouchAction::Down => touch_events::DOWN,
            TouchAction::Move => touch_events::MOVE,
            TouchAction::Up => touch_events::UP,
            TouchAction::Cancel => touch_events::CANCEL,
            TouchAction::PointerDown => touch_events::POINTER_DOWN,
            TouchAction::PointerUp => touch_events::POINTER_UP,
        }
    }
}

/// A multi-touch motion event
///
/// Pointers are stored in index order; `action_index` is only meaningful for
/// [`TouchAction::PointerDown`] and [`TouchAction::PointerUp`]. For
/// `PointerUp` the lifted pointer is still present in `pointers`.
#[derive(Clone, Debug)]
pub struct MotionEvent {
    pub action: TouchAction,
    pub action_index: usize,
    pub pointers: SmallVec<[PointerSample; 4]>,
    /// Event time in milliseconds (monotonic, host clock)
    pub timestamp: u64,
}

impl MotionEvent {
    pub fn new(action: TouchAction, pointers: &[PointerSample], timestamp: u64) -> Self {
        Self {
            action,
            action_index: 0,
            pointers: SmallVec::from_slice(pointers),
            timestamp,
        }
    }

    /// Single-pointer `Down`
    pub fn down(id: i32, x: f32, y: f32, timestamp: u64) -> Self {
        Self::new(TouchAction::Down, &[PointerSample::new(id, x, y)], timestamp)
    }

    /// Single-pointer `Move`
    pub fn moved(id: i32, x: f32, y: f32, timestamp: u64) -> Self {
        Self::new(TouchAction::Move, &[PointerSample::new(id, x, y)], timestamp)
    }

    /// Single-pointer `Up`
    pub fn up(id: i32, x: f32, y: f32, timestamp: u64) -> Self {
        Self::new(TouchAction::Up, &[PointerSample::new(id, x, y)], timestamp)
    }

    /// `Cancel` with no pointer data
    pub fn cancel(timestamp: u64) -> Self {
        Self::new(TouchAction::Cancel, &[], timestamp)
    }

    /// Set the action index (builder style)
    pub fn with_action_index(mut self, index: usize) -> Self {
        self.action_index = index;
        self
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Index of the pointer with `id`, if it is part of this event
    pub fn find_pointer_index(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|p| p.id == id)
    }

    pub fn pointer(&self, index: usize) -> Option<&PointerSample> {
        self.pointers.get(index)
    }

    pub fn pointer_id(&self, index: usize) -> Option<PointerId> {
        self.pointers.get(index).map(|p| p.id)
    }

    /// Y of the first pointer, 0.0 if the event carries none
    pub fn y(&self) -> f32 {
        self.pointers.first().map(|p| p.y).unwrap_or(0.0)
    }
}
