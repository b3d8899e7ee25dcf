//! State Machine Runtime
//!
//! Flat, enum-based state machines for gesture and animation phases.
//! A state type describes its own transition table through
//! [`StateTransitions`]; [`Fsm`] drives it and keeps a transition history
//! for debugging.

use crate::events::EventType;

/// Transition table for an enum-like state type
pub trait StateTransitions: Copy + PartialEq + std::fmt::Debug {
    /// Target state for `event` from `self`, or `None` if the event is ignored
    fn on_event(&self, event: EventType) -> Option<Self>;

    /// Whether this state represents ongoing activity
    fn is_active(&self) -> bool;
}

/// A state machine instance
#[derive(Debug, Clone)]
pub struct Fsm<S: StateTransitions> {
    current: S,
    initial: S,
    /// History of state transitions (for debugging)
    history: Vec<(S, EventType, S)>,
    record_history: bool,
}

impl<S: StateTransitions> Fsm<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            initial,
            history: Vec::new(),
            record_history: cfg!(debug_assertions),
        }
    }

    /// Enable or disable history recording
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Get the current state
    pub fn current(&self) -> S {
        self.current
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    pub fn is_active(&self) -> bool {
        self.current.is_active()
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: EventType) -> bool {
        self.current.on_event(event).is_some()
    }

    /// Send an event, returning the (possibly unchanged) current state
    pub fn send(&mut self, event: EventType) -> S {
        let Some(next) = self.current.on_event(event) else {
            return self.current;
        };

        if next != self.current {
            tracing::trace!("fsm {:?} --{}--> {:?}", self.current, event, next);
        }

        if self.record_history {
            self.history.push((self.current, event, next));
        }
        self.current = next;
        next
    }

    /// Force the machine back to its initial state without recording history
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    /// Get transition history
    pub fn history(&self) -> &[(S, EventType, S)] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl<S: StateTransitions + Default> Default for Fsm<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum Button {
        #[default]
        Idle,
        Hovered,
        Pressed,
    }

    const ENTER: EventType = 1;
    const LEAVE: EventType = 2;
    const DOWN: EventType = 3;
    const UP: EventType = 4;

    impl StateTransitions for Button {
        fn on_event(&self, event: EventType) -> Option<Self> {
            match (self, event) {
                (Button::Idle, ENTER) => Some(Button::Hovered),
                (Button::Hovered, LEAVE) => Some(Button::Idle),
                (Button::Hovered, DOWN) => Some(Button::Pressed),
                (Button::Pressed, UP) => Some(Button::Hovered),
                _ => None,
            }
        }

        fn is_active(&self) -> bool {
            matches!(self, Button::Pressed)
        }
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = Fsm::new(Button::Idle);

        fsm.send(ENTER);
        assert_eq!(fsm.current(), Button::Hovered);

        fsm.send(DOWN);
        assert_eq!(fsm.current(), Button::Pressed);
        assert!(fsm.is_active());

        fsm.send(UP);
        fsm.send(LEAVE);
        assert!(fsm.is_in(Button::Idle));
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = Fsm::new(Button::Idle);
        assert_eq!(fsm.send(DOWN), Button::Idle);
        assert!(!fsm.can_send(DOWN));
        assert!(fsm.can_send(ENTER));
    }

    #[test]
    fn test_history() {
        let mut fsm = Fsm::new(Button::Idle).with_history(true);
        fsm.send(ENTER);
        fsm.send(DOWN);
        fsm.send(LEAVE); // ignored, not recorded

        let history = fsm.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], (Button::Idle, ENTER, Button::Hovered));
        assert_eq!(history[1], (Button::Hovered, DOWN, Button::Pressed));

        fsm.clear_history();
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut fsm = Fsm::<Button>::default();
        fsm.send(ENTER);
        fsm.reset();
        assert!(fsm.is_in(Button::Idle));
    }
}
