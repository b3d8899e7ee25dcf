//! Nested scrolling negotiation
//!
//! A scrolling child offers each scroll step to its nested-scrolling ancestor
//! twice: before applying any of it locally (`pre_scroll`) and after
//! (`post_scroll`). Touch-driven and animation-driven scrolling negotiate in
//! separate sessions so an ancestor can tell them apart.
//!
//! The ancestor chain itself is behind [`NestedScrollParent`]; the
//! coordinator only tracks which sessions are live and enforces the enable
//! flag.

/// Which input is driving a scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollType {
    /// A finger on the screen
    Interactive,
    /// A fling or other animation
    Programmatic,
}

/// Result of one negotiation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NestedScrollStep {
    /// Pixels the ancestor consumed
    pub consumed: i32,
    /// How far the ancestor moved this view on screen while consuming
    pub offset: i32,
}

impl NestedScrollStep {
    pub const NONE: NestedScrollStep = NestedScrollStep {
        consumed: 0,
        offset: 0,
    };
}

/// The ancestor side of nested scrolling
///
/// Only `on_start_nested_scroll` is required; the other callbacks default to
/// consuming nothing.
pub trait NestedScrollParent {
    /// Accept or refuse a vertical nested scroll
    fn on_start_nested_scroll(&mut self, scroll_type: ScrollType) -> bool;

    fn on_stop_nested_scroll(&mut self, _scroll_type: ScrollType) {}

    /// Offered `dy` before the child scrolls
    fn on_nested_pre_scroll(&mut self, _dy: i32, _scroll_type: ScrollType) -> NestedScrollStep {
        NestedScrollStep::NONE
    }

    /// Offered what is left after the child scrolled by `dy_consumed`
    fn on_nested_scroll(
        &mut self,
        _dy_consumed: i32,
        _dy_unconsumed: i32,
        _scroll_type: ScrollType,
    ) -> NestedScrollStep {
        NestedScrollStep::NONE
    }

    /// Return true to take the fling away from the child
    fn on_nested_pre_fling(&mut self, _velocity_y: f64) -> bool {
        false
    }

    /// Informs the ancestor of a fling; `consumed` is whether the child flings
    fn on_nested_fling(&mut self, _velocity_y: f64, _consumed: bool) -> bool {
        false
    }
}

/// Child-side session bookkeeping for one scroll view
pub struct NestedScrollCoordinator {
    parent: Option<Box<dyn NestedScrollParent>>,
    enabled: bool,
    interactive: bool,
    programmatic: bool,
}

impl Default for NestedScrollCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NestedScrollCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedScrollCoordinator")
            .field("has_parent", &self.parent.is_some())
            .field("enabled", &self.enabled)
            .field("interactive", &self.interactive)
            .field("programmatic", &self.programmatic)
            .finish()
    }
}

impl NestedScrollCoordinator {
    /// Coordinator with no ancestor; every negotiation is a no-op
    pub fn new() -> Self {
        Self {
            parent: None,
            enabled: true,
            interactive: false,
            programmatic: false,
        }
    }

    pub fn with_parent(parent: Box<dyn NestedScrollParent>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new()
        }
    }

    /// Replace the ancestor. Live sessions with the old one are stopped.
    pub fn set_parent(&mut self, parent: Option<Box<dyn NestedScrollParent>>) {
        self.stop(ScrollType::Interactive);
        self.stop(ScrollType::Programmatic);
        self.parent = parent;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.stop(ScrollType::Interactive);
            self.stop(ScrollType::Programmatic);
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn session(&self, scroll_type: ScrollType) -> bool {
        match scroll_type {
            ScrollType::Interactive => self.interactive,
            ScrollType::Programmatic => self.programmatic,
        }
    }

    fn set_session(&mut self, scroll_type: ScrollType, active: bool) {
        match scroll_type {
            ScrollType::Interactive => self.interactive = active,
            ScrollType::Programmatic => self.programmatic = active,
        }
    }

    /// Whether an ancestor accepted a session of this type
    pub fn has_ancestor(&self, scroll_type: ScrollType) -> bool {
        self.session(scroll_type)
    }

    /// Begin a session. Returns true if an ancestor accepted it; calling
    /// again while the session is live returns true without re-asking.
    pub fn start(&mut self, scroll_type: ScrollType) -> bool {
        if self.session(scroll_type) {
            return true;
        }
        if !self.enabled {
            return false;
        }
        let Some(parent) = self.parent.as_mut() else {
            return false;
        };

        let accepted = parent.on_start_nested_scroll(scroll_type);
        if accepted {
            tracing::debug!("nested scroll started ({:?})", scroll_type);
            self.set_session(scroll_type, true);
        }
        accepted
    }

    /// End a session; no-op if none is live
    pub fn stop(&mut self, scroll_type: ScrollType) {
        if !self.session(scroll_type) {
            return;
        }
        if let Some(parent) = self.parent.as_mut() {
            parent.on_stop_nested_scroll(scroll_type);
        }
        self.set_session(scroll_type, false);
        tracing::debug!("nested scroll stopped ({:?})", scroll_type);
    }

    fn active_parent(
        &mut self,
        scroll_type: ScrollType,
    ) -> Option<&mut (dyn NestedScrollParent + 'static)> {
        if !self.enabled || !self.session(scroll_type) {
            return None;
        }
        self.parent.as_deref_mut()
    }

    /// Offer `dy` to the ancestor before scrolling locally
    pub fn pre_scroll(&mut self, scroll_type: ScrollType, dy: i32) -> NestedScrollStep {
        if dy == 0 {
            return NestedScrollStep::NONE;
        }
        match self.active_parent(scroll_type) {
            Some(parent) => {
                let step = parent.on_nested_pre_scroll(dy, scroll_type);
                tracing::trace!(
                    "pre_scroll {:?} dy={} consumed={} offset={}",
                    scroll_type,
                    dy,
                    step.consumed,
                    step.offset
                );
                step
            }
            None => NestedScrollStep::NONE,
        }
    }

    /// Offer the leftover to the ancestor after scrolling locally by
    /// `dy_consumed`
    pub fn post_scroll(
        &mut self,
        scroll_type: ScrollType,
        dy_consumed: i32,
        dy_unconsumed: i32,
    ) -> NestedScrollStep {
        if dy_consumed == 0 && dy_unconsumed == 0 {
            return NestedScrollStep::NONE;
        }
        match self.active_parent(scroll_type) {
            Some(parent) => {
                let step = parent.on_nested_scroll(dy_consumed, dy_unconsumed, scroll_type);
                tracing::trace!(
                    "post_scroll {:?} consumed={} unconsumed={} -> parent consumed={} offset={}",
                    scroll_type,
                    dy_consumed,
                    dy_unconsumed,
                    step.consumed,
                    step.offset
                );
                step
            }
            None => NestedScrollStep::NONE,
        }
    }

    /// Offer a fling to the ancestor. True means it took the fling.
    pub fn pre_fling(&mut self, velocity_y: f64) -> bool {
        self.active_parent(ScrollType::Interactive)
            .map(|parent| parent.on_nested_pre_fling(velocity_y))
            .unwrap_or(false)
    }

    /// Report a fling to the ancestor
    pub fn fling(&mut self, velocity_y: f64, consumed: bool) -> bool {
        self.active_parent(ScrollType::Interactive)
            .map(|parent| parent.on_nested_fling(velocity_y, consumed))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Takes half of every pre-scroll and all of the post-scroll leftover
    struct Greedy {
        log: Rc<RefCell<Vec<String>>>,
        accept: bool,
    }

    impl NestedScrollParent for Greedy {
        fn on_start_nested_scroll(&mut self, scroll_type: ScrollType) -> bool {
            self.log.borrow_mut().push(format!("start {:?}", scroll_type));
            self.accept
        }

        fn on_stop_nested_scroll(&mut self, scroll_type: ScrollType) {
            self.log.borrow_mut().push(format!("stop {:?}", scroll_type));
        }

        fn on_nested_pre_scroll(&mut self, dy: i32, _scroll_type: ScrollType) -> NestedScrollStep {
            self.log.borrow_mut().push(format!("pre {}", dy));
            NestedScrollStep {
                consumed: dy / 2,
                offset: -(dy / 2),
            }
        }

        fn on_nested_scroll(
            &mut self,
            dy_consumed: i32,
            dy_unconsumed: i32,
            _scroll_type: ScrollType,
        ) -> NestedScrollStep {
            self.log
                .borrow_mut()
                .push(format!("post {} {}", dy_consumed, dy_unconsumed));
            NestedScrollStep {
                consumed: dy_unconsumed,
                offset: 0,
            }
        }

        fn on_nested_pre_fling(&mut self, _velocity_y: f64) -> bool {
            true
        }
    }

    fn greedy(accept: bool) -> (NestedScrollCoordinator, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let parent = Greedy {
            log: log.clone(),
            accept,
        };
        (NestedScrollCoordinator::with_parent(Box::new(parent)), log)
    }

    #[test]
    fn test_no_parent_is_noop() {
        let mut coordinator = NestedScrollCoordinator::new();
        assert!(!coordinator.start(ScrollType::Interactive));
        assert!(!coordinator.has_ancestor(ScrollType::Interactive));
        assert_eq!(coordinator.pre_scroll(ScrollType::Interactive, 40), NestedScrollStep::NONE);
        assert_eq!(
            coordinator.post_scroll(ScrollType::Interactive, 10, 30),
            NestedScrollStep::NONE
        );
        assert!(!coordinator.pre_fling(1000.0));
        coordinator.stop(ScrollType::Interactive);
    }

    #[test]
    fn test_start_idempotent() {
        let (mut coordinator, log) = greedy(true);
        assert!(coordinator.start(ScrollType::Interactive));
        assert!(coordinator.start(ScrollType::Interactive));
        assert_eq!(log.borrow().len(), 1);
        assert!(!coordinator.has_ancestor(ScrollType::Programmatic));
    }

    #[test]
    fn test_refused_session() {
        let (mut coordinator, log) = greedy(false);
        assert!(!coordinator.start(ScrollType::Programmatic));
        assert_eq!(coordinator.pre_scroll(ScrollType::Programmatic, 40), NestedScrollStep::NONE);
        coordinator.stop(ScrollType::Programmatic);
        assert_eq!(*log.borrow(), vec!["start Programmatic".to_string()]);
    }

    #[test]
    fn test_pre_and_post_delivered() {
        let (mut coordinator, log) = greedy(true);
        coordinator.start(ScrollType::Interactive);

        let pre = coordinator.pre_scroll(ScrollType::Interactive, 40);
        assert_eq!(pre, NestedScrollStep { consumed: 20, offset: -20 });

        let post = coordinator.post_scroll(ScrollType::Interactive, 15, 5);
        assert_eq!(post.consumed, 5);

        // Nothing to report: the parent is not called
        coordinator.pre_scroll(ScrollType::Interactive, 0);
        coordinator.post_scroll(ScrollType::Interactive, 0, 0);

        coordinator.stop(ScrollType::Interactive);
        assert_eq!(
            *log.borrow(),
            vec!["start Interactive", "pre 40", "post 15 5", "stop Interactive"]
        );
    }

    #[test]
    fn test_disable_stops_sessions() {
        let (mut coordinator, log) = greedy(true);
        coordinator.start(ScrollType::Interactive);
        coordinator.start(ScrollType::Programmatic);

        coordinator.set_enabled(false);
        assert!(!coordinator.is_enabled());
        assert!(!coordinator.has_ancestor(ScrollType::Interactive));
        assert!(!coordinator.has_ancestor(ScrollType::Programmatic));
        assert!(!coordinator.start(ScrollType::Interactive));
        assert!(log.borrow().iter().any(|l| l == "stop Programmatic"));
    }

    #[test]
    fn test_set_parent_stops_old_sessions() {
        let (mut coordinator, old_log) = greedy(true);
        coordinator.start(ScrollType::Interactive);

        let new_log = Rc::new(RefCell::new(Vec::new()));
        coordinator.set_parent(Some(Box::new(Greedy {
            log: new_log.clone(),
            accept: true,
        })));
        assert!(!coordinator.has_ancestor(ScrollType::Interactive));
        assert_eq!(
            *old_log.borrow(),
            vec!["start Interactive", "stop Interactive"]
        );

        assert!(coordinator.start(ScrollType::Interactive));
        assert_eq!(*new_log.borrow(), vec!["start Interactive"]);

        coordinator.set_parent(None);
        assert!(!coordinator.start(ScrollType::Interactive));
    }

    #[test]
    fn test_fling_requires_interactive_session() {
        let (mut coordinator, _log) = greedy(true);
        assert!(!coordinator.pre_fling(-2000.0));
        coordinator.start(ScrollType::Interactive);
        assert!(coordinator.pre_fling(-2000.0));
        assert!(!coordinator.fling(-2000.0, true));
    }
}
