//! Scroll position clamping
//!
//! Shared by the touch and fling paths; neither gets special treatment here.
//! What happens after a clamp (spring-back, edge glow) is the caller's call.

/// Outcome of applying a delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampResult {
    pub position: i32,
    /// The delta was truncated at a bound
    pub clamped: bool,
}

/// Bounds a scroll position to the content range plus optional slack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverscrollClamp {
    /// Slack past either end when overscroll is allowed, px
    pub max_overscroll: i32,
}

impl OverscrollClamp {
    pub fn new(max_overscroll: i32) -> Self {
        Self {
            max_overscroll: max_overscroll.max(0),
        }
    }

    /// Apply `delta` to `current` within `[0, range]`, widened by the slack
    /// when `overscroll_allowed`
    pub fn apply(
        &self,
        delta: i32,
        current: i32,
        range: i32,
        overscroll_allowed: bool,
    ) -> ClampResult {
        let slack = if overscroll_allowed { self.max_overscroll } else { 0 };
        let top = -slack;
        let bottom = range.max(0).saturating_add(slack);

        let position = current.saturating_add(delta);
        if position > bottom {
            ClampResult {
                position: bottom,
                clamped: true,
            }
        } else if position < top {
            ClampResult {
                position: top,
                clamped: true,
            }
        } else {
            ClampResult {
                position,
                clamped: false,
            }
        }
    }
}

/// Clamp with no overscroll slack
pub fn clamp(delta: i32, current: i32, range: i32, overscroll_allowed: bool) -> ClampResult {
    OverscrollClamp::default().apply(delta, current, range, overscroll_allowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range() {
        let r = clamp(90, 0, 500, false);
        assert_eq!(r, ClampResult { position: 90, clamped: false });
    }

    #[test]
    fn test_clamps_at_bottom() {
        let r = clamp(50, 500, 500, false);
        assert_eq!(r, ClampResult { position: 500, clamped: true });
    }

    #[test]
    fn test_clamps_at_top() {
        let r = clamp(-80, 30, 500, true);
        assert_eq!(r, ClampResult { position: 0, clamped: true });
    }

    #[test]
    fn test_slack_only_when_allowed() {
        let clamp = OverscrollClamp::new(40);
        assert_eq!(clamp.apply(-60, 0, 500, true).position, -40);
        assert_eq!(clamp.apply(-60, 0, 500, false).position, 0);
        assert_eq!(clamp.apply(20, 500, 500, true), ClampResult { position: 520, clamped: false });
    }

    #[test]
    fn test_no_overflow() {
        let r = clamp(i32::MAX, 10, 500, false);
        assert_eq!(r.position, 500);
        assert!(r.clamped);
    }
}
