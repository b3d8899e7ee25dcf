//! Host view capabilities
//!
//! The gesture controller never owns scroll position, layout or frame
//! scheduling. A concrete view implements [`ScrollHost`] and the controller
//! drives it.

/// When the view may scroll past its content bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverscrollPolicy {
    Never,
    Always,
    /// Only when there is content to scroll
    #[default]
    IfContentScrolls,
}

impl OverscrollPolicy {
    /// Whether overscroll is allowed for a view with scroll `range`
    pub fn allows(&self, range: i32) -> bool {
        match self {
            OverscrollPolicy::Never => false,
            OverscrollPolicy::Always => true,
            OverscrollPolicy::IfContentScrolls => range > 0,
        }
    }
}

/// A scrollable view driven by a gesture controller
pub trait ScrollHost {
    /// Current scroll offset `(x, y)` in pixels
    fn scroll_position(&self) -> (i32, i32);

    /// Move the content. `clamped_y` reports that the requested position was
    /// truncated at a bound, for hosts that track overscroll themselves.
    fn set_scroll_position(&mut self, x: i32, y: i32, clamped_y: bool);

    fn viewport_width(&self) -> i32;

    fn viewport_height(&self) -> i32;

    /// Total height of the scrollable content
    fn content_extent(&self) -> i32;

    /// Visible height the content scrolls within
    fn viewport_extent(&self) -> i32 {
        self.viewport_height()
    }

    fn overscroll_policy(&self) -> OverscrollPolicy {
        OverscrollPolicy::IfContentScrolls
    }

    /// Ask ancestors to stop intercepting this gesture
    fn request_disallow_intercept(&mut self);

    /// Redraw on the next frame
    fn invalidate(&mut self);

    /// Call back into `compute_scroll` on the next display frame
    fn post_invalidate_on_animation(&mut self);

    /// Called after every scroll position change
    fn on_scroll_applied(&mut self) {}

    fn scroll_y(&self) -> i32 {
        self.scroll_position().1
    }

    /// Maximum scroll offset, never negative
    fn scroll_range(&self) -> i32 {
        (self.content_extent() - self.viewport_extent()).max(0)
    }

    fn can_overscroll(&self) -> bool {
        self.overscroll_policy().allows(self.scroll_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_allows() {
        assert!(!OverscrollPolicy::Never.allows(500));
        assert!(OverscrollPolicy::Always.allows(0));
        assert!(OverscrollPolicy::IfContentScrolls.allows(1));
        assert!(!OverscrollPolicy::IfContentScrolls.allows(0));
    }

    struct Short;

    impl ScrollHost for Short {
        fn scroll_position(&self) -> (i32, i32) {
            (0, 0)
        }
        fn set_scroll_position(&mut self, _x: i32, _y: i32, _clamped_y: bool) {}
        fn viewport_width(&self) -> i32 {
            400
        }
        fn viewport_height(&self) -> i32 {
            1000
        }
        fn content_extent(&self) -> i32 {
            600
        }
        fn request_disallow_intercept(&mut self) {}
        fn invalidate(&mut self) {}
        fn post_invalidate_on_animation(&mut self) {}
    }

    #[test]
    fn test_range_never_negative() {
        let host = Short;
        assert_eq!(host.scroll_range(), 0);
        assert!(!host.can_overscroll());
    }
}
