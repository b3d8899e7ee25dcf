//! Nestscroll Layout
//!
//! Nested scrolling for a vertical scroll view: a touch controller that
//! shares every drag and fling with a scrollable ancestor, plus the
//! clamping, fling and overscroll pieces it is built from.
//!
//! # Features
//!
//! - **Gesture Controller**: Touch slop, multi-pointer hand-off, fling on release
//! - **Nested Negotiation**: Pre-scroll and post-scroll phases per scroll type
//! - **Fling Simulation**: Frame-stepped spline fling with edge absorption
//! - **Overscroll Clamping**: One clamp shared by touch and animation paths
//! - **Configuration**: Density-scaled thresholds loadable from TOML
//!
//! # Example
//!
//! ```rust
//! use nestscroll_core::MotionEvent;
//! use nestscroll_layout::{ScrollConfig, ScrollHost, TouchGestureController};
//!
//! struct View {
//!     y: i32,
//! }
//!
//! impl ScrollHost for View {
//!     fn scroll_position(&self) -> (i32, i32) {
//!         (0, self.y)
//!     }
//!     fn set_scroll_position(&mut self, _x: i32, y: i32, _clamped: bool) {
//!         self.y = y;
//!     }
//!     fn viewport_width(&self) -> i32 {
//!         400
//!     }
//!     fn viewport_height(&self) -> i32 {
//!         1000
//!     }
//!     fn content_extent(&self) -> i32 {
//!         1500
//!     }
//!     fn request_disallow_intercept(&mut self) {}
//!     fn invalidate(&mut self) {}
//!     fn post_invalidate_on_animation(&mut self) {}
//! }
//!
//! let mut view = View { y: 0 };
//! let mut controller = TouchGestureController::new(ScrollConfig::default());
//! controller.on_touch_event(&mut view, &MotionEvent::down(0, 200.0, 500.0, 0));
//! controller.on_touch_event(&mut view, &MotionEvent::moved(0, 200.0, 400.0, 16));
//! assert_eq!(view.y, 92);
//! ```

pub mod clamp;
pub mod config;
pub mod fling;
pub mod gesture;
pub mod host;
pub mod nested;

pub use clamp::{clamp, ClampResult, OverscrollClamp};
pub use config::ScrollConfig;
pub use fling::{FlingSimulator, FlingState};
pub use gesture::{GestureState, TouchGestureController};
pub use host::{OverscrollPolicy, ScrollHost};
pub use nested::{NestedScrollCoordinator, NestedScrollParent, NestedScrollStep, ScrollType};
