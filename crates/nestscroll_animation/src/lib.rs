//! Nestscroll Animation Models
//!
//! Time-driven models behind scroll animations and boundary feedback.
//!
//! # Features
//!
//! - **Spline Fling**: Density-aware friction curve for released flings
//! - **Spring-Back**: Cubic return from out-of-range positions
//! - **Edge Glow**: Pull, absorb and recede model for overscroll edges
//! - **Velocity Tracking**: Per-pointer impulse velocity estimation
//!
//! Every model takes host-supplied time in milliseconds; nothing reads a clock.

pub mod easing;
pub mod edge_effect;
pub mod scroller;
pub mod velocity;

pub use easing::Easing;
pub use edge_effect::{Edge, EdgeEffect, EdgeEffectModel, GlowState};
pub use scroller::{OverScroller, ScrollerMode, DEFAULT_SCROLL_FRICTION};
pub use velocity::{PointerVelocityTracker, VelocityTracker1D};
