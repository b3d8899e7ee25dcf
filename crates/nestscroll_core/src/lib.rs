//! Nestscroll Core
//!
//! Foundational primitives shared by the nested-scroll crates:
//!
//! - **Motion Events**: Multi-touch pointer events, independent of platform
//! - **State Machines**: Enum-based transition tables with history
//! - **Errors**: One error type for configuration and protocol issues
//!
//! # Example
//!
//! ```rust
//! use nestscroll_core::events::{MotionEvent, PointerId};
//!
//! let down = MotionEvent::down(0, 120.0, 480.0, 0);
//! assert_eq!(down.find_pointer_index(PointerId(0)), Some(0));
//! ```

pub mod error;
pub mod events;
pub mod fsm;

pub use error::{Result, ScrollError};
pub use events::{EventType, MotionEvent, PointerId, PointerSample, TouchAction};
pub use fsm::{Fsm, StateTransitions};
