//! Platform abstraction layer
//!
//! Handles the host side of a frame:
//! - Time (`Clock`), including the blocking wave-cleared pause
//! - The cabinet loop tying session, display and tone pin together

pub mod cabinet;
pub mod time;

pub use cabinet::Cabinet;
pub use time::{Clock, SimClock, StdClock};
