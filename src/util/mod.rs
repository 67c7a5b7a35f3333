//! Utility modules for tablectl.

mod clock;

pub use clock::{Clock, MockClock, SystemClock};
