//! Time base for the demo
//!
//! The host calls in once per animation frame with the elapsed time.
//! [`Clock`] turns that into slow growth ticks and fast fall frames, and
//! [`Playback`] maps growth ticks onto the tree age.

mod clock;
mod playback;

pub use clock::{Clock, Ticks, MAX_TICKS_PER_ADVANCE};
pub use playback::{Playback, PlaybackConfig, MAX_YEARS, MIN_YEARS};
