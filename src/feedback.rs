//! Audible feedback collaborator
//!
//! Mode switches and blocked navigation are signaled with short tones.
//! The controller gates every call on the `sound` configuration toggle,
//! so implementations never need their own enable flag.

use std::time::Duration;

/// Entering browse mode, wrapping to another row, a lock turning on.
pub const BEEP_HIGH: u32 = 880;

/// Returning to follow mode, a lock turning off.
pub const BEEP_MED: u32 = 440;

/// Navigation blocked at a grid edge.
pub const BEEP_LOW: u32 = 220;

/// Every cue lasts a tenth of a second.
pub const CUE_DURATION: Duration = Duration::from_millis(100);

/// Emits a tone of the given frequency and duration.
pub trait Beeper {
    fn beep(&mut self, freq_hz: u32, duration: Duration);
}

/// Discards every cue. For embeddings without a speaker.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBeeper;

impl Beeper for NullBeeper {
    fn beep(&mut self, _freq_hz: u32, _duration: Duration) {}
}
