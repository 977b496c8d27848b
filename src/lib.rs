//! Dotline
//!
//! Mirrors a character terminal onto a fixed-width serial braille line
//! display. Live output is rebuilt into a single display line and sent as
//! checksummed wire frames; a browse mode pans a viewport over the
//! terminal grid with the same keys the terminal would otherwise see.
//!
//! - `core`: display line reconstruction and the browse viewport
//! - `protocol`: checksummed, escaped wire frames with change detection
//! - `controller`: the follow/browse input state machine
//! - `session`: device binding and the event entry points
//! - `device`: display transports (serial line, or anything byte-shaped)
//! - `term`, `feedback`: collaborator interfaces to the terminal subsystem
//!   and the tone generator

pub mod config;
pub mod controller;
pub mod core;
pub mod device;
pub mod events;
pub mod feedback;
pub mod protocol;
pub mod session;
pub mod term;

pub use config::Config;
pub use controller::Mode;
pub use session::{Session, SessionError};
pub use self::core::WIDTH;
