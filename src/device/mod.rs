//! Display transports
//!
//! A braille display is a write-only sink for encoded frames plus a setup
//! hook that applies a line configuration. Transports are deliberately
//! dumb: the core never consults the outcome of a frame write, so a
//! dropped frame simply leaves stale cells until the line next changes.

mod serial;

pub use serial::SerialDevice;

/// Option string applied when registration does not supply one:
/// 57600 baud, odd parity, 8 data bits.
pub const DEFAULT_OPTIONS: &str = "57600o8";

/// Transport-level failure.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("malformed option string {0:?}")]
    BadOptions(String),

    #[error("unsupported baud rate {0}")]
    BadBaud(u32),

    #[error("failed to configure line discipline: {0}")]
    Termios(#[source] nix::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transport operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// A bound braille display device.
pub trait BrailleDevice: std::fmt::Debug {
    /// Stable identity, used to match an unbind request against the device
    /// that is actually bound.
    fn name(&self) -> &str;

    /// Apply a line configuration such as `"57600o8"`. A failure here
    /// aborts registration.
    fn setup(&mut self, options: &str) -> DeviceResult<()>;

    /// Push one encoded frame in a single call. The outcome is not
    /// consulted by the core; implementations should log failures.
    fn write(&mut self, bytes: &[u8]);
}
