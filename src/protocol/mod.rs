//! Wire protocol
//!
//! Frames sent to the display are plain byte sequences on a serial line:
//!
//! ```text
//! STX '>' <WIDTH data bytes> <checksum> ETX
//! ```
//!
//! The checksum is the XOR of the command byte and all data bytes, computed
//! before escaping. Any data or checksum byte that collides with the
//! control codes below is prefixed with [`SOH`] and emitted with
//! [`ESCAPE_BIT`] set.

mod frame;

pub use frame::{decode, encode, DecodeError, FrameEncoder};

/// Escape prefix.
pub const SOH: u8 = 0x01;
/// Start of frame.
pub const STX: u8 = 0x02;
/// End of frame.
pub const ETX: u8 = 0x03;
pub const EOT: u8 = 0x04;
pub const ENQ: u8 = 0x05;

/// Command byte: display the line that follows.
pub const CMD_DISPLAY: u8 = b'>';

/// Highest byte value that must be escaped inside a frame.
pub const CTRL_MAX: u8 = ENQ;

/// Bit set on an escaped byte to move it out of the control range.
pub const ESCAPE_BIT: u8 = 0x40;
