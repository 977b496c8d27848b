//! Frame encoding
//!
//! Turns a display line into a checksummed wire frame, with change
//! detection so identical lines never hit the serial link twice in a row.

use crate::core::WIDTH;
use crate::device::BrailleDevice;

use super::{CMD_DISPLAY, CTRL_MAX, ESCAPE_BIT, ETX, SOH, STX};

/// Worst case: every data byte and the checksum escaped.
const MAX_FRAME_LEN: usize = 1 + 1 + 2 * WIDTH + 2 + 1;

/// Encodes display lines and pushes them to the transport.
///
/// Keeps a private copy of the last line sent; encoding the same line again
/// is a no-op. The memo starts empty, so the first send always goes out,
/// blank lines included. It is never invalidated by anything other than a
/// differing line, which means a frame lost by the transport stays lost
/// until the line changes.
#[derive(Debug, Default)]
pub struct FrameEncoder {
    last_sent: Option<[u16; WIDTH]>,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `line` and write the frame to `device` in a single call,
    /// unless `line` is byte-identical to the previous one sent.
    pub fn send(&mut self, line: &[u16; WIDTH], device: &mut dyn BrailleDevice) {
        if self.last_sent.as_ref() == Some(line) {
            return;
        }
        self.last_sent = Some(*line);
        device.write(&encode(line));
    }
}

/// Build the wire frame for `line`.
///
/// Code points above 0xFF are not representable and become `'?'`; empty
/// cells become spaces. Both substitutions happen before the checksum is
/// accumulated, so the checksum covers exactly the bytes a device decodes.
pub fn encode(line: &[u16; WIDTH]) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_FRAME_LEN);
    out.push(STX);
    out.push(CMD_DISPLAY);

    let mut csum = CMD_DISPLAY;
    for &cell in line {
        let byte = match cell {
            0x00 => b' ',
            0x100.. => b'?',
            c => c as u8,
        };
        csum ^= byte;
        push_escaped(&mut out, byte);
    }

    push_escaped(&mut out, csum);
    out.push(ETX);
    out
}

fn push_escaped(out: &mut Vec<u8>, byte: u8) {
    if byte <= CTRL_MAX {
        out.push(SOH);
        out.push(byte | ESCAPE_BIT);
    } else {
        out.push(byte);
    }
}

/// Frame decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("frame too short")]
    Truncated,
    #[error("missing frame markers")]
    BadFraming,
    #[error("checksum mismatch: computed {computed:#04x}, carried {carried:#04x}")]
    Checksum { computed: u8, carried: u8 },
}

/// Reverse of [`encode`]: strip the frame markers, undo escaping, and
/// verify the checksum. Returns the command byte followed by the data
/// bytes. Intended for device simulators and tests.
pub fn decode(frame: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if frame.len() < 4 {
        return Err(DecodeError::Truncated);
    }
    if frame[0] != STX || frame[frame.len() - 1] != ETX {
        return Err(DecodeError::BadFraming);
    }

    let mut data = Vec::with_capacity(frame.len() - 2);
    let mut bytes = frame[1..frame.len() - 1].iter();
    while let Some(&b) = bytes.next() {
        if b == SOH {
            match bytes.next() {
                Some(&escaped) => data.push(escaped & !ESCAPE_BIT),
                None => return Err(DecodeError::Truncated),
            }
        } else {
            data.push(b);
        }
    }

    match data.split_last() {
        Some((&carried, payload)) => {
            let computed = payload.iter().fold(0, |acc, &b| acc ^ b);
            if computed != carried {
                return Err(DecodeError::Checksum { computed, carried });
            }
            Ok(payload.to_vec())
        }
        None => Err(DecodeError::Truncated),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Default, Debug)]
    struct SinkDevice {
        frames: Vec<Vec<u8>>,
    }

    impl BrailleDevice for SinkDevice {
        fn name(&self) -> &str {
            "sink"
        }

        fn setup(&mut self, _options: &str) -> crate::device::DeviceResult<()> {
            Ok(())
        }

        fn write(&mut self, bytes: &[u8]) {
            self.frames.push(bytes.to_vec());
        }
    }

    fn line_of(text: &str) -> [u16; WIDTH] {
        let mut line = [0u16; WIDTH];
        for (cell, b) in line.iter_mut().zip(text.bytes()) {
            *cell = u16::from(b);
        }
        line
    }

    #[test]
    fn test_frame_layout() {
        let frame = encode(&line_of("ok"));
        assert_eq!(frame[0], STX);
        assert_eq!(frame[1], CMD_DISPLAY);
        assert_eq!(frame[frame.len() - 1], ETX);
        // No escapable bytes in "ok" + spaces: fixed length
        assert_eq!(frame.len(), 1 + 1 + WIDTH + 1 + 1);
        assert_eq!(frame[2], b'o');
        assert_eq!(frame[3], b'k');
        assert_eq!(frame[4], b' ');
    }

    #[test]
    fn test_checksum_is_xor_of_payload() {
        let frame = encode(&line_of("checksum"));
        let payload = decode(&frame).expect("frame decodes");
        assert_eq!(payload.len(), 1 + WIDTH);
        assert_eq!(payload[0], CMD_DISPLAY);

        // decode already verified the checksum; spot-check it by hand too
        let by_hand = payload.iter().fold(0u8, |acc, &b| acc ^ b);
        assert_eq!(by_hand, frame[frame.len() - 2]);
    }

    #[test]
    fn test_unsupported_glyph_substituted() {
        let mut line = [0u16; WIDTH];
        line[0] = 0x2584;
        let payload = decode(&encode(&line)).expect("frame decodes");
        assert_eq!(payload[1], b'?');
    }

    #[test]
    fn test_blank_cells_substituted_with_spaces() {
        let payload = decode(&encode(&[0u16; WIDTH])).expect("frame decodes");
        assert!(payload[1..].iter().all(|&b| b == b' '));
    }

    #[test]
    fn test_control_range_escaped() {
        let mut line = [0u16; WIDTH];
        line[0] = 0x03;
        let frame = encode(&line);
        assert_eq!(frame[2], SOH);
        assert_eq!(frame[3], 0x03 | ESCAPE_BIT);
        // The checksum still covers the raw value
        let payload = decode(&frame).expect("frame decodes");
        assert_eq!(payload[1], 0x03);
    }

    #[test]
    fn test_zero_checksum_escaped() {
        // 39 blank cells XOR down to one space; the crafted first cell
        // cancels it against the command byte, leaving a zero checksum
        let mut line = [0u16; WIDTH];
        line[0] = u16::from(CMD_DISPLAY ^ b' ');
        let frame = encode(&line);
        let len = frame.len();
        assert_eq!(frame[len - 3], SOH);
        assert_eq!(frame[len - 2], ESCAPE_BIT);
        assert!(decode(&frame).is_ok());
    }

    #[test]
    fn test_send_skips_identical_line() {
        let mut encoder = FrameEncoder::new();
        let mut device = SinkDevice::default();
        let line = line_of("same");

        encoder.send(&line, &mut device);
        encoder.send(&line, &mut device);
        assert_eq!(device.frames.len(), 1);

        encoder.send(&line_of("diff"), &mut device);
        assert_eq!(device.frames.len(), 2);

        // Going back to the first line counts as a change again
        encoder.send(&line, &mut device);
        assert_eq!(device.frames.len(), 3);
    }

    #[test]
    fn test_first_send_of_blank_line_goes_out() {
        let mut encoder = FrameEncoder::new();
        let mut device = SinkDevice::default();
        encoder.send(&[0u16; WIDTH], &mut device);
        assert_eq!(device.frames.len(), 1);
    }

    #[test]
    fn test_decode_rejects_bad_frames() {
        assert_eq!(decode(&[STX, ETX]), Err(DecodeError::Truncated));
        assert_eq!(
            decode(&[0x00, CMD_DISPLAY, CMD_DISPLAY, ETX]),
            Err(DecodeError::BadFraming)
        );

        let mut frame = encode(&[0u16; WIDTH]);
        let len = frame.len();
        frame[len - 2] ^= 0xff;
        assert!(matches!(decode(&frame), Err(DecodeError::Checksum { .. })));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_recovers_substituted_line(cells in proptest::collection::vec(0u16..0x300, WIDTH)) {
            let mut line = [0u16; WIDTH];
            line.copy_from_slice(&cells);

            let payload = decode(&encode(&line)).expect("frame decodes");
            prop_assert_eq!(payload[0], CMD_DISPLAY);
            for (i, &cell) in line.iter().enumerate() {
                let expected = match cell {
                    0x00 => b' ',
                    0x100.. => b'?',
                    c => c as u8,
                };
                prop_assert_eq!(payload[1 + i], expected);
            }
        }

        #[test]
        fn prop_no_unescaped_control_bytes_in_body(cells in proptest::collection::vec(0u16..0x300, WIDTH)) {
            let mut line = [0u16; WIDTH];
            line.copy_from_slice(&cells);

            let frame = encode(&line);
            let mut bytes = frame[1..frame.len() - 1].iter();
            while let Some(&b) = bytes.next() {
                if b == SOH {
                    let &escaped = bytes.next().expect("escape prefix is followed by a byte");
                    prop_assert!(escaped & ESCAPE_BIT != 0);
                    prop_assert!(escaped & !ESCAPE_BIT <= CTRL_MAX);
                } else {
                    prop_assert!(b > CTRL_MAX);
                }
            }
        }
    }
}
