//! Serial line transport
//!
//! Drives a display attached to a serial port. The option string uses the
//! kernel serial-console shape: baud rate, then an optional parity letter
//! (`n`, `o`, `e`), then an optional word size (`7` or `8`), e.g.
//! `"57600o8"`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use nix::sys::termios::{self, BaudRate, ControlFlags, SetArg};

use super::{BrailleDevice, DeviceError, DeviceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parity {
    None,
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSettings {
    baud: BaudRate,
    parity: Parity,
    bits: u8,
}

/// A braille display on a serial port.
#[derive(Debug)]
pub struct SerialDevice {
    name: String,
    port: File,
}

impl SerialDevice {
    /// Open the port at `path`. Line parameters are applied later by
    /// [`setup`](BrailleDevice::setup).
    pub fn open(path: &Path) -> DeviceResult<Self> {
        let port = OpenOptions::new().write(true).open(path)?;
        Ok(Self {
            name: path.display().to_string(),
            port,
        })
    }
}

impl BrailleDevice for SerialDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, options: &str) -> DeviceResult<()> {
        let settings = parse_options(options)?;

        let mut tio = termios::tcgetattr(&self.port).map_err(DeviceError::Termios)?;
        termios::cfmakeraw(&mut tio);
        termios::cfsetispeed(&mut tio, settings.baud).map_err(DeviceError::Termios)?;
        termios::cfsetospeed(&mut tio, settings.baud).map_err(DeviceError::Termios)?;

        tio.control_flags &=
            !(ControlFlags::CSIZE | ControlFlags::PARENB | ControlFlags::PARODD);
        tio.control_flags |= match settings.bits {
            7 => ControlFlags::CS7,
            _ => ControlFlags::CS8,
        };
        match settings.parity {
            Parity::None => {}
            Parity::Odd => tio.control_flags |= ControlFlags::PARENB | ControlFlags::PARODD,
            Parity::Even => tio.control_flags |= ControlFlags::PARENB,
        }
        tio.control_flags |= ControlFlags::CLOCAL | ControlFlags::CREAD;

        termios::tcsetattr(&self.port, SetArg::TCSANOW, &tio).map_err(DeviceError::Termios)?;
        tracing::debug!(device = %self.name, options, "serial line configured");
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Err(e) = self.port.write_all(bytes) {
            tracing::warn!(device = %self.name, error = %e, "frame write failed");
        }
    }
}

fn parse_options(options: &str) -> DeviceResult<LineSettings> {
    let digits_end = options
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(options.len());
    let (speed, rest) = options.split_at(digits_end);

    let baud: u32 = speed
        .parse()
        .map_err(|_| DeviceError::BadOptions(options.to_string()))?;
    let baud = match baud {
        1200 => BaudRate::B1200,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115200 => BaudRate::B115200,
        other => return Err(DeviceError::BadBaud(other)),
    };

    let mut rest = rest.chars();
    let parity = match rest.next() {
        None => Parity::None,
        Some('n') => Parity::None,
        Some('o') => Parity::Odd,
        Some('e') => Parity::Even,
        Some(_) => return Err(DeviceError::BadOptions(options.to_string())),
    };
    let bits = match rest.next() {
        None => 8,
        Some('7') => 7,
        Some('8') => 8,
        Some(_) => return Err(DeviceError::BadOptions(options.to_string())),
    };
    if rest.next().is_some() {
        return Err(DeviceError::BadOptions(options.to_string()));
    }

    Ok(LineSettings { baud, parity, bits })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_options() {
        let settings = parse_options("57600o8").unwrap();
        assert_eq!(settings.baud, BaudRate::B57600);
        assert_eq!(settings.parity, Parity::Odd);
        assert_eq!(settings.bits, 8);
    }

    #[test]
    fn test_parse_bare_speed() {
        let settings = parse_options("9600").unwrap();
        assert_eq!(settings.baud, BaudRate::B9600);
        assert_eq!(settings.parity, Parity::None);
        assert_eq!(settings.bits, 8);
    }

    #[test]
    fn test_parse_even_parity_seven_bits() {
        let settings = parse_options("19200e7").unwrap();
        assert_eq!(settings.baud, BaudRate::B19200);
        assert_eq!(settings.parity, Parity::Even);
        assert_eq!(settings.bits, 7);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_options(""),
            Err(DeviceError::BadOptions(_))
        ));
        assert!(matches!(
            parse_options("fast"),
            Err(DeviceError::BadOptions(_))
        ));
        assert!(matches!(
            parse_options("57600x8"),
            Err(DeviceError::BadOptions(_))
        ));
        assert!(matches!(
            parse_options("57600o9"),
            Err(DeviceError::BadOptions(_))
        ));
        assert!(matches!(
            parse_options("57600o8extra"),
            Err(DeviceError::BadOptions(_))
        ));
    }

    #[test]
    fn test_parse_rejects_odd_baud() {
        assert!(matches!(
            parse_options("31250"),
            Err(DeviceError::BadBaud(31250))
        ));
    }
}
