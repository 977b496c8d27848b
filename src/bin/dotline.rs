//! Dotline demo driver
//!
//! Binds a display device, then replays bytes from stdin as terminal
//! output so the resulting frames can be inspected. With a serial port
//! argument the frames go to the real device; without one they are
//! hex-dumped to stdout.
//!
//! Usage: `dotline [/dev/ttyS0]`

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dotline::device::{BrailleDevice, DeviceResult, SerialDevice};
use dotline::events::TerminalEvent;
use dotline::feedback::Beeper;
use dotline::term::{CursorPos, GridSize, TerminalGrid, TerminalId};
use dotline::{Config, Session};

/// Hex-dumps every frame instead of writing to hardware.
#[derive(Debug)]
struct HexDevice;

impl BrailleDevice for HexDevice {
    fn name(&self) -> &str {
        "hexdump"
    }

    fn setup(&mut self, options: &str) -> DeviceResult<()> {
        tracing::debug!(options, "hex device ready");
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) {
        let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
        println!("{}", hex.join(" "));
    }
}

/// A fixed 80x25 grid standing in for the terminal subsystem.
struct StaticGrid {
    foreground: TerminalId,
}

impl TerminalGrid for StaticGrid {
    fn foreground(&self) -> TerminalId {
        self.foreground
    }

    fn size(&self, _terminal: TerminalId) -> GridSize {
        GridSize::new(80, 25)
    }

    fn cursor(&self, _terminal: TerminalId) -> CursorPos {
        CursorPos::default()
    }

    fn sync_cursor(&mut self, _terminal: TerminalId) {}

    fn redraw(&mut self, terminal: TerminalId, x: usize, y: usize) {
        tracing::debug!(%terminal, x, y, "viewport redraw");
    }
}

/// Logs cues instead of driving a speaker.
struct LogBeeper;

impl Beeper for LogBeeper {
    fn beep(&mut self, freq_hz: u32, duration: Duration) {
        tracing::info!(freq_hz, ?duration, "cue");
    }
}

fn run() -> Result<(), String> {
    let config = Config::load_or_default();
    let terminal = TerminalId(1);
    let mut session = Session::new(StaticGrid { foreground: terminal }, LogBeeper, config);

    let device: Box<dyn BrailleDevice> = match std::env::args().nth(1) {
        Some(port) => Box::new(
            SerialDevice::open(Path::new(&port))
                .map_err(|e| format!("failed to open {port}: {e}"))?,
        ),
        None => Box::new(HexDevice),
    };

    session
        .register(device, 0, None, None)
        .map_err(|e| format!("registration failed: {e}"))?;
    session.handle_terminal(TerminalEvent::Foreground { terminal });

    let mut buf = [0u8; 4096];
    let mut stdin = std::io::stdin().lock();
    loop {
        let n = stdin.read(&mut buf).map_err(|e| format!("stdin: {e}"))?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            session.handle_terminal(TerminalEvent::Write {
                terminal,
                ch: u16::from(byte),
            });
        }
    }

    let name = session
        .bound_device()
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();
    session
        .unregister(&name)
        .map_err(|e| format!("unregistration failed: {e}"))?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        tracing::error!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
