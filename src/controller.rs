//! Mode controller
//!
//! The input state machine behind the display. In follow mode the device
//! mirrors live terminal output and the keyboard is left alone; in browse
//! mode the same keys pan a viewport over the terminal grid and are
//! swallowed. One key toggles between the two.

use crate::core::{LineBuffer, Pan, Viewport};
use crate::device::BrailleDevice;
use crate::events::{Key, KeyDisposition, KeyEvent, TerminalEvent};
use crate::feedback::{Beeper, BEEP_HIGH, BEEP_LOW, BEEP_MED, CUE_DURATION};
use crate::protocol::FrameEncoder;
use crate::term::{TerminalGrid, TerminalId};

/// The key that toggles between following and browsing.
pub const TOGGLE_KEY: Key = Key::Insert;

/// What the display is mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Live terminal output.
    #[default]
    Following,
    /// An operator-panned window into the terminal grid.
    Browsing,
}

/// Per-binding state bundle: mode, line, viewport, encoder, and the
/// identity of the terminal last mirrored. Created fresh at bind time and
/// dropped at unbind.
pub struct Controller {
    mode: Mode,
    line: LineBuffer,
    viewport: Viewport,
    encoder: FrameEncoder,
    active_terminal: Option<TerminalId>,
    sound: bool,
}

impl Controller {
    pub fn new(sound: bool) -> Self {
        Self {
            mode: Mode::Following,
            line: LineBuffer::new(),
            viewport: Viewport::new(),
            encoder: FrameEncoder::new(),
            active_terminal: None,
            sound,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Dispatch one keyboard notification.
    pub fn handle_key<G: TerminalGrid, B: Beeper>(
        &mut self,
        event: KeyEvent,
        grid: &mut G,
        beeper: &mut B,
        device: &mut dyn BrailleDevice,
    ) -> KeyDisposition {
        match event {
            KeyEvent::Lock { enabled, .. } => {
                self.cue(beeper, if enabled { BEEP_HIGH } else { BEEP_MED });
                KeyDisposition::PassThrough
            }
            // Only key-down drives the state machine
            KeyEvent::Key { pressed: false, .. } => KeyDisposition::PassThrough,
            KeyEvent::Key { key, terminal, .. } => match self.mode {
                Mode::Following => self.follow_key(key, terminal, grid, beeper),
                Mode::Browsing => self.browse_key(key, terminal, grid, beeper, device),
            },
        }
    }

    /// Dispatch one terminal notification.
    pub fn handle_terminal<G: TerminalGrid>(
        &mut self,
        event: TerminalEvent,
        grid: &mut G,
        device: &mut dyn BrailleDevice,
    ) {
        match event {
            TerminalEvent::Write { terminal, ch } => {
                if terminal != grid.foreground() {
                    return;
                }
                match self.mode {
                    Mode::Following => {
                        self.sync_active(terminal, device);
                        if self.line.put(ch) {
                            self.encoder.send(self.line.cells(), device);
                        }
                    }
                    Mode::Browsing => {
                        // The line keeps accumulating silently; the device
                        // shows the viewport render instead
                        self.line.put(ch);
                        self.refresh(grid, terminal);
                    }
                }
            }
            TerminalEvent::Foreground { terminal } | TerminalEvent::Redraw { terminal } => {
                match self.mode {
                    Mode::Following => self.sync_active(terminal, device),
                    Mode::Browsing => self.refresh(grid, terminal),
                }
            }
        }
    }

    fn follow_key<G: TerminalGrid, B: Beeper>(
        &mut self,
        key: Key,
        terminal: TerminalId,
        grid: &mut G,
        beeper: &mut B,
    ) -> KeyDisposition {
        if key != TOGGLE_KEY {
            // Normal keys are not intercepted while following
            return KeyDisposition::PassThrough;
        }
        tracing::debug!(%terminal, "entering browse mode");
        self.mode = Mode::Browsing;
        self.cue(beeper, BEEP_HIGH);
        self.viewport.follow_cursor(grid.cursor(terminal));
        self.refresh(grid, terminal);
        KeyDisposition::Consumed
    }

    fn browse_key<G: TerminalGrid, B: Beeper>(
        &mut self,
        key: Key,
        terminal: TerminalId,
        grid: &mut G,
        beeper: &mut B,
        device: &mut dyn BrailleDevice,
    ) -> KeyDisposition {
        let size = grid.size(terminal);
        let disposition = match key {
            k if k == TOGGLE_KEY => {
                tracing::debug!(%terminal, "returning to follow mode");
                self.cue(beeper, BEEP_MED);
                self.mode = Mode::Following;
                // Force the next surface event or write to resync
                self.active_terminal = None;
                self.encoder.send(self.line.cells(), device);
                KeyDisposition::Consumed
            }
            Key::Left => {
                let pan = self.viewport.pan_left(size);
                self.pan_cue(beeper, pan);
                KeyDisposition::Consumed
            }
            Key::Right => {
                let pan = self.viewport.pan_right(size);
                self.pan_cue(beeper, pan);
                KeyDisposition::Consumed
            }
            Key::Up => {
                let pan = self.viewport.pan_up();
                self.pan_cue(beeper, pan);
                KeyDisposition::Consumed
            }
            Key::Down => {
                let pan = self.viewport.pan_down(size);
                self.pan_cue(beeper, pan);
                KeyDisposition::Consumed
            }
            Key::Home => {
                self.viewport.follow_cursor(grid.cursor(terminal));
                KeyDisposition::Consumed
            }
            Key::PageUp => {
                self.viewport.jump_top();
                KeyDisposition::Consumed
            }
            Key::PageDown => {
                self.viewport.jump_bottom(size);
                KeyDisposition::Consumed
            }
            _ => KeyDisposition::PassThrough,
        };
        // Every browse-mode key ends in a refresh, handled or not
        self.refresh(grid, terminal);
        disposition
    }

    /// Track which terminal the display is mirroring. On a switch, clear
    /// the line and push an empty frame so two terminals' text never mix.
    fn sync_active(&mut self, terminal: TerminalId, device: &mut dyn BrailleDevice) {
        if self.active_terminal == Some(terminal) {
            return;
        }
        tracing::debug!(%terminal, "foreground terminal changed, resetting line");
        self.active_terminal = Some(terminal);
        self.line.reset();
        self.encoder.send(self.line.cells(), device);
    }

    fn refresh<G: TerminalGrid>(&self, grid: &mut G, terminal: TerminalId) {
        let (x, y) = self.viewport.origin();
        grid.sync_cursor(terminal);
        grid.redraw(terminal, x, y);
    }

    fn pan_cue<B: Beeper>(&self, beeper: &mut B, pan: Pan) {
        match pan {
            Pan::Moved => {}
            Pan::Wrapped => self.cue(beeper, BEEP_HIGH),
            Pan::Blocked => self.cue(beeper, BEEP_LOW),
        }
    }

    fn cue<B: Beeper>(&self, beeper: &mut B, freq_hz: u32) {
        if self.sound {
            beeper.beep(freq_hz, CUE_DURATION);
        }
    }
}
