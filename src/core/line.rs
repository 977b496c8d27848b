//! Display line reconstruction
//!
//! Rebuilds the single line shown on the display from the stream of
//! characters written to the foreground terminal. The line is a sliding
//! window over the most recent output: once the cursor reaches the right
//! edge, each new character shifts the line left by one cell.

use super::WIDTH;

/// Cell value written by a clear. The encoder substitutes a space on the
/// wire, but clears and backspaces must stay distinguishable for change
/// detection.
const EMPTY: u16 = 0x00;

/// Cell value written by a backspace.
const SPACE: u16 = b' ' as u16;

/// The current display-width line of code points.
///
/// The cursor is the index of the next write position, in `[0, WIDTH]`.
/// Line terminators do not clear the line immediately; they arm a flag and
/// the clear happens when the next printable character arrives, so a line
/// stays readable until it is actually replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    cells: [u16; WIDTH],
    cursor: usize,
    pending_newline: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    /// Create an empty line. The pending-newline flag starts armed so the
    /// first character written lands on a clean line.
    pub fn new() -> Self {
        Self {
            cells: [EMPTY; WIDTH],
            cursor: 0,
            pending_newline: true,
        }
    }

    /// The line's code points, blank cells included.
    pub fn cells(&self) -> &[u16; WIDTH] {
        &self.cells
    }

    /// Index of the next write position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Consume one character written to the foreground terminal.
    ///
    /// Returns `true` when the visible cells changed and the display should
    /// be updated.
    pub fn put(&mut self, c: u16) -> bool {
        match c {
            // BS / DEL: step back and blank the vacated cell
            0x08 | 0x7f => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                self.cells[self.cursor] = SPACE;
                true
            }
            // LF, VT, FF, CR all end the line, lazily
            0x0a..=0x0d => {
                self.pending_newline = true;
                false
            }
            // Tab collapses to a single space, not a tab stop
            0x09 => self.put_printable(SPACE),
            // Remaining C0 controls have no visible effect
            c if c < 0x20 => false,
            c => self.put_printable(c),
        }
    }

    fn put_printable(&mut self, c: u16) -> bool {
        if self.pending_newline {
            self.cells = [EMPTY; WIDTH];
            self.cursor = 0;
            self.pending_newline = false;
        }
        if self.cursor == WIDTH {
            // Slide the window: drop the leftmost cell, cursor stays put
            self.cells.copy_within(1.., 0);
        } else {
            self.cursor += 1;
        }
        self.cells[self.cursor - 1] = c;
        true
    }

    /// Clear the line and park the cursor, leaving the pending-newline flag
    /// as-is. Used when the foreground terminal changes under the display.
    pub fn reset(&mut self) {
        self.cells = [EMPTY; WIDTH];
        self.cursor = 0;
    }
}
