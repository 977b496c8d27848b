//! Event model
//!
//! The two external sources deliver typed events: key activity from the
//! keyboard subsystem and character traffic from the terminal subsystem.
//! Handlers answer key events with a [`KeyDisposition`] so the source
//! knows whether to run its own default action.

use crate::term::TerminalId;

/// Keys the mirror reacts to. Anything else arrives as `Other` and is
/// never consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    /// Any key without a dedicated meaning here, by keycode.
    Other(u16),
}

/// Keyboard lock indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKey {
    Caps,
    Num,
    Scroll,
}

/// One notification from the keyboard source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A key changed state on the keyboard attached to `terminal`.
    Key {
        key: Key,
        pressed: bool,
        terminal: TerminalId,
    },
    /// A lock indicator toggled.
    Lock { key: LockKey, enabled: bool },
}

/// One notification from the terminal-write source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    /// One character was written to `terminal`.
    Write { terminal: TerminalId, ch: u16 },
    /// `terminal` became the foreground surface.
    Foreground { terminal: TerminalId },
    /// A redraw of `terminal` was requested.
    Redraw { terminal: TerminalId },
}

/// Whether a key event was swallowed or should fall through to the
/// source's default key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Consumed,
    PassThrough,
}
