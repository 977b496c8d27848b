//! Session binder
//!
//! Owns the whole mirror: the grid and feedback collaborators, and — while
//! a display is registered — the bound device plus its controller state.
//! Exactly one display can be bound at a time; binding a second fails, and
//! unbinding requires the name of the device that is actually bound.
//!
//! Processing is synchronous and reentrancy-free by construction: every
//! event is handled to completion inside the calling thread. On a
//! concurrent runtime, callers must serialize entry into the session (a
//! single-owner task or one mutex around the whole value), never lock
//! individual fields.

use crate::config::Config;
use crate::controller::Controller;
use crate::device::{BrailleDevice, DeviceError};
use crate::events::{KeyDisposition, KeyEvent, TerminalEvent};
use crate::feedback::Beeper;
use crate::term::TerminalGrid;

/// Registration failure.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("display device {0:?} is already bound")]
    AlreadyBound(String),

    #[error("device setup failed: {0}")]
    Setup(#[source] DeviceError),

    #[error("{0:?} is not the bound device")]
    NotBound(String),
}

struct Binding {
    device: Box<dyn BrailleDevice>,
    index: usize,
    controller: Controller,
}

/// The mirror session. Events delivered while no device is bound are
/// passed through untouched.
pub struct Session<G, B> {
    grid: G,
    beeper: B,
    config: Config,
    binding: Option<Binding>,
}

impl<G: TerminalGrid, B: Beeper> Session<G, B> {
    pub fn new(grid: G, beeper: B, config: Config) -> Self {
        Self {
            grid,
            beeper,
            config,
            binding: None,
        }
    }

    /// Bind `device` at `index` and attach to the event sources.
    ///
    /// `device_options` falls back to the configured default line options.
    /// `feature_options` is a comma-separated token list; `sound` and
    /// `nosound` override the configured cue toggle for this binding.
    /// On setup failure nothing is bound and no state is created.
    pub fn register(
        &mut self,
        mut device: Box<dyn BrailleDevice>,
        index: usize,
        device_options: Option<&str>,
        feature_options: Option<&str>,
    ) -> Result<(), SessionError> {
        if let Some(bound) = &self.binding {
            return Err(SessionError::AlreadyBound(bound.device.name().to_string()));
        }

        let options = device_options.unwrap_or(&self.config.device_options);
        device.setup(options).map_err(SessionError::Setup)?;

        let sound = match feature_options {
            Some(features) => parse_feature_options(features, self.config.sound),
            None => self.config.sound,
        };

        tracing::info!(device = device.name(), index, "braille display bound");
        self.binding = Some(Binding {
            device,
            index,
            controller: Controller::new(sound),
        });
        Ok(())
    }

    /// Unbind the device named `name`, detaching from the event sources
    /// and tearing down the controller state. The device is handed back to
    /// the caller.
    pub fn unregister(&mut self, name: &str) -> Result<Box<dyn BrailleDevice>, SessionError> {
        match self.binding.take() {
            Some(bound) if bound.device.name() == name => {
                tracing::info!(device = name, "braille display unbound");
                Ok(bound.device)
            }
            other => {
                self.binding = other;
                Err(SessionError::NotBound(name.to_string()))
            }
        }
    }

    /// Whether a display is currently bound.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Name and index of the bound device, if any.
    pub fn bound_device(&self) -> Option<(&str, usize)> {
        self.binding.as_ref().map(|b| (b.device.name(), b.index))
    }

    /// Entry point for the keyboard source.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyDisposition {
        match &mut self.binding {
            Some(bound) => bound.controller.handle_key(
                event,
                &mut self.grid,
                &mut self.beeper,
                bound.device.as_mut(),
            ),
            None => KeyDisposition::PassThrough,
        }
    }

    /// Entry point for the terminal-write source.
    pub fn handle_terminal(&mut self, event: TerminalEvent) {
        if let Some(bound) = &mut self.binding {
            bound
                .controller
                .handle_terminal(event, &mut self.grid, bound.device.as_mut());
        }
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }
}

fn parse_feature_options(options: &str, default_sound: bool) -> bool {
    let mut sound = default_sound;
    for token in options.split(',') {
        match token.trim() {
            "sound" => sound = true,
            "nosound" => sound = false,
            "" => {}
            other => tracing::warn!(option = other, "ignoring unknown feature option"),
        }
    }
    sound
}
