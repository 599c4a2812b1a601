//! Hero Actions
//!
//! The two buttons under the status line. Each plays a sound cue and shows a
//! notice. Sound is fire-and-forget: a cue that cannot be played is logged
//! and otherwise ignored.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::display::Notice;

/// A button on the loaded view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroAction {
    /// `v` - ACCESS DATA VAULT
    AccessDataVault,
    /// `c` - ESTABLISH CONNECTION
    EstablishConnection,
}

impl HeroAction {
    pub const ALL: [HeroAction; 2] = [HeroAction::AccessDataVault, HeroAction::EstablishConnection];

    pub fn from_key(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'v' => Some(Self::AccessDataVault),
            'c' => Some(Self::EstablishConnection),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Self::AccessDataVault => 'v',
            Self::EstablishConnection => 'c',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AccessDataVault => "⚡ ACCESS DATA VAULT",
            Self::EstablishConnection => "ESTABLISH CONNECTION",
        }
    }

    pub fn cue(self) -> SoundCue {
        match self {
            Self::AccessDataVault => SoundCue::AccessVault,
            Self::EstablishConnection => SoundCue::Teleport,
        }
    }

    /// Notice shown after the action fires
    pub fn notice(self) -> Notice {
        match self {
            Self::AccessDataVault => Notice::success("ACCESS GRANTED", "Routing to /biodata"),
            Self::EstablishConnection => {
                Notice::success("UPLINK OPEN", "Contact channel standing by at #contact")
            }
        }
    }
}

/// Sound played when an action fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    AccessVault,
    Teleport,
}

/// Something that can play a cue
///
/// Implementations must not block and must not fail loudly.
pub trait SoundSink: Send {
    fn play(&mut self, cue: SoundCue);
}

/// Rings the terminal bell
#[derive(Debug, Default)]
pub struct TerminalBell;

impl SoundSink for TerminalBell {
    fn play(&mut self, cue: SoundCue) {
        let mut stdout = io::stdout();
        let result = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
        if let Err(e) = result {
            tracing::debug!(?cue, error = %e, "Sound cue dropped");
        }
    }
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, cue: SoundCue) {
        tracing::trace!(?cue, "Sound cue muted");
    }
}

/// Remembers every cue, for tests and headless runs
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    played: Arc<Mutex<Vec<SoundCue>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<SoundCue> {
        match self.played.lock() {
            Ok(played) => played.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SoundSink for RecordingSink {
    fn play(&mut self, cue: SoundCue) {
        match self.played.lock() {
            Ok(mut played) => played.push(cue),
            Err(poisoned) => poisoned.into_inner().push(cue),
        }
    }
}
