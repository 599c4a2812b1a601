//! Boot Events
//!
//! Every state mutation the boot sequence performs is reported as a
//! `BootEvent`. Surfaces use them to decide when to redraw; tests use them
//! to observe exactly which setters ran.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Presentation phase of the hero terminal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BootPhase {
    /// Progress bar filling up
    #[default]
    Loading,
    /// Progress hit 100%, waiting out the settle delay
    Settling,
    /// Typewriter revealing the status line
    Typing,
    /// Status line fully revealed; only cursor and glitches change
    Steady,
}

impl BootPhase {
    /// Whether the loaded view (headline + status line) is shown
    pub fn is_loaded(self) -> bool {
        matches!(self, Self::Typing | Self::Steady)
    }

    /// Short label for status bars and logs
    pub fn label(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Settling => "settling",
            Self::Typing => "typing",
            Self::Steady => "steady",
        }
    }
}

/// A single state change applied by [`crate::BootSequence::advance`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootEvent {
    /// Loading progress moved from `from` to `to`
    ProgressAdvanced { from: u8, to: u8 },
    /// Settle delay elapsed; the loaded view is now shown
    Loaded,
    /// One more character of the status line is revealed
    CharacterRevealed { revealed: usize },
    /// The whole status line is revealed
    TypingComplete,
    /// Cursor visibility flipped
    CursorToggled { visible: bool },
    /// A corrupted copy replaced the revealed text
    GlitchShown { corrupted: String },
    /// The true revealed text is back
    GlitchReverted,
}

/// Everything a surface needs to draw one frame
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootSnapshot {
    pub phase: BootPhase,
    pub loading_progress: u8,
    pub is_loaded: bool,
    pub revealed_len: usize,
    pub full_len: usize,
    /// Revealed text, with any active glitch applied
    pub displayed_text: String,
    pub cursor_visible: bool,
    pub glitching: bool,
    /// Virtual time since mount
    pub elapsed: Duration,
    pub torn_down: bool,
}

impl BootSnapshot {
    /// Whether the cursor block should be drawn this frame
    pub fn show_cursor(&self) -> bool {
        self.phase.is_loaded() && self.cursor_visible
    }
}
