//! Display State Types
//!
//! What the TUI draws, derived from the [`BootSnapshot`]s the driver
//! publishes plus the static content of the loaded config. The TUI never
//! reaches into the sequence itself; it renders whatever snapshot it was
//! last handed.

use std::time::Duration;

use nexus_core::{BootConfig, BootSnapshot};

/// How long a notice stays on screen
pub const NOTICE_DURATION: Duration = Duration::from_millis(2500);

/// Flavour of a transient notice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// An action went through
    Success,
    /// Informational, e.g. "still booting"
    Info,
}

/// A transient toast shown over the hero panel
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
    /// Time left before the notice disappears
    pub remaining: Duration,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            remaining: NOTICE_DURATION,
        }
    }

    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, body)
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, body)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Everything the hero panel needs to draw one frame
#[derive(Clone, Debug)]
pub struct DisplayState {
    /// Panel title ("NEXUS.TERMINAL")
    pub title: String,
    /// Gradient headline shown once loaded
    pub headline: String,
    /// Lines printed under the progress bar while loading
    pub boot_log: Vec<String>,
    /// Last snapshot received from the driver
    pub snapshot: BootSnapshot,
    /// Active toast, if any
    pub notice: Option<Notice>,
    /// Number of snapshots applied, shown in the status bar
    pub frames_received: u64,
}

impl DisplayState {
    pub fn new(config: &BootConfig) -> Self {
        Self {
            title: config.title.clone(),
            headline: config.headline.clone(),
            boot_log: config.boot_log.clone(),
            snapshot: BootSnapshot::default(),
            notice: None,
            frames_received: 0,
        }
    }

    /// Replace the boot state with a newer snapshot
    ///
    /// Identical snapshots are ignored so redraw bookkeeping stays honest.
    pub fn apply_snapshot(&mut self, snapshot: BootSnapshot) -> bool {
        if snapshot == self.snapshot {
            return false;
        }
        self.snapshot = snapshot;
        self.frames_received += 1;
        true
    }

    /// Show a notice, replacing any current one
    pub fn push_notice(&mut self, notice: Notice) {
        tracing::debug!(title = %notice.title, "Showing notice");
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Advance notice timers
    pub fn update(&mut self, delta: Duration) {
        let expired = match self.notice.as_mut() {
            Some(notice) => {
                notice.remaining = notice.remaining.saturating_sub(delta);
                notice.is_expired()
            }
            None => false,
        };
        if expired {
            self.notice = None;
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_loaded
    }

    /// One-line summary for the status bar
    pub fn status_line(&self) -> String {
        let snapshot = &self.snapshot;
        let mut line = format!(
            "{} | {}% | {}/{} chars",
            snapshot.phase.label(),
            snapshot.loading_progress,
            snapshot.revealed_len,
            snapshot.full_len,
        );
        if snapshot.glitching {
            line.push_str(" | GLITCH");
        }
        line
    }
}
