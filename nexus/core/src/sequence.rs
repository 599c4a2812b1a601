//! Terminal Boot Sequence
//!
//! The hero terminal's staged presentation:
//!
//! ```text
//! LOADING ──(progress = 100)──▶ SETTLING ──(settle delay)──▶ TYPING ──(all revealed)──▶ STEADY
//!   progress tick                 settle timeout               typing tick
//!                                                              cursor blink ─────────────────▶
//!                                                              glitch roll ──────────────────▶
//! ```
//!
//! All timers live in one [`TimerSet`] owned by the sequence. Nothing runs on
//! its own: the owner calls [`BootSequence::advance`] with elapsed time and the
//! sequence fires whatever came due, in deadline order. [`BootSequence::teardown`]
//! cancels every timer at once, after which `advance` is inert.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::BootConfig;
use crate::events::{BootEvent, BootPhase, BootSnapshot};
use crate::glitch::{corrupt, GlitchEvent};
use crate::timers::{Fired, TimerId, TimerKind, TimerSet, MIN_PERIOD};

/// Timers fired in one `advance` before missed interval ticks are skipped
const MAX_CATCH_UP_FIRES: usize = 10_000;

/// Loading bar state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BootState {
    /// 0..=100
    pub loading_progress: u8,
    /// Flips to true once, after progress hits 100 and the settle delay passes
    pub is_loaded: bool,
}

/// Typewriter state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypingState {
    full_text: String,
    full_len: usize,
    revealed_len: usize,
}

impl TypingState {
    fn new(full_text: String) -> Self {
        let full_len = full_text.chars().count();
        Self {
            full_text,
            full_len,
            revealed_len: 0,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Length of the status line in characters
    pub fn full_len(&self) -> usize {
        self.full_len
    }

    /// Characters revealed so far
    pub fn revealed_len(&self) -> usize {
        self.revealed_len
    }

    pub fn is_complete(&self) -> bool {
        self.revealed_len == self.full_len
    }

    /// The true revealed prefix of the status line
    pub fn revealed_text(&self) -> &str {
        char_prefix(&self.full_text, self.revealed_len)
    }
}

/// Blinking cursor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorState {
    pub visible: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// The staged boot / typewriter / glitch state machine
#[derive(Debug)]
pub struct BootSequence<R = StdRng> {
    config: BootConfig,
    rng: R,
    timers: TimerSet,
    phase: BootPhase,
    boot: BootState,
    typing: TypingState,
    cursor: CursorState,
    glitch: Option<GlitchEvent>,
    progress_timer: Option<TimerId>,
    typing_timer: Option<TimerId>,
    revert_timer: Option<TimerId>,
    torn_down: bool,
}

impl BootSequence<StdRng> {
    /// Mount with an entropy-seeded RNG
    pub fn with_entropy(config: BootConfig) -> Self {
        Self::mount(config, StdRng::from_entropy())
    }

    /// Mount with a fixed seed (reproducible glitches and progress)
    pub fn seeded(config: BootConfig, seed: u64) -> Self {
        Self::mount(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BootSequence<R> {
    /// Create fresh state and arm the progress timer
    ///
    /// Out-of-range config values are pulled back into range rather than
    /// rejected; the sequence itself has no failure mode.
    pub fn mount(config: BootConfig, rng: R) -> Self {
        let config = normalize(config);
        let mut timers = TimerSet::new();
        let progress_timer =
            Some(timers.schedule_interval(TimerKind::Progress, config.timings.progress_tick));

        tracing::debug!(
            status_len = config.status_line.chars().count(),
            "Boot sequence mounted"
        );

        Self {
            typing: TypingState::new(config.status_line.clone()),
            config,
            rng,
            timers,
            phase: BootPhase::Loading,
            boot: BootState::default(),
            cursor: CursorState::default(),
            glitch: None,
            progress_timer,
            typing_timer: None,
            revert_timer: None,
            torn_down: false,
        }
    }

    /// Move virtual time forward and fire every timer that came due
    ///
    /// Returns the state changes applied, in the order they happened.
    /// After [`teardown`](Self::teardown) this always returns an empty list.
    ///
    /// Very long jumps fire at most [`MAX_CATCH_UP_FIRES`] timers in a row;
    /// interval ticks beyond that are skipped, timeouts still fire. The clock
    /// saturates at `Duration::MAX`.
    pub fn advance(&mut self, delta: Duration) -> Vec<BootEvent> {
        let mut events = Vec::new();
        if self.torn_down {
            return events;
        }

        let target = self.timers.now().saturating_add(delta);
        let mut fired_count = 0usize;
        while let Some(fired) = self.timers.pop_due(target) {
            self.fire(fired, &mut events);
            fired_count += 1;
            if fired_count % MAX_CATCH_UP_FIRES == 0 {
                let skipped = self.timers.skip_missed(target);
                tracing::debug!(skipped, "Catch-up limit reached, skipping missed ticks");
            }
        }
        self.timers.set_now(target);

        events
    }

    /// Time until the next timer fires, `None` once torn down
    pub fn time_to_next_timer(&self) -> Option<Duration> {
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.timers.now()))
    }

    /// Cancel every pending timer; the sequence never changes again
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.timers.cancel_all();
        self.progress_timer = None;
        self.typing_timer = None;
        self.revert_timer = None;
        self.torn_down = true;

        tracing::debug!(
            phase = self.phase.label(),
            elapsed_ms = self.timers.now().as_millis() as u64,
            "Boot sequence torn down"
        );
    }

    fn fire(&mut self, fired: Fired, events: &mut Vec<BootEvent>) {
        match fired.kind {
            TimerKind::Progress => self.on_progress_tick(events),
            TimerKind::Settle => self.on_settled(events),
            TimerKind::Typing => self.on_typing_tick(events),
            TimerKind::Cursor => {
                self.cursor.visible = !self.cursor.visible;
                events.push(BootEvent::CursorToggled {
                    visible: self.cursor.visible,
                });
            }
            TimerKind::Glitch => self.on_glitch_tick(events),
            TimerKind::GlitchRevert => {
                self.revert_timer = None;
                if self.glitch.take().is_some() {
                    events.push(BootEvent::GlitchReverted);
                }
            }
        }
    }

    fn on_progress_tick(&mut self, events: &mut Vec<BootEvent>) {
        let from = self.boot.loading_progress;
        let step = self
            .rng
            .gen_range(self.config.step_min..=self.config.step_max);
        let to = from.saturating_add(step).min(100);

        self.boot.loading_progress = to;
        events.push(BootEvent::ProgressAdvanced { from, to });

        if to >= 100 {
            if let Some(id) = self.progress_timer.take() {
                self.timers.cancel(id);
            }
            self.phase = BootPhase::Settling;
            self.timers
                .schedule_timeout(TimerKind::Settle, self.config.timings.settle_delay);
            tracing::debug!("Loading complete, settling");
        }
    }

    fn on_settled(&mut self, events: &mut Vec<BootEvent>) {
        self.boot.is_loaded = true;
        self.phase = BootPhase::Typing;
        events.push(BootEvent::Loaded);

        let timings = &self.config.timings;
        self.timers
            .schedule_interval(TimerKind::Cursor, timings.cursor_blink);
        self.timers
            .schedule_interval(TimerKind::Glitch, timings.glitch_tick);

        if self.typing.is_complete() {
            self.phase = BootPhase::Steady;
            events.push(BootEvent::TypingComplete);
        } else {
            self.typing_timer = Some(
                self.timers
                    .schedule_interval(TimerKind::Typing, timings.typing_tick),
            );
        }

        tracing::debug!(chars = self.typing.full_len, "Terminal loaded, typing");
    }

    fn on_typing_tick(&mut self, events: &mut Vec<BootEvent>) {
        if self.typing.revealed_len < self.typing.full_len {
            self.typing.revealed_len += 1;
            events.push(BootEvent::CharacterRevealed {
                revealed: self.typing.revealed_len,
            });
        }

        if self.typing.is_complete() {
            if let Some(id) = self.typing_timer.take() {
                self.timers.cancel(id);
            }
            self.phase = BootPhase::Steady;
            events.push(BootEvent::TypingComplete);
        }
    }

    fn on_glitch_tick(&mut self, events: &mut Vec<BootEvent>) {
        let chance = self.config.glitch_chance;
        if chance <= 0.0 || !self.rng.gen_bool(chance) {
            return;
        }

        let revealed = self.typing.revealed_text();
        if revealed.is_empty() {
            return;
        }
        let corrupted = corrupt(revealed, self.config.glitch_char_chance, &mut self.rng);

        if let Some(id) = self.revert_timer.take() {
            self.timers.cancel(id);
        }
        self.glitch = Some(GlitchEvent {
            corrupted: corrupted.clone(),
            covers: self.typing.revealed_len,
        });
        self.revert_timer = Some(
            self.timers
                .schedule_timeout(TimerKind::GlitchRevert, self.config.timings.glitch_revert),
        );

        tracing::trace!(covers = self.typing.revealed_len, "Glitch shown");
        events.push(BootEvent::GlitchShown { corrupted });
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    pub fn boot_state(&self) -> BootState {
        self.boot
    }

    pub fn typing_state(&self) -> &TypingState {
        &self.typing
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    pub fn is_glitching(&self) -> bool {
        self.glitch.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Virtual time since mount
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Text as it should appear on screen right now
    ///
    /// While a glitch is active its corrupted copy stands in for the prefix
    /// it was made from; characters revealed since then follow it unchanged.
    pub fn displayed_text(&self) -> String {
        let revealed = self.typing.revealed_text();
        match &self.glitch {
            Some(glitch) => {
                let tail: String = revealed.chars().skip(glitch.covers).collect();
                format!("{}{}", glitch.corrupted, tail)
            }
            None => revealed.to_string(),
        }
    }

    pub fn snapshot(&self) -> BootSnapshot {
        BootSnapshot {
            phase: self.phase,
            loading_progress: self.boot.loading_progress,
            is_loaded: self.boot.is_loaded,
            revealed_len: self.typing.revealed_len,
            full_len: self.typing.full_len,
            displayed_text: self.displayed_text(),
            cursor_visible: self.cursor.visible,
            glitching: self.glitch.is_some(),
            elapsed: self.timers.now(),
            torn_down: self.torn_down,
        }
    }
}

/// Byte slice of the first `n` characters
fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn normalize(mut config: BootConfig) -> BootConfig {
    if let Err(e) = config.validate() {
        tracing::warn!(error = %e, "Boot config out of range, clamping");
    }

    config.step_min = config.step_min.clamp(1, 100);
    config.step_max = config.step_max.clamp(config.step_min, 100);
    config.glitch_chance = clamp_probability(config.glitch_chance);
    config.glitch_char_chance = clamp_probability(config.glitch_char_chance);

    // A revert must land before the next roll or the true text never returns.
    let t = &mut config.timings;
    let glitch_tick = t.glitch_tick.max(MIN_PERIOD);
    if t.glitch_revert >= glitch_tick {
        t.glitch_revert = glitch_tick - MIN_PERIOD;
    }
    config
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}
