//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize, frame ticks)
//! - BootDriver that runs the boot sequence on its own task
//! - DisplayState for rendering
//!
//! The App never steps the sequence. It waits on the driver's snapshot
//! channel, copies the latest snapshot into its DisplayState, and draws.

use std::future;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use nexus_core::{BootConfig, BootDriver, BootSnapshot};

use crate::actions::{HeroAction, SoundSink};
use crate::display::{DisplayState, Notice};
use crate::hero::HeroTerminal;

/// Redraw cadence; the cursor and typewriter run far slower than this
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Config every mount starts from
    config: BootConfig,
    /// Fixed RNG seed, reused on every reboot
    seed: Option<u64>,

    // === Boot Integration ===
    /// Driver for the mounted sequence (None once shut down)
    driver: Option<BootDriver>,
    /// Bumped on every mount so the event loop re-subscribes
    mounts: u64,
    /// Display state derived from BootSnapshots
    display: DisplayState,

    // === Misc State ===
    /// Where action cues go
    sound: Box<dyn SoundSink>,
    /// Last frame time (for notice expiry)
    last_frame: Instant,
}

impl App {
    /// Create the app and mount a fresh boot sequence
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(config: BootConfig, seed: Option<u64>, sound: Box<dyn SoundSink>) -> Self {
        let display = DisplayState::new(&config);
        let mut app = Self {
            running: true,
            config,
            seed,
            driver: None,
            mounts: 0,
            display,
            sound,
            last_frame: Instant::now(),
        };
        app.mount();
        app
    }

    fn mount(&mut self) {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let driver = BootDriver::mount(self.config.clone(), rng);
        self.display.apply_snapshot(driver.snapshot());
        self.driver = Some(driver);
        self.mounts += 1;
        tracing::debug!(mounts = self.mounts, seed = ?self.seed, "Boot sequence mounted");
    }

    /// Tear down the running sequence and boot a new one
    pub async fn remount(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.unmount().await;
        }
        self.display.clear_notice();
        self.mount();
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        let mut frames = tokio::time::interval(FRAME_DURATION);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut subscribed_to = self.mounts;
        let mut snapshots = self.subscribe();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            let mut driver_closed = false;

            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => {
                        tracing::info!("Terminal event stream closed");
                        self.running = false;
                    }
                },

                changed = snapshot_changed(&mut snapshots) => {
                    driver_closed = changed.is_err();
                }

                _ = frames.tick() => {}
            }

            if driver_closed {
                snapshots = None;
            }
            if subscribed_to != self.mounts {
                subscribed_to = self.mounts;
                snapshots = self.subscribe();
            }

            self.sync_snapshot();
            self.update();
            self.render(terminal)?;
        }

        Ok(())
    }

    fn subscribe(&self) -> Option<watch::Receiver<BootSnapshot>> {
        self.driver.as_ref().map(BootDriver::subscribe)
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Reboot
            KeyCode::Char('r') => {
                tracing::info!("Rebooting hero terminal");
                self.remount().await;
            }

            KeyCode::Char(c) => {
                if let Some(action) = HeroAction::from_key(c) {
                    self.trigger(action);
                }
            }

            _ => {}
        }
    }

    /// Fire a button: sound cue plus notice
    ///
    /// The buttons only exist on the loaded view; earlier presses just say so.
    pub fn trigger(&mut self, action: HeroAction) {
        if !self.display.is_loaded() {
            self.display.push_notice(Notice::info(
                "BOOTING",
                "Neural interface still initializing, stand by",
            ));
            return;
        }

        tracing::info!(?action, "Hero action");
        self.sound.play(action.cue());
        self.display.push_notice(action.notice());
    }

    /// Copy the driver's latest snapshot into the display state
    pub fn sync_snapshot(&mut self) -> bool {
        match &self.driver {
            Some(driver) => self.display.apply_snapshot(driver.snapshot()),
            None => false,
        }
    }

    /// Update notice timers
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.display.update(delta);
    }

    /// Draw one frame
    pub fn render<B: Backend>(&self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            frame.render_widget(HeroTerminal::new(&self.display), frame.area());
        })?;
        Ok(())
    }

    /// Unmount the sequence; returns its final snapshot
    pub async fn shutdown(&mut self) -> Option<BootSnapshot> {
        self.running = false;
        let driver = self.driver.take()?;
        let last = driver.unmount().await;
        self.display.apply_snapshot(last.clone());
        Some(last)
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mounts(&self) -> u64 {
        self.mounts
    }
}

/// Resolves when the driver publishes; never resolves once it is gone
async fn snapshot_changed(
    rx: &mut Option<watch::Receiver<BootSnapshot>>,
) -> Result<(), watch::error::RecvError> {
    match rx {
        Some(rx) => rx.changed().await,
        None => future::pending().await,
    }
}
