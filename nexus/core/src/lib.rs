//! Nexus Core - Headless boot sequence for the NEXUS.TERMINAL hero
//!
//! The hero terminal boots in four phases: a progress bar fills, a short
//! settle delay passes, a typewriter reveals the status line, and then the
//! text sits still apart from a blinking cursor and the odd glitch.
//!
//! This crate owns that choreography without drawing anything. Surfaces
//! (the TUI, tests) either step a [`BootSequence`] themselves or mount a
//! [`BootDriver`] and render the [`BootSnapshot`]s it publishes.
//!
//! # Modules
//!
//! - [`sequence`]: the state machine
//! - [`timers`]: owned set of cancellable timers on a virtual clock
//! - [`glitch`]: pure text corruption
//! - [`driver`]: tokio task that runs a sequence in real time
//! - [`config`]: TOML / environment / CLI configuration

pub mod config;
pub mod driver;
pub mod events;
pub mod glitch;
pub mod sequence;
pub mod timers;

pub use config::{load_config, load_config_from_path, BootConfig, ConfigError, ConfigOverrides};
pub use driver::BootDriver;
pub use events::{BootEvent, BootPhase, BootSnapshot};
pub use glitch::{corrupt, GlitchEvent};
pub use sequence::{BootSequence, BootState, CursorState, TypingState};
pub use timers::{TimerId, TimerKind, TimerSet};
