//! TOML Configuration File Support
//!
//! Boot sequence tuning lives in `~/.config/nexus-terminal/terminal.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [timing]
//! progress_tick_ms = 100
//! settle_delay_ms = 500
//! typing_tick_ms = 50
//! cursor_blink_ms = 530
//! glitch_tick_ms = 2000
//! glitch_revert_ms = 100
//!
//! [progress]
//! step_min = 1
//! step_max = 5
//!
//! [glitch]
//! chance = 0.3
//! char_chance = 0.1
//!
//! [content]
//! title = "NEXUS.TERMINAL"
//! headline = "GHOST_PROTOCOL"
//! status_line = "ELITE DIGITAL OPERATIVE"
//! boot_log = ["> Establishing secure connection..."]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status line typed out once the terminal has booted
pub const DEFAULT_STATUS_LINE: &str =
    "ELITE DIGITAL OPERATIVE // NEURAL NETWORK ARCHITECT // QUANTUM ENCRYPTION SPECIALIST";

/// Window title shown in the terminal header
pub const DEFAULT_TITLE: &str = "NEXUS.TERMINAL";

/// Large headline shown above the status line
pub const DEFAULT_HEADLINE: &str = "GHOST_PROTOCOL";

/// Fake log lines shown under the progress bar while loading
pub const DEFAULT_BOOT_LOG: &[&str] = &[
    "> Establishing secure connection...",
    "> Bypassing neural firewalls...",
    "> Scanning for surveillance...",
    "> Initializing quantum encryption...",
    "> Loading personality matrix...",
];

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tracks where the highest-priority value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    Cli,
    Env,
    File,
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Timer periods and delays
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootTimings {
    pub progress_tick: Duration,
    pub settle_delay: Duration,
    pub typing_tick: Duration,
    pub cursor_blink: Duration,
    pub glitch_tick: Duration,
    pub glitch_revert: Duration,
}

impl Default for BootTimings {
    fn default() -> Self {
        Self {
            progress_tick: Duration::from_millis(100),
            settle_delay: Duration::from_millis(500),
            typing_tick: Duration::from_millis(50),
            cursor_blink: Duration::from_millis(530),
            glitch_tick: Duration::from_millis(2000),
            glitch_revert: Duration::from_millis(100),
        }
    }
}

/// Full boot sequence configuration
#[derive(Clone, Debug, PartialEq)]
pub struct BootConfig {
    pub timings: BootTimings,
    /// Smallest progress increment per tick
    pub step_min: u8,
    /// Largest progress increment per tick
    pub step_max: u8,
    /// Chance that a glitch tick actually glitches
    pub glitch_chance: f64,
    /// Per-character corruption chance during a glitch
    pub glitch_char_chance: f64,
    pub title: String,
    pub headline: String,
    pub status_line: String,
    pub boot_log: Vec<String>,
    /// Path of the config file that was loaded, if any
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            timings: BootTimings::default(),
            step_min: 1,
            step_max: 5,
            glitch_chance: 0.3,
            glitch_char_chance: 0.1,
            title: DEFAULT_TITLE.to_string(),
            headline: DEFAULT_HEADLINE.to_string(),
            status_line: DEFAULT_STATUS_LINE.to_string(),
            boot_log: DEFAULT_BOOT_LOG.iter().map(|s| s.to_string()).collect(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl BootConfig {
    /// Defaults with a different status line
    pub fn with_status_line(status_line: impl Into<String>) -> Self {
        Self {
            status_line: status_line.into(),
            ..Self::default()
        }
    }

    /// Where the highest-priority value came from
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Fixed progress step (tests use this for a deterministic tick count)
    #[must_use]
    pub fn fixed_step(mut self, step: u8) -> Self {
        self.step_min = step;
        self.step_max = step;
        self
    }

    /// Turn off the glitch effect entirely
    #[must_use]
    pub fn without_glitches(mut self) -> Self {
        self.glitch_chance = 0.0;
        self
    }

    /// Reject values the boot sequence cannot run with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timings;
        for (name, period) in [
            ("progress_tick_ms", t.progress_tick),
            ("typing_tick_ms", t.typing_tick),
            ("cursor_blink_ms", t.cursor_blink),
            ("glitch_tick_ms", t.glitch_tick),
        ] {
            if period.is_zero() {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be greater than zero"
                )));
            }
        }

        if t.glitch_revert >= t.glitch_tick {
            return Err(ConfigError::ValidationError(format!(
                "glitch_revert_ms ({}) must be shorter than glitch_tick_ms ({})",
                t.glitch_revert.as_millis(),
                t.glitch_tick.as_millis()
            )));
        }

        if self.step_min == 0 {
            return Err(ConfigError::ValidationError(
                "progress step_min must be at least 1".to_string(),
            ));
        }
        if self.step_min > self.step_max {
            return Err(ConfigError::ValidationError(format!(
                "progress step_min ({}) exceeds step_max ({})",
                self.step_min, self.step_max
            )));
        }
        if self.step_max > 100 {
            return Err(ConfigError::ValidationError(format!(
                "progress step_max ({}) exceeds 100",
                self.step_max
            )));
        }

        for (name, p) in [
            ("glitch chance", self.glitch_chance),
            ("glitch char_chance", self.glitch_char_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be within 0.0..=1.0, got {p}"
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    pub progress_tick_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,
    pub typing_tick_ms: Option<u64>,
    pub cursor_blink_ms: Option<u64>,
    pub glitch_tick_ms: Option<u64>,
    pub glitch_revert_ms: Option<u64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressToml {
    pub step_min: Option<u8>,
    pub step_max: Option<u8>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchToml {
    pub chance: Option<f64>,
    pub char_chance: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentToml {
    pub title: Option<String>,
    pub headline: Option<String>,
    pub status_line: Option<String>,
    pub boot_log: Option<Vec<String>>,
}

/// Root of `terminal.toml`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalToml {
    pub timing: TimingToml,
    pub progress: ProgressToml,
    pub glitch: GlitchToml,
    pub content: ContentToml,
}

// =============================================================================
// Loading
// =============================================================================

/// `$XDG_CONFIG_HOME/nexus-terminal/terminal.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("nexus-terminal").join("terminal.toml"))
}

/// Load configuration from the default path, environment and defaults
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// merged result fails validation. A missing file is not an error.
pub fn load_config() -> Result<BootConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the merged
/// configuration is invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<BootConfig, ConfigError> {
    let mut config = BootConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: TerminalToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Parse a TOML document on top of the defaults
///
/// # Errors
///
/// Returns an error if the document does not parse or fails validation.
pub fn parse_config(toml_content: &str) -> Result<BootConfig, ConfigError> {
    let toml_config: TerminalToml = toml::from_str(toml_content)?;
    let mut config = BootConfig::default();
    apply_toml_config(&mut config, &toml_config);
    config.source = ConfigSource::File;
    config.validate()?;
    Ok(config)
}

fn apply_toml_config(config: &mut BootConfig, toml: &TerminalToml) {
    let timing = &toml.timing;
    let t = &mut config.timings;
    if let Some(ms) = timing.progress_tick_ms {
        t.progress_tick = Duration::from_millis(ms);
    }
    if let Some(ms) = timing.settle_delay_ms {
        t.settle_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = timing.typing_tick_ms {
        t.typing_tick = Duration::from_millis(ms);
    }
    if let Some(ms) = timing.cursor_blink_ms {
        t.cursor_blink = Duration::from_millis(ms);
    }
    if let Some(ms) = timing.glitch_tick_ms {
        t.glitch_tick = Duration::from_millis(ms);
    }
    if let Some(ms) = timing.glitch_revert_ms {
        t.glitch_revert = Duration::from_millis(ms);
    }

    if let Some(step) = toml.progress.step_min {
        config.step_min = step;
    }
    if let Some(step) = toml.progress.step_max {
        config.step_max = step;
    }

    if let Some(chance) = toml.glitch.chance {
        config.glitch_chance = chance;
    }
    if let Some(chance) = toml.glitch.char_chance {
        config.glitch_char_chance = chance;
    }

    let content = &toml.content;
    if let Some(ref title) = content.title {
        config.title = title.clone();
    }
    if let Some(ref headline) = content.headline {
        config.headline = headline.clone();
    }
    if let Some(ref line) = content.status_line {
        config.status_line = line.clone();
    }
    if let Some(ref log) = content.boot_log {
        config.boot_log = log.clone();
    }
}

fn apply_env_config(config: &mut BootConfig) {
    if let Ok(line) = std::env::var("NEXUS_STATUS_LINE") {
        config.status_line = line;
        config.source = ConfigSource::Env;
    }
    if let Ok(headline) = std::env::var("NEXUS_HEADLINE") {
        config.headline = headline;
        config.source = ConfigSource::Env;
    }
    if let Ok(chance) = std::env::var("NEXUS_GLITCH_CHANCE") {
        if let Ok(p) = chance.parse::<f64>() {
            config.glitch_chance = p;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(chance) = std::env::var("NEXUS_GLITCH_CHAR_CHANCE") {
        if let Ok(p) = chance.parse::<f64>() {
            config.glitch_char_chance = p;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(tick) = std::env::var("NEXUS_TYPING_TICK_MS") {
        if let Ok(ms) = tick.parse::<u64>() {
            config.timings.typing_tick = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(tick) = std::env::var("NEXUS_PROGRESS_TICK_MS") {
        if let Ok(ms) = tick.parse::<u64>() {
            config.timings.progress_tick = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values supplied on the command line, applied last
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    status_line: Option<String>,
    glitch_chance: Option<f64>,
    typing_tick_ms: Option<u64>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status_line(mut self, line: String) -> Self {
        self.status_line = Some(line);
        self
    }

    #[must_use]
    pub fn with_glitch_chance(mut self, chance: f64) -> Self {
        self.glitch_chance = Some(chance);
        self
    }

    #[must_use]
    pub fn with_typing_tick_ms(mut self, ms: u64) -> Self {
        self.typing_tick_ms = Some(ms);
        self
    }

    /// Apply the overrides and re-validate
    ///
    /// # Errors
    ///
    /// Returns an error if an override produces an invalid configuration.
    pub fn apply(&self, config: &mut BootConfig) -> Result<(), ConfigError> {
        let mut applied = false;
        if let Some(ref line) = self.status_line {
            config.status_line = line.clone();
            applied = true;
        }
        if let Some(chance) = self.glitch_chance {
            config.glitch_chance = chance;
            applied = true;
        }
        if let Some(ms) = self.typing_tick_ms {
            config.timings.typing_tick = Duration::from_millis(ms);
            applied = true;
        }
        if applied {
            config.source = ConfigSource::Cli;
        }
        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
