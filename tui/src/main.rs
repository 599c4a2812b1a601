//! Nexus TUI Entry Point
//!
//! Boots the NEXUS.TERMINAL hero in the terminal.
//!
//! Usage:
//!   nexus-tui [OPTIONS]
//!
//! Options:
//!   --config <FILE>         Config file (default: $XDG_CONFIG_HOME/nexus-terminal/terminal.toml)
//!   --seed <N>              Fixed RNG seed, for reproducible boots
//!   --status-line <TEXT>    Text the typewriter reveals
//!   --no-glitch             Disable glitches
//!   --typing-tick-ms <MS>   Delay between revealed characters
//!   --mute                  Don't ring the bell on actions
//!
//! Logs go to stderr; set `RUST_LOG=debug` and redirect `2>` to capture them.

use std::io;
use std::panic;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nexus_core::{load_config_from_path, BootConfig, ConfigOverrides};
use nexus_tui::actions::{Silent, SoundSink, TerminalBell};
use nexus_tui::App;

/// NEXUS.TERMINAL - cyberpunk hero terminal
#[derive(Parser, Debug)]
#[command(name = "nexus-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "NEXUS_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for progress steps and glitches
    #[arg(short = 's', long, env = "NEXUS_SEED")]
    seed: Option<u64>,

    /// Status line revealed by the typewriter
    #[arg(long, value_name = "TEXT")]
    status_line: Option<String>,

    /// Never glitch the status line
    #[arg(long)]
    no_glitch: bool,

    /// Milliseconds between revealed characters
    #[arg(long, value_name = "MS")]
    typing_tick_ms: Option<u64>,

    /// Don't ring the terminal bell on actions
    #[arg(long)]
    mute: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(line) = &self.status_line {
            overrides = overrides.with_status_line(line.clone());
        }
        if self.no_glitch {
            overrides = overrides.with_glitch_chance(0.0);
        }
        if let Some(ms) = self.typing_tick_ms {
            overrides = overrides.with_typing_tick_ms(ms);
        }
        overrides
    }

    fn sound(&self) -> Box<dyn SoundSink> {
        if self.mute {
            Box::new(Silent)
        } else {
            Box::new(TerminalBell)
        }
    }

    fn load_config(&self) -> anyhow::Result<BootConfig> {
        let mut config =
            load_config_from_path(self.config.clone()).context("Failed to load configuration")?;
        self.overrides()
            .apply(&mut config)
            .context("Invalid command line override")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up logging; stderr keeps the alternate screen clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = args.load_config()?;
    tracing::info!(source = %config.source(), seed = ?args.seed, "Configuration loaded");

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: nexus-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or over SSH with -t.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    terminal.hide_cursor()?;

    let mut app = App::new(config, args.seed, args.sound());
    let result = app.run(&mut terminal).await;

    // Unmount before restoring the terminal so no timer outlives the UI
    if let Some(last) = app.shutdown().await {
        tracing::info!(phase = last.phase.label(), "Hero terminal closed");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
