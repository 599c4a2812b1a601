//! Integration Tests for the TUI + BootDriver
//!
//! These tests run the real `App` against a mounted `BootDriver` on a paused
//! tokio clock and draw into a ratatui `TestBackend`.
//!
//! # Test Coverage
//!
//! 1. **Rendering**: loading view, loaded view, notices
//! 2. **Actions**: sound cues and notices, ignored while booting
//! 3. **Lifecycle**: quit keys, reboot, shutdown

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use nexus_core::{BootConfig, BootPhase};
use nexus_tui::actions::{RecordingSink, SoundCue};
use nexus_tui::App;

// ============================================================================
// Helpers
// ============================================================================

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// HELLO, +10% per tick, no glitches: loaded at 1500ms, fully typed at 1750ms
fn hello() -> BootConfig {
    BootConfig::with_status_line("HELLO")
        .fixed_step(10)
        .without_glitches()
}

fn app_with_sink() -> (App, RecordingSink) {
    let sink = RecordingSink::new();
    let app = App::new(hello(), Some(7), Box::new(sink.clone()));
    (app, sink)
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

async fn wait(app: &mut App, duration: Duration) {
    tokio::time::sleep(duration).await;
    app.sync_snapshot();
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    app.render(&mut terminal).unwrap();

    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_loading_view_shows_progress_and_boot_log() {
    let (mut app, _) = app_with_sink();
    wait(&mut app, ms(550)).await;

    let text = screen(&app);
    assert!(text.contains("NEXUS.TERMINAL"));
    assert!(text.contains("[SYSTEM] Initializing neural interface..."));
    assert!(text.contains("50%"));
    assert!(text.contains("> Establishing secure connection..."));
    assert!(text.contains("> Loading personality matrix..."));
    assert!(!text.contains("GHOST_PROTOCOL"));

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_settling_still_shows_loading_view() {
    let (mut app, _) = app_with_sink();
    wait(&mut app, ms(1200)).await;

    assert_eq!(app.display().snapshot.phase, BootPhase::Settling);
    let text = screen(&app);
    assert!(text.contains("100%"));
    assert!(!text.contains("ACCESS DATA VAULT"));

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_loaded_view_shows_headline_text_and_buttons() {
    let (mut app, _) = app_with_sink();
    wait(&mut app, ms(1900)).await;

    let text = screen(&app);
    assert!(text.contains("GHOST_PROTOCOL"));
    assert!(text.contains("HELLO"));
    assert!(text.contains("ACCESS DATA VAULT (v)"));
    assert!(text.contains("ESTABLISH CONNECTION (c)"));
    assert!(!text.contains("[SYSTEM]"));

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_typing_is_partial_mid_reveal() {
    let (mut app, _) = app_with_sink();
    wait(&mut app, ms(1625)).await;

    assert_eq!(app.display().snapshot.displayed_text, "HE");
    assert!(!screen(&app).contains("HELLO"));

    app.shutdown().await;
}

// ============================================================================
// Actions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_actions_ignored_while_booting() {
    let (mut app, sink) = app_with_sink();
    wait(&mut app, ms(100)).await;

    app.handle_key(key('v')).await;

    assert!(sink.played().is_empty());
    let notice = app.display().notice.as_ref().unwrap();
    assert_eq!(notice.title, "BOOTING");

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_actions_play_cue_and_notify() {
    let (mut app, sink) = app_with_sink();
    wait(&mut app, ms(1900)).await;

    app.handle_key(key('v')).await;
    assert_eq!(app.display().notice.as_ref().unwrap().title, "ACCESS GRANTED");
    assert!(screen(&app).contains("ACCESS GRANTED"));

    app.handle_key(key('c')).await;
    assert_eq!(app.display().notice.as_ref().unwrap().title, "UPLINK OPEN");

    assert_eq!(sink.played(), vec![SoundCue::AccessVault, SoundCue::Teleport]);
    assert!(app.is_running());

    app.shutdown().await;
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_quit_keys() {
    for quit in [
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
        key('q'),
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        let (mut app, sink) = app_with_sink();
        wait(&mut app, ms(1900)).await;

        app.handle_key(quit).await;
        assert!(!app.is_running());
        assert!(sink.played().is_empty());

        app.shutdown().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_reboot_starts_fresh_sequence() {
    let (mut app, _) = app_with_sink();
    wait(&mut app, ms(1900)).await;
    assert!(app.display().is_loaded());

    app.handle_key(key('r')).await;

    assert_eq!(app.mounts(), 2);
    assert_eq!(app.display().snapshot.loading_progress, 0);
    assert!(!app.display().is_loaded());
    assert!(app.display().notice.is_none());

    wait(&mut app, ms(550)).await;
    assert_eq!(app.display().snapshot.loading_progress, 50);

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_freezes_display() {
    let (mut app, _) = app_with_sink();
    wait(&mut app, ms(1625)).await;

    let last = app.shutdown().await.unwrap();
    assert!(last.torn_down);
    assert_eq!(last.displayed_text, "HE");

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!app.sync_snapshot());
    assert_eq!(app.display().snapshot.displayed_text, "HE");
    assert!(app.shutdown().await.is_none());
}
