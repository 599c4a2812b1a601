//! Nexus TUI - Terminal surface for the NEXUS.TERMINAL hero
//!
//! A full-screen ratatui front end for the boot sequence in `nexus-core`.
//! The TUI is a thin client: a [`nexus_core::BootDriver`] runs the sequence,
//! and this crate turns its snapshots into frames.
//!
//! # Architecture
//!
//! - **App**: event loop, driver lifecycle, key handling
//! - **Display**: snapshot-derived state plus transient notices
//! - **Hero**: the panel widget (loading view / loaded view / status bar)
//! - **Actions**: the two buttons and their fire-and-forget sound cues
//! - **Widgets**: progress bar and notice toast

pub mod actions;
pub mod app;
pub mod display;
pub mod hero;
pub mod theme;
pub mod widgets;

pub use app::App;
