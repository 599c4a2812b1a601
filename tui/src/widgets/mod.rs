//! Widgets
//!
//! Small ratatui widgets the hero panel is assembled from.

pub mod notice;
pub mod progress_bar;

pub use notice::NoticeToast;
pub use progress_bar::ProgressBar;
