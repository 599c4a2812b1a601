//! Theme and Colors
//!
//! NEXUS.TERMINAL's neon palette: cyan chrome, pink accents, a yellow
//! warning light, and greys for body text on a black panel.

use ratatui::style::Color;

// ============================================================================
// Neon Palette
// ============================================================================

/// Primary chrome - terminal icon, [SYSTEM] tag, cursor block
pub const NEON_CYAN: Color = Color::Rgb(34, 211, 238);

/// Accent - gradient end, connect button
pub const NEON_PINK: Color = Color::Rgb(236, 72, 153);

/// Close light, first in the header
pub const NEON_PINK_DEEP: Color = Color::Rgb(219, 39, 119);

/// Warning light
pub const NEON_YELLOW: Color = Color::Rgb(250, 204, 21);

/// Panel border
pub const BORDER_CYAN: Color = Color::Rgb(21, 94, 117);

// ============================================================================
// Text Colors
// ============================================================================

/// Typed status line
pub const TEXT_LIGHT: Color = Color::Rgb(209, 213, 219);

/// Secondary copy ("Initializing neural interface...")
pub const TEXT_GRAY: Color = Color::Rgb(156, 163, 175);

/// Boot log lines
pub const LOG_GRAY: Color = Color::Rgb(107, 114, 128);

/// Empty part of the progress track
pub const TRACK_GRAY: Color = Color::Rgb(31, 41, 55);

// ============================================================================
// Notices
// ============================================================================

pub const NOTICE_SUCCESS: Color = Color::Rgb(74, 222, 128);

/// Linear blend between two RGB colors, `t` in `[0, 1]`
///
/// Non-RGB colors can't be blended; the nearer endpoint is returned.
pub fn gradient(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ => {
            if t < 0.5 {
                from
            } else {
                to
            }
        }
    }
}
