//! Helper functions and constants for UI rendering
//!
//! Contains utility functions for formatting, truncation, and common UI patterns.

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;

/// Spinner frames for the connecting splash
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner frame for the given tick
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

/// Truncate a string to approximately max_len bytes, adding "..." if truncated.
/// Safely handles UTF-8 by finding the nearest char boundary.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let end = find_char_boundary(s, target);
        format!("{}...", &s[..end])
    }
}

/// Find the nearest valid UTF-8 char boundary at or before the given byte index.
pub fn find_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut end = index;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// First line of a message, for single-row previews.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Timestamp for a message row: `HH:MM` in local time.
pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Timestamp for a channel row: time of day when `at` is today, else the date.
pub fn format_last_activity(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let local = at.with_timezone(&Local);
    if local.date_naive() == now.with_timezone(&Local).date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %d").to_string()
    }
}

/// Rect of the given size centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Keep `selected` visible in a window of `height` rows; returns the first row.
pub fn scroll_offset(selected: usize, len: usize, height: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    let max_offset = len - height;
    selected.saturating_sub(height - 1).min(max_offset)
}
