//! Plain-text formatting of snapshots for the host binary.
//!
//! Pure functions only: no terminal colors, no layout beyond fixed-width
//! columns. Coloring belongs to whoever prints the result.

use chrono::{DateTime, Utc};

use crate::storage::model::Snapshot;

/// Widest the name column is allowed to grow.
const MAX_NAME_WIDTH: usize = 32;

/// One-line summary of how many entities keep the display on.
///
/// `"No display requests"`, `"1 display request"`, `"3 display requests"`
pub fn summary_line(count: usize) -> String {
    match count {
        0 => "No display requests".to_string(),
        1 => "1 display request".to_string(),
        n => format!("{} display requests", n),
    }
}

/// Format a unix timestamp as `"2026-02-07 17:00:00 UTC"`, or `"-"` if it
/// is out of range.
pub fn format_timestamp(epoch_secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "-".to_string(),
    }
}

/// Format milliseconds: `"1.5s"` for `>= 1000`, `"12ms"` for `>= 1`,
/// `"0.4ms"` below.
pub fn format_ms(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.1}s", ms / 1000.0)
    } else if ms >= 1.0 {
        format!("{:.0}ms", ms)
    } else {
        format!("{:.1}ms", ms)
    }
}

/// Truncate to `max_chars` characters with a unicode ellipsis (`…`).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Renders a snapshot as a summary line followed by one row per entity:
///
/// ```text
/// 2 display requests (2026-02-07 17:00:00 UTC)
///   vlc     Video Wake Lock
///   chrome  Playing video
/// ```
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = format!(
        "{} ({})\n",
        summary_line(snapshot.count()),
        format_timestamp(snapshot.timestamp)
    );

    let width = snapshot
        .entities
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);

    for entity in &snapshot.entities {
        let name = truncate(&entity.name, MAX_NAME_WIDTH);
        out.push_str(&format!("  {:<width$}  {}\n", name, entity.reason));
    }
    out
}
