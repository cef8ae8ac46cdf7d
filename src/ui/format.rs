//! Display formatting for run fields.

use chrono::{DateTime, Utc};

/// Compact human duration: `45s`, `3m 20s`, `2h 5m`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }

    let minutes = seconds / 60;
    let rem_seconds = seconds % 60;
    if minutes < 60 {
        return if rem_seconds > 0 {
            format!("{minutes}m {rem_seconds}s")
        } else {
            format!("{minutes}m")
        };
    }

    let hours = minutes / 60;
    let rem_minutes = minutes % 60;
    if rem_minutes > 0 {
        format!("{hours}h {rem_minutes}m")
    } else {
        format!("{hours}h")
    }
}

/// Thousands-separated integer: `12,345`.
#[must_use]
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Timestamp as `Oct 3, 2026 14:05` (UTC).
#[must_use]
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y %H:%M").to_string()
}

/// Escape text for inclusion in HTML content or attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
