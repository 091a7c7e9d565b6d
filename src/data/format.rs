//! Human-readable number, size and uptime formatting.

/// Abbreviate large counts: 999 -> "999", 1000 -> "1.0K", 1500000 -> "1.5M".
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Signed variant of [`format_count`], always carrying a sign.
pub fn format_signed_count(n: i64) -> String {
    let sign = if n < 0 { '-' } else { '+' };
    format!("{}{}", sign, format_count(n.unsigned_abs()))
}

/// Format a byte count as B, KB, MB or GB.
pub fn format_bytes(n: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if n >= GB {
        format!("{:.1}GB", n as f64 / GB as f64)
    } else if n >= MB {
        format!("{:.0}MB", n as f64 / MB as f64)
    } else if n >= KB {
        format!("{:.0}KB", n as f64 / KB as f64)
    } else {
        format!("{}B", n)
    }
}

/// Format an uptime in milliseconds as "2d 3h", "4h 12m" or "7m".
pub fn format_uptime(ms: u64) -> String {
    let seconds = ms / 1000;
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a messages-per-second rate.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}/s", rate)
}
