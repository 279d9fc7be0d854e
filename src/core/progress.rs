//! Progress tracking for the streaming write

use std::time::{Duration, Instant};

/// Progress information for an in-flight download.
///
/// `total_size` is `None` when the response carried no `Content-Length`.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Expected size in bytes, when known
    pub total_size: Option<u64>,
    /// Cumulative bytes written so far
    pub downloaded_size: u64,
    /// Completion percentage, when the total is known
    pub percent: Option<f64>,
    /// Current speed in bytes per second
    pub speed: Option<f64>,
    /// Time when the write started
    pub start_time: Instant,
}

impl Progress {
    pub fn new(total_size: Option<u64>) -> Self {
        Self {
            total_size,
            downloaded_size: 0,
            percent: None,
            speed: None,
            start_time: Instant::now(),
        }
    }

    /// Update with a new cumulative byte count.
    pub fn update(&mut self, downloaded_size: u64) {
        self.downloaded_size = downloaded_size;
        self.percent = self
            .total_size
            .filter(|total| *total > 0)
            .map(|total| (downloaded_size as f64 / total as f64) * 100.0);

        let elapsed = self.start_time.elapsed();
        if elapsed.as_millis() > 0 {
            self.speed = Some(downloaded_size as f64 / elapsed.as_secs_f64());
        }
    }

    /// Whether the known total has been reached.
    pub fn is_complete(&self) -> bool {
        matches!(self.total_size, Some(total) if self.downloaded_size >= total && total > 0)
    }

    pub fn speed_string(&self) -> String {
        match self.speed {
            Some(speed) => format!("{}/s", format_bytes(speed as u64)),
            None => "Unknown".to_string(),
        }
    }
}

/// Format bytes as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f64 = bytes as f64;
    let exp = (bytes_f64.ln() / THRESHOLD.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f64 / THRESHOLD.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}

/// Format a duration as a human-readable string.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    if total_seconds < 60 {
        format!("{}s", total_seconds)
    } else if total_seconds < 3600 {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m {}s", minutes, seconds)
        }
    } else {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        if minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, minutes)
        }
    }
}
