use crate::constants::retention::ATTACK_REPORTING_DAYS;
use crate::errors::ToolError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Source of "now" for time-window checks. Injected so tests can pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A validated window satisfying `now - 14d <= start <= end <= now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn start_iso(&self) -> String {
        to_iso(self.start)
    }

    pub fn end_iso(&self) -> String {
        to_iso(self.end)
    }

    /// Whole seconds since the epoch, rounded down.
    pub fn start_epoch_seconds(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_epoch_seconds(&self) -> i64 {
        self.end.timestamp()
    }
}

pub fn to_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339 timestamps, offset-less date-times (read as UTC) and bare
/// dates (midnight UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Validates a caller window against the attack-reporting retention policy.
///
/// A future `end` and a `start` older than the retention window are pulled
/// back to the nearest boundary. A future `start`, an `end` older than the
/// retention window, or an inverted range are rejected.
pub fn clamp_time_range(
    start_time: &str,
    end_time: &str,
    now: DateTime<Utc>,
) -> Result<TimeRange, ToolError> {
    let two_weeks_ago = now - Duration::days(ATTACK_REPORTING_DAYS);
    let valid_range = format!("{} to {}", to_iso(two_weeks_ago), to_iso(now));

    let mut start = parse_instant(start_time).ok_or_else(|| {
        ToolError::invalid_input(format!(
            "Invalid startTime. Please provide a valid ISO string between {} and {}.",
            to_iso(two_weeks_ago),
            to_iso(now)
        ))
    })?;
    let original_end = parse_instant(end_time).ok_or_else(|| {
        ToolError::invalid_input(format!(
            "Invalid endTime. Please provide a valid ISO string between {} and {}.",
            to_iso(two_weeks_ago),
            to_iso(now)
        ))
    })?;

    if start > now {
        return Err(ToolError::invalid_input(format!(
            "startTime cannot be in the future. Valid range: {}.",
            valid_range
        )));
    }
    let end = if original_end > now { now } else { original_end };

    if start < two_weeks_ago {
        start = two_weeks_ago;
    }
    if original_end < two_weeks_ago {
        return Err(ToolError::invalid_input(format!(
            "endTime cannot be older than 2 weeks ago. Valid range: {}.",
            valid_range
        )));
    }

    if start > end {
        return Err(ToolError::invalid_input(format!(
            "startTime cannot be after endTime. Valid range: {}.",
            valid_range
        )));
    }

    Ok(TimeRange { start, end })
}
