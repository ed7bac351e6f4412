use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Resolves stored date strings into calendar days in one timezone.
///
/// Expenses recorded near midnight can land in a different month depending on
/// the viewer's zone, so every date goes through the same handler.
pub struct TimezoneHandler {
    default_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// `"auto"` resolves to the system timezone. Unrecognised names fall back
    /// to UTC and log a warning.
    pub fn new(tz_name: &str) -> Self {
        let name = if tz_name.eq_ignore_ascii_case("auto") {
            get_system_timezone()
        } else {
            tz_name.to_string()
        };
        let tz = name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                name
            );
            Tz::UTC
        });
        Self { default_tz: tz }
    }

    /// Parse an RFC 3339 timestamp, or a naive datetime interpreted in the
    /// handler's timezone, into UTC.
    ///
    /// Returns `None` for empty strings or unrecognised formats.
    pub fn parse_timestamp(&self, s: &str) -> Option<DateTime<Utc>> {
        if s.is_empty() {
            return None;
        }

        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&Utc));
        }

        const FMTS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ];
        for fmt in FMTS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                use chrono::TimeZone as _;
                if let chrono::LocalResult::Single(dt) = self.default_tz.from_local_datetime(&naive)
                {
                    return Some(dt.with_timezone(&Utc));
                }
            }
        }

        None
    }

    /// Resolve a stored date string to the calendar day it falls on.
    ///
    /// * `"2023-10-05"` is taken as written.
    /// * Timestamps are converted to the handler's timezone first.
    pub fn resolve_date(&self, s: &str) -> Option<NaiveDate> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Some(date);
        }

        match self.parse_timestamp(trimmed) {
            Some(utc) => Some(utc.with_timezone(&self.default_tz).date_naive()),
            None => {
                warn!("TimezoneHandler: could not parse date \"{}\"", s);
                None
            }
        }
    }

    /// Today's date in the handler's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.default_tz).date_naive()
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// The zone dates are resolved in, after any fallback.
    pub fn timezone(&self) -> Tz {
        self.default_tz
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
