use bstr::{BStr, BString, ByteSlice, ByteVec};
use chrono::{DateTime, FixedOffset, Local};

use crate::error::UtilError;
use crate::Result;

/// A commit/tag timestamp with timezone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitDate {
    /// Seconds since Unix epoch.
    pub timestamp: i64,
    /// Timezone offset in minutes from UTC (e.g., -300 for EST).
    pub tz_offset: i32,
}

/// Timezone offset stored as the decimal "±HHMM" integer (e.g. -0500 => -500).
fn tz_offset_to_minutes(tz: i32) -> i32 {
    let sign = if tz < 0 { -1 } else { 1 };
    let abs = tz.unsigned_abs() as i32;
    sign * ((abs / 100) * 60 + abs % 100)
}

/// Convert minutes offset back to the decimal "±HHMM" representation.
fn minutes_to_tz_offset(minutes: i32) -> i32 {
    let sign = if minutes < 0 { -1 } else { 1 };
    let abs = minutes.unsigned_abs() as i32;
    sign * ((abs / 60) * 100 + abs % 60)
}

impl GitDate {
    /// Create from a Unix timestamp and timezone offset in minutes.
    pub fn new(timestamp: i64, tz_offset_minutes: i32) -> Self {
        Self {
            timestamp,
            tz_offset: tz_offset_minutes,
        }
    }

    /// The current time in the local timezone.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            timestamp: now.timestamp(),
            tz_offset: now.offset().local_minus_utc() / 60,
        }
    }

    /// Parse a date string: RFC 3339 (`2025-01-15T12:00:00+00:00`) or the
    /// raw format `<unix-seconds> <±HHMM>`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(UtilError::DateParse("empty date string".into()));
        }

        if let Ok(date) = Self::parse_raw(input) {
            return Ok(date);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(Self {
                timestamp: dt.timestamp(),
                tz_offset: dt.offset().local_minus_utc() / 60,
            });
        }

        Err(UtilError::DateParse(format!(
            "unable to parse date: '{}'",
            input
        )))
    }

    /// Parse the raw format: `<unix-seconds> <±HHMM>` (offset optional).
    pub fn parse_raw(input: &str) -> Result<Self> {
        let input = input.trim();
        let parts: Vec<&str> = input.splitn(2, ' ').collect();

        let timestamp: i64 = parts[0]
            .parse()
            .map_err(|_| UtilError::DateParse(format!("invalid timestamp: '{}'", parts[0])))?;

        let tz_offset = if parts.len() > 1 {
            let tz_str = parts[1].trim();
            let tz_int: i32 = tz_str
                .parse()
                .map_err(|_| UtilError::DateParse(format!("invalid timezone: '{}'", tz_str)))?;
            tz_offset_to_minutes(tz_int)
        } else {
            0
        };

        Ok(Self {
            timestamp,
            tz_offset,
        })
    }

    /// Format in the raw style: `1234567890 +0000`.
    pub fn format_raw(&self) -> String {
        format!("{} {:+05}", self.timestamp, minutes_to_tz_offset(self.tz_offset))
    }

    /// Format in the default log style: `Thu Feb 13 23:31:30 2009 +0000`,
    /// rendered in the date's own timezone.
    pub fn format_default(&self) -> String {
        let offset = FixedOffset::east_opt(self.tz_offset * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        let dt = DateTime::from_timestamp(self.timestamp, 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&offset);
        dt.format("%a %b %e %H:%M:%S %Y %z").to_string()
    }
}

/// An author/committer/tagger identity with timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: BString,
    pub email: BString,
    pub date: GitDate,
}

impl Signature {
    pub fn new(name: impl Into<BString>, email: impl Into<BString>, date: GitDate) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date,
        }
    }

    /// Parse from the canonical format: `Name <email> timestamp tz`.
    pub fn parse(input: &BStr) -> Result<Self> {
        let input = input.as_bytes();

        // The date portion follows the last '>'.
        let gt_pos = input
            .iter()
            .rposition(|&b| b == b'>')
            .ok_or_else(|| UtilError::DateParse("missing '>' in signature".into()))?;
        let lt_pos = input[..gt_pos]
            .iter()
            .rposition(|&b| b == b'<')
            .ok_or_else(|| UtilError::DateParse("missing '<' in signature".into()))?;

        let name = input[..lt_pos].trim();
        let email = &input[lt_pos + 1..gt_pos];

        let date_str = input[gt_pos + 1..].trim();
        let date_str = std::str::from_utf8(date_str)
            .map_err(|_| UtilError::DateParse("non-UTF-8 date in signature".into()))?;
        let date = GitDate::parse_raw(date_str)?;

        Ok(Self {
            name: BString::from(name),
            email: BString::from(email),
            date,
        })
    }

    /// Serialize in the canonical format: `Name <email> timestamp tz`.
    pub fn to_bytes(&self) -> BString {
        let mut out = BString::new(Vec::new());
        out.push_str(&self.name);
        out.push_str(b" <");
        out.push_str(&self.email);
        out.push_str(b"> ");
        out.push_str(self.date.format_raw().as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstr::BStr;

    #[test]
    fn parse_raw() {
        let d = GitDate::parse_raw("1234567890 +0000").unwrap();
        assert_eq!(d.timestamp, 1234567890);
        assert_eq!(d.tz_offset, 0);
    }

    #[test]
    fn parse_raw_negative_tz() {
        let d = GitDate::parse_raw("1234567890 -0500").unwrap();
        assert_eq!(d.tz_offset, -300);
    }

    #[test]
    fn parse_rfc3339() {
        let d = GitDate::parse("2009-02-13T23:31:30+01:00").unwrap();
        assert_eq!(d.timestamp, 1234564290);
        assert_eq!(d.tz_offset, 60);
    }

    #[test]
    fn raw_roundtrip() {
        let d = GitDate::new(1234567890, -300);
        let formatted = d.format_raw();
        assert_eq!(formatted, "1234567890 -0500");
        assert_eq!(GitDate::parse_raw(&formatted).unwrap(), d);
    }

    #[test]
    fn format_default_utc() {
        let d = GitDate::new(1234567890, 0);
        assert_eq!(d.format_default(), "Fri Feb 13 23:31:30 2009 +0000");
    }

    #[test]
    fn signature_roundtrip() {
        let input = BStr::new(b"John Doe <john@example.com> 1234567890 +0000");
        let sig = Signature::parse(input).unwrap();
        assert_eq!(sig.name, "John Doe");
        assert_eq!(sig.email, "john@example.com");
        assert_eq!(sig.to_bytes().as_slice(), input.as_bytes());
    }

    #[test]
    fn signature_missing_email() {
        assert!(Signature::parse(BStr::new(b"John Doe 1234567890 +0000")).is_err());
    }
}
