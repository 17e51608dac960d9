//! Effective date window
//!
//! Windows are half-open: `[from, to)`. A missing bound is unbounded.

use std::fmt;

use chrono::NaiveDate;

/// Date format used everywhere dates are written or read.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Render a date in its canonical textual form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EffectiveWindow {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl EffectiveWindow {
    /// Build a window. Returns `None` when `from > to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<Self> {
        match (from, to) {
            (Some(f), Some(t)) if f > t => None,
            _ => Some(Self { from, to }),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn starting(from: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |f| date >= f) && self.to.map_or(true, |t| date < t)
    }

    /// True when at least one date lies in both windows.
    pub fn overlaps(&self, other: &EffectiveWindow) -> bool {
        self.intersect(other).is_some()
    }

    /// Dates covered by both windows, or `None` when no date is.
    pub fn intersect(&self, other: &EffectiveWindow) -> Option<EffectiveWindow> {
        let from = match (self.from, other.from) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let to = match (self.to, other.to) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        match (from, to) {
            (Some(f), Some(t)) if f >= t => None,
            _ => Some(Self { from, to }),
        }
    }
}

impl fmt::Display for EffectiveWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self.from.map(format_date).unwrap_or_else(|| "-inf".into());
        let to = self.to.map(format_date).unwrap_or_else(|| "+inf".into());
        write!(f, "[{}, {})", from, to)
    }
}
