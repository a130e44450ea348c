//! Calendar slot normalization.
//!
//! Turns a selection reported by a calendar grid (a `start`/`end` pair whose
//! `end` is exclusive when it lands on midnight) into the inclusive list of
//! days the user actually touched, and composes a day with a time of day into
//! a concrete timestamp.
//!
//! All timestamps are local wall-clock values (`NaiveDateTime`); the backend
//! stores and returns them the same way.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Time used when an `HH:MM` string is absent or malformed.
pub const DEFAULT_TIME: TimeOfDay = TimeOfDay::from_hm(12, 0);

/// Default end time for new events.
pub const DEFAULT_END_TIME: TimeOfDay = TimeOfDay::from_hm(13, 0);

/// A single calendar day (a timestamp truncated to midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        CalendarDay(date)
    }

    /// The day a timestamp falls on.
    pub fn of(ts: NaiveDateTime) -> Self {
        CalendarDay(ts.date())
    }

    /// Parse `YYYY-MM-DD`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(CalendarDay)
            .map_err(|_| ValidationError::InvalidDate(s.to_string()))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn midnight(self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    pub fn next(self) -> Option<Self> {
        self.0.succ_opt().map(CalendarDay)
    }

    /// Monday of the week containing this day.
    pub fn week_start(self) -> Self {
        let offset = self.0.weekday().num_days_from_monday();
        CalendarDay(self.0 - TimeDelta::days(i64::from(offset)))
    }

    /// Whether `ts` falls on this day.
    pub fn contains(self, ts: NaiveDateTime) -> bool {
        ts.date() == self.0
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarDay::parse(s)
    }
}

/// A 24-hour `HH:MM` time of day. Seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    const fn from_hm(hour: u32, minute: u32) -> Self {
        TimeOfDay { hour, minute }
    }

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(TimeOfDay { hour, minute })
    }

    /// Parse `H:MM` / `HH:MM` (a trailing `:SS` is accepted and dropped).
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split(':');
        let hour = parse_component(parts.next()?)?;
        let minute = parse_component(parts.next()?)?;
        if let Some(seconds) = parts.next() {
            parse_component(seconds)?;
        }
        if parts.next().is_some() {
            return None;
        }
        TimeOfDay::new(hour, minute)
    }

    /// Parse, falling back to [`DEFAULT_TIME`] when absent or malformed.
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.and_then(TimeOfDay::parse).unwrap_or(DEFAULT_TIME)
    }

    /// Local time of day of a timestamp, seconds dropped.
    pub fn of(ts: NaiveDateTime) -> Self {
        use chrono::Timelike;
        TimeOfDay::from_hm(ts.hour(), ts.minute())
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    /// This time of day on `day`.
    pub fn on(self, day: CalendarDay) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN);
        day.date().and_time(time)
    }
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl Default for TimeOfDay {
    fn default() -> Self {
        DEFAULT_TIME
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s).ok_or_else(|| format!("Invalid time '{}'. Expected HH:MM", s))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Truncate a timestamp to midnight of the same day.
pub fn start_of_day(ts: NaiveDateTime) -> NaiveDateTime {
    CalendarDay::of(ts).midnight()
}

/// Pull a midnight `end` back by one millisecond.
///
/// Calendar grids report a selection ending on day N as ending at midnight
/// of day N+1; without this adjustment the extra day would be counted.
pub fn normalize_end_exclusive(end: NaiveDateTime) -> NaiveDateTime {
    if end.time() == NaiveTime::MIN {
        end.checked_sub_signed(TimeDelta::milliseconds(1))
            .unwrap_or(end)
    } else {
        end
    }
}

/// Every day touched by a selection, ascending and inclusive of both ends.
///
/// A selection whose normalized end falls before its start (a zero-length
/// selection at midnight) yields the start day alone.
pub fn days_in_range(start: NaiveDateTime, end: NaiveDateTime) -> Vec<CalendarDay> {
    let first = CalendarDay::of(start);
    let last = CalendarDay::of(normalize_end_exclusive(end)).max(first);

    let mut days = Vec::new();
    let mut cur = Some(first);
    while let Some(day) = cur.filter(|d| *d <= last) {
        days.push(day);
        cur = day.next();
    }
    days
}

/// `day` at the given `HH:MM`, defaulting to noon when absent or malformed.
pub fn with_time(day: CalendarDay, hhmm: Option<&str>) -> NaiveDateTime {
    TimeOfDay::parse_or_default(hhmm).on(day)
}

/// Zero-padded `HH:MM` of a timestamp.
pub fn hhmm_from_timestamp(ts: NaiveDateTime) -> String {
    TimeOfDay::of(ts).to_string()
}

/// How a slot selection was made on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAction {
    Click,
    Select,
}

/// A raw selection reported by the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSelection {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub action: SelectAction,
}

impl SlotSelection {
    pub fn click(at: NaiveDateTime) -> Self {
        SlotSelection {
            start: at,
            end: at,
            action: SelectAction::Click,
        }
    }

    pub fn select(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        SlotSelection {
            start,
            end,
            action: SelectAction::Select,
        }
    }

    /// Selection covering `first..=last` the way a grid reports it
    /// (exclusive midnight end).
    ///
    /// On the last representable day there is no next midnight, so the end
    /// is the last instant of `last` instead.
    pub fn whole_days(first: CalendarDay, last: CalendarDay) -> Self {
        let end = match last.next() {
            Some(next) => next.midnight(),
            None => last
                .date()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap_or_else(|| last.midnight()),
        };
        SlotSelection::select(first.midnight(), end)
    }

    /// The days this selection stands for.
    pub fn days(&self) -> Vec<CalendarDay> {
        match self.action {
            SelectAction::Click => vec![CalendarDay::of(self.start)],
            SelectAction::Select => days_in_range(self.start, self.end),
        }
    }
}

/// A start/end pair with `end` strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpan {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl EventSpan {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::EndNotAfterStart);
        }
        Ok(EventSpan { start, end })
    }

    /// Both times applied to the same day. Spans never cross midnight.
    pub fn on_day(
        day: CalendarDay,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, ValidationError> {
        EventSpan::new(start.on(day), end.on(day))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }
}
