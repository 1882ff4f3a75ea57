//! Time-of-day windows for sleep and out-of-home periods.

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, TimeDelta, Weekday};

/// Half-open time-of-day window `[start, end)`.
///
/// When `end <= start` the window wraps past midnight and covers
/// `t >= start || t < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.wraps_midnight() {
            t >= self.start || t < self.end
        } else {
            self.start <= t && t < self.end
        }
    }

    /// Like [`contains`](Self::contains) but also covers `end` itself.
    pub fn contains_inclusive(&self, t: NaiveTime) -> bool {
        self.contains(t) || t == self.end
    }
}

/// Nightly sleep window.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use household_sim::npc::schedule::SleepWindow;
///
/// let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let sleep = SleepWindow::new(hm(23, 0), hm(6, 0));
/// assert!(sleep.contains(hm(23, 30)));
/// assert!(sleep.contains(hm(5, 30)));
/// assert!(!sleep.contains(hm(12, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepWindow(TimeWindow);

impl SleepWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self(TimeWindow::new(start, end))
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        self.0.contains(t)
    }

    pub fn window(&self) -> TimeWindow {
        self.0
    }
}

/// Recurring absence from home.
#[derive(Debug, Clone, PartialEq)]
pub struct OutOfHomePeriod {
    /// Days the period starts on; empty means every day.
    pub days: Vec<Weekday>,
    pub window: TimeWindow,
    pub reason: String,
}

impl OutOfHomePeriod {
    fn starts_on(&self, day: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&day)
    }

    /// Whether `now` falls inside this period, end time included.
    ///
    /// A tick landing exactly on the end still counts as away. The weekday
    /// filter applies to the day the window opens, so the after-midnight
    /// tail of a wrapping window belongs to the previous day.
    pub fn contains(&self, now: DateTime<FixedOffset>) -> bool {
        let t = now.time();
        let w = &self.window;
        if !w.wraps_midnight() {
            return w.contains_inclusive(t) && self.starts_on(now.weekday());
        }
        if t >= w.start {
            return self.starts_on(now.weekday());
        }
        if t <= w.end {
            let yesterday = (now - TimeDelta::days(1)).weekday();
            return self.starts_on(yesterday);
        }
        false
    }
}

/// Returns the reason of the first period covering `now`, if any.
pub fn away_reason(periods: &[OutOfHomePeriod], now: DateTime<FixedOffset>) -> Option<&str> {
    periods
        .iter()
        .find(|p| p.contains(now))
        .map(|p| p.reason.as_str())
}
