use chrono::{DateTime, FixedOffset, TimeDelta};

/// A simulation clock stepping through simulated timestamps.
///
/// The `Clock` yields the start of each tick from `start` up to, but not
/// including, `end`. It never consults the wall clock.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeDelta, TimeZone};
/// use household_sim::sim::clock::Clock;
///
/// let tz = FixedOffset::east_opt(0).unwrap();
/// let start = tz.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
/// let end = tz.with_ymd_and_hms(2025, 1, 6, 0, 15, 0).unwrap();
/// let mut clock = Clock::new(start, end, TimeDelta::minutes(5));
/// let mut steps = Vec::new();
///
/// clock.run(|step, _| steps.push(step));
/// assert_eq!(steps, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Start of the next tick
    current: DateTime<FixedOffset>,
    /// The clock stops once `current` reaches this instant
    end: DateTime<FixedOffset>,
    tick: TimeDelta,
    /// Ticks already handed out
    step: usize,
}

impl Clock {
    /// Creates a new clock.
    ///
    /// # Arguments
    ///
    /// * `start` - Timestamp of the first tick
    /// * `end` - Exclusive stop time
    /// * `tick` - Tick length; a non-positive length yields no ticks
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>, tick: TimeDelta) -> Self {
        Self {
            current: start,
            end,
            tick,
            step: 0,
        }
    }

    /// Advances the clock by one tick.
    ///
    /// # Returns
    ///
    /// * `Some((step, time))` - The tick index and its start time
    /// * `None` - If simulated time has reached `end`
    pub fn tick(&mut self) -> Option<(usize, DateTime<FixedOffset>)> {
        if self.current >= self.end || self.tick <= TimeDelta::zero() {
            return None;
        }
        let out = (self.step, self.current);
        self.current += self.tick;
        self.step += 1;
        Some(out)
    }

    /// Runs a function for each remaining tick.
    pub fn run(&mut self, mut f: impl FnMut(usize, DateTime<FixedOffset>)) {
        while let Some((step, now)) = self.tick() {
            f(step, now);
        }
    }

    /// Start of the next tick.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.current
    }

    pub fn tick_length(&self) -> TimeDelta {
        self.tick
    }

    /// Number of ticks handed out so far.
    pub fn elapsed_ticks(&self) -> usize {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.end
    }
}
