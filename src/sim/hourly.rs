//! Hourly rollup of interval records.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::Serialize;

use super::types::IntervalRecord;

/// Consumption summed over one clock hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyTotals {
    pub hour_start: DateTime<FixedOffset>,
    pub electricity_kwh: f64,
    pub water_liters: f64,
    /// Intervals that started inside this hour.
    pub intervals: usize,
}

fn hour_of(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    t.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Groups records by the hour their interval starts in.
///
/// Records are expected in time order; the output is in the same order.
pub fn rollup(records: &[IntervalRecord]) -> Vec<HourlyTotals> {
    let mut out: Vec<HourlyTotals> = Vec::new();
    for r in records {
        let hour = hour_of(r.timestamp);
        match out.last_mut() {
            Some(last) if last.hour_start == hour => {
                last.electricity_kwh += r.electricity_kwh;
                last.water_liters += r.water_liters;
                last.intervals += 1;
            }
            _ => out.push(HourlyTotals {
                hour_start: hour,
                electricity_kwh: r.electricity_kwh,
                water_liters: r.water_liters,
                intervals: 1,
            }),
        }
    }
    out
}
