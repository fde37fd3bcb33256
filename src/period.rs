// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time intervals.
//!
//! This module provides:
//! - [`Interval<T>`]: generic interval over any [`TimeInstant`]
//! - [`UtcPeriod`]: the UTC alias used for solar-term search windows

use super::TimeInstant;
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Represents an interval between two instants.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use solar_terms::UtcPeriod;
///
/// let start = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2025, 4, 4, 0, 0, 0).unwrap();
/// let window = UtcPeriod::new(start, end);
///
/// assert_eq!(window.duration_days(), 21.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// UTC interval alias.
pub type UtcPeriod = Interval<DateTime<Utc>>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two time instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Returns the duration of the interval as the difference between end and start.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Whether `instant` lies in the closed interval `[start, end]`.
    pub fn contains(&self, instant: &T) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    /// Whether the interval has positive length.
    pub fn is_proper(&self) -> bool {
        self.start < self.end
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl Interval<DateTime<Utc>> {
    /// Returns the duration in days as a floating-point value.
    pub fn duration_days(&self) -> f64 {
        const NANOS_PER_DAY: f64 = 86_400_000_000_000.0;
        const SECONDS_PER_DAY: f64 = 86_400.0;

        let duration = self.duration();
        match duration.num_nanoseconds() {
            Some(ns) => ns as f64 / NANOS_PER_DAY,
            // Fallback for exceptionally large durations that do not fit in i64 nanoseconds.
            None => duration.num_seconds() as f64 / SECONDS_PER_DAY,
        }
    }

    /// `steps + 1` evenly spaced instants from `start` to `end` inclusive.
    ///
    /// Sample `i` sits at `start + i · (end − start) / steps`; the last sample
    /// is exactly `end`. `steps == 0` yields just `start`.
    pub fn sample_grid(&self, steps: u32) -> Vec<DateTime<Utc>> {
        if steps == 0 {
            return vec![self.start];
        }
        let step = self.duration() / steps as i32;
        let mut grid: Vec<_> = (0..steps as i32).map(|i| self.start + step * i).collect();
        grid.push(self.end);
        grid
    }

    /// This interval widened by `padding` on both sides, then clipped to `bounds`.
    ///
    /// Returns `None` if the widened ends leave chrono's representable range.
    pub fn padded_within(&self, padding: TimeDelta, bounds: &Self) -> Option<Self> {
        let start = self.start.checked_sub_signed(padding)?.max(bounds.start);
        let end = self.end.checked_add_signed(padding)?.min(bounds.end);
        Some(Interval::new(start, end))
    }

    /// Midpoint of the interval.
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + self.duration() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Time, UT};
    use chrono::TimeZone;
    use qtty::Days;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn grid_has_steps_plus_one_points_ending_at_end() {
        let window = UtcPeriod::new(utc(2025, 1, 1, 0), utc(2025, 1, 11, 0));
        let grid = window.sample_grid(60);
        assert_eq!(grid.len(), 61);
        assert_eq!(grid[0], window.start);
        assert_eq!(grid[60], window.end);
        assert_eq!(grid[6], utc(2025, 1, 2, 0));
        assert!(grid.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn zero_steps_grid_is_start_only() {
        let window = UtcPeriod::new(utc(2025, 1, 1, 0), utc(2025, 1, 2, 0));
        assert_eq!(window.sample_grid(0), vec![window.start]);
    }

    #[test]
    fn padding_is_clipped_to_bounds() {
        let bounds = UtcPeriod::new(utc(2024, 12, 25, 0), utc(2026, 1, 8, 0));
        let slot = UtcPeriod::new(utc(2025, 1, 1, 0), utc(2025, 1, 16, 0));
        let padded = slot.padded_within(TimeDelta::days(10), &bounds).unwrap();
        assert_eq!(padded.start, bounds.start);
        assert_eq!(padded.end, utc(2025, 1, 26, 0));
    }

    #[test]
    fn padding_past_the_calendar_range_is_none() {
        let slot = UtcPeriod::new(utc(2025, 1, 1, 0), utc(2025, 1, 16, 0));
        let huge = TimeDelta::days(200_000_000);
        assert_eq!(slot.padded_within(huge, &slot), None);

        let earliest = UtcPeriod::new(DateTime::<Utc>::MIN_UTC, utc(2025, 1, 1, 0));
        assert_eq!(earliest.padded_within(TimeDelta::days(1), &earliest), None);
    }

    #[test]
    fn midpoint_and_contains() {
        let window = UtcPeriod::new(utc(2025, 1, 1, 0), utc(2025, 1, 2, 0));
        assert_eq!(window.midpoint(), utc(2025, 1, 1, 12));
        assert!(window.contains(&utc(2025, 1, 1, 12)));
        assert!(window.contains(&window.end));
        assert!(!window.contains(&utc(2025, 1, 2, 1)));
        assert!(window.is_proper());
        assert!(!UtcPeriod::new(window.end, window.start).is_proper());
    }

    #[test]
    fn julian_day_intervals_measure_days() {
        let period = Interval::new(Time::<UT>::new(2_451_545.0), Time::<UT>::new(2_451_546.5));
        assert_eq!(period.duration(), Days::new(1.5));
    }
}
