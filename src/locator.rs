// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Term locator — longitude crossing search
//!
//! Finds the UTC minute at which the Sun's apparent longitude crosses a
//! target inside a search window. The searched function is the centred
//! angular difference
//!
//! ```text
//! diff(t) = ((λ(t) − target + 540) mod 360) − 180      ∈ [−180, 180)
//! ```
//!
//! where `λ(t)` is queried at `JD(TT) = JD(UT)(t) + ΔT(year(t), month(t)) / 86400`.
//! The centred form has no jump at 0°/360°; its only discontinuity sits at
//! the anti-target, half a year away from any crossing.
//!
//! ## Algorithm
//! 1. **Coarse scan**: `coarse_steps + 1` evenly spaced samples.
//! 2. **Bracket**: first adjacent pair whose signs differ (or that touches
//!    zero), ignoring the ±180° wrap jump.
//! 3. **Bisection**: at most `max_iterations` halvings, stopping early once
//!    `|diff| < tolerance`.
//! 4. **Fallback**: with no bracket, the sample with the smallest `|diff|`,
//!    reported as [`LocateOutcome::ApproximateFallback`].
//! 5. **Minute polish**: truncate to the minute, then keep the minute in
//!    `±minute_search_radius` with the smallest `|diff|`.

use crate::config::LocatorConfig;
use crate::delta_t::delta_t_seconds;
use crate::error::SolarTermError;
use crate::instant::Time;
use crate::period::UtcPeriod;
use crate::scales::UT;
use crate::sun::SolarLongitudeProvider;
use chrono::{DateTime, Datelike, TimeDelta, Utc};
use log::{trace, warn};
use qtty::Degrees;

/// How a crossing instant was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocateOutcome {
    /// A sign change was found in the coarse scan and refined by bisection.
    Bracketed,
    /// No sign change in the window; the best coarse sample was used.
    ApproximateFallback,
}

impl LocateOutcome {
    /// `true` for [`LocateOutcome::Bracketed`].
    #[inline]
    pub fn is_bracketed(self) -> bool {
        matches!(self, LocateOutcome::Bracketed)
    }
}

/// Result of one locator run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermCrossing {
    /// Crossing instant, whole minute.
    pub instant: DateTime<Utc>,
    /// Bracketed or fallback.
    pub outcome: LocateOutcome,
    /// `|diff|` at `instant`.
    pub residual: Degrees,
}

/// Signed angular distance from `target` to `longitude`, in `[−180°, 180°)`.
#[inline]
pub fn angular_difference(longitude: Degrees, target: Degrees) -> Degrees {
    Degrees::new((longitude.value() - target.value() + 540.0).rem_euclid(360.0) - 180.0)
}

/// Whether a zero of `diff` lies between two adjacent samples.
#[inline]
fn brackets_root(fa: f64, fb: f64) -> bool {
    let touches = fa == 0.0 || fb == 0.0;
    let crosses = (fa < 0.0 && fb > 0.0) || (fa > 0.0 && fb < 0.0);
    // A ~360° swing is the anti-target wrap, not a root.
    (touches || crosses) && (fa - fb).abs() < 180.0
}

/// Crossing search bound to a longitude provider and a policy.
pub struct TermLocator<'a, P: ?Sized> {
    provider: &'a P,
    config: &'a LocatorConfig,
}

impl<'a, P: SolarLongitudeProvider + ?Sized> TermLocator<'a, P> {
    pub fn new(provider: &'a P, config: &'a LocatorConfig) -> Self {
        Self { provider, config }
    }

    /// `diff(instant)` in degrees.
    pub fn difference_at(
        &self,
        instant: DateTime<Utc>,
        target: Degrees,
    ) -> Result<f64, SolarTermError> {
        let jd_ut = Time::<UT>::from_datetime(instant);
        let delta_t = delta_t_seconds(instant.year() as f64, instant.month());
        let longitude = self.provider.apparent_longitude(jd_ut.to_tt(delta_t))?;
        Ok(angular_difference(longitude, target).value())
    }

    /// Locate the crossing of `target` inside `window`.
    pub fn locate(
        &self,
        target: Degrees,
        window: &UtcPeriod,
    ) -> Result<TermCrossing, SolarTermError> {
        if !window.is_proper() {
            return Err(SolarTermError::InvalidWindow {
                start: window.start,
                end: window.end,
            });
        }

        let samples = window
            .sample_grid(self.config.coarse_steps)
            .into_iter()
            .map(|t| self.difference_at(t, target).map(|diff| (t, diff)))
            .collect::<Result<Vec<_>, _>>()?;

        let bracket = samples
            .windows(2)
            .find(|pair| brackets_root(pair[0].1, pair[1].1))
            .map(|pair| (pair[0], pair[1]));

        let (root, outcome) = match bracket {
            Some((lower, upper)) => (
                self.bisect(target, lower, upper)?,
                LocateOutcome::Bracketed,
            ),
            None => {
                let best = samples
                    .iter()
                    .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
                    .map(|s| s.0)
                    .unwrap_or(window.start);
                warn!(
                    "no crossing of {}° bracketed in {}; using nearest sample {}",
                    target.value(),
                    window,
                    best
                );
                (best, LocateOutcome::ApproximateFallback)
            }
        };

        let (instant, residual) = self.polish_to_minute(target, root)?;
        Ok(TermCrossing {
            instant,
            outcome,
            residual: Degrees::new(residual),
        })
    }

    fn bisect(
        &self,
        target: Degrees,
        lower: (DateTime<Utc>, f64),
        upper: (DateTime<Utc>, f64),
    ) -> Result<DateTime<Utc>, SolarTermError> {
        let (mut a, mut fa) = lower;
        let (mut b, fb) = upper;
        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }

        for iteration in 0..self.config.max_iterations {
            let mid = UtcPeriod::new(a, b).midpoint();
            let fm = self.difference_at(mid, target)?;
            if fm.abs() < self.config.tolerance.value() {
                trace!(
                    "bisection for {}° converged after {} steps",
                    target.value(),
                    iteration + 1
                );
                return Ok(mid);
            }
            if (fa < 0.0 && fm > 0.0) || (fa > 0.0 && fm < 0.0) {
                b = mid;
            } else {
                a = mid;
                fa = fm;
            }
        }
        Ok(UtcPeriod::new(a, b).midpoint())
    }

    /// Truncate to the minute, then pick the best minute within the radius.
    ///
    /// Ties keep the earlier-examined candidate, the truncated minute first.
    fn polish_to_minute(
        &self,
        target: Degrees,
        root: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, f64), SolarTermError> {
        let truncated = truncate_to_minute(root)?;
        let mut best = truncated;
        let mut best_abs = self.difference_at(truncated, target)?.abs();

        let radius = self.config.minute_search_radius as i64;
        for offset in -radius..=radius {
            let Some(candidate) = truncated.checked_add_signed(TimeDelta::minutes(offset)) else {
                continue;
            };
            let value = self.difference_at(candidate, target)?.abs();
            if value < best_abs {
                best = candidate;
                best_abs = value;
            }
        }
        Ok((best, best_abs))
    }
}

/// Drop seconds and sub-second parts.
fn truncate_to_minute(instant: DateTime<Utc>) -> Result<DateTime<Utc>, SolarTermError> {
    let minute_start = instant.timestamp().div_euclid(60) * 60;
    DateTime::<Utc>::from_timestamp(minute_start, 0).ok_or_else(|| {
        SolarTermError::UnrepresentableInstant {
            jd: Time::<UT>::from_datetime(instant).value(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EphemerisError;
    use crate::scales::TT;
    use crate::sun::normalize_degrees;
    use chrono::{TimeZone, Timelike};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    /// λ grows `rate` degrees per day of TT from `origin`.
    fn linear_sun(
        origin: Time<TT>,
        rate: f64,
    ) -> impl Fn(Time<TT>) -> Result<Degrees, EphemerisError> {
        move |jd| Ok(Degrees::new(normalize_degrees((jd - origin).value() * rate)))
    }

    #[test]
    fn centred_difference_wraps() {
        let d = |lon: f64, target: f64| {
            angular_difference(Degrees::new(lon), Degrees::new(target)).value()
        };
        assert_eq!(d(359.0, 0.0), -1.0);
        assert_eq!(d(1.0, 0.0), 1.0);
        assert_eq!(d(10.0, 345.0), 25.0);
        assert_eq!(d(180.0, 0.0), -180.0);
        assert_eq!(d(90.0, 90.0), 0.0);
    }

    #[test]
    fn wrap_jump_is_not_a_bracket() {
        assert!(brackets_root(-1.0, 1.0));
        assert!(brackets_root(0.0, 5.0));
        assert!(!brackets_root(179.9, -179.9));
        assert!(!brackets_root(1.0, 2.0));
    }

    #[test]
    fn linear_stub_crossing_is_found_within_a_minute() {
        let window = UtcPeriod::new(utc(2025, 3, 10, 0, 0), utc(2025, 4, 2, 0, 0));
        let origin = Time::<TT>::from_utc(window.start);
        let rate = 0.9856;
        let target = Degrees::new(7.3);
        let provider = linear_sun(origin, rate);
        let config = LocatorConfig::default();

        let crossing = TermLocator::new(&provider, &config)
            .locate(target, &window)
            .unwrap();

        let crossing_tt = origin + qtty::Days::new(target.value() / rate);
        let expected = crossing_tt.to_utc().unwrap();
        let error = (crossing.instant - expected).num_seconds().abs();
        assert!(
            error <= 60,
            "off by {error} s: {} vs {}",
            crossing.instant,
            expected
        );
        assert_eq!(crossing.outcome, LocateOutcome::Bracketed);
        assert_eq!(crossing.instant.second(), 0);
        assert_eq!(crossing.instant.nanosecond(), 0);
    }

    #[test]
    fn crossing_through_zero_degrees_is_bracketed() {
        // λ runs from 350.5° to 12.5° across the window.
        let window = UtcPeriod::new(utc(2025, 3, 10, 0, 0), utc(2025, 4, 1, 0, 0));
        let origin = Time::<TT>::from_utc(window.start);
        let provider = move |jd: Time<TT>| -> Result<Degrees, EphemerisError> {
            Ok(Degrees::new(normalize_degrees(350.5 + (jd - origin).value())))
        };
        let config = LocatorConfig::default();

        let crossing = TermLocator::new(&provider, &config)
            .locate(Degrees::new(0.0), &window)
            .unwrap();
        assert!(crossing.outcome.is_bracketed());
        assert!(window.contains(&crossing.instant));
        assert!(crossing.residual.value() < 1.0 / 1440.0);
        assert_eq!(crossing.instant.date_naive().to_string(), "2025-03-19");
    }

    #[test]
    fn anti_target_jump_falls_back() {
        // Same motion, but the target sits opposite: diff jumps +180 to -180.
        let window = UtcPeriod::new(utc(2025, 3, 10, 0, 0), utc(2025, 4, 1, 0, 0));
        let origin = Time::<TT>::from_utc(window.start);
        let provider = move |jd: Time<TT>| -> Result<Degrees, EphemerisError> {
            Ok(Degrees::new(normalize_degrees(350.5 + (jd - origin).value())))
        };
        let config = LocatorConfig::default();

        let crossing = TermLocator::new(&provider, &config)
            .locate(Degrees::new(180.0), &window)
            .unwrap();
        assert_eq!(crossing.outcome, LocateOutcome::ApproximateFallback);
        assert!(crossing.residual.value() > 160.0);
    }

    #[test]
    fn constant_longitude_falls_back() {
        let window = UtcPeriod::new(utc(2025, 1, 1, 0, 0), utc(2025, 1, 20, 0, 0));
        let provider =
            |_: Time<TT>| -> Result<Degrees, EphemerisError> { Ok(Degrees::new(100.0)) };
        let config = LocatorConfig::default();

        let crossing = TermLocator::new(&provider, &config)
            .locate(Degrees::new(0.0), &window)
            .unwrap();
        assert_eq!(crossing.outcome, LocateOutcome::ApproximateFallback);
        // Every sample ties; the first one wins, and so does its own minute.
        assert_eq!(crossing.instant, window.start);
        assert_eq!(crossing.residual, Degrees::new(100.0));
    }

    #[test]
    fn fallback_picks_the_closest_sample() {
        // λ climbs towards the target but stops 1° short of it.
        let window = UtcPeriod::new(utc(2025, 1, 1, 0, 0), utc(2025, 1, 21, 0, 0));
        let origin = Time::<TT>::from_utc(window.start);
        let provider = move |jd: Time<TT>| -> Result<Degrees, EphemerisError> {
            let days = (jd - origin).value();
            Ok(Degrees::new(normalize_degrees(270.0 + days.min(19.0))))
        };
        let config = LocatorConfig::default();

        let crossing = TermLocator::new(&provider, &config)
            .locate(Degrees::new(290.0), &window)
            .unwrap();
        assert_eq!(crossing.outcome, LocateOutcome::ApproximateFallback);
        assert!((crossing.residual.value() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn provider_errors_propagate() {
        let window = UtcPeriod::new(utc(2025, 1, 1, 0, 0), utc(2025, 1, 20, 0, 0));
        let provider = |jd: Time<TT>| -> Result<Degrees, EphemerisError> {
            Err(EphemerisError::OutOfDomain {
                jd: jd.value(),
                reason: "stub".into(),
            })
        };
        let config = LocatorConfig::default();

        let err = TermLocator::new(&provider, &config)
            .locate(Degrees::new(0.0), &window)
            .unwrap_err();
        assert!(matches!(
            err,
            SolarTermError::Ephemeris(EphemerisError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let window = UtcPeriod::new(utc(2025, 1, 20, 0, 0), utc(2025, 1, 1, 0, 0));
        let config = LocatorConfig::default();
        let err = TermLocator::new(&crate::MeeusSun, &config)
            .locate(Degrees::new(0.0), &window)
            .unwrap_err();
        assert!(matches!(err, SolarTermError::InvalidWindow { .. }));
    }

    #[test]
    fn exact_zero_sample_is_returned_as_is() {
        let window = UtcPeriod::new(utc(2025, 1, 1, 0, 0), utc(2025, 1, 11, 0, 0));
        let origin = Time::<TT>::from_utc(utc(2025, 1, 2, 0, 0));
        // Piecewise: exactly on target at and after the second sample's day.
        let provider = move |jd: Time<TT>| -> Result<Degrees, EphemerisError> {
            let days = (jd - origin).value();
            Ok(Degrees::new(if days < 0.0 { 359.5 } else { 0.0 }))
        };
        let config = LocatorConfig::default();

        let crossing = TermLocator::new(&provider, &config)
            .locate(Degrees::new(0.0), &window)
            .unwrap();
        assert!(crossing.outcome.is_bracketed());
        assert_eq!(crossing.residual, Degrees::new(0.0));
    }

    #[test]
    fn minute_search_stays_inside_the_calendar() {
        let end = DateTime::<Utc>::MAX_UTC;
        let window = UtcPeriod::new(end - TimeDelta::days(2), end);
        let origin = Time::<TT>::from_utc(window.start);
        // Climbs towards 20° without reaching it: the last sample is best.
        let provider = move |jd: Time<TT>| -> Result<Degrees, EphemerisError> {
            Ok(Degrees::new(10.0 + (jd - origin).value().clamp(0.0, 2.0)))
        };
        let config = LocatorConfig::default();

        let crossing = TermLocator::new(&provider, &config)
            .locate(Degrees::new(20.0), &window)
            .unwrap();
        assert_eq!(crossing.outcome, LocateOutcome::ApproximateFallback);
        assert!(crossing.instant <= end);
        assert!(crossing.instant > end - TimeDelta::minutes(6));
    }

    #[test]
    fn truncation_drops_seconds() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 20, 9, 1, 59).unwrap()
            + TimeDelta::milliseconds(999);
        assert_eq!(truncate_to_minute(instant).unwrap(), utc(2025, 3, 20, 9, 1));
    }
}
