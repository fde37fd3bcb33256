// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Apparent solar longitude.
//!
//! The locator only needs one thing from an ephemeris: the Sun's apparent
//! geocentric ecliptic longitude at a Julian Day (TT). That need is the
//! [`SolarLongitudeProvider`] trait. Any closure
//! `Fn(Time<TT>) -> Result<Degrees, EphemerisError>` is a provider, which
//! makes deterministic stubs trivial in tests.
//!
//! [`MeeusSun`] is a self-contained provider based on the low-accuracy solar
//! theory of Meeus, *Astronomical Algorithms* (2nd ed.), ch. 25: good to
//! about 0.01°, i.e. a quarter of an hour in crossing time. Plug a
//! VSOP87-grade ephemeris in through the trait when that is not enough.

use crate::error::EphemerisError;
use crate::instant::Time;
use crate::scales::TT;
use qtty::Degrees;

/// Source of the Sun's apparent geocentric ecliptic longitude.
///
/// Implementations must be deterministic and free of side effects, and must
/// return longitudes in `[0°, 360°)`.
pub trait SolarLongitudeProvider {
    /// Apparent longitude of the Sun at `jd_tt`.
    fn apparent_longitude(&self, jd_tt: Time<TT>) -> Result<Degrees, EphemerisError>;
}

impl<F> SolarLongitudeProvider for F
where
    F: Fn(Time<TT>) -> Result<Degrees, EphemerisError>,
{
    #[inline]
    fn apparent_longitude(&self, jd_tt: Time<TT>) -> Result<Degrees, EphemerisError> {
        self(jd_tt)
    }
}

/// Low-precision analytic Sun (Meeus ch. 25).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MeeusSun;

impl SolarLongitudeProvider for MeeusSun {
    fn apparent_longitude(&self, jd_tt: Time<TT>) -> Result<Degrees, EphemerisError> {
        let jd = jd_tt.value();
        if !jd.is_finite() {
            return Err(EphemerisError::NonFiniteJulianDay { jd });
        }
        let t = jd_tt.julian_centuries().value();

        // Geometric mean longitude and mean anomaly, referred to the mean
        // equinox of date (eq. 25.2, 25.3).
        let l0 = 280.46646 + 36_000.76983 * t + 0.000_303_2 * t * t;
        let m = (357.52911 + 35_999.05029 * t - 0.000_153_7 * t * t).to_radians();

        // Equation of the centre.
        let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
            + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
            + 0.000289 * (3.0 * m).sin();

        // Aberration and nutation in longitude.
        let omega = (125.04 - 1_934.136 * t).to_radians();
        let apparent = l0 + c - 0.00569 - 0.00478 * omega.sin();

        Ok(Degrees::new(normalize_degrees(apparent)))
    }
}

/// Reduce an angle to `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
