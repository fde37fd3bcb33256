// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T) — UT↔TT Correction Layer
//!
//! This module implements the Espenak–Meeus piecewise polynomial model for
//! **ΔT = TT − UT**, as published with the *Five Millennium Canon of Solar
//! Eclipses: −1999 to +3000* (NASA TP-2006-214141).
//!
//! The model is stored as an ordered table of [`DeltaTSegment`]s. Evaluating
//! ΔT selects the first segment whose upper bound exceeds the query
//! year-fraction and evaluates its polynomial in the shifted variable
//! `t = y − anchor`. Adjusting the model is a change to [`DELTA_T_SEGMENTS`],
//! not to control flow.
//!
//! ## Integration with Time Scales
//!
//! The correction is applied **automatically** by the [`UT`](super::UT) time
//! scale marker, using the civil year and month of the instant. The raw value
//! is available through [`delta_t_seconds`] or [`Time::<UT>::delta_t`].
//!
//! ## Quick Example
//! ```rust
//! use solar_terms::delta_t_seconds;
//!
//! // July 2000: t = 6.5 / 12 years past the 2000.0 anchor.
//! let dt = delta_t_seconds(2000.0, 7);
//! assert!((dt.value() - 64.04).abs() < 0.05);
//! ```
//!
//! ## Valid Time Range
//! Years 1900–2100 are the supported range ([`MODEL_YEARS`]). Outside it the
//! table still returns a value (the 1800–1860 polynomial below 1860, the
//! long-term parabola `−20 + 32u²` with u in centuries since 1820 after 2100),
//! but those figures are **low-confidence extrapolations** with uncertainties
//! of tens of seconds or more. They never fail.

use super::instant::Time;
use super::scales::UT;
use qtty::Seconds;
use std::ops::RangeInclusive;

/// Calendar years for which ΔT is modelled with confidence.
pub const MODEL_YEARS: RangeInclusive<i32> = 1900..=2100;

/// One piece of the ΔT model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaTSegment {
    /// Exclusive upper bound of the year-fraction this segment covers.
    pub year_upper_bound: f64,
    /// Origin of the local variable `t = y − anchor`.
    pub anchor: f64,
    /// Polynomial coefficients in ascending powers of `t`, in seconds.
    pub coefficients: &'static [f64],
}

impl DeltaTSegment {
    /// Evaluate this segment's polynomial at year-fraction `y`.
    #[inline]
    pub fn evaluate(&self, year_fraction: f64) -> Seconds {
        let t = year_fraction - self.anchor;
        Seconds::new(
            self.coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, c| acc * t + c),
        )
    }
}

/// Espenak–Meeus segments, ordered by upper bound.
#[rustfmt::skip]
pub const DELTA_T_SEGMENTS: [DeltaTSegment; 10] = [
    // 1800–1860
    DeltaTSegment {
        year_upper_bound: 1860.0,
        anchor: 1860.0,
        coefficients: &[
            13.72, -0.332447, 0.0068612, 0.0041116,
            -0.00037436, 0.0000121272, -0.0000001699, 0.000000000875,
        ],
    },
    // 1860–1900
    DeltaTSegment {
        year_upper_bound: 1900.0,
        anchor: 1860.0,
        coefficients: &[7.62, 0.5737, -0.251754, 0.01680668, -0.0004473624, 1.0 / 233_174.0],
    },
    // 1900–1920
    DeltaTSegment {
        year_upper_bound: 1920.0,
        anchor: 1900.0,
        coefficients: &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197],
    },
    // 1920–1941
    DeltaTSegment {
        year_upper_bound: 1941.0,
        anchor: 1920.0,
        coefficients: &[21.20, 0.84493, -0.076100, 0.0020936],
    },
    // 1941–1961
    DeltaTSegment {
        year_upper_bound: 1961.0,
        anchor: 1950.0,
        coefficients: &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0],
    },
    // 1961–1986
    DeltaTSegment {
        year_upper_bound: 1986.0,
        anchor: 1975.0,
        coefficients: &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0],
    },
    // 1986–2005
    DeltaTSegment {
        year_upper_bound: 2005.0,
        anchor: 2000.0,
        coefficients: &[63.86, 0.3345, -0.060374, 0.0017275, 0.000651814, 0.00002373599],
    },
    // 2005–2050
    DeltaTSegment {
        year_upper_bound: 2050.0,
        anchor: 2000.0,
        coefficients: &[62.92, 0.32217, 0.005589],
    },
    // 2050–2100: the 2005–2050 quadratic carried through the end of 2100.
    DeltaTSegment {
        year_upper_bound: 2101.0,
        anchor: 2000.0,
        coefficients: &[62.92, 0.32217, 0.005589],
    },
    // Long-term parabola −20 + 32·((y − 1820)/100)².
    DeltaTSegment {
        year_upper_bound: f64::INFINITY,
        anchor: 1820.0,
        coefficients: &[-20.0, 0.0, 0.0032],
    },
];

/// Decimal year at the middle of `month` (1-based) of `year`.
#[inline]
pub fn year_fraction(year: f64, month: u32) -> f64 {
    year + (month as f64 - 0.5) / 12.0
}

/// The segment covering `year_fraction`.
///
/// Non-finite inputs fall through to the last segment and evaluate to NaN.
pub fn segment_for(year_fraction: f64) -> &'static DeltaTSegment {
    DELTA_T_SEGMENTS
        .iter()
        .find(|segment| year_fraction < segment.year_upper_bound)
        .unwrap_or(&DELTA_T_SEGMENTS[DELTA_T_SEGMENTS.len() - 1])
}

/// Returns **ΔT** in seconds for the middle of `month` in civil `year`.
///
/// Total over all finite inputs. Years outside [`MODEL_YEARS`] receive a
/// low-confidence extrapolation rather than an error.
#[inline]
pub fn delta_t_seconds(year: f64, month: u32) -> Seconds {
    let y = year_fraction(year, month);
    segment_for(y).evaluate(y)
}

/// Whether `year` lies inside the confidently modelled range.
#[inline]
pub fn is_within_model_range(year: i32) -> bool {
    MODEL_YEARS.contains(&year)
}

// ── Time<UT> convenience method ───────────────────────────────────────────

impl Time<UT> {
    /// Returns **ΔT = TT − UT** in seconds for the civil month of this epoch.
    ///
    /// This is the same correction applied when converting to [`TT`](super::TT).
    #[inline]
    pub fn delta_t(&self) -> Seconds {
        let (year, month) = super::scales::civil_year_month(self.quantity());
        delta_t_seconds(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Seconds, b: f64, tol: f64) -> bool {
        (a.value() - b).abs() < tol
    }

    #[test]
    fn july_2000_uses_the_1986_2005_polynomial() {
        let t: f64 = (2000.0 + 6.5 / 12.0) - 2000.0;
        let powers = [1.0, t, t.powi(2), t.powi(3), t.powi(4), t.powi(5)];
        let coefficients = [63.86, 0.3345, -0.060374, 0.0017275, 0.000651814, 0.00002373599];
        let expected: f64 = coefficients.iter().zip(powers).map(|(c, p)| c * p).sum();
        assert!((t - 0.541_666_666_666).abs() < 1e-9);
        assert!(close(delta_t_seconds(2000.0, 7), expected, 1e-9));
    }

    #[test]
    fn segment_selection_follows_upper_bounds() {
        assert_eq!(segment_for(1899.99).anchor, 1860.0);
        assert_eq!(segment_for(1900.0).anchor, 1900.0);
        assert_eq!(segment_for(1941.0).anchor, 1950.0);
        assert_eq!(segment_for(1985.9).anchor, 1975.0);
        assert_eq!(segment_for(2004.9).coefficients.len(), 6);
        assert_eq!(segment_for(2005.0).coefficients.len(), 3);
        assert_eq!(segment_for(2100.96).anchor, 2000.0);
        assert_eq!(segment_for(2101.0).anchor, 1820.0);
    }

    #[test]
    fn modern_values_are_plausible() {
        // Observed ΔT sat between 63 and 70 s over 2000–2025; the model
        // overshoots slightly towards 2025 but stays in the same regime.
        assert!(close(delta_t_seconds(2000.0, 1), 63.8, 0.5));
        assert!(close(delta_t_seconds(2025.0, 1), 74.5, 1.0));
        assert!(close(delta_t_seconds(1950.0, 1), 29.1, 0.5));
        assert!(close(delta_t_seconds(1900.0, 1), -2.7, 0.5));
    }

    #[test]
    fn supported_range_is_total_and_bounded() {
        for year in MODEL_YEARS {
            for month in 1..=12 {
                let dt = delta_t_seconds(year as f64, month).value();
                assert!(dt.is_finite(), "{year}-{month}");
                assert!((-10.0..=200.0).contains(&dt), "{year}-{month}: {dt}");
            }
        }
    }

    #[test]
    fn end_of_2100_stays_on_the_quadratic() {
        let t = year_fraction(2100.0, 12) - 2000.0;
        let expected = 62.92 + 0.32217 * t + 0.005589 * t * t;
        assert!(close(delta_t_seconds(2100.0, 12), expected, 1e-9));
    }

    #[test]
    fn extrapolation_never_fails() {
        let late = delta_t_seconds(2300.0, 6);
        let u = (year_fraction(2300.0, 6) - 1820.0) / 100.0;
        assert!(close(late, -20.0 + 32.0 * u * u, 1e-6));
        assert!(!is_within_model_range(2300));

        let early = delta_t_seconds(1820.0, 1);
        assert!(early.value().is_finite());
        assert!(!is_within_model_range(1820));
    }

    #[test]
    fn non_finite_year_yields_nan() {
        assert!(delta_t_seconds(f64::NAN, 1).value().is_nan());
    }

    #[test]
    fn ut_convenience_matches_table() {
        // JD 2451726.5 = 2000-07-01T00:00Z
        let ut = Time::<UT>::new(2_451_726.5);
        assert!(close(ut.delta_t(), delta_t_seconds(2000.0, 7).value(), 1e-12));
    }
}
