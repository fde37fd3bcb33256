// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale marker types.
//!
//! Each zero-sized type identifies a time scale and encodes how values in
//! that scale relate to the canonical **Julian Day in TT** (Terrestrial
//! Time), the argument of every ephemeris query.
//!
//! | Marker | Description |
//! |--------|-------------|
//! | [`TT`] | Terrestrial Time, the uniform dynamical axis |
//! | [`UT`] | Universal Time, the civil axis UTC approximates |

use super::instant::{Time, TimeScale};
use chrono::{DateTime, Datelike, Utc};
use qtty::{Day, Days, Seconds};

/// JD of the Unix epoch (1970-01-01T00:00:00Z).
pub(crate) const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

/// Terrestrial Time — the basis for astronomical ephemerides.
///
/// `to_jd_tt(v) = v`: the quantity *is* a Julian Day on the TT axis.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct TT;

impl TimeScale for TT {
    const LABEL: &'static str = "JD(TT)";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Universal Time — the civil time scale tied to Earth's rotation.
///
/// The quantity is a Julian Day on the **UT** axis. Conversion to TT adds
/// the ΔT of the instant's civil month (see [`delta_t`](crate::delta_t));
/// the inverse uses a fixed-point iteration. Leap seconds are not modelled:
/// UTC is taken as UT.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "JD(UT)";

    #[inline]
    fn to_jd_tt(ut_value: Days) -> Days {
        let (year, month) = civil_year_month(ut_value);
        let dt = super::delta_t::delta_t_seconds(year, month);
        ut_value + dt.to::<Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        // Solve ut + ΔT(month(ut))/86400 = tt. ΔT is constant within a month,
        // so this settles after one step except within ~a minute of a month
        // boundary, where the second step lands it.
        let mut ut = jd_tt;
        for _ in 0..3 {
            let (year, month) = civil_year_month(ut);
            ut = jd_tt - super::delta_t::delta_t_seconds(year, month).to::<Day>();
        }
        ut
    }
}

impl Time<UT> {
    /// Shift this UT Julian Day onto the TT axis by an explicit ΔT.
    ///
    /// `jd_tt = jd_ut + ΔT / 86400`.
    #[inline]
    pub fn to_tt(&self, delta_t: Seconds) -> Time<TT> {
        Time::<TT>::from_days(self.quantity() + delta_t.to::<Day>())
    }
}

/// Civil (Gregorian) year and month of a Julian Day on the UT axis.
///
/// Instants beyond chrono's range fall back to a mean-Gregorian-year
/// estimate; non-finite input yields a NaN year.
pub(crate) fn civil_year_month(jd_ut: Days) -> (f64, u32) {
    let days = jd_ut.value();
    if !days.is_finite() {
        return (f64::NAN, 1);
    }
    let seconds = ((jd_ut - UNIX_EPOCH_JD).value() * 86_400.0).floor();
    match DateTime::<Utc>::from_timestamp(seconds as i64, 0) {
        Some(dt) => (dt.year() as f64, dt.month()),
        None => {
            const JD_2000_JAN_0: f64 = 2_451_544.5;
            let year = 2000.0 + (days - JD_2000_JAN_0) / 365.2425;
            let month = ((year - year.floor()) * 12.0).floor() as u32 + 1;
            (year.floor(), month.clamp(1, 12))
        }
    }
}
