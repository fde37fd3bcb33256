// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Solar Terms
//!
//! UTC instants of the 24 solar terms (節氣): the moments the Sun's apparent
//! ecliptic longitude reaches an integer multiple of 15°, located to the
//! minute.
//!
//! # Core types
//!
//! - [`Time<S>`] — generic instant parameterised by a [`TimeScale`] marker.
//! - [`TimeScale`] — trait that defines a time scale and its JD(TT) conversions.
//! - [`UniversalTime`] / [`TerrestrialTime`] — aliases for `Time<UT>` / `Time<TT>`.
//! - [`Interval<T>`] / [`UtcPeriod`] — search windows over any [`TimeInstant`].
//! - [`SolarLongitudeProvider`] — the ephemeris boundary; [`MeeusSun`] is the
//!   bundled analytic implementation.
//! - [`TermLocator`] — finds one longitude crossing inside a window.
//! - [`TermScanner`] — all 24 terms of a year, or of a range of years.
//! - [`SolarTerm`], [`SolarTermEvent`], [`SolarTermRecord`] — results.
//!
//! # Time scales
//!
//! | Marker | Scale |
//! |--------|-------|
//! | [`TT`] | Terrestrial Time |
//! | [`UT`] | Universal Time (Earth rotation) |
//!
//! # ΔT (Delta T)
//!
//! The difference **ΔT = TT − UT** comes from a table of piecewise
//! polynomials in the civil year and month ([`delta_t_seconds`]). It is
//! applied automatically by the [`UT`] time scale, and explicitly by
//! [`Time::<UT>::to_tt`](Time::to_tt). Years outside 1900–2100 are
//! extrapolated.
//!
//! # Example
//!
//! ```
//! use solar_terms::{MeeusSun, SolarTerm, TermScanner};
//!
//! let scanner = TermScanner::with_defaults(MeeusSun);
//! let events = scanner.scan_year(2025)?;
//! assert_eq!(events.len(), 24);
//!
//! let equinox = events.iter().find(|e| e.term == SolarTerm::SpringEquinox).unwrap();
//! assert_eq!(equinox.instant_utc.format("%m-%d").to_string(), "03-20");
//! # Ok::<(), solar_terms::SolarTermError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`SolarTermRecord`] and TOML
//!   loading via `ScanConfig::from_toml_str`.
//! - `parallel`: `TermScanner::par_scan_range` scans years on the rayon pool.

mod config;
mod delta_t;
mod error;
pub(crate) mod instant;
mod julian_date_ext;
mod locator;
mod period;
pub(crate) mod scales;
mod scanner;
mod sun;
mod term;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use config::{LocatorConfig, ScanConfig};
pub use delta_t::{
    delta_t_seconds, is_within_model_range, year_fraction, DeltaTSegment, DELTA_T_SEGMENTS,
    MODEL_YEARS,
};
pub use error::{EphemerisError, SolarTermError};
pub use instant::{Time, TimeInstant, TimeScale};
pub use locator::{angular_difference, LocateOutcome, TermCrossing, TermLocator};
pub use period::{Interval, UtcPeriod};
pub use scales::{TT, UT};
pub use scanner::{TermScanner, TermWindow};
pub use sun::{normalize_degrees, MeeusSun, SolarLongitudeProvider};
pub use term::{
    next_term_after, previous_term_at_or_before, SolarTerm, SolarTermEvent, SolarTermRecord,
    DEGREES_PER_TERM, TERMS_PER_YEAR,
};

// ── Type aliases ──────────────────────────────────────────────────────────

/// Universal Time — Julian Day on the Earth-rotation axis.
///
/// This is a type alias for [`Time<UT>`].
pub type UniversalTime = Time<UT>;

/// Terrestrial Time — Julian Day on the axis ephemerides are evaluated on.
///
/// This is a type alias for [`Time<TT>`].
pub type TerrestrialTime = Time<TT>;
