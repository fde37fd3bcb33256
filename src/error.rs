// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for solar-term computation.

use chrono::{DateTime, Utc};

/// Failure reported by a [`SolarLongitudeProvider`](crate::SolarLongitudeProvider).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EphemerisError {
    /// The requested Julian Day is NaN or infinite.
    #[error("julian day {jd} is not finite")]
    NonFiniteJulianDay {
        /// The offending Julian Day (TT).
        jd: f64,
    },

    /// The requested Julian Day lies outside the provider's validity domain.
    #[error("julian day {jd} outside ephemeris domain: {reason}")]
    OutOfDomain {
        /// The offending Julian Day (TT).
        jd: f64,
        /// Human-readable description of the domain.
        reason: String,
    },
}

/// Error type for every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum SolarTermError {
    /// The longitude provider failed; the enclosing year is aborted.
    #[error("ephemeris failure: {0}")]
    Ephemeris(#[from] EphemerisError),

    /// A search window whose end does not lie after its start.
    #[error("search window is empty or inverted: {start} .. {end}")]
    InvalidWindow {
        /// Window start.
        start: DateTime<Utc>,
        /// Window end.
        end: DateTime<Utc>,
    },

    /// The calendar year cannot be represented as UTC instants.
    #[error("year {year} is not representable")]
    InvalidYear {
        /// The rejected year.
        year: i32,
    },

    /// `start_year` lies after `end_year`.
    #[error("invalid year range: {start} > {end}")]
    InvalidYearRange {
        /// First year of the range.
        start: i32,
        /// Last year of the range.
        end: i32,
    },

    /// A computed instant fell outside chrono's representable range.
    #[error("instant at julian day {jd} is not representable as UTC")]
    UnrepresentableInstant {
        /// The Julian Day (UT) that could not be converted.
        jd: f64,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A year's events violate the per-year ordering invariants.
    #[error("year {year} produced an inconsistent term set: {reason}")]
    IncompleteYear {
        /// The scanned year.
        year: i32,
        /// Which invariant failed.
        reason: &'static str,
    },

    /// A TOML configuration document could not be parsed.
    #[cfg(feature = "serde")]
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
