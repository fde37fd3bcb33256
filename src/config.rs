// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Engine configuration.
//!
//! Every numeric policy of the search (year range, window padding, iteration
//! caps, convergence tolerance) lives here rather than in the algorithms, so
//! the same engine serves other ranges or precisions without code edits.
//!
//! With the `serde` feature a [`ScanConfig`] can be read from TOML; every
//! key is optional and falls back to the defaults below.
//!
//! ```toml
//! start_year = 1950
//! end_year = 2050
//! window_padding_days = 4.0
//! max_overhang_days = 7.0
//!
//! [locator]
//! coarse_steps = 60
//! max_iterations = 50
//! tolerance_deg = 1e-6
//! minute_search_radius = 5
//! ```

use crate::error::SolarTermError;
use chrono::TimeDelta;
use qtty::{Days, Degrees};

/// Upper bound for `window_padding` and `max_overhang`.
pub const MAX_WINDOW_EXTENSION: Days = Days::new(366.0);

/// Root-finding policy for a single term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatorConfig {
    /// Sub-intervals of the coarse scan; `coarse_steps + 1` samples.
    pub coarse_steps: u32,
    /// Bisection iteration cap.
    pub max_iterations: u32,
    /// Early-exit threshold on `|diff|`.
    pub tolerance: Degrees,
    /// Whole minutes examined on each side of the truncated root.
    pub minute_search_radius: u32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            coarse_steps: 60,
            max_iterations: 50,
            tolerance: Degrees::new(1e-6),
            minute_search_radius: 5,
        }
    }
}

impl LocatorConfig {
    /// Reject settings the locator cannot work with.
    pub fn validate(&self) -> Result<(), SolarTermError> {
        if self.coarse_steps == 0 {
            return Err(SolarTermError::InvalidConfig(
                "coarse_steps must be >= 1".into(),
            ));
        }
        let tolerance = self.tolerance.value();
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(SolarTermError::InvalidConfig(format!(
                "tolerance must be finite and positive, got {tolerance}"
            )));
        }
        Ok(())
    }
}

/// Whole-run policy for the yearly scanner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// First year of the configured range.
    pub start_year: i32,
    /// Last year of the configured range (inclusive).
    pub end_year: i32,
    /// Widening applied on both sides of each evenly spaced slot.
    pub window_padding: Days,
    /// How far a window may reach outside the calendar year.
    pub max_overhang: Days,
    /// Term index of the first slot of a calendar year (285°, Minor Cold).
    pub first_slot_index: u8,
    /// Per-term root-finding policy.
    pub locator: LocatorConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start_year: 1900,
            end_year: 2100,
            window_padding: Days::new(4.0),
            max_overhang: Days::new(7.0),
            first_slot_index: 19,
            locator: LocatorConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Default policy over a different year range.
    pub fn for_years(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
            ..Self::default()
        }
    }

    /// Reject inconsistent settings.
    pub fn validate(&self) -> Result<(), SolarTermError> {
        if self.start_year > self.end_year {
            return Err(SolarTermError::InvalidYearRange {
                start: self.start_year,
                end: self.end_year,
            });
        }
        for (name, days) in [
            ("window_padding", self.window_padding),
            ("max_overhang", self.max_overhang),
        ] {
            let value = days.value();
            if !value.is_finite() || value < 0.0 || days > MAX_WINDOW_EXTENSION {
                return Err(SolarTermError::InvalidConfig(format!(
                    "{name} must lie in [0, {}] days, got {value}",
                    MAX_WINDOW_EXTENSION.value()
                )));
            }
        }
        if self.first_slot_index >= 24 {
            return Err(SolarTermError::InvalidConfig(format!(
                "first_slot_index must be < 24, got {}",
                self.first_slot_index
            )));
        }
        self.locator.validate()
    }

    /// Window padding as a chrono duration.
    pub fn padding_delta(&self) -> TimeDelta {
        days_to_delta(self.window_padding)
    }

    /// Maximum overhang as a chrono duration.
    pub fn overhang_delta(&self) -> TimeDelta {
        days_to_delta(self.max_overhang)
    }
}

/// Whole milliseconds in `days`.
fn days_to_delta(days: Days) -> TimeDelta {
    TimeDelta::milliseconds((days.value() * 86_400_000.0).round() as i64)
}

#[cfg(feature = "serde")]
mod toml_support {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct RawLocator {
        coarse_steps: u32,
        max_iterations: u32,
        tolerance_deg: f64,
        minute_search_radius: u32,
    }

    impl Default for RawLocator {
        fn default() -> Self {
            let d = LocatorConfig::default();
            Self {
                coarse_steps: d.coarse_steps,
                max_iterations: d.max_iterations,
                tolerance_deg: d.tolerance.value(),
                minute_search_radius: d.minute_search_radius,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct RawScan {
        start_year: i32,
        end_year: i32,
        window_padding_days: f64,
        max_overhang_days: f64,
        first_slot_index: u8,
        locator: RawLocator,
    }

    impl Default for RawScan {
        fn default() -> Self {
            let d = ScanConfig::default();
            Self {
                start_year: d.start_year,
                end_year: d.end_year,
                window_padding_days: d.window_padding.value(),
                max_overhang_days: d.max_overhang.value(),
                first_slot_index: d.first_slot_index,
                locator: RawLocator::default(),
            }
        }
    }

    impl ScanConfig {
        /// Parse and validate a TOML document.
        pub fn from_toml_str(source: &str) -> Result<Self, SolarTermError> {
            let raw: RawScan = toml::from_str(source)?;
            let config = ScanConfig {
                start_year: raw.start_year,
                end_year: raw.end_year,
                window_padding: Days::new(raw.window_padding_days),
                max_overhang: Days::new(raw.max_overhang_days),
                first_slot_index: raw.first_slot_index,
                locator: LocatorConfig {
                    coarse_steps: raw.locator.coarse_steps,
                    max_iterations: raw.locator.max_iterations,
                    tolerance: Degrees::new(raw.locator.tolerance_deg),
                    minute_search_radius: raw.locator.minute_search_radius,
                },
            };
            config.validate()?;
            Ok(config)
        }
    }
}
