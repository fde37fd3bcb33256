// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Yearly scan of all 24 solar terms.
//!
//! A calendar year `[Jan 1 00:00, next Jan 1 00:00)` is cut into 24 equal
//! slots. Each slot, widened by the configured padding and clamped to at most
//! `max_overhang` outside the year, is the search window for the one term
//! that falls in that stretch of the year. The first term of every Gregorian
//! year is Minor Cold (285°), so slot `j` searches term
//! `(first_slot_index + j) mod 24`.
//!
//! ```no_run
//! use solar_terms::{MeeusSun, TermScanner};
//!
//! let scanner = TermScanner::with_defaults(MeeusSun);
//! for event in scanner.scan_year(2025)? {
//!     println!("{} {}", event.instant_utc, event.term);
//! }
//! # Ok::<(), solar_terms::SolarTermError>(())
//! ```

use crate::config::ScanConfig;
use crate::delta_t::is_within_model_range;
use crate::error::SolarTermError;
use crate::locator::TermLocator;
use crate::period::UtcPeriod;
use crate::sun::SolarLongitudeProvider;
use crate::term::{SolarTerm, SolarTermEvent, TERMS_PER_YEAR};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};

/// Search window assigned to one term of one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermWindow {
    /// Term searched in this window.
    pub term: SolarTerm,
    /// Position of the slot within the calendar year, `0..24`.
    pub slot: u8,
    /// Padded and clamped search interval.
    pub period: UtcPeriod,
}

/// Computes the 24 solar-term events of calendar years.
#[derive(Debug, Clone)]
pub struct TermScanner<P> {
    provider: P,
    config: ScanConfig,
}

impl<P: SolarLongitudeProvider> TermScanner<P> {
    /// Build a scanner, validating `config`.
    pub fn new(provider: P, config: ScanConfig) -> Result<Self, SolarTermError> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// Scanner with [`ScanConfig::default`].
    pub fn with_defaults(provider: P) -> Self {
        Self {
            provider,
            config: ScanConfig::default(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The 24 search windows of `year`, ordered by term index.
    ///
    /// Fails with [`SolarTermError::InvalidYear`] when a window of `year`
    /// would leave chrono's representable range.
    pub fn windows(&self, year: i32) -> Result<Vec<TermWindow>, SolarTermError> {
        let invalid_year = || SolarTermError::InvalidYear { year };
        let next_year = year.checked_add(1).ok_or_else(invalid_year)?;
        let year_span = UtcPeriod::new(
            new_year(year)?,
            new_year(next_year).map_err(|_| invalid_year())?,
        );
        let overhang = self.config.overhang_delta();
        let bounds = UtcPeriod::new(
            year_span.start.checked_sub_signed(overhang).ok_or_else(invalid_year)?,
            year_span.end.checked_add_signed(overhang).ok_or_else(invalid_year)?,
        );
        let padding = self.config.padding_delta();
        let span = year_span.duration();
        let slots = TERMS_PER_YEAR as i32;

        let mut windows = Vec::with_capacity(TERMS_PER_YEAR);
        for (slot, offset) in (0..slots).zip(0u8..) {
            let raw = UtcPeriod::new(
                year_span.start + span * slot / slots,
                year_span.start + span * (slot + 1) / slots,
            );
            let index = (self.config.first_slot_index + offset) % TERMS_PER_YEAR as u8;
            let term = SolarTerm::from_index(index)
                .ok_or_else(|| SolarTermError::InvalidConfig(format!("term index {index}")))?;
            windows.push(TermWindow {
                term,
                slot: offset,
                period: raw.padded_within(padding, &bounds).ok_or_else(invalid_year)?,
            });
        }
        windows.sort_by_key(|window| window.term);
        Ok(windows)
    }

    /// All 24 events of `year`, ascending by instant.
    ///
    /// A provider failure aborts the whole year.
    pub fn scan_year(&self, year: i32) -> Result<Vec<SolarTermEvent>, SolarTermError> {
        if !is_within_model_range(year) {
            warn!("year {year} lies outside the ΔT model range; results are extrapolated");
        }

        let locator = TermLocator::new(&self.provider, &self.config.locator);
        let mut events = Vec::with_capacity(TERMS_PER_YEAR);
        for window in self.windows(year)? {
            let crossing = locator.locate(window.term.longitude(), &window.period)?;
            debug!(
                "{year} #{:02} {} at {} ({:?}, residual {:.2e}°)",
                window.term.index(),
                window.term,
                crossing.instant,
                crossing.outcome,
                crossing.residual.value()
            );
            events.push(SolarTermEvent {
                year,
                term: window.term,
                instant_utc: crossing.instant,
                outcome: crossing.outcome,
            });
        }

        events.sort_by_key(|event| event.instant_utc);
        verify_year(year, &events)?;
        Ok(events)
    }

    /// Events of every year in `start_year..=end_year`, by year then instant.
    pub fn scan_range(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<SolarTermEvent>, SolarTermError> {
        self.check_range(start_year, end_year)?;
        let mut events = Vec::new();
        for year in start_year..=end_year {
            events.extend(self.scan_year(year)?);
        }
        info!(
            "scanned {} events for {start_year}..={end_year}",
            events.len()
        );
        Ok(events)
    }

    /// [`scan_range`](Self::scan_range) over the configured years.
    pub fn scan_configured(&self) -> Result<Vec<SolarTermEvent>, SolarTermError> {
        self.scan_range(self.config.start_year, self.config.end_year)
    }

    fn check_range(&self, start_year: i32, end_year: i32) -> Result<(), SolarTermError> {
        if start_year > end_year {
            return Err(SolarTermError::InvalidYearRange {
                start: start_year,
                end: end_year,
            });
        }
        Ok(())
    }
}

#[cfg(feature = "parallel")]
impl<P: SolarLongitudeProvider + Sync> TermScanner<P> {
    /// [`scan_range`](Self::scan_range) with the years spread over the rayon
    /// thread pool. The output order is the same.
    pub fn par_scan_range(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<SolarTermEvent>, SolarTermError> {
        use rayon::prelude::*;

        self.check_range(start_year, end_year)?;
        let per_year = (start_year..=end_year)
            .into_par_iter()
            .map(|year| self.scan_year(year))
            .collect::<Result<Vec<_>, _>>()?;
        let events: Vec<_> = per_year.into_iter().flatten().collect();
        info!(
            "scanned {} events for {start_year}..={end_year}",
            events.len()
        );
        Ok(events)
    }

    /// [`par_scan_range`](Self::par_scan_range) over the configured years.
    pub fn par_scan_configured(&self) -> Result<Vec<SolarTermEvent>, SolarTermError> {
        self.par_scan_range(self.config.start_year, self.config.end_year)
    }
}

/// 00:00 UTC on January 1 of `year`.
fn new_year(year: i32) -> Result<DateTime<Utc>, SolarTermError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or(SolarTermError::InvalidYear { year })
}

/// 24 distinct terms at strictly increasing instants.
fn verify_year(year: i32, events: &[SolarTermEvent]) -> Result<(), SolarTermError> {
    if events.len() != TERMS_PER_YEAR {
        return Err(SolarTermError::IncompleteYear {
            year,
            reason: "expected 24 events",
        });
    }
    let seen = events
        .iter()
        .fold(0u32, |mask, event| mask | 1 << event.index());
    if seen.count_ones() as usize != TERMS_PER_YEAR {
        return Err(SolarTermError::IncompleteYear {
            year,
            reason: "duplicate term index",
        });
    }
    if !events
        .windows(2)
        .all(|pair| pair[0].instant_utc < pair[1].instant_utc)
    {
        return Err(SolarTermError::IncompleteYear {
            year,
            reason: "instants not strictly increasing",
        });
    }
    Ok(())
}
