// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Solar terms and located solar-term events.
//!
//! Terms are indexed by ecliptic longitude: index `k` is the crossing of
//! `15·k` degrees, so index 0 is the March equinox and index 18 the December
//! solstice. Odd indices are the twelve *sectional* terms (節, jie) that open
//! a solar month; even indices are the *principal* terms (中氣, zhongqi).

use crate::locator::LocateOutcome;
use chrono::{DateTime, SecondsFormat, Utc};
use qtty::Degrees;

/// Number of solar terms in a tropical year.
pub const TERMS_PER_YEAR: usize = 24;

/// Degrees of solar longitude between consecutive terms.
pub const DEGREES_PER_TERM: f64 = 15.0;

/// The 24 solar terms, in longitude order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SolarTerm {
    SpringEquinox = 0,
    ClearAndBright,
    GrainRain,
    StartOfSummer,
    GrainBuds,
    GrainInEar,
    SummerSolstice,
    MinorHeat,
    MajorHeat,
    StartOfAutumn,
    EndOfHeat,
    WhiteDew,
    AutumnEquinox,
    ColdDew,
    FrostsDescent,
    StartOfWinter,
    MinorSnow,
    MajorSnow,
    WinterSolstice,
    MinorCold,
    MajorCold,
    StartOfSpring,
    RainWater,
    AwakeningOfInsects,
}

impl SolarTerm {
    /// All terms in index order.
    pub const ALL: [SolarTerm; TERMS_PER_YEAR] = [
        SolarTerm::SpringEquinox,
        SolarTerm::ClearAndBright,
        SolarTerm::GrainRain,
        SolarTerm::StartOfSummer,
        SolarTerm::GrainBuds,
        SolarTerm::GrainInEar,
        SolarTerm::SummerSolstice,
        SolarTerm::MinorHeat,
        SolarTerm::MajorHeat,
        SolarTerm::StartOfAutumn,
        SolarTerm::EndOfHeat,
        SolarTerm::WhiteDew,
        SolarTerm::AutumnEquinox,
        SolarTerm::ColdDew,
        SolarTerm::FrostsDescent,
        SolarTerm::StartOfWinter,
        SolarTerm::MinorSnow,
        SolarTerm::MajorSnow,
        SolarTerm::WinterSolstice,
        SolarTerm::MinorCold,
        SolarTerm::MajorCold,
        SolarTerm::StartOfSpring,
        SolarTerm::RainWater,
        SolarTerm::AwakeningOfInsects,
    ];

    /// The term at `index`, if `index < 24`.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Position of this term, `0..24`.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Target solar longitude, `(15 · index) mod 360`.
    #[inline]
    pub fn longitude(self) -> Degrees {
        Degrees::new((DEGREES_PER_TERM * self.index() as f64) % 360.0)
    }

    /// Whether this is a sectional term (odd multiple of 15°).
    #[inline]
    pub fn is_sectional(self) -> bool {
        self.index() % 2 == 1
    }

    /// English name.
    pub fn name(self) -> &'static str {
        match self {
            SolarTerm::SpringEquinox => "Spring Equinox",
            SolarTerm::ClearAndBright => "Clear and Bright",
            SolarTerm::GrainRain => "Grain Rain",
            SolarTerm::StartOfSummer => "Start of Summer",
            SolarTerm::GrainBuds => "Grain Buds",
            SolarTerm::GrainInEar => "Grain in Ear",
            SolarTerm::SummerSolstice => "Summer Solstice",
            SolarTerm::MinorHeat => "Minor Heat",
            SolarTerm::MajorHeat => "Major Heat",
            SolarTerm::StartOfAutumn => "Start of Autumn",
            SolarTerm::EndOfHeat => "End of Heat",
            SolarTerm::WhiteDew => "White Dew",
            SolarTerm::AutumnEquinox => "Autumn Equinox",
            SolarTerm::ColdDew => "Cold Dew",
            SolarTerm::FrostsDescent => "Frost's Descent",
            SolarTerm::StartOfWinter => "Start of Winter",
            SolarTerm::MinorSnow => "Minor Snow",
            SolarTerm::MajorSnow => "Major Snow",
            SolarTerm::WinterSolstice => "Winter Solstice",
            SolarTerm::MinorCold => "Minor Cold",
            SolarTerm::MajorCold => "Major Cold",
            SolarTerm::StartOfSpring => "Start of Spring",
            SolarTerm::RainWater => "Rain Water",
            SolarTerm::AwakeningOfInsects => "Awakening of Insects",
        }
    }
}

impl std::fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One located solar-term boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarTermEvent {
    /// Calendar year whose scan produced the event.
    pub year: i32,
    /// Which term was crossed.
    pub term: SolarTerm,
    /// Crossing instant, truncated to the whole minute.
    pub instant_utc: DateTime<Utc>,
    /// How the instant was obtained.
    pub outcome: LocateOutcome,
}

impl SolarTermEvent {
    /// Precision claimed for `instant_utc`.
    pub const PRECISION_MINUTES: u32 = 1;

    /// Term index, `0..24`.
    #[inline]
    pub fn index(&self) -> u8 {
        self.term.index()
    }

    /// Target longitude, `(15 · index) mod 360`.
    #[inline]
    pub fn target_longitude(&self) -> Degrees {
        self.term.longitude()
    }

    /// The flat row written by downstream table writers.
    pub fn to_record(&self) -> SolarTermRecord {
        SolarTermRecord {
            year: self.year,
            term_index: self.index(),
            ecliptic_longitude_deg: self.target_longitude().value() as i32,
            utc_time: self.instant_utc.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Serialised row shape: `year, term_index, ecliptic_longitude_deg, utc_time`.
///
/// `utc_time` is ISO-8601 with a `Z` suffix and no fractional seconds, e.g.
/// `2025-03-20T09:01:00Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolarTermRecord {
    pub year: i32,
    pub term_index: u8,
    pub ecliptic_longitude_deg: i32,
    pub utc_time: String,
}

impl SolarTermRecord {
    /// Column names in serialisation order.
    pub const COLUMNS: [&'static str; 4] =
        ["year", "term_index", "ecliptic_longitude_deg", "utc_time"];
}

/// First event strictly after `instant` in an instant-ordered slice.
pub fn next_term_after(
    events: &[SolarTermEvent],
    instant: DateTime<Utc>,
) -> Option<&SolarTermEvent> {
    let position = events.partition_point(|event| event.instant_utc <= instant);
    events.get(position)
}

/// Last event at or before `instant` in an instant-ordered slice.
///
/// This is the term "in force" at `instant`.
pub fn previous_term_at_or_before(
    events: &[SolarTermEvent],
    instant: DateTime<Utc>,
) -> Option<&SolarTermEvent> {
    let position = events.partition_point(|event| event.instant_utc <= instant);
    position.checked_sub(1).and_then(|i| events.get(i))
}
