//! The twelve mazalot, each a 30° sector of the ecliptic starting at Aries.

use crate::angle::normalize_degrees;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constellation {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Width of one mazal in degrees.
pub const SECTOR_DEGREES: f64 = 30.0;

impl Constellation {
    pub const ALL: [Constellation; 12] = [
        Constellation::Aries,
        Constellation::Taurus,
        Constellation::Gemini,
        Constellation::Cancer,
        Constellation::Leo,
        Constellation::Virgo,
        Constellation::Libra,
        Constellation::Scorpio,
        Constellation::Sagittarius,
        Constellation::Capricorn,
        Constellation::Aquarius,
        Constellation::Pisces,
    ];

    /// Sector containing `longitude`. `None` only for non-finite input.
    pub fn from_longitude(longitude: f64) -> Option<Constellation> {
        if !longitude.is_finite() {
            return None;
        }
        let index = (normalize_degrees(longitude) / SECTOR_DEGREES).floor() as usize;
        Self::ALL.get(index).copied()
    }

    pub fn from_index(index: usize) -> Option<Constellation> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Longitude of the first degree of this sector.
    pub fn start_longitude(self) -> f64 {
        self.index() as f64 * SECTOR_DEGREES
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Constellation::Aries => "Aries",
            Constellation::Taurus => "Taurus",
            Constellation::Gemini => "Gemini",
            Constellation::Cancer => "Cancer",
            Constellation::Leo => "Leo",
            Constellation::Virgo => "Virgo",
            Constellation::Libra => "Libra",
            Constellation::Scorpio => "Scorpio",
            Constellation::Sagittarius => "Sagittarius",
            Constellation::Capricorn => "Capricorn",
            Constellation::Aquarius => "Aquarius",
            Constellation::Pisces => "Pisces",
        }
    }

    pub fn hebrew_name(self) -> &'static str {
        match self {
            Constellation::Aries => "טלה",
            Constellation::Taurus => "שור",
            Constellation::Gemini => "תאומים",
            Constellation::Cancer => "סרטן",
            Constellation::Leo => "אריה",
            Constellation::Virgo => "בתולה",
            Constellation::Libra => "מאזנים",
            Constellation::Scorpio => "עקרב",
            Constellation::Sagittarius => "קשת",
            Constellation::Capricorn => "גדי",
            Constellation::Aquarius => "דלי",
            Constellation::Pisces => "דגים",
        }
    }

    pub fn transliteration(self) -> &'static str {
        match self {
            Constellation::Aries => "Taleh",
            Constellation::Taurus => "Shor",
            Constellation::Gemini => "Teomim",
            Constellation::Cancer => "Sartan",
            Constellation::Leo => "Aryeh",
            Constellation::Virgo => "Betulah",
            Constellation::Libra => "Moznayim",
            Constellation::Scorpio => "Akrav",
            Constellation::Sagittarius => "Keshet",
            Constellation::Capricorn => "G'di",
            Constellation::Aquarius => "D'li",
            Constellation::Pisces => "Dagim",
        }
    }
}

impl fmt::Display for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.english_name())
    }
}

/// Degrees past the start of the containing sector, in `[0, 30)`.
pub fn position_in_constellation(longitude: f64) -> f64 {
    let position = normalize_degrees(longitude).rem_euclid(SECTOR_DEGREES);
    if position >= SECTOR_DEGREES {
        0.0
    } else {
        position
    }
}
