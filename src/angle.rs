//! # Angles and Base-60 Arc Measure
//!
//! Every longitude in the model is an `f64` number of degrees. Rambam states
//! his constants in degrees, minutes and seconds of arc, so this module holds
//! the two conversions the rest of the crate relies on:
//!
//! - [`normalize_degrees`]: fold any angle into `[0, 360)`
//! - [`Dms`]: a base-60 arc value that converts to and from decimal degrees

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fold an angle in degrees into the half-open range `[0, 360)`.
///
/// Non-finite input is passed through unchanged so that a bad date shows up
/// downstream as `NaN` instead of a plausible-looking angle.
///
/// # Example
/// ```
/// use rambam_sky::angle::normalize_degrees;
///
/// assert_eq!(normalize_degrees(-30.0), 330.0);
/// assert_eq!(normalize_degrees(720.5), 0.5);
/// ```
pub fn normalize_degrees(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

/// An arc value written the traditional way: degrees, minutes and seconds.
///
/// Seconds are fractional because several of Rambam's rates carry thirds
/// (e.g. the Sun's 0° 59′ 8⅓″ per day).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    pub const ZERO: Dms = Dms::new(0.0, 0.0, 0.0);

    pub const fn new(degrees: f64, minutes: f64, seconds: f64) -> Self {
        Dms {
            degrees,
            minutes,
            seconds,
        }
    }

    /// Decimal degrees: `deg + min/60 + sec/3600`.
    pub fn to_degrees(&self) -> f64 {
        self.degrees + self.minutes / 60.0 + self.seconds / 3600.0
    }

    /// Split a decimal angle into whole degrees, whole minutes and seconds.
    ///
    /// Negative angles carry the sign on every component so that
    /// [`Dms::to_degrees`] round-trips.
    pub fn from_degrees(value: f64) -> Self {
        let sign = if value < 0.0 { -1.0 } else { 1.0 };
        let abs = value.abs();
        let degrees = abs.trunc();
        let minutes_total = (abs - degrees) * 60.0;
        let minutes = minutes_total.trunc();
        let seconds = (minutes_total - minutes) * 60.0;
        Dms::new(sign * degrees, sign * minutes, sign * seconds)
    }

    fn is_negative(&self) -> bool {
        self.degrees < 0.0 || self.minutes < 0.0 || self.seconds < 0.0
    }
}

impl Default for Dms {
    fn default() -> Self {
        Dms::ZERO
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{}{}°{}′{:.2}″",
            sign,
            self.degrees.abs(),
            self.minutes.abs(),
            self.seconds.abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_into_range() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-0.25), 359.75);
        assert_eq!(normalize_degrees(1080.0 + 12.5), 12.5);
        assert!(normalize_degrees(f64::NAN).is_nan());
    }

    #[test]
    fn normalize_never_returns_360() {
        let tiny = -1e-20;
        let folded = normalize_degrees(tiny);
        assert!((0.0..360.0).contains(&folded), "got {folded}");
    }

    #[test]
    fn dms_to_degrees_matches_rambam_sun_rate() {
        let sun = Dms::new(0.0, 59.0, 8.333);
        let expected = 59.0 / 60.0 + 8.333 / 3600.0;
        assert!((sun.to_degrees() - expected).abs() < 1e-15);
    }

    #[test]
    fn dms_decomposes_decimal_degrees() {
        let dms = Dms::from_degrees(26.0 + 45.0 / 60.0 + 8.0 / 3600.0);
        assert_eq!(dms.degrees, 26.0);
        assert_eq!(dms.minutes, 45.0);
        assert!((dms.seconds - 8.0).abs() < 1e-6);
    }

    #[test]
    fn negative_dms_round_trips() {
        let dms = Dms::from_degrees(-0.51);
        assert_eq!(dms.minutes, -30.0);
        assert!((dms.to_degrees() + 0.51).abs() < 1e-12);
        assert!(dms.to_string().starts_with("-0°30′"));
    }

    #[test]
    fn dms_display() {
        assert_eq!(Dms::new(13.0, 10.0, 35.133).to_string(), "13°10′35.13″");
    }
}
