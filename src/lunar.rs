//! Moon-only quantities: latitude, first visibility, phase and brightness.
//!
//! These are simplified stand-ins for the full computation in chapters 15 to
//! 17. Latitude is a sine over a fixed cycle, visibility is elongation plus a
//! fraction of |latitude|, and phase is a four-way split of elongation.

use crate::angle::normalize_degrees;
use crate::config::NodeConstants;
use chrono::{DateTime, Utc};
use core::f64::consts::TAU;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Four quarters of the synodic month, keyed by elongation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    /// Elongation in `[0, 90)`
    WaxingCrescent,
    /// Elongation in `[90, 180)`
    WaxingGibbous,
    /// Elongation in `[180, 270)`
    WaningGibbous,
    /// Elongation in `[270, 360)`
    WaningCrescent,
}

impl MoonPhase {
    /// Classify an elongation already folded into `[0, 360)`.
    ///
    /// Anything that is not below 270 (including `NaN`) lands in the last
    /// bucket.
    pub fn from_elongation(elongation: f64) -> MoonPhase {
        if elongation < 90.0 {
            MoonPhase::WaxingCrescent
        } else if elongation < 180.0 {
            MoonPhase::WaxingGibbous
        } else if elongation < 270.0 {
            MoonPhase::WaningGibbous
        } else {
            MoonPhase::WaningCrescent
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ecliptic latitude proxy: `amplitude * sin(2π * (days mod cycle) / cycle)`.
pub fn latitude(days_from_base: i64, amplitude: f64, cycle_days: f64) -> f64 {
    let phase = (days_from_base as f64).rem_euclid(cycle_days) / cycle_days;
    amplitude * (TAU * phase).sin()
}

/// Elongation widened by a share of the Moon's distance from the ecliptic.
pub fn first_visibility_angle(elongation: f64, latitude: f64, latitude_weight: f64) -> f64 {
    elongation + latitude_weight * latitude.abs()
}

/// True within `window` degrees either side of conjunction.
pub fn is_near_new_moon(elongation: f64, window: f64) -> bool {
    elongation < window || elongation > 360.0 - window
}

/// Fraction of the disc lit: 0 at conjunction, 1 at opposition.
pub fn illumination_fraction(elongation: f64) -> f64 {
    (1.0 - elongation.to_radians().cos()) / 2.0
}

/// Map the lit fraction linearly onto `min..=max` percent.
///
/// The floor keeps a new moon drawn as a dark grey disc.
pub fn brightness(illumination_fraction: f64, min: f64, max: f64) -> f64 {
    min + illumination_fraction * (max - min)
}

/// Longitude of the ascending node (rosh) at `date`.
///
/// Uses fractional days since the node epoch and a constant retrograde rate.
/// Not part of the snapshot; kept for callers that draw the node line.
pub fn ascending_node_longitude(date: DateTime<Utc>, node: &NodeConstants) -> f64 {
    let epoch = node.epoch.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let days = (date - epoch).num_milliseconds() as f64 / 86_400_000.0;
    normalize_degrees(days * node.regression_per_day)
}
