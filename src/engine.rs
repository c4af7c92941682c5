//! # Position Engine
//!
//! Converts an instant into an [`AstronomicalSnapshot`]: mean and true
//! longitudes of Sun and Moon, the maslul and its correction, lunar latitude,
//! elongation, visibility, phase and the current season.
//!
//! The computation is a pure function of the whole number of days elapsed
//! since the epoch and of the [`AstronomicalConstants`] it is given. Two calls
//! with the same inputs produce bit-identical snapshots, and nothing is cached
//! or mutated between calls, so the engine can be shared freely across threads.
//!
//! ## Sun
//! 1. `days = floor((date - epoch) / 1 day)`
//! 2. `mean = norm(start + rate * days)`
//! 3. `apogee = norm(apogee_start + constellation * 30 + drift * days)`
//! 4. `maslul = norm(mean - apogee)`
//! 5. `correction` from the table (mirrored past 180°)
//! 6. `true = mean + correction` while `maslul <= 180`, otherwise `mean - correction`
//!
//! ## Moon
//! Mean longitude and maslul advance at their own rates; the same table gives
//! the correction, which is always added. Elongation is measured from the
//! Sun's true longitude.

use crate::angle::normalize_degrees;
use crate::config::AstronomicalConstants;
use crate::lunar::{self, MoonPhase};
use crate::season::{season_info, SeasonInfo};
use crate::zodiac::{position_in_constellation, Constellation};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SunPosition {
    pub mean_longitude: f64,
    /// Longitude of the govah (apogee)
    pub apogee: f64,
    pub maslul: f64,
    pub maslul_correction: f64,
    pub true_longitude: f64,
    /// Sector of the true longitude
    pub constellation: Option<Constellation>,
    pub position_in_constellation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonPosition {
    pub mean_longitude: f64,
    /// True longitude after the maslul correction
    pub corrected_longitude: f64,
    /// Signed degrees north of the ecliptic
    pub latitude: f64,
    pub maslul: f64,
    pub maslul_correction: f64,
    /// Moon true longitude minus Sun true longitude, in `[0, 360)`
    pub elongation: f64,
    pub first_visibility_angle: f64,
    pub is_visible: bool,
    pub phase: MoonPhase,
    pub is_near_new_moon: bool,
    pub illumination_fraction: f64,
    /// Display brightness in percent
    pub brightness: f64,
    /// Sector of the corrected longitude
    pub constellation: Option<Constellation>,
    pub position_in_constellation: f64,
}

/// Everything derived from one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AstronomicalSnapshot {
    /// Whole days since the epoch, negative before it
    pub days_from_base: i64,
    pub sun: SunPosition,
    pub moon: MoonPosition,
    pub season: SeasonInfo,
}

/// Rambam's constants, built on first use and shared for the process lifetime.
pub fn rambam_constants() -> &'static AstronomicalConstants {
    static CONSTANTS: OnceLock<AstronomicalConstants> = OnceLock::new();
    CONSTANTS.get_or_init(AstronomicalConstants::default)
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

/// Whole days from `base` to `date`, rounded toward negative infinity.
///
/// Counted between UTC calendar dates, so any instant before midnight belongs
/// to the previous day however close to midnight it is.
pub fn days_from_base(date: DateTime<Utc>, base: NaiveDate) -> i64 {
    date.date_naive().signed_duration_since(base).num_days()
}

/// Snapshot for `date` using Rambam's constants.
pub fn compute_snapshot(date: DateTime<Utc>) -> AstronomicalSnapshot {
    compute_snapshot_with(date, rambam_constants())
}

/// Snapshot for `date` using the given constants.
pub fn compute_snapshot_with(
    date: DateTime<Utc>,
    constants: &AstronomicalConstants,
) -> AstronomicalSnapshot {
    let days = days_from_base(date, constants.epoch.base_date);
    snapshot_for_days(days, constants)
}

/// Snapshot for a day count from the epoch.
pub fn snapshot_for_days(days: i64, constants: &AstronomicalConstants) -> AstronomicalSnapshot {
    log::debug!("computing snapshot for day {days} from epoch");

    let sun = sun_position(days, constants);
    let moon = moon_position(days, sun.true_longitude, constants);

    AstronomicalSnapshot {
        days_from_base: days,
        sun,
        moon,
        season: season_info(days),
    }
}

fn sun_position(days: i64, constants: &AstronomicalConstants) -> SunPosition {
    let sun = &constants.sun;
    let elapsed = days as f64;

    let mean_longitude = normalize_degrees(
        sun.start_position.to_degrees() + sun.mean_motion_per_day.to_degrees() * elapsed,
    );
    let apogee = normalize_degrees(
        constants.sun_apogee_at_epoch() + constants.sun_apogee_motion_per_day() * elapsed,
    );
    let maslul = normalize_degrees(mean_longitude - apogee);
    let maslul_correction = constants.corrections.correction_at(maslul);

    let true_longitude = if maslul <= 180.0 {
        normalize_degrees(mean_longitude + maslul_correction)
    } else {
        normalize_degrees(mean_longitude - maslul_correction)
    };

    log::debug!(
        "sun: mean {mean_longitude:.4} apogee {apogee:.4} maslul {maslul:.4} -> true {true_longitude:.4}"
    );

    SunPosition {
        mean_longitude,
        apogee,
        maslul,
        maslul_correction,
        true_longitude,
        constellation: Constellation::from_longitude(true_longitude),
        position_in_constellation: position_in_constellation(true_longitude),
    }
}

fn moon_position(
    days: i64,
    sun_true_longitude: f64,
    constants: &AstronomicalConstants,
) -> MoonPosition {
    let moon = &constants.moon;
    let visibility = &constants.visibility;
    let elapsed = days as f64;

    let mean_longitude = normalize_degrees(
        moon.start_position.to_degrees() + moon.mean_motion_per_day.to_degrees() * elapsed,
    );
    let maslul = normalize_degrees(
        moon.maslul_start.to_degrees() + moon.maslul_mean_motion.to_degrees() * elapsed,
    );
    let maslul_correction = constants.corrections.correction_at(maslul);
    let corrected_longitude = normalize_degrees(mean_longitude + maslul_correction);

    let latitude = lunar::latitude(days, moon.latitude_amplitude, moon.latitude_cycle_days);
    let elongation = normalize_degrees(corrected_longitude - sun_true_longitude);
    let first_visibility_angle =
        lunar::first_visibility_angle(elongation, latitude, visibility.latitude_weight);
    let illumination_fraction = lunar::illumination_fraction(elongation);

    log::debug!(
        "moon: mean {mean_longitude:.4} maslul {maslul:.4} -> true {corrected_longitude:.4}, elongation {elongation:.4}"
    );

    MoonPosition {
        mean_longitude,
        corrected_longitude,
        latitude,
        maslul,
        maslul_correction,
        elongation,
        first_visibility_angle,
        is_visible: first_visibility_angle > visibility.threshold,
        phase: MoonPhase::from_elongation(elongation),
        is_near_new_moon: lunar::is_near_new_moon(elongation, visibility.near_new_moon_window),
        illumination_fraction,
        brightness: lunar::brightness(
            illumination_fraction,
            visibility.min_brightness,
            visibility.max_brightness,
        ),
        constellation: Constellation::from_longitude(corrected_longitude),
        position_in_constellation: position_in_constellation(corrected_longitude),
    }
}

/// Owns a set of constants and answers snapshot queries against them.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use rambam_sky::PositionEngine;
///
/// let engine = PositionEngine::default();
/// let epoch = Utc.with_ymd_and_hms(1177, 4, 3, 0, 0, 0).unwrap();
/// let snapshot = engine.snapshot(epoch);
///
/// assert_eq!(snapshot.days_from_base, 0);
/// assert_eq!(snapshot.sun.mean_longitude, 0.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PositionEngine {
    constants: AstronomicalConstants,
}

impl PositionEngine {
    pub fn new(constants: AstronomicalConstants) -> Self {
        PositionEngine { constants }
    }

    pub fn constants(&self) -> &AstronomicalConstants {
        &self.constants
    }

    pub fn snapshot(&self, date: DateTime<Utc>) -> AstronomicalSnapshot {
        compute_snapshot_with(date, &self.constants)
    }

    /// Snapshot at midnight UTC of a calendar date.
    pub fn snapshot_on(&self, date: NaiveDate) -> AstronomicalSnapshot {
        self.snapshot(start_of_day(date))
    }

    /// One snapshot per day for `days` consecutive days starting at `start`.
    ///
    /// The run ends early at the last instant chrono can represent.
    pub fn series(&self, start: DateTime<Utc>, days: u32) -> Vec<AstronomicalSnapshot> {
        let mut snapshots = Vec::new();
        for offset in 0..days {
            match start.checked_add_signed(Duration::days(i64::from(offset))) {
                Some(date) => snapshots.push(self.snapshot(date)),
                None => {
                    log::warn!("series stopped after {offset} days: date out of range");
                    break;
                }
            }
        }
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1177, 4, 3, 0, 0, 0).unwrap()
    }

    #[test]
    fn day_count_floors_partial_days() {
        let base = NaiveDate::from_ymd_opt(1177, 4, 3).unwrap();
        assert_eq!(days_from_base(epoch(), base), 0);
        assert_eq!(days_from_base(epoch() + Duration::hours(23), base), 0);
        assert_eq!(days_from_base(epoch() + Duration::hours(24), base), 1);
        assert_eq!(days_from_base(epoch() - Duration::hours(1), base), -1);
        assert_eq!(days_from_base(epoch() - Duration::hours(24), base), -1);
        assert_eq!(days_from_base(epoch() - Duration::hours(25), base), -2);
    }

    #[test]
    fn day_count_floors_instants_just_before_midnight() {
        let base = NaiveDate::from_ymd_opt(1177, 4, 3).unwrap();
        assert_eq!(days_from_base(epoch() - Duration::milliseconds(1), base), -1);
        assert_eq!(days_from_base(epoch() - Duration::microseconds(1), base), -1);
        assert_eq!(days_from_base(epoch() - Duration::nanoseconds(1), base), -1);

        let next_midnight = epoch() + Duration::days(1);
        assert_eq!(days_from_base(next_midnight - Duration::nanoseconds(1), base), 0);
        assert_eq!(days_from_base(next_midnight, base), 1);
    }

    #[test]
    fn sun_at_epoch() {
        let snapshot = compute_snapshot(epoch());
        let apogee = 26.0 + 45.0 / 60.0 + 8.0 / 3600.0 + 60.0;

        assert_eq!(snapshot.sun.mean_longitude, 0.0);
        assert!((snapshot.sun.apogee - apogee).abs() < 1e-12);
        assert!((snapshot.sun.maslul - (360.0 - apogee)).abs() < 1e-9);

        // maslul past 180: correction is subtracted
        let correction = snapshot.sun.maslul_correction;
        assert!(correction > 1.9 && correction < 2.0, "correction {correction}");
        assert!((snapshot.sun.true_longitude - (360.0 - correction)).abs() < 1e-9);
        assert_eq!(snapshot.sun.constellation, Some(Constellation::Pisces));
    }

    #[test]
    fn moon_at_epoch() {
        let constants = AstronomicalConstants::default();
        let snapshot = snapshot_for_days(0, &constants);
        let maslul = 84.0 + 28.0 / 60.0 + 42.0 / 3600.0;
        let correction = constants.corrections.correction_at(maslul);

        assert_eq!(snapshot.moon.mean_longitude, 0.0);
        assert!((snapshot.moon.maslul - maslul).abs() < 1e-12);
        assert_eq!(snapshot.moon.maslul_correction, correction);
        assert_eq!(snapshot.moon.corrected_longitude, correction);
        assert_eq!(snapshot.moon.latitude, 0.0);
    }

    #[test]
    fn epoch_moon_is_a_young_crescent() {
        let snapshot = snapshot_for_days(0, rambam_constants());
        let expected = snapshot.moon.corrected_longitude + (360.0 - snapshot.sun.true_longitude);
        assert!((snapshot.moon.elongation - expected).abs() < 1e-9);
        assert_eq!(snapshot.moon.phase, MoonPhase::WaxingCrescent);
        assert!(snapshot.moon.is_near_new_moon);
        assert!(!snapshot.moon.is_visible);
    }

    #[test]
    fn mean_longitudes_advance_by_daily_rate() {
        let constants = AstronomicalConstants::default();
        let sun_rate = constants.sun.mean_motion_per_day.to_degrees();
        let moon_rate = constants.moon.mean_motion_per_day.to_degrees();

        let day = snapshot_for_days(1, &constants);
        assert!((day.sun.mean_longitude - sun_rate).abs() < 1e-12);
        assert!((day.moon.mean_longitude - moon_rate).abs() < 1e-12);

        let before = snapshot_for_days(-1, &constants);
        assert!((before.sun.mean_longitude - (360.0 - sun_rate)).abs() < 1e-9);
    }

    #[test]
    fn sun_true_longitude_adds_correction_on_ascending_half() {
        let constants = AstronomicalConstants::default();
        // roughly half a year on, the sun sits past its apogee
        let snapshot = snapshot_for_days(180, &constants);
        assert!(snapshot.sun.maslul <= 180.0, "maslul {}", snapshot.sun.maslul);
        let expected = normalize_degrees(snapshot.sun.mean_longitude + snapshot.sun.maslul_correction);
        assert_eq!(snapshot.sun.true_longitude, expected);
    }

    #[test]
    fn engine_matches_free_function() {
        let engine = PositionEngine::default();
        let date = Utc.with_ymd_and_hms(2024, 3, 11, 18, 30, 0).unwrap();
        assert_eq!(engine.snapshot(date), compute_snapshot(date));
    }

    #[test]
    fn snapshot_on_uses_midnight() {
        let engine = PositionEngine::default();
        let date = NaiveDate::from_ymd_opt(1177, 4, 4).unwrap();
        assert_eq!(engine.snapshot_on(date).days_from_base, 1);
    }

    #[test]
    fn series_steps_one_day_at_a_time() {
        let engine = PositionEngine::default();
        let run = engine.series(epoch(), 5);
        assert_eq!(run.len(), 5);
        for (i, snapshot) in run.iter().enumerate() {
            assert_eq!(snapshot.days_from_base, i as i64);
        }
    }

    #[test]
    fn series_stops_at_the_end_of_the_calendar() {
        let engine = PositionEngine::default();
        let last_day = start_of_day(NaiveDate::MAX);
        let run = engine.series(last_day, 3);
        assert_eq!(run.len(), 1);
        assert_eq!(run[0], engine.snapshot(last_day));

        let before = start_of_day(NaiveDate::MAX.pred_opt().unwrap());
        assert_eq!(engine.series(before, 5).len(), 2);
    }

    #[test]
    fn custom_constants_change_the_result() {
        let mut constants = AstronomicalConstants::default();
        constants.sun.start_position = crate::angle::Dms::new(10.0, 0.0, 0.0);
        let engine = PositionEngine::new(constants);
        assert_eq!(engine.snapshot(epoch()).sun.mean_longitude, 10.0);
    }
}
