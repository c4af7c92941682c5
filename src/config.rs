//! # Astronomical Constants
//!
//! Every number the position engine uses lives in [`AstronomicalConstants`]:
//! the epoch, the mean motions of Sun and Moon, the apogee drift, the galgalim
//! dimensions and the maslul correction table. The defaults are Rambam's
//! values from Hilchot Kiddush HaChodesh chapters 11 to 17.
//!
//! The constants can be overridden from a TOML file (`rambam-sky.toml` by
//! default). Any section or field left out of the file keeps its Rambam
//! value. Once built, a constants value is never mutated; the engine borrows
//! it for every computation.

use crate::angle::Dms;
use crate::table::MaslulCorrectionTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "rambam-sky.toml";

/// Errors raised while loading, validating or saving constants.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    /// File is not valid TOML or does not match the expected layout
    #[error("invalid config format: {0}")]
    Parse(#[from] toml::de::Error),

    /// Constants could not be rendered as TOML
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Values parsed but make no sense for the model
    #[error("invalid constant `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete parameter set for the Kiddush HaChodesh model.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AstronomicalConstants {
    /// Reference date all day counts are measured from
    pub epoch: EpochConstants,
    /// Solar mean motion, apogee and galgalim
    pub sun: SunConstants,
    /// Lunar mean motion, maslul and galgalim
    pub moon: MoonConstants,
    /// First-visibility heuristic and disc brightness
    pub visibility: VisibilityConstants,
    /// Equation-of-center table shared by Sun and Moon
    pub corrections: MaslulCorrectionTable,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EpochConstants {
    /// Base date, proleptic Gregorian, midnight UTC
    pub base_date: NaiveDate,
    /// Hebrew year of the base date
    pub base_year_hebrew: i32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SunConstants {
    /// 0° 59′ 8⅓″ per day (KH 12:1)
    pub mean_motion_per_day: Dms,
    /// Mean longitude at the epoch
    pub start_position: Dms,
    /// Apogee offset inside its starting constellation
    pub apogee_start: Dms,
    /// Constellation index holding the apogee at the epoch (Gemini = 2)
    pub apogee_constellation: u8,
    /// Apogee drift in arc-seconds per day
    pub apogee_motion_per_day_arcsec: f64,
    /// Offset of the eccentric center, as a fraction of the deferent radius
    pub eccentricity: f64,
    /// Direction of the eccentric center in degrees
    pub eccentric_angle: f64,
    /// Galgal katan
    pub epicycle: CircleConstants,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MoonConstants {
    /// 13° 10′ 35⅓″ per day (KH 14:1)
    pub mean_motion_per_day: Dms,
    /// Mean longitude at the epoch
    pub start_position: Dms,
    /// 13° 3′ 53⅓″ per day (KH 14:3)
    pub maslul_mean_motion: Dms,
    /// Maslul at the epoch
    pub maslul_start: Dms,
    /// Peak of the sinusoidal latitude proxy, degrees
    pub latitude_amplitude: f64,
    /// Period of the latitude proxy, days
    pub latitude_cycle_days: f64,
    /// Four-circle geometry used for the diagram
    pub galgalim: MoonGalgalim,
    /// Ascending node (rosh) regression
    pub node: NodeConstants,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MoonGalgalim {
    /// Galgal yotze merkaz
    pub eccentric: EccentricConstants,
    /// Galgal gadol
    pub deferent: CircleConstants,
    /// Galgal katan
    pub first_epicycle: CircleConstants,
    /// Galgal noteh
    pub second_epicycle: CircleConstants,
    /// Orbital inclination in degrees
    pub inclination: f64,
    /// Draconic month in days
    pub latitude_cycle: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EccentricConstants {
    pub eccentricity: f64,
    /// Angle of the eccentric point in degrees
    pub angle: f64,
}

/// A circle riding on (or forming) a body's path.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CircleConstants {
    /// Radius relative to the body's deferent
    pub radius_ratio: f64,
    /// Days for one full turn
    pub revolution_period: f64,
    /// Phase at the epoch, degrees
    pub initial_angle: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConstants {
    /// Date at which the node longitude is taken as zero
    pub epoch: NaiveDate,
    /// Daily motion in degrees, negative for retrograde
    pub regression_per_day: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VisibilityConstants {
    /// Weight of |latitude| in the first-visibility angle
    pub latitude_weight: f64,
    /// Minimum first-visibility angle for a crescent to be seen, degrees
    pub threshold: f64,
    /// Elongation window around conjunction flagged as near new moon, degrees
    pub near_new_moon_window: f64,
    /// Display brightness of an unlit disc, percent
    pub min_brightness: f64,
    /// Display brightness of a fully lit disc, percent
    pub max_brightness: f64,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl Default for EpochConstants {
    fn default() -> Self {
        EpochConstants {
            base_date: date(1177, 4, 3),
            base_year_hebrew: 4938,
        }
    }
}

impl Default for SunConstants {
    fn default() -> Self {
        SunConstants {
            mean_motion_per_day: Dms::new(0.0, 59.0, 8.333),
            start_position: Dms::ZERO,
            apogee_start: Dms::new(26.0, 45.0, 8.0),
            apogee_constellation: 2,
            apogee_motion_per_day_arcsec: 1.5,
            eccentricity: 0.0167,
            eccentric_angle: 65.5,
            epicycle: CircleConstants {
                radius_ratio: 0.0833,
                revolution_period: 365.25,
                initial_angle: 180.0,
            },
        }
    }
}

impl Default for MoonConstants {
    fn default() -> Self {
        MoonConstants {
            mean_motion_per_day: Dms::new(13.0, 10.0, 35.133),
            start_position: Dms::ZERO,
            maslul_mean_motion: Dms::new(13.0, 3.0, 53.333),
            maslul_start: Dms::new(84.0, 28.0, 42.0),
            latitude_amplitude: 5.0,
            latitude_cycle_days: 27.32166,
            galgalim: MoonGalgalim::default(),
            node: NodeConstants::default(),
        }
    }
}

impl Default for MoonGalgalim {
    fn default() -> Self {
        MoonGalgalim {
            eccentric: EccentricConstants {
                eccentricity: 0.0549,
                angle: 83.3,
            },
            deferent: CircleConstants {
                radius_ratio: 1.0,
                revolution_period: 27.32166,
                initial_angle: 0.0,
            },
            first_epicycle: CircleConstants {
                radius_ratio: 0.0575,
                revolution_period: 13.6608,
                initial_angle: 0.0,
            },
            second_epicycle: CircleConstants {
                radius_ratio: 0.038,
                revolution_period: 27.32166 / 2.0,
                initial_angle: 0.0,
            },
            inclination: 5.145,
            latitude_cycle: 27.21222,
        }
    }
}

impl Default for NodeConstants {
    fn default() -> Self {
        NodeConstants {
            epoch: date(1998, 9, 21),
            regression_per_day: -0.0529538,
        }
    }
}

impl Default for VisibilityConstants {
    fn default() -> Self {
        VisibilityConstants {
            latitude_weight: 0.3,
            threshold: 12.0,
            near_new_moon_window: 10.0,
            min_brightness: 30.0,
            max_brightness: 100.0,
        }
    }
}

impl Default for AstronomicalConstants {
    fn default() -> Self {
        AstronomicalConstants {
            epoch: EpochConstants::default(),
            sun: SunConstants::default(),
            moon: MoonConstants::default(),
            visibility: VisibilityConstants::default(),
            corrections: MaslulCorrectionTable::rambam(),
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite, got {value}"),
        })
    }
}

impl AstronomicalConstants {
    /// Load constants from `rambam-sky.toml`.
    /// Falls back to Rambam's values if the file doesn't exist or is invalid.
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load constants from the given path.
    /// Falls back to Rambam's values if the file doesn't exist or is invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load_from_path(path) {
            Ok(constants) => {
                log::info!("Loaded astronomical constants from {}", path.display());
                constants
            }
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using Rambam's constants", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                log::warn!("Using Rambam's constants");
                Self::default()
            }
        }
    }

    /// Load and validate constants, reporting any problem to the caller.
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let constants: AstronomicalConstants = toml::from_str(contents)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Save the constants to `rambam-sky.toml`.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("Constants saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Check the values the engine divides by or indexes with.
    ///
    /// The correction table checks itself when it is deserialized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sun = &self.sun;
        let moon = &self.moon;
        let galgalim = &moon.galgalim;

        if sun.apogee_constellation >= 12 {
            return Err(ConfigError::Invalid {
                field: "sun.apogee_constellation",
                reason: format!("must be 0..=11, got {}", sun.apogee_constellation),
            });
        }

        require_positive("sun.epicycle.revolution_period", sun.epicycle.revolution_period)?;
        require_positive("moon.latitude_cycle_days", moon.latitude_cycle_days)?;
        require_positive("moon.galgalim.deferent.revolution_period", galgalim.deferent.revolution_period)?;
        require_positive(
            "moon.galgalim.first_epicycle.revolution_period",
            galgalim.first_epicycle.revolution_period,
        )?;
        require_positive(
            "moon.galgalim.second_epicycle.revolution_period",
            galgalim.second_epicycle.revolution_period,
        )?;
        require_positive("moon.galgalim.latitude_cycle", galgalim.latitude_cycle)?;

        for (field, value) in [
            ("sun.mean_motion_per_day", sun.mean_motion_per_day.to_degrees()),
            ("sun.start_position", sun.start_position.to_degrees()),
            ("sun.apogee_start", sun.apogee_start.to_degrees()),
            ("sun.apogee_motion_per_day_arcsec", sun.apogee_motion_per_day_arcsec),
            ("moon.mean_motion_per_day", moon.mean_motion_per_day.to_degrees()),
            ("moon.start_position", moon.start_position.to_degrees()),
            ("moon.maslul_mean_motion", moon.maslul_mean_motion.to_degrees()),
            ("moon.maslul_start", moon.maslul_start.to_degrees()),
            ("moon.latitude_amplitude", moon.latitude_amplitude),
            ("moon.node.regression_per_day", moon.node.regression_per_day),
            ("visibility.latitude_weight", self.visibility.latitude_weight),
            ("visibility.threshold", self.visibility.threshold),
            ("visibility.near_new_moon_window", self.visibility.near_new_moon_window),
        ] {
            require_finite(field, value)?;
        }

        let vis = &self.visibility;
        if !(vis.min_brightness.is_finite()
            && vis.max_brightness.is_finite()
            && vis.min_brightness <= vis.max_brightness)
        {
            return Err(ConfigError::Invalid {
                field: "visibility.min_brightness",
                reason: format!(
                    "brightness range {}..{} is not ordered",
                    vis.min_brightness, vis.max_brightness
                ),
            });
        }

        Ok(())
    }

    /// Apogee longitude at the epoch in decimal degrees.
    pub fn sun_apogee_at_epoch(&self) -> f64 {
        self.sun.apogee_start.to_degrees() + f64::from(self.sun.apogee_constellation) * 30.0
    }

    /// Apogee drift in degrees per day.
    pub fn sun_apogee_motion_per_day(&self) -> f64 {
        self.sun.apogee_motion_per_day_arcsec / 3600.0
    }
}
