//! # Rambam Sky Core Library
//!
//! Sun and Moon positions according to the geocentric model of Rambam's
//! Hilchot Kiddush HaChodesh, the model used to reason about when a new
//! crescent can first be seen and a new month declared.
//!
//! ## Design Philosophy
//!
//! ### One formula set
//! Every consumer (the table, the diagram, pointer hit-testing) reads the same
//! [`AstronomicalSnapshot`]. There is exactly one place that computes a
//! longitude, so the numbers shown beside the diagram can never drift from the
//! diagram itself.
//!
//! ### Pure and stateless
//! [`compute_snapshot`] is a pure function of the whole number of days since
//! the epoch (1177-04-03). Constants are an immutable
//! [`AstronomicalConstants`] value, built once and passed in by reference.
//! Nothing is cached between calls.
//!
//! ### Degrees everywhere
//! All angles are `f64` degrees. Longitudes are folded into `[0, 360)` with
//! [`angle::normalize_degrees`]; the equation of center comes from
//! [`table::MaslulCorrectionTable`] by linear interpolation.
//!
//! ## Data Flow
//! 1. **Day count**: `floor((date - epoch) / 1 day)`
//! 2. **Sun**: mean longitude → apogee → maslul → correction → true longitude
//! 3. **Moon**: mean longitude and maslul → correction → true longitude →
//!    latitude, elongation, visibility, phase, illumination
//! 4. **Season**: position within a 365¼-day year
//!
//! # Example
//! ```
//! use chrono::{TimeZone, Utc};
//! use rambam_sky::{compute_snapshot, MoonPhase};
//!
//! let date = Utc.with_ymd_and_hms(1177, 4, 3, 0, 0, 0).unwrap();
//! let snapshot = compute_snapshot(date);
//!
//! assert_eq!(snapshot.sun.mean_longitude, 0.0);
//! assert_eq!(snapshot.moon.phase, MoonPhase::WaxingCrescent);
//! ```

pub mod angle;
pub mod config;
pub mod engine;
pub mod galgalim;
pub mod lunar;
pub mod renderer;
pub mod season;
pub mod table;
pub mod zodiac;


pub use angle::{normalize_degrees, Dms};
pub use config::{AstronomicalConstants, ConfigError};
pub use engine::{
    compute_snapshot, compute_snapshot_with, days_from_base, rambam_constants, AstronomicalSnapshot,
    MoonPosition, PositionEngine, SunPosition,
};
pub use lunar::MoonPhase;
pub use season::{Season, SeasonInfo};
pub use table::{CorrectionPoint, MaslulCorrectionTable};
pub use zodiac::Constellation;
