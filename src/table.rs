//! # Maslul Correction Table
//!
//! Rambam tabulates the equation of center ("menat ha-maslul") at every ten
//! degrees of maslul from 0° to 180°. Values in between are read off by linear
//! interpolation between the two bracketing rows; values past 180° are read
//! from the mirrored angle `360 - maslul`.
//!
//! The table is validated once when the constants are built. Lookups never
//! fail: anything that falls outside the tabulated span yields a correction
//! of zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the correction table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrectionPoint {
    /// Maslul in degrees
    pub maslul: f64,
    /// Correction in degrees
    pub correction: f64,
}

/// Reasons a correction table can be rejected.
#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("correction table needs at least two points, got {0}")]
    TooFewPoints(usize),

    #[error("correction table contains a non-finite value at row {0}")]
    NonFinite(usize),

    #[error("maslul keys must be strictly increasing (row {row}: {previous} then {current})")]
    NotIncreasing { row: usize, previous: f64, current: f64 },

    #[error("correction table must span 0..=180 degrees, found {first}..={last}")]
    BadSpan { first: f64, last: f64 },
}

/// Ordered (maslul, correction) control points spanning 0° to 180°.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CorrectionPoint>", into = "Vec<CorrectionPoint>")]
pub struct MaslulCorrectionTable {
    points: Vec<CorrectionPoint>,
}

/// Rambam's table, Kiddush HaChodesh 13:4, in minutes of arc past whole degrees.
const RAMBAM_ROWS: [(f64, f64, f64); 19] = [
    (0.0, 0.0, 0.0),
    (10.0, 0.0, 20.0),
    (20.0, 0.0, 40.0),
    (30.0, 0.0, 58.0),
    (40.0, 1.0, 15.0),
    (50.0, 1.0, 29.0),
    (60.0, 1.0, 41.0),
    (70.0, 1.0, 51.0),
    (80.0, 1.0, 57.0),
    (90.0, 1.0, 59.0),
    (100.0, 1.0, 58.0),
    (110.0, 1.0, 53.0),
    (120.0, 1.0, 45.0),
    (130.0, 1.0, 33.0),
    (140.0, 1.0, 19.0),
    (150.0, 1.0, 1.0),
    (160.0, 0.0, 42.0),
    (170.0, 0.0, 21.0),
    (180.0, 0.0, 0.0),
];

impl MaslulCorrectionTable {
    /// Build a table, checking that keys are strictly increasing and that the
    /// rows cover exactly `0..=180`.
    pub fn new(points: Vec<CorrectionPoint>) -> Result<Self, TableError> {
        if points.len() < 2 {
            return Err(TableError::TooFewPoints(points.len()));
        }

        for (row, point) in points.iter().enumerate() {
            if !point.maslul.is_finite() || !point.correction.is_finite() {
                return Err(TableError::NonFinite(row));
            }
        }

        for (row, pair) in points.windows(2).enumerate() {
            if pair[1].maslul <= pair[0].maslul {
                return Err(TableError::NotIncreasing {
                    row: row + 1,
                    previous: pair[0].maslul,
                    current: pair[1].maslul,
                });
            }
        }

        let first = points[0].maslul;
        let last = points[points.len() - 1].maslul;
        if first != 0.0 || last != 180.0 {
            return Err(TableError::BadSpan { first, last });
        }

        Ok(MaslulCorrectionTable { points })
    }

    /// Rambam's nineteen rows.
    pub fn rambam() -> Self {
        let points = RAMBAM_ROWS
            .iter()
            .map(|&(maslul, degrees, minutes)| CorrectionPoint {
                maslul,
                correction: degrees + minutes / 60.0,
            })
            .collect();
        MaslulCorrectionTable { points }
    }

    pub fn points(&self) -> &[CorrectionPoint] {
        &self.points
    }

    /// Interpolate the table at a maslul inside `[0, 180]`.
    ///
    /// The bracketing rows satisfy `m0 <= maslul < m1`; the final key returns
    /// its own correction. `None` outside the table or for `NaN`.
    pub fn interpolate(&self, maslul: f64) -> Option<f64> {
        let last = self.points.last()?;
        if maslul == last.maslul {
            return Some(last.correction);
        }

        self.points.windows(2).find_map(|pair| {
            let (lo, hi) = (pair[0], pair[1]);
            if maslul >= lo.maslul && maslul < hi.maslul {
                let ratio = (maslul - lo.maslul) / (hi.maslul - lo.maslul);
                Some(lo.correction + ratio * (hi.correction - lo.correction))
            } else {
                None
            }
        })
    }

    /// Correction for any normalized maslul in `[0, 360)`.
    ///
    /// Past 180° the table is read at `360 - maslul`. A miss degrades to zero.
    pub fn correction_at(&self, maslul: f64) -> f64 {
        let lookup = if maslul > 180.0 { 360.0 - maslul } else { maslul };
        match self.interpolate(lookup) {
            Some(correction) => correction,
            None => {
                log::warn!("maslul {maslul} is outside the correction table, using 0");
                0.0
            }
        }
    }
}

impl Default for MaslulCorrectionTable {
    fn default() -> Self {
        Self::rambam()
    }
}

impl TryFrom<Vec<CorrectionPoint>> for MaslulCorrectionTable {
    type Error = TableError;

    fn try_from(points: Vec<CorrectionPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<MaslulCorrectionTable> for Vec<CorrectionPoint> {
    fn from(table: MaslulCorrectionTable) -> Self {
        table.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(maslul: f64, correction: f64) -> CorrectionPoint {
        CorrectionPoint { maslul, correction }
    }

    #[test]
    fn rambam_table_is_valid() {
        let table = MaslulCorrectionTable::rambam();
        assert_eq!(table.points().len(), 19);
        assert!(MaslulCorrectionTable::new(table.points().to_vec()).is_ok());
    }

    #[test]
    fn endpoints_and_peak() {
        let table = MaslulCorrectionTable::rambam();
        assert_eq!(table.interpolate(0.0), Some(0.0));
        assert_eq!(table.interpolate(180.0), Some(0.0));
        assert_eq!(table.interpolate(90.0), Some(1.0 + 59.0 / 60.0));
    }

    #[test]
    fn interpolation_inside_80_to_100_is_linear() {
        let table = MaslulCorrectionTable::rambam();
        let c80 = 1.0 + 57.0 / 60.0;
        let c90 = 1.0 + 59.0 / 60.0;
        let c100 = 1.0 + 58.0 / 60.0;

        let at85 = table.interpolate(85.0).unwrap();
        let at95 = table.interpolate(95.0).unwrap();
        assert!((at85 - (c80 + 0.5 * (c90 - c80))).abs() < 1e-12);
        assert!((at95 - (c90 + 0.5 * (c100 - c90))).abs() < 1e-12);

        let mut previous = table.interpolate(85.0).unwrap();
        for step in 1..=50 {
            let x = 85.0 + step as f64 * 0.1;
            let value = table.interpolate(x).unwrap();
            assert!(value >= previous - 1e-12, "not rising at {x}");
            previous = value;
        }
    }

    #[test]
    fn bracket_boundary_uses_lower_row() {
        let table = MaslulCorrectionTable::rambam();
        assert_eq!(table.interpolate(10.0), Some(20.0 / 60.0));
        assert_eq!(table.interpolate(170.0), Some(21.0 / 60.0));
    }

    #[test]
    fn outside_table_is_none_and_corrects_to_zero() {
        let table = MaslulCorrectionTable::rambam();
        assert_eq!(table.interpolate(-1.0), None);
        assert_eq!(table.interpolate(181.0), None);
        assert_eq!(table.interpolate(f64::NAN), None);
        assert_eq!(table.correction_at(f64::NAN), 0.0);
        assert_eq!(table.correction_at(-5.0), 0.0);
    }

    #[test]
    fn correction_past_180_is_mirrored() {
        let table = MaslulCorrectionTable::rambam();
        let direct = table.correction_at(60.0);
        let mirrored = table.correction_at(300.0);
        assert!((direct - mirrored).abs() < 1e-12);
        assert!((table.correction_at(270.0) - table.correction_at(90.0)).abs() < 1e-12);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = MaslulCorrectionTable::new(vec![
            point(0.0, 0.0),
            point(90.0, 2.0),
            point(90.0, 1.0),
            point(180.0, 0.0),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::NotIncreasing { row: 2, .. }));
    }

    #[test]
    fn rejects_partial_span() {
        let err = MaslulCorrectionTable::new(vec![point(0.0, 0.0), point(170.0, 0.3)]).unwrap_err();
        assert_eq!(
            err,
            TableError::BadSpan {
                first: 0.0,
                last: 170.0
            }
        );
    }

    #[test]
    fn rejects_short_and_non_finite_tables() {
        assert_eq!(
            MaslulCorrectionTable::new(vec![point(0.0, 0.0)]).unwrap_err(),
            TableError::TooFewPoints(1)
        );
        assert_eq!(
            MaslulCorrectionTable::new(vec![point(0.0, f64::NAN), point(180.0, 0.0)]).unwrap_err(),
            TableError::NonFinite(0)
        );
    }
}
