//! Tekufot: four equal seasons of a 365¼-day year counted from the epoch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of Shmuel's solar year in days.
pub const SOLAR_YEAR_DAYS: f64 = 365.25;

/// One quarter of [`SOLAR_YEAR_DAYS`].
pub const SEASON_LENGTH_DAYS: f64 = SOLAR_YEAR_DAYS / 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }

    /// Hebrew name of the tekufah that opens this season.
    pub fn tekufah(self) -> &'static str {
        match self {
            Season::Spring => "ניסן",
            Season::Summer => "תמוז",
            Season::Fall => "תשרי",
            Season::Winter => "טבת",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonInfo {
    pub current_season: Season,
    pub days_until_next_season: u32,
}

/// Season and countdown for a day count from the epoch.
///
/// Day counts before the epoch wrap with Euclidean remainder, so day -1
/// falls at the end of Winter.
pub fn season_info(days_from_base: i64) -> SeasonInfo {
    let in_year = (days_from_base as f64).rem_euclid(SOLAR_YEAR_DAYS);
    let year_position = in_year / SOLAR_YEAR_DAYS;
    let index = ((year_position * 4.0).floor() as usize).min(Season::ALL.len() - 1);

    let day_in_year = in_year.floor();
    let remaining = (SEASON_LENGTH_DAYS - day_in_year.rem_euclid(SEASON_LENGTH_DAYS)).ceil();

    SeasonInfo {
        current_season: Season::ALL[index],
        days_until_next_season: remaining.max(0.0) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_first_day_of_spring() {
        let info = season_info(0);
        assert_eq!(info.current_season, Season::Spring);
        assert_eq!(info.days_until_next_season, 92);
    }

    #[test]
    fn spring_turns_to_summer_after_day_91() {
        assert_eq!(season_info(91).current_season, Season::Spring);
        assert_eq!(season_info(91).days_until_next_season, 1);
        assert_eq!(season_info(92).current_season, Season::Summer);
        assert_eq!(season_info(92).days_until_next_season, 91);
    }

    #[test]
    fn countdown_drops_by_one_per_day_within_spring() {
        for day in 0..91 {
            let today = season_info(day).days_until_next_season;
            let tomorrow = season_info(day + 1).days_until_next_season;
            assert_eq!(today, tomorrow + 1, "day {day}");
        }
    }

    #[test]
    fn all_seasons_appear_in_order() {
        assert_eq!(season_info(100).current_season, Season::Summer);
        assert_eq!(season_info(200).current_season, Season::Fall);
        assert_eq!(season_info(300).current_season, Season::Winter);
        assert_eq!(season_info(366).current_season, Season::Spring);
    }

    #[test]
    fn before_epoch_wraps_to_winter() {
        // day -1 sits at 364.25 of the previous year, day_in_year 364
        let info = season_info(-1);
        assert_eq!(info.current_season, Season::Winter);
        assert_eq!(info.days_until_next_season, 2);
    }
}
