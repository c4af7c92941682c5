//! # Snapshot Rendering
//!
//! Text output for a terminal: a table of the computed quantities with two
//! decimals and a degree sign, a one-line-per-day listing for runs of days,
//! and a small ASCII sky chart with Earth at the center and the Sun and Moon
//! placed on the ecliptic ring.
//!
//! Non-finite numbers print as `?` rather than `NaN`.

use crate::engine::AstronomicalSnapshot;
use crate::zodiac::Constellation;
use chrono::NaiveDate;

/// `12.34°`, or `?` for a value that could not be computed.
pub fn format_degrees(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}°", value)
    } else {
        "?".to_string()
    }
}

fn format_constellation(sign: Option<Constellation>, position: f64) -> String {
    match sign {
        Some(sign) => format!(
            "{} / {} ({})",
            sign.english_name(),
            sign.hebrew_name(),
            format_degrees(position)
        ),
        None => "?".to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Full table for one snapshot.
pub fn render_table(snapshot: &AstronomicalSnapshot) -> String {
    let sun = &snapshot.sun;
    let moon = &snapshot.moon;
    let season = &snapshot.season;

    let sections: [(&str, Vec<(&str, String)>); 3] = [
        (
            "Sun Position",
            vec![
                ("Mean Longitude", format_degrees(sun.mean_longitude)),
                ("True Longitude", format_degrees(sun.true_longitude)),
                ("Apogee (גובה)", format_degrees(sun.apogee)),
                ("Maslul (מסלול)", format_degrees(sun.maslul)),
                ("Correction (מנת המסלול)", format_degrees(sun.maslul_correction)),
                (
                    "Constellation",
                    format_constellation(sun.constellation, sun.position_in_constellation),
                ),
            ],
        ),
        (
            "Moon Position",
            vec![
                ("Mean Longitude", format_degrees(moon.mean_longitude)),
                ("Maslul (מסלול)", format_degrees(moon.maslul)),
                ("Correction (מנת המסלול)", format_degrees(moon.maslul_correction)),
                ("True Longitude", format_degrees(moon.corrected_longitude)),
                ("Latitude (רוחב)", format_degrees(moon.latitude)),
                (
                    "Constellation",
                    format_constellation(moon.constellation, moon.position_in_constellation),
                ),
                ("Phase", moon.phase.to_string()),
                ("Elongation (אורך ראשון)", format_degrees(moon.elongation)),
                ("Visibility Angle", format_degrees(moon.first_visibility_angle)),
                ("Potentially Visible", yes_no(moon.is_visible).to_string()),
                (
                    "Illumination",
                    format!("{:.0}%", moon.illumination_fraction * 100.0),
                ),
            ],
        ),
        (
            "Seasonal Information (תקופות)",
            vec![
                ("Current Season", season.current_season.to_string()),
                (
                    "Days until next season",
                    season.days_until_next_season.to_string(),
                ),
            ],
        ),
    ];

    let label_width = sections
        .iter()
        .flat_map(|(_, rows)| rows.iter().map(|(label, _)| label.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (title, rows) in &sections {
        out.push_str(&format!("{title}\n"));
        for (label, value) in rows {
            let pad = label_width - label.chars().count();
            out.push_str(&format!("  {label}:{} {value}\n", " ".repeat(pad)));
        }
        if *title == "Moon Position" && moon.is_near_new_moon {
            out.push_str("  ⚠ Near New Moon: potential beginning of a new Hebrew month\n");
        }
        out.push('\n');
    }
    out
}

/// One line per snapshot, for runs of consecutive days.
pub fn render_series(start: NaiveDate, snapshots: &[AstronomicalSnapshot]) -> String {
    let mut out = String::from(
        "date        sun true   moon true  elong.    phase            visible\n",
    );
    for (date, snapshot) in start.iter_days().zip(snapshots) {
        out.push_str(&format!(
            "{}  {:>9}  {:>9}  {:>8}  {:<15}  {}\n",
            date,
            format_degrees(snapshot.sun.true_longitude),
            format_degrees(snapshot.moon.corrected_longitude),
            format_degrees(snapshot.moon.elongation),
            snapshot.moon.phase.name(),
            yes_no(snapshot.moon.is_visible),
        ));
    }
    out
}

/// ASCII sky chart: ecliptic ring, Earth `E`, Sun `S`, Moon `M`.
///
/// Longitude 0 (Aries) is at the right and longitudes increase
/// counter-clockwise. When Sun and Moon share a cell the cell shows `*`.
pub fn render_sky(snapshot: &AstronomicalSnapshot) -> String {
    const ROWS: usize = 21;
    const COLS: usize = 43;
    // terminal cells are roughly twice as tall as wide
    const RADIUS_X: f64 = 20.0;
    const RADIUS_Y: f64 = 10.0;

    let cx = (COLS / 2) as f64;
    let cy = (ROWS / 2) as f64;
    let mut grid = vec![vec![' '; COLS]; ROWS];

    let cell_at = |longitude: f64, scale: f64| -> Option<(usize, usize)> {
        if !longitude.is_finite() {
            return None;
        }
        let theta = longitude.to_radians();
        let col = (cx + scale * RADIUS_X * theta.cos()).round();
        let row = (cy - scale * RADIUS_Y * theta.sin()).round();
        if (0.0..COLS as f64).contains(&col) && (0.0..ROWS as f64).contains(&row) {
            Some((row as usize, col as usize))
        } else {
            None
        }
    };

    for step in 0..360 {
        if let Some((row, col)) = cell_at(step as f64, 1.0) {
            grid[row][col] = if step % 30 == 0 { '+' } else { '·' };
        }
    }

    grid[cy as usize][cx as usize] = 'E';

    let sun = cell_at(snapshot.sun.true_longitude, 0.8);
    let moon = cell_at(snapshot.moon.corrected_longitude, 0.8);
    if let Some((row, col)) = sun {
        grid[row][col] = 'S';
    }
    if let Some((row, col)) = moon {
        grid[row][col] = if sun == moon { '*' } else { 'M' };
    }

    let mut out = String::new();
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Print the table and sky chart to stdout.
pub fn draw_ascii(snapshot: &AstronomicalSnapshot) {
    print!("{}", render_table(snapshot));
    print!("{}", render_sky(snapshot));
}
