//! # Galgalim Layout
//!
//! Model-space geometry of the nested circles: Earth at the origin, each
//! body's deferent around an offset eccentric center, and the epicycles
//! riding on the deferents. Coordinates are unit-free; a renderer multiplies
//! them by its own scale (e.g. `min(width, height)`) and shifts them to its
//! canvas center.
//!
//! Circle centers and epicycle phases come from the galgalim constants. The
//! Sun and Moon markers are placed on the ray from Earth at the snapshot's
//! true longitudes, at the distance of their epicycle centers, so the diagram
//! always agrees with the numbers in the snapshot.

use crate::angle::normalize_degrees;
use crate::config::{AstronomicalConstants, CircleConstants};
use crate::engine::AstronomicalSnapshot;
use crate::zodiac::Constellation;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Point at `radius` from the origin in direction `degrees`.
    pub fn polar(radius: f64, degrees: f64) -> Self {
        let theta = degrees.to_radians();
        Point::new(radius * theta.cos(), radius * theta.sin())
    }

    pub fn offset(self, other: Point) -> Self {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn norm(self) -> f64 {
        self.distance(Point::ORIGIN)
    }
}

/// Every object the diagram draws and a pointer can land on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GalgalObject {
    Earth,
    Sun,
    Moon,
    /// Galgal yotze: center of the Sun's deferent
    SunEccentricCenter,
    /// Galgal gadol of the Sun
    SunDeferent,
    SunEpicycleCenter,
    /// Galgal katan of the Sun
    SunEpicycle,
    /// Galgal yotze merkaz: center of the Moon's deferent
    MoonEccentricCenter,
    /// Galgal gadol of the Moon
    MoonDeferent,
    MoonFirstEpicycleCenter,
    /// Galgal katan of the Moon
    MoonFirstEpicycle,
    /// Galgal noteh
    MoonSecondEpicycle,
}

impl GalgalObject {
    pub fn title(self) -> &'static str {
        match self {
            GalgalObject::Earth => "Earth",
            GalgalObject::Sun => "Sun",
            GalgalObject::Moon => "Moon",
            GalgalObject::SunEccentricCenter => "Eccentric Center",
            GalgalObject::SunDeferent => "Sun's Deferent",
            GalgalObject::SunEpicycleCenter => "Sun's Epicycle Center",
            GalgalObject::SunEpicycle => "Sun's Epicycle",
            GalgalObject::MoonEccentricCenter => "Moon's Eccentric Circle",
            GalgalObject::MoonDeferent => "Moon's Deferent",
            GalgalObject::MoonFirstEpicycleCenter => "Moon's Epicycle Center",
            GalgalObject::MoonFirstEpicycle => "Moon's First Epicycle",
            GalgalObject::MoonSecondEpicycle => "Moon's Second Epicycle",
        }
    }

    pub fn hebrew_name(self) -> &'static str {
        match self {
            GalgalObject::Earth => "ארץ",
            GalgalObject::Sun => "שמש",
            GalgalObject::Moon => "ירח",
            GalgalObject::SunEccentricCenter => "גלגל יוצא",
            GalgalObject::SunDeferent | GalgalObject::MoonDeferent => "גלגל גדול",
            GalgalObject::SunEpicycleCenter | GalgalObject::MoonFirstEpicycleCenter => {
                "מרכז גלגל קטן"
            }
            GalgalObject::SunEpicycle | GalgalObject::MoonFirstEpicycle => "גלגל קטן",
            GalgalObject::MoonEccentricCenter => "גלגל יוצא מרכז",
            GalgalObject::MoonSecondEpicycle => "גלגל נוטה",
        }
    }
}

/// How an object is drawn and hit-tested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Filled disc; hit anywhere inside
    Marker,
    /// Outline only; hit near the rim
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutObject {
    pub object: GalgalObject,
    pub shape: Shape,
    pub center: Point,
    pub radius: f64,
}

/// Sizes of the diagram in model units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Radius of the Sun's deferent
    pub sun_radius: f64,
    /// Radius of the Moon's deferent
    pub moon_radius: f64,
    /// Radius of the zodiac ring
    pub zodiac_radius: f64,
    pub earth_marker: f64,
    pub sun_marker: f64,
    pub moon_marker: f64,
    /// Radius of the small eccentric/epicycle center dots
    pub center_marker: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            sun_radius: 0.42,
            moon_radius: 0.20,
            zodiac_radius: 0.35,
            earth_marker: 0.02,
            sun_marker: 0.024,
            moon_marker: 0.016,
            center_marker: 0.007,
        }
    }
}

/// Geometry for one snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GalgalimLayout {
    /// Phase of the Sun's epicycle, degrees
    pub sun_epicycle_angle: f64,
    /// Phase of the Moon's first epicycle, degrees
    pub moon_first_epicycle_angle: f64,
    /// Phase of the Moon's second epicycle, degrees
    pub moon_second_epicycle_angle: f64,
    /// Draw order: circles first, then markers, bodies last
    pub objects: Vec<LayoutObject>,
}

fn epicycle_angle(days: i64, circle: &CircleConstants) -> f64 {
    normalize_degrees(days as f64 / circle.revolution_period * 360.0 + circle.initial_angle)
}

impl GalgalimLayout {
    pub fn build(
        snapshot: &AstronomicalSnapshot,
        constants: &AstronomicalConstants,
        options: &LayoutOptions,
    ) -> Self {
        let days = snapshot.days_from_base;
        let sun = &constants.sun;
        let galgalim = &constants.moon.galgalim;

        // Sun: eccentric center, deferent, epicycle
        let sun_eccentric = Point::polar(options.sun_radius * sun.eccentricity, sun.eccentric_angle);
        let sun_epicycle_center =
            sun_eccentric.offset(Point::polar(options.sun_radius, snapshot.sun.mean_longitude));
        let sun_epicycle_angle = epicycle_angle(days, &sun.epicycle);
        let sun_body = Point::polar(sun_epicycle_center.norm(), snapshot.sun.true_longitude);

        // Moon: the eccentric sits opposite its stated angle
        let moon_eccentric = Point::polar(
            -options.moon_radius * galgalim.eccentric.eccentricity,
            galgalim.eccentric.angle,
        );
        let moon_deferent_radius = options.moon_radius * galgalim.deferent.radius_ratio;
        let first_center =
            moon_eccentric.offset(Point::polar(moon_deferent_radius, snapshot.moon.mean_longitude));
        let first_radius = options.moon_radius * galgalim.first_epicycle.radius_ratio;
        let moon_first_epicycle_angle = epicycle_angle(days, &galgalim.first_epicycle);
        let second_center =
            first_center.offset(Point::polar(first_radius, moon_first_epicycle_angle));
        let second_radius = options.moon_radius * galgalim.second_epicycle.radius_ratio;
        let moon_second_epicycle_angle = epicycle_angle(days, &galgalim.second_epicycle);
        let moon_body = Point::polar(first_center.norm(), snapshot.moon.corrected_longitude);

        let circle = |object, center, radius| LayoutObject {
            object,
            shape: Shape::Circle,
            center,
            radius,
        };
        let marker = |object, center, radius| LayoutObject {
            object,
            shape: Shape::Marker,
            center,
            radius,
        };

        let objects = vec![
            circle(GalgalObject::SunDeferent, sun_eccentric, options.sun_radius),
            circle(
                GalgalObject::SunEpicycle,
                sun_epicycle_center,
                options.sun_radius * sun.epicycle.radius_ratio,
            ),
            circle(GalgalObject::MoonDeferent, moon_eccentric, moon_deferent_radius),
            circle(GalgalObject::MoonFirstEpicycle, first_center, first_radius),
            circle(GalgalObject::MoonSecondEpicycle, second_center, second_radius),
            marker(GalgalObject::SunEccentricCenter, sun_eccentric, options.center_marker),
            marker(GalgalObject::SunEpicycleCenter, sun_epicycle_center, options.center_marker),
            marker(GalgalObject::MoonEccentricCenter, moon_eccentric, options.center_marker),
            marker(GalgalObject::MoonFirstEpicycleCenter, first_center, options.center_marker),
            marker(GalgalObject::Earth, Point::ORIGIN, options.earth_marker),
            marker(GalgalObject::Sun, sun_body, options.sun_marker),
            marker(GalgalObject::Moon, moon_body, options.moon_marker),
        ];

        GalgalimLayout {
            sun_epicycle_angle,
            moon_first_epicycle_angle,
            moon_second_epicycle_angle,
            objects,
        }
    }

    pub fn get(&self, object: GalgalObject) -> Option<&LayoutObject> {
        self.objects.iter().find(|o| o.object == object)
    }

    /// Object under `point`, if any.
    ///
    /// Markers are checked before circle outlines, topmost (last drawn)
    /// marker first, so a body sitting on its own deferent is reported as the
    /// body.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<GalgalObject> {
        let markers = self
            .objects
            .iter()
            .rev()
            .filter(|o| o.shape == Shape::Marker)
            .find(|o| point.distance(o.center) <= o.radius + tolerance);

        markers
            .or_else(|| {
                self.objects
                    .iter()
                    .filter(|o| o.shape == Shape::Circle)
                    .find(|o| (point.distance(o.center) - o.radius).abs() <= tolerance)
            })
            .map(|o| o.object)
    }
}

/// Label anchors for the twelve sectors, at the start of each sector.
pub fn zodiac_marks(radius: f64) -> Vec<(Constellation, Point)> {
    Constellation::ALL
        .iter()
        .map(|&sign| (sign, Point::polar(radius, sign.start_longitude())))
        .collect()
}
