use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::Vector2D;

/// # `RouteType` enum
///
/// The family of pass route a receiver may run. Each variant has a
/// characteristic break angle and rhythm consulted by `receiver` movement
/// and by the hot-route/sight-adjustment conversion tables.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum RouteType {
    Slant,
    Flat,
    Go,
    Curl,
    Out,
    In,
    Post,
    Comeback,
    Fade,
    Hitch,
    Wheel,
    Corner,
    Dig,
    Drag,
    Seam,
}

impl RouteType {
    /// All route types, for exhaustive table construction.
    pub fn all() -> [RouteType; 15] {
        use RouteType::*;
        [
            Slant, Flat, Go, Curl, Out, In, Post, Comeback, Fade, Hitch, Wheel, Corner, Dig, Drag,
            Seam,
        ]
    }
}

/// A single waypoint on a route, expressed relative to the receiver's
/// lineup position (not absolute field coordinates).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Offset from the lineup position, in yards.
    pub offset: Vector2D,
    /// Time since the snap at which the receiver should reach this
    /// waypoint, in seconds.
    pub time: f64,
    /// Whether this waypoint is a route break (imposes a speed reduction
    /// proportional to the break angle, per spec.md §4.10).
    pub is_break: bool,
    /// The angle between the pre- and post-break stems, in degrees.
    /// Meaningless when `is_break` is false. 45 deg (e.g. a slant) costs
    /// no speed, 180 deg (e.g. a hitch) costs the most, per
    /// `receiver::break_speed_reduction`.
    pub break_angle_degrees: f64,
}

impl RoutePoint {
    pub fn new(offset: Vector2D, time: f64, is_break: bool, break_angle_degrees: f64) -> RoutePoint {
        RoutePoint {
            offset,
            time,
            is_break,
            break_angle_degrees,
        }
    }
}

/// # `RouteDefRaw` struct
///
/// A `RouteDefRaw` is a `RouteDef` before its waypoints have been validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteDefRaw {
    key: String,
    route_type: RouteType,
    points: Vec<RoutePoint>,
    depth: f64,
}

impl RouteDefRaw {
    pub fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err(String::from("Route key must not be empty"));
        }
        if self.points.is_empty() {
            return Err(format!("Route '{}' has no waypoints", self.key));
        }
        let mut last_time = -1.0_f64;
        for (i, point) in self.points.iter().enumerate() {
            if point.time <= last_time {
                return Err(format!(
                    "Route '{}' waypoint {} has non-increasing time {}",
                    self.key, i, point.time
                ));
            }
            last_time = point.time;
        }
        if self.depth < 0.0 {
            return Err(format!(
                "Route '{}' has negative declared depth {}",
                self.key, self.depth
            ));
        }
        Ok(())
    }
}

/// # `RouteDef` struct
///
/// A `RouteDef` is a validated, immutable route template: an ordered list
/// of waypoints relative to the receiver's lineup position, with a timing
/// array of equal length and a declared depth past the line of scrimmage.
#[derive(Clone, Debug, Serialize)]
pub struct RouteDef {
    key: String,
    route_type: RouteType,
    points: Vec<RoutePoint>,
    depth: f64,
}

impl TryFrom<RouteDefRaw> for RouteDef {
    type Error = String;

    fn try_from(item: RouteDefRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(RouteDef {
            key: item.key,
            route_type: item.route_type,
            points: item.points,
            depth: item.depth,
        })
    }
}

impl<'de> Deserialize<'de> for RouteDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RouteDefRaw::deserialize(deserializer)?;
        RouteDef::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl RouteDef {
    /// Construct a new route definition, validating the waypoints.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::catalog::route::{RouteDef, RouteType, RoutePoint};
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let slant = RouteDef::new(
    ///     "slant",
    ///     RouteType::Slant,
    ///     vec![
    ///         RoutePoint::new(Vector2D::new(0.0, 3.0), 0.6, true, 45.0),
    ///         RoutePoint::new(Vector2D::new(6.0, 6.0), 1.8, false, 0.0),
    ///     ],
    ///     3.0,
    /// ).unwrap();
    /// assert_eq!(slant.key(), "slant");
    /// ```
    pub fn new(
        key: &str,
        route_type: RouteType,
        points: Vec<RoutePoint>,
        depth: f64,
    ) -> Result<RouteDef, String> {
        let raw = RouteDefRaw {
            key: key.to_string(),
            route_type,
            points,
            depth,
        };
        RouteDef::try_from(raw)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn route_type(&self) -> RouteType {
        self.route_type
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Total scripted duration of the route, the time of its final
    /// waypoint.
    pub fn duration(&self) -> f64 {
        self.points.last().map(|p| p.time).unwrap_or(0.0)
    }

    /// Returns a copy of this route definition with every waypoint offset
    /// shifted in `y` by `depth_change`, used by sight adjustments
    /// (spec.md §4.13) to translate an existing route deeper or shallower.
    pub fn translated(&self, depth_change: f64) -> RouteDef {
        let points = self
            .points
            .iter()
            .map(|p| {
                RoutePoint::new(
                    Vector2D::new(p.offset.x, p.offset.y + depth_change),
                    p.time,
                    p.is_break,
                    p.break_angle_degrees,
                )
            })
            .collect();
        RouteDef {
            key: self.key.clone(),
            route_type: self.route_type,
            points,
            depth: (self.depth + depth_change).max(0.0),
        }
    }
}

/// The route definitions shipped with the engine, one per `RouteType`.
/// Waypoint depths and timings follow the NFL-timing table in spec.md
/// §4.10 (e.g. slant 45°/1.8s, curl 2.2s, hitch 180°/1.5s, go 3.5s).
pub fn standard_routes() -> Vec<RouteDef> {
    use RouteType::*;
    vec![
        RouteDef::new(
            "slant",
            Slant,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 3.0), 0.6, true, 45.0),
                RoutePoint::new(Vector2D::new(8.0, 8.0), 1.8, false, 0.0),
            ],
            3.0,
        )
        .unwrap(),
        RouteDef::new(
            "flat",
            Flat,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 1.0), 0.4, true, 90.0),
                RoutePoint::new(Vector2D::new(6.0, 2.0), 1.4, false, 0.0),
            ],
            1.0,
        )
        .unwrap(),
        RouteDef::new(
            "go",
            Go,
            vec![RoutePoint::new(Vector2D::new(0.0, 40.0), 3.5, false, 0.0)],
            40.0,
        )
        .unwrap(),
        RouteDef::new(
            "curl",
            Curl,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 12.0), 1.9, true, 180.0),
                RoutePoint::new(Vector2D::new(0.0, 9.0), 2.2, false, 0.0),
            ],
            12.0,
        )
        .unwrap(),
        RouteDef::new(
            "out",
            Out,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 10.0), 1.7, true, 90.0),
                RoutePoint::new(Vector2D::new(8.0, 10.0), 2.3, false, 0.0),
            ],
            10.0,
        )
        .unwrap(),
        RouteDef::new(
            "in",
            In,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 12.0), 1.9, true, 90.0),
                RoutePoint::new(Vector2D::new(-10.0, 12.0), 2.6, false, 0.0),
            ],
            12.0,
        )
        .unwrap(),
        RouteDef::new(
            "post",
            Post,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 14.0), 2.0, true, 60.0),
                RoutePoint::new(Vector2D::new(-10.0, 28.0), 3.2, false, 0.0),
            ],
            14.0,
        )
        .unwrap(),
        RouteDef::new(
            "comeback",
            Comeback,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 16.0), 2.2, true, 180.0),
                RoutePoint::new(Vector2D::new(3.0, 13.0), 2.6, false, 0.0),
            ],
            16.0,
        )
        .unwrap(),
        RouteDef::new(
            "fade",
            Fade,
            vec![RoutePoint::new(Vector2D::new(3.0, 20.0), 2.6, false, 0.0)],
            20.0,
        )
        .unwrap(),
        RouteDef::new(
            "hitch",
            Hitch,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 6.0), 1.2, true, 180.0),
                RoutePoint::new(Vector2D::new(0.0, 5.0), 1.5, false, 0.0),
            ],
            6.0,
        )
        .unwrap(),
        RouteDef::new(
            "wheel",
            Wheel,
            vec![
                RoutePoint::new(Vector2D::new(4.0, 2.0), 0.8, true, 100.0),
                RoutePoint::new(Vector2D::new(10.0, 25.0), 3.4, false, 0.0),
            ],
            25.0,
        )
        .unwrap(),
        RouteDef::new(
            "corner",
            Corner,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 14.0), 2.0, true, 50.0),
                RoutePoint::new(Vector2D::new(10.0, 24.0), 3.0, false, 0.0),
            ],
            14.0,
        )
        .unwrap(),
        RouteDef::new(
            "dig",
            Dig,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 15.0), 2.1, true, 100.0),
                RoutePoint::new(Vector2D::new(-12.0, 15.0), 2.9, false, 0.0),
            ],
            15.0,
        )
        .unwrap(),
        RouteDef::new(
            "drag",
            Drag,
            vec![
                RoutePoint::new(Vector2D::new(0.0, 4.0), 0.8, true, 45.0),
                RoutePoint::new(Vector2D::new(-15.0, 5.0), 2.4, false, 0.0),
            ],
            4.0,
        )
        .unwrap(),
        RouteDef::new(
            "seam",
            Seam,
            vec![RoutePoint::new(Vector2D::new(2.0, 30.0), 3.2, false, 0.0)],
            30.0,
        )
        .unwrap(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_def_rejects_empty_points() {
        let result = RouteDef::new("bad", RouteType::Go, vec![], 0.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_route_def_rejects_non_increasing_time() {
        let points = vec![
            RoutePoint::new(Vector2D::new(0.0, 5.0), 1.0, false, 0.0),
            RoutePoint::new(Vector2D::new(0.0, 10.0), 1.0, false, 0.0),
        ];
        let result = RouteDef::new("bad", RouteType::Go, points, 5.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_translated_shifts_y_only() {
        let slant = standard_routes()
            .into_iter()
            .find(|r| r.key() == "slant")
            .unwrap();
        let moved = slant.translated(-2.0);
        assert_eq!(moved.points()[0].offset.x, slant.points()[0].offset.x);
        assert_eq!(moved.points()[0].offset.y, slant.points()[0].offset.y - 2.0);
    }

    #[test]
    fn test_standard_routes_cover_all_types() {
        let routes = standard_routes();
        for t in RouteType::all() {
            assert!(routes.iter().any(|r| r.route_type() == t));
        }
    }
}
