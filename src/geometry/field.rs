use crate::geometry::vector::Vector2D;

/// Field length, goal line to goal line plus both end zones, in yards.
pub const FIELD_LENGTH: f64 = 120.0;

/// Field width, sideline to sideline, in yards.
pub const FIELD_WIDTH: f64 = 53.33;

/// End zone depth, in yards.
pub const END_ZONE_DEPTH: f64 = 10.0;

/// Horizontal offset of each hash mark from the field's longitudinal
/// center line, in yards.
pub const HASH_OFFSET: f64 = 3.08;

/// Horizontal offset of "the numbers" from the field's longitudinal center
/// line, in yards.
pub const NUMBERS_OFFSET: f64 = 13.33;

/// The x-coordinate of the field's longitudinal center line.
pub const CENTER_X: f64 = FIELD_WIDTH / 2.0;

/// Fixed speed of a thrown ball, in yards per second.
pub const BALL_SPEED: f64 = 25.0;

/// Depth, in yards past the line of scrimmage, at which a zone is
/// considered "deep" rather than "underneath".
pub const DEEP_ZONE_DEPTH: f64 = 15.0;

/// Cushion a deep-zone defender must keep behind the deepest receiver in
/// the zone, in yards.
pub const DEEP_CUSHION: f64 = 2.0;

/// x-coordinate of the left hash.
pub fn left_hash() -> f64 {
    CENTER_X - HASH_OFFSET
}

/// x-coordinate of the right hash.
pub fn right_hash() -> f64 {
    CENTER_X + HASH_OFFSET
}

/// x-coordinate of the left numbers.
pub fn left_numbers() -> f64 {
    CENTER_X - NUMBERS_OFFSET
}

/// x-coordinate of the right numbers.
pub fn right_numbers() -> f64 {
    CENTER_X + NUMBERS_OFFSET
}

/// x-coordinates splitting the field into thirds (left, middle, right),
/// at 1/6, 1/2 and 5/6 of `FIELD_WIDTH`.
pub fn thirds() -> (f64, f64, f64) {
    (FIELD_WIDTH / 6.0, FIELD_WIDTH / 2.0, FIELD_WIDTH * 5.0 / 6.0)
}

/// Which hash the ball is snapped from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub enum Hash {
    Left,
    #[default]
    Middle,
    Right,
}

impl Hash {
    /// The x-coordinate corresponding to this hash.
    pub fn x(&self) -> f64 {
        match self {
            Hash::Left => left_hash(),
            Hash::Middle => CENTER_X,
            Hash::Right => right_hash(),
        }
    }

    /// Recompute the hash a ball should be spotted at given its
    /// x-coordinate at the end of a play, per spec.md's `nextPlay` hash
    /// recalculation rule: the ball is placed on the nearer hash, or the
    /// middle hash when it ended between the hashes' inside edges.
    pub fn from_ball_x(x: f64) -> Hash {
        if x < left_hash() {
            Hash::Left
        } else if x > right_hash() {
            Hash::Right
        } else {
            Hash::Middle
        }
    }
}

/// Clamp an arbitrary position to the playable field rectangle, replacing
/// any non-finite component with the nearest in-bounds edge.
///
/// ### Example
/// ```
/// use gridiron_core::geometry::{Vector2D, clamp_to_field};
///
/// let v = Vector2D::new(-10.0, 130.0);
/// let clamped = clamp_to_field(&v);
/// assert_eq!(clamped, Vector2D::new(0.0, 120.0));
/// ```
pub fn clamp_to_field(v: &Vector2D) -> Vector2D {
    let x = if v.x.is_finite() {
        v.x.clamp(0.0, FIELD_WIDTH)
    } else {
        FIELD_WIDTH / 2.0
    };
    let y = if v.y.is_finite() {
        v.y.clamp(0.0, FIELD_LENGTH)
    } else {
        FIELD_LENGTH / 2.0
    };
    Vector2D::new(x, y)
}

/// Quadratic Bezier interpolation between `start` and `end` through
/// `control`, at parameter `t` in `[0, 1]`. Used to curve zone drops and
/// motion paths rather than move defenders in straight lines.
///
/// ### Example
/// ```
/// use gridiron_core::geometry::{Vector2D, bezier_quadratic};
///
/// let start = Vector2D::new(0.0, 0.0);
/// let control = Vector2D::new(5.0, 0.0);
/// let end = Vector2D::new(10.0, 0.0);
/// let mid = bezier_quadratic(&start, &control, &end, 0.5);
/// assert_eq!(mid, Vector2D::new(5.0, 0.0));
/// ```
pub fn bezier_quadratic(start: &Vector2D, control: &Vector2D, end: &Vector2D, t: f64) -> Vector2D {
    let t = t.clamp(0.0, 1.0);
    let one_minus_t = 1.0 - t;
    let a = start.scale(one_minus_t * one_minus_t);
    let b = control.scale(2.0 * one_minus_t * t);
    let c = end.scale(t * t);
    a.add(&b).add(&c)
}

/// Ease-in-out quadratic easing curve, used to interpolate defensive
/// timing-system adjustments between their original and target positions.
///
/// ### Example
/// ```
/// use gridiron_core::geometry::ease_in_out_quad;
///
/// assert_eq!(ease_in_out_quad(0.0), 0.0);
/// assert_eq!(ease_in_out_quad(1.0), 1.0);
/// ```
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Linear interpolation between two positions.
pub fn lerp(start: &Vector2D, end: &Vector2D, t: f64) -> Vector2D {
    let t = t.clamp(0.0, 1.0);
    start.add(&end.subtract(start).scale(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_from_ball_x() {
        assert_eq!(Hash::from_ball_x(5.0), Hash::Left);
        assert_eq!(Hash::from_ball_x(CENTER_X), Hash::Middle);
        assert_eq!(Hash::from_ball_x(FIELD_WIDTH - 1.0), Hash::Right);
    }

    #[test]
    fn test_ease_in_out_quad_midpoint_is_half() {
        assert_eq!(ease_in_out_quad(0.5), 0.5);
    }

    #[test]
    fn test_bezier_endpoints() {
        let start = Vector2D::new(1.0, 2.0);
        let control = Vector2D::new(3.0, 4.0);
        let end = Vector2D::new(5.0, 6.0);
        assert_eq!(bezier_quadratic(&start, &control, &end, 0.0), start);
        assert_eq!(bezier_quadratic(&start, &control, &end, 1.0), end);
    }
}
