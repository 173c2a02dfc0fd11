use serde::{Deserialize, Serialize};

/// Numeric tolerance, in yards, below which two positions are treated as
/// coincident.
pub const EPSILON: f64 = 1e-6;

/// # `Vector2D` struct
///
/// A `Vector2D` is a point or displacement on the field, in yards. `x` runs
/// sideline to sideline (`[0, 53.33]`), `y` runs from the offense's own
/// end zone toward the opponent's (`[0, 120]`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    /// Constructor for the `Vector2D` struct
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let v = Vector2D::new(26.665, 30.0);
    /// ```
    pub fn new(x: f64, y: f64) -> Vector2D {
        Vector2D { x, y }
    }

    /// The zero vector
    pub fn zero() -> Vector2D {
        Vector2D { x: 0.0, y: 0.0 }
    }

    /// Component-wise addition
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let a = Vector2D::new(1.0, 2.0);
    /// let b = Vector2D::new(3.0, 4.0);
    /// let c = a.add(&b);
    /// assert_eq!(c, Vector2D::new(4.0, 6.0));
    /// ```
    pub fn add(&self, other: &Vector2D) -> Vector2D {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise subtraction (`self - other`)
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let a = Vector2D::new(3.0, 4.0);
    /// let b = Vector2D::new(1.0, 1.0);
    /// let c = a.subtract(&b);
    /// assert_eq!(c, Vector2D::new(2.0, 3.0));
    /// ```
    pub fn subtract(&self, other: &Vector2D) -> Vector2D {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }

    /// Uniform scale
    pub fn scale(&self, factor: f64) -> Vector2D {
        Vector2D::new(self.x * factor, self.y * factor)
    }

    /// Euclidean magnitude
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let v = Vector2D::new(3.0, 4.0);
    /// assert_eq!(v.magnitude(), 5.0);
    /// ```
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Distance between two points
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let a = Vector2D::new(0.0, 0.0);
    /// let b = Vector2D::new(3.0, 4.0);
    /// assert_eq!(a.distance(&b), 5.0);
    /// ```
    pub fn distance(&self, other: &Vector2D) -> f64 {
        self.subtract(other).magnitude()
    }

    /// Dot product
    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the direction of `self`. Returns the zero vector when
    /// `self` is within `EPSILON` of the origin, avoiding a division by
    /// (near) zero.
    pub fn normalize(&self) -> Vector2D {
        let mag = self.magnitude();
        if mag < EPSILON {
            return Vector2D::zero();
        }
        self.scale(1.0 / mag)
    }

    /// Moves `self` toward `target`, capped at `max_step` yards. Never
    /// overshoots `target`.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let start = Vector2D::new(0.0, 0.0);
    /// let target = Vector2D::new(10.0, 0.0);
    /// let next = start.move_toward(&target, 3.0);
    /// assert_eq!(next, Vector2D::new(3.0, 0.0));
    ///
    /// let arrived = start.move_toward(&target, 20.0);
    /// assert_eq!(arrived, target);
    /// ```
    pub fn move_toward(&self, target: &Vector2D, max_step: f64) -> Vector2D {
        let delta = target.subtract(self);
        let dist = delta.magnitude();
        if dist <= max_step || dist < EPSILON {
            return *target;
        }
        self.add(&delta.scale(max_step / dist))
    }

    /// Angle, in radians, of the vector from `self` to `other`, measured
    /// from the positive y-axis (straight upfield) so that `0` is "go
    /// straight" and positive values rotate toward the positive x-axis.
    pub fn angle_to(&self, other: &Vector2D) -> f64 {
        let delta = other.subtract(self);
        delta.x.atan2(delta.y)
    }

    /// Clamp `self` to lie within the playable field rectangle, replacing
    /// any `NaN` component with the nearest in-bounds edge.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let out_of_bounds = Vector2D::new(-5.0, 200.0);
    /// let clamped = out_of_bounds.clamp_to_field();
    /// assert_eq!(clamped, Vector2D::new(0.0, 120.0));
    /// ```
    pub fn clamp_to_field(&self) -> Vector2D {
        crate::geometry::field::clamp_to_field(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero() {
        let v = Vector2D::zero();
        assert_eq!(v.normalize(), Vector2D::zero());
    }

    #[test]
    fn test_move_toward_does_not_overshoot() {
        let start = Vector2D::new(0.0, 0.0);
        let target = Vector2D::new(1.0, 0.0);
        let next = start.move_toward(&target, 5.0);
        assert_eq!(next, target);
    }

    #[test]
    fn test_clamp_to_field_nan() {
        let v = Vector2D::new(f64::NAN, 10.0);
        let clamped = v.clamp_to_field();
        assert!(clamped.x >= 0.0 && clamped.x <= 53.33);
    }
}
