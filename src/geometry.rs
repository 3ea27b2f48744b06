//! Vectors, collision shapes and the random helpers every spawner uses.

use rand::Rng;

/// A point in world space. y grows upward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Vec2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn translate(self, dx: f64, dy: f64) -> Vec2 {
        Vec2::new(self.x + dx, self.y + dy)
    }

    pub fn midpoint(self, other: Vec2) -> Vec2 {
        Vec2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

// ── Randomness ───────────────────────────────────────────────────────────────

/// Uniform in `[min, max)`. A degenerate range yields `min`.
pub fn random_in_range(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..max)
}

pub fn random_position_in_bound(rng: &mut impl Rng, lower_left: Vec2, upper_right: Vec2) -> Vec2 {
    Vec2::new(
        random_in_range(rng, lower_left.x, upper_right.x),
        random_in_range(rng, lower_left.y, upper_right.y),
    )
}

pub fn check_probability(rng: &mut impl Rng, probability: f64) -> bool {
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

// ── Shapes ───────────────────────────────────────────────────────────────────

/// A collision outline centred on its owner's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
}

impl Shape {
    /// Width and height of the axis-aligned box around the shape.
    pub fn extent(&self) -> (f64, f64) {
        match *self {
            Shape::Rect { width, height } => (width, height),
            Shape::Circle { radius } => (radius * 2.0, radius * 2.0),
        }
    }

    /// `(min_x, min_y, max_x, max_y)` of the shape placed at `center`.
    pub fn aabb(&self, center: Vec2) -> (f64, f64, f64, f64) {
        let (w, h) = self.extent();
        (
            center.x - w / 2.0,
            center.y - h / 2.0,
            center.x + w / 2.0,
            center.y + h / 2.0,
        )
    }

    /// Whether the two placed shapes overlap. Touching edges count.
    pub fn intersects(&self, center: Vec2, other: &Shape, other_center: Vec2) -> bool {
        match (*self, *other) {
            (Shape::Rect { .. }, Shape::Rect { .. }) => {
                let (ax0, ay0, ax1, ay1) = self.aabb(center);
                let (bx0, by0, bx1, by1) = other.aabb(other_center);
                ax0 <= bx1 && bx0 <= ax1 && ay0 <= by1 && by0 <= ay1
            }
            (Shape::Circle { radius }, Shape::Rect { .. }) => {
                circle_touches_rect(center, radius, other.aabb(other_center))
            }
            (Shape::Rect { .. }, Shape::Circle { radius }) => {
                circle_touches_rect(other_center, radius, self.aabb(center))
            }
            (Shape::Circle { radius: a }, Shape::Circle { radius: b }) => {
                center.distance_to(other_center) <= a + b
            }
        }
    }
}

fn circle_touches_rect(center: Vec2, radius: f64, (x0, y0, x1, y1): (f64, f64, f64, f64)) -> bool {
    let nearest = Vec2::new(center.x.clamp(x0, x1), center.y.clamp(y0, y1));
    center.distance_to(nearest) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_misses_rect_corner() {
        let circle = Shape::Circle { radius: 10.0 };
        let rect = Shape::Rect { width: 20.0, height: 20.0 };
        // Circle centre sits diagonally off the (10, 10) corner by more than r.
        assert!(!circle.intersects(Vec2::new(18.0, 18.0), &rect, Vec2::default()));
        assert!(circle.intersects(Vec2::new(15.0, 15.0), &rect, Vec2::default()));
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut rng = rand::thread_rng();
        assert_eq!(random_in_range(&mut rng, 3.0, 3.0), 3.0);
        assert_eq!(random_in_range(&mut rng, 5.0, 1.0), 5.0);
    }
}
