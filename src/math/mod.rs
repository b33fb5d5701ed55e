mod bezier;
mod mat3;
mod vec2;

pub use bezier::CubicBez;
pub use mat3::Mat3;
pub use vec2::{Vec2, vec2};

pub const PI: f64 = std::f64::consts::PI;
pub const TAU: f64 = std::f64::consts::TAU;

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 { a + TAU } else { a }
}

pub fn point_to_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f64 {
    let length_squared = a.distance_squared(b);

    if length_squared == 0.0 {
        return point.distance(a);
    }

    let t = ((point - a).dot(b - a) / length_squared).clamp(0.0, 1.0);
    point.distance(a.lerp(b, t))
}

pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
