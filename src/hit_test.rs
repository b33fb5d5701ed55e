use crate::corners::{diamond_outline, rectangle_outline};
use crate::drawing::{Shape, ShapeKind};
use crate::math::{TAU, Vec2, point_in_polygon, point_to_segment_distance, vec2};

pub const HIT_TOLERANCE: f64 = 10.0;
const ELLIPSE_SEGMENTS: usize = 64;
const OUTLINE_FLATTEN_TOLERANCE: f64 = 0.5;

fn to_local(shape: &Shape, point: Vec2) -> Vec2 {
    point.rotate_around(shape.center(), -shape.attrs.angle) - shape.origin()
}

fn stroke_slop(shape: &Shape, tolerance: f64) -> f64 {
    tolerance + shape.attrs.stroke_width / 2.0
}

fn polyline_distance(point: Vec2, points: &[Vec2], closed: bool) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => {
            let mut best = points
                .windows(2)
                .map(|w| point_to_segment_distance(point, w[0], w[1]))
                .fold(f64::INFINITY, f64::min);
            if closed {
                let (first, last) = (points[0], points[points.len() - 1]);
                best = best.min(point_to_segment_distance(point, last, first));
            }
            best
        }
    }
}

fn hit_polygon(shape: &Shape, polygon: &[Vec2], local: Vec2, tolerance: f64) -> bool {
    if shape.is_filled() && point_in_polygon(local, polygon) {
        return true;
    }
    polyline_distance(local, polygon, true) <= stroke_slop(shape, tolerance)
}

pub fn hit_rectangle(shape: &Shape, point: Vec2, tolerance: f64) -> bool {
    let ShapeKind::Rectangle(b) = &shape.kind else {
        return false;
    };
    let polygon = rectangle_outline(b.frame.width, b.frame.height, b.rx, b.ry).to_polygon(OUTLINE_FLATTEN_TOLERANCE);
    hit_polygon(shape, &polygon, to_local(shape, point), tolerance)
}

pub fn hit_diamond(shape: &Shape, point: Vec2, tolerance: f64) -> bool {
    let ShapeKind::Diamond(b) = &shape.kind else {
        return false;
    };
    let polygon = diamond_outline(b.frame.width, b.frame.height, b.rx, b.ry).to_polygon(OUTLINE_FLATTEN_TOLERANCE);
    hit_polygon(shape, &polygon, to_local(shape, point), tolerance)
}

pub fn hit_ellipse(shape: &Shape, point: Vec2, tolerance: f64) -> bool {
    let ShapeKind::Ellipse(frame) = &shape.kind else {
        return false;
    };
    let (a, b) = (frame.width / 2.0, frame.height / 2.0);
    let local = to_local(shape, point) - vec2(a, b);
    if shape.is_filled() && a > 0.0 && b > 0.0 && (local.x / a).powi(2) + (local.y / b).powi(2) <= 1.0 {
        return true;
    }
    let ring: Vec<Vec2> = (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
            vec2(a * t.cos(), b * t.sin())
        })
        .collect();
    polyline_distance(local, &ring, true) <= stroke_slop(shape, tolerance)
}

pub fn hit_linear(shape: &Shape, point: Vec2, tolerance: f64) -> bool {
    let (ShapeKind::Line(l) | ShapeKind::Arrow(l)) = &shape.kind else {
        return false;
    };
    let local = to_local(shape, point);
    point_to_segment_distance(local, Vec2::ZERO, l.end() - l.start()) <= stroke_slop(shape, tolerance)
}

pub fn hit_freehand(shape: &Shape, point: Vec2, tolerance: f64) -> bool {
    let ShapeKind::Freehand(f) = &shape.kind else {
        return false;
    };
    let local = to_local(shape, point);
    let points: Vec<Vec2> = f.points.iter().map(|p| p.position()).collect();
    polyline_distance(local, &points, false) <= tolerance + f.pen_width
}

pub fn hit_frame(shape: &Shape, point: Vec2, tolerance: f64) -> bool {
    let (min, max) = shape.local_extents();
    let local = to_local(shape, point);
    local.x >= min.x - tolerance && local.x <= max.x + tolerance && local.y >= min.y - tolerance && local.y <= max.y + tolerance
}

pub fn hit_test(shape: &Shape, point: Vec2, tolerance: f64) -> bool {
    if shape.is_deleted() || !point.is_finite() {
        return false;
    }
    (crate::registry::handlers_for(shape.shape_type()).hit_test)(shape, point, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Frame, ShapeStyle, StylePatch};
    use crate::math::PI;

    fn shape(kind: ShapeKind) -> Shape {
        Shape::with_seed(kind, &ShapeStyle::default(), 1)
    }

    fn filled(s: Shape) -> Shape {
        s.with_style_patch(&StylePatch {
            background_color: Some("#ffc9c9".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_unfilled_rectangle_hits_only_outline() {
        let r = shape(ShapeKind::rectangle(Frame::new(0.0, 0.0, 100.0, 100.0)));
        assert!(hit_test(&r, vec2(1.0, 50.0), HIT_TOLERANCE));
        assert!(!hit_test(&r, vec2(50.0, 50.0), HIT_TOLERANCE));
        assert!(hit_test(&filled(r), vec2(50.0, 50.0), HIT_TOLERANCE));
    }

    #[test]
    fn test_rotated_line() {
        let l = shape(ShapeKind::line(vec2(0.0, 0.0), vec2(100.0, 0.0))).rotated_to(PI / 2.0);
        // rotated about (50, 0): now runs from (50, -50) to (50, 50)
        assert!(hit_test(&l, vec2(50.0, 40.0), 1.0));
        assert!(!hit_test(&l, vec2(90.0, 0.0), 1.0));
    }

    #[test]
    fn test_ellipse_interior_and_outline() {
        let e = shape(ShapeKind::ellipse(Frame::new(0.0, 0.0, 100.0, 50.0)));
        assert!(hit_test(&e, vec2(100.0, 25.0), 2.0));
        assert!(!hit_test(&e, vec2(50.0, 25.0), 2.0));
        assert!(hit_test(&filled(e), vec2(50.0, 25.0), 2.0));
    }

    #[test]
    fn test_diamond_corner_is_outside() {
        let d = filled(shape(ShapeKind::diamond(Frame::new(0.0, 0.0, 100.0, 100.0))));
        assert!(hit_test(&d, vec2(50.0, 50.0), 1.0));
        assert!(!hit_test(&d, vec2(5.0, 5.0), 1.0));
    }

    #[test]
    fn test_deleted_shapes_never_hit() {
        let r = filled(shape(ShapeKind::rectangle(Frame::new(0.0, 0.0, 10.0, 10.0)))).as_deleted();
        assert!(!hit_test(&r, vec2(5.0, 5.0), HIT_TOLERANCE));
    }

    #[test]
    fn test_text_frame_hits_inside() {
        let t = shape(ShapeKind::text(Frame::new(0.0, 0.0, 80.0, 20.0), "hello", 16.0));
        assert!(hit_test(&t, vec2(40.0, 10.0), 0.0));
        assert!(!hit_test(&t, vec2(40.0, 30.0), 0.0));
    }
}
