use crate::corners::diamond_vertices;
use crate::drawing::{Shape, ShapeKind};
use crate::math::{Vec2, vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = Bounds::new(first.x, first.y, first.x, first.y);
        for p in iter {
            b.include(p);
        }
        Some(b)
    }

    pub fn include(&mut self, p: Vec2) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn min(&self) -> Vec2 {
        vec2(self.min_x, self.min_y)
    }

    pub fn max(&self) -> Vec2 {
        vec2(self.max_x, self.max_y)
    }

    pub fn center(&self) -> Vec2 {
        vec2((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x && self.min_y <= other.max_y && self.max_y >= other.min_y
    }

    pub fn expanded(&self, margin: f64) -> Bounds {
        Bounds::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }
}

pub fn shape_bounds(shape: &Shape) -> Bounds {
    let origin = shape.origin();
    let center = shape.center();
    let angle = shape.attrs.angle;
    let place = |p: Vec2| (origin + p).rotate_around(center, angle);

    let bounds = match &shape.kind {
        ShapeKind::Ellipse(frame) => {
            let (a, b) = (frame.width / 2.0, frame.height / 2.0);
            let (sin, cos) = angle.sin_cos();
            let ex = ((a * cos).powi(2) + (b * sin).powi(2)).sqrt();
            let ey = ((a * sin).powi(2) + (b * cos).powi(2)).sqrt();
            Some(Bounds::new(center.x - ex, center.y - ey, center.x + ex, center.y + ey))
        }
        ShapeKind::Diamond(b) => Bounds::from_points(diamond_vertices(b.frame.width, b.frame.height).map(place)),
        ShapeKind::Line(l) | ShapeKind::Arrow(l) => Bounds::from_points([Vec2::ZERO, l.end() - l.start()].map(place)),
        ShapeKind::Freehand(f) => Bounds::from_points(f.points.iter().map(|p| place(p.position()))),
        ShapeKind::Rectangle(_) | ShapeKind::Image(_) | ShapeKind::Text(_) => {
            let (min, max) = shape.local_extents();
            Bounds::from_points([min, vec2(max.x, min.y), max, vec2(min.x, max.y)].map(place))
        }
    };
    bounds.unwrap_or_else(|| Bounds::new(origin.x, origin.y, origin.x, origin.y))
}

pub fn common_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Option<Bounds> {
    shapes
        .into_iter()
        .filter(|s| !s.is_deleted())
        .map(shape_bounds)
        .reduce(|acc, b| acc.union(&b))
}

pub fn closest_shape_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>, from: Vec2) -> Option<Bounds> {
    shapes
        .into_iter()
        .filter(|s| !s.is_deleted())
        .map(shape_bounds)
        .min_by(|a, b| a.center().distance(from).total_cmp(&b.center().distance(from)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Frame, ShapeStyle};
    use crate::math::PI;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::with_seed(ShapeKind::rectangle(Frame::new(x, y, w, h)), &ShapeStyle::default(), 1)
    }

    #[test]
    fn test_common_bounds_union() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        assert_eq!(common_bounds([&a, &b]), Some(Bounds::new(0.0, 0.0, 20.0, 20.0)));
    }

    #[test]
    fn test_deleted_shapes_are_ignored() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(100.0, 100.0, 10.0, 10.0).as_deleted();
        assert_eq!(common_bounds([&a, &b]), Some(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(common_bounds([&b]), None);
    }

    #[test]
    fn test_rotated_rectangle_bounds() {
        let r = rect(0.0, 0.0, 20.0, 10.0).rotated_to(PI / 2.0);
        let b = shape_bounds(&r);
        assert!((b.min_x - 5.0).abs() < 1e-9);
        assert!((b.max_x - 15.0).abs() < 1e-9);
        assert!((b.min_y + 5.0).abs() < 1e-9);
        assert!((b.max_y - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_ellipse_bounds_are_tight() {
        let e = Shape::with_seed(
            ShapeKind::ellipse(Frame::new(0.0, 0.0, 40.0, 20.0)),
            &ShapeStyle::default(),
            1,
        )
        .rotated_to(PI / 2.0);
        let b = shape_bounds(&e);
        assert!((b.width() - 20.0).abs() < 1e-9);
        assert!((b.height() - 40.0).abs() < 1e-9);
        assert_eq!(b.center(), vec2(20.0, 10.0));
    }

    #[test]
    fn test_closest_shape_bounds() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(1000.0, 1000.0, 10.0, 10.0);
        let closest = closest_shape_bounds([&a, &b], vec2(990.0, 990.0)).unwrap();
        assert_eq!(closest.min(), vec2(1000.0, 1000.0));
    }
}
