use super::{StrokeOptions, outline_path, stroke};
use crate::config::FreehandConfig;
use crate::drawing::{FreehandShape, PenPoint, PenStyle, Shape, ShapeKind, ShapeStyle};
use crate::math::Vec2;
use crate::rough::PathOp;

#[derive(Debug, Clone)]
pub struct FreehandSession {
    points: Vec<PenPoint>,
    pen_width: f64,
    pen_style: PenStyle,
    config: FreehandConfig,
    preview: Vec<Vec2>,
}

impl FreehandSession {
    pub fn begin(start: PenPoint, pen_width: f64, pen_style: PenStyle, config: FreehandConfig) -> Self {
        let mut points = Vec::new();
        if is_finite(&start) {
            points.push(start);
        } else {
            log::debug!("ignoring non-finite pointer-down at ({}, {})", start.x, start.y);
        }
        let mut session = Self {
            points,
            pen_width,
            pen_style,
            config,
            preview: Vec::new(),
        };
        session.update_preview();
        session
    }

    pub fn move_to(&mut self, point: PenPoint) -> &[Vec2] {
        if is_finite(&point) {
            self.points.push(point);
            self.update_preview();
        }
        &self.preview
    }

    pub fn points(&self) -> &[PenPoint] {
        &self.points
    }

    pub fn preview(&self) -> &[Vec2] {
        &self.preview
    }

    pub fn preview_path(&self) -> Vec<PathOp> {
        outline_path(&self.preview)
    }

    fn has_pressure(&self) -> bool {
        self.points.iter().any(|p| p.pressure.is_some())
    }

    fn update_preview(&mut self) {
        let o = StrokeOptions::for_pen(&self.config, self.pen_width, self.pen_style, self.has_pressure(), false);
        self.preview = stroke(&self.points, &o);
    }

    pub fn finish(self, style: &ShapeStyle) -> Shape {
        let stroke = FreehandShape::from_absolute(&self.points, self.pen_width, self.pen_style);
        let shape = Shape::create(ShapeKind::Freehand(stroke), style);
        log::debug!("committed freehand {} with {} points", shape.id(), self.points.len());
        shape
    }

    pub fn cancel(self) {
        log::debug!("freehand gesture cancelled after {} points", self.points.len());
    }
}

fn is_finite(point: &PenPoint) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> FreehandSession {
        FreehandSession::begin(PenPoint::new(10.0, 10.0), 2.0, PenStyle::PressureSensitive, FreehandConfig::default())
    }

    #[test]
    fn test_preview_tracks_moves() {
        let mut s = session();
        assert!(!s.preview().is_empty());
        for i in 1..10 {
            s.move_to(PenPoint::new(10.0 + i as f64 * 8.0, 10.0));
        }
        assert_eq!(s.points().len(), 10);
        let max_x = s.preview().iter().map(|p| p.x).fold(f64::MIN, f64::max);
        assert!(max_x > 60.0);
        assert!(!s.preview_path().is_empty());
    }

    #[test]
    fn test_non_finite_samples_are_ignored() {
        let mut s = session();
        s.move_to(PenPoint::new(f64::NAN, 3.0));
        assert_eq!(s.points().len(), 1);
    }

    #[test]
    fn test_non_finite_start_still_round_trips() {
        let mut s = FreehandSession::begin(PenPoint::new(f64::NAN, 5.0), 2.0, PenStyle::Uniform, FreehandConfig::default());
        assert!(s.points().is_empty());
        let tap = s.clone().finish(&ShapeStyle::default());
        let value = crate::registry::shape_to_value(&tap).unwrap();
        assert!(value["x"].is_number());
        assert_eq!(crate::registry::shape_from_value(value).unwrap(), tap);

        s.move_to(PenPoint::new(40.0, 50.0));
        let shape = s.finish(&ShapeStyle::default());
        assert_eq!(shape.origin(), crate::math::vec2(40.0, 50.0));
    }

    #[test]
    fn test_finish_commits_relative_pen_shape() {
        let mut s = session();
        s.move_to(PenPoint::new(30.0, 20.0));
        let shape = s.finish(&ShapeStyle::default());
        match &shape.kind {
            ShapeKind::Freehand(f) => {
                assert_eq!((f.x, f.y), (10.0, 10.0));
                assert_eq!(f.points.len(), 2);
                assert_eq!(f.points[1].position(), crate::math::vec2(20.0, 10.0));
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert!(shape.seed() > 0);
    }

    #[test]
    fn test_tap_commits_a_dot() {
        let shape = session().finish(&ShapeStyle::default());
        let ShapeKind::Freehand(f) = &shape.kind else {
            panic!("expected a freehand shape");
        };
        assert_eq!(f.points.len(), 1);
        assert!(!super::super::shape_outline(f, &FreehandConfig::default()).is_empty());
    }
}
