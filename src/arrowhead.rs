use crate::drawing::{Arrowhead, FillStyle, StrokeStyle};
use crate::math::{CubicBez, Vec2};
use crate::rough::{Drawable, PathOp, RoughGenerator, RoughOptions};

pub const REFERENCE_T: f64 = 0.3;
pub const ARROW_SIZE: f64 = 30.0;
pub const CAP_SIZE: f64 = 15.0;
pub const ARROW_ANGLE_DEG: f64 = 20.0;
pub const BAR_ANGLE_DEG: f64 = 90.0;
pub const TRIANGLE_ANGLE_DEG: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapPosition {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowheadGeometry {
    Arrow { tip: Vec2, wings: [Vec2; 2] },
    Bar { wings: [Vec2; 2] },
    Triangle { tip: Vec2, wings: [Vec2; 2] },
    Dot { center: Vec2, radius: f64 },
}

impl ArrowheadGeometry {
    pub fn tip(&self) -> Vec2 {
        match *self {
            ArrowheadGeometry::Arrow { tip, .. } | ArrowheadGeometry::Triangle { tip, .. } => tip,
            ArrowheadGeometry::Bar { wings } => wings[0].midpoint(wings[1]),
            ArrowheadGeometry::Dot { center, .. } => center,
        }
    }
}

fn fixed_size(kind: Arrowhead) -> f64 {
    match kind {
        Arrowhead::Arrow => ARROW_SIZE,
        _ => CAP_SIZE,
    }
}

fn wing_angle(kind: Arrowhead) -> f64 {
    match kind {
        Arrowhead::Arrow => ARROW_ANGLE_DEG,
        Arrowhead::Bar => BAR_ANGLE_DEG,
        _ => TRIANGLE_ANGLE_DEG,
    }
}

fn reference_length(kind: Arrowhead, points: &[Vec2]) -> f64 {
    if kind == Arrowhead::Arrow {
        let n = points.len();
        match n {
            0 => 0.0,
            1 => points[0].length(),
            _ => points[n - 1].distance(points[n - 2]),
        }
    } else {
        let mut prev = Vec2::ZERO;
        let mut length = 0.0;
        for p in points {
            length += prev.distance(*p);
            prev = *p;
        }
        length
    }
}

pub fn arrowhead_points(
    body: &Drawable,
    points: &[Vec2],
    position: CapPosition,
    kind: Arrowhead,
    stroke_width: f64,
) -> Option<ArrowheadGeometry> {
    if kind == Arrowhead::None {
        return None;
    }
    let ops = &body.first_stroke_set()?.ops;
    if ops.len() < 2 {
        log::trace!("arrowhead skipped: body has no curve ops");
        return None;
    }
    let index = match position {
        CapPosition::Start => 1,
        CapPosition::End => ops.len() - 1,
    };
    let PathOp::BezierTo(p1, p2, p3) = ops[index] else {
        log::trace!("arrowhead skipped: op {index} is not a curve");
        return None;
    };
    let p0 = match ops[index - 1] {
        PathOp::Move(p) => p,
        PathOp::BezierTo(_, _, p) => p,
        _ => Vec2::ZERO,
    };

    let endpoint = match position {
        CapPosition::Start => p0,
        CapPosition::End => p3,
    };
    let reference = CubicBez::new(p0, p1, p2, p3).reversed().eval(REFERENCE_T);
    let Some(direction) = (endpoint - reference).try_normalize() else {
        log::trace!("arrowhead skipped: no direction at {endpoint:?}");
        return None;
    };

    let size = fixed_size(kind).min(reference_length(kind, points) / 2.0);
    if size.is_nan() || size <= 0.0 {
        return None;
    }
    let base = endpoint - direction * size;

    if kind == Arrowhead::Dot {
        return Some(ArrowheadGeometry::Dot {
            center: endpoint,
            radius: base.distance(endpoint) + stroke_width,
        });
    }

    let angle = wing_angle(kind).to_radians();
    let wings = [base.rotate_around(endpoint, -angle), base.rotate_around(endpoint, angle)];
    Some(match kind {
        Arrowhead::Arrow => ArrowheadGeometry::Arrow { tip: endpoint, wings },
        Arrowhead::Bar => ArrowheadGeometry::Bar { wings },
        _ => ArrowheadGeometry::Triangle { tip: endpoint, wings },
    })
}

pub fn dotted_dash(stroke_width: f64) -> Vec<f64> {
    vec![1.5, 6.0 + stroke_width]
}

pub fn dashed_dash(stroke_width: f64) -> Vec<f64> {
    vec![8.0, 8.0 + stroke_width]
}

pub fn cap_drawables(
    generator: &RoughGenerator,
    geometry: &ArrowheadGeometry,
    body_options: &RoughOptions,
    stroke_style: StrokeStyle,
    stroke_width: f64,
) -> Vec<Drawable> {
    match *geometry {
        ArrowheadGeometry::Dot { center, radius } => {
            let o = RoughOptions {
                fill: body_options.stroke.clone(),
                fill_style: FillStyle::Solid,
                stroke: None,
                ..body_options.clone()
            };
            vec![generator.circle(center, radius * 2.0, &o)]
        }
        ArrowheadGeometry::Triangle { tip, wings } => {
            let o = RoughOptions {
                fill: body_options.stroke.clone(),
                fill_style: FillStyle::Solid,
                stroke_line_dash: None,
                ..body_options.clone()
            };
            vec![generator.polygon(&[tip, wings[0], wings[1], tip], &o)]
        }
        ArrowheadGeometry::Bar { wings } => vec![generator.line(wings[0], wings[1], body_options)],
        ArrowheadGeometry::Arrow { tip, wings } => {
            let stroke_line_dash = match stroke_style {
                StrokeStyle::Dotted => {
                    let dash = dotted_dash(stroke_width - 1.0);
                    Some(vec![dash[0], dash[1] - 1.0])
                }
                _ => None,
            };
            let o = RoughOptions {
                stroke_line_dash,
                ..body_options.clone()
            };
            vec![generator.line(wings[0], tip, &o), generator.line(wings[1], tip, &o)]
        }
    }
}
