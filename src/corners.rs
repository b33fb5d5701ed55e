use crate::math::{Vec2, vec2};
use crate::rough::{PathOp, flatten_ops};

/// Corner radius actually drawn: the request clamped to `[0, min(|w|, |h|) / 2]`.
pub fn effective_radius(requested: f64, width: f64, height: f64) -> f64 {
    let limit = width.abs().min(height.abs()) / 2.0;
    if requested.is_nan() || limit.is_nan() {
        return 0.0;
    }
    requested.clamp(0.0, limit.max(0.0))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Polygon(Vec<Vec2>),
    Path(Vec<PathOp>),
}

impl Outline {
    pub fn to_ops(&self) -> Vec<PathOp> {
        match self {
            Outline::Polygon(points) => {
                let mut ops = Vec::with_capacity(points.len() + 1);
                if let Some(first) = points.first() {
                    ops.push(PathOp::Move(*first));
                    ops.extend(points[1..].iter().map(|p| PathOp::LineTo(*p)));
                    ops.push(PathOp::LineTo(*first));
                }
                ops
            }
            Outline::Path(ops) => ops.clone(),
        }
    }

    pub fn to_polygon(&self, tolerance: f64) -> Vec<Vec2> {
        match self {
            Outline::Polygon(points) => points.clone(),
            Outline::Path(ops) => flatten_ops(ops, tolerance).into_iter().flatten().collect(),
        }
    }
}

pub fn rectangle_outline(width: f64, height: f64, rx: f64, ry: f64) -> Outline {
    let erx = effective_radius(rx, width, height);
    let ery = effective_radius(ry, width, height);
    let (w, h) = (width, height);

    if erx <= 0.0 && ery <= 0.0 {
        return Outline::Polygon(vec![vec2(0.0, 0.0), vec2(w, 0.0), vec2(w, h), vec2(0.0, h)]);
    }

    Outline::Path(vec![
        PathOp::Move(vec2(erx, 0.0)),
        PathOp::LineTo(vec2(w - erx, 0.0)),
        PathOp::QuadTo(vec2(w, 0.0), vec2(w, ery)),
        PathOp::LineTo(vec2(w, h - ery)),
        PathOp::QuadTo(vec2(w, h), vec2(w - erx, h)),
        PathOp::LineTo(vec2(erx, h)),
        PathOp::QuadTo(vec2(0.0, h), vec2(0.0, h - ery)),
        PathOp::LineTo(vec2(0.0, ery)),
        PathOp::QuadTo(vec2(0.0, 0.0), vec2(erx, 0.0)),
    ])
}

pub fn diamond_vertices(width: f64, height: f64) -> [Vec2; 4] {
    [
        vec2(width / 2.0, 0.0),
        vec2(width, height / 2.0),
        vec2(width / 2.0, height),
        vec2(0.0, height / 2.0),
    ]
}

pub fn diamond_outline(width: f64, height: f64, rx: f64, ry: f64) -> Outline {
    let vertices = diamond_vertices(width, height);
    let erx = effective_radius(rx, width, height);
    let ery = effective_radius(ry, width, height);

    if erx <= 0.0 && ery <= 0.0 {
        return Outline::Polygon(vertices.to_vec());
    }

    let radius_at = |i: usize| if i % 2 == 0 { erx } else { ery };
    // The drawn offset is additionally capped at half the edge length, so it
    // can be shorter than `effective_radius` (29.15 vs 30 on a 100x60 diamond).
    let join = |vertex: Vec2, toward: Vec2, radius: f64| {
        let edge = toward - vertex;
        let r = radius.min(edge.length() / 2.0);
        vertex + edge.normalize_or_zero() * r
    };

    let start = join(vertices[0], vertices[1], radius_at(0));
    let mut ops = vec![PathOp::Move(start)];
    for step in 1..=4 {
        let i = step % 4;
        let v = vertices[i];
        let prev = vertices[(i + 3) % 4];
        let next = vertices[(i + 1) % 4];
        let r = radius_at(i);
        ops.push(PathOp::LineTo(join(v, prev, r)));
        ops.push(PathOp::BezierTo(v, v, join(v, next, r)));
    }
    Outline::Path(ops)
}
