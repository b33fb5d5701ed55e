use crate::drawing::FillStyle;
use crate::math::{CubicBez, Vec2};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    Move(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    BezierTo(Vec2, Vec2, Vec2),
}

impl PathOp {
    pub fn end_point(&self) -> Vec2 {
        match *self {
            PathOp::Move(p) | PathOp::LineTo(p) => p,
            PathOp::QuadTo(_, p) => p,
            PathOp::BezierTo(_, _, p) => p,
        }
    }

    pub fn is_curve(&self) -> bool {
        matches!(self, PathOp::BezierTo(..))
    }

    pub fn translated(&self, d: Vec2) -> PathOp {
        match *self {
            PathOp::Move(p) => PathOp::Move(p + d),
            PathOp::LineTo(p) => PathOp::LineTo(p + d),
            PathOp::QuadTo(c, p) => PathOp::QuadTo(c + d, p + d),
            PathOp::BezierTo(c1, c2, p) => PathOp::BezierTo(c1 + d, c2 + d, p + d),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpSetKind {
    Stroke,
    FillPath,
    FillSketch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpSet {
    pub kind: OpSetKind,
    pub ops: Vec<PathOp>,
}

impl OpSet {
    pub fn new(kind: OpSetKind, ops: Vec<PathOp>) -> Self {
        Self { kind, ops }
    }

    pub fn curve_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_curve()).count()
    }

    pub fn to_svg_path(&self) -> String {
        ops_to_svg_path(&self.ops)
    }

    pub fn polylines(&self, tolerance: f64) -> Vec<Vec<Vec2>> {
        flatten_ops(&self.ops, tolerance)
    }
}

pub fn ops_to_svg_path(ops: &[PathOp]) -> String {
    let mut path = String::new();
    for op in ops {
        if !path.is_empty() {
            path.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = match op {
            PathOp::Move(p) => write!(path, "M{} {}", p.x, p.y),
            PathOp::LineTo(p) => write!(path, "L{} {}", p.x, p.y),
            PathOp::QuadTo(c, p) => write!(path, "Q{} {}, {} {}", c.x, c.y, p.x, p.y),
            PathOp::BezierTo(c1, c2, p) => {
                write!(path, "C{} {}, {} {}, {} {}", c1.x, c1.y, c2.x, c2.y, p.x, p.y)
            }
        };
    }
    path
}

pub fn flatten_ops(ops: &[PathOp], tolerance: f64) -> Vec<Vec<Vec2>> {
    let mut lines: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut pen = Vec2::ZERO;

    for op in ops {
        match *op {
            PathOp::Move(p) => {
                if current.len() > 1 {
                    lines.push(std::mem::take(&mut current));
                }
                current.clear();
                current.push(p);
            }
            PathOp::LineTo(p) => {
                if current.is_empty() {
                    current.push(pen);
                }
                current.push(p);
            }
            PathOp::QuadTo(c, p) => {
                if current.is_empty() {
                    current.push(pen);
                }
                let curve = CubicBez::from_quad(pen, c, p);
                current.extend(curve.flatten(curve.segments_for_tolerance(tolerance)));
            }
            PathOp::BezierTo(c1, c2, p) => {
                if current.is_empty() {
                    current.push(pen);
                }
                let curve = CubicBez::new(pen, c1, c2, p);
                current.extend(curve.flatten(curve.segments_for_tolerance(tolerance)));
            }
        }
        pen = op.end_point();
    }
    if current.len() > 1 {
        lines.push(current);
    }
    lines
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoughOptions {
    pub max_randomness_offset: f64,
    pub roughness: f64,
    pub bowing: f64,
    /// `None` paints no outline.
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub curve_fitting: f64,
    pub curve_tightness: f64,
    pub curve_step_count: f64,
    pub fill: Option<String>,
    pub fill_style: FillStyle,
    pub fill_weight: f64,
    /// Degrees.
    pub hachure_angle: f64,
    pub hachure_gap: f64,
    pub stroke_line_dash: Option<Vec<f64>>,
    pub disable_multi_stroke: bool,
    pub disable_multi_stroke_fill: bool,
    pub preserve_vertices: bool,
    pub seed: u32,
}

impl Default for RoughOptions {
    fn default() -> Self {
        Self {
            max_randomness_offset: 2.0,
            roughness: 1.0,
            bowing: 1.0,
            stroke: Some("#000".to_string()),
            stroke_width: 1.0,
            curve_fitting: 0.95,
            curve_tightness: 0.0,
            curve_step_count: 9.0,
            fill: None,
            fill_style: FillStyle::Hachure,
            fill_weight: 0.5,
            hachure_angle: -41.0,
            hachure_gap: 4.0,
            stroke_line_dash: None,
            disable_multi_stroke: false,
            disable_multi_stroke_fill: false,
            preserve_vertices: false,
            seed: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub options: RoughOptions,
    pub sets: Vec<OpSet>,
}

impl Drawable {
    pub fn stroke_sets(&self) -> impl Iterator<Item = &OpSet> {
        self.sets.iter().filter(|s| s.kind == OpSetKind::Stroke)
    }

    pub fn first_stroke_set(&self) -> Option<&OpSet> {
        self.stroke_sets().next()
    }
}
