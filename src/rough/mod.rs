mod fill;
mod ops;

pub use ops::{Drawable, OpSet, OpSetKind, PathOp, RoughOptions, flatten_ops, ops_to_svg_path};

use crate::config::RoughConfig;
use crate::math::{CubicBez, PI, TAU, Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(crate) struct Sketcher {
    rng: StdRng,
}

impl Sketcher {
    pub(crate) fn new(seed: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(u64::from(seed)),
        }
    }

    fn random(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn offset(&mut self, min: f64, max: f64, o: &RoughOptions, roughness_gain: f64) -> f64 {
        o.roughness * roughness_gain * (self.random() * (max - min) + min)
    }

    pub(crate) fn offset_opt(&mut self, x: f64, o: &RoughOptions, roughness_gain: f64) -> f64 {
        self.offset(-x, x, o, roughness_gain)
    }

    /// One wobbly cubic from `a` to `b`. `overlay` is the second pass of a
    /// double stroke and uses half the jitter.
    fn line(&mut self, a: Vec2, b: Vec2, o: &RoughOptions, move_to: bool, overlay: bool) -> Vec<PathOp> {
        let length_sq = a.distance_squared(b);
        let length = length_sq.sqrt();
        let roughness_gain = if length < 200.0 {
            1.0
        } else if length > 500.0 {
            0.4
        } else {
            -0.0016668 * length + 1.233334
        };

        let mut offset = o.max_randomness_offset;
        if offset * offset * 100.0 > length_sq {
            offset = length / 10.0;
        }
        let jitter = if overlay { offset / 2.0 } else { offset };

        let diverge_point = 0.2 + self.random() * 0.2;
        let mid_disp_x = o.bowing * o.max_randomness_offset * (b.y - a.y) / 200.0;
        let mid_disp_y = o.bowing * o.max_randomness_offset * (a.x - b.x) / 200.0;
        let mid_disp_x = self.offset_opt(mid_disp_x, o, roughness_gain);
        let mid_disp_y = self.offset_opt(mid_disp_y, o, roughness_gain);

        let preserve = o.preserve_vertices;
        let mut ops = Vec::with_capacity(2);
        if move_to {
            let dx = if preserve { 0.0 } else { self.offset_opt(jitter, o, roughness_gain) };
            let dy = if preserve { 0.0 } else { self.offset_opt(jitter, o, roughness_gain) };
            ops.push(PathOp::Move(vec2(a.x + dx, a.y + dy)));
        }

        let d = b - a;
        let cp1 = vec2(
            mid_disp_x + a.x + d.x * diverge_point + self.offset_opt(jitter, o, roughness_gain),
            mid_disp_y + a.y + d.y * diverge_point + self.offset_opt(jitter, o, roughness_gain),
        );
        let cp2 = vec2(
            mid_disp_x + a.x + 2.0 * d.x * diverge_point + self.offset_opt(jitter, o, roughness_gain),
            mid_disp_y + a.y + 2.0 * d.y * diverge_point + self.offset_opt(jitter, o, roughness_gain),
        );
        let end = if preserve {
            b
        } else {
            vec2(
                b.x + self.offset_opt(jitter, o, roughness_gain),
                b.y + self.offset_opt(jitter, o, roughness_gain),
            )
        };
        ops.push(PathOp::BezierTo(cp1, cp2, end));
        ops
    }

    pub(crate) fn double_line(&mut self, a: Vec2, b: Vec2, o: &RoughOptions, filling: bool) -> Vec<PathOp> {
        let single = if filling { o.disable_multi_stroke_fill } else { o.disable_multi_stroke };
        let mut ops = self.line(a, b, o, true, false);
        if !single {
            ops.extend(self.line(a, b, o, true, true));
        }
        ops
    }

    fn linear_path(&mut self, points: &[Vec2], close: bool, o: &RoughOptions) -> Vec<PathOp> {
        let mut ops = Vec::new();
        match points.len() {
            0 | 1 => {}
            2 => ops.extend(self.double_line(points[0], points[1], o, false)),
            n => {
                for pair in points.windows(2) {
                    ops.extend(self.double_line(pair[0], pair[1], o, false));
                }
                if close {
                    ops.extend(self.double_line(points[n - 1], points[0], o, false));
                }
            }
        }
        ops
    }

    fn curve(&mut self, points: &[Vec2], o: &RoughOptions) -> Vec<PathOp> {
        let mut ops = Vec::new();
        let len = points.len();
        if len > 3 {
            let s = 1.0 - o.curve_tightness;
            ops.push(PathOp::Move(points[1]));
            let mut i = 1;
            while i + 2 < len {
                let (p0, p1, p2, p3) = (points[i - 1], points[i], points[i + 1], points[i + 2]);
                let c1 = vec2(p1.x + (s * p2.x - s * p0.x) / 6.0, p1.y + (s * p2.y - s * p0.y) / 6.0);
                let c2 = vec2(p2.x + (s * p1.x - s * p3.x) / 6.0, p2.y + (s * p1.y - s * p3.y) / 6.0);
                ops.push(PathOp::BezierTo(c1, c2, p2));
                i += 1;
            }
        } else if len == 3 {
            ops.push(PathOp::Move(points[1]));
            ops.push(PathOp::BezierTo(points[1], points[2], points[2]));
        } else if len == 2 {
            ops.extend(self.double_line(points[0], points[1], o, false));
        }
        ops
    }

    fn ellipse_params(&mut self, width: f64, height: f64, o: &RoughOptions) -> EllipseParams {
        let psq = (TAU * (((width / 2.0).powi(2) + (height / 2.0).powi(2)) / 2.0).sqrt()).sqrt();
        let step_count = o
            .curve_step_count
            .max(o.curve_step_count / 200f64.sqrt() * psq)
            .ceil()
            .max(1.0);
        let increment = TAU / step_count;
        let mut rx = (width / 2.0).abs();
        let mut ry = (height / 2.0).abs();
        let curve_fit_randomness = 1.0 - o.curve_fitting;
        rx += self.offset_opt(rx * curve_fit_randomness, o, 1.0);
        ry += self.offset_opt(ry * curve_fit_randomness, o, 1.0);
        EllipseParams { increment, rx, ry }
    }

    fn ellipse_points(
        &mut self,
        p: &EllipseParams,
        center: Vec2,
        offset: f64,
        overlap: f64,
        o: &RoughOptions,
    ) -> (Vec<Vec2>, Vec<Vec2>) {
        let (rx, ry) = (p.rx, p.ry);
        let at = |angle: f64, scale: f64| vec2(center.x + scale * rx * angle.cos(), center.y + scale * ry * angle.sin());
        let mut all = Vec::new();
        let mut core = Vec::new();

        if o.roughness == 0.0 {
            let increment = p.increment / 4.0;
            all.push(at(-increment, 1.0));
            let mut angle = 0.0;
            while angle <= TAU {
                let point = at(angle, 1.0);
                core.push(point);
                all.push(point);
                angle += increment;
            }
            all.push(at(0.0, 1.0));
            all.push(at(increment, 1.0));
        } else {
            let rad_offset = self.offset_opt(0.5, o, 1.0) - PI / 2.0;
            let jittered = |sk: &mut Sketcher, angle: f64, scale: f64| {
                let base = at(angle, scale);
                vec2(base.x + sk.offset_opt(offset, o, 1.0), base.y + sk.offset_opt(offset, o, 1.0))
            };
            all.push(jittered(self, rad_offset - p.increment, 0.9));
            let end_angle = TAU + rad_offset - 0.01;
            let mut angle = rad_offset;
            while angle < end_angle {
                let point = jittered(self, angle, 1.0);
                core.push(point);
                all.push(point);
                angle += p.increment;
            }
            all.push(jittered(self, rad_offset + TAU + overlap * 0.5, 1.0));
            all.push(jittered(self, rad_offset + overlap, 0.98));
            all.push(jittered(self, rad_offset + overlap * 0.5, 0.9));
        }
        (all, core)
    }

    fn ellipse(&mut self, center: Vec2, p: &EllipseParams, o: &RoughOptions) -> (Vec<PathOp>, Vec<Vec2>) {
        let overlap_scale = self.offset(0.4, 1.0, o, 1.0);
        let overlap = p.increment * self.offset(0.1, overlap_scale, o, 1.0);
        let (ring, core) = self.ellipse_points(p, center, 1.0, overlap, o);
        let mut ops = self.curve(&ring, o);
        if !o.disable_multi_stroke && o.roughness != 0.0 {
            let (ring2, _) = self.ellipse_points(p, center, 1.5, 0.0, o);
            ops.extend(self.curve(&ring2, o));
        }
        (ops, core)
    }

    fn bezier_to(&mut self, current: Vec2, c1: Vec2, c2: Vec2, end: Vec2, o: &RoughOptions) -> Vec<PathOp> {
        let base = if o.max_randomness_offset > 0.0 { o.max_randomness_offset } else { 1.0 };
        let ros = [base, base + 0.3];
        let iterations = if o.disable_multi_stroke { 1 } else { 2 };
        let preserve = o.preserve_vertices;
        let mut ops = Vec::new();

        for ro in ros.iter().take(iterations).copied() {
            if ops.is_empty() {
                ops.push(PathOp::Move(current));
            } else if preserve {
                ops.push(PathOp::Move(current));
            } else {
                let dx = self.offset_opt(ros[0], o, 1.0);
                let dy = self.offset_opt(ros[0], o, 1.0);
                ops.push(PathOp::Move(vec2(current.x + dx, current.y + dy)));
            }
            let f = if preserve {
                end
            } else {
                vec2(end.x + self.offset_opt(ro, o, 1.0), end.y + self.offset_opt(ro, o, 1.0))
            };
            let j1 = vec2(c1.x + self.offset_opt(ro, o, 1.0), c1.y + self.offset_opt(ro, o, 1.0));
            let j2 = vec2(c2.x + self.offset_opt(ro, o, 1.0), c2.y + self.offset_opt(ro, o, 1.0));
            ops.push(PathOp::BezierTo(j1, j2, f));
        }
        ops
    }

    fn path(&mut self, segments: &[PathOp], o: &RoughOptions) -> Vec<PathOp> {
        let mut ops = Vec::new();
        let mut current = Vec2::ZERO;
        for seg in segments {
            match *seg {
                PathOp::Move(p) => {
                    current = p;
                }
                PathOp::LineTo(p) => {
                    ops.extend(self.double_line(current, p, o, false));
                    current = p;
                }
                PathOp::QuadTo(c, p) => {
                    let cubic = CubicBez::from_quad(current, c, p);
                    ops.extend(self.bezier_to(current, cubic.p1, cubic.p2, p, o));
                    current = p;
                }
                PathOp::BezierTo(c1, c2, p) => {
                    ops.extend(self.bezier_to(current, c1, c2, p, o));
                    current = p;
                }
            }
        }
        ops
    }
}

struct EllipseParams {
    increment: f64,
    rx: f64,
    ry: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RoughGenerator {
    config: RoughConfig,
}

impl RoughGenerator {
    pub fn new(config: RoughConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoughConfig {
        &self.config
    }

    pub fn default_options(&self) -> RoughOptions {
        RoughOptions {
            max_randomness_offset: self.config.max_randomness_offset,
            bowing: self.config.bowing,
            curve_fitting: self.config.curve_fitting,
            curve_tightness: self.config.curve_tightness,
            curve_step_count: self.config.curve_step_count,
            hachure_angle: self.config.hachure_angle,
            ..RoughOptions::default()
        }
    }

    fn drawable(&self, o: &RoughOptions, sets: Vec<OpSet>) -> Drawable {
        Drawable {
            options: o.clone(),
            sets,
        }
    }

    pub fn line(&self, a: Vec2, b: Vec2, o: &RoughOptions) -> Drawable {
        let mut sk = Sketcher::new(o.seed);
        let ops = sk.double_line(a, b, o, false);
        self.drawable(o, vec![OpSet::new(OpSetKind::Stroke, ops)])
    }

    pub fn linear_path(&self, points: &[Vec2], o: &RoughOptions) -> Drawable {
        let mut sk = Sketcher::new(o.seed);
        let ops = sk.linear_path(points, false, o);
        self.drawable(o, vec![OpSet::new(OpSetKind::Stroke, ops)])
    }

    pub fn polygon(&self, points: &[Vec2], o: &RoughOptions) -> Drawable {
        let mut sk = Sketcher::new(o.seed);
        let outline = sk.linear_path(points, true, o);
        let mut sets = Vec::new();
        if o.fill.is_some() {
            sets.push(fill::fill_polygons(&mut sk, &[points.to_vec()], o));
        }
        if o.stroke.is_some() {
            sets.push(OpSet::new(OpSetKind::Stroke, outline));
        }
        self.drawable(o, sets)
    }

    pub fn rectangle(&self, x: f64, y: f64, width: f64, height: f64, o: &RoughOptions) -> Drawable {
        let points = [
            vec2(x, y),
            vec2(x + width, y),
            vec2(x + width, y + height),
            vec2(x, y + height),
        ];
        self.polygon(&points, o)
    }

    pub fn ellipse(&self, center: Vec2, width: f64, height: f64, o: &RoughOptions) -> Drawable {
        let mut sk = Sketcher::new(o.seed);
        let params = sk.ellipse_params(width, height, o);
        let (outline, core) = sk.ellipse(center, &params, o);
        let mut sets = Vec::new();
        if o.fill.is_some() {
            if o.fill_style == crate::drawing::FillStyle::Solid {
                let (shape, _) = sk.ellipse(center, &params, o);
                sets.push(OpSet::new(OpSetKind::FillPath, shape));
            } else {
                sets.push(fill::fill_polygons(&mut sk, &[core], o));
            }
        }
        if o.stroke.is_some() {
            sets.push(OpSet::new(OpSetKind::Stroke, outline));
        }
        self.drawable(o, sets)
    }

    pub fn circle(&self, center: Vec2, diameter: f64, o: &RoughOptions) -> Drawable {
        self.ellipse(center, diameter, diameter, o)
    }

    pub fn path(&self, segments: &[PathOp], tolerance: f64, o: &RoughOptions) -> Drawable {
        let mut sk = Sketcher::new(o.seed);
        let outline = sk.path(segments, o);
        let mut sets = Vec::new();
        if o.fill.is_some() {
            let polygons = flatten_ops(segments, tolerance);
            if o.fill_style == crate::drawing::FillStyle::Solid {
                let ops = polygons
                    .iter()
                    .filter(|poly| !poly.is_empty())
                    .flat_map(|poly| {
                        std::iter::once(PathOp::Move(poly[0]))
                            .chain(poly[1..].iter().map(|p| PathOp::LineTo(*p)))
                    })
                    .collect();
                sets.push(OpSet::new(OpSetKind::FillPath, ops));
            } else {
                sets.push(fill::fill_polygons(&mut sk, &polygons, o));
            }
        }
        if o.stroke.is_some() {
            sets.push(OpSet::new(OpSetKind::Stroke, outline));
        }
        self.drawable(o, sets)
    }

    pub fn solid_polygon(&self, points: &[Vec2], o: &RoughOptions) -> Drawable {
        let mut sk = Sketcher::new(o.seed);
        let set = fill::solid_fill_polygons(&mut sk, &[points.to_vec()], o);
        self.drawable(o, vec![set])
    }
}
