//! Freehand ink: turns pointer samples into a closed outline polygon and a
//! quadratic path that fills it.
//!
//! The outline follows the pressure-aware stroke algorithm popularised by
//! perfect-freehand: samples are streamlined, a radius is derived from real
//! or simulated pressure, and left/right offset rails are joined with round
//! caps.

mod session;

pub use session::FreehandSession;

use crate::config::FreehandConfig;
use crate::drawing::{FreehandShape, PenPoint, PenStyle};
use crate::math::{PI, Vec2, vec2};
use crate::rough::{PathOp, ops_to_svg_path};

/// How quickly simulated pressure follows pointer speed.
pub const RATE_OF_PRESSURE_CHANGE: f64 = 0.275;
const FIXED_PI: f64 = PI + 0.0001;
const START_CAP_STEPS: f64 = 13.0;
const END_CAP_STEPS: f64 = 29.0;
const DEFAULT_FIRST_PRESSURE: f64 = 0.25;
const DEFAULT_PRESSURE: f64 = 0.5;

pub fn sine_easing(t: f64) -> f64 {
    (t * PI / 2.0).sin()
}

#[derive(Debug, Clone, Copy)]
pub struct StrokeOptions {
    pub size: f64,
    pub thinning: f64,
    pub smoothing: f64,
    pub streamline: f64,
    pub simulate_pressure: bool,
    pub easing: fn(f64) -> f64,
    pub complete: bool,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            size: 16.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
            simulate_pressure: true,
            easing: |t| t,
            complete: false,
        }
    }
}

impl StrokeOptions {
    pub fn for_pen(
        config: &FreehandConfig,
        pen_width: f64,
        pen_style: PenStyle,
        has_pressure: bool,
        complete: bool,
    ) -> Self {
        Self {
            size: pen_width * config.size_multiplier,
            thinning: match pen_style {
                PenStyle::PressureSensitive => config.thinning,
                PenStyle::Uniform => 0.0,
            },
            smoothing: config.smoothing,
            streamline: config.streamline,
            simulate_pressure: !has_pressure,
            easing: sine_easing,
            complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub point: Vec2,
    pub pressure: f64,
    pub vector: Vec2,
    pub distance: f64,
    pub running_length: f64,
}

pub fn stroke_points(input: &[PenPoint], o: &StrokeOptions) -> Vec<StrokePoint> {
    let Some(first) = input.first() else {
        return Vec::new();
    };
    let t = 0.15 + (1.0 - o.streamline) * 0.85;

    let mut pts: Vec<(Vec2, Option<f64>)> = input.iter().map(|p| (p.position(), p.pressure)).collect();
    if pts.len() == 2 {
        let last = pts[1].0;
        pts.truncate(1);
        for i in 1..5 {
            pts.push((pts[0].0.lerp(last, i as f64 / 4.0), None));
        }
    }
    if pts.len() == 1 {
        pts.push((pts[0].0 + vec2(1.0, 1.0), pts[0].1));
    }

    let mut result = vec![StrokePoint {
        point: first.position(),
        pressure: first.pressure.filter(|p| *p >= 0.0).unwrap_or(DEFAULT_FIRST_PRESSURE),
        vector: vec2(1.0, 1.0),
        distance: 0.0,
        running_length: 0.0,
    }];

    let mut reached_minimum_length = false;
    let mut running_length = 0.0;
    let mut prev = result[0].point;
    let max = pts.len() - 1;

    for (i, (sample, pressure)) in pts.iter().enumerate().skip(1) {
        let point = if o.complete && i == max { *sample } else { prev.lerp(*sample, t) };
        if point == prev {
            continue;
        }
        let distance = point.distance(prev);
        running_length += distance;
        if i < max && !reached_minimum_length {
            if running_length < o.size {
                continue;
            }
            reached_minimum_length = true;
        }
        result.push(StrokePoint {
            point,
            pressure: pressure.filter(|p| *p >= 0.0).unwrap_or(DEFAULT_PRESSURE),
            vector: (prev - point).normalize_or_zero(),
            distance,
            running_length,
        });
        prev = point;
    }

    result[0].vector = result.get(1).map(|p| p.vector).unwrap_or(Vec2::ZERO);
    result
}

fn stroke_radius(size: f64, thinning: f64, pressure: f64, easing: fn(f64) -> f64) -> f64 {
    size * easing(0.5 - thinning * (0.5 - pressure))
}

fn simulated_pressure(previous: f64, distance: f64, size: f64) -> f64 {
    let sp = (distance / size).min(1.0);
    let rp = (1.0 - sp).min(1.0);
    (previous + (rp - previous) * (sp * RATE_OF_PRESSURE_CHANGE)).min(1.0)
}

/// Boundary polygon of the stroke: left rail, end cap, reversed right rail,
/// start cap.
pub fn stroke_outline(points: &[StrokePoint], o: &StrokeOptions) -> Vec<Vec2> {
    if points.is_empty() || o.size.is_nan() || o.size <= 0.0 {
        return Vec::new();
    }
    let size = o.size;
    let last_index = points.len() - 1;
    let total_length = points[last_index].running_length;
    let min_distance = (size * o.smoothing).powi(2);

    let mut left: Vec<Vec2> = Vec::new();
    let mut right: Vec<Vec2> = Vec::new();

    let mut prev_pressure = points.iter().take(10).fold(points[0].pressure, |acc, p| {
        let pressure = if o.simulate_pressure {
            simulated_pressure(acc, p.distance, size)
        } else {
            p.pressure
        };
        (acc + pressure) / 2.0
    });

    let mut radius = stroke_radius(size, o.thinning, points[last_index].pressure, o.easing);
    let mut first_radius: Option<f64> = None;
    let mut prev_vector = points[0].vector;
    let mut pl = points[0].point;
    let mut pr = pl;
    let mut tl = pl;
    let mut tr = pr;
    let mut prev_was_sharp = false;

    for (i, sp) in points.iter().enumerate() {
        let point = sp.point;
        let vector = sp.vector;
        let mut pressure = sp.pressure;

        if i < last_index && total_length - sp.running_length < 3.0 {
            continue;
        }

        if o.thinning != 0.0 {
            if o.simulate_pressure {
                pressure = simulated_pressure(prev_pressure, sp.distance, size);
            }
            radius = stroke_radius(size, o.thinning, pressure, o.easing);
        } else {
            radius = size / 2.0;
        }
        if first_radius.is_none() {
            first_radius = Some(radius);
        }
        radius = radius.max(0.01);

        let next_vector = if i < last_index { points[i + 1].vector } else { vector };
        let next_dpr = if i < last_index { vector.dot(next_vector) } else { 1.0 };
        let prev_dpr = vector.dot(prev_vector);

        let is_sharp = prev_dpr < 0.0 && !prev_was_sharp;
        let next_is_sharp = next_dpr < 0.0;

        if is_sharp || next_is_sharp {
            let offset = prev_vector.perp() * radius;
            let step = 1.0 / 13.0;
            let mut t = 0.0;
            while t <= 1.0 {
                tl = (point - offset).rotate_around(point, FIXED_PI * t);
                left.push(tl);
                tr = (point + offset).rotate_around(point, FIXED_PI * -t);
                right.push(tr);
                t += step;
            }
            pl = tl;
            pr = tr;
            if next_is_sharp {
                prev_was_sharp = true;
            }
            continue;
        }
        prev_was_sharp = false;

        if i == last_index {
            let offset = vector.perp() * radius;
            left.push(point - offset);
            right.push(point + offset);
            continue;
        }

        let offset = next_vector.lerp(vector, next_dpr).perp() * radius;
        tl = point - offset;
        if i <= 1 || pl.distance_squared(tl) > min_distance {
            left.push(tl);
            pl = tl;
        }
        tr = point + offset;
        if i <= 1 || pr.distance_squared(tr) > min_distance {
            right.push(tr);
            pr = tr;
        }
        prev_pressure = pressure;
        prev_vector = vector;
    }

    let first_point = points[0].point;
    let last_point = if points.len() > 1 {
        points[last_index].point
    } else {
        first_point + vec2(1.0, 1.0)
    };

    if points.len() == 1 {
        let r = first_radius.unwrap_or(radius);
        let start = first_point + (first_point - last_point).perp().normalize_or_zero() * -r;
        return cap_points(start, first_point, 2.0, START_CAP_STEPS, true);
    }

    let start_cap = match right.first() {
        Some(anchor) => cap_points(*anchor, first_point, 1.0, START_CAP_STEPS, true),
        None => Vec::new(),
    };
    let direction = (-points[last_index].vector).perp();
    let end_start = last_point + direction * radius;
    let end_cap = cap_points(end_start, last_point, 3.0, END_CAP_STEPS, false);

    right.reverse();
    left.extend(end_cap);
    left.extend(right);
    left.extend(start_cap);
    left
}

fn cap_points(start: Vec2, center: Vec2, turns: f64, steps: f64, inclusive: bool) -> Vec<Vec2> {
    let step = 1.0 / steps;
    let mut points = Vec::new();
    let mut t = step;
    while if inclusive { t <= 1.0 } else { t < 1.0 } {
        points.push(start.rotate_around(center, FIXED_PI * turns * t));
        t += step;
    }
    points
}

/// Full outline for raw samples. Never empty for non-empty input: a
/// degenerate result is replaced by a small circle around the first sample.
pub fn stroke(input: &[PenPoint], o: &StrokeOptions) -> Vec<Vec2> {
    let outline = stroke_outline(&stroke_points(input, o), o);
    if !outline.is_empty() || input.is_empty() {
        return outline;
    }
    let center = input[0].position();
    let radius = (o.size / 2.0).max(0.5);
    log::debug!("freehand outline empty, using a dot at {center:?}");
    let start = center + vec2(radius, 0.0);
    let mut dot = vec![start];
    dot.extend(cap_points(start, center, 2.0, START_CAP_STEPS, false));
    dot
}

pub fn outline_path(outline: &[Vec2]) -> Vec<PathOp> {
    let Some(&first) = outline.first() else {
        return Vec::new();
    };
    let mut ops = Vec::with_capacity(outline.len() + 2);
    ops.push(PathOp::Move(first));
    for (i, p) in outline.iter().enumerate() {
        let next = outline.get(i + 1).copied().unwrap_or(first);
        ops.push(PathOp::QuadTo(*p, p.midpoint(next)));
    }
    ops.push(PathOp::LineTo(first));
    ops
}

pub fn outline_svg_path(outline: &[Vec2]) -> String {
    let ops = outline_path(outline);
    if ops.is_empty() {
        return String::new();
    }
    format!("{} Z", ops_to_svg_path(&ops))
}

pub fn shape_outline(shape: &FreehandShape, config: &FreehandConfig) -> Vec<Vec2> {
    let o = StrokeOptions::for_pen(config, shape.pen_width, shape.pen_style, shape.has_pressure(), true);
    stroke(&shape.points, &o)
}
