use super::Sketcher;
use super::ops::{OpSet, OpSetKind, PathOp, RoughOptions};
use crate::drawing::FillStyle;
use crate::math::{Vec2, vec2};

const MAX_SCAN_LINES: usize = 10_000;

pub(crate) fn fill_polygons(sk: &mut Sketcher, polygons: &[Vec<Vec2>], o: &RoughOptions) -> OpSet {
    match o.fill_style {
        FillStyle::Solid => solid_fill_polygons(sk, polygons, o),
        FillStyle::Hachure => hachure(sk, polygons, o),
        FillStyle::CrossHatch => {
            let mut set = hachure(sk, polygons, o);
            let crossed = RoughOptions {
                hachure_angle: o.hachure_angle + 90.0,
                ..o.clone()
            };
            set.ops.extend(hachure(sk, polygons, &crossed).ops);
            set
        }
        FillStyle::Zigzag => zigzag(sk, polygons, o),
    }
}

pub(crate) fn solid_fill_polygons(sk: &mut Sketcher, polygons: &[Vec<Vec2>], o: &RoughOptions) -> OpSet {
    let mut ops = Vec::new();
    let offset = o.max_randomness_offset;
    for points in polygons.iter().filter(|p| p.len() > 2) {
        let mut jitter = |p: Vec2| vec2(p.x + sk.offset_opt(offset, o, 1.0), p.y + sk.offset_opt(offset, o, 1.0));
        ops.push(PathOp::Move(jitter(points[0])));
        for p in &points[1..] {
            ops.push(PathOp::LineTo(jitter(*p)));
        }
    }
    OpSet::new(OpSetKind::FillPath, ops)
}

fn effective_gap(o: &RoughOptions) -> f64 {
    let gap = if o.hachure_gap < 0.0 { o.stroke_width * 4.0 } else { o.hachure_gap };
    gap.max(0.1)
}

fn hachure(sk: &mut Sketcher, polygons: &[Vec<Vec2>], o: &RoughOptions) -> OpSet {
    let lines = hachure_lines(polygons, effective_gap(o), o.hachure_angle + 90.0);
    render_lines(sk, &lines, o)
}

fn zigzag(sk: &mut Sketcher, polygons: &[Vec<Vec2>], o: &RoughOptions) -> OpSet {
    let gap = effective_gap(o);
    let lines = hachure_lines(polygons, gap, o.hachure_angle + 90.0);
    let angle = o.hachure_angle.to_radians();
    let dg = vec2(gap * 0.5 * angle.cos(), gap * 0.5 * angle.sin());

    let mut zigzag_lines = Vec::with_capacity(lines.len() * 2);
    for (p1, p2) in lines {
        if p1.distance_squared(p2) > 0.0 {
            zigzag_lines.push((vec2(p1.x - dg.x, p1.y + dg.y), p2));
            zigzag_lines.push((vec2(p1.x + dg.x, p1.y - dg.y), p2));
        }
    }
    render_lines(sk, &zigzag_lines, o)
}

fn render_lines(sk: &mut Sketcher, lines: &[(Vec2, Vec2)], o: &RoughOptions) -> OpSet {
    let mut ops = Vec::new();
    for (a, b) in lines {
        ops.extend(sk.double_line(*a, *b, o, true));
    }
    OpSet::new(OpSetKind::FillSketch, ops)
}

fn rotate_points(points: &mut [Vec2], degrees: f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    for p in points {
        *p = vec2(p.x * cos - p.y * sin, p.x * sin + p.y * cos);
    }
}

struct Edge {
    ymin: f64,
    ymax: f64,
    x: f64,
    islope: f64,
}

pub(crate) fn hachure_lines(polygons: &[Vec<Vec2>], gap: f64, angle: f64) -> Vec<(Vec2, Vec2)> {
    let mut rotated: Vec<Vec<Vec2>> = polygons.to_vec();
    if angle != 0.0 {
        for poly in &mut rotated {
            rotate_points(poly, angle);
        }
    }
    let mut lines = straight_hachure_lines(&rotated, gap.max(0.1));
    if angle != 0.0 {
        let (sin, cos) = (-angle).to_radians().sin_cos();
        let rot = |p: Vec2| vec2(p.x * cos - p.y * sin, p.x * sin + p.y * cos);
        for (a, b) in &mut lines {
            *a = rot(*a);
            *b = rot(*b);
        }
    }
    lines
}

fn straight_hachure_lines(polygons: &[Vec<Vec2>], gap: f64) -> Vec<(Vec2, Vec2)> {
    let mut edges: Vec<Edge> = Vec::new();
    for polygon in polygons {
        let mut vertices = polygon.clone();
        if let (Some(first), Some(last)) = (vertices.first().copied(), vertices.last().copied()) {
            if first != last {
                vertices.push(first);
            }
        }
        if vertices.len() <= 2 {
            continue;
        }
        for pair in vertices.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            if p1.y != p2.y {
                let ymin = p1.y.min(p2.y);
                edges.push(Edge {
                    ymin,
                    ymax: p1.y.max(p2.y),
                    x: if ymin == p1.y { p1.x } else { p2.x },
                    islope: (p2.x - p1.x) / (p2.y - p1.y),
                });
            }
        }
    }

    let mut lines = Vec::new();
    if edges.is_empty() {
        return lines;
    }
    edges.sort_by(|a, b| {
        a.ymin
            .total_cmp(&b.ymin)
            .then(a.x.total_cmp(&b.x))
            .then(a.ymax.total_cmp(&b.ymax))
    });

    let span = edges.iter().map(|e| e.ymax).fold(f64::NEG_INFINITY, f64::max) - edges[0].ymin;
    let gap = gap.max(span / MAX_SCAN_LINES as f64);

    let mut pending = edges.into_iter().peekable();
    let mut active: Vec<Edge> = Vec::new();
    let mut y = pending.peek().map(|e| e.ymin).unwrap_or_default();
    let mut scans = 0usize;

    while (!active.is_empty() || pending.peek().is_some()) && scans <= MAX_SCAN_LINES {
        scans += 1;
        while let Some(edge) = pending.next_if(|e| e.ymin <= y) {
            active.push(edge);
        }
        active.retain(|e| e.ymax > y);
        active.sort_by(|a, b| a.x.total_cmp(&b.x));

        for pair in active.chunks_exact(2) {
            lines.push((vec2(pair[0].x.round(), y), vec2(pair[1].x.round(), y)));
        }

        if y + gap == y {
            break;
        }
        y += gap;
        for edge in &mut active {
            edge.x += gap * edge.islope;
        }
    }
    lines
}
