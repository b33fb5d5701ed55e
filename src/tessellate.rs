use crate::math::{Mat3, Vec2};
use lyon::math::point;
use lyon::path::{FillRule, Path};
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use crate::renderer::{DrawingContent, ShapeDrawing};
use crate::rough::{Drawable, OpSetKind};
use crate::vertex::Vertex;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn append(&mut self, other: Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + offset));
    }

    fn push_polyline(&mut self, points: &[Vec2], width: f64, color: [f32; 4]) {
        let half = width.max(0.0) * 0.5;
        for pair in points.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            let Some(dir) = (p2 - p1).try_normalize() else {
                continue;
            };
            let n = -dir.perp() * half;
            let index_offset = self.vertices.len() as u32;
            self.vertices.extend([
                Vertex::new(p1 - n, color),
                Vertex::new(p1 + n, color),
                Vertex::new(p2 + n, color),
                Vertex::new(p2 - n, color),
            ]);
            self.indices.extend_from_slice(&[
                index_offset,
                index_offset + 1,
                index_offset + 2,
                index_offset,
                index_offset + 2,
                index_offset + 3,
            ]);
        }
    }

    fn push_fill(&mut self, contours: &[Vec<Vec2>], color: [f32; 4], tolerance: f64) {
        let mut builder = Path::builder();
        let mut any = false;
        for contour in contours.iter().filter(|c| c.len() >= 3) {
            builder.begin(point(contour[0].x as f32, contour[0].y as f32));
            for p in &contour[1..] {
                builder.line_to(point(p.x as f32, p.y as f32));
            }
            builder.end(true);
            any = true;
        }
        if !any {
            return;
        }
        let path = builder.build();

        let mut buffers: VertexBuffers<Vertex, u32> = VertexBuffers::new();
        let options = FillOptions::tolerance(tolerance.max(0.01) as f32).with_fill_rule(FillRule::NonZero);
        let result = FillTessellator::new().tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| Vertex {
                position: v.position().to_array(),
                color,
            }),
        );
        if let Err(err) = result {
            log::debug!("fill tessellation failed: {err:?}");
            return;
        }
        self.append(Mesh {
            vertices: buffers.vertices,
            indices: buffers.indices,
        });
    }
}

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` into RGBA in `[0, 1]`, scaling
/// alpha by `opacity`. `"transparent"` and unparsable colors yield `None`.
pub fn parse_color(color: &str, opacity: f64) -> Option<[f32; 4]> {
    let hex = color.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    let [r, g, b, a] = match hex.len() {
        3 => {
            let mut out = [1.0f32; 4];
            for (i, c) in hex.chars().enumerate() {
                out[i] = channel(&c.to_string().repeat(2))?;
            }
            out
        }
        6 | 8 => {
            let mut out = [1.0f32; 4];
            for i in 0..hex.len() / 2 {
                out[i] = channel(hex.get(i * 2..i * 2 + 2)?)?;
            }
            out
        }
        _ => return None,
    };
    Some([r, g, b, a * opacity.clamp(0.0, 1.0) as f32])
}

pub fn dash_polyline(points: &[Vec2], pattern: &[f64]) -> Vec<Vec<Vec2>> {
    if pattern.is_empty() || pattern.iter().all(|d| *d <= 0.0) || points.len() < 2 {
        return vec![points.to_vec()];
    }
    let mut runs = Vec::new();
    let mut current = vec![points[0]];
    let (mut slot, mut left) = (0usize, pattern[0].max(0.0));
    let mut drawing = true;

    for pair in points.windows(2) {
        let (mut a, b) = (pair[0], pair[1]);
        let mut remaining = a.distance(b);
        while remaining > left {
            let cut = a.lerp(b, left / remaining);
            if drawing {
                current.push(cut);
                runs.push(std::mem::take(&mut current));
            } else {
                current = vec![cut];
            }
            remaining -= left;
            a = cut;
            drawing = !drawing;
            slot = (slot + 1) % pattern.len();
            left = pattern[slot].max(0.0);
        }
        left -= remaining;
        if drawing {
            current.push(b);
        }
    }
    if drawing && current.len() > 1 {
        runs.push(current);
    }
    runs
}

fn tessellate_drawable(mesh: &mut Mesh, drawable: &Drawable, opacity: f64, place: &Mat3, tolerance: f64) {
    let o = &drawable.options;
    for set in &drawable.sets {
        let (color, width) = match set.kind {
            OpSetKind::Stroke => (o.stroke.as_deref(), o.stroke_width),
            OpSetKind::FillSketch => (o.fill.as_deref(), o.fill_weight),
            OpSetKind::FillPath => (o.fill.as_deref(), 0.0),
        };
        let Some(color) = color.and_then(|c| parse_color(c, opacity)) else {
            continue;
        };
        let lines: Vec<Vec<Vec2>> = set
            .polylines(tolerance)
            .into_iter()
            .map(|line| line.into_iter().map(|p| place.transform_point(p)).collect())
            .collect();
        match set.kind {
            OpSetKind::FillPath => mesh.push_fill(&lines, color, tolerance),
            OpSetKind::Stroke => {
                for line in &lines {
                    match &o.stroke_line_dash {
                        Some(dash) => {
                            for run in dash_polyline(line, dash) {
                                mesh.push_polyline(&run, width, color);
                            }
                        }
                        None => mesh.push_polyline(line, width, color),
                    }
                }
            }
            OpSetKind::FillSketch => {
                for line in &lines {
                    mesh.push_polyline(line, width, color);
                }
            }
        }
    }
}

pub fn tessellate(drawing: &ShapeDrawing, tolerance: f64) -> Mesh {
    let DrawingContent::Sketch(drawables) = &drawing.content else {
        log::trace!("no mesh for non-sketch drawing {}", drawing.id);
        return Mesh::default();
    };
    let place = Mat3::from_rotation_about(drawing.origin + drawing.center, drawing.angle)
        * Mat3::from_translation(drawing.origin);
    let mut mesh = Mesh::default();
    for drawable in drawables {
        tessellate_drawable(&mut mesh, drawable, drawing.opacity, &place, tolerance);
    }
    mesh
}

pub fn tessellate_all<'a>(drawings: impl IntoIterator<Item = &'a ShapeDrawing>, tolerance: f64) -> Mesh {
    let mut mesh = Mesh::default();
    for drawing in drawings {
        mesh.append(tessellate(drawing, tolerance));
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{FreehandShape, Frame, PenPoint, PenStyle, Shape, ShapeKind, ShapeStyle, StylePatch};
    use crate::math::{PI, vec2};
    use crate::renderer::Renderer;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#fff", 1.0), Some([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(parse_color("#ff000080", 1.0).map(|c| c[0]), Some(1.0));
        assert_eq!(parse_color("#000000", 0.5), Some([0.0, 0.0, 0.0, 0.5]));
        assert_eq!(parse_color("transparent", 1.0), None);
        assert_eq!(parse_color("#12", 1.0), None);
        assert_eq!(parse_color("#zzzzzz", 1.0), None);
    }

    #[test]
    fn test_dash_runs() {
        let line = [vec2(0.0, 0.0), vec2(30.0, 0.0)];
        let runs = dash_polyline(&line, &[8.0, 4.0]);
        let spans: Vec<(f64, f64)> = runs.iter().map(|r| (r[0].x, r[r.len() - 1].x)).collect();
        assert_eq!(spans.len(), 3);
        for ((a, b), (ea, eb)) in spans.into_iter().zip([(0.0, 8.0), (12.0, 20.0), (24.0, 30.0)]) {
            assert!((a - ea).abs() < 1e-9 && (b - eb).abs() < 1e-9);
        }
    }

    #[test]
    fn test_quad_per_segment() {
        let mut mesh = Mesh::default();
        mesh.push_polyline(&[vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 0.0)], 2.0, [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[0].position, [0.0, -1.0]);
    }

    fn covering_triangles(mesh: &Mesh, p: [f32; 2]) -> usize {
        let sign = |a: [f32; 2], b: [f32; 2], c: [f32; 2]| (a[0] - c[0]) * (b[1] - c[1]) - (b[0] - c[0]) * (a[1] - c[1]);
        mesh.indices
            .chunks_exact(3)
            .filter(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|i| mesh.vertices[i as usize].position);
                let (d1, d2, d3) = (sign(p, a, b), sign(p, b, c), sign(p, c, a));
                let neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
                let pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
                !(neg && pos)
            })
            .count()
    }

    fn mesh_area(mesh: &Mesh) -> f32 {
        mesh.indices
            .chunks_exact(3)
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|i| mesh.vertices[i as usize].position);
                ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_concave_fill_stays_inside() {
        let u = vec![
            vec2(0.0, 0.0),
            vec2(200.0, 0.0),
            vec2(200.0, 200.0),
            vec2(140.0, 200.0),
            vec2(140.0, 60.0),
            vec2(60.0, 60.0),
            vec2(60.0, 200.0),
            vec2(0.0, 200.0),
        ];
        let mut mesh = Mesh::default();
        mesh.push_fill(&[u], [0.0, 0.0, 0.0, 1.0], 0.5);
        assert!(!mesh.is_empty());
        assert_eq!(covering_triangles(&mesh, [100.0, 150.0]), 0);
        assert!(covering_triangles(&mesh, [30.0, 150.0]) > 0);
        assert!((mesh_area(&mesh) - 28_800.0).abs() < 1.0);
    }

    #[test]
    fn test_freehand_u_leaves_gap_empty() {
        let mut points = Vec::new();
        for i in 0..=20 {
            points.push(PenPoint::new(0.0, i as f64 * 5.0));
        }
        for i in 1..=40 {
            points.push(PenPoint::new(i as f64 * 5.0, 100.0));
        }
        for i in 1..=20 {
            points.push(PenPoint::new(200.0, 100.0 - i as f64 * 5.0));
        }
        let stroke = FreehandShape::from_absolute(&points, 2.0, PenStyle::Uniform);
        let shape = Shape::with_seed(ShapeKind::Freehand(stroke), &ShapeStyle::default(), 3);
        let mesh = tessellate(&Renderer::default().generate(&shape), 0.5);
        assert!(!mesh.is_empty());
        assert_eq!(covering_triangles(&mesh, [100.0, 50.0]), 0);
        assert!(covering_triangles(&mesh, [100.0, 100.0]) > 0);
    }

    #[test]
    fn test_filled_rectangle_mesh() {
        let renderer = Renderer::default();
        let shape = Shape::with_seed(
            ShapeKind::rectangle(Frame::new(100.0, 100.0, 80.0, 40.0)),
            &ShapeStyle::default(),
            42,
        )
        .with_style_patch(&StylePatch {
            background_color: Some("#a5d8ff".to_string()),
            ..Default::default()
        });
        let mesh = tessellate(&renderer.generate(&shape), 0.5);
        assert!(!mesh.is_empty());
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        // sketch jitter stays close to the frame
        for v in &mesh.vertices {
            assert!(v.position[0] > 80.0 && v.position[0] < 200.0);
            assert!(v.position[1] > 80.0 && v.position[1] < 160.0);
        }
    }

    #[test]
    fn test_rotation_is_applied() {
        let renderer = Renderer::default();
        let line = Shape::with_seed(
            ShapeKind::line(vec2(0.0, 0.0), vec2(100.0, 0.0)),
            &ShapeStyle::default(),
            5,
        )
        .rotated_to(PI / 2.0);
        let mesh = tessellate(&renderer.generate(&line), 0.5);
        for v in &mesh.vertices {
            assert!((v.position[0] - 50.0).abs() < 10.0);
        }
    }

    #[test]
    fn test_text_has_no_mesh() {
        let renderer = Renderer::default();
        let text = Shape::with_seed(
            ShapeKind::text(Frame::new(0.0, 0.0, 50.0, 20.0), "hi", 16.0),
            &ShapeStyle::default(),
            5,
        );
        assert!(tessellate(&renderer.generate(&text), 0.5).is_empty());
    }
}
