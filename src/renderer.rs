use crate::arrowhead::{CapPosition, arrowhead_points, cap_drawables, dashed_dash, dotted_dash};
use crate::bounds::shape_bounds;
use crate::canvas::Viewport;
use crate::config::RenderConfig;
use crate::corners::{Outline, diamond_outline, rectangle_outline};
use crate::drawing::{FillStyle, Shape, ShapeKind, StrokeStyle, TextAlign};
use crate::freehand::{outline_path, shape_outline};
use crate::math::{Vec2, vec2};
use crate::registry;
use crate::rough::{Drawable, OpSet, OpSetKind, RoughGenerator, RoughOptions};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

const CARTOONIST_ROUGHNESS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawingContent {
    Sketch(Vec<Drawable>),
    Image { file_id: String, size: Vec2 },
    Text {
        text: String,
        font_size: f64,
        font_family: String,
        text_align: TextAlign,
        color: String,
        size: Vec2,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDrawing {
    pub id: Uuid,
    pub version: u32,
    pub origin: Vec2,
    pub angle: f64,
    /// Rotation center relative to `origin`.
    pub center: Vec2,
    pub opacity: f64,
    pub content: DrawingContent,
}

impl ShapeDrawing {
    pub fn drawables(&self) -> &[Drawable] {
        match &self.content {
            DrawingContent::Sketch(d) => d,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub viewport: Option<Viewport>,
}

impl RenderOptions {
    pub fn on_screen(viewport: Viewport) -> Self {
        Self {
            viewport: Some(viewport),
        }
    }

    pub fn export() -> Self {
        Self { viewport: None }
    }
}

pub fn adjust_roughness(shape: &Shape) -> f64 {
    let roughness = shape.attrs.roughness;
    let (w, h) = (shape.width().abs(), shape.height().abs());
    let max_size = w.max(h);
    let min_size = w.min(h);

    if (min_size >= 20.0 && max_size >= 50.0) || min_size >= 15.0 || (shape.is_linear() && max_size >= 50.0) {
        return roughness;
    }
    (roughness / if max_size < 10.0 { 3.0 } else { 2.0 }).min(2.5)
}

pub fn sketch_options(generator: &RoughGenerator, shape: &Shape) -> RoughOptions {
    let a = &shape.attrs;
    let solid = a.stroke_style == StrokeStyle::Solid;
    let mut o = RoughOptions {
        seed: a.seed,
        stroke_line_dash: match a.stroke_style {
            StrokeStyle::Solid => None,
            StrokeStyle::Dashed => Some(dashed_dash(a.stroke_width)),
            StrokeStyle::Dotted => Some(dotted_dash(a.stroke_width)),
        },
        disable_multi_stroke: !solid,
        stroke_width: if solid { a.stroke_width } else { a.stroke_width + 0.5 },
        fill_weight: a.stroke_width / 2.0,
        hachure_gap: a.stroke_width * generator.config().hachure_gap_factor,
        roughness: adjust_roughness(shape),
        stroke: Some(a.stroke_color.clone()),
        preserve_vertices: a.roughness < CARTOONIST_ROUGHNESS,
        ..generator.default_options()
    };
    match shape.kind {
        ShapeKind::Rectangle(_) | ShapeKind::Diamond(_) | ShapeKind::Ellipse(_) => {
            o.fill_style = a.fill_style;
            o.fill = shape.is_filled().then(|| a.background_color.clone());
            if matches!(shape.kind, ShapeKind::Ellipse(_)) {
                o.curve_fitting = 1.0;
            }
        }
        _ => {}
    }
    o
}

fn outline_drawable(generator: &RoughGenerator, outline: Outline, tolerance: f64, o: &RoughOptions) -> Drawable {
    match outline {
        Outline::Polygon(points) => generator.polygon(&points, o),
        Outline::Path(ops) => generator.path(&ops, tolerance, o),
    }
}

pub(crate) fn render_rectangle(generator: &RoughGenerator, config: &RenderConfig, shape: &Shape) -> DrawingContent {
    let ShapeKind::Rectangle(b) = &shape.kind else {
        return DrawingContent::Sketch(Vec::new());
    };
    let o = sketch_options(generator, shape);
    let outline = rectangle_outline(b.frame.width, b.frame.height, b.rx, b.ry);
    DrawingContent::Sketch(vec![outline_drawable(generator, outline, config.flatten_tolerance, &o)])
}

pub(crate) fn render_diamond(generator: &RoughGenerator, config: &RenderConfig, shape: &Shape) -> DrawingContent {
    let ShapeKind::Diamond(b) = &shape.kind else {
        return DrawingContent::Sketch(Vec::new());
    };
    let o = sketch_options(generator, shape);
    let outline = diamond_outline(b.frame.width, b.frame.height, b.rx, b.ry);
    DrawingContent::Sketch(vec![outline_drawable(generator, outline, config.flatten_tolerance, &o)])
}

pub(crate) fn render_ellipse(generator: &RoughGenerator, _config: &RenderConfig, shape: &Shape) -> DrawingContent {
    let ShapeKind::Ellipse(frame) = &shape.kind else {
        return DrawingContent::Sketch(Vec::new());
    };
    let o = sketch_options(generator, shape);
    let center = vec2(frame.width / 2.0, frame.height / 2.0);
    DrawingContent::Sketch(vec![generator.ellipse(center, frame.width, frame.height, &o)])
}

pub(crate) fn render_linear(generator: &RoughGenerator, _config: &RenderConfig, shape: &Shape) -> DrawingContent {
    let (ShapeKind::Line(l) | ShapeKind::Arrow(l)) = &shape.kind else {
        return DrawingContent::Sketch(Vec::new());
    };
    let o = sketch_options(generator, shape);
    let points = [Vec2::ZERO, l.end() - l.start()];
    let body = generator.line(points[0], points[1], &o);

    let mut drawables = Vec::new();
    for (position, kind) in [(CapPosition::Start, l.start_arrowhead), (CapPosition::End, l.end_arrowhead)] {
        if let Some(cap) = arrowhead_points(&body, &points, position, kind, shape.attrs.stroke_width) {
            drawables.extend(cap_drawables(
                generator,
                &cap,
                &o,
                shape.attrs.stroke_style,
                shape.attrs.stroke_width,
            ));
        }
    }
    drawables.insert(0, body);
    DrawingContent::Sketch(drawables)
}

pub(crate) fn render_freehand(generator: &RoughGenerator, config: &RenderConfig, shape: &Shape) -> DrawingContent {
    let ShapeKind::Freehand(f) = &shape.kind else {
        return DrawingContent::Sketch(Vec::new());
    };
    let outline = shape_outline(f, &config.freehand);
    let options = RoughOptions {
        seed: shape.attrs.seed,
        stroke: None,
        fill: Some(shape.attrs.stroke_color.clone()),
        fill_style: FillStyle::Solid,
        stroke_width: f.pen_width,
        ..generator.default_options()
    };
    DrawingContent::Sketch(vec![Drawable {
        options,
        sets: vec![OpSet::new(OpSetKind::FillPath, outline_path(&outline))],
    }])
}

pub(crate) fn render_image(_generator: &RoughGenerator, _config: &RenderConfig, shape: &Shape) -> DrawingContent {
    match &shape.kind {
        ShapeKind::Image(i) => DrawingContent::Image {
            file_id: i.file_id.clone(),
            size: i.frame.size(),
        },
        _ => DrawingContent::Sketch(Vec::new()),
    }
}

pub(crate) fn render_text(_generator: &RoughGenerator, _config: &RenderConfig, shape: &Shape) -> DrawingContent {
    match &shape.kind {
        ShapeKind::Text(t) => DrawingContent::Text {
            text: t.text.clone(),
            font_size: t.font_size,
            font_family: t.font_family.clone(),
            text_align: t.text_align,
            color: shape.attrs.stroke_color.clone(),
            size: t.frame.size(),
        },
        _ => DrawingContent::Sketch(Vec::new()),
    }
}

pub struct Renderer {
    generator: RoughGenerator,
    config: RenderConfig,
    cache: HashMap<Uuid, (u32, u32, Arc<ShapeDrawing>)>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            generator: RoughGenerator::new(config.rough.clone()),
            config,
            cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn generator(&self) -> &RoughGenerator {
        &self.generator
    }

    pub fn generate(&self, shape: &Shape) -> ShapeDrawing {
        let handlers = registry::handlers_for(shape.shape_type());
        ShapeDrawing {
            id: shape.id(),
            version: shape.attrs.version,
            origin: shape.origin(),
            angle: shape.attrs.angle,
            center: shape.local_center(),
            opacity: shape.attrs.opacity / 100.0,
            content: (handlers.render)(&self.generator, &self.config, shape),
        }
    }

    pub fn render_shape(&mut self, shape: &Shape) -> Arc<ShapeDrawing> {
        let a = &shape.attrs;
        if let Some((version, nonce, drawing)) = self.cache.get(&a.id) {
            if *version == a.version && *nonce == a.version_nonce {
                log::trace!("drawable cache hit for {}", a.id);
                return Arc::clone(drawing);
            }
        }
        log::trace!("drawable cache miss for {} v{}", a.id, a.version);
        let drawing = Arc::new(self.generate(shape));
        self.cache
            .insert(a.id, (a.version, a.version_nonce, Arc::clone(&drawing)));
        drawing
    }

    pub fn render_scene(&mut self, shapes: &[Arc<Shape>], options: &RenderOptions) -> Vec<Arc<ShapeDrawing>> {
        let mut drawings = Vec::with_capacity(shapes.len());
        let mut culled = 0usize;
        for shape in shapes.iter().filter(|s| !s.is_deleted()) {
            if let Some(viewport) = &options.viewport {
                if !viewport.is_visible(&shape_bounds(shape)) {
                    culled += 1;
                    continue;
                }
            }
            drawings.push(self.render_shape(shape));
        }
        if culled > 0 {
            log::debug!("culled {culled} off-screen shapes");
        }
        drawings
    }

    pub fn evict(&mut self, id: Uuid) {
        self.cache.remove(&id);
    }

    pub fn retain_cached(&mut self, shapes: &[Arc<Shape>]) {
        self.cache.retain(|id, _| shapes.iter().any(|s| s.id() == *id));
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;
    use crate::drawing::{Arrowhead, Frame, PenPoint, PenStyle, FreehandShape, ShapeStyle, StylePatch};

    fn shape(kind: ShapeKind) -> Shape {
        Shape::with_seed(kind, &ShapeStyle::default(), 1234)
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = Renderer::default();
        let kinds = [
            ShapeKind::rounded_rectangle(Frame::new(0.0, 0.0, 120.0, 80.0), 12.0),
            ShapeKind::ellipse(Frame::new(0.0, 0.0, 120.0, 80.0)),
            ShapeKind::diamond(Frame::new(0.0, 0.0, 120.0, 80.0)),
            ShapeKind::arrow(vec2(0.0, 0.0), vec2(200.0, 40.0)),
        ];
        for kind in kinds {
            let s = shape(kind);
            assert_eq!(renderer.generate(&s), renderer.generate(&s));
        }
    }

    #[test]
    fn test_arrow_renders_body_and_cap() {
        let renderer = Renderer::default();
        let s = shape(ShapeKind::arrow(vec2(0.0, 0.0), vec2(100.0, 0.0)));
        let drawing = renderer.generate(&s);
        // body plus two wing lines
        assert_eq!(drawing.drawables().len(), 3);

        let line = shape(ShapeKind::line(vec2(0.0, 0.0), vec2(100.0, 0.0)));
        assert_eq!(renderer.generate(&line).drawables().len(), 1);

        let both = s.with_style_patch(&StylePatch {
            start_arrowhead: Some(Arrowhead::Triangle),
            end_arrowhead: Some(Arrowhead::Dot),
            ..Default::default()
        });
        assert_eq!(renderer.generate(&both).drawables().len(), 3);
    }

    #[test]
    fn test_small_shapes_are_calmer() {
        let tiny = shape(ShapeKind::rectangle(Frame::new(0.0, 0.0, 8.0, 8.0)))
            .with_style_patch(&StylePatch {
                roughness: Some(3.0),
                ..Default::default()
            });
        assert_eq!(adjust_roughness(&tiny), 1.0);

        let big = shape(ShapeKind::rectangle(Frame::new(0.0, 0.0, 100.0, 60.0)));
        assert_eq!(adjust_roughness(&big), 1.0);
    }

    #[test]
    fn test_dashed_stroke_options() {
        let generator = RoughGenerator::default();
        let s = shape(ShapeKind::rectangle(Frame::new(0.0, 0.0, 100.0, 60.0))).with_style_patch(&StylePatch {
            stroke_style: Some(StrokeStyle::Dashed),
            stroke_width: Some(2.0),
            background_color: Some("#a5d8ff".to_string()),
            ..Default::default()
        });
        let o = sketch_options(&generator, &s);
        assert!(o.disable_multi_stroke);
        assert_eq!(o.stroke_width, 2.5);
        assert_eq!(o.stroke_line_dash, Some(vec![8.0, 10.0]));
        assert_eq!(o.fill.as_deref(), Some("#a5d8ff"));
        assert_eq!(o.hachure_gap, 8.0);
        assert!(o.preserve_vertices);
    }

    #[test]
    fn test_cache_follows_version() {
        let mut renderer = Renderer::default();
        let s = shape(ShapeKind::rectangle(Frame::new(0.0, 0.0, 100.0, 60.0)));
        let first = renderer.render_shape(&s);
        let again = renderer.render_shape(&s);
        assert!(Arc::ptr_eq(&first, &again));

        let moved = s.translated(vec2(10.0, 0.0));
        let third = renderer.render_shape(&moved);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.origin, vec2(10.0, 0.0));
        assert_eq!(renderer.cached_len(), 1);
    }

    #[test]
    fn test_sibling_edits_at_same_version_are_not_shared() {
        let mut renderer = Renderer::default();
        let s = shape(ShapeKind::rectangle(Frame::new(0.0, 0.0, 100.0, 60.0)));
        let a = s.translated(vec2(10.0, 0.0));
        let b = s.translated(vec2(500.0, 0.0));
        assert_eq!(a.attrs.version, b.attrs.version);

        assert_eq!(renderer.render_shape(&a).origin, vec2(10.0, 0.0));
        assert_eq!(renderer.render_shape(&b).origin, vec2(500.0, 0.0));
        // back to the first branch, as after undo
        assert_eq!(renderer.render_shape(&a).origin, vec2(10.0, 0.0));
    }

    #[test]
    fn test_on_screen_render_culls() {
        let mut renderer = Renderer::default();
        let shapes = vec![
            Arc::new(shape(ShapeKind::rectangle(Frame::new(0.0, 0.0, 50.0, 50.0)))),
            Arc::new(shape(ShapeKind::rectangle(Frame::new(5000.0, 0.0, 50.0, 50.0)))),
            Arc::new(shape(ShapeKind::rectangle(Frame::new(10.0, 10.0, 50.0, 50.0))).as_deleted()),
        ];
        let viewport = Viewport::new(800.0, 600.0, ViewportConfig::default());
        assert_eq!(renderer.render_scene(&shapes, &RenderOptions::on_screen(viewport)).len(), 1);
        assert_eq!(renderer.render_scene(&shapes, &RenderOptions::export()).len(), 2);
    }

    #[test]
    fn test_freehand_dot_renders_closed_fill() {
        let renderer = Renderer::default();
        let pen = FreehandShape::from_absolute(&[PenPoint::new(5.0, 5.0)], 2.0, PenStyle::PressureSensitive);
        let drawing = renderer.generate(&shape(ShapeKind::Freehand(pen)));
        let set = &drawing.drawables()[0].sets[0];
        assert_eq!(set.kind, OpSetKind::FillPath);
        assert!(set.ops.len() > 3);
    }
}
