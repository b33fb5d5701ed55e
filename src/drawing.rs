use crate::math::{Vec2, clamp, non_negative, vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TRANSPARENT: &str = "transparent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeType {
    Rectangle,
    Ellipse,
    Diamond,
    Line,
    Arrow,
    Freehand,
    Image,
    Text,
}

impl ShapeType {
    pub const ALL: [ShapeType; 8] = [
        ShapeType::Rectangle,
        ShapeType::Ellipse,
        ShapeType::Diamond,
        ShapeType::Line,
        ShapeType::Arrow,
        ShapeType::Freehand,
        ShapeType::Image,
        ShapeType::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Ellipse => "ellipse",
            ShapeType::Diamond => "diamond",
            ShapeType::Line => "line",
            ShapeType::Arrow => "arrow",
            ShapeType::Freehand => "freehand",
            ShapeType::Image => "image",
            ShapeType::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
    Zigzag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arrowhead {
    #[default]
    None,
    Arrow,
    Bar,
    Dot,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PenStyle {
    #[default]
    PressureSensitive,
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeAttributes {
    pub id: Uuid,
    /// Rotation in radians about the shape center.
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_style: StrokeStyle,
    pub stroke_width: f64,
    pub roughness: f64,
    /// 0 to 100.
    pub opacity: f64,
    pub seed: u32,
    pub version: u32,
    /// Redrawn on every update so divergent edits at the same version differ.
    #[serde(default)]
    pub version_nonce: u32,
    pub locked: bool,
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn origin(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    fn sanitize(&mut self) {
        for v in [&mut self.x, &mut self.y, &mut self.width, &mut self.height] {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
        if self.width < 0.0 {
            self.x += self.width;
            self.width = -self.width;
        }
        if self.height < 0.0 {
            self.y += self.height;
            self.height = -self.height;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    #[serde(flatten)]
    pub frame: Frame,
    pub rx: f64,
    pub ry: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearShape {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub start_arrowhead: Arrowhead,
    pub end_arrowhead: Arrowhead,
}

impl LinearShape {
    pub fn start(&self) -> Vec2 {
        vec2(self.x1, self.y1)
    }

    pub fn end(&self) -> Vec2 {
        vec2(self.x2, self.y2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

impl PenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, pressure: None }
    }

    pub fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            x,
            y,
            pressure: Some(pressure),
        }
    }

    pub fn position(&self) -> Vec2 {
        vec2(self.x, self.y)
    }
}

/// Freehand ink. Points are relative to the `(x, y)` origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreehandShape {
    pub x: f64,
    pub y: f64,
    pub points: Vec<PenPoint>,
    pub pen_width: f64,
    pub pen_style: PenStyle,
}

impl FreehandShape {
    pub fn from_absolute(points: &[PenPoint], pen_width: f64, pen_style: PenStyle) -> Self {
        let origin = points.first().map(PenPoint::position).unwrap_or(Vec2::ZERO);
        let points = points
            .iter()
            .map(|p| PenPoint {
                x: p.x - origin.x,
                y: p.y - origin.y,
                pressure: p.pressure,
            })
            .collect();
        let mut shape = Self {
            x: origin.x,
            y: origin.y,
            points,
            pen_width,
            pen_style,
        };
        shape.sanitize();
        shape
    }

    pub fn has_pressure(&self) -> bool {
        self.points.iter().any(|p| p.pressure.is_some())
    }

    fn sanitize(&mut self) {
        for v in [&mut self.x, &mut self.y] {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
        self.pen_width = non_negative(self.pen_width);
        self.points.retain(|p| p.x.is_finite() && p.y.is_finite());
        if self.points.is_empty() {
            self.points.push(PenPoint::new(0.0, 0.0));
        }
        for p in &mut self.points {
            p.pressure = p.pressure.filter(|v| v.is_finite()).map(|v| clamp(v, 0.0, 1.0));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageShape {
    #[serde(flatten)]
    pub frame: Frame,
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    #[serde(flatten)]
    pub frame: Frame,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub text_align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle(BoxShape),
    Ellipse(Frame),
    Diamond(BoxShape),
    Line(LinearShape),
    Arrow(LinearShape),
    Freehand(FreehandShape),
    Image(ImageShape),
    Text(TextShape),
}

impl ShapeKind {
    pub fn rectangle(frame: Frame) -> Self {
        ShapeKind::Rectangle(BoxShape { frame, rx: 0.0, ry: 0.0 })
    }

    pub fn rounded_rectangle(frame: Frame, radius: f64) -> Self {
        ShapeKind::Rectangle(BoxShape {
            frame,
            rx: radius,
            ry: radius,
        })
    }

    pub fn ellipse(frame: Frame) -> Self {
        ShapeKind::Ellipse(frame)
    }

    pub fn diamond(frame: Frame) -> Self {
        ShapeKind::Diamond(BoxShape { frame, rx: 0.0, ry: 0.0 })
    }

    pub fn line(start: Vec2, end: Vec2) -> Self {
        ShapeKind::Line(LinearShape {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            start_arrowhead: Arrowhead::None,
            end_arrowhead: Arrowhead::None,
        })
    }

    pub fn arrow(start: Vec2, end: Vec2) -> Self {
        ShapeKind::Arrow(LinearShape {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            start_arrowhead: Arrowhead::None,
            end_arrowhead: Arrowhead::Arrow,
        })
    }

    pub fn image(frame: Frame, file_id: impl Into<String>) -> Self {
        ShapeKind::Image(ImageShape {
            frame,
            file_id: file_id.into(),
        })
    }

    pub fn text(frame: Frame, text: impl Into<String>, font_size: f64) -> Self {
        ShapeKind::Text(TextShape {
            frame,
            text: text.into(),
            font_size,
            font_family: "Virgil".to_string(),
            text_align: TextAlign::Left,
        })
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeKind::Rectangle(_) => ShapeType::Rectangle,
            ShapeKind::Ellipse(_) => ShapeType::Ellipse,
            ShapeKind::Diamond(_) => ShapeType::Diamond,
            ShapeKind::Line(_) => ShapeType::Line,
            ShapeKind::Arrow(_) => ShapeType::Arrow,
            ShapeKind::Freehand(_) => ShapeType::Freehand,
            ShapeKind::Image(_) => ShapeType::Image,
            ShapeKind::Text(_) => ShapeType::Text,
        }
    }

    fn sanitize(&mut self) {
        match self {
            ShapeKind::Rectangle(b) | ShapeKind::Diamond(b) => {
                b.frame.sanitize();
                b.rx = non_negative(b.rx);
                b.ry = non_negative(b.ry);
            }
            ShapeKind::Ellipse(frame) => frame.sanitize(),
            ShapeKind::Line(l) | ShapeKind::Arrow(l) => {
                for v in [&mut l.x1, &mut l.y1, &mut l.x2, &mut l.y2] {
                    if !v.is_finite() {
                        *v = 0.0;
                    }
                }
            }
            ShapeKind::Freehand(f) => f.sanitize(),
            ShapeKind::Image(i) => i.frame.sanitize(),
            ShapeKind::Text(t) => {
                t.frame.sanitize();
                t.font_size = non_negative(t.font_size);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeStyle {
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_style: StrokeStyle,
    pub stroke_width: f64,
    pub roughness: f64,
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#1e1e1e".to_string(),
            background_color: TRANSPARENT.to_string(),
            fill_style: FillStyle::Hachure,
            stroke_style: StrokeStyle::Solid,
            stroke_width: 2.0,
            roughness: 1.0,
            opacity: 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StylePatch {
    pub stroke_color: Option<String>,
    pub background_color: Option<String>,
    pub fill_style: Option<FillStyle>,
    pub stroke_style: Option<StrokeStyle>,
    pub stroke_width: Option<f64>,
    pub roughness: Option<f64>,
    pub opacity: Option<f64>,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
    pub corner_radius: Option<f64>,
}

pub fn random_seed() -> u32 {
    rand::rng().random_range(1..(1u32 << 31))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(flatten)]
    pub attrs: ShapeAttributes,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

impl Shape {
    pub fn create(kind: ShapeKind, style: &ShapeStyle) -> Self {
        Self::with_seed(kind, style, random_seed())
    }

    pub fn with_seed(kind: ShapeKind, style: &ShapeStyle, seed: u32) -> Self {
        let mut shape = Self {
            attrs: ShapeAttributes {
                id: Uuid::new_v4(),
                angle: 0.0,
                stroke_color: style.stroke_color.clone(),
                background_color: style.background_color.clone(),
                fill_style: style.fill_style,
                stroke_style: style.stroke_style,
                stroke_width: style.stroke_width,
                roughness: style.roughness,
                opacity: style.opacity,
                seed,
                version: 1,
                version_nonce: random_seed(),
                locked: false,
                deleted: false,
            },
            kind,
        };
        shape.sanitize();
        log::trace!("created {} {} seed={}", shape.shape_type().as_str(), shape.id(), seed);
        shape
    }

    pub fn id(&self) -> Uuid {
        self.attrs.id
    }

    pub fn seed(&self) -> u32 {
        self.attrs.seed
    }

    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    pub fn is_deleted(&self) -> bool {
        self.attrs.deleted
    }

    pub fn is_linear(&self) -> bool {
        matches!(self.kind, ShapeKind::Line(_) | ShapeKind::Arrow(_))
    }

    pub fn is_filled(&self) -> bool {
        !self.attrs.background_color.is_empty() && self.attrs.background_color != TRANSPARENT
    }

    pub fn supports_non_uniform_resize(&self) -> bool {
        !matches!(self.kind, ShapeKind::Text(_) | ShapeKind::Image(_))
    }

    pub fn origin(&self) -> Vec2 {
        match &self.kind {
            ShapeKind::Rectangle(b) | ShapeKind::Diamond(b) => b.frame.origin(),
            ShapeKind::Ellipse(frame) => frame.origin(),
            ShapeKind::Image(i) => i.frame.origin(),
            ShapeKind::Text(t) => t.frame.origin(),
            ShapeKind::Line(l) | ShapeKind::Arrow(l) => l.start(),
            ShapeKind::Freehand(f) => vec2(f.x, f.y),
        }
    }

    pub fn local_extents(&self) -> (Vec2, Vec2) {
        match &self.kind {
            ShapeKind::Rectangle(b) | ShapeKind::Diamond(b) => (Vec2::ZERO, b.frame.size()),
            ShapeKind::Ellipse(frame) => (Vec2::ZERO, frame.size()),
            ShapeKind::Image(i) => (Vec2::ZERO, i.frame.size()),
            ShapeKind::Text(t) => (Vec2::ZERO, t.frame.size()),
            ShapeKind::Line(l) | ShapeKind::Arrow(l) => {
                let d = l.end() - l.start();
                (Vec2::ZERO.min(d), Vec2::ZERO.max(d))
            }
            ShapeKind::Freehand(f) => {
                let mut min = vec2(f64::INFINITY, f64::INFINITY);
                let mut max = vec2(f64::NEG_INFINITY, f64::NEG_INFINITY);
                for p in &f.points {
                    min = min.min(p.position());
                    max = max.max(p.position());
                }
                if !min.is_finite() {
                    return (Vec2::ZERO, Vec2::ZERO);
                }
                (min, max)
            }
        }
    }

    pub fn width(&self) -> f64 {
        let (min, max) = self.local_extents();
        max.x - min.x
    }

    pub fn height(&self) -> f64 {
        let (min, max) = self.local_extents();
        max.y - min.y
    }

    pub fn local_center(&self) -> Vec2 {
        let (min, max) = self.local_extents();
        min.midpoint(max)
    }

    pub fn center(&self) -> Vec2 {
        self.origin() + self.local_center()
    }

    /// Copy-on-write update: applies `mutate` to a copy, bumps the version
    /// and re-clamps attributes. Id and seed are restored if `mutate`
    /// touched them.
    pub fn updated(&self, mutate: impl FnOnce(&mut Shape)) -> Shape {
        let mut next = self.clone();
        mutate(&mut next);
        next.attrs.id = self.attrs.id;
        next.attrs.seed = self.attrs.seed;
        next.attrs.version = self.attrs.version.wrapping_add(1);
        next.attrs.version_nonce = random_seed();
        next.sanitize();
        next
    }

    pub fn with_style_patch(&self, patch: &StylePatch) -> Shape {
        self.updated(|s| {
            let a = &mut s.attrs;
            if let Some(c) = &patch.stroke_color {
                a.stroke_color = c.clone();
            }
            if let Some(c) = &patch.background_color {
                a.background_color = c.clone();
            }
            if let Some(f) = patch.fill_style {
                a.fill_style = f;
            }
            if let Some(st) = patch.stroke_style {
                a.stroke_style = st;
            }
            if let Some(w) = patch.stroke_width {
                a.stroke_width = w;
            }
            if let Some(r) = patch.roughness {
                a.roughness = r;
            }
            if let Some(o) = patch.opacity {
                a.opacity = o;
            }
            match &mut s.kind {
                ShapeKind::Line(l) | ShapeKind::Arrow(l) => {
                    if let Some(h) = patch.start_arrowhead {
                        l.start_arrowhead = h;
                    }
                    if let Some(h) = patch.end_arrowhead {
                        l.end_arrowhead = h;
                    }
                }
                ShapeKind::Rectangle(b) | ShapeKind::Diamond(b) => {
                    if let Some(r) = patch.corner_radius {
                        b.rx = r;
                        b.ry = r;
                    }
                }
                _ => {}
            }
        })
    }

    pub fn translated(&self, delta: Vec2) -> Shape {
        self.updated(|s| match &mut s.kind {
            ShapeKind::Rectangle(b) | ShapeKind::Diamond(b) => {
                b.frame.x += delta.x;
                b.frame.y += delta.y;
            }
            ShapeKind::Ellipse(frame) => {
                frame.x += delta.x;
                frame.y += delta.y;
            }
            ShapeKind::Image(i) => {
                i.frame.x += delta.x;
                i.frame.y += delta.y;
            }
            ShapeKind::Text(t) => {
                t.frame.x += delta.x;
                t.frame.y += delta.y;
            }
            ShapeKind::Line(l) | ShapeKind::Arrow(l) => {
                l.x1 += delta.x;
                l.y1 += delta.y;
                l.x2 += delta.x;
                l.y2 += delta.y;
            }
            ShapeKind::Freehand(f) => {
                f.x += delta.x;
                f.y += delta.y;
            }
        })
    }

    pub fn rotated_to(&self, angle: f64) -> Shape {
        self.updated(|s| s.attrs.angle = crate::math::normalize_angle(angle))
    }

    pub fn resized_to(&self, target: Frame) -> Shape {
        let (min, max) = self.local_extents();
        let origin = self.origin();
        let from_min = origin + min;
        let size = max - min;
        let sx = if size.x > f64::EPSILON { target.width / size.x } else { 1.0 };
        let sy = if size.y > f64::EPSILON { target.height / size.y } else { 1.0 };
        let map = |p: Vec2| vec2(target.x + (p.x - from_min.x) * sx, target.y + (p.y - from_min.y) * sy);

        self.updated(|s| match &mut s.kind {
            ShapeKind::Rectangle(b) | ShapeKind::Diamond(b) => b.frame = target,
            ShapeKind::Ellipse(frame) => *frame = target,
            ShapeKind::Image(i) => i.frame = target,
            ShapeKind::Text(t) => t.frame = target,
            ShapeKind::Line(l) | ShapeKind::Arrow(l) => {
                let a = map(l.start());
                let b = map(l.end());
                (l.x1, l.y1, l.x2, l.y2) = (a.x, a.y, b.x, b.y);
            }
            ShapeKind::Freehand(f) => {
                let new_origin = map(vec2(f.x, f.y));
                for p in &mut f.points {
                    let abs = map(vec2(f.x + p.x, f.y + p.y));
                    p.x = abs.x - new_origin.x;
                    p.y = abs.y - new_origin.y;
                }
                f.x = new_origin.x;
                f.y = new_origin.y;
            }
        })
    }

    pub fn as_deleted(&self) -> Shape {
        self.updated(|s| s.attrs.deleted = true)
    }

    pub fn with_locked(&self, locked: bool) -> Shape {
        self.updated(|s| s.attrs.locked = locked)
    }

    pub fn duplicate(&self, offset: Vec2) -> Shape {
        let mut copy = self.translated(offset);
        copy.attrs.id = Uuid::new_v4();
        copy.attrs.seed = random_seed();
        copy.attrs.version = 1;
        copy.attrs.locked = false;
        copy
    }

    pub fn sanitize(&mut self) {
        let a = &mut self.attrs;
        a.stroke_width = non_negative(a.stroke_width);
        a.roughness = non_negative(a.roughness);
        a.opacity = if a.opacity.is_nan() { 100.0 } else { clamp(a.opacity, 0.0, 100.0) };
        if !a.angle.is_finite() {
            a.angle = 0.0;
        }
        self.kind.sanitize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Shape {
        Shape::with_seed(
            ShapeKind::rectangle(Frame::new(10.0, 20.0, 40.0, 30.0)),
            &ShapeStyle::default(),
            42,
        )
    }

    #[test]
    fn test_seed_survives_updates() {
        let shape = rect();
        let patched = shape
            .with_style_patch(&StylePatch {
                stroke_width: Some(4.0),
                ..Default::default()
            })
            .translated(vec2(5.0, 5.0))
            .updated(|s| s.attrs.seed = 7);

        assert_eq!(patched.seed(), 42);
        assert_eq!(patched.id(), shape.id());
        assert_eq!(patched.attrs.version, shape.attrs.version + 3);
        assert_eq!(shape.attrs.stroke_width, 2.0);
    }

    #[test]
    fn test_sibling_edits_get_distinct_nonces() {
        let shape = rect();
        let a = shape.translated(vec2(10.0, 0.0));
        let b = shape.translated(vec2(500.0, 0.0));
        assert_eq!(a.attrs.version, b.attrs.version);
        assert_ne!(a.attrs.version_nonce, b.attrs.version_nonce);
    }

    #[test]
    fn test_negative_style_values_are_clamped() {
        let shape = rect().with_style_patch(&StylePatch {
            stroke_width: Some(-3.0),
            roughness: Some(f64::NAN),
            corner_radius: Some(-10.0),
            opacity: Some(250.0),
            ..Default::default()
        });

        assert_eq!(shape.attrs.stroke_width, 0.0);
        assert_eq!(shape.attrs.roughness, 0.0);
        assert_eq!(shape.attrs.opacity, 100.0);
        match shape.kind {
            ShapeKind::Rectangle(b) => assert_eq!((b.rx, b.ry), (0.0, 0.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_duplicate_gets_fresh_identity() {
        let shape = rect();
        let copy = shape.duplicate(vec2(60.0, 0.0));
        assert_ne!(copy.id(), shape.id());
        assert_eq!(copy.origin(), vec2(70.0, 20.0));
        assert_eq!(copy.attrs.version, 1);
    }

    #[test]
    fn test_freehand_never_empty() {
        let stroke = FreehandShape::from_absolute(&[], 2.0, PenStyle::Uniform);
        assert_eq!(stroke.points.len(), 1);
    }

    #[test]
    fn test_freehand_origin_is_repaired() {
        let mut stroke = FreehandShape::from_absolute(&[PenPoint::new(3.0, 4.0)], 2.0, PenStyle::Uniform);
        stroke.x = f64::NAN;
        stroke.y = f64::INFINITY;
        let shape = Shape::with_seed(ShapeKind::Freehand(stroke), &ShapeStyle::default(), 1);
        assert_eq!(shape.origin(), vec2(0.0, 0.0));
    }

    #[test]
    fn test_freehand_points_are_relative_to_first() {
        let stroke = FreehandShape::from_absolute(
            &[PenPoint::new(100.0, 50.0), PenPoint::with_pressure(110.0, 55.0, 1.7)],
            2.0,
            PenStyle::PressureSensitive,
        );
        assert_eq!((stroke.x, stroke.y), (100.0, 50.0));
        assert_eq!(stroke.points[1].position(), vec2(10.0, 5.0));
        assert_eq!(stroke.points[1].pressure, Some(1.0));
    }

    #[test]
    fn test_linear_extents_and_center() {
        let shape = Shape::with_seed(
            ShapeKind::arrow(vec2(100.0, 100.0), vec2(60.0, 140.0)),
            &ShapeStyle::default(),
            1,
        );
        assert_eq!(shape.local_extents(), (vec2(-40.0, 0.0), vec2(0.0, 40.0)));
        assert_eq!(shape.center(), vec2(80.0, 120.0));
    }

    #[test]
    fn test_resize_linear_maps_endpoints() {
        let shape = Shape::with_seed(ShapeKind::line(vec2(0.0, 0.0), vec2(10.0, 10.0)), &ShapeStyle::default(), 1);
        let resized = shape.resized_to(Frame::new(100.0, 100.0, 20.0, 40.0));
        match resized.kind {
            ShapeKind::Line(l) => {
                assert_eq!(l.start(), vec2(100.0, 100.0));
                assert_eq!(l.end(), vec2(120.0, 140.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_frame_from_corners_normalizes() {
        let f = Frame::from_corners(vec2(50.0, 10.0), vec2(20.0, 40.0));
        assert_eq!(f, Frame::new(20.0, 10.0, 30.0, 30.0));
    }
}
