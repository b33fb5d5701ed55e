use crate::bounds::{Bounds, closest_shape_bounds, common_bounds};
use crate::config::ViewportConfig;
use crate::drawing::Shape;
use crate::math::{Vec2, vec2};

/// Maps between scene coordinates and viewport (screen) coordinates:
/// `viewport = (scene + scroll) * zoom + offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub scroll: Vec2,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub offset: Vec2,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(width: f64, height: f64, config: ViewportConfig) -> Self {
        Self {
            scroll: Vec2::ZERO,
            zoom: 1.0,
            width,
            height,
            offset: Vec2::ZERO,
            config: config.normalized(),
        }
    }

    pub fn scene_to_viewport(&self, p: Vec2) -> Vec2 {
        (p + self.scroll) * self.zoom + self.offset
    }

    pub fn viewport_to_scene(&self, p: Vec2) -> Vec2 {
        (p - self.offset) * (1.0 / self.zoom) - self.scroll
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.zoom;
        }
        zoom.clamp(self.config.min_zoom, self.config.max_zoom)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
    }

    pub fn zoom_at(&mut self, anchor: Vec2, factor: f64) {
        let before = self.viewport_to_scene(anchor);
        self.zoom = self.clamp_zoom(self.zoom * factor);
        let after = self.viewport_to_scene(anchor);
        self.scroll += after - before;
    }

    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll += delta * (1.0 / self.zoom);
    }

    pub fn visible_scene_bounds(&self) -> Bounds {
        let a = self.viewport_to_scene(self.offset);
        let b = self.viewport_to_scene(self.offset + vec2(self.width, self.height));
        Bounds::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    pub fn is_outside_viewport(&self, bounds: &Bounds) -> bool {
        let a = self.scene_to_viewport(bounds.min());
        let b = self.scene_to_viewport(bounds.max());
        b.x - a.x > self.width || b.y - a.y > self.height
    }

    pub fn is_visible(&self, bounds: &Bounds) -> bool {
        self.visible_scene_bounds().intersects(bounds)
    }

    /// Scroll that centers the scene content. When everything does not fit,
    /// only the shape nearest the current scroll origin is centered.
    pub fn scroll_to_center<'a, I>(&self, shapes: I) -> Vec2
    where
        I: IntoIterator<Item = &'a Shape>,
        I::IntoIter: Clone,
    {
        let shapes = shapes.into_iter();
        let Some(mut content) = common_bounds(shapes.clone()) else {
            return Vec2::ZERO;
        };
        if self.is_outside_viewport(&content) {
            let from = self.viewport_to_scene(self.scroll);
            if let Some(closest) = closest_shape_bounds(shapes, from) {
                log::debug!("scene exceeds viewport, centering nearest shape");
                content = closest;
            }
        }
        vec2(self.width, self.height) * (0.5 / self.zoom) - content.center()
    }

    pub fn center_on<'a, I>(&mut self, shapes: I)
    where
        I: IntoIterator<Item = &'a Shape>,
        I::IntoIter: Clone,
    {
        self.scroll = self.scroll_to_center(shapes);
    }
}
