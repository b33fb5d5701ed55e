use crate::drawing::{Frame, Shape};
use crate::math::{PI, TAU, Vec2, vec2};
use uuid::Uuid;

/// Rotate handle distance outside the frame corner, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 10.0;
pub const CLONE_MARGIN: f64 = 20.0;
pub const CLONE_HANDLE_OFFSET: f64 = 24.0;
pub const ROTATION_SNAP_DEG: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformIntent {
    RotateTo { id: Uuid, angle: f64 },
    Clone { id: Uuid, offset: Vec2 },
    ResizeTo { id: Uuid, frame: Frame },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomRight, Corner::BottomLeft];

    pub fn base_cursor_angle(self) -> f64 {
        match self {
            Corner::TopLeft => 0.0,
            Corner::TopRight => PI / 2.0,
            Corner::BottomRight => PI,
            Corner::BottomLeft => 3.0 * PI / 2.0,
        }
    }

    fn outward(self) -> Vec2 {
        match self {
            Corner::TopLeft => vec2(-1.0, -1.0),
            Corner::TopRight => vec2(1.0, -1.0),
            Corner::BottomRight => vec2(1.0, 1.0),
            Corner::BottomLeft => vec2(-1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateCursor {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl RotateCursor {
    pub fn for_angle(angle: f64) -> Self {
        let turn = angle.rem_euclid(TAU);
        match ((turn / (PI / 2.0)).round() as u32) % 4 {
            0 => RotateCursor::TopLeft,
            1 => RotateCursor::TopRight,
            2 => RotateCursor::BottomRight,
            _ => RotateCursor::BottomLeft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloneSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    Corner(Corner),
    Top,
    Right,
    Bottom,
    Left,
}

impl ResizeHandle {
    pub fn is_non_uniform(self) -> bool {
        !matches!(self, ResizeHandle::Corner(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Rotate(Corner),
    Clone(CloneSide),
    Resize(ResizeHandle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePlacement {
    pub handle: Handle,
    pub position: Vec2,
    pub cursor: Option<RotateCursor>,
}

pub fn handles(shape: &Shape, zoom: f64) -> Vec<HandlePlacement> {
    if shape.attrs.locked || shape.is_deleted() {
        return Vec::new();
    }
    let zoom = if zoom > 0.0 { zoom } else { 1.0 };
    let (min, max) = shape.local_extents();
    let origin = shape.origin();
    let center = shape.center();
    let angle = shape.attrs.angle;
    let place = |local: Vec2| (origin + local).rotate_around(center, angle);
    let corner_point = |c: Corner| match c {
        Corner::TopLeft => min,
        Corner::TopRight => vec2(max.x, min.y),
        Corner::BottomRight => max,
        Corner::BottomLeft => vec2(min.x, max.y),
    };
    let mid_y = (min.y + max.y) / 2.0;
    let mid_x = (min.x + max.x) / 2.0;

    let mut out = Vec::with_capacity(14);
    for corner in Corner::ALL {
        out.push(HandlePlacement {
            handle: Handle::Rotate(corner),
            position: place(corner_point(corner) + corner.outward() * (ROTATE_HANDLE_OFFSET / zoom)),
            cursor: Some(RotateCursor::for_angle(corner.base_cursor_angle() + angle)),
        });
    }
    for (side, local) in [
        (CloneSide::Left, vec2(min.x - CLONE_HANDLE_OFFSET / zoom, mid_y)),
        (CloneSide::Right, vec2(max.x + CLONE_HANDLE_OFFSET / zoom, mid_y)),
    ] {
        out.push(HandlePlacement {
            handle: Handle::Clone(side),
            position: place(local),
            cursor: None,
        });
    }

    let resize = Corner::ALL
        .map(|c| (ResizeHandle::Corner(c), corner_point(c)))
        .into_iter()
        .chain([
            (ResizeHandle::Top, vec2(mid_x, min.y)),
            (ResizeHandle::Right, vec2(max.x, mid_y)),
            (ResizeHandle::Bottom, vec2(mid_x, max.y)),
            (ResizeHandle::Left, vec2(min.x, mid_y)),
        ]);
    for (handle, local) in resize {
        if handle.is_non_uniform() && !shape.supports_non_uniform_resize() {
            continue;
        }
        out.push(HandlePlacement {
            handle: Handle::Resize(handle),
            position: place(local),
            cursor: None,
        });
    }
    out
}

pub fn handle_at(shape: &Shape, zoom: f64, point: Vec2, radius: f64) -> Option<Handle> {
    let zoom = if zoom > 0.0 { zoom } else { 1.0 };
    handles(shape, zoom)
        .into_iter()
        .find(|h| h.position.distance(point) <= radius / zoom)
        .map(|h| h.handle)
}

pub fn clone_intent(shape: &Shape, side: CloneSide) -> TransformIntent {
    let step = shape.width().abs() + CLONE_MARGIN;
    let dx = match side {
        CloneSide::Left => -step,
        CloneSide::Right => step,
    };
    TransformIntent::Clone {
        id: shape.id(),
        offset: vec2(dx, 0.0),
    }
}

pub fn resize_intent(shape: &Shape, handle: ResizeHandle, point: Vec2) -> Option<TransformIntent> {
    let non_uniform = shape.supports_non_uniform_resize();
    if handle.is_non_uniform() && !non_uniform {
        return None;
    }
    let (min, max) = shape.local_extents();
    let origin = shape.origin();
    let local = point.rotate_around(shape.center(), -shape.attrs.angle) - origin;
    let (mut a, mut b) = (min, max);
    match handle {
        ResizeHandle::Corner(Corner::TopLeft) => a = local,
        ResizeHandle::Corner(Corner::TopRight) => (a.y, b.x) = (local.y, local.x),
        ResizeHandle::Corner(Corner::BottomRight) => b = local,
        ResizeHandle::Corner(Corner::BottomLeft) => (a.x, b.y) = (local.x, local.y),
        ResizeHandle::Top => a.y = local.y,
        ResizeHandle::Right => b.x = local.x,
        ResizeHandle::Bottom => b.y = local.y,
        ResizeHandle::Left => a.x = local.x,
    }
    if !non_uniform {
        let size = max - min;
        if size.x > f64::EPSILON && size.y > f64::EPSILON {
            let scale = ((b.x - a.x) / size.x).abs().max(((b.y - a.y) / size.y).abs());
            let (w, h) = (size.x * scale, size.y * scale);
            // the corner opposite the handle stays put
            match handle {
                ResizeHandle::Corner(Corner::TopLeft) => a = b - vec2(w, h),
                ResizeHandle::Corner(Corner::TopRight) => (a.y, b.x) = (b.y - h, a.x + w),
                ResizeHandle::Corner(Corner::BottomLeft) => (a.x, b.y) = (b.x - w, a.y + h),
                _ => b = a + vec2(w, h),
            }
        }
    }
    // the point opposite the handle, before and after, in local coordinates
    let mid = min.midpoint(max);
    let (fixed_before, fixed_after) = match handle {
        ResizeHandle::Corner(Corner::TopLeft) => (max, b),
        ResizeHandle::Corner(Corner::TopRight) => (vec2(min.x, max.y), vec2(a.x, b.y)),
        ResizeHandle::Corner(Corner::BottomRight) => (min, a),
        ResizeHandle::Corner(Corner::BottomLeft) => (vec2(max.x, min.y), vec2(b.x, a.y)),
        ResizeHandle::Top => (vec2(mid.x, max.y), vec2((a.x + b.x) / 2.0, b.y)),
        ResizeHandle::Right => (vec2(min.x, mid.y), vec2(a.x, (a.y + b.y) / 2.0)),
        ResizeHandle::Bottom => (vec2(mid.x, min.y), vec2((a.x + b.x) / 2.0, a.y)),
        ResizeHandle::Left => (vec2(max.x, mid.y), vec2(b.x, (a.y + b.y) / 2.0)),
    };
    // a rotated shape pivots about its new center, so shift the frame to
    // keep the fixed point where it was on screen
    let angle = shape.attrs.angle;
    let shift = if angle == 0.0 {
        Vec2::ZERO
    } else {
        let before = (origin + fixed_before).rotate_around(shape.center(), angle);
        let after = (origin + fixed_after).rotate_around(origin + a.midpoint(b), angle);
        before - after
    };
    let frame = Frame::from_corners(origin + a + shift, origin + b + shift);
    Some(TransformIntent::ResizeTo { id: shape.id(), frame })
}

#[derive(Debug, Clone)]
pub struct RotateDrag {
    id: Uuid,
    corner: Corner,
    center: Vec2,
    original_angle: f64,
    angle: f64,
}

impl RotateDrag {
    pub fn begin(shape: &Shape, corner: Corner) -> Option<Self> {
        if shape.attrs.locked || shape.is_deleted() {
            return None;
        }
        log::debug!("rotate drag started on {}", shape.id());
        Some(Self {
            id: shape.id(),
            corner,
            center: shape.center(),
            original_angle: shape.attrs.angle,
            angle: shape.attrs.angle,
        })
    }

    pub fn update(&mut self, pointer: Vec2, snap: bool) -> f64 {
        let d = pointer - self.center;
        if d.length_squared() <= f64::EPSILON {
            return self.angle;
        }
        let mut angle = d.y.atan2(d.x) + PI / 2.0;
        if snap {
            let step = ROTATION_SNAP_DEG.to_radians();
            angle = (angle / step).round() * step;
        }
        self.angle = crate::math::normalize_angle(angle);
        self.angle
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn cursor(&self) -> RotateCursor {
        RotateCursor::for_angle(self.corner.base_cursor_angle() + self.angle)
    }

    pub fn end(self) -> TransformIntent {
        TransformIntent::RotateTo {
            id: self.id,
            angle: self.angle,
        }
    }

    pub fn cancel(self) -> f64 {
        log::debug!("rotate drag on {} cancelled", self.id);
        self.original_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{ShapeKind, ShapeStyle};

    fn rect() -> Shape {
        Shape::with_seed(ShapeKind::rectangle(Frame::new(0.0, 0.0, 100.0, 50.0)), &ShapeStyle::default(), 3)
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_rotate_handles_sit_outside_corners() {
        let hs = handles(&rect(), 2.0);
        let top_left = hs.iter().find(|h| h.handle == Handle::Rotate(Corner::TopLeft)).unwrap();
        assert!(approx(top_left.position, vec2(-5.0, -5.0)));
        assert_eq!(top_left.cursor, Some(RotateCursor::TopLeft));
        assert_eq!(hs.len(), 4 + 2 + 8);
    }

    #[test]
    fn test_cursor_follows_rotation() {
        let turned = rect().rotated_to(PI / 2.0);
        let hs = handles(&turned, 1.0);
        let top_left = hs.iter().find(|h| h.handle == Handle::Rotate(Corner::TopLeft)).unwrap();
        assert_eq!(top_left.cursor, Some(RotateCursor::TopRight));
    }

    #[test]
    fn test_locked_shapes_have_no_handles() {
        assert!(handles(&rect().with_locked(true), 1.0).is_empty());
        assert!(RotateDrag::begin(&rect().with_locked(true), Corner::TopLeft).is_none());
    }

    #[test]
    fn test_text_has_no_edge_handles() {
        let t = Shape::with_seed(
            ShapeKind::text(Frame::new(0.0, 0.0, 80.0, 20.0), "hi", 16.0),
            &ShapeStyle::default(),
            3,
        );
        let hs = handles(&t, 1.0);
        assert!(!hs.iter().any(|h| matches!(h.handle, Handle::Resize(r) if r.is_non_uniform())));
        assert_eq!(resize_intent(&t, ResizeHandle::Right, vec2(200.0, 10.0)), None);
    }

    #[test]
    fn test_clone_offset_is_width_plus_margin() {
        let s = rect();
        assert_eq!(
            clone_intent(&s, CloneSide::Right),
            TransformIntent::Clone {
                id: s.id(),
                offset: vec2(120.0, 0.0)
            }
        );
        assert_eq!(
            clone_intent(&s, CloneSide::Left),
            TransformIntent::Clone {
                id: s.id(),
                offset: vec2(-120.0, 0.0)
            }
        );
    }

    #[test]
    fn test_edge_resize_moves_one_side() {
        let s = rect();
        let Some(TransformIntent::ResizeTo { frame, .. }) = resize_intent(&s, ResizeHandle::Right, vec2(150.0, 999.0))
        else {
            panic!("expected a resize intent");
        };
        assert_eq!(frame, Frame::new(0.0, 0.0, 150.0, 50.0));
    }

    #[test]
    fn test_rotated_resize_keeps_opposite_corner_on_screen() {
        let s = rect().rotated_to(PI / 3.0);
        let on_screen = |shape: &Shape, local: Vec2| (shape.origin() + local).rotate_around(shape.center(), shape.attrs.angle);
        let anchor = on_screen(&s, vec2(0.0, 0.0));
        let pointer = on_screen(&s, vec2(160.0, 90.0));

        let intent = resize_intent(&s, ResizeHandle::Corner(Corner::BottomRight), pointer).unwrap();
        let TransformIntent::ResizeTo { frame, .. } = intent else {
            panic!("expected a resize intent");
        };
        assert!((frame.width - 160.0).abs() < 1e-9 && (frame.height - 90.0).abs() < 1e-9);
        let resized = s.resized_to(frame);
        assert!(approx(on_screen(&resized, vec2(0.0, 0.0)), anchor));
        assert!(approx(on_screen(&resized, vec2(160.0, 90.0)), pointer));

        let left = resize_intent(&s, ResizeHandle::Left, on_screen(&s, vec2(-40.0, 25.0))).unwrap();
        let TransformIntent::ResizeTo { frame, .. } = left else {
            panic!("expected a resize intent");
        };
        let resized = s.resized_to(frame);
        assert!(approx(on_screen(&resized, vec2(140.0, 25.0)), on_screen(&s, vec2(100.0, 25.0))));
    }

    #[test]
    fn test_uniform_corner_resize_keeps_aspect() {
        let img = Shape::with_seed(
            ShapeKind::image(Frame::new(0.0, 0.0, 100.0, 50.0), "file-1"),
            &ShapeStyle::default(),
            3,
        );
        let Some(TransformIntent::ResizeTo { frame, .. }) =
            resize_intent(&img, ResizeHandle::Corner(Corner::BottomRight), vec2(200.0, 60.0))
        else {
            panic!("expected a resize intent");
        };
        assert_eq!(frame, Frame::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_rotate_drag_angles() {
        let s = rect();
        let mut drag = RotateDrag::begin(&s, Corner::TopRight).unwrap();
        // straight right of the center is a quarter turn
        let a = drag.update(s.center() + vec2(100.0, 0.0), false);
        assert!((a - PI / 2.0).abs() < 1e-9);
        assert_eq!(drag.cursor(), RotateCursor::BottomRight);

        let snapped = drag.update(s.center() + vec2(100.0, 8.0), true);
        assert!((snapped - PI / 2.0).abs() < 1e-9);

        assert_eq!(drag.clone().cancel(), 0.0);
        assert_eq!(
            drag.end(),
            TransformIntent::RotateTo {
                id: s.id(),
                angle: PI / 2.0
            }
        );
    }
}
