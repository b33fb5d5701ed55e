use crate::math::Vec2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CubicBez {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBez {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub fn from_quad(p0: Vec2, ctrl: Vec2, p2: Vec2) -> Self {
        Self {
            p0,
            p1: p0 + (ctrl - p0) * (2.0 / 3.0),
            p2: p2 + (ctrl - p2) * (2.0 / 3.0),
            p3: p2,
        }
    }

    pub fn eval(&self, t: f64) -> Vec2 {
        let u = 1.0 - t;
        let uu = u * u;
        let tt = t * t;
        self.p0 * (uu * u) + self.p1 * (3.0 * uu * t) + self.p2 * (3.0 * u * tt) + self.p3 * (tt * t)
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.p3, self.p2, self.p1, self.p0)
    }

    pub fn flatten(&self, segments: u32) -> Vec<Vec2> {
        let segments = segments.max(1);
        (1..=segments)
            .map(|i| self.eval(i as f64 / segments as f64))
            .collect()
    }

    pub fn segments_for_tolerance(&self, tolerance: f64) -> u32 {
        let hull = self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3);
        let tolerance = tolerance.max(0.01);
        ((hull / tolerance).sqrt().ceil() as u32).clamp(1, 64)
    }
}
