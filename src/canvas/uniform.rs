use crate::canvas::Viewport;
use crate::math::Vec2;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUniforms {
    transform: [[f32; 4]; 4],
}

impl Default for ViewUniforms {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewUniforms {
    pub fn new() -> Self {
        Self {
            transform: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn update_transform(&mut self, viewport: &Viewport) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        let sx = 2.0 * viewport.zoom / viewport.width;
        let sy = -2.0 * viewport.zoom / viewport.height;
        let tx = sx * viewport.scroll.x - 1.0;
        let ty = sy * viewport.scroll.y + 1.0;
        self.transform = [
            [sx as f32, 0.0, 0.0, 0.0],
            [0.0, sy as f32, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx as f32, ty as f32, 0.0, 1.0],
        ];
    }

    pub fn transform(&self) -> [[f32; 4]; 4] {
        self.transform
    }

    pub fn project(&self, p: Vec2) -> [f32; 2] {
        let m = &self.transform;
        let (x, y) = (p.x as f32, p.y as f32);
        [m[0][0] * x + m[3][0], m[1][1] * y + m[3][1]]
    }
}
