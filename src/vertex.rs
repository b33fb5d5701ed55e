use crate::math::Vec2;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: [position.x as f32, position.y as f32],
            color,
        }
    }
}
