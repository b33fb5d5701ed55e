use crate::math::Vec2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub data: [[f64; 3]; 3],
}

impl Mat3 {
    pub fn new(data: [[f64; 3]; 3]) -> Self {
        Self { data }
    }

    pub fn identity() -> Self {
        Self {
            data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn zero() -> Self {
        Self {
            data: [[0.0; 3]; 3],
        }
    }

    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            data: [
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [translation.x, translation.y, 1.0],
            ],
        }
    }

    pub fn from_scale(scale: f64) -> Self {
        Self {
            data: [[scale, 0.0, 0.0], [0.0, scale, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn from_rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            data: [[cos, sin, 0.0], [-sin, cos, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn from_rotation_about(center: Vec2, angle: f64) -> Self {
        Self::from_translation(center) * Self::from_rotation(angle) * Self::from_translation(-center)
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        let x = self.data[0][0] * point.x + self.data[1][0] * point.y + self.data[2][0];
        let y = self.data[0][1] * point.x + self.data[1][1] * point.y + self.data[2][1];
        let w = self.data[0][2] * point.x + self.data[1][2] * point.y + self.data[2][2];

        if w != 0.0 && w != 1.0 {
            Vec2::new(x / w, y / w)
        } else {
            Vec2::new(x, y)
        }
    }

    pub fn transform_vector(&self, vector: Vec2) -> Vec2 {
        Vec2::new(
            self.data[0][0] * vector.x + self.data[1][0] * vector.y,
            self.data[0][1] * vector.x + self.data[1][1] * vector.y,
        )
    }
}

impl std::ops::Mul for Mat3 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut result = Self::zero();

        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    result.data[i][j] += self.data[k][j] * other.data[i][k];
                }
            }
        }

        result
    }
}

impl From<Mat3> for [[f32; 3]; 3] {
    fn from(mat: Mat3) -> Self {
        mat.data.map(|column| column.map(|v| v as f32))
    }
}
