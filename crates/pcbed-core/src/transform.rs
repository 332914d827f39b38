//! 二维仿射变换
//!
//! 以齐次坐标 3x3 矩阵表示，组合顺序与矩阵乘法一致：
//! `a.then(b)` 先施加 `a` 再施加 `b`。

use crate::math::{Matrix3, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 2D仿射变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub matrix: Matrix3,
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix3) -> Self {
        Self { matrix }
    }

    /// 平移变换
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            matrix: Matrix3::new_translation(&Vector2::new(dx, dy)),
        }
    }

    /// 绕原点旋转（弧度，逆时针）
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            matrix: Matrix3::new(
                cos, -sin, 0.0, //
                sin, cos, 0.0, //
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 绕原点旋转（角度）
    pub fn rotation_degrees(degrees: f64) -> Self {
        Self::rotation(degrees.to_radians())
    }

    /// 先施加 `self`，再施加 `next`
    pub fn then(&self, next: &Transform2D) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    /// 逆变换，奇异矩阵返回 `None`
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(Self::from_matrix)
    }

    /// 变换一个点
    pub fn apply(&self, p: &Point2) -> Point2 {
        let m = &self.matrix;
        Point2::new(
            m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)],
            m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)],
        )
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
