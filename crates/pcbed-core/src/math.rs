//! 基础数学类型
//!
//! 坐标统一使用 `f64`，以 nalgebra 的点/向量类型表示。

use serde::{Deserialize, Serialize};

/// 二维点（世界/画布坐标）
pub type Point2 = nalgebra::Point2<f64>;
/// 二维向量
pub type Vector2 = nalgebra::Vector2<f64>;
/// 齐次坐标下的 3x3 仿射矩阵
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// 浮点比较容差（仅用于测试和近似判定，拓扑判定使用精确比较）
pub const EPSILON: f64 = 1e-10;

/// 二维轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 从点集构造，空点集返回 `None`
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first, first);
        for p in iter {
            bbox.expand_to_include(&p);
        }
        Some(bbox)
    }

    pub fn expand_to_include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// 闭区间包含判定
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_points() {
        let bbox = BoundingBox2::from_points([
            Point2::new(3.0, -1.0),
            Point2::new(-2.0, 4.0),
            Point2::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, Point2::new(-2.0, -1.0));
        assert_eq!(bbox.max, Point2::new(3.0, 4.0));
        assert!((bbox.width() - 5.0).abs() < EPSILON);
        assert!(bbox.contains(&Point2::new(0.0, 4.0)));
        assert!(!bbox.contains(&Point2::new(0.0, 4.5)));
    }

    #[test]
    fn test_bbox_empty() {
        assert!(BoundingBox2::from_points(std::iter::empty()).is_none());
    }
}
