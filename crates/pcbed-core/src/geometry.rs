//! 几何图元与几何谓词
//!
//! - 线段 (Line)：与图结构脱离的线段几何副本
//! - 线段相交判定 (`intersects` / `intersection`)
//! - 点到线段距离（投影截断到线段上）

use crate::math::{BoundingBox2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 线段
///
/// 按值比较：两条线段当且仅当起点、终点坐标分别相等时相等。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 计算线段中点
    pub fn midpoint(&self) -> Point2 {
        Point2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// 反向线段
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// 平移后的副本
    pub fn translated(&self, delta: Vector2) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }

    /// 与另一线段是否相同（忽略方向）
    pub fn same_segment(&self, other: &Line) -> bool {
        self == other || *self == other.reversed()
    }

    /// 计算点到线段的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        let v = self.end - self.start;
        let w = point - self.start;

        let c1 = w.dot(&v);
        if c1 <= 0.0 {
            return (point - self.start).norm();
        }

        let c2 = v.dot(&v);
        if c2 <= c1 {
            return (point - self.end).norm();
        }

        let b = c1 / c2;
        let pb = self.start + v * b;
        (point - pb).norm()
    }

    /// 与另一线段是否相交（含端点接触）
    pub fn intersects(&self, other: &Line) -> bool {
        intersects(&self.start, &self.end, &other.start, &other.end)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::new(self.start, self.start);
        bbox.expand_to_include(&self.end);
        bbox
    }
}

/// 求解参数 `(s, t)`：`p0 + t*(p1-p0) == p2 + s*(p3-p2)`
///
/// 平行（含共线）时分母为零，结果为 NaN 或无穷大。
fn solve_parameters(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2) -> (f64, f64, Vector2) {
    let s1 = p1 - p0;
    let s2 = p3 - p2;

    let denom = -s2.x * s1.y + s1.x * s2.y;
    let s = (-s1.y * (p0.x - p2.x) + s1.x * (p0.y - p2.y)) / denom;
    let t = (s2.x * (p0.y - p2.y) - s2.y * (p0.x - p2.x)) / denom;
    (s, t, s1)
}

#[inline]
fn in_unit_interval(v: f64) -> bool {
    // NaN 与任何值比较均为 false
    (0.0..=1.0).contains(&v)
}

/// 线段 `p0-p1` 与线段 `p2-p3` 是否相交
///
/// 端点接触算作相交；平行线段（包括共线重叠）一律判为不相交。
pub fn intersects(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2) -> bool {
    let (s, t, _) = solve_parameters(p0, p1, p2, p3);
    in_unit_interval(s) && in_unit_interval(t)
}

/// 线段 `p0-p1` 与线段 `p2-p3` 的交点
///
/// 规则同 [`intersects`]。
pub fn intersection(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2) -> Option<Point2> {
    let (s, t, s1) = solve_parameters(p0, p1, p2, p3);
    if in_unit_interval(s) && in_unit_interval(t) {
        Some(*p0 + s1 * t)
    } else {
        None
    }
}
