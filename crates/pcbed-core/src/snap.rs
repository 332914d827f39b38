//! 捕捉查询
//!
//! 在给定像素半径内查找离光标最近的特征：
//! - 轮廓顶点 (Point)
//! - 轮廓边 (Edge)
//! - 端口 (Port)
//!
//! 全部为线性扫描，不建立空间索引。所有查询在没有命中时返回 `None`，
//! 距离比较一律为严格小于，距离相同时保留先遇到的候选。

use crate::geometry::Line;
use crate::math::Point2;
use crate::outline::Outline;
use crate::part::{Part, Port, PortId};
use crate::point_table::{Vertex, VertexId};
use serde::{Deserialize, Serialize};

/// 捕捉类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapType {
    /// 轮廓顶点
    Point,
    /// 轮廓边
    Edge,
    /// 端口中心
    Port,
}

impl SnapType {
    /// 获取捕捉类型的名称
    pub fn name(&self) -> &'static str {
        match self {
            SnapType::Point => "顶点",
            SnapType::Edge => "边",
            SnapType::Port => "端口",
        }
    }
}

/// 捕捉配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// 捕捉半径（屏幕像素）
    pub radius: f64,
    /// 是否捕捉边
    pub include_edges: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            radius: 5.0, // 5像素
            include_edges: true,
        }
    }
}

/// 捕捉结果
#[derive(Debug, Clone, PartialEq)]
pub enum SnapTarget {
    Point(Vertex),
    Edge(Line),
    Port(PortId),
}

impl SnapTarget {
    pub fn snap_type(&self) -> SnapType {
        match self {
            SnapTarget::Point(_) => SnapType::Point,
            SnapTarget::Edge(_) => SnapType::Edge,
            SnapTarget::Port(_) => SnapType::Port,
        }
    }

    /// 是否指向同一特征（用于判断高亮是否需要刷新）
    ///
    /// 顶点按坐标比较，边按坐标比较且不区分方向，端口按ID比较。
    pub fn is_same(&self, other: &SnapTarget) -> bool {
        match (self, other) {
            (SnapTarget::Point(a), SnapTarget::Point(b)) => a.position == b.position,
            (SnapTarget::Edge(a), SnapTarget::Edge(b)) => a.same_segment(b),
            (SnapTarget::Port(a), SnapTarget::Port(b)) => a == b,
            _ => false,
        }
    }
}

/// 捕捉查询
///
/// 借用轮廓和端口列表，查询期间二者不可修改。
#[derive(Debug, Clone, Copy)]
pub struct SnapQuery<'a> {
    outline: &'a Outline,
    ports: &'a [Port],
}

impl<'a> SnapQuery<'a> {
    pub fn new(outline: &'a Outline, ports: &'a [Port]) -> Self {
        Self { outline, ports }
    }

    pub fn for_part(part: &'a Part) -> Self {
        Self::new(part.outline(), part.ports())
    }

    /// 最近的轮廓顶点
    ///
    /// 遍历每条边的两个端点；`ignored` 指定的点（按身份）不参与比较。
    pub fn nearest_point(
        &self,
        x: f64,
        y: f64,
        radius: f64,
        ignored: Option<VertexId>,
    ) -> Option<Vertex> {
        let query = Point2::new(x, y);
        let mut best: Option<(Vertex, f64)> = None;

        for edge in self.outline.edges() {
            for candidate in [edge.start, edge.end] {
                if ignored == Some(candidate.id) {
                    continue;
                }
                let dist = (candidate.position - query).norm();
                if dist < radius && best.map_or(true, |(_, d)| dist < d) {
                    best = Some((candidate, dist));
                }
            }
        }

        best.map(|(v, _)| v)
    }

    /// 最近的轮廓边，返回脱离图结构的几何副本
    pub fn nearest_edge(&self, x: f64, y: f64, radius: f64) -> Option<Line> {
        let query = Point2::new(x, y);
        let mut best: Option<(Line, f64)> = None;

        for edge in self.outline.edges() {
            let line = edge.line();
            let dist = line.distance_to_point(&query);
            if dist < radius && best.map_or(true, |(_, d)| dist < d) {
                best = Some((line, dist));
            }
        }

        best.map(|(line, _)| line)
    }

    /// 最近的端口（欧氏距离）
    pub fn nearest_port(&self, x: f64, y: f64, radius: f64) -> Option<PortId> {
        let query = Point2::new(x, y);
        let mut best: Option<(PortId, f64)> = None;

        for port in self.ports {
            let dist = (port.center - query).norm();
            if dist < radius && best.map_or(true, |(_, d)| dist < d) {
                best = Some((port.id, dist));
            }
        }

        best.map(|(id, _)| id)
    }

    /// 按优先级查找捕捉目标：顶点 > 边（如启用）> 端口
    pub fn find_target(
        &self,
        position: Point2,
        config: &SnapConfig,
        ignored: Option<VertexId>,
    ) -> Option<SnapTarget> {
        if let Some(v) = self.nearest_point(position.x, position.y, config.radius, ignored) {
            return Some(SnapTarget::Point(v));
        }
        if config.include_edges {
            if let Some(line) = self.nearest_edge(position.x, position.y, config.radius) {
                return Some(SnapTarget::Edge(line));
            }
        }
        self.nearest_port(position.x, position.y, config.radius)
            .map(SnapTarget::Port)
    }
}
