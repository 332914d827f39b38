//! 元件轮廓
//!
//! 在线图之上提供闭合判定、点包含判定、复制、变换和遍历。

use crate::error::Result;
use crate::geometry::{self, Line};
use crate::line_graph::{EdgeRef, LineGraph};
use crate::math::{BoundingBox2, Point2, Vector2};
use crate::point_table::{Vertex, VertexId};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// 元件轮廓
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outline {
    lines: LineGraph,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由顶点序列构造闭合多边形轮廓
    pub fn polygon(corners: &[Point2]) -> Result<Self> {
        let mut outline = Self::new();
        let vertices: Vec<Vertex> = corners.iter().map(|p| Vertex::at(*p)).collect();
        for (i, start) in vertices.iter().enumerate() {
            let end = vertices[(i + 1) % vertices.len()];
            outline.add_edge(*start, end)?;
        }
        Ok(outline)
    }

    /// 独立的深拷贝
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn graph(&self) -> &LineGraph {
        &self.lines
    }

    pub fn point_count(&self) -> usize {
        self.lines.point_count()
    }

    pub fn edge_count(&self) -> usize {
        self.lines.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 添加一条边，见 [`LineGraph::add`]
    pub fn add_edge(&mut self, start: Vertex, end: Vertex) -> Result<bool> {
        self.lines.add(start, end)
    }

    /// 添加线段（两端都是新点）
    pub fn add_line(&mut self, line: &Line) -> Result<bool> {
        self.lines.add(Vertex::at(line.start), Vertex::at(line.end))
    }

    /// 删除与给定线段坐标相等的边
    pub fn remove_edge(&mut self, line: &Line) -> Result<bool> {
        self.lines.remove(line)
    }

    /// 合并坐标重合的点
    pub fn compact(&mut self) -> usize {
        self.lines.compact()
    }

    /// 是否为单一闭合环
    pub fn is_closed(&self) -> bool {
        self.lines.is_single_cycle()
    }

    /// 点是否在轮廓内（射线法）
    ///
    /// 从查询点向右发出水平射线，统计与轮廓边的交点数，奇数为内部。
    /// 采用半开规则：只有一个端点严格位于射线上方的边参与计数，
    /// 因此水平边不计数，射线穿过的共享顶点只计一次。
    /// 恰好落在边上的点不保证归属。
    pub fn contains(&self, p: &Point2) -> bool {
        let Some(bounds) = self.bounds() else {
            return false;
        };
        let ray_end = Point2::new(bounds.max.x.max(p.x) + 1.0, p.y);

        let crossings = self
            .lines
            .iter()
            .filter(|e| {
                let (a, b) = (e.start.position, e.end.position);
                (a.y > p.y) != (b.y > p.y) && geometry::intersects(p, &ray_end, &a, &b)
            })
            .count();
        crossings % 2 == 1
    }

    /// 对所有点施加仿射变换
    pub fn transform(&mut self, transform: &Transform2D) {
        self.lines.transform(transform);
    }

    /// 惰性遍历所有边
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.lines.iter()
    }

    /// 遍历所有边的几何副本
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.lines.iter().map(|e| e.line())
    }

    /// 访问每条边，回调返回 `ControlFlow::Break` 时提前结束
    pub fn visit<B>(&self, mut visitor: impl FnMut(&EdgeRef) -> ControlFlow<B>) -> Option<B> {
        for edge in self.lines.iter() {
            if let ControlFlow::Break(value) = visitor(&edge) {
                return Some(value);
            }
        }
        None
    }

    /// 包围盒，空轮廓返回 `None`
    pub fn bounds(&self) -> Option<BoundingBox2> {
        BoundingBox2::from_points(self.lines.positions())
    }

    pub fn vertex(&self, id: VertexId) -> Option<Vertex> {
        self.lines.find_vertex(id)
    }

    /// 按身份移动点，共享该点的所有边随之改变
    pub fn move_vertex(&mut self, id: VertexId, delta: Vector2) -> bool {
        self.lines.move_vertex(id, delta)
    }

    /// 把点（按身份）放到指定坐标
    pub fn set_vertex_position(&mut self, id: VertexId, position: Point2) -> bool {
        self.lines.set_position(id, position)
    }

    /// 移动与给定线段坐标相等的边（两个端点一起平移）
    ///
    /// 返回被移动的两个端点身份，未找到时返回 `None`。
    pub fn move_edge(&mut self, line: &Line, delta: Vector2) -> Option<(VertexId, VertexId)> {
        let index = self.lines.find_edge(line)?;
        let edge = self.lines.edges()[index];
        self.lines.translate_point(edge.start, delta);
        self.lines.translate_point(edge.end, delta);
        let start = self.lines.vertex(edge.start)?.id;
        let end = self.lines.vertex(edge.end)?.id;
        Some((start, end))
    }
}
