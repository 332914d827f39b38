//! 线图
//!
//! 线段以点表下标对 `(start, end)` 存储。结构不变式：
//! - 点下标稠密，合法范围为 `[0, point_count)`
//! - 每条边的两个下标都在范围内且互不相同
//! - 不存在两条连接同一对点的边（不区分方向）
//!
//! 删除点时，所有引用更大下标的边都会被修正（下标减一）。
//! 这是整个结构的关键操作，出错会悄无声息地破坏其他边。

use crate::error::{EditError, Result};
use crate::geometry::Line;
use crate::math::{Point2, Vector2};
use crate::point_table::{grow_geometric, PointTable, Vertex, VertexId};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const INITIAL_EDGE_CAPACITY: usize = 10;

/// 边：两个点下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub start: usize,
    pub end: usize,
}

impl Edge {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 是否引用指定点
    pub fn touches(&self, point: usize) -> bool {
        self.start == point || self.end == point
    }

    /// 是否连接同一对点（不区分方向）
    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }
}

/// 遍历时产出的边视图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef {
    /// 边下标
    pub index: usize,
    pub start: Vertex,
    pub end: Vertex,
}

impl EdgeRef {
    /// 脱离图结构的几何副本
    pub fn line(&self) -> Line {
        Line::new(self.start.position, self.end.position)
    }
}

/// 线图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineGraph {
    points: PointTable,
    edges: Vec<Edge>,
}

impl LineGraph {
    pub fn new() -> Self {
        Self {
            points: PointTable::new(),
            edges: Vec::with_capacity(INITIAL_EDGE_CAPACITY),
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn points(&self) -> &PointTable {
        &self.points
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        self.points.get(index).copied()
    }

    /// 按身份查找点
    pub fn find_vertex(&self, id: VertexId) -> Option<Vertex> {
        self.points.index_of(id).map(|i| self.points.vertex(i))
    }

    pub fn edge(&self, index: usize) -> Option<EdgeRef> {
        self.edges.get(index).map(|e| self.edge_ref(index, e))
    }

    fn edge_ref(&self, index: usize, edge: &Edge) -> EdgeRef {
        EdgeRef {
            index,
            start: self.points.vertex(edge.start),
            end: self.points.vertex(edge.end),
        }
    }

    /// 惰性遍历所有边
    ///
    /// 每次调用都从头开始；提前结束用普通的迭代器适配器即可。
    pub fn iter(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| self.edge_ref(i, e))
    }

    /// 添加一条边
    ///
    /// 端点按身份复用已有点，身份不同的点即使坐标相同也会新建。
    /// 返回 `Ok(false)` 表示同一对点之间已存在边，未做任何修改。
    pub fn add(&mut self, start: Vertex, end: Vertex) -> Result<bool> {
        let start_idx = self.points.index_of(start.id);
        let end_idx = self.points.index_of(end.id);

        // 已有点以点表中的坐标为准，句柄可能已过期
        let start_pos = start_idx.map_or(start.position, |i| self.points.position(i));
        let end_pos = end_idx.map_or(end.position, |i| self.points.position(i));
        if start_pos == end_pos || start.id == end.id {
            debug!(x = start_pos.x, y = start_pos.y, "rejected zero-length edge");
            return Err(EditError::DegenerateEdge {
                x: start_pos.x,
                y: start_pos.y,
            });
        }

        if let (Some(s), Some(e)) = (start_idx, end_idx) {
            if self.edges.iter().any(|edge| edge.connects(s, e)) {
                trace!(start = s, end = e, "edge already present");
                return Ok(false);
            }
        }

        let start_idx = start_idx.unwrap_or_else(|| self.points.add(start));
        let end_idx = end_idx.unwrap_or_else(|| self.points.add(end));

        grow_geometric(&mut self.edges);
        self.edges.push(Edge::new(start_idx, end_idx));

        debug!(
            start = start_idx,
            end = end_idx,
            edges = self.edges.len(),
            points = self.points.len(),
            "added edge"
        );
        debug_assert!(self.is_consistent());
        Ok(true)
    }

    /// 按坐标查找边下标（有方向，取第一条）
    pub fn find_edge(&self, line: &Line) -> Option<usize> {
        self.edges.iter().position(|e| {
            self.points.position(e.start) == line.start && self.points.position(e.end) == line.end
        })
    }

    /// 删除与给定线段坐标相等的第一条边
    ///
    /// 返回 `Ok(false)` 表示未找到。
    pub fn remove(&mut self, line: &Line) -> Result<bool> {
        match self.find_edge(line) {
            Some(index) => self.remove_at(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// 删除指定下标的边，并删除因此不再被引用的端点
    pub fn remove_at(&mut self, index: usize) -> Result<Edge> {
        let Some(&edge) = self.edges.get(index) else {
            return Err(EditError::EdgeOutOfRange {
                index,
                len: self.edges.len(),
            });
        };
        if edge.start == edge.end {
            return Err(EditError::InconsistentEdge {
                edge: index,
                point: edge.start,
            });
        }

        debug!(index, start = edge.start, end = edge.end, "removing edge");
        self.edges.remove(index);

        let start_referenced = self.is_referenced(edge.start);
        let end_referenced = self.is_referenced(edge.end);

        match (start_referenced, end_referenced) {
            (true, true) => {}
            (true, false) => self.delete_point(edge.end),
            (false, true) => self.delete_point(edge.start),
            (false, false) => {
                // 先删小下标，大下标因此前移一位
                let (low, high) = if edge.start < edge.end {
                    (edge.start, edge.end)
                } else {
                    (edge.end, edge.start)
                };
                self.delete_point(low);
                self.delete_point(high - 1);
            }
        }

        debug_assert!(self.is_consistent());
        Ok(edge)
    }

    fn is_referenced(&self, point: usize) -> bool {
        self.edges.iter().any(|e| e.touches(point))
    }

    /// 删除点并修正所有引用更大下标的边
    fn delete_point(&mut self, index: usize) {
        let removed = self.points.remove(index);
        for edge in &mut self.edges {
            if edge.start > index {
                edge.start -= 1;
            }
            if edge.end > index {
                edge.end -= 1;
            }
        }
        trace!(index, id = %removed.id, "deleted point");
    }

    /// 合并坐标完全相同的点
    ///
    /// 对每对相等的点 `(i, j)`（`i < j`），把引用 `j` 的边改为引用 `i`，再删除 `j`。
    /// 合并后退化为零长度的边以及重复的边会被删除，失去引用的点随之删除。
    /// 返回合并掉的点数。再次调用是空操作。
    pub fn compact(&mut self) -> usize {
        let mut merged = 0;

        let mut i = 0;
        while i < self.points.len() {
            let mut j = i + 1;
            while j < self.points.len() {
                if self.points.position(i) == self.points.position(j) {
                    for edge in &mut self.edges {
                        if edge.start == j {
                            edge.start = i;
                        }
                        if edge.end == j {
                            edge.end = i;
                        }
                    }
                    trace!(keep = i, merged = j, "points are equal");
                    self.delete_point(j);
                    merged += 1;
                    // j 处现在是原来的下一个点，不前进
                } else {
                    j += 1;
                }
            }
            i += 1;
        }

        let dropped = self.drop_collapsed_edges() + self.drop_duplicate_edges();

        if merged > 0 || dropped > 0 {
            debug!(
                merged,
                dropped,
                edges = self.edges.len(),
                points = self.points.len(),
                "compacted line graph"
            );
        }
        debug_assert!(self.is_consistent());
        merged
    }

    /// 删除两端合并成同一点的边
    fn drop_collapsed_edges(&mut self) -> usize {
        let mut dropped = 0;
        while let Some(index) = self.edges.iter().position(|e| e.start == e.end) {
            let point = self.edges[index].start;
            self.edges.remove(index);
            if !self.is_referenced(point) {
                self.delete_point(point);
            }
            dropped += 1;
        }
        dropped
    }

    /// 删除连接同一对点的重复边，保留第一条
    fn drop_duplicate_edges(&mut self) -> usize {
        let before = self.edges.len();
        let mut kept: Vec<Edge> = Vec::with_capacity(before);
        for edge in &self.edges {
            if !kept.iter().any(|k| k.connects(edge.start, edge.end)) {
                kept.push(*edge);
            }
        }
        self.edges = kept;
        before - self.edges.len()
    }

    /// 平移点（按下标）
    pub fn translate_point(&mut self, index: usize, delta: Vector2) {
        self.points.translate(index, delta);
    }

    /// 平移点（按身份），点不存在时返回 `false`
    pub fn move_vertex(&mut self, id: VertexId, delta: Vector2) -> bool {
        match self.points.index_of(id) {
            Some(index) => {
                self.points.translate(index, delta);
                true
            }
            None => false,
        }
    }

    /// 把点（按身份）放到指定坐标，点不存在时返回 `false`
    pub fn set_position(&mut self, id: VertexId, position: Point2) -> bool {
        match self.points.index_of(id) {
            Some(index) => {
                self.points.set_position(index, position);
                true
            }
            None => false,
        }
    }

    /// 对所有点施加仿射变换
    pub fn transform(&mut self, transform: &Transform2D) {
        self.points.transform(transform);
    }

    /// 所有点坐标
    pub fn positions(&self) -> impl Iterator<Item = Point2> + '_ {
        self.points.iter().map(|v| v.position)
    }

    /// 是否构成单一闭合环
    ///
    /// 边不区分方向：要求边数 >= 3、点数等于边数、每个点恰好连接两条边，
    /// 且从第 0 条边出发能走遍所有边后回到起点。
    pub fn is_single_cycle(&self) -> bool {
        let n = self.edges.len();
        if n < 3 || self.points.len() != n {
            return false;
        }

        // 每个点关联的两条边
        let mut incident: Vec<[usize; 2]> = vec![[usize::MAX; 2]; n];
        let mut degree = vec![0usize; n];
        for (i, edge) in self.edges.iter().enumerate() {
            for p in [edge.start, edge.end] {
                if degree[p] >= 2 {
                    return false;
                }
                incident[p][degree[p]] = i;
                degree[p] += 1;
            }
        }
        if degree.iter().any(|&d| d != 2) {
            return false;
        }

        let origin = self.edges[0].start;
        let mut current = self.edges[0].end;
        let mut previous_edge = 0;
        let mut visited = 1;

        while current != origin {
            let [a, b] = incident[current];
            let next_edge = if a == previous_edge { b } else { a };
            let edge = self.edges[next_edge];
            current = if edge.start == current { edge.end } else { edge.start };
            previous_edge = next_edge;
            visited += 1;
            if visited > n {
                return false;
            }
        }

        visited == n
    }

    /// 检查结构不变式：下标在范围内、两端不同、无重复边
    pub fn is_consistent(&self) -> bool {
        let n = self.points.len();
        let edges_ok = self.edges.iter().enumerate().all(|(i, e)| {
            e.start < n
                && e.end < n
                && e.start != e.end
                && !self.edges[..i].iter().any(|o| o.connects(e.start, e.end))
        });
        // 每个点都至少被一条边引用
        let points_ok = (0..n).all(|p| self.is_referenced(p));
        edges_ok && points_ok
    }
}

impl Default for LineGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(graph: &mut LineGraph) -> [Vertex; 4] {
        let a = Vertex::new(0.0, 0.0);
        let b = Vertex::new(10.0, 0.0);
        let c = Vertex::new(10.0, 10.0);
        let d = Vertex::new(0.0, 10.0);
        graph.add(a, b).unwrap();
        graph.add(b, c).unwrap();
        graph.add(c, d).unwrap();
        graph.add(d, a).unwrap();
        [a, b, c, d]
    }

    #[test]
    fn test_add_reuses_points_by_identity() {
        let mut graph = LineGraph::new();
        let [a, ..] = square(&mut graph);
        assert_eq!(graph.point_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.points().index_of(a.id), Some(0));
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_equal_coordinates_stay_distinct_until_compact() {
        let mut graph = LineGraph::new();
        graph.add(Vertex::new(0.0, 0.0), Vertex::new(5.0, 0.0)).unwrap();
        graph.add(Vertex::new(5.0, 0.0), Vertex::new(5.0, 5.0)).unwrap();
        assert_eq!(graph.point_count(), 4);

        assert_eq!(graph.compact(), 1);
        assert_eq!(graph.point_count(), 3);
        assert_eq!(graph.edges()[0].end, graph.edges()[1].start);
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_degenerate_edge_rejected() {
        let mut graph = LineGraph::new();
        let err = graph.add(Vertex::new(1.0, 1.0), Vertex::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, EditError::DegenerateEdge { .. }));
        assert_eq!(graph.point_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_edge_suppressed_both_directions() {
        let mut graph = LineGraph::new();
        let a = Vertex::new(0.0, 0.0);
        let b = Vertex::new(3.0, 0.0);
        assert!(graph.add(a, b).unwrap());
        assert!(!graph.add(a, b).unwrap());
        assert!(!graph.add(b, a).unwrap());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_remove_unshared_edge_restores_counts() {
        let mut graph = LineGraph::new();
        square(&mut graph);
        let (points, edges) = (graph.point_count(), graph.edge_count());

        let p = Vertex::new(50.0, 50.0);
        let q = Vertex::new(60.0, 50.0);
        graph.add(p, q).unwrap();
        assert!(graph.remove(&Line::new(p.position, q.position)).unwrap());

        assert_eq!(graph.point_count(), points);
        assert_eq!(graph.edge_count(), edges);
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_remove_reindexes_remaining_edges() {
        let mut graph = LineGraph::new();
        let [a, b, c, d] = square(&mut graph);

        // 删除 a-b：两端仍被引用，不删点
        assert!(graph.remove(&Line::new(a.position, b.position)).unwrap());
        assert_eq!(graph.point_count(), 4);

        // 删除 b-c：b 失去引用
        assert!(graph.remove(&Line::new(b.position, c.position)).unwrap());
        assert_eq!(graph.point_count(), 3);
        assert!(graph.find_vertex(b.id).is_none());

        let lines: Vec<Line> = graph.iter().map(|e| e.line()).collect();
        assert_eq!(
            lines,
            vec![
                Line::new(c.position, d.position),
                Line::new(d.position, a.position)
            ]
        );
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_remove_deletes_both_endpoints_in_order() {
        let mut graph = LineGraph::new();
        let a = Vertex::new(0.0, 0.0);
        let b = Vertex::new(1.0, 0.0);
        let c = Vertex::new(2.0, 0.0);
        let x = Vertex::new(2.0, 5.0);
        let d = Vertex::new(3.0, 0.0);
        graph.add(a, b).unwrap();
        graph.add(c, x).unwrap();
        graph.add(d, c).unwrap();

        // x 失去引用被删除，d 的下标随之前移
        assert!(graph.remove(&Line::new(c.position, x.position)).unwrap());
        assert_eq!(graph.edges()[1], Edge::new(3, 2));

        // 起点下标大于终点下标，两端都失去引用
        assert!(graph.remove(&Line::new(d.position, c.position)).unwrap());
        assert_eq!(graph.point_count(), 2);
        assert!(graph.find_vertex(c.id).is_none());
        assert!(graph.find_vertex(d.id).is_none());
        assert_eq!(
            graph.edge(0).map(|e| e.line()),
            Some(Line::new(a.position, b.position))
        );
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_remove_missing_edge_is_noop() {
        let mut graph = LineGraph::new();
        square(&mut graph);
        let missing = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        assert!(!graph.remove(&missing).unwrap());
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_compact_is_idempotent() {
        let mut graph = LineGraph::new();
        graph.add(Vertex::new(0.0, 0.0), Vertex::new(10.0, 0.0)).unwrap();
        graph.add(Vertex::new(10.0, 0.0), Vertex::new(10.0, 10.0)).unwrap();
        graph.add(Vertex::new(10.0, 10.0), Vertex::new(0.0, 0.0)).unwrap();

        graph.compact();
        let once = (graph.edges().to_vec(), graph.positions().collect::<Vec<_>>());
        assert_eq!(graph.compact(), 0);
        let twice = (graph.edges().to_vec(), graph.positions().collect::<Vec<_>>());
        assert_eq!(once, twice);
        assert_eq!(graph.point_count(), 3);
    }

    #[test]
    fn test_compact_merges_three_coincident_points() {
        let mut graph = LineGraph::new();
        graph.add(Vertex::new(0.0, 0.0), Vertex::new(5.0, 5.0)).unwrap();
        graph.add(Vertex::new(5.0, 5.0), Vertex::new(10.0, 0.0)).unwrap();
        graph.add(Vertex::new(5.0, 5.0), Vertex::new(5.0, 10.0)).unwrap();

        assert_eq!(graph.compact(), 2);
        assert_eq!(graph.point_count(), 4);
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_compact_drops_collapsed_edge() {
        let mut graph = LineGraph::new();
        let a = Vertex::new(0.0, 0.0);
        let b = Vertex::new(10.0, 0.0);
        let c = Vertex::new(10.0, 10.0);
        graph.add(a, b).unwrap();
        graph.add(b, c).unwrap();

        // 把 c 拖到 b 上
        graph.move_vertex(c.id, Vector2::new(0.0, -10.0));
        graph.compact();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.point_count(), 2);
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_single_cycle() {
        let mut graph = LineGraph::new();
        let [a, b, c, d] = square(&mut graph);
        assert!(graph.is_single_cycle());

        // 两个互不相连的三角形：点数等于边数，但不是单一环
        let mut two = LineGraph::new();
        for offset in [0.0, 100.0] {
            let p = Vertex::new(offset, 0.0);
            let q = Vertex::new(offset + 5.0, 0.0);
            let r = Vertex::new(offset, 5.0);
            two.add(p, q).unwrap();
            two.add(q, r).unwrap();
            two.add(r, p).unwrap();
        }
        assert_eq!(two.point_count(), two.edge_count());
        assert!(!two.is_single_cycle());

        // 反向绘制的边同样闭合
        let mut reversed = LineGraph::new();
        reversed.add(a, b).unwrap();
        reversed.add(c, b).unwrap();
        reversed.add(c, d).unwrap();
        reversed.add(a, d).unwrap();
        assert!(reversed.is_single_cycle());
    }

    #[test]
    fn test_iter_is_restartable_with_early_exit() {
        let mut graph = LineGraph::new();
        square(&mut graph);
        let first_vertical = graph.iter().find(|e| e.line().start.x == e.line().end.x);
        assert_eq!(first_vertical.map(|e| e.index), Some(1));
        assert_eq!(graph.iter().count(), 4);
    }

    #[test]
    fn test_inconsistent_edge_detected() {
        let mut graph = LineGraph::new();
        square(&mut graph);
        graph.edges[2].end = graph.edges[2].start;
        let err = graph.remove_at(2).unwrap_err();
        assert!(matches!(err, EditError::InconsistentEdge { edge: 2, .. }));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut empty = LineGraph::new();
        assert_eq!(
            empty.remove_at(0),
            Err(EditError::EdgeOutOfRange { index: 0, len: 0 })
        );

        let mut graph = LineGraph::new();
        square(&mut graph);
        assert!(graph.remove_at(4).is_err());
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.point_count(), 4);
    }

    #[test]
    fn test_stale_handle_cannot_create_zero_length_edge() {
        let mut graph = LineGraph::new();
        let a = Vertex::new(0.0, 0.0);
        let b = Vertex::new(10.0, 0.0);
        let c = Vertex::new(10.0, 10.0);
        graph.add(a, b).unwrap();
        graph.add(b, c).unwrap();

        // a 被移到 c 的位置，手里的句柄仍是旧坐标
        assert!(graph.move_vertex(a.id, Vector2::new(10.0, 10.0)));
        let result = graph.add(a, c);
        assert!(matches!(result, Err(EditError::DegenerateEdge { .. })));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.iter().all(|e| e.line().length() > 0.0));
    }

    #[test]
    fn test_set_position() {
        let mut graph = LineGraph::new();
        let [a, ..] = square(&mut graph);
        assert!(graph.set_position(a.id, Point2::new(-1.0, -1.0)));
        assert_eq!(graph.find_vertex(a.id).map(|v| v.position), Some(Point2::new(-1.0, -1.0)));
        assert!(!graph.set_position(VertexId::new(), Point2::origin()));
    }
}
