//! 点表
//!
//! 以稠密下标存储二维点：合法下标始终为 `[0, len)`，删除会让后续点整体前移一位。
//! 每个点还带有一个进程内唯一的 [`VertexId`]，作为点的"身份"。
//! 插入线段时按身份（而非坐标）复用已有点；按坐标合并由
//! [`LineGraph::compact`](crate::line_graph::LineGraph::compact) 单独完成。

use crate::math::{Point2, Vector2};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// 点身份ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u64);

impl VertexId {
    /// 分配一个新的唯一ID
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for VertexId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// 点句柄：身份 + 坐标
///
/// 两个独立创建的点即使坐标相同也拥有不同的身份。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Point2,
}

impl Vertex {
    /// 创建带新身份的点
    pub fn new(x: f64, y: f64) -> Self {
        Self::at(Point2::new(x, y))
    }

    pub fn at(position: Point2) -> Self {
        Self {
            id: VertexId::new(),
            position,
        }
    }

    /// 是否为同一个点（按身份）
    pub fn is(&self, other: &Vertex) -> bool {
        self.id == other.id
    }
}

/// 初始容量
const INITIAL_CAPACITY: usize = 100;

/// 点表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTable {
    points: Vec<Vertex>,
}

impl PointTable {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// 点数量
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 追加一个点，返回其下标
    pub fn add(&mut self, vertex: Vertex) -> usize {
        grow_geometric(&mut self.points);
        self.points.push(vertex);
        self.points.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Vertex> {
        self.points.get(index)
    }

    /// 按身份查找下标
    pub fn index_of(&self, id: VertexId) -> Option<usize> {
        self.points.iter().position(|v| v.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.points.iter()
    }

    /// 平移指定下标的点
    pub(crate) fn translate(&mut self, index: usize, delta: Vector2) {
        self.points[index].position += delta;
    }

    pub(crate) fn set_position(&mut self, index: usize, position: Point2) {
        self.points[index].position = position;
    }

    /// 删除指定下标的点，后续点下标减一
    ///
    /// 引用下标的修正由线图负责。
    pub(crate) fn remove(&mut self, index: usize) -> Vertex {
        self.points.remove(index)
    }

    pub(crate) fn position(&self, index: usize) -> Point2 {
        self.points[index].position
    }

    pub(crate) fn vertex(&self, index: usize) -> Vertex {
        self.points[index]
    }

    /// 对所有点施加仿射变换
    pub fn transform(&mut self, transform: &Transform2D) {
        for v in &mut self.points {
            v.position = transform.apply(&v.position);
        }
    }
}

impl Default for PointTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 按约 1.5 倍扩容
pub(crate) fn grow_geometric<T>(vec: &mut Vec<T>) {
    if vec.len() == vec.capacity() {
        let additional = vec.capacity() / 2 + 1;
        vec.reserve_exact(additional);
    }
}
