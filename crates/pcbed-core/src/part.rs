//! 元件与端口
//!
//! 元件拥有一个轮廓和一组有序端口。轮廓闭合时，每个端口中心都必须位于轮廓内。
//! 所有可能破坏该约束的编辑都采用"先修改、再检查、不满足则恢复原坐标"的方式，
//! 被拒绝的编辑不会留下任何痕迹。

use crate::error::{EditError, Result};
use crate::geometry::Line;
use crate::math::{BoundingBox2, Point2, Vector2};
use crate::outline::Outline;
use crate::point_table::{Vertex, VertexId};
use crate::snap::SnapQuery;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// 端口ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub u64);

impl PortId {
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port{}", self.0)
    }
}

/// 连接端口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub center: Point2,
    pub label: String,
    /// 位宽
    pub bit_width: u32,
}

impl Port {
    pub fn new(center: Point2) -> Self {
        Self {
            id: PortId::new(),
            center,
            label: String::new(),
            bit_width: 1,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_bit_width(mut self, bit_width: u32) -> Self {
        self.bit_width = bit_width;
        self
    }
}

/// 元件（封装）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    outline: Outline,
    ports: Vec<Port>,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 以给定轮廓创建元件
    pub fn with_outline(name: impl Into<String>, outline: Outline) -> Self {
        Self {
            name: name.into(),
            outline,
            ports: Vec::new(),
        }
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == id)
    }

    pub fn visit_ports(&self, visitor: impl FnMut(&Port)) {
        self.ports.iter().for_each(visitor);
    }

    pub fn has_ports(&self) -> bool {
        !self.ports.is_empty()
    }

    /// 所有端口中心是否都在轮廓内
    pub fn all_ports_within_outline(&self) -> bool {
        self.ports.iter().all(|p| self.outline.contains(&p.center))
    }

    pub fn bounds(&self) -> Option<BoundingBox2> {
        self.outline.bounds()
    }

    /// 对本元件的捕捉查询
    pub fn snap(&self) -> SnapQuery<'_> {
        SnapQuery::for_part(self)
    }

    /// 添加端口
    ///
    /// 轮廓必须已闭合，且端口中心位于轮廓内。
    pub fn add_port(&mut self, port: Port) -> Result<PortId> {
        if !self.outline.is_closed() {
            return Err(EditError::PrecondEditNotAllowed(format!(
                "part '{}' needs a closed outline before ports can be added",
                self.name
            )));
        }
        if !self.outline.contains(&port.center) {
            return Err(EditError::PortOutsideOutline {
                x: port.center.x,
                y: port.center.y,
            });
        }
        let id = port.id;
        debug!("Part '{}': added {} '{}'", self.name, id, port.label);
        self.ports.push(port);
        Ok(id)
    }

    pub fn remove_port(&mut self, id: PortId) -> Option<Port> {
        let index = self.ports.iter().position(|p| p.id == id)?;
        Some(self.ports.remove(index))
    }

    /// 移动端口，新位置不在轮廓内时不做修改并返回 `false`
    pub fn move_port(&mut self, id: PortId, dx: f64, dy: f64) -> bool {
        let delta = Vector2::new(dx, dy);
        let Some(index) = self.ports.iter().position(|p| p.id == id) else {
            return false;
        };
        let target = self.ports[index].center + delta;
        if !self.outline.contains(&target) {
            debug!("Rejected move of {} to ({}, {})", id, target.x, target.y);
            return false;
        }
        self.ports[index].center = target;
        true
    }

    /// 拖动轮廓顶点
    ///
    /// 有端口且移动后有端口落在轮廓外时恢复原坐标并返回 `Ok(false)`。
    pub fn move_vertex(&mut self, id: VertexId, dx: f64, dy: f64) -> Result<bool> {
        let original = self
            .outline
            .vertex(id)
            .ok_or(EditError::VertexNotFound(id.raw()))?
            .position;
        self.outline.move_vertex(id, Vector2::new(dx, dy));
        if self.has_ports() && !self.all_ports_within_outline() {
            self.outline.set_vertex_position(id, original);
            warn!("Rolled back move of {}: a port would leave the outline", id);
            return Ok(false);
        }
        Ok(true)
    }

    /// 拖动轮廓边（两个端点一起移动），规则同 [`Part::move_vertex`]
    pub fn move_edge(&mut self, line: &Line, dx: f64, dy: f64) -> bool {
        let delta = Vector2::new(dx, dy);
        let Some((start, end)) = self.outline.move_edge(line, delta) else {
            return false;
        };
        if self.has_ports() && !self.all_ports_within_outline() {
            // 边按坐标精确匹配，原端点坐标即 line 的两端
            self.outline.set_vertex_position(start, line.start);
            self.outline.set_vertex_position(end, line.end);
            warn!("Rolled back edge move: a port would leave the outline");
            return false;
        }
        true
    }

    /// 直接修改轮廓，不检查端口
    ///
    /// 以下三个操作之后由调用方检查 [`Part::all_ports_within_outline`]。
    pub fn add_edge(&mut self, start: Vertex, end: Vertex) -> Result<bool> {
        self.outline.add_edge(start, end)
    }

    pub fn remove_edge(&mut self, line: &Line) -> Result<bool> {
        self.outline.remove_edge(line)
    }

    pub fn compact(&mut self) -> usize {
        self.outline.compact()
    }
}
