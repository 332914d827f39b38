//! 编辑操作错误定义

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Line must not have length 0 (start == end at {x}, {y})")]
    DegenerateEdge { x: f64, y: f64 },

    #[error("Inconsistent edge {edge}: start and end both reference point {point}")]
    InconsistentEdge { edge: usize, point: usize },

    #[error("Edge index {index} out of range ({len} edges)")]
    EdgeOutOfRange { index: usize, len: usize },

    #[error("Edit not allowed: {0}")]
    PrecondEditNotAllowed(String),

    #[error("Port at ({x}, {y}) lies outside the part outline")]
    PortOutsideOutline { x: f64, y: f64 },

    #[error("Vertex not found: {0}")]
    VertexNotFound(u64),
}

pub type Result<T> = std::result::Result<T, EditError>;
