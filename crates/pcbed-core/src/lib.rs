//! PCBED 元件封装编辑核心
//!
//! 平面线图几何引擎：由线段组成的元件轮廓，支持增删、重合点合并、
//! 闭合判定、点包含判定、仿射变换和捕捉查询。
//!
//! # 架构设计
//!
//! - `PointTable`: 稠密下标的点表，点带有唯一身份
//! - `LineGraph`: 以点下标对表示的边，删除点时修正所有引用
//! - `Outline`: 轮廓门面，提供闭合/包含判定与遍历
//! - `SnapQuery`: 半径内的最近顶点/边/端口查询
//! - `Part` / `Port` / `PartInstance`: 元件、端口与放置
//!
//! # 示例
//!
//! ```rust
//! use pcbed_core::prelude::*;
//!
//! let outline = Outline::polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(40.0, 0.0),
//!     Point2::new(40.0, 20.0),
//!     Point2::new(0.0, 20.0),
//! ])
//! .unwrap();
//! assert!(outline.is_closed());
//!
//! let mut part = Part::with_outline("U1", outline);
//! part.add_port(Port::new(Point2::new(10.0, 10.0)).with_label("VCC")).unwrap();
//! assert!(part.all_ports_within_outline());
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod instance;
pub mod line_graph;
pub mod math;
pub mod mode;
pub mod outline;
pub mod part;
pub mod point_table;
pub mod snap;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::config::EditorConfig;
    pub use crate::error::{EditError, Result};
    pub use crate::geometry::{intersection, intersects, Line};
    pub use crate::instance::PartInstance;
    pub use crate::line_graph::{Edge, EdgeRef, LineGraph};
    pub use crate::math::{BoundingBox2, Point2, Vector2, EPSILON};
    pub use crate::mode::{EditorMode, ModeState};
    pub use crate::outline::Outline;
    pub use crate::part::{Part, Port, PortId};
    pub use crate::point_table::{PointTable, Vertex, VertexId};
    pub use crate::snap::{SnapConfig, SnapQuery, SnapTarget, SnapType};
    pub use crate::transform::Transform2D;
}
