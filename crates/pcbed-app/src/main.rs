//! PCBED 主程序入口
//!
//! 无界面的编辑会话：按脚本绘制元件轮廓、放置端口并放置实例，
//! 记录每一次被接受或被拒绝的编辑。
//!
//! 用法：`pcbed [config.json]`

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use pcbed_core::prelude::*;

/// 读取编辑器配置，缺失字段使用默认值
fn load_config(path: &Path) -> Result<EditorConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

/// 编辑会话
struct Session {
    config: EditorConfig,
    part: Part,
    state: ModeState,
}

impl Session {
    fn new(config: EditorConfig, name: &str) -> Self {
        Self {
            config,
            part: Part::new(name),
            state: ModeState::new(),
        }
    }

    /// 模拟一次拖拽画线：起点优先捕捉到已有顶点
    fn draw_line(&mut self, from: Point2, to: Point2) -> Result<()> {
        let from = self.config.align_to_grid(from);
        let to = self.config.constrain(&from, self.config.align_to_grid(to));

        let radius = self.config.snap.radius;
        let snap = self.part.snap();
        let start = snap
            .nearest_point(from.x, from.y, radius, None)
            .unwrap_or_else(|| Vertex::at(from));
        let end = snap
            .nearest_point(to.x, to.y, radius, Some(start.id))
            .unwrap_or_else(|| Vertex::at(to));

        let line = Line::new(start.position, end.position);
        if !self.config.accepts_line(&line) {
            warn!("Discarded short line ({:.1})", line.length());
            return Ok(());
        }

        match self.part.add_edge(start, end) {
            Ok(true) => info!(
                "Line ({}, {}) -> ({}, {})",
                line.start.x, line.start.y, line.end.x, line.end.y
            ),
            Ok(false) => info!("Line already present"),
            Err(e) => warn!("{}", e),
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: EditorMode) {
        if let Err(e) = self.state.set_mode(mode, &self.part) {
            warn!("{}", e);
        }
    }

    fn add_port(&mut self, at: Point2, label: &str, bit_width: u32) -> Option<PortId> {
        let center = self.config.align_to_grid(at);
        let port = Port::new(center)
            .with_label(label)
            .with_bit_width(bit_width);
        match self.part.add_port(port) {
            Ok(id) => {
                info!("Port '{}' at ({}, {})", label, center.x, center.y);
                Some(id)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// 模拟拖动光标附近的特征（顶点、边或端口），返回是否被接受
    fn drag(&mut self, near: Point2, dx: f64, dy: f64) -> Result<bool> {
        let radius = self.config.snap.radius;
        let Some(target) = self
            .part
            .snap()
            .find_target(near, &self.config.snap, None)
        else {
            info!("Nothing to drag near ({}, {})", near.x, near.y);
            return Ok(false);
        };
        self.state.set_highlight(Some(target.clone()));

        let accepted = match target {
            SnapTarget::Point(v) => self.part.move_vertex(v.id, dx, dy)?,
            SnapTarget::Edge(line) => self.part.move_edge(&line, dx, dy),
            SnapTarget::Port(id) => self.part.move_port(id, dx, dy),
        };
        info!(
            "Drag {} near ({}, {}) by ({}, {}) within {}px: {}",
            target.snap_type().name(),
            near.x,
            near.y,
            dx,
            dy,
            radius,
            if accepted { "accepted" } else { "rejected" }
        );
        Ok(accepted)
    }
}

fn main() -> Result<()> {
    let level = if std::env::var_os("PCBED_DEBUG").is_some() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting PCBED...");

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => EditorConfig::default(),
    };

    let mut session = Session::new(config, "DIP-8");

    session.set_mode(EditorMode::EditOutline);
    session.draw_line(Point2::new(0.0, 0.0), Point2::new(120.0, 3.0))?;
    session.draw_line(Point2::new(121.0, 1.0), Point2::new(124.0, 90.0))?;
    session.draw_line(Point2::new(120.0, 91.0), Point2::new(1.0, 92.0))?;
    // 轮廓未闭合，被拒绝
    session.set_mode(EditorMode::EditPorts);

    // 闭合边两端都是新点，合并后与已有顶点共享
    session
        .part
        .add_edge(Vertex::new(0.0, 90.0), Vertex::new(0.0, 0.0))
        .context("closing edge")?;
    let merged = session.part.compact();
    info!(
        "Compacted: {} merged, closed = {}",
        merged,
        session.part.outline().is_closed()
    );

    session.set_mode(EditorMode::EditPorts);
    session.add_port(Point2::new(20.0, 20.0), "VCC", 1);
    session.add_port(Point2::new(100.0, 20.0), "DATA", 8);
    session.add_port(Point2::new(200.0, 20.0), "GND", 1);

    session.set_mode(EditorMode::Move);
    session.drag(Point2::new(120.0, 90.0), -60.0, -75.0)?;
    session.drag(Point2::new(120.0, 90.0), 30.0, 0.0)?;

    info!(
        "Part '{}': {} edges, {} ports, all inside = {}",
        session.part.name,
        session.part.outline().edge_count(),
        session.part.ports().len(),
        session.part.all_ports_within_outline()
    );

    let part = Rc::new(RefCell::new(session.part));
    let instances = [
        PartInstance::placed(part.clone(), Vector2::new(500.0, 200.0), 0.0),
        PartInstance::placed(part.clone(), Vector2::new(800.0, 200.0), 90.0),
    ];
    for (i, instance) in instances.iter().enumerate() {
        if let Some(bounds) = instance.world_outline().bounds() {
            info!(
                "Instance {} at ({}, {}) rot {}: bounds ({:.1}, {:.1}) - ({:.1}, {:.1})",
                i,
                instance.position.x,
                instance.position.y,
                instance.rotation,
                bounds.min.x,
                bounds.min.y,
                bounds.max.x,
                bounds.max.y
            );
        }
    }

    info!("Session finished");
    Ok(())
}
