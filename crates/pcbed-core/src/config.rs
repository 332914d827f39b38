//! 编辑器配置
//!
//! 网格对齐、直角约束和最短线段长度等绘制辅助设置。

use crate::geometry::Line;
use crate::math::Point2;
use crate::snap::SnapConfig;
use serde::{Deserialize, Serialize};

/// 编辑器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// 捕捉配置
    pub snap: SnapConfig,
    /// 网格间距（像素）
    pub grid_x: u32,
    pub grid_y: u32,
    /// 是否对齐到网格
    pub snap_to_grid: bool,
    /// 绘制轮廓时只允许水平或竖直线段
    pub only_right_angles: bool,
    /// 是否显示十字辅助线
    pub show_guide: bool,
    /// 端口绘制半径
    pub port_radius: f64,
    /// 小于等于该长度的线段被丢弃
    pub min_line_length: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            grid_x: 15,
            grid_y: 15,
            snap_to_grid: true,
            only_right_angles: true,
            show_guide: true,
            port_radius: 10.0,
            min_line_length: 1.0,
        }
    }
}

impl EditorConfig {
    /// 向下对齐到网格
    pub fn align_to_grid(&self, p: Point2) -> Point2 {
        if !self.snap_to_grid {
            return p;
        }
        Point2::new(align(p.x, self.grid_x), align(p.y, self.grid_y))
    }

    /// 直角约束：保留相对起点位移较大的方向
    pub fn constrain(&self, start: &Point2, p: Point2) -> Point2 {
        if !self.only_right_angles {
            return p;
        }
        let dx = (p.x - start.x).abs();
        let dy = (p.y - start.y).abs();
        if dx >= dy {
            Point2::new(p.x, start.y)
        } else {
            Point2::new(start.x, p.y)
        }
    }

    /// 线段是否足够长
    pub fn accepts_line(&self, line: &Line) -> bool {
        line.length() > self.min_line_length
    }
}

fn align(value: f64, grid: u32) -> f64 {
    if grid == 0 {
        return value;
    }
    let grid = f64::from(grid);
    (value / grid).floor() * grid
}
