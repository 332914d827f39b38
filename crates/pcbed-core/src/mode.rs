//! 编辑模式状态机

use crate::error::{EditError, Result};
use crate::part::Part;
use crate::snap::SnapTarget;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 编辑模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorMode {
    #[default]
    Select,
    Move,
    EditOutline,
    EditPorts,
}

impl EditorMode {
    pub fn name(&self) -> &'static str {
        match self {
            EditorMode::Select => "Select",
            EditorMode::Move => "Move",
            EditorMode::EditOutline => "Edit Outline",
            EditorMode::EditPorts => "Edit Ports",
        }
    }

    pub fn shortcut(&self) -> &'static str {
        match self {
            EditorMode::Select => "S",
            EditorMode::Move => "M",
            EditorMode::EditOutline => "O",
            EditorMode::EditPorts => "P",
        }
    }

    /// 当前元件状态下能否进入该模式
    ///
    /// 只有编辑端口需要闭合轮廓，其余模式可以从任何模式进入。
    pub fn can_enter(&self, part: &Part) -> bool {
        match self {
            EditorMode::EditPorts => part.outline().is_closed(),
            _ => true,
        }
    }
}

/// 交互状态：当前模式和当前高亮目标
///
/// 高亮只在一次交互内有效，切换模式时清空。
#[derive(Debug, Clone, Default)]
pub struct ModeState {
    mode: EditorMode,
    highlight: Option<SnapTarget>,
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn highlight(&self) -> Option<&SnapTarget> {
        self.highlight.as_ref()
    }

    /// 切换模式，前置条件不满足时保持原模式
    pub fn set_mode(&mut self, mode: EditorMode, part: &Part) -> Result<()> {
        if !mode.can_enter(part) {
            debug!("Refused switch from {} to {}", self.mode.name(), mode.name());
            return Err(EditError::PrecondEditNotAllowed(format!(
                "part '{}' needs a closed outline to enter {}",
                part.name,
                mode.name()
            )));
        }
        info!("Mode: {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        self.highlight = None;
        Ok(())
    }

    /// 更新高亮，目标有变化时返回 `true`
    pub fn set_highlight(&mut self, target: Option<SnapTarget>) -> bool {
        let changed = match (&self.highlight, &target) {
            (Some(old), Some(new)) => !old.is_same(new),
            (None, None) => false,
            _ => true,
        };
        self.highlight = target;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Line;
    use crate::math::Point2;
    use crate::outline::Outline;
    use crate::point_table::Vertex;

    fn closed_part() -> Part {
        let outline = Outline::polygon(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ])
        .unwrap();
        Part::with_outline("T", outline)
    }

    #[test]
    fn test_edit_ports_needs_closed_outline() {
        let mut open = Part::new("open");
        open.add_edge(Vertex::new(0.0, 0.0), Vertex::new(5.0, 0.0))
            .unwrap();
        let mut state = ModeState::new();

        let result = state.set_mode(EditorMode::EditPorts, &open);
        assert!(matches!(result, Err(EditError::PrecondEditNotAllowed(_))));
        assert_eq!(state.mode(), EditorMode::Select);

        assert!(state.set_mode(EditorMode::EditOutline, &open).is_ok());
        assert!(state.set_mode(EditorMode::EditPorts, &closed_part()).is_ok());
        assert_eq!(state.mode(), EditorMode::EditPorts);
    }

    #[test]
    fn test_mode_switch_clears_highlight() {
        let part = closed_part();
        let mut state = ModeState::new();
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));

        assert!(state.set_highlight(Some(SnapTarget::Edge(line))));
        assert!(!state.set_highlight(Some(SnapTarget::Edge(line.reversed()))));
        state.set_mode(EditorMode::Move, &part).unwrap();
        assert!(state.highlight().is_none());
        assert!(!state.set_highlight(None));
    }
}
