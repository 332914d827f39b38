//! 元件实例
//!
//! 实例共享一个元件定义，只持有自己的放置状态（位置与旋转角）。

use crate::math::{Point2, Vector2};
use crate::outline::Outline;
use crate::part::Part;
use crate::transform::Transform2D;
use std::cell::RefCell;
use std::rc::Rc;

/// 元件在板上的一次放置
#[derive(Debug, Clone)]
pub struct PartInstance {
    part: Rc<RefCell<Part>>,
    pub position: Vector2,
    /// 旋转角（度，逆时针）
    pub rotation: f64,
    transform: Transform2D,
}

impl PartInstance {
    pub fn new(part: Rc<RefCell<Part>>) -> Self {
        Self {
            part,
            position: Vector2::zeros(),
            rotation: 0.0,
            transform: Transform2D::identity(),
        }
    }

    /// 以给定位置和角度放置
    pub fn placed(part: Rc<RefCell<Part>>, position: Vector2, rotation: f64) -> Self {
        let mut instance = Self::new(part);
        instance.position = position;
        instance.rotation = rotation;
        instance.update_transform();
        instance
    }

    pub fn part(&self) -> &Rc<RefCell<Part>> {
        &self.part
    }

    /// 修改 `position` 或 `rotation` 后重新计算放置变换
    ///
    /// 先绕元件原点旋转，再平移到 `position`。
    pub fn update_transform(&mut self) {
        self.transform = Transform2D::rotation_degrees(self.rotation)
            .then(&Transform2D::translation(self.position.x, self.position.y));
    }

    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// 元件局部坐标转为板坐标
    pub fn to_world(&self, local: &Point2) -> Point2 {
        self.transform.apply(local)
    }

    /// 变换到板坐标系下的轮廓副本
    pub fn world_outline(&self) -> Outline {
        let mut outline = self.part.borrow().outline().copy();
        outline.transform(&self.transform);
        outline
    }
}
