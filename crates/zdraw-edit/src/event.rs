//! 指针事件模型
//!
//! 宿主负责命中测试，把光标下的目标连同地图坐标一起传入；
//! 模式只根据目标种类做状态迁移。

use serde::{Deserialize, Serialize};
use std::fmt;
use zdraw_core::feature::{FeatureId, LngLat};

/// 顶点坐标路径
///
/// 点分索引路径，例如面要素外环第 2 个顶点为 `"0.2"`，
/// 线要素第 3 个顶点为 `"3"`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordPath(String);

impl CoordPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 末段索引，无法解析时返回 None
    pub fn leaf_index(&self) -> Option<usize> {
        self.0.rsplit('.').next()?.parse().ok()
    }
}

impl fmt::Display for CoordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CoordPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// 光标下的命中目标
#[derive(Debug, Clone, PartialEq)]
pub enum EventTarget {
    /// 缩放顶点手柄
    Vertex(CoordPath),
    /// 旋转手柄
    RotationHandle(CoordPath),
    /// 当前激活要素本体
    ActiveFeature(FeatureId),
    /// 未激活的其他要素
    InactiveFeature(FeatureId),
    /// 空白区域
    NoTarget,
}

/// 指针事件（按下/移动/抬起/点击共用）
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// 光标地图坐标
    pub position: LngLat,
    /// 命中目标
    pub target: EventTarget,
    /// 离散步进修饰键（Shift）是否按下
    pub shift_down: bool,
}

impl PointerEvent {
    pub fn new(position: LngLat, target: EventTarget) -> Self {
        Self {
            position,
            target,
            shift_down: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_down = true;
        self
    }
}
