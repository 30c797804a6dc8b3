//! 编辑模式核心接口
//!
//! 每个编辑工具是一个独立的模式实现，由宿主按事件种类逐一调用，
//! 采用状态机模式处理用户交互。宿主拥有事件分发，模式拥有全部
//! 决策逻辑。

use crate::error::TransformError;
use crate::event::PointerEvent;
use crate::handles::DisplayFeature;
use crate::host::EditorHost;
use zdraw_core::feature::{Feature, FeatureId};

/// 本模式的注册名
pub const SCALE_ROTATE_MODE: &str = "scale_rotate";

/// 默认选择模式的注册名
pub const SIMPLE_SELECT_MODE: &str = "simple_select";

/// 要素更新事件的动作种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// 坐标被重算（旋转/缩放）
    ChangeCoordinates,
    /// 整体平移
    Move,
}

/// 模式切换请求，可预置要素选择
#[derive(Debug, Clone, PartialEq)]
pub enum ModeRequest {
    SimpleSelect { feature_ids: Vec<FeatureId> },
}

impl ModeRequest {
    /// 目标模式的注册名
    pub fn name(&self) -> &'static str {
        match self {
            ModeRequest::SimpleSelect { .. } => SIMPLE_SELECT_MODE,
        }
    }
}

/// 当前模式下可用的全局操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionableState {
    pub combine_features: bool,
    pub uncombine_features: bool,
    pub trash: bool,
}

/// 编辑模式 trait - 每类宿主事件对应一个方法
///
/// 事件在单线程上按 down -> move* -> up 的顺序到达；乱序事件
/// （如没有 down 的 up）必须是无副作用的空操作。
pub trait DrawMode<H: EditorHost> {
    /// 指针按下（鼠标/触摸）
    fn on_pointer_down(&mut self, host: &mut H, event: &PointerEvent)
        -> Result<(), TransformError>;

    /// 指针按下状态下移动
    fn on_drag(&mut self, host: &mut H, event: &PointerEvent) -> Result<(), TransformError>;

    /// 指针抬起
    fn on_pointer_up(&mut self, host: &mut H, event: &PointerEvent)
        -> Result<(), TransformError>;

    /// 指针离开画布
    fn on_pointer_out(&mut self, host: &mut H) -> Result<(), TransformError>;

    /// 点击（按下后未拖动即抬起）
    fn on_click(&mut self, host: &mut H, event: &PointerEvent) -> Result<(), TransformError>;

    /// 删除当前选中要素
    fn on_trash(&mut self, host: &mut H) -> Result<(), TransformError>;

    /// 模式退出，必须无条件恢复宿主交互
    fn on_stop(&mut self, host: &mut H);

    /// 渲染投影：宿主对每个要素调用一次，模式通过 display 回调
    /// 输出要素投影与合成手柄
    fn render(&self, host: &mut H, feature: &Feature, display: &mut dyn FnMut(DisplayFeature));
}
