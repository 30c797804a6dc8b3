//! 宿主能力接口
//!
//! 地图/绘图宿主需要提供的全部能力，模式通过依赖注入获得，
//! 从不触碰全局状态。

use crate::event::CoordPath;
use crate::mode::{ActionableState, ModeRequest, UpdateAction};
use zdraw_core::feature::{Feature, FeatureId, Geometry};

/// 选中的顶点标识（要素 + 坐标路径）
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCoordinate {
    pub feature_id: FeatureId,
    pub coord_path: CoordPath,
}

/// 宿主绘图层能力
pub trait EditorHost {
    /// 按 id 解析要素
    fn feature(&self, id: &FeatureId) -> Option<Feature>;

    /// 当前选中的要素 id 列表
    fn selected_ids(&self) -> Vec<FeatureId>;

    /// 设置要素选择
    fn set_selected(&mut self, id: FeatureId);

    /// 设置选中的顶点集合
    fn set_selected_coordinates(&mut self, coordinates: Vec<SelectedCoordinate>);

    /// 清空选中的顶点集合
    fn clear_selected_coordinates(&mut self);

    /// 请求删除要素
    fn delete_feature(&mut self, id: &FeatureId);

    /// 整体覆写要素坐标（非增量）
    fn set_feature_coordinates(&mut self, id: &FeatureId, geometry: Geometry);

    /// 标记要素几何已变更
    fn feature_changed(&mut self, id: &FeatureId);

    /// 开关地图平移
    fn set_pan_enabled(&mut self, enabled: bool);

    /// 开关双击缩放
    fn set_double_click_zoom_enabled(&mut self, enabled: bool);

    /// 发出要素更新事件
    fn fire_update(&mut self, action: UpdateAction, features: Vec<Feature>);

    /// 请求切换到另一个模式
    fn change_mode(&mut self, request: ModeRequest);

    /// 汇报当前可用的全局操作
    fn set_actionable_state(&mut self, state: ActionableState);
}
