//! 缩放/旋转模式配置

use crate::event::CoordPath;
use zdraw_core::feature::{FeatureId, LngLat};

/// 旋转支点 / 缩放原点策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformCenter {
    /// 要素包围盒中心
    #[default]
    Centroid,
    /// 顶点索引空间中对侧边的中点（凸形近似）
    OppositeCorner,
}

/// 激活时传入的配置
#[derive(Debug, Clone)]
pub struct ScaleRotateOptions {
    /// 目标要素，缺省时取当前选中的第一个要素
    pub feature_id: Option<FeatureId>,
    pub can_trash: bool,
    pub can_scale: bool,
    pub can_rotate: bool,
    /// 每个要素只生成一个共享旋转手柄
    pub single_rotation_point: bool,
    /// 旋转手柄到轮廓的径向偏移系数
    pub rotation_point_radius: f64,
    pub rotate_pivot: TransformCenter,
    pub scale_center: TransformCenter,
    /// 允许点击切换到选择模式
    pub can_select_features: bool,
    /// 预置拖拽起点
    pub start_position: Option<LngLat>,
    /// 预置选中的顶点路径
    pub coord_path: Option<CoordPath>,
}

impl Default for ScaleRotateOptions {
    fn default() -> Self {
        Self {
            feature_id: None,
            can_trash: true,
            can_scale: true,
            can_rotate: true,
            single_rotation_point: false,
            rotation_point_radius: 1.0,
            rotate_pivot: TransformCenter::Centroid,
            scale_center: TransformCenter::Centroid,
            can_select_features: true,
            start_position: None,
            coord_path: None,
        }
    }
}
