//! 要素缩放/旋转模式
//!
//! 通过拖拽合成手柄对单个面/线要素做缩放或旋转。每次手势在按下
//! 手柄时把当时的几何记为不可变基准快照并计算各角点的轴线
//! （支点+方位角、原点+距离）；此后每帧都从快照按累计角度/比例
//! 重算完整几何并整体覆写，避免逐帧增量带来的误差累积。

use tracing::{debug, error, warn};

use zdraw_core::feature::{Feature, FeatureId, Geometry, LngLat};
use zdraw_core::{geodesy, transform};

use crate::error::TransformError;
use crate::event::{CoordPath, EventTarget, PointerEvent};
use crate::handles::{self, DisplayFeature};
use crate::host::{EditorHost, SelectedCoordinate};
use crate::mode::{ActionableState, DrawMode, ModeRequest, UpdateAction};
use crate::options::{ScaleRotateOptions, TransformCenter};

/// 当前拖拽执行的几何变换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformOp {
    /// 无（整体平移）
    #[default]
    None,
    Scale,
    Rotate,
}

/// 旋转轴线：每个角点一个支点与基准方位角
#[derive(Debug, Clone)]
struct RotationAxes {
    /// 手势开始时的几何快照
    baseline: Geometry,
    pivots: Vec<LngLat>,
    bearings: Vec<f64>,
}

/// 缩放轴线：每个角点一个原点与基准距离（米）
#[derive(Debug, Clone)]
struct ScalingAxes {
    baseline: Geometry,
    origins: Vec<LngLat>,
    distances: Vec<f64>,
}

/// 缩放/旋转模式的会话状态
pub struct ScaleRotateMode {
    feature_id: FeatureId,
    can_trash: bool,
    can_scale: bool,
    can_rotate: bool,
    single_rotation_point: bool,
    rotation_point_radius: f64,
    rotate_pivot: TransformCenter,
    scale_center: TransformCenter,
    can_select_features: bool,
    selected_coord_paths: Vec<CoordPath>,
    drag_move_location: Option<LngLat>,
    drag_moving: bool,
    can_drag_move: bool,
    current_op: TransformOp,
    rotation: Option<RotationAxes>,
    scaling: Option<ScalingAxes>,
}

impl ScaleRotateMode {
    /// 激活模式
    ///
    /// 目标要素必须存在且不是点类几何。副作用：推送顶点选择、
    /// 设置要素选择、关闭双击缩放、汇报可用操作。
    pub fn activate<H: EditorHost>(
        host: &mut H,
        options: ScaleRotateOptions,
    ) -> Result<Self, TransformError> {
        let feature_id = options
            .feature_id
            .or_else(|| host.selected_ids().into_iter().next())
            .ok_or_else(|| TransformError::InvalidFeature(FeatureId::default()))?;

        let feature = host
            .feature(&feature_id)
            .ok_or_else(|| TransformError::InvalidFeature(feature_id.clone()))?;

        if feature.geometry.is_point_kind() {
            return Err(TransformError::UnsupportedGeometry(
                feature.geometry.type_name(),
            ));
        }

        let mode = Self {
            feature_id: feature_id.clone(),
            can_trash: options.can_trash,
            can_scale: options.can_scale,
            can_rotate: options.can_rotate,
            single_rotation_point: options.single_rotation_point,
            rotation_point_radius: options.rotation_point_radius,
            rotate_pivot: options.rotate_pivot,
            scale_center: options.scale_center,
            can_select_features: options.can_select_features,
            selected_coord_paths: options.coord_path.into_iter().collect(),
            drag_move_location: options.start_position,
            drag_moving: false,
            can_drag_move: false,
            current_op: TransformOp::None,
            rotation: None,
            scaling: None,
        };

        if !(mode.can_rotate || mode.can_scale) {
            warn!("neither can_scale nor can_rotate is enabled, only move/translate remains");
        }

        host.set_selected_coordinates(mode.paths_to_coordinates());
        host.set_selected(feature_id);
        host.set_double_click_zoom_enabled(false);
        host.set_actionable_state(mode.actionable_state());

        Ok(mode)
    }

    /// 目标要素 id
    pub fn feature_id(&self) -> &FeatureId {
        &self.feature_id
    }

    /// 当前拖拽的变换种类
    pub fn current_op(&self) -> TransformOp {
        self.current_op
    }

    fn actionable_state(&self) -> ActionableState {
        ActionableState {
            combine_features: false,
            uncombine_features: false,
            trash: self.can_trash,
        }
    }

    fn paths_to_coordinates(&self) -> Vec<SelectedCoordinate> {
        self.selected_coord_paths
            .iter()
            .map(|coord_path| SelectedCoordinate {
                feature_id: self.feature_id.clone(),
                coord_path: coord_path.clone(),
            })
            .collect()
    }

    /// 以当前几何为基准快照计算两套轴线
    ///
    /// 角点环取自边界展平结果，边数 n = 顶点数 - 1（面环的闭合
    /// 重复点正好抵消；线要素的末顶点不产生轴线）。
    fn compute_axes(&mut self, feature: &Feature) {
        let corners = feature.geometry.boundary_corners();
        let n = corners.len().saturating_sub(1);
        // TODO 奇数顶点数时 n/2 只是对侧边的近似
        let i_half = n / 2;

        let mut pivots = Vec::with_capacity(n);
        let mut bearings = Vec::with_capacity(n);
        let mut origins = Vec::with_capacity(n);
        let mut distances = Vec::with_capacity(n);

        if let Some(center0) = geodesy::center(&feature.geometry) {
            for i1 in 0..n {
                let i0 = (i1 + n - 1) % n;
                let rot_point = geodesy::midpoint(corners[i0], corners[i1]);

                let rot_center = match self.rotate_pivot {
                    TransformCenter::Centroid => center0,
                    TransformCenter::OppositeCorner => {
                        let i3 = (i1 + i_half) % n;
                        let i2 = (i3 + n - 1) % n;
                        geodesy::midpoint(corners[i2], corners[i3])
                    }
                };

                pivots.push(rot_center);
                bearings.push(geodesy::bearing(rot_center, rot_point));
            }

            for (i, corner) in corners.iter().take(n).enumerate() {
                let origin = match self.scale_center {
                    TransformCenter::Centroid => center0,
                    TransformCenter::OppositeCorner => corners[(i + i_half) % n],
                };
                origins.push(origin);
                distances.push(geodesy::distance(origin, *corner));
            }
        }

        self.rotation = Some(RotationAxes {
            baseline: feature.geometry.clone(),
            pivots,
            bearings,
        });
        self.scaling = Some(ScalingAxes {
            baseline: feature.geometry.clone(),
            origins,
            distances,
        });
    }

    fn start_dragging<H: EditorHost>(&mut self, host: &mut H, position: LngLat) {
        host.set_pan_enabled(false);
        self.can_drag_move = true;
        self.drag_move_location = Some(position);
        debug!(op = ?self.current_op, "drag armed");
    }

    fn stop_dragging<H: EditorHost>(&mut self, host: &mut H) {
        host.set_pan_enabled(true);
        self.drag_moving = false;
        self.can_drag_move = false;
        self.drag_move_location = None;
    }

    fn on_vertex<H: EditorHost>(&mut self, host: &mut H, event: &PointerEvent, path: &CoordPath) {
        let Some(feature) = host.feature(&self.feature_id) else {
            debug!(id = %self.feature_id, "target feature vanished, ignoring pointer down");
            return;
        };
        self.compute_axes(&feature);
        self.start_dragging(host, event.position);
        self.selected_coord_paths = vec![path.clone()];
        self.current_op = TransformOp::Scale;
    }

    fn on_rotation_handle<H: EditorHost>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
        path: &CoordPath,
    ) {
        let Some(feature) = host.feature(&self.feature_id) else {
            debug!(id = %self.feature_id, "target feature vanished, ignoring pointer down");
            return;
        };
        self.compute_axes(&feature);
        self.start_dragging(host, event.position);
        self.selected_coord_paths = vec![path.clone()];
        self.current_op = TransformOp::Rotate;
    }

    fn on_feature<H: EditorHost>(&mut self, host: &mut H, event: &PointerEvent) {
        self.selected_coord_paths.clear();
        self.start_dragging(host, event.position);
    }

    /// 被拖拽顶点的末段索引；选择为空时取 0
    fn coordinate_index(&self) -> Option<usize> {
        match self.selected_coord_paths.first() {
            Some(path) => path.leaf_index(),
            None => Some(0),
        }
    }

    fn drag_rotate<H: EditorHost>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
    ) -> Result<(), TransformError> {
        let axes = self.rotation.as_ref().ok_or_else(|| {
            error!("rotation axes missing during rotate drag");
            TransformError::MissingAxes
        })?;

        let n = axes.pivots.len();
        let Some(index) = self.coordinate_index() else {
            return Ok(()); // 路径损坏：忽略本帧
        };
        if n == 0 {
            return Ok(());
        }

        // 旋转手柄位于两个角点之间，取"下一个"角点的轴线
        let c_idx = (index + 1) % n;
        let pivot = axes.pivots[c_idx];

        let heading1 = geodesy::bearing(pivot, event.position);
        let mut rotate_angle = heading1 - axes.bearings[c_idx];

        if event.shift_down {
            rotate_angle = 5.0 * (rotate_angle / 5.0).round();
        }

        let rotated = transform::rotate(&axes.baseline, rotate_angle, pivot);
        host.set_feature_coordinates(&self.feature_id, rotated);
        self.fire_update(host, UpdateAction::ChangeCoordinates);

        Ok(())
    }

    fn drag_scale<H: EditorHost>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
    ) -> Result<(), TransformError> {
        let axes = self.scaling.as_ref().ok_or_else(|| {
            error!("scaling axes missing during scale drag");
            TransformError::MissingAxes
        })?;

        let Some(c_idx) = self.coordinate_index() else {
            return Ok(()); // 路径损坏：忽略本帧
        };
        if c_idx >= axes.origins.len() {
            return Ok(()); // 索引越界：忽略本帧
        }

        let origin = axes.origins[c_idx];
        let base_distance = axes.distances[c_idx];
        if base_distance <= 0.0 {
            return Ok(());
        }

        let mut scale = geodesy::distance(origin, event.position) / base_distance;

        if event.shift_down {
            scale = 0.05 * (scale / 0.05).round();
        }

        let scaled = transform::scale(&axes.baseline, scale, origin);
        host.set_feature_coordinates(&self.feature_id, scaled);
        self.fire_update(host, UpdateAction::ChangeCoordinates);

        Ok(())
    }

    fn drag_feature<H: EditorHost>(&mut self, host: &mut H, event: &PointerEvent, delta: LngLat) {
        for id in host.selected_ids() {
            if let Some(feature) = host.feature(&id) {
                host.set_feature_coordinates(&id, transform::translate(&feature.geometry, delta));
            }
        }
        self.drag_move_location = Some(event.position);
        self.fire_update(host, UpdateAction::Move);
    }

    /// 本次手势对应的更新动作种类
    fn update_action(&self) -> UpdateAction {
        if !self.selected_coord_paths.is_empty() && self.current_op != TransformOp::None {
            UpdateAction::ChangeCoordinates
        } else {
            UpdateAction::Move
        }
    }

    fn fire_update<H: EditorHost>(&self, host: &mut H, action: UpdateAction) {
        let features = host
            .selected_ids()
            .iter()
            .filter_map(|id| host.feature(id))
            .collect();
        host.fire_update(action, features);
    }

    fn click_active_feature<H: EditorHost>(&mut self, host: &mut H) {
        self.selected_coord_paths.clear();
        host.clear_selected_coordinates();
        host.feature_changed(&self.feature_id);
    }

    fn click_no_target<H: EditorHost>(&mut self, host: &mut H) {
        if self.can_select_features {
            debug!("leaving scale/rotate mode for simple select");
            host.change_mode(ModeRequest::SimpleSelect {
                feature_ids: Vec::new(),
            });
        }
    }

    fn click_inactive<H: EditorHost>(&mut self, host: &mut H, id: &FeatureId) {
        if self.can_select_features {
            debug!(feature = %id, "leaving scale/rotate mode, preselecting clicked feature");
            host.change_mode(ModeRequest::SimpleSelect {
                feature_ids: vec![id.clone()],
            });
        }
    }
}

impl<H: EditorHost> DrawMode<H> for ScaleRotateMode {
    fn on_pointer_down(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
    ) -> Result<(), TransformError> {
        match &event.target {
            EventTarget::Vertex(path) => self.on_vertex(host, event, path),
            EventTarget::RotationHandle(path) => self.on_rotation_handle(host, event, path),
            EventTarget::ActiveFeature(_) => self.on_feature(host, event),
            EventTarget::InactiveFeature(_) | EventTarget::NoTarget => {}
        }
        Ok(())
    }

    fn on_drag(&mut self, host: &mut H, event: &PointerEvent) -> Result<(), TransformError> {
        if !self.can_drag_move {
            return Ok(());
        }
        self.drag_moving = true;

        let last = self.drag_move_location.unwrap_or(event.position);
        let delta = event.position - last;

        if self.selected_coord_paths.is_empty() {
            self.drag_feature(host, event, delta);
        } else {
            match self.current_op {
                TransformOp::Rotate => self.drag_rotate(host, event)?,
                TransformOp::Scale => self.drag_scale(host, event)?,
                TransformOp::None => self.drag_feature(host, event, delta),
            }
        }

        self.drag_move_location = Some(event.position);
        Ok(())
    }

    fn on_pointer_up(&mut self, host: &mut H, _event: &PointerEvent) -> Result<(), TransformError> {
        if self.drag_moving {
            self.fire_update(host, self.update_action());
        }
        self.stop_dragging(host);
        Ok(())
    }

    fn on_pointer_out(&mut self, host: &mut H) -> Result<(), TransformError> {
        // 指针离开画布等同抬起：发出最终更新并解除拖拽
        if self.drag_moving {
            self.fire_update(host, self.update_action());
        }
        self.stop_dragging(host);
        Ok(())
    }

    fn on_click(&mut self, host: &mut H, event: &PointerEvent) -> Result<(), TransformError> {
        match &event.target {
            EventTarget::NoTarget => self.click_no_target(host),
            EventTarget::ActiveFeature(_) => self.click_active_feature(host),
            EventTarget::InactiveFeature(id) => self.click_inactive(host, id),
            EventTarget::Vertex(_) | EventTarget::RotationHandle(_) => self.stop_dragging(host),
        }
        Ok(())
    }

    fn on_trash(&mut self, host: &mut H) -> Result<(), TransformError> {
        if let Some(id) = host.selected_ids().into_iter().next() {
            host.delete_feature(&id);
        }
        Ok(())
    }

    fn on_stop(&mut self, host: &mut H) {
        // 无条件恢复宿主交互，包括异常退出路径
        host.set_pan_enabled(true);
        host.set_double_click_zoom_enabled(true);
        host.clear_selected_coordinates();
        debug!("scale/rotate mode stopped");
    }

    fn render(&self, host: &mut H, feature: &Feature, display: &mut dyn FnMut(DisplayFeature)) {
        if feature.id == self.feature_id {
            display(DisplayFeature::Feature {
                feature: feature.clone(),
                active: true,
            });

            let mut vertices = handles::vertex_handles(feature, &self.selected_coord_paths);

            if self.can_scale {
                handles::apply_bisectrix(&mut vertices);
                for vertex in &vertices {
                    display(DisplayFeature::Handle(vertex.clone()));
                }
            }

            if self.can_rotate {
                for handle in handles::rotation_handles(
                    feature,
                    &vertices,
                    self.single_rotation_point,
                    self.rotation_point_radius,
                ) {
                    display(DisplayFeature::Handle(handle));
                }
            }
        } else {
            display(DisplayFeature::Feature {
                feature: feature.clone(),
                active: false,
            });
        }

        host.set_actionable_state(self.actionable_state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::HandleRole;
    use std::collections::HashMap;

    const TOLERANCE: f64 = 1e-9;

    #[derive(Default)]
    struct MockHost {
        features: HashMap<FeatureId, Feature>,
        selected: Vec<FeatureId>,
        selected_coordinates: Vec<SelectedCoordinate>,
        pan_enabled: bool,
        double_click_zoom_enabled: bool,
        updates: Vec<(UpdateAction, Vec<Feature>)>,
        mode_requests: Vec<ModeRequest>,
        deleted: Vec<FeatureId>,
        changed: Vec<FeatureId>,
        actionable: Option<ActionableState>,
    }

    impl MockHost {
        fn with_features(features: impl IntoIterator<Item = Feature>) -> Self {
            Self {
                features: features
                    .into_iter()
                    .map(|f| (f.id.clone(), f))
                    .collect(),
                pan_enabled: true,
                double_click_zoom_enabled: true,
                ..Default::default()
            }
        }

        fn geometry(&self, id: &str) -> Geometry {
            self.features[&FeatureId::from(id)].geometry.clone()
        }
    }

    impl EditorHost for MockHost {
        fn feature(&self, id: &FeatureId) -> Option<Feature> {
            self.features.get(id).cloned()
        }

        fn selected_ids(&self) -> Vec<FeatureId> {
            self.selected.clone()
        }

        fn set_selected(&mut self, id: FeatureId) {
            self.selected = vec![id];
        }

        fn set_selected_coordinates(&mut self, coordinates: Vec<SelectedCoordinate>) {
            self.selected_coordinates = coordinates;
        }

        fn clear_selected_coordinates(&mut self) {
            self.selected_coordinates.clear();
        }

        fn delete_feature(&mut self, id: &FeatureId) {
            self.features.remove(id);
            self.deleted.push(id.clone());
        }

        fn set_feature_coordinates(&mut self, id: &FeatureId, geometry: Geometry) {
            if let Some(feature) = self.features.get_mut(id) {
                feature.geometry = geometry;
            }
        }

        fn feature_changed(&mut self, id: &FeatureId) {
            self.changed.push(id.clone());
        }

        fn set_pan_enabled(&mut self, enabled: bool) {
            self.pan_enabled = enabled;
        }

        fn set_double_click_zoom_enabled(&mut self, enabled: bool) {
            self.double_click_zoom_enabled = enabled;
        }

        fn fire_update(&mut self, action: UpdateAction, features: Vec<Feature>) {
            self.updates.push((action, features));
        }

        fn change_mode(&mut self, request: ModeRequest) {
            self.mode_requests.push(request);
        }

        fn set_actionable_state(&mut self, state: ActionableState) {
            self.actionable = Some(state);
        }
    }

    fn square_geometry() -> Geometry {
        Geometry::Polygon(vec![vec![
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(0.0, 1.0),
            LngLat::new(0.0, 0.0),
        ]])
    }

    fn square_host() -> MockHost {
        MockHost::with_features([Feature::new("sq", square_geometry())])
    }

    fn activate(host: &mut MockHost, options: ScaleRotateOptions) -> ScaleRotateMode {
        ScaleRotateMode::activate(
            host,
            ScaleRotateOptions {
                feature_id: Some(FeatureId::from("sq")),
                ..options
            },
        )
        .unwrap()
    }

    fn assert_geometries_close(a: &Geometry, b: &Geometry, tolerance: f64) {
        let mut lhs = Vec::new();
        let mut rhs = Vec::new();
        a.for_each_coord(&mut |c| lhs.push(c));
        b.for_each_coord(&mut |c| rhs.push(c));
        assert_eq!(lhs.len(), rhs.len());
        for (l, r) in lhs.iter().zip(rhs.iter()) {
            assert!(
                (l.lng - r.lng).abs() < tolerance && (l.lat - r.lat).abs() < tolerance,
                "coordinate mismatch: {l:?} vs {r:?}"
            );
        }
    }

    #[test]
    fn test_activation_rejects_point_features() {
        let mut host = MockHost::with_features([
            Feature::new("pt", Geometry::Point(LngLat::new(0.0, 0.0))),
            Feature::new("mp", Geometry::MultiPoint(vec![LngLat::new(0.0, 0.0)])),
        ]);

        for id in ["pt", "mp"] {
            let result = ScaleRotateMode::activate(
                &mut host,
                ScaleRotateOptions {
                    feature_id: Some(FeatureId::from(id)),
                    ..Default::default()
                },
            );
            assert!(matches!(
                result,
                Err(TransformError::UnsupportedGeometry(_))
            ));
        }
    }

    #[test]
    fn test_activation_rejects_missing_feature() {
        let mut host = square_host();
        let result = ScaleRotateMode::activate(
            &mut host,
            ScaleRotateOptions {
                feature_id: Some(FeatureId::from("nope")),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(TransformError::InvalidFeature(_))));
    }

    #[test]
    fn test_activation_side_effects() {
        let mut host = square_host();
        let mode = activate(&mut host, Default::default());

        assert_eq!(mode.current_op(), TransformOp::None);
        assert_eq!(host.selected, vec![FeatureId::from("sq")]);
        assert!(!host.double_click_zoom_enabled);
        assert_eq!(
            host.actionable,
            Some(ActionableState {
                combine_features: false,
                uncombine_features: false,
                trash: true,
            })
        );
    }

    #[test]
    fn test_activation_falls_back_to_selection() {
        let mut host = square_host();
        host.selected = vec![FeatureId::from("sq")];
        let mode = ScaleRotateMode::activate(&mut host, Default::default()).unwrap();
        assert_eq!(mode.feature_id(), &FeatureId::from("sq"));
    }

    #[test]
    fn test_line_feature_axis_count() {
        let mut host = MockHost::with_features([Feature::new(
            "ln",
            Geometry::LineString(vec![
                LngLat::new(0.0, 0.0),
                LngLat::new(1.0, 0.0),
                LngLat::new(2.0, 1.0),
            ]),
        )]);
        let mut mode = ScaleRotateMode::activate(
            &mut host,
            ScaleRotateOptions {
                feature_id: Some(FeatureId::from("ln")),
                ..Default::default()
            },
        )
        .unwrap();

        let feature = host.feature(&FeatureId::from("ln")).unwrap();
        mode.compute_axes(&feature);

        // 末顶点不产生轴线：3 个顶点只有 2 条轴
        assert_eq!(mode.scaling.as_ref().unwrap().distances.len(), 2);
        assert_eq!(mode.rotation.as_ref().unwrap().pivots.len(), 2);
    }

    #[test]
    fn test_pointer_up_without_down_is_noop() {
        let mut host = square_host();
        let before = host.geometry("sq");
        let mut mode = activate(&mut host, Default::default());

        let up = PointerEvent::new(LngLat::new(0.3, 0.3), EventTarget::NoTarget);
        mode.on_pointer_up(&mut host, &up).unwrap();

        assert!(host.updates.is_empty());
        assert_eq!(host.geometry("sq"), before);
    }

    #[test]
    fn test_rotate_drag_quarter_turn() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());
        let baseline = host.geometry("sq");
        let center = geodesy::center(&baseline).unwrap();

        // 按住角点 0 与 1 之间的旋转手柄
        let down = PointerEvent::new(
            LngLat::new(0.5, 0.0),
            EventTarget::RotationHandle(CoordPath::from("0.0")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();
        assert_eq!(mode.current_op(), TransformOp::Rotate);
        assert!(!host.pan_enabled);

        // 基准方位角 180 度，移到 270 度处即 +90 度
        let target = geodesy::destination(center, 1000.0, 270.0);
        let drag = PointerEvent::new(target, EventTarget::NoTarget);
        mode.on_drag(&mut host, &drag).unwrap();

        let expected = transform::rotate(&baseline, 90.0, center);
        assert_geometries_close(&host.geometry("sq"), &expected, TOLERANCE);

        // 角点绕中心转了四分之一圈
        let rotated = host.geometry("sq").boundary_corners();
        assert!((rotated[0].lng - 0.0).abs() < 1e-3 && (rotated[0].lat - 1.0).abs() < 1e-3);

        let up = PointerEvent::new(target, EventTarget::NoTarget);
        mode.on_pointer_up(&mut host, &up).unwrap();
        assert!(host.pan_enabled);
        assert!(matches!(
            host.updates.last(),
            Some((UpdateAction::ChangeCoordinates, _))
        ));
    }

    #[test]
    fn test_rotation_handle_pairs_with_next_corner_axis() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());
        let baseline = host.geometry("sq");
        let corners = baseline.boundary_corners();

        let down = PointerEvent::new(
            LngLat::new(0.5, 0.0),
            EventTarget::RotationHandle(CoordPath::from("0.0")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();

        // 把指针放回手柄锚点方向：角度应为 0，几何不变
        let anchor = geodesy::midpoint(corners[0], corners[1]);
        let drag = PointerEvent::new(anchor, EventTarget::NoTarget);
        mode.on_drag(&mut host, &drag).unwrap();

        assert_geometries_close(&host.geometry("sq"), &baseline, 1e-6);
    }

    #[test]
    fn test_rotation_snap_to_five_degrees() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());
        let baseline = host.geometry("sq");
        let center = geodesy::center(&baseline).unwrap();

        let down = PointerEvent::new(
            LngLat::new(0.5, 0.0),
            EventTarget::RotationHandle(CoordPath::from("0.0")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();

        // 原始角度 13 度，按住修饰键吸附到 15 度
        let target = geodesy::destination(center, 1000.0, 193.0);
        let drag = PointerEvent::new(target, EventTarget::NoTarget).with_shift();
        mode.on_drag(&mut host, &drag).unwrap();

        let expected = transform::rotate(&baseline, 15.0, center);
        assert_geometries_close(&host.geometry("sq"), &expected, TOLERANCE);
    }

    #[test]
    fn test_scale_snap_to_five_percent() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());
        let baseline = host.geometry("sq");
        let center = geodesy::center(&baseline).unwrap();
        let corners = baseline.boundary_corners();

        let down = PointerEvent::new(
            corners[0],
            EventTarget::Vertex(CoordPath::from("0.0")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();
        assert_eq!(mode.current_op(), TransformOp::Scale);

        // 原始比例 1.07，按住修饰键吸附到 1.05
        let heading = geodesy::bearing(center, corners[0]);
        let base_distance = geodesy::distance(center, corners[0]);
        let target = geodesy::destination(center, 1.07 * base_distance, heading);
        let drag = PointerEvent::new(target, EventTarget::NoTarget).with_shift();
        mode.on_drag(&mut host, &drag).unwrap();

        let expected = transform::scale(&baseline, 1.05, center);
        assert_geometries_close(&host.geometry("sq"), &expected, TOLERANCE);
    }

    #[test]
    fn test_opposite_corner_axes_symmetry() {
        let mut host = square_host();
        let mut mode = activate(
            &mut host,
            ScaleRotateOptions {
                rotate_pivot: TransformCenter::OppositeCorner,
                scale_center: TransformCenter::OppositeCorner,
                ..Default::default()
            },
        );

        let feature = host.feature(&FeatureId::from("sq")).unwrap();
        mode.compute_axes(&feature);
        let corners = feature.geometry.boundary_corners();

        // 缩放原点是索引空间对侧的角点
        let scaling = mode.scaling.as_ref().unwrap();
        for i in 0..4 {
            let opposite = corners[(i + 2) % 4];
            assert!((scaling.origins[i].lng - opposite.lng).abs() < TOLERANCE);
            assert!((scaling.origins[i].lat - opposite.lat).abs() < TOLERANCE);
        }

        // 旋转支点是对侧边的中点
        let rotation = mode.rotation.as_ref().unwrap();
        let expected_0 = geodesy::midpoint(corners[1], corners[2]);
        let expected_2 = geodesy::midpoint(corners[3], corners[0]);
        assert!((rotation.pivots[0].lng - expected_0.lng).abs() < TOLERANCE);
        assert!((rotation.pivots[0].lat - expected_0.lat).abs() < TOLERANCE);
        assert!((rotation.pivots[2].lng - expected_2.lng).abs() < TOLERANCE);
        assert!((rotation.pivots[2].lat - expected_2.lat).abs() < TOLERANCE);
    }

    #[test]
    fn test_translate_drag_moves_selected_features() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());
        let before = host.geometry("sq");

        let down = PointerEvent::new(
            LngLat::new(0.5, 0.5),
            EventTarget::ActiveFeature(FeatureId::from("sq")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();

        let drag = PointerEvent::new(LngLat::new(0.75, 0.0), EventTarget::NoTarget);
        mode.on_drag(&mut host, &drag).unwrap();

        let expected = transform::translate(&before, LngLat::new(0.25, -0.5));
        assert_eq!(host.geometry("sq"), expected);
        assert!(matches!(host.updates.last(), Some((UpdateAction::Move, _))));
    }

    #[test]
    fn test_malformed_coord_path_is_tolerated() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());
        let before = host.geometry("sq");

        let down = PointerEvent::new(
            LngLat::new(0.5, 0.0),
            EventTarget::RotationHandle(CoordPath::from("bogus")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();

        let drag = PointerEvent::new(LngLat::new(0.7, 0.2), EventTarget::NoTarget);
        assert!(mode.on_drag(&mut host, &drag).is_ok());
        assert_eq!(host.geometry("sq"), before);
    }

    #[test]
    fn test_rotate_drag_without_axes_errors() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());

        // 模拟时序故障：轴线未经 pointer-down 计算
        mode.current_op = TransformOp::Rotate;
        mode.selected_coord_paths = vec![CoordPath::from("0.0")];
        mode.can_drag_move = true;

        let drag = PointerEvent::new(LngLat::new(0.7, 0.2), EventTarget::NoTarget);
        assert!(matches!(
            mode.on_drag(&mut host, &drag),
            Err(TransformError::MissingAxes)
        ));
    }

    #[test]
    fn test_click_no_target_requests_select_mode() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());

        let click = PointerEvent::new(LngLat::new(5.0, 5.0), EventTarget::NoTarget);
        mode.on_click(&mut host, &click).unwrap();
        assert_eq!(
            host.mode_requests,
            vec![ModeRequest::SimpleSelect {
                feature_ids: Vec::new()
            }]
        );
    }

    #[test]
    fn test_click_no_target_respects_can_select_features() {
        let mut host = square_host();
        let mut mode = activate(
            &mut host,
            ScaleRotateOptions {
                can_select_features: false,
                ..Default::default()
            },
        );

        let click = PointerEvent::new(LngLat::new(5.0, 5.0), EventTarget::NoTarget);
        mode.on_click(&mut host, &click).unwrap();
        assert!(host.mode_requests.is_empty());
    }

    #[test]
    fn test_click_inactive_feature_preseeds_selection() {
        let mut host = MockHost::with_features([
            Feature::new("sq", square_geometry()),
            Feature::new(
                "other",
                Geometry::LineString(vec![LngLat::new(3.0, 3.0), LngLat::new(4.0, 4.0)]),
            ),
        ]);
        let mut mode = activate(&mut host, Default::default());

        let click = PointerEvent::new(
            LngLat::new(3.5, 3.5),
            EventTarget::InactiveFeature(FeatureId::from("other")),
        );
        mode.on_click(&mut host, &click).unwrap();
        assert_eq!(
            host.mode_requests,
            vec![ModeRequest::SimpleSelect {
                feature_ids: vec![FeatureId::from("other")]
            }]
        );
    }

    #[test]
    fn test_click_active_feature_collapses_selection() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());

        let down = PointerEvent::new(
            LngLat::new(0.0, 0.0),
            EventTarget::Vertex(CoordPath::from("0.0")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();
        assert!(!mode.selected_coord_paths.is_empty());

        let click = PointerEvent::new(
            LngLat::new(0.5, 0.5),
            EventTarget::ActiveFeature(FeatureId::from("sq")),
        );
        mode.on_click(&mut host, &click).unwrap();

        assert!(mode.selected_coord_paths.is_empty());
        assert!(host.selected_coordinates.is_empty());
        assert_eq!(host.changed, vec![FeatureId::from("sq")]);
    }

    #[test]
    fn test_trash_deletes_selected_feature() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());

        mode.on_trash(&mut host).unwrap();
        assert_eq!(host.deleted, vec![FeatureId::from("sq")]);
    }

    #[test]
    fn test_stop_restores_map_interactions() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());
        assert!(!host.double_click_zoom_enabled);

        // 拖拽中途退出模式也必须恢复平移与双击缩放
        let down = PointerEvent::new(
            LngLat::new(0.0, 0.0),
            EventTarget::Vertex(CoordPath::from("0.0")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();
        assert!(!host.pan_enabled);

        mode.on_stop(&mut host);
        assert!(host.pan_enabled);
        assert!(host.double_click_zoom_enabled);
        assert!(host.selected_coordinates.is_empty());
    }

    #[test]
    fn test_pointer_out_ends_gesture() {
        let mut host = square_host();
        let mut mode = activate(&mut host, Default::default());

        let down = PointerEvent::new(
            LngLat::new(0.5, 0.5),
            EventTarget::ActiveFeature(FeatureId::from("sq")),
        );
        mode.on_pointer_down(&mut host, &down).unwrap();
        let drag = PointerEvent::new(LngLat::new(0.6, 0.5), EventTarget::NoTarget);
        mode.on_drag(&mut host, &drag).unwrap();
        let updates_before = host.updates.len();

        mode.on_pointer_out(&mut host).unwrap();
        assert_eq!(host.updates.len(), updates_before + 1);
        assert!(host.pan_enabled);
        assert!(!mode.can_drag_move);
    }

    #[test]
    fn test_render_projection() {
        let mut host = MockHost::with_features([
            Feature::new("sq", square_geometry()),
            Feature::new(
                "other",
                Geometry::LineString(vec![LngLat::new(3.0, 3.0), LngLat::new(4.0, 4.0)]),
            ),
        ]);
        let mode = activate(&mut host, Default::default());

        let target = host.feature(&FeatureId::from("sq")).unwrap();
        let mut displayed = Vec::new();
        mode.render(&mut host, &target, &mut |f| displayed.push(f));

        let mut scale_vertices = 0;
        let mut rotation_handles = 0;
        for item in &displayed {
            match item {
                DisplayFeature::Feature { active, .. } => assert!(*active),
                DisplayFeature::Handle(h) => {
                    assert!((0.0..360.0).contains(&h.heading));
                    match h.role {
                        HandleRole::ScaleVertex => scale_vertices += 1,
                        HandleRole::RotationHandle => rotation_handles += 1,
                    }
                }
            }
        }
        assert_eq!(scale_vertices, 4);
        assert_eq!(rotation_handles, 4);

        // 非目标要素按未激活投影，不生成手柄
        let other = host.feature(&FeatureId::from("other")).unwrap();
        let mut displayed = Vec::new();
        mode.render(&mut host, &other, &mut |f| displayed.push(f));
        assert_eq!(displayed.len(), 1);
        assert!(matches!(
            displayed[0],
            DisplayFeature::Feature { active: false, .. }
        ));
    }

    #[test]
    fn test_render_without_scale_keeps_rotation_handles() {
        let mut host = square_host();
        let mode = activate(
            &mut host,
            ScaleRotateOptions {
                can_scale: false,
                ..Default::default()
            },
        );

        let target = host.feature(&FeatureId::from("sq")).unwrap();
        let mut displayed = Vec::new();
        mode.render(&mut host, &target, &mut |f| displayed.push(f));

        let roles: Vec<_> = displayed
            .iter()
            .filter_map(|f| match f {
                DisplayFeature::Handle(h) => Some(h.role),
                _ => None,
            })
            .collect();
        assert!(roles.iter().all(|r| *r == HandleRole::RotationHandle));
        assert_eq!(roles.len(), 4);
    }
}
