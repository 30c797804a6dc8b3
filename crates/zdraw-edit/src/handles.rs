//! 合成手柄生成
//!
//! 为渲染层生成非持久化的手柄点要素：缩放顶点手柄沿要素顶点放置，
//! 朝向按相邻两边方位角的平分线；旋转手柄放在相邻顶点连线中点
//! 沿支点方向按系数径向偏移处。

use serde::Serialize;
use zdraw_core::feature::{Feature, FeatureId, LngLat};
use zdraw_core::geodesy;

use crate::event::CoordPath;

/// 手柄角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandleRole {
    /// 缩放顶点手柄
    ScaleVertex,
    /// 旋转手柄
    RotationHandle,
}

/// 合成手柄点要素
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlePoint {
    pub role: HandleRole,
    /// 所属要素
    pub parent: FeatureId,
    pub position: LngLat,
    /// 配对顶点的坐标路径，用于拖拽命中
    pub coord_path: Option<CoordPath>,
    /// 图标朝向（度，[0, 360)）
    pub heading: f64,
    /// 渲染图标标识
    pub icon: Option<&'static str>,
    pub selected: bool,
}

/// 渲染投影输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DisplayFeature {
    /// 要素本体投影
    Feature { feature: Feature, active: bool },
    /// 合成手柄
    Handle(HandlePoint),
}

/// 为要素的每个边界顶点生成缩放手柄
///
/// 坐标路径规则：LineString 为 `"i"`，Polygon 为 `"环.i"`，
/// MultiLineString 为 `"线.i"`，MultiPolygon 为 `"面.环.i"`。
/// 面环的闭合重复点不生成手柄；点类几何不生成手柄。
pub fn vertex_handles(feature: &Feature, selected_paths: &[CoordPath]) -> Vec<HandlePoint> {
    use zdraw_core::feature::Geometry::*;

    let mut handles = Vec::new();
    let mut push = |position: LngLat, path: String| {
        let coord_path = CoordPath::new(path);
        handles.push(HandlePoint {
            role: HandleRole::ScaleVertex,
            parent: feature.id.clone(),
            position,
            selected: selected_paths.contains(&coord_path),
            coord_path: Some(coord_path),
            heading: 0.0,
            icon: None,
        });
    };

    match &feature.geometry {
        LineString(coords) => {
            for (i, c) in coords.iter().enumerate() {
                push(*c, i.to_string());
            }
        }
        MultiLineString(lines) => {
            for (l, line) in lines.iter().enumerate() {
                for (i, c) in line.iter().enumerate() {
                    push(*c, format!("{l}.{i}"));
                }
            }
        }
        Polygon(rings) => {
            for (r, ring) in rings.iter().enumerate() {
                for (i, c) in ring_open(ring).iter().enumerate() {
                    push(*c, format!("{r}.{i}"));
                }
            }
        }
        MultiPolygon(polys) => {
            for (p, rings) in polys.iter().enumerate() {
                for (r, ring) in rings.iter().enumerate() {
                    for (i, c) in ring_open(ring).iter().enumerate() {
                        push(*c, format!("{p}.{r}.{i}"));
                    }
                }
            }
        }
        Point(_) | MultiPoint(_) => {}
    }

    handles
}

/// 去掉环的闭合重复点
fn ring_open(ring: &[LngLat]) -> &[LngLat] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// 按平分线规则为每个顶点手柄计算朝向
///
/// 取前驱指向该点、后继指向该点两个方位角的平均值（环形回绕），
/// 归一化到 [0, 360)。
pub fn apply_bisectrix(handles: &mut [HandlePoint]) {
    let n = handles.len();
    for i1 in 0..n {
        let i0 = (i1 + n - 1) % n;
        let i2 = (i1 + 1) % n;

        let a1 = geodesy::bearing(handles[i0].position, handles[i1].position);
        let a2 = geodesy::bearing(handles[i2].position, handles[i1].position);

        handles[i1].heading = geodesy::normalize_bearing((a1 + a2) / 2.0);
    }
}

/// 为相邻顶点手柄对生成旋转手柄
///
/// `single` 时只生成第一对的共享手柄。手柄位置总是从包围盒中心
/// 量起，与配置的旋转支点策略无关。
pub fn rotation_handles(
    feature: &Feature,
    vertices: &[HandlePoint],
    single: bool,
    radius_scale: f64,
) -> Vec<HandlePoint> {
    let Some(rot_center) = geodesy::center(&feature.geometry) else {
        return Vec::new();
    };
    if vertices.len() < 2 {
        return Vec::new();
    }

    let mut corners: Vec<&HandlePoint> = vertices.iter().collect();
    corners.push(&vertices[0]);

    let pairs: &[&HandlePoint] = if single { &corners[..2] } else { &corners };

    pairs
        .windows(2)
        .map(|pair| rotation_handle(&feature.id, pair[0], pair[1], rot_center, radius_scale))
        .collect()
}

fn rotation_handle(
    parent: &FeatureId,
    v1: &HandlePoint,
    v2: &HandlePoint,
    rot_center: LngLat,
    radius_scale: f64,
) -> HandlePoint {
    let anchor = geodesy::midpoint(v1.position, v2.position);
    let heading = geodesy::bearing(rot_center, anchor);
    let distance0 = geodesy::distance(rot_center, anchor);
    // TODO 偏移半径应随地图缩放级别调整
    let distance1 = radius_scale * distance0;
    let position = geodesy::destination(rot_center, distance1, heading);

    HandlePoint {
        role: HandleRole::RotationHandle,
        parent: parent.clone(),
        position,
        coord_path: v1.coord_path.clone(),
        heading: geodesy::normalize_bearing(heading),
        icon: Some("rotate"),
        selected: false,
    }
}
