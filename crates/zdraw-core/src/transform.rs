//! 几何变换
//!
//! 旋转与缩放逐点沿恒向线计算：先求支点到该点的方位角与距离，
//! 再按变换后的方位角/距离求目标点。输入几何始终是手势开始时的
//! 基准快照，避免逐帧累积的舍入误差。

use crate::feature::{Geometry, LngLat};
use crate::geodesy;

/// 绕支点旋转指定角度（度，顺时针为正）
pub fn rotate(geometry: &Geometry, angle_deg: f64, pivot: LngLat) -> Geometry {
    if angle_deg == 0.0 {
        return geometry.clone();
    }

    geometry.map_coords(|coord| {
        let initial = geodesy::rhumb_bearing(pivot, coord);
        let dist = geodesy::rhumb_distance(pivot, coord);
        geodesy::rhumb_destination(pivot, dist, initial + angle_deg)
    })
}

/// 以原点为中心按比例缩放
pub fn scale(geometry: &Geometry, factor: f64, origin: LngLat) -> Geometry {
    if factor == 1.0 {
        return geometry.clone();
    }

    geometry.map_coords(|coord| {
        let heading = geodesy::rhumb_bearing(origin, coord);
        let dist = geodesy::rhumb_distance(origin, coord);
        geodesy::rhumb_destination(origin, dist * factor, heading)
    })
}

/// 按经纬度增量平移
///
/// 平移没有漂移风险，直接对当前坐标做增量叠加。
pub fn translate(geometry: &Geometry, delta: LngLat) -> Geometry {
    geometry.map_coords(|coord| coord + delta)
}
