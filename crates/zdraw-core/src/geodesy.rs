//! 球面大地测量计算
//!
//! 在 WGS84 平均地球半径的球面模型上计算方位角、距离、目标点等。
//! 角度单位为度，方位角以正北为 0、顺时针增长；距离单位为米。
//!
//! 大圆系列（`bearing`/`distance`/`destination`/`midpoint`）用于
//! 轴线与手柄的测量；恒向线系列（`rhumb_*`）用于逐点几何变换，
//! 保证同一点旋转/缩放前后的方位-距离关系一致。

use crate::feature::{Geometry, LngLat};

/// 地球平均半径（米）
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-9;

/// 大圆初始方位角（度，范围 (-180, 180]）
pub fn bearing(from: LngLat, to: LngLat) -> f64 {
    let lon1 = from.lng.to_radians();
    let lon2 = to.lng.to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (lon2 - lon1).sin() * lat2.cos();
    let b = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon2 - lon1).cos();

    a.atan2(b).to_degrees()
}

/// 大圆距离（米，haversine 公式）
pub fn distance(from: LngLat, to: LngLat) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();

    2.0 * a.sqrt().atan2((1.0 - a).sqrt()) * EARTH_RADIUS
}

/// 从起点沿给定方位角前进指定距离后的目标点
pub fn destination(origin: LngLat, distance_m: f64, bearing_deg: f64) -> LngLat {
    let lon1 = origin.lng.to_radians();
    let lat1 = origin.lat.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    LngLat::new(lon2.to_degrees(), lat2.to_degrees())
}

/// 两点间大圆中点
pub fn midpoint(a: LngLat, b: LngLat) -> LngLat {
    destination(a, distance(a, b) / 2.0, bearing(a, b))
}

/// 几何包围盒中心，几何无坐标时返回 None
pub fn center(geometry: &Geometry) -> Option<LngLat> {
    let (min, max) = geometry.bounding_box()?;
    Some(LngLat::new(
        (min.lng + max.lng) / 2.0,
        (min.lat + max.lat) / 2.0,
    ))
}

/// 恒向线方位角（度，范围 (-180, 180]）
pub fn rhumb_bearing(from: LngLat, to: LngLat) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let mut d_lon = (to.lng - from.lng).to_radians();

    // 取较短方向
    if d_lon > std::f64::consts::PI {
        d_lon -= 2.0 * std::f64::consts::PI;
    }
    if d_lon < -std::f64::consts::PI {
        d_lon += 2.0 * std::f64::consts::PI;
    }

    let d_psi = ((phi2 / 2.0 + std::f64::consts::FRAC_PI_4).tan()
        / (phi1 / 2.0 + std::f64::consts::FRAC_PI_4).tan())
    .ln();

    d_lon.atan2(d_psi).to_degrees()
}

/// 恒向线距离（米）
pub fn rhumb_distance(from: LngLat, to: LngLat) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = phi2 - phi1;
    let mut d_lon = ((to.lng - from.lng).to_radians()).abs();

    if d_lon > std::f64::consts::PI {
        d_lon = 2.0 * std::f64::consts::PI - d_lon;
    }

    let d_psi = ((phi2 / 2.0 + std::f64::consts::FRAC_PI_4).tan()
        / (phi1 / 2.0 + std::f64::consts::FRAC_PI_4).tan())
    .ln();
    let q = if d_psi.abs() > 1e-11 {
        d_phi / d_psi
    } else {
        phi1.cos()
    };

    (d_phi * d_phi + q * q * d_lon * d_lon).sqrt() * EARTH_RADIUS
}

/// 从起点沿恒向线前进指定距离后的目标点
pub fn rhumb_destination(origin: LngLat, distance_m: f64, bearing_deg: f64) -> LngLat {
    let delta = distance_m / EARTH_RADIUS;
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lng.to_radians();
    let theta = bearing_deg.to_radians();

    let d_phi = delta * theta.cos();
    let mut phi2 = phi1 + d_phi;

    // 越过极点时回折
    if phi2.abs() > std::f64::consts::FRAC_PI_2 {
        phi2 = if phi2 > 0.0 {
            std::f64::consts::PI - phi2
        } else {
            -std::f64::consts::PI - phi2
        };
    }

    let d_psi = ((phi2 / 2.0 + std::f64::consts::FRAC_PI_4).tan()
        / (phi1 / 2.0 + std::f64::consts::FRAC_PI_4).tan())
    .ln();
    let q = if d_psi.abs() > 1e-11 {
        d_phi / d_psi
    } else {
        phi1.cos()
    };

    let d_lon = delta * theta.sin() / q;
    let lambda2 = lambda1 + d_lon;

    // 归一化到 (-180, 180]
    let lambda2 = (lambda2 + 3.0 * std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI)
        - std::f64::consts::PI;

    LngLat::new(lambda2.to_degrees(), phi2.to_degrees())
}

/// 方位角归一化到 [0, 360)
pub fn normalize_bearing(bearing_deg: f64) -> f64 {
    bearing_deg.rem_euclid(360.0)
}
