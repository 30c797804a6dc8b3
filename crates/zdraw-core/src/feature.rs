//! 要素数据模型
//!
//! 支持的几何类型：
//! - 点 (Point)
//! - 多点 (MultiPoint)
//! - 线 (LineString)
//! - 多线 (MultiLineString)
//! - 面 (Polygon)
//! - 多面 (MultiPolygon)
//!
//! 序列化格式与 GeoJSON 几何对象保持一致。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// 经纬度坐标（度）
///
/// 序列化为 GeoJSON 位置数组 `[lng, lat]`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(c: [f64; 2]) -> Self {
        Self { lng: c[0], lat: c[1] }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(c: LngLat) -> Self {
        [c.lng, c.lat]
    }
}

impl Add for LngLat {
    type Output = LngLat;

    fn add(self, rhs: LngLat) -> LngLat {
        LngLat::new(self.lng + rhs.lng, self.lat + rhs.lat)
    }
}

impl Sub for LngLat {
    type Output = LngLat;

    fn sub(self, rhs: LngLat) -> LngLat {
        LngLat::new(self.lng - rhs.lng, self.lat - rhs.lat)
    }
}

/// 要素唯一标识符
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 几何类型枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(LngLat),
    MultiPoint(Vec<LngLat>),
    LineString(Vec<LngLat>),
    MultiLineString(Vec<Vec<LngLat>>),
    Polygon(Vec<Vec<LngLat>>),
    MultiPolygon(Vec<Vec<Vec<LngLat>>>),
}

impl Geometry {
    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// 是否为点类几何（点/多点）
    pub fn is_point_kind(&self) -> bool {
        matches!(self, Geometry::Point(_) | Geometry::MultiPoint(_))
    }

    /// 展平为单一有序顶点环
    ///
    /// - Polygon: 外环（含闭合重复点）
    /// - MultiPolygon: 所有环按序拼接（含各自闭合重复点）
    /// - LineString: 顶点序列
    /// - MultiLineString: 各线顶点序列拼接
    /// - 点类几何: 空序列（容忍，不报错）
    pub fn boundary_corners(&self) -> Vec<LngLat> {
        match self {
            Geometry::Polygon(rings) => rings.first().cloned().unwrap_or_default(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter())
                .flat_map(|ring| ring.iter().copied())
                .collect(),
            Geometry::LineString(coords) => coords.clone(),
            Geometry::MultiLineString(lines) => {
                lines.iter().flat_map(|line| line.iter().copied()).collect()
            }
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
        }
    }

    /// 遍历全部坐标
    pub fn for_each_coord(&self, f: &mut impl FnMut(LngLat)) {
        match self {
            Geometry::Point(c) => f(*c),
            Geometry::MultiPoint(coords) | Geometry::LineString(coords) => {
                coords.iter().for_each(|c| f(*c));
            }
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().flatten().for_each(|c| f(*c));
            }
            Geometry::MultiPolygon(polys) => {
                polys.iter().flatten().flatten().for_each(|c| f(*c));
            }
        }
    }

    /// 对全部坐标应用映射，返回新几何
    pub fn map_coords(&self, f: impl Fn(LngLat) -> LngLat) -> Geometry {
        match self {
            Geometry::Point(c) => Geometry::Point(f(*c)),
            Geometry::MultiPoint(coords) => {
                Geometry::MultiPoint(coords.iter().map(|c| f(*c)).collect())
            }
            Geometry::LineString(coords) => {
                Geometry::LineString(coords.iter().map(|c| f(*c)).collect())
            }
            Geometry::MultiLineString(lines) => Geometry::MultiLineString(
                lines
                    .iter()
                    .map(|line| line.iter().map(|c| f(*c)).collect())
                    .collect(),
            ),
            Geometry::Polygon(rings) => Geometry::Polygon(
                rings
                    .iter()
                    .map(|ring| ring.iter().map(|c| f(*c)).collect())
                    .collect(),
            ),
            Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys
                    .iter()
                    .map(|rings| {
                        rings
                            .iter()
                            .map(|ring| ring.iter().map(|c| f(*c)).collect())
                            .collect()
                    })
                    .collect(),
            ),
        }
    }

    /// 计算包围盒（min, max），无坐标时返回 None
    pub fn bounding_box(&self) -> Option<(LngLat, LngLat)> {
        let mut min = LngLat::new(f64::INFINITY, f64::INFINITY);
        let mut max = LngLat::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut seen = false;

        self.for_each_coord(&mut |c| {
            min.lng = min.lng.min(c.lng);
            min.lat = min.lat.min(c.lat);
            max.lng = max.lng.max(c.lng);
            max.lat = max.lat.max(c.lat);
            seen = true;
        });

        seen.then_some((min, max))
    }
}

/// 地图要素：标识符 + 几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(id: impl Into<FeatureId>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }
}
