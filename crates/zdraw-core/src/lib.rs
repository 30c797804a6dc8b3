//! ZDRAW 核心地理几何引擎
//!
//! 提供地图要素模型、大地测量计算和几何变换操作。
//!
//! # 架构设计
//!
//! - `feature`: 要素数据模型（GeoJSON 风格的几何类型）
//! - `geodesy`: 球面大地测量（方位角、距离、目标点等）
//! - `transform`: 以基准快照为输入的旋转/缩放/平移变换
//!
//! # 示例
//!
//! ```rust
//! use zdraw_core::prelude::*;
//!
//! let a = LngLat::new(0.0, 0.0);
//! let b = LngLat::new(1.0, 0.0);
//!
//! // 沿赤道向东的方位角为 90 度
//! assert!((geodesy::bearing(a, b) - 90.0).abs() < 1e-9);
//! ```

pub mod feature;
pub mod geodesy;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::feature::{Feature, FeatureId, Geometry, LngLat};
    pub use crate::geodesy;
    pub use crate::transform;
}
