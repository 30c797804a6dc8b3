//! 编辑模式错误定义

use thiserror::Error;
use zdraw_core::feature::FeatureId;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("no feature found for id `{0}`")]
    InvalidFeature(FeatureId),

    #[error("scale/rotate mode can not handle {0} features")]
    UnsupportedGeometry(&'static str),

    #[error("drag axes were not computed before the move event")]
    MissingAxes,
}
