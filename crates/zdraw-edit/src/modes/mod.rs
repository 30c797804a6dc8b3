//! 具体的编辑模式实现

mod scale_rotate;

pub use scale_rotate::{ScaleRotateMode, TransformOp};
