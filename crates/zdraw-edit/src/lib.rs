//! ZDRAW 交互编辑模式
//!
//! 模态交互控制层：宿主地图负责事件分发与绘制，本层持有会话状态
//! 并做全部决策。所有宿主能力通过 `EditorHost` 接口注入，不依赖
//! 任何全局单例。

pub mod error;
pub mod event;
pub mod handles;
pub mod host;
pub mod mode;
pub mod modes;
pub mod options;

pub use error::TransformError;
pub use event::{CoordPath, EventTarget, PointerEvent};
pub use handles::{DisplayFeature, HandlePoint, HandleRole};
pub use host::{EditorHost, SelectedCoordinate};
pub use mode::{
    ActionableState, DrawMode, ModeRequest, UpdateAction, SCALE_ROTATE_MODE, SIMPLE_SELECT_MODE,
};
pub use modes::{ScaleRotateMode, TransformOp};
pub use options::{ScaleRotateOptions, TransformCenter};
