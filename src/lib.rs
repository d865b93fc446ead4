//! JSON树视图库
//!
//! 识别浏览器以纯文本展示的原始JSON文档，渲染为可折叠的树形HTML，
//! 并提供原始/格式化视图切换、路径悬停显示与主题切换的交互模型

pub mod model;
pub mod service;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::detector::{Detection, Detector, DetectorLimits, Rejection};
pub use model::document::RawDocument;
pub use model::error::AppError;
pub use model::renderer::{render_tree, render_tree_at};
pub use model::shadow_tree::{build_shadow_tree, NodeKind, TreeNode};
pub use vm::config::ViewerConfig;
pub use vm::viewer::{JsonViewer, ViewerPage, ViewerSession};
