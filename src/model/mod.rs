//! 模型层：文档、检测、渲染、路径与影子树

pub mod detector;
pub mod document;
pub mod error;
pub mod json_path;
pub mod renderer;
pub mod shadow_tree;
#[cfg(test)]
pub(crate) mod strategies;
pub mod theme;
