//! 视图模型层：常量、配置、交互状态机与内容侧流程

pub mod bridge;
pub mod config;
pub mod controller;
pub mod viewer;
