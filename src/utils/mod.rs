//! 通用工具：转义、文件读写

pub mod escape;
pub mod fs;
