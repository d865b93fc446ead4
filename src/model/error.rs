//! AppError：全局错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSONPath错误: {0}")]
    JsonPath(String),
    #[error("存储错误: {0}")]
    Storage(String),
    #[error("消息通道错误: {0}")]
    Channel(String),
    #[error("菜单错误: {0}")]
    Menu(String),
    #[error("状态错误: {0}")]
    State(String),
}
