//! 跨上下文消息协议：一次请求对应一次带完成标记的响应

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "kebab-case")]
pub enum Request {
    /// 读取暂存文档、解析并渲染
    ProcessData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "kebab-case")]
pub enum Response {
    /// 标记已写入存储
    HtmlReady,
    Error { reason: String },
}

impl Response {
    pub fn error(reason: impl Into<String>) -> Self {
        Response::Error { reason: reason.into() }
    }
}

/// 特权侧的消息处理器
pub trait MessageHandler {
    fn handle(&self, request: Request) -> Response;
}

/// 内容侧发送请求并等待响应（无超时）
pub trait MessageChannel {
    fn send(&self, request: Request) -> Result<Response, AppError>;
}

/// 同进程通道：请求与响应都经过一次JSON编解码，模拟跨上下文边界
pub struct LocalChannel<H> {
    handler: H,
}

impl<H: MessageHandler> LocalChannel<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H: MessageHandler> MessageChannel for LocalChannel<H> {
    fn send(&self, request: Request) -> Result<Response, AppError> {
        let wire: Value = serde_json::to_value(&request)?;
        let received: Request = serde_json::from_value(wire)
            .map_err(|e| AppError::Channel(format!("请求无法解码: {}", e)))?;

        let reply = serde_json::to_value(self.handler.handle(received))?;
        serde_json::from_value(reply).map_err(|e| AppError::Channel(format!("响应无法解码: {}", e)))
    }
}
