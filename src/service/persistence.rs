//! 内容侧持久化桥：暂存文档 → 发送请求 → 等待完成 → 读回标记
//!
//! 每次调用只有一个请求在途；特权侧不响应时调用方会一直等待（没有超时）。

use std::rc::Rc;

use serde_json::Value;

use crate::service::message::{MessageChannel, Request, Response};
use crate::service::storage::KeyValueStore;
use crate::vm::bridge::{KEY_HTML, KEY_TEMP_JSON_DATA};

pub struct PersistenceBridge<C> {
    store: Rc<dyn KeyValueStore>,
    channel: C,
}

impl<C: MessageChannel> PersistenceBridge<C> {
    pub fn new(store: Rc<dyn KeyValueStore>, channel: C) -> Self {
        Self { store, channel }
    }

    /// 取得渲染好的树标记；任一步失败都记录日志并返回 None
    pub fn tree_html(&self, data: Value) -> Option<String> {
        if let Err(e) = self.store.save(KEY_TEMP_JSON_DATA, data) {
            tracing::error!("暂存文档失败: {}", e);
            return None;
        }

        match self.channel.send(Request::ProcessData) {
            Ok(Response::HtmlReady) => {}
            Ok(Response::Error { reason }) => {
                tracing::error!("特权侧渲染失败: {}", reason);
                return None;
            }
            Err(e) => {
                tracing::error!("发送 process-data 失败: {}", e);
                return None;
            }
        }

        match self.store.load(KEY_HTML, Value::String(String::new())) {
            Ok(Value::String(html)) => Some(html),
            Ok(other) => {
                tracing::error!("存储中的标记类型异常: {}", other);
                None
            }
            Err(e) => {
                tracing::error!("读取渲染结果失败: {}", e);
                None
            }
        }
    }

    /// 清除本轮暂存的键
    pub fn clear_ephemeral(&self) {
        for key in [KEY_TEMP_JSON_DATA, KEY_HTML] {
            if let Err(e) = self.store.clear(key) {
                tracing::error!("清除暂存键 {} 失败: {}", key, e);
            }
        }
    }
}
