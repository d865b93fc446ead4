//! 特权侧格式化器：读取暂存文档 → 解析 → 渲染 → 写回标记

use std::rc::Rc;

use serde_json::Value;

use crate::model::error::AppError;
use crate::model::renderer::render_tree;
use crate::service::message::{MessageHandler, Request, Response};
use crate::service::storage::KeyValueStore;
use crate::vm::bridge::{KEY_HTML, KEY_TEMP_JSON_DATA};

pub struct PrivilegedFormatter {
    store: Rc<dyn KeyValueStore>,
}

impl PrivilegedFormatter {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn process_data(&self) -> Result<(), AppError> {
        let data = self.store.load(KEY_TEMP_JSON_DATA, Value::String(String::new()))?;
        let parsed = match data {
            Value::Null => return Err(AppError::State("暂存数据为空".into())),
            Value::String(ref s) if s.is_empty() => {
                return Err(AppError::State("暂存数据为空".into()));
            }
            // 未预解析的原始文本以JSON字符串形式暂存
            Value::String(text) => serde_json::from_str::<Value>(&text)?,
            other => other,
        };

        let html = render_tree(&parsed);
        tracing::debug!("渲染完成，标记长度: {} 字符", html.len());
        self.store.save(KEY_HTML, Value::String(html))
    }
}

impl MessageHandler for PrivilegedFormatter {
    fn handle(&self, request: Request) -> Response {
        match request {
            Request::ProcessData => match self.process_data() {
                Ok(()) => Response::HtmlReady,
                Err(e) => {
                    tracing::error!("处理 process-data 失败: {}", e);
                    Response::error(e.to_string())
                }
            },
        }
    }
}
