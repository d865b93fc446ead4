//! 键值存储契约：内容侧与特权侧共享的持久化桥

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::model::error::AppError;
use crate::model::theme::Theme;
use crate::utils::fs::{read_json_file, write_json_file};
use crate::vm::bridge::KEY_THEME;
use crate::vm::config::ViewerConfig;

/// save / load / clear 三个操作，失败时携带平台错误信息
pub trait KeyValueStore {
    fn save(&self, key: &str, value: Value) -> Result<(), AppError>;
    /// 键不存在时返回 `default`
    fn load(&self, key: &str, default: Value) -> Result<Value, AppError>;
    fn clear(&self, key: &str) -> Result<(), AppError>;
}

/// 单线程内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&self, key: &str, value: Value) -> Result<(), AppError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn load(&self, key: &str, default: Value) -> Result<Value, AppError> {
        Ok(self.entries.borrow().get(key).cloned().unwrap_or(default))
    }

    fn clear(&self, key: &str) -> Result<(), AppError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// 以单个JSON对象文件落盘的存储，每次操作都读-改-写
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<Map<String, Value>, AppError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        match read_json_file(&self.path)? {
            Value::Object(map) => Ok(map),
            other => Err(AppError::Storage(format!(
                "存储文件 {} 顶层不是对象: {}",
                self.path.display(),
                other
            ))),
        }
    }

    fn write_all(&self, map: Map<String, Value>) -> Result<(), AppError> {
        write_json_file(&self.path, &Value::Object(map))
    }
}

impl KeyValueStore for FileStore {
    fn save(&self, key: &str, value: Value) -> Result<(), AppError> {
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);
        self.write_all(map)
    }

    fn load(&self, key: &str, default: Value) -> Result<Value, AppError> {
        let map = self.read_all()?;
        Ok(map.get(key).cloned().unwrap_or(default))
    }

    fn clear(&self, key: &str) -> Result<(), AppError> {
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(map)?;
        }
        Ok(())
    }
}

/// 读取已保存的主题；任何失败都退回默认主题
pub fn load_selected_theme(store: &dyn KeyValueStore, config: &ViewerConfig) -> Option<Theme> {
    let fallback = config.themes.resolve(&config.default_theme, &config.default_theme).cloned();
    let stored = match store.load(KEY_THEME, Value::Null) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("读取主题失败: {}", e);
            return fallback;
        }
    };
    if stored.is_null() {
        return fallback;
    }

    match serde_json::from_value::<Theme>(stored) {
        Ok(theme) => config
            .themes
            .find(&theme.id)
            .cloned()
            .or(fallback),
        Err(e) => {
            tracing::warn!("已保存的主题格式无效: {}", e);
            fallback
        }
    }
}
