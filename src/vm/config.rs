//! ViewerConfig：注入检测、菜单与交互层的只读配置表

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::detector::{DetectorLimits, DEFAULT_MAX_CHARACTERS, DEFAULT_MAX_DEPTH};
use crate::model::error::AppError;
use crate::model::theme::{ThemeCatalog, DEFAULT_THEME_ID};
use crate::utils::fs::read_json_file;
use crate::vm::bridge::THEME_STYLESHEET_DIR;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub max_characters: usize,
    pub max_depth: usize,
    /// 静态资源前缀（样式表、图标）
    pub asset_base: String,
    pub default_theme: String,
    pub extension_id: String,
    pub donate_url: String,
    pub themes: ThemeCatalog,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_characters: DEFAULT_MAX_CHARACTERS,
            max_depth: DEFAULT_MAX_DEPTH,
            asset_base: "content/".to_string(),
            default_theme: DEFAULT_THEME_ID.to_string(),
            extension_id: "json-tree-viewer".to_string(),
            donate_url: "https://www.buymeacoffee.com/mrviolets".to_string(),
            themes: ThemeCatalog::default(),
        }
    }
}

impl ViewerConfig {
    /// 从JSON文件加载，缺失字段取默认值
    pub fn from_file(p: &Path) -> Result<Self, AppError> {
        let value = read_json_file(p)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn limits(&self) -> DetectorLimits {
        DetectorLimits {
            max_characters: self.max_characters,
            max_depth: self.max_depth,
        }
    }

    pub fn asset_url(&self, relative: &str) -> String {
        format!("{}{}", self.asset_base, relative)
    }

    pub fn theme_stylesheet_url(&self, file_name: &str) -> String {
        self.asset_url(&format!("{}{}", THEME_STYLESHEET_DIR, file_name))
    }

    pub fn rate_url(&self) -> String {
        format!("https://chrome.google.com/webstore/detail/{}", self.extension_id)
    }
}
