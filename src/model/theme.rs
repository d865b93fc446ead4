//! 主题目录：只读配置表，内容侧与后台侧共用

use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME_ID: &str = "clear";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub file_name: String,
    pub id: String,
}

impl Theme {
    pub fn new(name: &str, file_name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: file_name.to_string(),
            id: id.to_string(),
        }
    }
}

/// 有序主题列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::new(vec![
            Theme::new("Clear", "clear.css", "clear"),
            Theme::new("Abyssal", "abyssal.css", "abyssal"),
            Theme::new("Gruvbox", "gruvbox.css", "gruvbox"),
            Theme::new("Tokyo Night", "tokyo-night.css", "tokyoNight"),
            Theme::new("Vanilla", "vanilla.css", "vanilla"),
        ])
    }
}

impl ThemeCatalog {
    pub fn new(themes: Vec<Theme>) -> Self {
        Self { themes }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    pub fn find(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// 查找指定主题，找不到时退回 `default_id`，再退回目录第一项
    pub fn resolve(&self, id: &str, default_id: &str) -> Option<&Theme> {
        self.find(id)
            .or_else(|| self.find(default_id))
            .or_else(|| self.themes.first())
    }
}
