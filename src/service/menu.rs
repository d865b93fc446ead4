//! 后台菜单：声明式菜单项、主题单选组、评分/捐助入口
//!
//! 菜单注册与标签页打开由宿主实现，失败只记录日志，不影响其余功能。

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::model::error::AppError;
use crate::model::theme::ThemeCatalog;
use crate::service::storage::{load_selected_theme, KeyValueStore};
use crate::vm::bridge::{
    KEY_THEME, MENU_CONTEXT_ACTION, MENU_DONATE, MENU_ID_DONATE, MENU_ID_RATE, MENU_ID_SEPARATOR,
    MENU_ID_THEMES, MENU_RATE, MENU_THEME,
};
use crate::vm::config::ViewerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    Normal,
    Radio,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: MenuItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub contexts: Vec<String>,
}

impl MenuItem {
    fn new(id: &str, title: Option<&str>, kind: MenuItemKind, parent_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            title: title.map(str::to_string),
            kind,
            parent_id: parent_id.map(str::to_string),
            contexts: vec![MENU_CONTEXT_ACTION.to_string()],
        }
    }
}

/// 宿主的菜单注册接口
pub trait MenuRegistry {
    fn create(&self, items: &[MenuItem]) -> Result<(), AppError>;
    fn set_checked(&self, id: &str) -> Result<(), AppError>;
}

/// 宿主的新标签页接口
pub trait TabOpener {
    fn open(&self, url: &str) -> Result<(), AppError>;
}

/// 菜单点击事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuClick {
    pub menu_item_id: String,
    pub parent_menu_item_id: Option<String>,
}

/// 完整菜单：主题父项 + 每个主题一个单选子项 + 分隔线 + 评分 + 捐助
pub fn menu_items(catalog: &ThemeCatalog) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::new(MENU_ID_THEMES, Some(MENU_THEME), MenuItemKind::Normal, None)];
    items.extend(catalog.iter().map(|theme| {
        MenuItem::new(&theme.id, Some(&theme.name), MenuItemKind::Radio, Some(MENU_ID_THEMES))
    }));
    items.push(MenuItem::new(MENU_ID_SEPARATOR, None, MenuItemKind::Separator, None));
    items.push(MenuItem::new(MENU_ID_RATE, Some(MENU_RATE), MenuItemKind::Normal, None));
    items.push(MenuItem::new(MENU_ID_DONATE, Some(MENU_DONATE), MenuItemKind::Normal, None));
    items
}

/// 后台上下文：安装/启动时注册菜单，处理菜单点击
pub struct Background<R, T> {
    store: Rc<dyn KeyValueStore>,
    registry: R,
    tabs: T,
    config: ViewerConfig,
}

impl<R: MenuRegistry, T: TabOpener> Background<R, T> {
    pub fn new(store: Rc<dyn KeyValueStore>, registry: R, tabs: T, config: ViewerConfig) -> Self {
        Self { store, registry, tabs, config }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn tabs(&self) -> &T {
        &self.tabs
    }

    pub fn init(&self) {
        if let Err(e) = self.registry.create(&menu_items(&self.config.themes)) {
            tracing::error!("注册菜单失败: {}", e);
        }
        self.restore_selected_theme_item();
    }

    fn restore_selected_theme_item(&self) {
        let Some(theme) = load_selected_theme(self.store.as_ref(), &self.config) else {
            tracing::warn!("主题目录为空，跳过菜单勾选");
            return;
        };
        if let Err(e) = self.registry.set_checked(&theme.id) {
            tracing::error!("勾选主题菜单项 {} 失败: {}", theme.id, e);
        }
    }

    pub fn on_menu_clicked(&self, click: &MenuClick) {
        if click.parent_menu_item_id.as_deref() == Some(MENU_ID_THEMES) {
            let Some(theme) = self.config.themes.find(&click.menu_item_id) else {
                tracing::warn!("未知主题菜单项: {}", click.menu_item_id);
                return;
            };
            let saved = serde_json::to_value(theme)
                .map_err(AppError::from)
                .and_then(|v| self.store.save(KEY_THEME, v));
            match saved {
                Ok(()) => tracing::info!("主题已切换: {}", theme.id),
                Err(e) => tracing::error!("保存主题失败: {}", e),
            }
        } else if let Some(url) = self.action_url(&click.menu_item_id) {
            if let Err(e) = self.tabs.open(&url) {
                tracing::error!("打开标签页失败 {}: {}", url, e);
            }
        }
    }

    fn action_url(&self, id: &str) -> Option<String> {
        match id {
            MENU_ID_RATE => Some(self.config.rate_url()),
            MENU_ID_DONATE => Some(self.config.donate_url.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::storage::MemoryStore;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingRegistry {
        created: RefCell<Vec<MenuItem>>,
        checked: RefCell<Vec<String>>,
        fail: bool,
    }

    impl MenuRegistry for RecordingRegistry {
        fn create(&self, items: &[MenuItem]) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::Menu("duplicate id".into()));
            }
            self.created.borrow_mut().extend_from_slice(items);
            Ok(())
        }

        fn set_checked(&self, id: &str) -> Result<(), AppError> {
            self.checked.borrow_mut().push(id.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingTabs {
        opened: RefCell<Vec<String>>,
    }

    impl TabOpener for RecordingTabs {
        fn open(&self, url: &str) -> Result<(), AppError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn background(store: Rc<MemoryStore>, fail: bool) -> Background<RecordingRegistry, RecordingTabs> {
        let registry = RecordingRegistry { fail, ..Default::default() };
        Background::new(store, registry, RecordingTabs::default(), ViewerConfig::default())
    }

    #[test]
    fn test_menu_items_layout() {
        let items = menu_items(&ThemeCatalog::default());
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["themes", "clear", "abyssal", "gruvbox", "tokyoNight", "vanilla", "separator_2", "rate_extension", "donate"]
        );
        assert!(items[1..6].iter().all(|i| i.kind == MenuItemKind::Radio && i.parent_id.as_deref() == Some("themes")));
        assert_eq!(items[6].kind, MenuItemKind::Separator);
    }

    #[test]
    fn test_menu_item_wire_shape() {
        let items = menu_items(&ThemeCatalog::default());
        assert_eq!(
            serde_json::to_value(&items[1]).unwrap(),
            json!({"id": "clear", "title": "Clear", "type": "radio", "parentId": "themes", "contexts": ["action"]})
        );
    }

    #[test]
    fn test_init_checks_default_theme() {
        let bg = background(Rc::new(MemoryStore::new()), false);
        bg.init();
        assert_eq!(bg.registry().created.borrow().len(), 9);
        assert_eq!(*bg.registry().checked.borrow(), vec!["clear".to_string()]);
    }

    #[test]
    fn test_init_restores_stored_theme_even_if_create_fails() {
        let store = Rc::new(MemoryStore::new());
        store.save(KEY_THEME, json!({"name": "Vanilla", "fileName": "vanilla.css", "id": "vanilla"})).unwrap();

        let bg = background(store, true);
        bg.init();
        assert!(bg.registry().created.borrow().is_empty());
        assert_eq!(*bg.registry().checked.borrow(), vec!["vanilla".to_string()], "注册失败不影响恢复勾选");
    }

    #[test]
    fn test_theme_click_persists_theme() {
        let store = Rc::new(MemoryStore::new());
        let bg = background(store.clone(), false);
        bg.on_menu_clicked(&MenuClick {
            menu_item_id: "gruvbox".into(),
            parent_menu_item_id: Some("themes".into()),
        });

        let saved = store.load(KEY_THEME, Value::Null).unwrap();
        assert_eq!(saved["fileName"], json!("gruvbox.css"));
        assert!(bg.tabs().opened.borrow().is_empty());
    }

    #[test]
    fn test_action_clicks_open_tabs() {
        let bg = background(Rc::new(MemoryStore::new()), false);
        for id in ["rate_extension", "donate", "unknown"] {
            bg.on_menu_clicked(&MenuClick { menu_item_id: id.into(), parent_menu_item_id: None });
        }
        let opened = bg.tabs().opened.borrow();
        assert_eq!(opened.len(), 2, "未知菜单项不打开标签页");
        assert!(opened[0].starts_with("https://chrome.google.com/webstore/detail/"));
        assert_eq!(opened[1], ViewerConfig::default().donate_url);
    }
}
