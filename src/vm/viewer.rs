//! 内容侧流程：检测 → 持久化桥渲染 → 组装页面 → 交互会话
//!
//! 任何失败都只记录日志并返回 None，调用方保留原始文本。

use std::rc::Rc;

use serde_json::Value;

use crate::model::detector::{Detection, Detector};
use crate::model::document::RawDocument;
use crate::model::shadow_tree::build_shadow_tree;
use crate::model::theme::Theme;
use crate::service::message::MessageChannel;
use crate::service::persistence::PersistenceBridge;
use crate::service::storage::{load_selected_theme, KeyValueStore};
use crate::utils::escape::escape_html;
use crate::vm::bridge::{BASE_STYLESHEET, FAVICON, KEY_THEME, TAB_FORMATTED, TAB_RAW, THEME_LINK_ID};
use crate::vm::config::ViewerConfig;
use crate::vm::controller::{Effect, InteractionController, ViewMode, ViewerEvent};

/// 替换原页面后的完整视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerPage {
    /// `<head>` 中追加的链接标签
    pub head_links: Vec<String>,
    pub body: String,
}

impl ViewerPage {
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        for link in &self.head_links {
            html.push_str(link);
            html.push('\n');
        }
        html.push_str("</head>\n<body>");
        html.push_str(&self.body);
        html.push_str("</body>\n</html>\n");
        html
    }
}

pub struct JsonViewer<C> {
    config: ViewerConfig,
    detector: Detector,
    store: Rc<dyn KeyValueStore>,
    bridge: PersistenceBridge<C>,
}

impl<C: MessageChannel> JsonViewer<C> {
    pub fn new(config: ViewerConfig, store: Rc<dyn KeyValueStore>, channel: C) -> Self {
        let detector = Detector::new(config.limits());
        let bridge = PersistenceBridge::new(store.clone(), channel);
        Self { config, detector, store, bridge }
    }

    /// 页面加载入口；返回 None 表示保持原始文本不变
    pub fn start(&self, doc: &RawDocument) -> Option<ViewerSession> {
        let Detection::Json(parsed) = self.detector.detect(doc) else {
            return None;
        };
        let text = doc.single_pre_block()?;

        // 未预解析时以原始文本交给特权侧解析
        let data = parsed
            .clone()
            .unwrap_or_else(|| Value::String(text.to_string()));
        let tree_html = self.bridge.tree_html(data);
        self.bridge.clear_ephemeral();
        let tree_html = tree_html?;

        let root = match parsed {
            Some(v) => v,
            None => match serde_json::from_str::<Value>(text) {
                Ok(v) => v,
                Err(e) => {
                    tracing::error!("内容侧解析失败: {}", e);
                    return None;
                }
            },
        };

        let theme = load_selected_theme(self.store.as_ref(), &self.config);
        let page = self.build_page(text, &tree_html, theme.as_ref());
        let controller = InteractionController::new(
            build_shadow_tree(&root),
            self.config.themes.clone(),
            theme.map(|t| t.id),
        );

        tracing::info!("已渲染JSON视图: {} ({} 个节点)", doc.url, controller.nodes().len());
        Some(ViewerSession {
            config: self.config.clone(),
            store: self.store.clone(),
            controller,
            root,
            page,
        })
    }

    fn build_page(&self, raw_text: &str, tree_html: &str, theme: Option<&Theme>) -> ViewerPage {
        let mut head_links = vec![format!(
            r#"<link rel="stylesheet" href="{}">"#,
            escape_html(&self.config.asset_url(BASE_STYLESHEET))
        )];
        if let Some(theme) = theme {
            head_links.push(theme_link(&self.config, theme));
        }
        head_links.push(format!(
            r#"<link rel="icon" href="{}">"#,
            escape_html(&self.config.asset_url(FAVICON))
        ));

        let body = format!(
            r#"<div class="app">{}<div class="views"><pre class="raw hidden">{}</pre><pre class="formatted">{}</pre></div></div>"#,
            self.control_bar(theme),
            escape_html(raw_text),
            tree_html
        );

        ViewerPage { head_links, body }
    }

    fn control_bar(&self, theme: Option<&Theme>) -> String {
        let mut radios = String::new();
        for (id, label, checked) in [("raw", TAB_RAW, false), ("formatted", TAB_FORMATTED, true)] {
            radios.push_str(&format!(
                r#"<input type="radio" name="jsonViewToggle" id="{id}Toggle" class="radio"{}><label for="{id}Toggle" class="tab">{label}</label>"#,
                if checked { " checked" } else { "" },
            ));
        }

        let selected_id = theme.map(|t| t.id.as_str());
        let options: String = self
            .config
            .themes
            .iter()
            .map(|t| {
                format!(
                    r#"<option value="{}"{}>{}</option>"#,
                    escape_html(&t.id),
                    if Some(t.id.as_str()) == selected_id { " selected" } else { "" },
                    escape_html(&t.name)
                )
            })
            .collect();

        format!(
            r#"<div class="control-bar"><div class="action-container"><div class="radio-group">{}</div><div class="json-path"></div></div><div class="theme-picker action-container"><select id="themeSelect">{}</select></div></div>"#,
            radios, options
        )
    }
}

fn theme_link(config: &ViewerConfig, theme: &Theme) -> String {
    format!(
        r#"<link rel="stylesheet" href="{}" id="{}">"#,
        escape_html(&config.theme_stylesheet_url(&theme.file_name)),
        THEME_LINK_ID
    )
}

/// 一次成功渲染后的交互会话
pub struct ViewerSession {
    config: ViewerConfig,
    store: Rc<dyn KeyValueStore>,
    controller: InteractionController,
    root: Value,
    page: ViewerPage,
}

impl ViewerSession {
    pub fn page(&self) -> &ViewerPage {
        &self.page
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// 当前悬停节点的值预览
    pub fn hovered_preview(&self) -> Option<String> {
        self.controller.hovered_preview(&self.root)
    }

    /// 分发界面事件；主题变更会持久化（失败只记录日志）
    pub fn dispatch(&mut self, event: ViewerEvent) -> Effect {
        let effect = self.controller.handle(event);
        if let Effect::ThemeChanged(theme) = &effect {
            let saved = serde_json::to_value(theme)
                .map_err(Into::into)
                .and_then(|v| self.store.save(KEY_THEME, v));
            if let Err(e) = saved {
                tracing::error!("保存主题失败: {}", e);
            }
            tracing::info!("主题已切换: {}", theme.id);
        }
        effect
    }

    /// 当前主题样式表地址
    pub fn theme_stylesheet_href(&self) -> Option<String> {
        self.controller
            .selected_theme()
            .map(|t| self.config.theme_stylesheet_url(&t.file_name))
    }

    pub fn raw_hidden(&self) -> bool {
        self.controller.view_mode() == ViewMode::Formatted
    }

    pub fn formatted_hidden(&self) -> bool {
        self.controller.view_mode() == ViewMode::Raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::error::AppError;
    use crate::model::renderer::render_tree;
    use crate::service::message::{LocalChannel, Request, Response};
    use crate::service::privileged::PrivilegedFormatter;
    use crate::service::storage::MemoryStore;
    use crate::vm::bridge::{KEY_HTML, KEY_TEMP_JSON_DATA};
    use serde_json::json;

    fn viewer(store: Rc<MemoryStore>) -> JsonViewer<LocalChannel<PrivilegedFormatter>> {
        let channel = LocalChannel::new(PrivilegedFormatter::new(store.clone()));
        JsonViewer::new(ViewerConfig::default(), store, channel)
    }

    fn json_doc(text: &str) -> RawDocument {
        RawDocument::new("https://example.com/api")
            .with_content_type("application/json")
            .with_pre_block(text)
    }

    struct Unresponsive;

    impl MessageChannel for Unresponsive {
        fn send(&self, _request: Request) -> Result<Response, AppError> {
            Ok(Response::error("missing data"))
        }
    }

    #[test]
    fn test_start_renders_declared_json() {
        let store = Rc::new(MemoryStore::new());
        let session = viewer(store.clone()).start(&json_doc(r#"{"a":[1,2]}"#)).expect("应渲染JSON视图");

        let body = &session.page().body;
        assert!(body.contains(&render_tree(&json!({"a": [1, 2]}))), "页面应包含渲染好的树");
        assert!(body.contains(r#"<pre class="raw hidden">{&quot;a&quot;:[1,2]}</pre>"#), "原始文本被转义并隐藏");
        assert!(body.contains(r#"id="formattedToggle" class="radio" checked"#));
        assert!(body.contains(r#"<option value="clear" selected>Clear</option>"#));
        assert!(session.raw_hidden() && !session.formatted_hidden());

        assert!(!store.contains(KEY_HTML), "暂存键应被清除");
        assert!(!store.contains(KEY_TEMP_JSON_DATA));
    }

    #[test]
    fn test_start_rejects_non_json() {
        let store = Rc::new(MemoryStore::new());
        let doc = RawDocument::new("https://example.com/").with_pre_block("<div>not json</div>");
        assert!(viewer(store).start(&doc).is_none());
    }

    #[test]
    fn test_bridge_failure_keeps_raw_text() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let v = JsonViewer::new(ViewerConfig::default(), store, Unresponsive);
        assert!(v.start(&json_doc(r#"{"a":1}"#)).is_none());

        // 声明为JSON但内容无效：特权侧解析失败
        let store = Rc::new(MemoryStore::new());
        assert!(viewer(store).start(&json_doc("{oops")).is_none());
    }

    #[test]
    fn test_page_uses_stored_theme() {
        let store = Rc::new(MemoryStore::new());
        store.save(KEY_THEME, json!({"name": "Abyssal", "fileName": "abyssal.css", "id": "abyssal"})).unwrap();

        let session = viewer(store).start(&json_doc("[]")).unwrap();
        let page = session.page();
        assert!(page.head_links.iter().any(|l| l.contains("abyssal.css") && l.contains(r#"id="theme""#)));
        assert!(page.body.contains(r#"<option value="abyssal" selected>"#));
        assert!(page.to_html().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_dispatch_theme_change_persists() {
        let store = Rc::new(MemoryStore::new());
        let mut session = viewer(store.clone()).start(&json_doc(r#"{"x":{"y":1}}"#)).unwrap();

        session.dispatch(ViewerEvent::ThemeSelected("tokyoNight".into()));
        assert_eq!(
            session.theme_stylesheet_href().as_deref(),
            Some("content/css/themes/tokyo-night.css")
        );
        assert_eq!(store.load(KEY_THEME, Value::Null).unwrap()["id"], json!("tokyoNight"));
    }

    #[test]
    fn test_dispatch_interactions() {
        let store = Rc::new(MemoryStore::new());
        let mut session = viewer(store).start(&json_doc(r#"{"x":{"y":1}}"#)).unwrap();

        session.dispatch(ViewerEvent::SelectView(ViewMode::Raw));
        assert!(session.formatted_hidden() && !session.raw_hidden());

        session.dispatch(ViewerEvent::PointerOver("$.x.y".into()));
        assert_eq!(session.controller().hovered_value(session.root()), Some(&json!(1)));
        assert_eq!(session.hovered_preview().as_deref(), Some("1"));

        session.dispatch(ViewerEvent::PointerOver("$.x".into()));
        let preview = session.hovered_preview().expect("容器节点也应有预览");
        assert_eq!(preview, "{\n  \"y\": 1\n}");

        session.dispatch(ViewerEvent::ToggleClicked { path: "$.x".into(), modifier: true });
        assert!(session.controller().is_collapsed("$.x"));
        assert!(session.controller().is_collapsed("$.x.y"), "批量折叠作用于所有后代条目");
    }
}
