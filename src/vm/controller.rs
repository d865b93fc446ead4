//! 交互控制器：{原始视图, 格式化视图} × {各节点折叠状态} 的显式状态机
//!
//! 只依赖渲染器产出的路径，不需要真实DOM即可驱动与测试。

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::model::json_path::{extract_subtree_pretty, resolve_path};
use crate::model::shadow_tree::{descendants_of, TreeNode};
use crate::model::theme::{Theme, ThemeCatalog};
use crate::utils::escape::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    Raw,
    #[default]
    Formatted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// 单选按钮切换
    SelectView(ViewMode),
    PointerOver(String),
    PointerOut(String),
    /// 点击折叠标记或条目计数；`modifier` 为按住 Shift
    ToggleClicked { path: String, modifier: bool },
    ThemeSelected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    ViewChanged(ViewMode),
    PathDisplay(Option<String>),
    /// (路径, 是否折叠)
    Collapse(Vec<(String, bool)>),
    ThemeChanged(Theme),
}

pub struct InteractionController {
    nodes: Vec<TreeNode>,
    index: HashMap<String, usize>,
    collapsed: HashSet<String>,
    mode: ViewMode,
    hovered: Option<String>,
    themes: ThemeCatalog,
    selected_theme: Option<String>,
}

impl InteractionController {
    pub fn new(nodes: Vec<TreeNode>, themes: ThemeCatalog, selected_theme: Option<String>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.path.clone(), i))
            .collect();
        Self {
            nodes,
            index,
            collapsed: HashSet::new(),
            mode: ViewMode::default(),
            hovered: None,
            themes,
            selected_theme,
        }
    }

    pub fn handle(&mut self, event: ViewerEvent) -> Effect {
        match event {
            ViewerEvent::SelectView(mode) => {
                if self.mode == mode {
                    return Effect::None;
                }
                self.mode = mode;
                Effect::ViewChanged(mode)
            }
            ViewerEvent::PointerOver(path) => {
                if !self.index.contains_key(&path) {
                    tracing::warn!("悬停到未知路径: {}", path);
                    return Effect::None;
                }
                self.hovered = Some(path.clone());
                Effect::PathDisplay(Some(path))
            }
            ViewerEvent::PointerOut(path) => {
                if !self.index.contains_key(&path) {
                    return Effect::None;
                }
                self.hovered = None;
                Effect::PathDisplay(None)
            }
            ViewerEvent::ToggleClicked { path, modifier } => self.toggle(&path, modifier),
            ViewerEvent::ThemeSelected(id) => match self.themes.find(&id) {
                Some(theme) => {
                    let theme = theme.clone();
                    self.selected_theme = Some(theme.id.clone());
                    Effect::ThemeChanged(theme)
                }
                None => {
                    tracing::warn!("未知主题: {}", id);
                    Effect::None
                }
            },
        }
    }

    fn toggle(&mut self, path: &str, modifier: bool) -> Effect {
        let Some(&idx) = self.index.get(path) else {
            tracing::warn!("折叠未知路径: {}", path);
            return Effect::None;
        };
        // 只有容器条目与根条目带折叠标记
        if idx != 0 && !self.nodes[idx].kind.is_container() {
            return Effect::None;
        }

        let collapse = !self.collapsed.contains(path);
        let mut targets = vec![path.to_string()];
        if modifier {
            targets.extend(descendants_of(&self.nodes, idx).iter().map(|n| n.path.clone()));
        }

        let changes: Vec<(String, bool)> = targets.into_iter().map(|p| (p, collapse)).collect();
        for (p, state) in &changes {
            if *state {
                self.collapsed.insert(p.clone());
            } else {
                self.collapsed.remove(p);
            }
        }
        Effect::Collapse(changes)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        self.collapsed.contains(path)
    }

    /// 没有任何祖先处于折叠状态
    pub fn is_visible(&self, path: &str) -> bool {
        let Some(&idx) = self.index.get(path) else {
            return false;
        };
        let mut depth = self.nodes[idx].depth;
        for node in self.nodes[..idx].iter().rev() {
            if node.depth < depth {
                if self.collapsed.contains(&node.path) {
                    return false;
                }
                depth = node.depth;
            }
        }
        true
    }

    pub fn hovered_path(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// 路径显示区域的内容
    pub fn path_display_html(&self) -> String {
        self.hovered
            .as_deref()
            .map(|p| format!(r#"<span class="path">{}</span>"#, escape_html(p)))
            .unwrap_or_default()
    }

    pub fn hovered_value<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.hovered.as_deref().and_then(|p| resolve_path(root, p))
    }

    /// 悬停节点的多行JSON预览，经 JSONPath 查询取值
    pub fn hovered_preview(&self, root: &Value) -> Option<String> {
        let path = self.hovered.as_deref()?;
        match extract_subtree_pretty(root, path) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("悬停预览失败: {}", e);
                None
            }
        }
    }

    pub fn selected_theme(&self) -> Option<&Theme> {
        self.selected_theme.as_deref().and_then(|id| self.themes.find(id))
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }
}
