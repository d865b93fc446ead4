//! Detector：按严格启发式判断页面文本是否为值得渲染的JSON
//!
//! 规则依次执行，命中任一否定条件立即返回 `Detection::NotJson`，
//! 任何情况下都不会向调用方传播错误。

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::document::RawDocument;

pub const DEFAULT_MAX_CHARACTERS: usize = 3_000_000;
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// 检测阈值（字符上限与嵌套深度上限）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorLimits {
    pub max_characters: usize,
    pub max_depth: usize,
}

impl Default for DetectorLimits {
    fn default() -> Self {
        Self {
            max_characters: DEFAULT_MAX_CHARACTERS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// 否定判定的原因（不是错误，只是分类结果）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    PreBlockCount(usize),
    Empty,
    TooLarge(usize),
    TooDeep(usize),
    HtmlMarkup,
    NotBracketed,
    StyledPage,
    Unparseable,
    ScalarRoot,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::PreBlockCount(n) => write!(f, "预格式化块数量为 {}，需要恰好1个", n),
            Rejection::Empty => write!(f, "内容为空"),
            Rejection::TooLarge(n) => write!(f, "内容过大: {} 个UTF-16码元", n),
            Rejection::TooDeep(d) => write!(f, "估算嵌套深度过大: {}", d),
            Rejection::HtmlMarkup => write!(f, "包含HTML标签"),
            Rejection::NotBracketed => write!(f, "首尾不是成对的括号"),
            Rejection::StyledPage => write!(f, "页面已有标题或样式表"),
            Rejection::Unparseable => write!(f, "JSON解析失败"),
            Rejection::ScalarRoot => write!(f, "顶层值不是对象或数组"),
        }
    }
}

/// 检测结果；`Json(Some(..))` 附带已解析的值以免重复解析
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    NotJson(Rejection),
    Json(Option<Value>),
}

impl Detection {
    pub fn is_json(&self) -> bool {
        matches!(self, Detection::Json(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Detector {
    limits: DetectorLimits,
}

impl Detector {
    pub fn new(limits: DetectorLimits) -> Self {
        Self { limits }
    }

    pub fn detect(&self, doc: &RawDocument) -> Detection {
        let decision = self.classify(doc);
        if let Detection::NotJson(reason) = &decision {
            tracing::debug!("页面未识别为JSON ({}): {}", doc.url, reason);
        }
        decision
    }

    fn classify(&self, doc: &RawDocument) -> Detection {
        let Some(text) = doc.single_pre_block() else {
            return Detection::NotJson(Rejection::PreBlockCount(doc.pre_blocks.len()));
        };

        if text.is_empty() {
            return Detection::NotJson(Rejection::Empty);
        }
        // 按 UTF-16 码元计数，与浏览器字符串长度一致
        let char_count = text.encode_utf16().count();
        if char_count > self.limits.max_characters {
            return Detection::NotJson(Rejection::TooLarge(char_count));
        }

        let depth = estimate_depth(text);
        if depth > self.limits.max_depth {
            return Detection::NotJson(Rejection::TooDeep(depth));
        }

        if declares_json(doc) {
            return Detection::Json(None);
        }

        if html_tag_pattern().is_match(text) {
            return Detection::NotJson(Rejection::HtmlMarkup);
        }
        if !is_bracketed(text) {
            return Detection::NotJson(Rejection::NotBracketed);
        }
        if doc.has_title_or_stylesheet {
            return Detection::NotJson(Rejection::StyledPage);
        }

        match serde_json::from_str::<Value>(text) {
            Ok(v @ (Value::Object(_) | Value::Array(_))) => Detection::Json(Some(v)),
            Ok(_) => Detection::NotJson(Rejection::ScalarRoot),
            Err(_) => Detection::NotJson(Rejection::Unparseable),
        }
    }
}

/// Content-Type 或 URL 后缀明确声明为JSON
fn declares_json(doc: &RawDocument) -> bool {
    let by_type = doc
        .content_type
        .as_deref()
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    by_type || doc.url.to_lowercase().ends_with(".json")
}

fn is_bracketed(text: &str) -> bool {
    let t = text.trim();
    (t.starts_with('{') && t.ends_with('}')) || (t.starts_with('[') && t.ends_with(']'))
}

fn html_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<[A-Za-z0-9_]+.*?>.*?</[A-Za-z0-9_]+.*?>").expect("静态正则必须合法")
    })
}

/// 单次线性扫描估算最大嵌套深度；忽略字符串字面量内的括号。
/// 只是解析前的廉价上界，不校验括号配对。
pub fn estimate_depth(text: &str) -> usize {
    let mut depth: usize = 0;
    let mut max_depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' | '[' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max_depth
}
