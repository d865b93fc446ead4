//! Renderer：将JSON值递归转换为可折叠树的HTML标记
//!
//! 输出只取决于输入值与根路径，同一输入总是得到逐字节相同的结果。
//! 每个条目都带有 `data-path`，供交互层按路径寻址。

use serde_json::{Number, Value};

use crate::model::json_path::{child_index_path, child_key_path, ROOT_PATH};
use crate::utils::escape::{escape_html, is_url};

const TOGGLE: &str = r#"<span class="toggle"></span>"#;

/// 以 `$` 为根渲染完整树
pub fn render_tree(value: &Value) -> String {
    render_tree_at(value, ROOT_PATH)
}

/// 以指定根路径渲染完整树，外层再包一层带折叠标记的列表
pub fn render_tree_at(value: &Value, root_path: &str) -> String {
    format!(
        r#"<ul class="nested-list"><li data-path="{}">{}{}</li></ul>"#,
        escape_html(root_path),
        TOGGLE,
        render_value(value, root_path)
    )
}

/// 渲染单个值（不含外层包装）
pub fn render_value(value: &Value, path: &str) -> String {
    let mut out = String::new();
    write_value(&mut out, value, path);
    out
}

/// 折叠状态下展示的条目数量提示
pub fn item_count_label(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => r#"<span class="item-count">... 1 item</span>"#.to_string(),
        n => format!(r#"<span class="item-count">... {} items</span>"#, n),
    }
}

fn write_value(out: &mut String, value: &Value, path: &str) {
    match value {
        Value::Null => out.push_str(r#"<span class="null">null</span>"#),
        Value::Bool(b) => {
            out.push_str(&format!(r#"<span class="boolean">{}</span>"#, b));
        }
        Value::Number(n) => {
            out.push_str(&format!(r#"<span class="number">{}</span>"#, format_number(n)));
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            out.push_str(&item_count_label(items.len()));
            out.push_str(r#"<ul class="nested-list">"#);
            let last = items.len().saturating_sub(1);
            for (idx, child) in items.iter().enumerate() {
                let child_path = child_index_path(path, idx);
                write_entry(out, None, child, &child_path, idx < last);
            }
            out.push_str("</ul>]");
        }
        Value::Object(map) => {
            out.push('{');
            out.push_str(&item_count_label(map.len()));
            out.push_str(r#"<ul class="nested-list">"#);
            let last = map.len().saturating_sub(1);
            for (idx, (key, child)) in map.iter().enumerate() {
                let child_path = child_key_path(path, key);
                write_entry(out, Some(key), child, &child_path, idx < last);
            }
            out.push_str("</ul>}");
        }
    }
}

/// 整数值的浮点数不带小数部分：`1e2` 显示为 `100`，`-0.0` 显示为 `0`
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{}", f),
        _ => n.to_string(),
    }
}

fn write_string(out: &mut String, s: &str) {
    let escaped = escape_html(s);
    if is_url(s) {
        out.push_str(&format!(
            r#"<span class="string">"<a href="{}" target="_blank">{}</a>"</span>"#,
            escaped, escaped
        ));
    } else {
        out.push_str(&format!(r#"<span class="string">"{}"</span>"#, escaped));
    }
}

fn write_entry(out: &mut String, key: Option<&str>, value: &Value, path: &str, has_next: bool) {
    out.push_str(&format!(r#"<li data-path="{}">"#, escape_html(path)));
    if matches!(value, Value::Array(_) | Value::Object(_)) {
        out.push_str(TOGGLE);
    }
    if let Some(key) = key {
        out.push_str(&format!(r#"<span class="key">"{}"</span>: "#, escape_html(key)));
    }
    write_value(out, value, path);
    if has_next {
        out.push(',');
    }
    out.push_str("</li>");
}
