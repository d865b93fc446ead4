//! JSON路径：构造、语法解析与按路径取值
//!
//! 路径以 `$` 为根，普通标识符键用 `.key`，其余键用 `['k\'ey']`，
//! 数组下标用 `[i]`。构造与解析互逆，同一路径总能还原为唯一的键/下标序列。

use jsonpath_rust::{JsonPath, query::queryable::Queryable};
use serde_json::Value;

use crate::model::error::AppError;

pub const ROOT_PATH: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// 对象成员的子路径
pub fn child_key_path(parent: &str, key: &str) -> String {
    if is_plain_key(key) {
        format!("{}.{}", parent, key)
    } else {
        let quoted = key.replace('\\', "\\\\").replace('\'', "\\'");
        format!("{}['{}']", parent, quoted)
    }
}

/// 数组元素的子路径
pub fn child_index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

/// 将路径字符串解析回键/下标序列
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, AppError> {
    let rest = path
        .strip_prefix('$')
        .ok_or_else(|| AppError::JsonPath(format!("路径必须以 $ 开头: {}", path)))?;
    let chars: Vec<char> = rest.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '.' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
                    end += 1;
                }
                let key: String = chars[start..end].iter().collect();
                if !is_plain_key(&key) {
                    return Err(AppError::JsonPath(format!("位置 {} 处的键名无效: {}", start, path)));
                }
                segments.push(PathSegment::Key(key));
                i = end;
            }
            '[' if chars.get(i + 1) == Some(&'\'') => {
                let mut key = String::new();
                let mut j = i + 2;
                loop {
                    match chars.get(j) {
                        Some('\\') => {
                            let escaped = chars.get(j + 1).ok_or_else(|| {
                                AppError::JsonPath(format!("转义序列未结束: {}", path))
                            })?;
                            key.push(*escaped);
                            j += 2;
                        }
                        Some('\'') => break,
                        Some(c) => {
                            key.push(*c);
                            j += 1;
                        }
                        None => return Err(AppError::JsonPath(format!("引号未闭合: {}", path))),
                    }
                }
                if chars.get(j + 1) != Some(&']') {
                    return Err(AppError::JsonPath(format!("缺少 ]: {}", path)));
                }
                segments.push(PathSegment::Key(key));
                i = j + 2;
            }
            '[' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end].is_ascii_digit() {
                    end += 1;
                }
                if end == start || chars.get(end) != Some(&']') {
                    return Err(AppError::JsonPath(format!("下标格式无效: {}", path)));
                }
                let digits: String = chars[start..end].iter().collect();
                let index = digits
                    .parse::<usize>()
                    .map_err(|e| AppError::JsonPath(format!("下标溢出 {}: {}", digits, e)))?;
                segments.push(PathSegment::Index(index));
                i = end + 1;
            }
            other => {
                return Err(AppError::JsonPath(format!("意外字符 '{}': {}", other, path)));
            }
        }
    }

    Ok(segments)
}

/// 由键/下标序列重新拼出路径字符串
pub fn format_path(segments: &[PathSegment]) -> String {
    segments.iter().fold(ROOT_PATH.to_string(), |acc, seg| match seg {
        PathSegment::Key(k) => child_key_path(&acc, k),
        PathSegment::Index(i) => child_index_path(&acc, *i),
    })
}

/// 沿解析出的路径段逐级取值
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path).ok()?;
    segments.iter().try_fold(root, |node, seg| match (seg, node) {
        (PathSegment::Key(k), Value::Object(map)) => map.get(k),
        (PathSegment::Index(i), Value::Array(arr)) => arr.get(*i),
        _ => None,
    })
}

/// 经 JSONPath 查询取得节点，格式化为多行JSON（用于悬停预览）
pub fn extract_subtree_pretty(root: &Value, path: &str) -> Result<String, AppError> {
    match root.query(path) {
        Ok(hits) => match hits.first() {
            Some(node) => Ok(serde_json::to_string_pretty(node)?),
            None => Err(AppError::JsonPath(format!("路径未命中任何节点: {}", path))),
        },
        Err(e) => Err(AppError::JsonPath(format!("JSONPath 无效 {}: {}", path, e))),
    }
}
