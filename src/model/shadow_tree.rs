//! 影子树（Shadow Tree）：仅存结构与路径，不复制值本身
//!
//! 节点按先序排列，路径字符串与渲染器写入 `data-path` 的完全一致，
//! 是交互层事件与底层值之间的连接键。

use serde_json::Value;

use crate::model::json_path::{child_index_path, child_key_path, ROOT_PATH};

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl NodeKind {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            Value::String(_) => NodeKind::String,
            Value::Number(_) => NodeKind::Number,
            Value::Bool(_) => NodeKind::Bool,
            Value::Null => NodeKind::Null,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Array)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// 节点在父级中的键名或索引的字符串形式
    pub name: String,
    /// 规范路径（`$`、`$.key`、`$[i]`）
    pub path: String,
    pub kind: NodeKind,
    /// 直接子元素数量（对象字段数 / 数组长度）
    pub children: usize,
    /// 节点深度（根为0）
    pub depth: usize,
}

/// 从根 Value 构建全树影子索引
pub fn build_shadow_tree(root: &Value) -> Vec<TreeNode> {
    fn walk(out: &mut Vec<TreeNode>, v: &Value, path: String, name: String, depth: usize) {
        let children = match v {
            Value::Object(m) => m.len(),
            Value::Array(a) => a.len(),
            _ => 0,
        };
        out.push(TreeNode {
            name,
            path: path.clone(),
            kind: NodeKind::of(v),
            children,
            depth,
        });
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    walk(out, child, child_key_path(&path, k), k.clone(), depth + 1);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    walk(out, child, child_index_path(&path, idx), format!("[{}]", idx), depth + 1);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::with_capacity(1024);
    walk(&mut out, root, ROOT_PATH.to_string(), ROOT_PATH.to_string(), 0);
    out
}

/// 先序序列中 `idx` 节点的全部后代（连续区间）
pub fn descendants_of(nodes: &[TreeNode], idx: usize) -> &[TreeNode] {
    let Some(node) = nodes.get(idx) else {
        return &[];
    };
    let start = idx + 1;
    let end = nodes[start..]
        .iter()
        .position(|n| n.depth <= node.depth)
        .map(|offset| start + offset)
        .unwrap_or(nodes.len());
    &nodes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::json_path::resolve_path;
    use serde_json::json;

    #[test]
    fn test_simple_object_shadow_tree() {
        let json = json!({
            "name": "测试",
            "age": 30
        });

        let tree = build_shadow_tree(&json);

        // 应该有3个节点：根、name、age
        assert_eq!(tree.len(), 3);
        assert_eq!(tree[0].name, "$");
        assert_eq!(tree[0].path, "$");
        assert_eq!(tree[0].kind, NodeKind::Object);
        assert_eq!(tree[0].children, 2);

        // 键按插入顺序排列
        assert_eq!(tree[1].path, "$.name");
        assert_eq!(tree[2].path, "$.age");
        assert_eq!(tree[2].kind, NodeKind::Number);
    }

    #[test]
    fn test_nested_object_shadow_tree() {
        let json = json!({
            "user": {
                "profile": {
                    "name": "张三"
                }
            }
        });

        let tree = build_shadow_tree(&json);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree[0].path, "$");
        assert_eq!(tree[1].path, "$.user");
        assert_eq!(tree[2].path, "$.user.profile");
        assert_eq!(tree[3].path, "$.user.profile.name");
        assert_eq!(tree[3].depth, 3);
    }

    #[test]
    fn test_array_shadow_tree() {
        let json = json!({
            "items": [
                "第一项",
                {"id": 1},
                [1, 2, 3]
            ]
        });

        let tree = build_shadow_tree(&json);

        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "$", "$.items", "$.items[0]", "$.items[1]", "$.items[1].id",
                "$.items[2]", "$.items[2][0]", "$.items[2][1]", "$.items[2][2]",
            ]
        );
    }

    #[test]
    fn test_special_characters_in_keys() {
        let json = json!({
            "normal_key": "value1",
            "key with spaces": "value2",
            "key.with.dots": "value4",
            "key'with'quotes": "value5"
        });

        let tree = build_shadow_tree(&json);

        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert!(paths.contains(&"$.normal_key"));
        assert!(paths.contains(&"$['key with spaces']"));
        assert!(paths.contains(&"$['key.with.dots']"));
        assert!(paths.contains(&"$['key\\'with\\'quotes']"));
    }

    #[test]
    fn test_child_counts_match_direct_children() {
        let json = json!({"a": [1, {"b": [], "c": [null]}], "d": {}});
        let tree = build_shadow_tree(&json);

        for (idx, node) in tree.iter().enumerate() {
            let direct = descendants_of(&tree, idx)
                .iter()
                .filter(|n| n.depth == node.depth + 1)
                .count();
            assert_eq!(node.children, direct, "节点 {} 的子元素计数不一致", node.path);
        }
    }

    #[test]
    fn test_every_path_resolves_back_to_value() {
        let json = json!({"a b": [{"c": 1}], "x": {"y'z": [true, null]}});
        for node in build_shadow_tree(&json) {
            let value = resolve_path(&json, &node.path)
                .unwrap_or_else(|| panic!("路径无法还原: {}", node.path));
            assert_eq!(NodeKind::of(value), node.kind);
        }
    }

    #[test]
    fn test_descendants_range() {
        let json = json!({"a": {"b": 1, "c": [2]}, "d": 3});
        let tree = build_shadow_tree(&json);

        let under_a: Vec<&str> = descendants_of(&tree, 1).iter().map(|n| n.path.as_str()).collect();
        assert_eq!(under_a, vec!["$.a.b", "$.a.c", "$.a.c[0]"]);
        assert_eq!(descendants_of(&tree, 0).len(), tree.len() - 1, "根的后代是其余所有节点");
        assert!(descendants_of(&tree, 99).is_empty());
    }
}
