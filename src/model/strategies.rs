//! 性质测试用的生成器：任意JSON树与任意字符串

use proptest::prelude::*;
use serde_json::{Map, Number, Value};

/// 任意字符串（包含HTML特殊字符与非ASCII字符）
pub fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        ".*",
        "[<>&\"'/`= a-z中]{0,12}",
    ]
}

/// 任意JSON值，最多嵌套4层
pub fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_filter_map("只保留有限浮点数", |f| Number::from_f64(f).map(Value::Number)),
        arb_text().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_text(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}
