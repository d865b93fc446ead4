//! RawDocument：浏览器展示的原始页面快照（捕获后不可变）

/// 页面捕获结果：预格式化文本块、声明的内容类型与URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    /// 页面中所有 `<pre>` 块的文本内容
    pub pre_blocks: Vec<String>,
    /// 声明的 Content-Type
    pub content_type: Option<String>,
    /// 页面地址
    pub url: String,
    /// 页面是否已有 title 或 stylesheet 链接（真实网页的信号）
    pub has_title_or_stylesheet: bool,
}

impl RawDocument {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_pre_block(mut self, text: impl Into<String>) -> Self {
        self.pre_blocks.push(text.into());
        self
    }

    pub fn with_page_chrome(mut self, has_title_or_stylesheet: bool) -> Self {
        self.has_title_or_stylesheet = has_title_or_stylesheet;
        self
    }

    /// 恰好只有一个预格式化块时返回其文本
    pub fn single_pre_block(&self) -> Option<&str> {
        match self.pre_blocks.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}
