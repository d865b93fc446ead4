//! Escape helpers：HTML实体转义与URL协议校验

use url::Url;

/// 允许自动转为超链接的URL协议
pub const ALLOWED_URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "file"];

/// 将文本中的HTML敏感字符替换为实体，防止文档内容被当作标记注入
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            other => out.push(other),
        }
    }
    out
}

/// 判断字符串能否解析为URL且协议在白名单内
pub fn is_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => ALLOWED_URL_SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}
