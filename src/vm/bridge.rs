//! 桥接常量：存储键、资源路径、界面文案
//!
//! 内容侧、特权侧与后台菜单共用这些常量，避免字面量在多处重复

// === 存储键（消除魔法值） ===
pub const KEY_TEMP_JSON_DATA: &str = "temp-json-data";
pub const KEY_HTML: &str = "HTML";
pub const KEY_THEME: &str = "theme";

// === 资源路径（相对于 asset_base） ===
pub const BASE_STYLESHEET: &str = "css/json.css";
pub const THEME_STYLESHEET_DIR: &str = "css/themes/";
pub const FAVICON: &str = "images/favicon.svg";
pub const THEME_LINK_ID: &str = "theme";

// === 界面文案 ===
pub const TAB_RAW: &str = "Raw";
pub const TAB_FORMATTED: &str = "Formatted";
pub const MENU_THEME: &str = "Theme";
pub const MENU_RATE: &str = "Rate";
pub const MENU_DONATE: &str = "Donate";

// === 菜单ID ===
pub const MENU_ID_THEMES: &str = "themes";
pub const MENU_ID_SEPARATOR: &str = "separator_2";
pub const MENU_ID_RATE: &str = "rate_extension";
pub const MENU_ID_DONATE: &str = "donate";
pub const MENU_CONTEXT_ACTION: &str = "action";
