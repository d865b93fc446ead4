//! 外部协作方：键值存储、消息通道、特权侧格式化器、后台菜单

pub mod menu;
pub mod message;
pub mod persistence;
pub mod privileged;
pub mod storage;
