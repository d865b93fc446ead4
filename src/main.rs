//! 程序入口：初始化日志，把文件当作浏览器页面走完整流程，输出渲染后的HTML

use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::{Context, Result};
use tracing_subscriber::fmt::SubscriberBuilder;

use json_tree_viewer::service::message::LocalChannel;
use json_tree_viewer::service::privileged::PrivilegedFormatter;
use json_tree_viewer::service::storage::{KeyValueStore, MemoryStore};
use json_tree_viewer::utils::fs::read_text_file;
use json_tree_viewer::{JsonViewer, RawDocument, ViewerConfig};

const USAGE: &str = "用法: json_tree_viewer <file> [config.json]";

/// 按扩展名推断内容类型，模拟浏览器打开本地文件
fn document_for(path: &Path, text: String) -> RawDocument {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let content_type = if is_json { "application/json" } else { "text/plain" };

    RawDocument::new(format!("file://{}", path.display()))
        .with_content_type(content_type)
        .with_pre_block(text)
}

fn main() -> Result<()> {
    // 初始化日志输出，写到 stderr 以免污染页面输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .try_init();

    let mut args = std::env::args_os().skip(1);
    let input: PathBuf = args.next().map(PathBuf::from).context(USAGE)?;
    let config = match args.next() {
        Some(p) => {
            let p = PathBuf::from(p);
            ViewerConfig::from_file(&p).with_context(|| format!("配置加载失败: {}", p.display()))?
        }
        None => ViewerConfig::default(),
    };

    let text = read_text_file(&input).with_context(|| format!("读取文件失败: {}", input.display()))?;
    let doc = document_for(&input, text);

    let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
    let channel = LocalChannel::new(PrivilegedFormatter::new(store.clone()));
    let viewer = JsonViewer::new(config, store, channel);

    match viewer.start(&doc) {
        Some(session) => print!("{}", session.page().to_html()),
        None => {
            tracing::info!("未识别为JSON，原样输出: {}", input.display());
            print!("{}", doc.single_pre_block().unwrap_or_default());
        }
    }
    Ok(())
}
