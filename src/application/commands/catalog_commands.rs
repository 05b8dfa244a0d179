//! Catalog Commands - 种子数据

use serde::Deserialize;

/// 种子章节
#[derive(Debug, Clone, Deserialize)]
pub struct SeedChapter {
    pub title: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
}

/// 导入种子目录命令（仅在没有任何章节时生效）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedCatalog {
    #[serde(default)]
    pub chapters: Vec<SeedChapter>,
}
