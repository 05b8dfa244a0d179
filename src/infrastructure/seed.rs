//! Seed Loader - 从 TOML 文件读取种子章节
//!
//! 文件格式：
//!
//! ```toml
//! [[chapters]]
//! title = "Capítulo primero"
//! paragraphs = [
//!     "En un lugar de la Mancha...",
//!     "Es, pues, de saber...",
//! ]
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::application::SeedCatalog;

/// 种子文件错误
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 解析种子 TOML 文本
pub fn parse_seed(text: &str) -> Result<SeedCatalog, toml::de::Error> {
    toml::from_str(text)
}

/// 读取并解析种子文件
pub async fn load_seed_file(path: &Path) -> Result<SeedCatalog, SeedError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let catalog = parse_seed(&text).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = ?path,
        chapters = catalog.chapters.len(),
        "Seed file loaded"
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chapters_in_file_order() {
        let catalog = parse_seed(
            r#"
[[chapters]]
title = "I"
paragraphs = ["uno", "dos"]

[[chapters]]
title = "II"
"#,
        )
        .unwrap();

        assert_eq!(catalog.chapters.len(), 2);
        assert_eq!(catalog.chapters[0].paragraphs, vec!["uno", "dos"]);
        assert!(catalog.chapters[1].paragraphs.is_empty());
    }

    #[test]
    fn test_chapter_without_title_is_rejected() {
        assert!(parse_seed("[[chapters]]\nparagraphs = [\"x\"]\n").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_seed_file(&dir.path().join("nope.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
