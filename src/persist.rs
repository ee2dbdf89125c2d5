//! On-disk corpus layout.
//!
//! ```text
//! <output_dir>/_corpus_info.json       run summary, written once
//! <output_dir>/000000.fulltext.txt     sanitized full text
//! <output_dir>/000000.metadatas.json   every other article field
//! ```
//!
//! Writes are plain whole-file overwrites.

use crate::coreapi::Article;
use crate::error::Result;
use crate::sanitize::remove_invalid_xml_chars;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Corpus summary file name
pub const CORPUS_INFO_FILE: &str = "_corpus_info.json";

const FULLTEXT_SUFFIX: &str = "fulltext.txt";
const METADATA_SUFFIX: &str = "metadatas.json";

/// Scope of a download run, as known before the first article is saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusInfo {
    pub query: String,
    pub total_hits: u64,
    pub max_articles: u64,
}

/// Path of the full-text file for a sequence id
pub fn fulltext_path(output_dir: &Path, sequence_id: u64) -> PathBuf {
    output_dir.join(format!("{:06}.{}", sequence_id, FULLTEXT_SUFFIX))
}

/// Path of the metadata file for a sequence id
pub fn metadata_path(output_dir: &Path, sequence_id: u64) -> PathBuf {
    output_dir.join(format!("{:06}.{}", sequence_id, METADATA_SUFFIX))
}

/// Save one article as a full-text file plus a metadata file.
///
/// The full text is taken out of the record and sanitized; the remaining
/// fields are serialized in their original order. Existing files are
/// overwritten.
pub fn save_article(sequence_id: u64, mut article: Article, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let fulltext = match article.take_full_text()? {
        Some(text) => text,
        None => {
            warn!(sequence_id = sequence_id, "Article has no full text, saving empty file");
            String::new()
        }
    };
    let fulltext = remove_invalid_xml_chars(&fulltext);

    let text_path = fulltext_path(output_dir, sequence_id);
    std::fs::write(&text_path, fulltext.as_bytes())?;

    let meta_path = metadata_path(output_dir, sequence_id);
    std::fs::write(&meta_path, serde_json::to_vec(&article)?)?;

    debug!(path = ?text_path, "Saved article");
    Ok(())
}

/// Write `_corpus_info.json` (pretty-printed, 4-space indent)
pub fn save_corpus_info(
    output_dir: &Path,
    query: &str,
    total_hits: u64,
    max_articles: u64,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let info = CorpusInfo {
        query: query.to_string(),
        total_hits,
        max_articles,
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    info.serialize(&mut ser)?;

    let path = output_dir.join(CORPUS_INFO_FILE);
    std::fs::write(&path, buf)?;
    debug!(path = ?path, "Saved corpus info");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn article(value: Value) -> Article {
        serde_json::from_value(value).expect("article")
    }

    #[test]
    fn test_paths_are_zero_padded() {
        let dir = Path::new("out");
        assert_eq!(fulltext_path(dir, 0), dir.join("000000.fulltext.txt"));
        assert_eq!(metadata_path(dir, 42), dir.join("000042.metadatas.json"));
        assert_eq!(metadata_path(dir, 1234567), dir.join("1234567.metadatas.json"));
    }

    #[test]
    fn test_save_article() -> Result<()> {
        let temp = TempDir::new()?;
        let out = temp.path().join("corpus");

        let record = article(json!({
            "id": "99",
            "title": "On Things",
            "fullText": "first\u{1}line\r\nsecond\u{B}line",
            "authors": ["A. Author"],
            "year": 2019
        }));
        save_article(7, record, &out)?;

        let text = std::fs::read_to_string(out.join("000007.fulltext.txt"))?;
        assert_eq!(text, "firstline\r\nsecondline");

        let meta = std::fs::read_to_string(out.join("000007.metadatas.json"))?;
        assert_eq!(
            meta,
            r#"{"id":"99","title":"On Things","authors":["A. Author"],"year":2019}"#
        );
        Ok(())
    }

    #[test]
    fn test_save_article_without_full_text() -> Result<()> {
        let temp = TempDir::new()?;
        save_article(0, article(json!({"id": 1, "fullText": null})), temp.path())?;

        assert_eq!(std::fs::read_to_string(fulltext_path(temp.path(), 0))?, "");
        assert_eq!(
            std::fs::read_to_string(metadata_path(temp.path(), 0))?,
            r#"{"id":1}"#
        );
        Ok(())
    }

    #[test]
    fn test_save_article_overwrites() -> Result<()> {
        let temp = TempDir::new()?;
        save_article(3, article(json!({"id": "a", "fullText": "old text"})), temp.path())?;
        save_article(3, article(json!({"id": "b", "fullText": "new"})), temp.path())?;

        assert_eq!(std::fs::read_to_string(fulltext_path(temp.path(), 3))?, "new");
        Ok(())
    }

    #[test]
    fn test_save_corpus_info() -> Result<()> {
        let temp = TempDir::new()?;
        save_corpus_info(temp.path(), "climate change", 1234, 100)?;

        let content = std::fs::read_to_string(temp.path().join(CORPUS_INFO_FILE))?;
        assert_eq!(
            content,
            "{\n    \"query\": \"climate change\",\n    \"total_hits\": 1234,\n    \"max_articles\": 100\n}"
        );

        let info: CorpusInfo = serde_json::from_str(&content)?;
        assert_eq!(info.total_hits, 1234);
        Ok(())
    }
}
