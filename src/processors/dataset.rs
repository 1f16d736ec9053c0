//! Evaluation dataset construction and loading

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::core::errors::{BenchmarkError, Result};
use crate::core::models::TranslationItem;
use crate::providers::is_recognized_language;

/// On-disk row; field names differ from [`TranslationItem`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DatasetRow {
    id: u32,
    text: String,
    target_language: String,
    reference: String,
}

impl From<&TranslationItem> for DatasetRow {
    fn from(item: &TranslationItem) -> Self {
        Self {
            id: item.id,
            text: item.source_text.clone(),
            target_language: item.target_language.clone(),
            reference: item.reference_text.clone(),
        }
    }
}

fn file_error(path: &Path, e: impl ToString) -> BenchmarkError {
    BenchmarkError::FileError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Load and validate a dataset file; any malformed row aborts the load
pub fn load_dataset(path: &Path) -> Result<Vec<TranslationItem>> {
    let content = std::fs::read_to_string(path).map_err(|e| file_error(path, e))?;
    let rows: Vec<DatasetRow> = serde_json::from_str(&content)?;

    let mut seen = HashSet::with_capacity(rows.len());
    let mut items = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        let position = index + 1;
        if row.id == 0 {
            return Err(BenchmarkError::dataset(position, "id must be 1-based"));
        }
        if !seen.insert(row.id) {
            return Err(BenchmarkError::dataset(position, format!("duplicate id {}", row.id)));
        }
        if row.text.trim().is_empty() {
            return Err(BenchmarkError::dataset(position, "empty text"));
        }
        if row.reference.trim().is_empty() {
            return Err(BenchmarkError::dataset(position, "empty reference"));
        }
        if !is_recognized_language(&row.target_language) {
            return Err(BenchmarkError::dataset(
                position,
                format!("unrecognized target language {:?}", row.target_language),
            ));
        }

        items.push(TranslationItem::new(
            row.id,
            row.text,
            row.target_language,
            row.reference,
        ));
    }

    info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Pair up a line-aligned parallel corpus, skipping pairs with an empty side
pub fn build_dataset(
    source_path: &Path,
    target_path: &Path,
    num_pairs: usize,
    target_language: &str,
) -> Result<Vec<TranslationItem>> {
    if !is_recognized_language(target_language) {
        return Err(BenchmarkError::config(format!(
            "unrecognized target language {:?}",
            target_language
        )));
    }

    let source = BufReader::new(std::fs::File::open(source_path).map_err(|e| file_error(source_path, e))?);
    let target = BufReader::new(std::fs::File::open(target_path).map_err(|e| file_error(target_path, e))?);

    let mut items = Vec::with_capacity(num_pairs);
    for (source_line, target_line) in source.lines().zip(target.lines()) {
        if items.len() >= num_pairs {
            break;
        }

        let source_line = source_line?;
        let target_line = target_line?;
        let (text, reference) = (source_line.trim(), target_line.trim());

        if text.is_empty() || reference.is_empty() {
            debug!("Skipping pair with an empty side");
            continue;
        }

        let id = items.len() as u32 + 1;
        items.push(TranslationItem::new(id, text, target_language, reference));
    }

    info!("Created dataset with {} source to target translation pairs", items.len());
    Ok(items)
}

/// Write items in the dataset file format
pub fn save_dataset(items: &[TranslationItem], path: &Path) -> Result<()> {
    let rows: Vec<DatasetRow> = items.iter().map(DatasetRow::from).collect();

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    rows.serialize(&mut serializer)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| file_error(parent, e))?;
        }
    }
    std::fs::write(path, buffer).map_err(|e| file_error(path, e))?;

    info!("Saved {} items to {}", items.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_build_skips_empty_pairs_and_limits() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "en.txt", "Hello\n\nGood morning\nThank you\nBye\n");
        let target = write(&dir, "es.txt", "Hola\nVacío\nBuenos días\n  Gracias  \nAdiós\n");

        let items = assert_ok!(build_dataset(&source, &target, 3, "ES"));

        assert_eq!(items.len(), 3);
        assert_eq!(items[0], TranslationItem::new(1, "Hello", "ES", "Hola"));
        assert_eq!(items[1], TranslationItem::new(2, "Good morning", "ES", "Buenos días"));
        assert_eq!(items[2], TranslationItem::new(3, "Thank you", "ES", "Gracias"));
    }

    #[test]
    fn test_save_then_load_uses_file_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datasets").join("dataset_english_spanish.json");
        let items = vec![
            TranslationItem::new(1, "Hello", "ES", "Hola"),
            TranslationItem::new(2, "Good morning", "ES", "Buenos días"),
        ];

        save_dataset(&items, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""text": "Good morning""#));
        assert!(raw.contains(r#""reference": "Buenos días""#));
        assert_eq!(load_dataset(&path).unwrap(), items);
    }

    #[test]
    fn test_load_rejects_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let cases = [
            (r#"[{"id": 1, "text": "", "target_language": "ES", "reference": "Hola"}]"#, 1),
            (
                r#"[{"id": 1, "text": "Hi", "target_language": "ES", "reference": "Hola"},
                    {"id": 1, "text": "Bye", "target_language": "ES", "reference": "Adiós"}]"#,
                2,
            ),
            (r#"[{"id": 1, "text": "Hi", "target_language": "QQ", "reference": "Hola"}]"#, 1),
        ];

        for (content, bad_row) in cases {
            let path = write(&dir, "dataset.json", content);
            match load_dataset(&path) {
                Err(BenchmarkError::DatasetError { row, .. }) => assert_eq!(row, bad_row),
                other => panic!("expected dataset error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_load_rejects_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "dataset.json", r#"[{"id": 1, "text": "Hi"}]"#);
        assert!(matches!(load_dataset(&path), Err(BenchmarkError::JsonError(_))));
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = load_dataset(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(matches!(err, BenchmarkError::FileError { .. }));
    }
}
