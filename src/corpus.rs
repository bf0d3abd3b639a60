//! Corpus loading
//!
//! A corpus is a directory holding one regular file per document. The file
//! name is the document id; subdirectories are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SearchError};
use crate::index::{DocId, Index, IndexBuilder};
use crate::tokenizer::Tokenizer;

/// Parse a document id from a file name
pub fn parse_doc_id(path: &Path) -> Result<DocId> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SearchError::InvalidDocId(path.display().to_string()))?;

    name.parse()
        .map_err(|_| SearchError::InvalidDocId(name.to_string()))
}

/// List the regular files of a directory, sorted by name
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Document files of a corpus directory keyed by document id
pub fn read_documents(dir: impl AsRef<Path>) -> Result<BTreeMap<DocId, PathBuf>> {
    let mut documents = BTreeMap::new();
    for path in list_files(dir.as_ref())? {
        let doc_id = parse_doc_id(&path)?;
        if let Some(previous) = documents.insert(doc_id, path) {
            return Err(SearchError::InvalidDocId(format!(
                "{} (also used by {})",
                doc_id,
                previous.display()
            )));
        }
    }
    Ok(documents)
}

/// Build an index over every document in `dir`
pub fn load_corpus(dir: impl AsRef<Path>) -> Result<Index> {
    let dir = dir.as_ref();
    let tokenizer = Tokenizer::new();
    let mut builder = IndexBuilder::new();

    let documents = read_documents(dir)?;
    for (&doc_id, path) in &documents {
        let tokens = tokenizer.tokenize_file(path)?;
        let length = tokens.last().map_or(0, |(_, position)| position + 1);
        for (term, position) in &tokens {
            builder.add(term, doc_id, *position);
        }
        builder.set_doc_len(doc_id, length);
        debug!(doc_id, length, "Indexed document");
    }

    let index = builder.build()?;
    info!(
        documents = documents.len(),
        terms = index.num_terms(),
        path = %dir.display(),
        "Loaded corpus"
    );
    Ok(index)
}

/// Read a directory of query files keyed by file name
pub fn read_queries(dir: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
    let mut queries = BTreeMap::new();
    for path in list_files(dir.as_ref())? {
        let id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        queries.insert(id, fs::read_to_string(&path)?);
    }
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) {
        fs::write(dir.path().join(name), text).unwrap();
    }

    #[test]
    fn test_parse_doc_id() {
        assert_eq!(parse_doc_id(Path::new("/corpus/42")).unwrap(), 42);
        assert!(matches!(
            parse_doc_id(Path::new("/corpus/readme.txt")),
            Err(SearchError::InvalidDocId(_))
        ));
    }

    #[test]
    fn test_load_corpus() {
        let dir = TempDir::new().unwrap();
        write(&dir, "1", "The cat sat.");
        write(&dir, "2", "The cat ran!");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let index = load_corpus(dir.path()).unwrap();
        assert_eq!(index.doc_ids(), &[1, 2]);
        assert_eq!(index.doc_len(1), Some(3));
        assert_eq!(index.get_positional_postings("cat").len(), 2);
    }

    #[test]
    fn test_load_corpus_rejects_bad_names() {
        let dir = TempDir::new().unwrap();
        write(&dir, "1", "text");
        write(&dir, "notes", "text");

        assert!(matches!(
            load_corpus(dir.path()),
            Err(SearchError::InvalidDocId(_))
        ));
    }

    #[test]
    fn test_duplicate_doc_ids() {
        let dir = TempDir::new().unwrap();
        write(&dir, "7", "a");
        write(&dir, "007", "b");

        assert!(matches!(
            read_documents(dir.path()),
            Err(SearchError::InvalidDocId(_))
        ));
    }

    #[test]
    fn test_empty_and_missing_directories() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_corpus(dir.path()),
            Err(SearchError::EmptyCorpus)
        ));
        assert!(matches!(
            load_corpus(dir.path().join("missing")),
            Err(SearchError::Io(_))
        ));
    }

    #[test]
    fn test_read_queries() {
        let dir = TempDir::new().unwrap();
        write(&dir, "1", "cat food");
        write(&dir, "2", "dog");

        let queries = read_queries(dir.path()).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries["1"], "cat food");
    }
}
