use std::fs;

use tempfile::TempDir;

use boolsearch::{
    load_corpus, BooleanRetrieval, DocId, Index, IndexBuilder, RetrievalSystem, SearchSettings,
    TfIdfRetrieval,
};

fn cat_index() -> Index {
    let mut builder = IndexBuilder::new();
    builder.add_document(1, "the cat sat");
    builder.add_document(2, "the cat ran");
    builder.build().unwrap()
}

fn fixture_index() -> Index {
    let docs = [
        (1, "Rust is a systems programming language."),
        (2, "The Rust compiler checks ownership and borrowing."),
        (3, "Python is a dynamic programming language."),
        (4, "Gardening tools: rakes, hoes and spades."),
        (5, "A programming language for systems: Rust, C, or Zig?"),
    ];

    let mut builder = IndexBuilder::new();
    for (doc_id, text) in docs {
        builder.add_document(doc_id, text);
    }
    builder.build().unwrap()
}

fn search(index: &Index, query: &str) -> Vec<DocId> {
    BooleanRetrieval::new(index, SearchSettings::default())
        .unwrap()
        .search(query)
        .unwrap()
}

#[test]
fn golden_cat_corpus() {
    let index = cat_index();

    let cat: Vec<DocId> = index
        .get_positional_postings("cat")
        .iter()
        .map(|p| p.doc_id)
        .collect();
    assert_eq!(cat, vec![1, 2]);

    assert_eq!(search(&index, "\"the cat\""), vec![1, 2]);
    assert_eq!(search(&index, "\"cat sat\""), vec![1]);
    assert_eq!(search(&index, "cat AND NOT ran"), vec![1]);
}

#[test]
fn golden_boolean_queries() {
    let index = fixture_index();

    assert_eq!(search(&index, "rust"), vec![1, 2, 5]);
    assert_eq!(search(&index, "rust AND NOT compiler"), vec![1, 5]);
    assert_eq!(search(&index, "python OR zig"), vec![3, 5]);
    assert_eq!(search(&index, "\"programming language\""), vec![1, 3, 5]);
    assert_eq!(search(&index, "\"programming language\" AND NOT (python OR zig)"), vec![1]);
    assert_eq!(search(&index, "systems /2 language"), vec![1, 5]);
    assert_eq!(search(&index, "NOT programming"), vec![2, 4]);
}

#[test]
fn golden_keywords_are_case_sensitive() {
    let index = fixture_index();
    // lowercase "or" is a term, not an operator; it only occurs in doc 5
    assert_eq!(search(&index, "rust or"), vec![5]);
}

#[test]
fn golden_misspelled_term_is_corrected() {
    let index = fixture_index();
    assert_eq!(search(&index, "pythn"), vec![3]);
    assert_eq!(search(&index, "gardenin AND tools"), vec![4]);
}

#[test]
fn golden_ranking_prefers_dense_matches() {
    let index = fixture_index();
    let system = TfIdfRetrieval::new(&index, SearchSettings::default()).unwrap();

    let results = system.retrieve("rust ownership").unwrap();
    assert_eq!(results[0].doc_id(), 2);
    assert!(!results.iter().any(|r| r.doc_id() == 4));
}

#[test]
fn golden_retrieve_k_properties() {
    let index = fixture_index();
    let system = TfIdfRetrieval::new(&index, SearchSettings::default()).unwrap();
    let query = "rust programming language systems";

    let top = system.retrieve_k(query, 5).unwrap();
    assert!(top.len() <= 5);
    assert!(top.windows(2).all(|w| w[0].score() >= w[1].score()));

    let all = system.retrieve(query).unwrap();
    assert_eq!(system.retrieve_k(query, index.num_docs()).unwrap(), all);
    assert_eq!(system.retrieve_k(query, 100).unwrap(), all);
}

#[test]
fn golden_systems_share_trait() {
    let index = cat_index();
    let systems: Vec<Box<dyn RetrievalSystem + '_>> = vec![
        Box::new(BooleanRetrieval::new(&index, SearchSettings::default()).unwrap()),
        Box::new(TfIdfRetrieval::new(&index, SearchSettings::default()).unwrap()),
    ];

    for system in &systems {
        let results = system.retrieve("sat").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id(), 1);
    }
}

#[test]
fn golden_corpus_directory_end_to_end() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("10"), "The quick brown fox").unwrap();
    fs::write(tmp.path().join("20"), "jumps over the lazy dog").unwrap();
    fs::write(tmp.path().join("30"), "--- === ---").unwrap();

    let index = load_corpus(tmp.path()).unwrap();
    assert_eq!(index.doc_ids(), &[10, 20]);
    assert_eq!(index.doc_len(30), Some(0));
    assert!((index.avg_doc_len() - 3.0).abs() < 1e-12);

    assert_eq!(search(&index, "the AND NOT fox"), vec![20]);
    assert_eq!(search(&index, "\"lazy dog\""), vec![20]);
}
