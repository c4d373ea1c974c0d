//! Shared helpers for integration tests.

use std::path::{Path, PathBuf};

use vole::index::merge_runs;
use vole::layout;
use vole::parse::{parse_collection, ParserConfig};

/// Write a collection file from (passage_id, text) pairs.
pub fn write_collection(dir: &Path, passages: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("collection.tsv");
    let mut contents = String::new();
    for (passage_id, text) in passages {
        contents.push_str(passage_id);
        contents.push('\t');
        contents.push_str(text);
        contents.push('\n');
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// Run the full parse + merge pipeline over `passages`, returning the work
/// directory (created under `dir`).
pub fn build_index(dir: &Path, passages: &[(&str, &str)]) -> PathBuf {
    let collection = write_collection(dir, passages);
    let work = dir.join("work");
    std::fs::create_dir_all(&work).unwrap();

    parse_collection(&collection, &work, &ParserConfig::default(), None).unwrap();
    let runs = layout::run_files(&work).unwrap();
    merge_runs(
        &runs,
        &work.join(layout::INDEX_FILE),
        &work.join(layout::LEXICON_FILE),
        None,
    )
    .unwrap();
    work
}
