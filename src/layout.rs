//! On-disk layout of a vole working directory.
//!
//! Every stage reads and writes well-known names under one directory, so the
//! CLI subcommands compose without plumbing a half-dozen paths around:
//!
//! ```text
//! work/
//! ├── runs/run_00001.txt ...   sorted posting runs (parse output)
//! ├── index.bin                block-compressed inverted index
//! ├── lexicon.txt              term -> (offset, length, doc frequency)
//! ├── document_lengths.txt     docID -> token count
//! ├── collection_stats.txt     total documents, average length
//! ├── page_table.txt           docID -> external passage id
//! └── passage_offsets.txt      docID -> byte offset in the collection
//! ```

use std::io;
use std::path::{Path, PathBuf};

pub const RUNS_DIR: &str = "runs";
pub const INDEX_FILE: &str = "index.bin";
pub const LEXICON_FILE: &str = "lexicon.txt";
pub const DOC_LENGTHS_FILE: &str = "document_lengths.txt";
pub const COLLECTION_STATS_FILE: &str = "collection_stats.txt";
pub const PAGE_TABLE_FILE: &str = "page_table.txt";
pub const PASSAGE_OFFSETS_FILE: &str = "passage_offsets.txt";

/// Name of the `n`-th run file. Zero-padded so lexicographic order is
/// creation order.
pub fn run_file_name(n: usize) -> String {
    format!("run_{:05}.txt", n)
}

/// All run files under `work_dir/runs`, sorted by name.
pub fn run_files(work_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let runs_dir = work_dir.join(RUNS_DIR);
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&runs_dir)?
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();
    Ok(paths)
}
