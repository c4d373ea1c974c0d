// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The query processor: lexicon + sidecar stats + DAAT evaluation.
//!
//! [`QueryEngine::open`] loads everything a query needs up front (lexicon,
//! document lengths, collection stats, page table) and fails fast if any
//! of it is missing. Evaluation then opens one cursor per resolvable query
//! term and hands them to the DAAT loops. Engines are cheap to keep around;
//! cursors live only for the duration of one query.

pub mod bm25;
pub mod daat;
pub mod stats;
pub mod topk;

pub use bm25::Bm25;
pub use stats::{CollectionStats, DocumentLengths, PageTable, PassageStore};
pub use topk::ScoredDoc;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::index::{InvertedList, Lexicon};
use crate::layout;
use crate::parse::tokenize;

use daat::TermCursor;

/// How multiple query terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Documents must contain every term (AND).
    Conjunctive,
    /// Documents may contain any term (OR).
    Disjunctive,
}

/// A loaded index ready to answer ranked queries.
pub struct QueryEngine {
    index_path: PathBuf,
    lexicon: Lexicon,
    doc_lengths: DocumentLengths,
    page_table: PageTable,
    scorer: Bm25,
}

impl QueryEngine {
    /// Load the index artifacts from a working directory. Every input is
    /// required; a missing file aborts startup.
    pub fn open(work_dir: &Path) -> io::Result<Self> {
        let index_path = work_dir.join(layout::INDEX_FILE);
        if !index_path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("index file not found: {}", index_path.display()),
            ));
        }
        let lexicon = Lexicon::load(&work_dir.join(layout::LEXICON_FILE))?;
        let doc_lengths = DocumentLengths::load(&work_dir.join(layout::DOC_LENGTHS_FILE))?;
        let collection_stats = CollectionStats::load(&work_dir.join(layout::COLLECTION_STATS_FILE))?;
        let page_table = PageTable::load(&work_dir.join(layout::PAGE_TABLE_FILE))?;

        Ok(QueryEngine {
            index_path,
            lexicon,
            doc_lengths,
            page_table,
            scorer: Bm25::new(collection_stats.total_docs, collection_stats.avg_doc_len),
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// External passage id for a docID, when the page table knows it.
    pub fn passage_id(&self, doc_id: u32) -> Option<&str> {
        self.page_table.get(doc_id)
    }

    /// Evaluate one tokenized query.
    ///
    /// Conjunctive: any term missing from the lexicon short-circuits to an
    /// empty result. Disjunctive: missing terms are dropped and the rest
    /// evaluated. Cursors close on every path out.
    pub fn evaluate(&self, terms: &[String], mode: QueryMode, k: usize) -> io::Result<Vec<ScoredDoc>> {
        let mut cursors = Vec::with_capacity(terms.len());
        for term in terms {
            match self.lexicon.get(term) {
                Some(entry) => {
                    let list = InvertedList::open(&self.index_path, term, entry)?;
                    cursors.push(TermCursor {
                        list,
                        doc_frequency: entry.doc_frequency,
                    });
                }
                None if mode == QueryMode::Conjunctive => return Ok(Vec::new()),
                None => {}
            }
        }

        let results = match mode {
            QueryMode::Conjunctive => {
                daat::conjunctive(cursors, &self.doc_lengths, &self.scorer, k)
            }
            QueryMode::Disjunctive => {
                daat::disjunctive(cursors, &self.doc_lengths, &self.scorer, k)
            }
        };
        Ok(results)
    }

    /// Tokenize free text and evaluate it.
    pub fn evaluate_text(&self, text: &str, mode: QueryMode, k: usize) -> io::Result<Vec<ScoredDoc>> {
        self.evaluate(&tokenize(text), mode, k)
    }

    /// Run a batch query file and write TREC-format results.
    ///
    /// Input: one `queryID<TAB>text` per line (any whitespace after the id
    /// is tolerated). Output: `queryID Q0 passageID rank score STANDARD`
    /// lines, rank starting at 1 per query. Returns the number of queries
    /// evaluated.
    pub fn run_batch(
        &self,
        queries_path: &Path,
        output_path: &Path,
        mode: QueryMode,
        k: usize,
    ) -> io::Result<usize> {
        let reader = BufReader::new(File::open(queries_path)?);
        let mut out = BufWriter::new(File::create(output_path)?);
        let mut evaluated = 0;

        for line in reader.lines() {
            let line = line?;
            let Some((query_id, text)) = split_query_line(&line) else {
                continue;
            };
            let results = self.evaluate_text(text, mode, k)?;
            for (rank, result) in results.iter().enumerate() {
                // Fall back to the internal docID when the page table has
                // no external id for it.
                let doc_id = result.doc_id.to_string();
                let passage_id = self.passage_id(result.doc_id).unwrap_or(&doc_id);
                writeln!(
                    out,
                    "{} Q0 {} {} {:.6} STANDARD",
                    query_id,
                    passage_id,
                    rank + 1,
                    result.score
                )?;
            }
            evaluated += 1;
        }

        out.flush()?;
        Ok(evaluated)
    }
}

/// Split a batch query line into (id, text). Blank lines and lines with no
/// id yield `None`.
fn split_query_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return None;
    }
    let split_at = line.find(char::is_whitespace)?;
    let (query_id, rest) = line.split_at(split_at);
    Some((query_id, rest.trim_start()))
}
