// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The parser stage: raw passage collection -> sorted runs + sidecar stats.
//!
//! Input is one passage per line, `passage_id<TAB>text`. A single
//! sequential pass assigns dense docIDs in file order, tokenizes each
//! passage, and buffers `(term, docID, tf)` postings in memory. When the
//! buffer reaches its cap it is sorted by (term, docID) and spilled as one
//! run file; the merger later stitches the runs back together. Alongside
//! the runs the pass collects everything the query processor will need:
//! token counts per document, the collection totals, the external passage
//! ids, and each passage's byte offset for snippet fetch.
//!
//! Tokenization is deliberately blunt: ASCII punctuation becomes a space,
//! letters fold to ASCII lowercase, and any token still carrying a
//! non-ASCII byte is dropped. Stemming and stopping are out of scope.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use indicatif::ProgressBar;

use crate::layout;

/// Buffered postings before a spill. Roughly bounds parser memory.
pub const DEFAULT_RUN_CAPACITY: usize = 4 * 1024 * 1024;

/// Parser knobs.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    /// Postings buffered before sorting and spilling one run.
    pub run_capacity: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            run_capacity: DEFAULT_RUN_CAPACITY,
        }
    }
}

/// Summary of one parse, for CLI reporting.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParseStats {
    pub documents: u32,
    pub tokens: u64,
    pub postings: u64,
    pub runs: usize,
}

/// Lowercased ASCII tokens of `text`; punctuation splits, non-ASCII drops.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_punctuation() {
            cleaned.push(' ');
        } else {
            cleaned.push(ch.to_ascii_lowercase());
        }
    }
    cleaned
        .split_whitespace()
        .filter(|token| token.is_ascii())
        .map(str::to_string)
        .collect()
}

/// Parse a collection file into sorted runs and sidecar stats under
/// `work_dir`.
///
/// `progress`, when present, should have its length set to the collection's
/// byte size; the pass advances it as lines are consumed.
pub fn parse_collection(
    collection_path: &Path,
    work_dir: &Path,
    config: &ParserConfig,
    progress: Option<&ProgressBar>,
) -> io::Result<ParseStats> {
    let runs_dir = work_dir.join(layout::RUNS_DIR);
    fs::create_dir_all(&runs_dir)?;

    let mut reader = BufReader::new(File::open(collection_path)?);
    let mut line = String::new();
    let mut offset: u64 = 0;

    let mut postings: Vec<(String, u32, u32)> = Vec::new();
    let mut doc_lengths: Vec<u32> = Vec::new();
    let mut page_table: Vec<String> = Vec::new();
    let mut passage_offsets: Vec<u64> = Vec::new();
    let mut term_freqs: HashMap<String, u32> = HashMap::new();

    let mut stats = ParseStats::default();
    let mut doc_id: u32 = 0;

    loop {
        line.clear();
        let bytes = reader.read_line(&mut line)?;
        if bytes == 0 {
            break;
        }
        let line_offset = offset;
        offset += bytes as u64;
        if let Some(pb) = progress {
            pb.inc(bytes as u64);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.is_empty() {
            continue;
        }
        let (passage_id, text) = trimmed.split_once('\t').unwrap_or((trimmed, ""));

        passage_offsets.push(line_offset);
        page_table.push(passage_id.to_string());

        let tokens = tokenize(text);
        doc_lengths.push(tokens.len() as u32);
        stats.tokens += tokens.len() as u64;

        term_freqs.clear();
        for token in tokens {
            *term_freqs.entry(token).or_insert(0) += 1;
        }
        for (term, freq) in term_freqs.drain() {
            postings.push((term, doc_id, freq));
        }

        if postings.len() >= config.run_capacity {
            spill_run(&runs_dir, &mut postings, &mut stats)?;
        }

        doc_id += 1;
    }

    if !postings.is_empty() {
        spill_run(&runs_dir, &mut postings, &mut stats)?;
    }

    stats.documents = doc_id;
    write_sidecars(work_dir, &doc_lengths, &page_table, &passage_offsets, &stats)?;
    Ok(stats)
}

/// Sort the buffered postings and write them out as the next run file.
fn spill_run(
    runs_dir: &Path,
    postings: &mut Vec<(String, u32, u32)>,
    stats: &mut ParseStats,
) -> io::Result<()> {
    postings.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    stats.runs += 1;
    let path = runs_dir.join(layout::run_file_name(stats.runs));
    let mut out = BufWriter::new(File::create(&path)?);
    for (term, doc_id, freq) in postings.iter() {
        writeln!(out, "{} {} {}", term, doc_id, freq)?;
    }
    out.flush()?;

    stats.postings += postings.len() as u64;
    postings.clear();
    Ok(())
}

fn write_sidecars(
    work_dir: &Path,
    doc_lengths: &[u32],
    page_table: &[String],
    passage_offsets: &[u64],
    stats: &ParseStats,
) -> io::Result<()> {
    let mut lengths_out =
        BufWriter::new(File::create(work_dir.join(layout::DOC_LENGTHS_FILE))?);
    for (doc_id, length) in doc_lengths.iter().enumerate() {
        writeln!(lengths_out, "{} {}", doc_id, length)?;
    }
    lengths_out.flush()?;

    let mut stats_out =
        BufWriter::new(File::create(work_dir.join(layout::COLLECTION_STATS_FILE))?);
    let avg = if stats.documents > 0 {
        stats.tokens as f64 / f64::from(stats.documents)
    } else {
        0.0
    };
    writeln!(stats_out, "{} {}", stats.documents, avg)?;
    stats_out.flush()?;

    let mut pages_out = BufWriter::new(File::create(work_dir.join(layout::PAGE_TABLE_FILE))?);
    for (doc_id, passage_id) in page_table.iter().enumerate() {
        writeln!(pages_out, "{} {}", doc_id, passage_id)?;
    }
    pages_out.flush()?;

    let mut offsets_out =
        BufWriter::new(File::create(work_dir.join(layout::PASSAGE_OFFSETS_FILE))?);
    for (doc_id, byte_offset) in passage_offsets.iter().enumerate() {
        writeln!(offsets_out, "{} {}", doc_id, byte_offset)?;
    }
    offsets_out.flush()?;

    Ok(())
}
