// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! External k-way merge of sorted posting runs into the final index.
//!
//! The parser leaves behind `k` text runs, each sorted by (term, docID) but
//! with no ordering across runs. A min-heap seeded with the head record of
//! every run yields the globally sorted posting stream one record at a time;
//! postings for the current term accumulate in memory and are flushed as one
//! block-compressed record the moment the term changes. Memory stays bounded
//! by one term's postings plus one heap slot per run, and every file is read
//! and written strictly sequentially.
//!
//! The same (term, docID) pair may surface from two runs when a run boundary
//! split a document's postings. The writer coalesces those by summing the
//! frequencies, so the stored docID sequence stays strictly increasing.
//!
//! # References
//!
//! - **Sort-merge index construction**: Witten, Moffat, Bell (1999):
//!   "Managing Gigabytes", §5.2 "Sort-based inversion".

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use super::postings::encode_block;
use super::{BLOCK_SIZE, MAX_DOC_ID};
use crate::codec::write_u64;

/// Summary of one merge, for CLI reporting.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeStats {
    pub terms: u64,
    pub postings: u64,
    pub index_bytes: u64,
}

// ============================================================================
// RUN READING
// ============================================================================

/// One `term docID freq` record, tagged with its source run.
#[derive(Debug, PartialEq, Eq)]
struct RunRecord {
    term: String,
    doc_id: u32,
    freq: u32,
    run: usize,
}

impl Ord for RunRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // Term, then docID, then source run as a stable tiebreaker.
        self.term
            .cmp(&other.term)
            .then(self.doc_id.cmp(&other.doc_id))
            .then(self.run.cmp(&other.run))
    }
}

impl PartialOrd for RunRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `BinaryHeap` is a max-heap; flip the ordering to pop the minimum.
#[derive(Debug, PartialEq, Eq)]
struct MinRecord(RunRecord);

impl Ord for MinRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0)
    }
}

impl PartialOrd for MinRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct RunReader {
    reader: BufReader<File>,
    path: PathBuf,
    line_no: usize,
}

impl RunReader {
    fn open(path: &Path) -> io::Result<Self> {
        Ok(RunReader {
            reader: BufReader::new(File::open(path)?),
            path: path.to_path_buf(),
            line_no: 0,
        })
    }

    /// Next record from this run, or `None` at end of file.
    fn next_record(&mut self, run: usize) -> io::Result<Option<RunRecord>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if !line.trim().is_empty() {
                break;
            }
        }

        self.parse(&line, run).map(Some).map_err(|msg| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}:{}: {}", self.path.display(), self.line_no, msg),
            )
        })
    }

    fn parse(&self, line: &str, run: usize) -> Result<RunRecord, String> {
        let mut fields = line.split_whitespace();
        let term = fields.next().ok_or("missing term")?.to_string();
        let doc_id: u32 = fields
            .next()
            .ok_or("missing docID")?
            .parse()
            .map_err(|_| "invalid docID")?;
        let freq: u32 = fields
            .next()
            .ok_or("missing frequency")?
            .parse()
            .map_err(|_| "invalid frequency")?;
        if fields.next().is_some() {
            return Err("trailing fields".to_string());
        }
        if doc_id >= MAX_DOC_ID {
            return Err(format!("docID {} collides with the end-of-list sentinel", doc_id));
        }
        Ok(RunRecord {
            term,
            doc_id,
            freq,
            run,
        })
    }
}

// ============================================================================
// INDEX WRITING
// ============================================================================

struct IndexWriter {
    index: BufWriter<File>,
    lexicon: BufWriter<File>,
    /// Current write position in the index file. Tracked by hand so the
    /// writer never needs to seek.
    offset: u64,
    doc_buf: Vec<u8>,
    freq_buf: Vec<u8>,
}

impl IndexWriter {
    fn create(index_path: &Path, lexicon_path: &Path) -> io::Result<Self> {
        Ok(IndexWriter {
            index: BufWriter::new(File::create(index_path)?),
            lexicon: BufWriter::new(File::create(lexicon_path)?),
            offset: 0,
            doc_buf: Vec::new(),
            freq_buf: Vec::new(),
        })
    }

    /// Write one term's record (header plus blocks) and its lexicon line.
    fn flush_term(&mut self, term: &str, doc_ids: &[u32], freqs: &[u32]) -> io::Result<()> {
        debug_assert!(!doc_ids.is_empty());
        debug_assert_eq!(doc_ids.len(), freqs.len());

        let start = self.offset;
        let term_bytes = term.as_bytes();
        let num_blocks = doc_ids.len().div_ceil(BLOCK_SIZE);

        write_u64(&mut self.index, term_bytes.len() as u64)?;
        self.index.write_all(term_bytes)?;
        write_u64(&mut self.index, num_blocks as u64)?;
        self.offset += 8 + term_bytes.len() as u64 + 8;

        for (block_docs, block_freqs) in doc_ids.chunks(BLOCK_SIZE).zip(freqs.chunks(BLOCK_SIZE)) {
            encode_block(block_docs, block_freqs, &mut self.doc_buf, &mut self.freq_buf);
            write_u64(&mut self.index, self.doc_buf.len() as u64)?;
            write_u64(&mut self.index, self.freq_buf.len() as u64)?;
            self.index.write_all(&self.doc_buf)?;
            self.index.write_all(&self.freq_buf)?;
            self.offset += 16 + self.doc_buf.len() as u64 + self.freq_buf.len() as u64;
        }

        let length = self.offset - start;
        writeln!(
            self.lexicon,
            "{} {} {} {}",
            term,
            start,
            length,
            doc_ids.len()
        )?;
        Ok(())
    }

    fn finish(mut self) -> io::Result<u64> {
        self.index.flush()?;
        self.lexicon.flush()?;
        Ok(self.offset)
    }
}

// ============================================================================
// THE MERGE
// ============================================================================

/// Merge sorted runs into one index file and lexicon.
///
/// Any I/O or format error aborts the whole merge; the caller is expected to
/// discard the partially written outputs rather than ship them.
pub fn merge_runs(
    run_paths: &[PathBuf],
    index_path: &Path,
    lexicon_path: &Path,
    progress: Option<&ProgressBar>,
) -> io::Result<MergeStats> {
    let mut readers = Vec::with_capacity(run_paths.len());
    for path in run_paths {
        readers.push(RunReader::open(path)?);
    }

    let mut heap = BinaryHeap::with_capacity(readers.len());
    for (run, reader) in readers.iter_mut().enumerate() {
        if let Some(record) = reader.next_record(run)? {
            heap.push(MinRecord(record));
        }
    }

    let mut writer = IndexWriter::create(index_path, lexicon_path)?;
    let mut stats = MergeStats::default();

    let mut current_term = String::new();
    let mut doc_ids: Vec<u32> = Vec::new();
    let mut freqs: Vec<u32> = Vec::new();

    while let Some(MinRecord(record)) = heap.pop() {
        if record.term != current_term {
            if !doc_ids.is_empty() {
                writer.flush_term(&current_term, &doc_ids, &freqs)?;
                stats.terms += 1;
                stats.postings += doc_ids.len() as u64;
                if let Some(pb) = progress {
                    pb.inc(1);
                    if stats.terms % 4096 == 0 {
                        pb.set_message(format!("{} terms", stats.terms));
                    }
                }
                doc_ids.clear();
                freqs.clear();
            }
            current_term = record.term;
        }

        match doc_ids.last() {
            // Same (term, docID) from two runs: sum the frequencies.
            Some(&last) if last == record.doc_id => {
                if let Some(slot) = freqs.last_mut() {
                    *slot += record.freq;
                }
            }
            Some(&last) if last > record.doc_id => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "run {} is not sorted: term '{}' regressed from docID {} to {}",
                        record.run, current_term, last, record.doc_id
                    ),
                ));
            }
            _ => {
                doc_ids.push(record.doc_id);
                freqs.push(record.freq);
            }
        }

        if let Some(next) = readers[record.run].next_record(record.run)? {
            heap.push(MinRecord(next));
        }
    }

    if !doc_ids.is_empty() {
        writer.flush_term(&current_term, &doc_ids, &freqs)?;
        stats.terms += 1;
        stats.postings += doc_ids.len() as u64;
    }

    stats.index_bytes = writer.finish()?;
    if let Some(pb) = progress {
        pb.set_message(format!("{} terms", stats.terms));
    }
    Ok(stats)
}
