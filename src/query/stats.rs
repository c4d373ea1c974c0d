//! Sidecar statistics consumed at query time.
//!
//! The parser leaves four small text files next to the index: per-document
//! token counts, the collection totals BM25 needs, the docID -> external
//! passage id table, and the byte offset of every passage in the raw
//! collection. All four load fully into memory at startup and are read-only
//! afterwards. A missing file is fatal at startup; queries never run
//! against partial statistics.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// docID -> token count.
#[derive(Debug, Default)]
pub struct DocumentLengths {
    lengths: HashMap<u32, u32>,
}

impl DocumentLengths {
    pub fn load(path: &Path) -> io::Result<Self> {
        let mut lengths = HashMap::new();
        for_each_record(path, |fields, context| {
            let doc_id = parse_field(fields.next(), "docID", context)?;
            let length = parse_field(fields.next(), "length", context)?;
            lengths.insert(doc_id, length);
            Ok(())
        })?;
        Ok(DocumentLengths { lengths })
    }

    /// Token count for `doc_id`; unknown documents read as length 0.
    pub fn get(&self, doc_id: u32) -> u32 {
        self.lengths.get(&doc_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

/// Collection totals: document count and average length.
#[derive(Debug, Clone, Copy)]
pub struct CollectionStats {
    pub total_docs: u32,
    pub avg_doc_len: f64,
}

impl CollectionStats {
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut line = String::new();
        BufReader::new(file).read_line(&mut line)?;

        let mut fields = line.split_whitespace();
        let total_docs = parse_field(fields.next(), "totalDocuments", path)?;
        let avg_doc_len = parse_field(fields.next(), "avgDocumentLength", path)?;
        Ok(CollectionStats {
            total_docs,
            avg_doc_len,
        })
    }
}

/// docID -> external passage identifier, for result output.
#[derive(Debug, Default)]
pub struct PageTable {
    entries: HashMap<u32, String>,
}

impl PageTable {
    pub fn load(path: &Path) -> io::Result<Self> {
        let mut entries = HashMap::new();
        for_each_record(path, |fields, context| {
            let doc_id = parse_field(fields.next(), "docID", context)?;
            let passage_id = fields.next().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{}: missing passage id", context.display()),
                )
            })?;
            entries.insert(doc_id, passage_id.to_string());
            Ok(())
        })?;
        Ok(PageTable { entries })
    }

    pub fn get(&self, doc_id: u32) -> Option<&str> {
        self.entries.get(&doc_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Random access to passage text via recorded byte offsets.
///
/// Owns its own handle into the raw collection file; fetching seeks to the
/// passage's line and re-splits it on the TAB separator.
#[derive(Debug)]
pub struct PassageStore {
    offsets: HashMap<u32, u64>,
    collection: BufReader<File>,
}

impl PassageStore {
    pub fn open(offsets_path: &Path, collection_path: &Path) -> io::Result<Self> {
        let mut offsets = HashMap::new();
        for_each_record(offsets_path, |fields, context| {
            let doc_id = parse_field(fields.next(), "docID", context)?;
            let offset = parse_field(fields.next(), "byteOffset", context)?;
            offsets.insert(doc_id, offset);
            Ok(())
        })?;
        Ok(PassageStore {
            offsets,
            collection: BufReader::new(File::open(collection_path)?),
        })
    }

    /// Passage text for `doc_id`, or `None` when the docID has no recorded
    /// offset or the line has no text column.
    pub fn fetch(&mut self, doc_id: u32) -> io::Result<Option<String>> {
        let Some(&offset) = self.offsets.get(&doc_id) else {
            return Ok(None);
        };
        self.collection.seek(SeekFrom::Start(offset))?;
        let mut line = String::new();
        self.collection.read_line(&mut line)?;
        let text = line
            .trim_end_matches(['\n', '\r'])
            .split_once('\t')
            .map(|(_, text)| text.to_string());
        Ok(text)
    }
}

// ============================================================================
// PARSING HELPERS
// ============================================================================

/// Apply `handle` to the whitespace-split fields of every non-blank line.
fn for_each_record<F>(path: &Path, mut handle: F) -> io::Result<()>
where
    F: FnMut(&mut std::str::SplitWhitespace<'_>, &Path) -> io::Result<()>,
{
    let file = File::open(path)?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        handle(&mut line.split_whitespace(), path)?;
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    name: &str,
    path: &Path,
) -> io::Result<T> {
    field
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: missing {}", path.display(), name),
            )
        })?
        .parse()
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: invalid {}", path.display(), name),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn document_lengths_default_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "lengths.txt", "0 12\n1 7\n");
        let lengths = DocumentLengths::load(&path).unwrap();
        assert_eq!(lengths.get(0), 12);
        assert_eq!(lengths.get(1), 7);
        assert_eq!(lengths.get(99), 0);
    }

    #[test]
    fn collection_stats_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "stats.txt", "8841823 56.31\n");
        let stats = CollectionStats::load(&path).unwrap();
        assert_eq!(stats.total_docs, 8_841_823);
        assert!((stats.avg_doc_len - 56.31).abs() < 1e-9);
    }

    #[test]
    fn page_table_maps_to_external_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "pages.txt", "0 PID-100\n1 PID-200\n");
        let table = PageTable::load(&path).unwrap();
        assert_eq!(table.get(1), Some("PID-200"));
        assert_eq!(table.get(5), None);
    }

    #[test]
    fn passage_store_fetches_by_offset() {
        let dir = tempfile::tempdir().unwrap();
        let collection = dir.path().join("collection.tsv");
        let mut file = File::create(&collection).unwrap();
        let first = "p0\tthe first passage\n";
        write!(file, "{}p1\tthe second passage\n", first).unwrap();

        let offsets = write_file(
            dir.path(),
            "offsets.txt",
            &format!("0 0\n1 {}\n", first.len()),
        );
        let mut store = PassageStore::open(&offsets, &collection).unwrap();
        assert_eq!(store.fetch(1).unwrap().as_deref(), Some("the second passage"));
        assert_eq!(store.fetch(0).unwrap().as_deref(), Some("the first passage"));
        assert_eq!(store.fetch(42).unwrap(), None);
    }

    #[test]
    fn missing_sidecar_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DocumentLengths::load(&dir.path().join("absent.txt")).is_err());
    }

    #[test]
    fn malformed_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "lengths.txt", "zero 12\n");
        assert!(DocumentLengths::load(&path).is_err());
    }
}
