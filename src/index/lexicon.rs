//! The lexicon: term -> (offset, length, doc frequency).
//!
//! Plain text, one `term offset length docFrequency` line per term, written
//! by the merger next to the index file. It is small relative to the index
//! (one line per distinct term) and is loaded fully into memory at query
//! startup, where it outlives every cursor.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Where one term's record lives in the index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Absolute byte offset of the record in the index file.
    pub offset: u64,
    /// Byte length of the record, term header through last block.
    pub length: u64,
    /// Number of postings (distinct documents) for the term.
    pub doc_frequency: u32,
}

/// In-memory term dictionary.
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    /// Load a lexicon file. Well-formed input has no duplicate terms; if one
    /// appears anyway the last line wins, matching what a rebuilt writer
    /// would have produced.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut entries = HashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (term, entry) = parse_line(&line).map_err(|msg| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{}:{}: {}", path.display(), line_no + 1, msg),
                )
            })?;
            entries.insert(term, entry);
        }

        Ok(Lexicon { entries })
    }

    pub fn get(&self, term: &str) -> Option<&LexiconEntry> {
        self.entries.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LexiconEntry)> {
        self.entries.iter().map(|(term, entry)| (term.as_str(), entry))
    }
}

fn parse_line(line: &str) -> Result<(String, LexiconEntry), String> {
    let mut fields = line.split_whitespace();
    let term = fields.next().ok_or("missing term")?;
    let offset = next_number::<u64>(&mut fields, "offset")?;
    let length = next_number::<u64>(&mut fields, "length")?;
    let doc_frequency = next_number::<u32>(&mut fields, "docFrequency")?;
    if fields.next().is_some() {
        return Err("trailing fields".to_string());
    }
    Ok((
        term.to_string(),
        LexiconEntry {
            offset,
            length,
            doc_frequency,
        },
    ))
}

fn next_number<T: std::str::FromStr>(
    fields: &mut std::str::SplitWhitespace<'_>,
    name: &str,
) -> Result<T, String> {
    fields
        .next()
        .ok_or_else(|| format!("missing {}", name))?
        .parse()
        .map_err(|_| format!("invalid {}", name))
}
