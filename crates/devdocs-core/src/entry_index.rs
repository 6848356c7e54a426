//! Entry Index: the pages of one docset, keyed by path.
//!
//! Persisted as one tab-separated line per entry, in listing order:
//!
//! ```text
//! <path>\t<type>\t<name>
//! ```

use crate::locator::EntryLocator;
use crate::{Entry, Error, IndexFormatReason, Result};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::{debug, warn};

/// Path-keyed, order-preserving collection of docset entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryIndex {
    entries: Vec<Entry>,
    by_path: HashMap<String, usize>,
}

impl EntryIndex {
    /// Index entries in listing order. A repeated path keeps its first
    /// position and takes the later entry.
    ///
    /// Entries the persisted form cannot hold are skipped: a blank path or
    /// name, a tab in the path or type, or a line break anywhere.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut index = Self::default();
        for entry in entries {
            if !is_persistable(&entry) {
                warn!(
                    path = ?entry.path,
                    name = ?entry.name,
                    "skipping entry that cannot be indexed"
                );
                continue;
            }
            index.insert(entry);
        }
        index
    }

    fn insert(&mut self, entry: Entry) {
        if let Some(&slot) = self.by_path.get(&entry.path) {
            self.entries[slot] = entry;
        } else {
            self.by_path.insert(entry.path.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    /// Look up `path`, then `path/index` once.
    ///
    /// A `#fragment` on `path` is carried through the fallback but is not
    /// part of the lookup key unless the stored path has one too.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Entry> {
        if let Some(entry) = self.lookup(path) {
            return Some(entry);
        }

        let fallback = EntryLocator::parse(path).with_index_suffix().to_string();
        debug!(path, fallback = %fallback, "retrying entry lookup");
        self.lookup(&fallback)
    }

    /// Like [`get`](Self::get), but fails with [`Error::EntryNotFound`].
    pub fn require(&self, docset: &str, path: &str) -> Result<&Entry> {
        self.get(path).ok_or_else(|| Error::EntryNotFound {
            docset: docset.to_string(),
            path: path.to_string(),
        })
    }

    fn lookup(&self, path: &str) -> Option<&Entry> {
        self.by_path.get(path).map(|&slot| &self.entries[slot])
    }

    /// Entries in listing order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `limit` entries that loosely match `query`, best first.
    ///
    /// Both path and name are scored; ties keep listing order.
    #[must_use]
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&Entry> {
        let matcher = SkimMatcherV2::default();
        let query = query.trim().to_lowercase();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(i64, &Entry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let by_path = matcher.fuzzy_match(&entry.path.to_lowercase(), &query);
                let by_name = matcher.fuzzy_match(&entry.name.to_lowercase(), &query);
                by_path.max(by_name).map(|score| (score, entry))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(limit).map(|(_, e)| e).collect()
    }

    /// Write the persisted form, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<usize> {
        let mut written = 0;
        for entry in &self.entries {
            let line = format!("{}\t{}\t{}\n", entry.path, entry.kind, entry.name);
            w.write_all(line.as_bytes())?;
            written += line.len();
        }
        Ok(written)
    }

    /// Persisted form as a string.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Parse the persisted form. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut index = Self::default();
        for (i, line) in text.lines().enumerate() {
            if let Some(entry) = parse_line(i + 1, line)? {
                index.insert(entry);
            }
        }
        Ok(index)
    }

    /// Parse the persisted form from a reader.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut index = Self::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(Error::MalformedInput)?;
            if let Some(entry) = parse_line(i + 1, &line)? {
                index.insert(entry);
            }
        }
        Ok(index)
    }
}

fn is_persistable(entry: &Entry) -> bool {
    let line_break = |s: &str| s.contains(['\n', '\r']);
    !entry.path.is_empty()
        && !entry.name.is_empty()
        && !entry.path.contains('\t')
        && !entry.kind.contains('\t')
        && !line_break(&entry.path)
        && !line_break(&entry.kind)
        && !line_break(&entry.name)
}

fn parse_line(number: usize, line: &str) -> Result<Option<Entry>> {
    if line.is_empty() {
        return Ok(None);
    }

    let bad = |reason| Error::BadIndexFormat {
        line: number,
        reason,
    };

    let mut fields = line.splitn(3, '\t');
    let (Some(path), Some(kind), Some(name)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(bad(IndexFormatReason::NotEnoughValues));
    };
    if path.is_empty() {
        return Err(bad(IndexFormatReason::BlankPath));
    }
    if name.is_empty() {
        return Err(bad(IndexFormatReason::BlankName));
    }

    Ok(Some(Entry {
        name: name.to_string(),
        kind: kind.to_string(),
        path: path.to_string(),
    }))
}

impl fmt::Display for EntryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}\t{}\t{}", entry.path, entry.kind, entry.name)?;
        }
        Ok(())
    }
}

impl FromStr for EntryIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
