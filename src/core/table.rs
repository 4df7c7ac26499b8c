// --- File: src/core/table.rs
use crate::core::types::MappingEntry;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

// --- TableBuilder: collects mapping rows before the table is frozen ---

/// Accumulates mapping rows in declaration order.
/// Symbols are NFC-normalized on insert; a repeated symbol overwrites the earlier row
/// but keeps the earlier row's position.
#[derive(Default)]
pub struct TableBuilder {
    entries: Vec<MappingEntry>,
    index: HashMap<String, usize>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ipa: &str, pron: &str, nucleus: bool) {
        let ipa: String = ipa.nfc().collect();
        if ipa.is_empty() {
            warn!(pron, "skipping mapping row with an empty IPA symbol");
            return;
        }

        let entry = MappingEntry { ipa, pron: pron.to_string(), nucleus };
        if let Some(&idx) = self.index.get(&entry.ipa) {
            warn!(
                ipa = %entry.ipa,
                old = %self.entries[idx].pron,
                new = %entry.pron,
                "duplicate mapping symbol, later row wins"
            );
            self.entries[idx] = entry;
        } else {
            self.index.insert(entry.ipa.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    pub fn build(self) -> MappingTable {
        let mut by_length: Vec<usize> = (0..self.entries.len()).collect();
        // Stable sort: equal lengths stay in declaration order.
        by_length.sort_by_key(|&idx| Reverse(self.entries[idx].ipa.chars().count()));

        let mut nodes = vec![TableNode::new()];
        for (entry_idx, entry) in self.entries.iter().enumerate() {
            let mut node_idx = 0;
            for c in entry.ipa.chars() {
                let next_idx = if let Some(&id) = nodes[node_idx].children.get(&c) {
                    id
                } else {
                    let new_node_id = nodes.len();
                    nodes.push(TableNode::new());
                    nodes[node_idx].children.insert(c, new_node_id);
                    new_node_id
                };
                node_idx = next_idx;
            }
            nodes[node_idx].entry = Some(entry_idx);
        }

        MappingTable {
            entries: self.entries,
            index: self.index,
            by_length,
            nodes,
        }
    }
}

impl<'a> FromIterator<&'a MappingEntry> for TableBuilder {
    fn from_iter<I: IntoIterator<Item = &'a MappingEntry>>(iter: I) -> Self {
        let mut builder = Self::new();
        for entry in iter {
            builder.insert(&entry.ipa, &entry.pron, entry.nucleus);
        }
        builder
    }
}

// --- MappingTable: frozen, read-only lookup used by the converter ---

#[derive(Debug, Clone)]
struct TableNode {
    children: HashMap<char, usize>,
    entry: Option<usize>,
}

impl TableNode {
    fn new() -> Self {
        Self { children: HashMap::new(), entry: None }
    }
}

/// The mapping from IPA symbols to target phones, ready for greedy matching.
/// Only the entries are serialized; the index, ordering and trie are rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TableSnapshot", into = "TableSnapshot")]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    index: HashMap<String, usize>,
    /// Entry indices ordered by decreasing symbol length in code points.
    by_length: Vec<usize>,
    /// Character trie over all symbols; node 0 is the root.
    nodes: Vec<TableNode>,
}

impl MappingTable {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a MappingEntry>,
    {
        entries.into_iter().collect::<TableBuilder>().build()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a symbol exactly. The caller is expected to pass NFC text.
    pub fn get(&self, ipa: &str) -> Option<&MappingEntry> {
        self.index.get(ipa).map(|&idx| &self.entries[idx])
    }

    /// All symbols, longest first. Equal lengths keep declaration order.
    pub fn symbols_by_length(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_length.iter().map(|&idx| self.entries[idx].ipa.as_str())
    }

    /// Finds the longest symbol that prefixes `text`.
    /// Returns the entry and the matched length in bytes.
    /// O(k) where k is the length of the longest symbol.
    pub fn longest_match(&self, text: &str) -> Option<(&MappingEntry, usize)> {
        let mut node_idx = 0;
        let mut best = None;
        for (offset, c) in text.char_indices() {
            match self.nodes[node_idx].children.get(&c) {
                Some(&next_idx) => node_idx = next_idx,
                None => break,
            }
            if let Some(entry_idx) = self.nodes[node_idx].entry {
                best = Some((&self.entries[entry_idx], offset + c.len_utf8()));
            }
        }
        best
    }
}

#[derive(Serialize, Deserialize)]
struct TableSnapshot {
    entries: Vec<MappingEntry>,
}

impl From<MappingTable> for TableSnapshot {
    fn from(table: MappingTable) -> Self {
        Self { entries: table.entries }
    }
}

impl From<TableSnapshot> for MappingTable {
    fn from(snapshot: TableSnapshot) -> Self {
        MappingTable::from_entries(&snapshot.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str, bool)]) -> MappingTable {
        let mut builder = TableBuilder::new();
        for (ipa, pron, nucleus) in rows {
            builder.insert(ipa, pron, *nucleus);
        }
        builder.build()
    }

    #[test]
    fn test_ordering_longest_first() {
        let t = table(&[("a", "A", false), ("aːɪ", "AI", true), ("aː", "AA", true), ("t", "T", false)]);
        let order: Vec<&str> = t.symbols_by_length().collect();
        assert_eq!(order, vec!["aːɪ", "aː", "a", "t"]);
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let t = table(&[("b", "B", false), ("a", "A", true), ("tʃ", "CH", false), ("dʒ", "JH", false)]);
        let order: Vec<&str> = t.symbols_by_length().collect();
        assert_eq!(order, vec!["tʃ", "dʒ", "b", "a"]);
    }

    #[test]
    fn test_duplicate_last_write_wins() {
        let t = table(&[("a", "A", false), ("e", "E", true), ("a", "AX", true)]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("a"), Some(&MappingEntry::new("a", "AX", true)));
        let order: Vec<&str> = t.symbols_by_length().collect();
        assert_eq!(order, vec!["a", "e"]);
    }

    #[test]
    fn test_symbols_are_nfc_normalized() {
        // "e" + COMBINING ACUTE ACCENT composes to U+00E9.
        let t = table(&[("e\u{301}", "EY", true)]);
        assert!(t.get("\u{e9}").is_some());
        assert!(t.get("e\u{301}").is_none());
    }

    #[test]
    fn test_from_entries() {
        let rows = vec![MappingEntry::new("ʃ", "SH", false), MappingEntry::new("iː", "IY", true)];
        let t = MappingTable::from_entries(&rows);
        assert_eq!(t.get("iː"), Some(&rows[1]));
        let order: Vec<&str> = t.symbols_by_length().collect();
        assert_eq!(order, vec!["iː", "ʃ"]);
    }

    #[test]
    fn test_empty_symbol_is_skipped() {
        let t = table(&[("", "X", false), ("a", "A", true)]);
        assert_eq!(t.len(), 1);
        assert!(t.longest_match("b").is_none());
    }

    #[test]
    fn test_empty_table_never_matches() {
        let t = TableBuilder::new().build();
        assert!(t.is_empty());
        assert!(t.longest_match("abc").is_none());
        assert_eq!(t.symbols_by_length().count(), 0);
    }

    #[test]
    fn test_longest_match_prefers_longer_symbol() {
        let t = table(&[("a", "A", false), ("aa", "AA", true)]);
        let (entry, len) = t.longest_match("aab").unwrap();
        assert_eq!(entry.pron, "AA");
        assert_eq!(len, 2);
    }

    #[test]
    fn test_longest_match_falls_back_to_shorter() {
        // "abc" is a symbol but "abx" only has "a" as a mapped prefix.
        let t = table(&[("a", "A", false), ("abc", "ABC", false)]);
        let (entry, len) = t.longest_match("abx").unwrap();
        assert_eq!(entry.pron, "A");
        assert_eq!(len, 1);
    }

    #[test]
    fn test_longest_match_agrees_with_length_order_scan() {
        let t = table(&[
            ("t", "T", false),
            ("tʃ", "CH", false),
            ("ʃ", "SH", false),
            ("ə", "AX", true),
            ("əʊ", "OW", true),
            ("ʊ", "UH", true),
        ]);
        for text in ["tʃəʊ", "təʊʃ", "ʊtʃ", "əə", "ʃt"] {
            let scanned = t
                .symbols_by_length()
                .find(|s| text.starts_with(s))
                .map(|s| (s.to_string(), s.len()));
            let walked = t.longest_match(text).map(|(e, len)| (e.ipa.clone(), len));
            assert_eq!(walked, scanned, "mismatch for {}", text);
        }
    }

    #[test]
    fn test_multibyte_match_length_in_bytes() {
        let t = table(&[("ɑː", "AA", true)]);
        let (_, len) = t.longest_match("ɑːt").unwrap();
        assert_eq!(len, "ɑː".len());
    }
}
