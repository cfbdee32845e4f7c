//! Input classification.
//!
//! A property attaches labels to the inputs of a trial; the session merges
//! the labels of every satisfied trial and reports how often each occurred.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampEntry {
    pub label: String,
    pub count: usize,
}

/// Labels with occurrence counts, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Stamps {
    entries: Vec<StampEntry>,
    index: HashMap<String, usize>,
}

impl Stamps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label`.
    pub fn label(&mut self, label: &str) {
        self.add(label, 1);
    }

    /// Fold a per-trial collection into this one, in its order.
    pub fn merge(&mut self, other: &Stamps) {
        for entry in &other.entries {
            self.add(&entry.label, entry.count);
        }
    }

    fn add(&mut self, label: &str, count: usize) {
        match self.index.get(label) {
            Some(&at) => self.entries[at].count += count,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push(StampEntry {
                    label: label.to_string(),
                    count,
                });
            }
        }
    }

    /// Order by count, highest first. Equal counts keep their current order.
    pub fn sort_descending(&mut self) {
        let mut sorted: Vec<StampEntry> = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            match sorted.iter().position(|placed| placed.count < entry.count) {
                Some(at) => sorted.insert(at, entry),
                None => sorted.push(entry),
            }
        }

        self.index = sorted
            .iter()
            .enumerate()
            .map(|(at, entry)| (entry.label.clone(), at))
            .collect();
        self.entries = sorted;
    }

    pub fn count(&self, label: &str) -> Option<usize> {
        self.index.get(label).map(|&at| self.entries[at].count)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StampEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Share of `total` trials carrying each label, in percent.
    ///
    /// Empty when `total` is zero.
    pub fn percentages(&self, total: usize) -> Vec<(f64, &str)> {
        if total == 0 {
            return Vec::new();
        }
        self.entries
            .iter()
            .map(|entry| (entry.count as f64 / total as f64 * 100.0, entry.label.as_str()))
            .collect()
    }
}

impl PartialEq for Stamps {
    fn eq(&self, other: &Stamps) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a Stamps {
    type Item = &'a StampEntry;
    type IntoIter = std::slice::Iter<'a, StampEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
