use std::collections::HashMap;

use crate::value::Value;

/// Fetched records keyed by primary-key value, in the store's return order.
///
/// Keys compare by their text form, so `Int(5)` and `Str("5")` address the
/// same entry. Inserting an existing key replaces the record in place.
#[derive(Debug, Clone)]
pub struct ResultSet<R> {
    entries: Vec<(Value, R)>,
    index: HashMap<String, usize>,
}

impl<R> Default for ResultSet<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

fn key_of(value: &Value) -> String {
    value.to_text().unwrap_or_default()
}

impl<R> ResultSet<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Value, record: R) {
        match self.index.get(&key_of(&key)) {
            Some(&pos) => self.entries[pos] = (key, record),
            None => {
                self.index.insert(key_of(&key), self.entries.len());
                self.entries.push((key, record));
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&R> {
        self.index
            .get(&key_of(key))
            .map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(&key_of(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&R> {
        self.entries.first().map(|(_, record)| record)
    }

    pub fn into_first(self) -> Option<R> {
        self.entries.into_iter().next().map(|(_, record)| record)
    }

    /// Remove and return the record stored under `key`.
    pub fn take(&mut self, key: &Value) -> Option<R> {
        let pos = self.index.remove(&key_of(key))?;
        let (_, record) = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(record)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &R)> {
        self.entries.iter().map(|(key, record)| (key, record))
    }

    pub fn into_records(self) -> Vec<R> {
        self.entries.into_iter().map(|(_, record)| record).collect()
    }
}

impl<R> IntoIterator for ResultSet<R> {
    type Item = (Value, R);
    type IntoIter = std::vec::IntoIter<(Value, R)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
