use std::collections::HashMap;

use crate::value::Value;

/// The raw parse result for a single rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A single value.
    Single(Value),
    /// An ordered sequence of values.
    Multiple(Vec<Value>),
    /// Nothing was supplied and the rule has no default.
    ///
    /// This is distinct from any value, including `None`.
    NotSupplied,
}

impl Entry {
    /// Whether this entry is [`Entry::NotSupplied`].
    pub fn is_supplied(&self) -> bool {
        !matches!(self, Entry::NotSupplied)
    }
}

/// The raw mapping produced by a parse, keyed by each rule's storage key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    entries: HashMap<String, Entry>,
}

impl Namespace {
    /// Look up the entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Store `entry` under `key`, returning the entry it replaces.
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(key.into(), entry)
    }

    /// Remove and return the entry stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    /// Whether an entry is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The storage keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Only keep the entries for which `f` holds.
    pub fn retain(&mut self, mut f: impl FnMut(&str, &Entry) -> bool) {
        self.entries.retain(|key, entry| f(key, entry));
    }
}

impl FromIterator<(String, Entry)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (String, Entry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Namespace {
    type Item = (String, Entry);
    type IntoIter = std::collections::hash_map::IntoIter<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_operations() {
        // Setup
        let mut namespace = Namespace::default();

        // Execute
        namespace.insert("a", Entry::Single(Value::new(1u8)));
        namespace.insert("b", Entry::NotSupplied);
        let replaced = namespace.insert("a", Entry::Multiple(vec![]));

        // Verify
        assert_eq!(replaced, Some(Entry::Single(Value::new(1u8))));
        assert_eq!(namespace.len(), 2);
        assert!(namespace.contains("b"));
        assert!(!namespace.get("b").unwrap().is_supplied());

        namespace.retain(|_, entry| entry.is_supplied());
        assert_eq!(namespace.len(), 1);
        assert_eq!(namespace.remove("a"), Some(Entry::Multiple(vec![])));
        assert!(namespace.is_empty());
    }

    #[test]
    fn namespace_collect() {
        let namespace: Namespace = vec![("x".to_string(), Entry::NotSupplied)]
            .into_iter()
            .collect();
        let mut keys: Vec<&str> = namespace.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["x"]);
        assert_eq!(namespace.into_iter().count(), 1);
    }
}
