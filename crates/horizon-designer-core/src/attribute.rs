//! Per-node attribute storage.
//!
//! An [`AttributeStore`] is an ordered map of attribute key to raw value
//! text. Lookup is by key; iteration follows insertion order, which is the
//! order attributes are listed to the user and written to markup.
//! Overwriting an existing key keeps its original position.

use indexmap::IndexMap;

/// The attribute key carrying a node's user-visible identifier.
pub const ID_ATTRIBUTE: &str = "android:id";

/// Prefix marking a value that mints a new identifier.
pub const NEW_ID_PREFIX: &str = "@+id/";

/// Prefix marking a plain reference to an existing identifier.
pub const ID_REF_PREFIX: &str = "@id/";

/// Strip the new-id or reference prefix from an identifier value.
///
/// Values without either prefix are returned unchanged.
pub fn strip_id_prefix(value: &str) -> &str {
    value
        .strip_prefix(NEW_ID_PREFIX)
        .or_else(|| value.strip_prefix(ID_REF_PREFIX))
        .unwrap_or(value)
}

/// The plain reference form (`@id/name`) for an identifier.
pub fn id_reference(name: &str) -> String {
    format!("{ID_REF_PREFIX}{name}")
}

/// Ordered key/value attribute map owned by a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeStore {
    entries: IndexMap<String, String>,
}

impl AttributeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value, returning the previous one.
    ///
    /// A new key is appended at the end; an existing key keeps its position.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Display position of a key.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Keys in display order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Values in display order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.entries.values().map(String::as_str)
    }

    /// `(key, value)` pairs in display order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every value equal to `from` with `to`, returning the number
    /// of entries rewritten.
    pub fn replace_values(&mut self, from: &str, to: &str) -> usize {
        let mut rewritten = 0;
        for value in self.entries.values_mut() {
            if value == from {
                *value = to.to_owned();
                rewritten += 1;
            }
        }
        rewritten
    }

    /// Remove every entry whose value equals `value`, returning the removed
    /// keys in their former order.
    pub fn remove_values(&mut self, value: &str) -> Vec<String> {
        let removed: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, v)| v.as_str() == value)
            .map(|(k, _)| k.clone())
            .collect();
        self.entries.retain(|_, v| v != value);
        removed
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (k, v) in iter {
            store.put(k, v);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_preserves_insertion_order() {
        let mut store = AttributeStore::new();
        store.put("android:layout_width", "wrap_content");
        store.put("android:layout_height", "wrap_content");
        store.put("android:text", "Hello");

        let keys: Vec<_> = store.keys().collect();
        assert_eq!(
            keys,
            vec!["android:layout_width", "android:layout_height", "android:text"]
        );
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut store = AttributeStore::new();
        store.put("a", "1");
        store.put("b", "2");
        let old = store.put("a", "3");

        assert_eq!(old.as_deref(), Some("1"));
        assert_eq!(store.index_of("a"), Some(0));
        assert_eq!(store.get("a"), Some("3"));
    }

    #[test]
    fn test_remove_shifts_following_entries() {
        let mut store: AttributeStore = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(store.remove("a").as_deref(), Some("1"));
        assert_eq!(store.index_of("b"), Some(0));
        assert_eq!(store.index_of("c"), Some(1));
        assert!(!store.contains("a"));
        assert_eq!(store.remove("a"), None);
    }

    #[test]
    fn test_replace_and_remove_values() {
        let mut store: AttributeStore = [
            ("android:layout_below", "@id/title"),
            ("android:text", "@id/title"),
            ("android:layout_toEndOf", "@id/other"),
        ]
        .into_iter()
        .collect();

        assert_eq!(store.replace_values("@id/title", "@id/heading"), 2);
        assert_eq!(store.get("android:layout_below"), Some("@id/heading"));

        let removed = store.remove_values("@id/other");
        assert_eq!(removed, vec!["android:layout_toEndOf".to_string()]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_id_prefix_helpers() {
        assert_eq!(strip_id_prefix("@+id/button1"), "button1");
        assert_eq!(strip_id_prefix("@id/button1"), "button1");
        assert_eq!(strip_id_prefix("button1"), "button1");
        assert_eq!(id_reference("button1"), "@id/button1");
    }
}
