//! Ordered multi-valued metadata map

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered multi-map from field name to a list of values.
///
/// Field order follows first insertion, value order follows insertion within a
/// field. A field may be present with no values, which is not the same as an
/// absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: IndexMap<String, Vec<String>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values of `field`, empty if the field is absent.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of `field`, if any.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Append a value, creating the field when absent.
    pub fn add(&mut self, field: &str, value: impl Into<String>) {
        self.entry(field).push(value.into());
    }

    /// Append several values, creating the field even when `values` is empty.
    pub fn add_all<I, S>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry(field).extend(values.into_iter().map(Into::into));
    }

    /// Replace all values of `field` with a single value.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.set_all(field, [value.into()]);
    }

    /// Replace all values of `field`, keeping the field's position if it exists.
    pub fn set_all<I, S>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.entry(field);
        entry.clear();
        entry.extend(values.into_iter().map(Into::into));
    }

    /// Remove a field and return its values.
    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.fields.shift_remove(field)
    }

    /// Rename `from` to `to`. When `overwrite` is false and `to` already
    /// exists, the values are appended to it.
    pub fn rename(&mut self, from: &str, to: &str, overwrite: bool) {
        if from == to {
            return;
        }
        let Some(values) = self.remove(from) else {
            return;
        };
        if overwrite {
            self.set_all(to, values);
        } else {
            self.add_all(to, values);
        }
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Keep only the fields for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &[String]) -> bool) {
        self.fields.retain(|k, v| keep(k, v));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn entry(&mut self, field: &str) -> &mut Vec<String> {
        self.fields.entry(field.to_string()).or_default()
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.add(&k.into(), v);
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_keep_insertion_order() {
        let mut meta = Metadata::new();
        meta.add("b", "1");
        meta.add("a", "2");
        meta.add("b", "3");

        assert_eq!(meta.field_names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(meta.get("b"), &["1".to_string(), "3".to_string()]);
        assert_eq!(meta.first("a"), Some("2"));
    }

    #[test]
    fn test_present_empty_field_differs_from_absent() {
        let mut meta = Metadata::new();
        meta.add_all("empty", Vec::<String>::new());

        assert!(meta.contains("empty"));
        assert!(meta.get("empty").is_empty());
        assert!(!meta.contains("missing"));
        assert!(meta.get("missing").is_empty());
    }

    #[test]
    fn test_set_all_keeps_position() {
        let mut meta: Metadata = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        meta.set_all("b", ["x", "y"]);

        assert_eq!(meta.field_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(meta.get("b").len(), 2);
    }

    #[test]
    fn test_rename_appends_unless_overwrite() {
        let mut meta: Metadata = [("from", "new"), ("to", "old")].into_iter().collect();
        meta.rename("from", "to", false);
        assert_eq!(meta.get("to"), &["old".to_string(), "new".to_string()]);
        assert!(!meta.contains("from"));

        let mut meta: Metadata = [("from", "new"), ("to", "old")].into_iter().collect();
        meta.rename("from", "to", true);
        assert_eq!(meta.get("to"), &["new".to_string()]);
    }

    #[test]
    fn test_json_shape_is_plain_map() {
        let meta: Metadata = [("title", "Hello"), ("tag", "a"), ("tag", "b")].into_iter().collect();
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"title":["Hello"],"tag":["a","b"]}"#);

        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
