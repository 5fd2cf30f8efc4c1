//! Free-text order tags and the `key:value` convention layered on top of them.
//!
//! The backend stores every piece of order workflow metadata as a flat list of
//! tags. Some tags are bare markers (`priority`, `shipped`), others encode a
//! value after the first colon (`custom_due_date:2024-01-01`). Keys and
//! markers compare case-insensitively after trimming; values keep their case.

use serde::{Deserialize, Deserializer, Serialize};

/// Ordered list of tags attached to an order.
///
/// Deserializes from either a JSON array of strings or the comma-joined
/// string form the backend sometimes returns. Blank entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for TagList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawTags>::deserialize(deserializer)? {
            None => Self::default(),
            Some(RawTags::Joined(joined)) => Self::parse(&joined),
            Some(RawTags::List(list)) => list.into_iter().collect(),
        })
    }
}

impl FromIterator<String> for TagList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }
}

impl<'a> FromIterator<&'a str> for TagList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

/// Splits a tag into `(key, value)` at the first colon, trimming both halves.
///
/// Returns `None` for bare markers and for tags with an empty key.
#[must_use]
pub fn split_key_value(tag: &str) -> Option<(&str, &str)> {
    let (key, value) = tag.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

fn same_tag(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn has_key(tag: &str, key: &str) -> bool {
    split_key_value(tag).is_some_and(|(k, _)| k.eq_ignore_ascii_case(key.trim()))
}

impl TagList {
    /// Parses the comma-joined form, e.g. `"priority, shipped, custom_due_date:2024-01-01"`.
    #[must_use]
    pub fn parse(joined: &str) -> Self {
        joined.split(',').collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Comma-joined form, as the legacy backend stores it.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }

    /// Returns `true` if a tag equal to `tag` (case-insensitive, trimmed) is present.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.iter().any(|t| same_tag(t, tag))
    }

    /// Value of the first `key:value` tag with the given key.
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.iter()
            .filter_map(split_key_value)
            .find(|(k, _)| k.eq_ignore_ascii_case(key.trim()))
            .map(|(_, v)| v)
    }

    /// Appends `tag` unless an equal tag is already present. Returns `true`
    /// when the list changed.
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    /// Removes every tag equal to `tag`. Returns `true` when the list changed.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| !same_tag(t, tag));
        self.0.len() != before
    }

    /// Removes every `key:value` tag with the given key.
    pub fn remove_key(&mut self, key: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| !has_key(t, key));
        self.0.len() != before
    }

    /// Replaces all `key:*` tags with a single `key:value` tag at the end.
    pub fn set_value(&mut self, key: &str, value: &str) {
        self.remove_key(key);
        self.0.push(format!("{}:{}", key.trim(), value.trim()));
    }
}

/// A single edit against a [`TagList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOp {
    Add(String),
    Remove(String),
    RemoveKey(String),
    SetValue { key: String, value: String },
}

/// An ordered batch of tag operations, computed before anything is sent to
/// the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEdit {
    ops: Vec<TagOp>,
}

impl TagEdit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add(mut self, tag: impl Into<String>) -> Self {
        self.ops.push(TagOp::Add(tag.into()));
        self
    }

    #[must_use]
    pub fn remove(mut self, tag: impl Into<String>) -> Self {
        self.ops.push(TagOp::Remove(tag.into()));
        self
    }

    #[must_use]
    pub fn remove_key(mut self, key: impl Into<String>) -> Self {
        self.ops.push(TagOp::RemoveKey(key.into()));
        self
    }

    #[must_use]
    pub fn set_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(TagOp::SetValue {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn ops(&self) -> &[TagOp] {
        &self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies the operations in order.
    pub fn apply(&self, tags: &mut TagList) {
        for op in &self.ops {
            match op {
                TagOp::Add(tag) => {
                    tags.add(tag);
                }
                TagOp::Remove(tag) => {
                    tags.remove(tag);
                }
                TagOp::RemoveKey(key) => {
                    tags.remove_key(key);
                }
                TagOp::SetValue { key, value } => tags.set_value(key, value),
            }
        }
    }

    /// Returns a copy of `tags` with the edit applied.
    #[must_use]
    pub fn applied_to(&self, tags: &TagList) -> TagList {
        let mut next = tags.clone();
        self.apply(&mut next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_trims_and_drops_blanks() {
        let tags = TagList::parse(" priority ,shipped,, custom_due_date:2024-01-01 ");
        assert_eq!(
            tags.as_slice(),
            ["priority", "shipped", "custom_due_date:2024-01-01"]
        );
    }

    #[test]
    fn deserializes_from_joined_string_array_and_null() {
        let joined: TagList = serde_json::from_str(r#""a, b""#).unwrap();
        let list: TagList = serde_json::from_str(r#"["a", " b "]"#).unwrap();
        let null: TagList = serde_json::from_str("null").unwrap();
        assert_eq!(joined, list);
        assert!(null.is_empty());
    }

    #[test]
    fn contains_is_case_insensitive() {
        let tags = TagList::parse("Shipped");
        assert!(tags.contains("shipped"));
        assert!(tags.contains(" SHIPPED "));
        assert!(!tags.contains("ship"));
    }

    #[test]
    fn value_of_returns_first_match_and_keeps_value_case() {
        let tags = TagList::parse("Cancellation_Reason: Customer Changed Mind, cancellation_reason:later");
        assert_eq!(
            tags.value_of("cancellation_reason"),
            Some("Customer Changed Mind")
        );
    }

    #[test]
    fn value_keeps_everything_after_first_colon() {
        let tags = TagList::parse("note:pick up at 10:30");
        assert_eq!(tags.value_of("note"), Some("pick up at 10:30"));
    }

    #[test]
    fn add_skips_existing_tag() {
        let mut tags = TagList::parse("priority");
        assert!(!tags.add("PRIORITY"));
        assert!(tags.add("shipped"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn set_value_replaces_all_previous_values() {
        let mut tags = TagList::parse("custom_due_date:2024-01-01, x, custom_due_date:2024-02-01");
        tags.set_value("custom_due_date", "2024-03-01");
        assert_eq!(tags.as_slice(), ["x", "custom_due_date:2024-03-01"]);
    }

    #[test]
    fn edit_applies_ops_in_order() {
        let tags = TagList::parse("confirmed, priority");
        let edit = TagEdit::new()
            .remove("confirmed")
            .add("shipped")
            .set_value("shipping_date", "2024-05-02");
        let next = edit.applied_to(&tags);
        assert_eq!(
            next.as_slice(),
            ["priority", "shipped", "shipping_date:2024-05-02"]
        );
        assert_eq!(tags.len(), 2, "original list is untouched");
    }
}
