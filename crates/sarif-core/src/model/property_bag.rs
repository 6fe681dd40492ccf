use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::version::SarifVersion;

/// Reserved key holding the compact 1.0.0 pre-image of a run.
pub const V1_RUN_KEY: &str = "sarifv1/run";
/// Reserved key holding the compact 2.1.0 pre-image of a run.
pub const V2_RUN_KEY: &str = "sarifv2/run";

pub fn run_stash_key(version: SarifVersion) -> &'static str {
    match version {
        SarifVersion::OneZeroZero => V1_RUN_KEY,
        SarifVersion::Current => V2_RUN_KEY,
    }
}

/// Open-ended extension map attached to most SARIF entities.
///
/// Values are kept as raw JSON text so that whatever was read is written back
/// byte-for-byte, and insertion order is preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(IndexMap<String, Box<RawValue>>);

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.get()))
    }

    /// Raw JSON text stored under `key`.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.get())
    }

    /// Typed view of a value; `None` when absent or not of type `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0
            .get(key)
            .and_then(|v| serde_json::from_str(v.get()).ok())
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> serde_json::Result<()> {
        let raw = serde_json::value::to_raw_value(value)?;
        self.0.insert(key.to_string(), raw);
        Ok(())
    }

    /// Stores already-serialized JSON text without re-encoding it.
    pub fn set_raw(&mut self, key: &str, json_text: String) -> serde_json::Result<()> {
        let raw = RawValue::from_string(json_text)?;
        self.0.insert(key.to_string(), raw);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<RawValue>> {
        self.0.shift_remove(key)
    }

    /// Drops both run stash keys.
    pub fn strip_run_stashes(&mut self) {
        self.remove(V1_RUN_KEY);
        self.remove(V2_RUN_KEY);
    }

    /// Drops every `sarifv{N}/...` entry written by an earlier transform.
    pub fn strip_transformer_items(&mut self) {
        self.0
            .retain(|k, _| !(k.starts_with("sarifv1/") || k.starts_with("sarifv2/")));
    }
}

impl PartialEq for PropertyBag {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va.get() == vb.get())
    }
}

/// Copies a source bag for the destination entity, minus transformer items.
/// Returns `None` for an absent source so no empty `properties` is invented.
pub(crate) fn carry_properties(source: &Option<PropertyBag>) -> Option<PropertyBag> {
    source.as_ref().map(|bag| {
        let mut bag = bag.clone();
        bag.strip_transformer_items();
        bag
    })
}

/// Collapses an empty bag to `None` unless the source had one.
pub(crate) fn non_empty(bag: PropertyBag, source_had_bag: bool) -> Option<PropertyBag> {
    if bag.is_empty() && !source_had_bag {
        None
    } else {
        Some(bag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values_round_trip_verbatim() {
        let text = r#"{"b":[1, 2],"a":{"nested":"x"},"tags":["z"]}"#;
        let bag: PropertyBag = serde_json::from_str(text).unwrap();
        assert_eq!(bag.get_raw("b"), Some("[1, 2]"));
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["b", "a", "tags"]);
        assert_eq!(serde_json::to_string(&bag).unwrap(), text);
    }

    #[test]
    fn test_set_and_remove_preserve_order() {
        let mut bag = PropertyBag::new();
        bag.set("first", &1).unwrap();
        bag.set_raw(V2_RUN_KEY, r#"{"tool":{}}"#.into()).unwrap();
        bag.set("last", "x").unwrap();

        assert_eq!(bag.get_as::<u32>("first"), Some(1));
        assert!(bag.remove(V2_RUN_KEY).is_some());
        assert_eq!(serde_json::to_string(&bag).unwrap(), r#"{"first":1,"last":"x"}"#);
    }

    #[test]
    fn test_strip_transformer_items_keeps_user_keys() {
        let mut bag: PropertyBag = serde_json::from_str(
            r#"{"sarifv1/run":{},"user":true,"sarifv2/encoding":"utf-16","sarifv3/x":1}"#,
        )
        .unwrap();
        bag.strip_transformer_items();
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["user", "sarifv3/x"]);
    }
}
