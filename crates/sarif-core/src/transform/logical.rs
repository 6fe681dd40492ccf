//! Conversion between the 2.1.0 indexed logical location array and the
//! 1.0.0 keyed logical location map.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::visit::walk_run_v1;
use crate::model::v1::{LogicalLocationV1, RunV1};
use crate::model::v2::LogicalLocation;

/// Appends `-N` to `base`.
pub fn disambiguated_name(base: &str, n: usize) -> String {
    format!("{base}-{n}")
}

/// Makes every key in `bases` unique. The first occurrence keeps its key;
/// later ones get `-0`, `-1`, ... with one counter per colliding base key,
/// skipping candidates that are already taken.
pub fn unique_keys<I: IntoIterator<Item = String>>(bases: I) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut keys = Vec::new();

    for base in bases {
        let key = if used.contains(&base) {
            let counter = counters.entry(base.clone()).or_insert(0);
            loop {
                let candidate = disambiguated_name(&base, *counter);
                *counter += 1;
                if !used.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            base
        };

        used.insert(key.clone());
        keys.push(key);
    }
    keys
}

/// 1.0.0 keys synthesized for a 2.1.0 logical location array. The base key
/// of an entry is its fully qualified name, falling back to its name.
#[derive(Debug, Default)]
pub struct LogicalKeys {
    keys: Vec<String>,
}

impl LogicalKeys {
    pub fn build(locations: &[LogicalLocation]) -> Self {
        let keys = unique_keys(locations.iter().enumerate().map(|(index, location)| {
            location
                .fully_qualified_name
                .clone()
                .or_else(|| location.name.clone())
                .unwrap_or_else(|| index.to_string())
        }));
        Self { keys }
    }

    pub fn key(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.keys.get(i))
            .map(String::as_str)
    }

    /// Keyed 1.0.0 map in array order. `name` is dropped when it equals the
    /// key; `parentKey` is resolved after every key is known.
    pub fn to_v1_map(&self, locations: &[LogicalLocation]) -> IndexMap<String, LogicalLocationV1> {
        locations
            .iter()
            .zip(&self.keys)
            .map(|(location, key)| {
                let name = location.name.clone().filter(|n| n != key);
                let parent_key = location
                    .parent_index
                    .and_then(|p| self.key(p))
                    .map(str::to_string);
                (
                    key.clone(),
                    LogicalLocationV1 {
                        name,
                        parent_key,
                        kind: location.kind.clone(),
                    },
                )
            })
            .collect()
    }
}

#[derive(Debug, Default, Clone)]
struct Encountered {
    fully_qualified_name: Option<String>,
}

/// 2.1.0 indices for the entries of a 1.0.0 logical location map, assigned in
/// encounter order. Entries that nothing references follow in map order.
#[derive(Debug, Default)]
pub struct LogicalIndices {
    order: IndexMap<String, Encountered>,
}

impl LogicalIndices {
    pub fn collect(run: &RunV1) -> Self {
        let mut indices = Self::default();
        let Some(map) = run.logical_locations.as_ref() else {
            return indices;
        };

        walk_run_v1(run, &mut |node| {
            if let Some((key, fqln)) = node.logical_reference() {
                let via_key = key.is_some();
                if let Some(k) = key.or(fqln) {
                    indices.register(map, k, if via_key { fqln } else { None });
                }
            }
        });

        for key in map.keys() {
            indices.register(map, key, None);
        }
        indices
    }

    fn register(
        &mut self,
        map: &IndexMap<String, LogicalLocationV1>,
        key: &str,
        fully_qualified_name: Option<&str>,
    ) {
        let mut current = Some(key);
        let mut fqn = fully_qualified_name;

        while let Some(k) = current {
            if !map.contains_key(k) {
                return;
            }
            match self.order.get_mut(k) {
                Some(existing) => {
                    if existing.fully_qualified_name.is_none() {
                        existing.fully_qualified_name = fqn.map(str::to_string);
                    }
                    return;
                }
                None => {
                    self.order.insert(
                        k.to_string(),
                        Encountered {
                            fully_qualified_name: fqn.map(str::to_string),
                        },
                    );
                }
            }
            current = map.get(k).and_then(|l| l.parent_key.as_deref());
            fqn = None;
        }
    }

    pub fn index(&self, key: &str) -> Option<i64> {
        self.order.get_index_of(key).map(|i| i as i64)
    }

    /// Fully qualified name recorded for `key`, defaulting to the key.
    pub fn fully_qualified_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.order
            .get(key)
            .and_then(|e| e.fully_qualified_name.as_deref())
            .unwrap_or(key)
    }

    pub fn to_v2_array(&self, map: &IndexMap<String, LogicalLocationV1>) -> Vec<LogicalLocation> {
        self.order
            .keys()
            .filter_map(|key| {
                let v1 = map.get(key)?;
                Some(LogicalLocation {
                    name: v1.name.clone().or_else(|| Some(key.clone())),
                    fully_qualified_name: Some(self.fully_qualified_name(key).to_string()),
                    parent_index: v1.parent_key.as_deref().and_then(|p| self.index(p)),
                    kind: v1.kind.clone(),
                    ..Default::default()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logical(name: &str, fqn: &str, parent: Option<i64>) -> LogicalLocation {
        LogicalLocation {
            name: Some(name.into()),
            fully_qualified_name: Some(fqn.into()),
            parent_index: parent,
            kind: Some("function".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_colliding_names_get_suffix() {
        let locations = vec![
            logical("Rules", "Rules", None),
            logical("Register", "Rules.SecureHashAlgorithmRule.Register", Some(0)),
            logical("SecureHashAlgorithmRule", "Rules.SecureHashAlgorithmRule", Some(0)),
            logical("Other", "Rules.Other", Some(0)),
            logical("Register", "Rules.SecureHashAlgorithmRule.Register", Some(2)),
        ];
        let keys = LogicalKeys::build(&locations);
        assert_eq!(keys.key(1), Some("Rules.SecureHashAlgorithmRule.Register"));
        assert_eq!(keys.key(4), Some("Rules.SecureHashAlgorithmRule.Register-0"));

        let map = keys.to_v1_map(&locations);
        let second = &map["Rules.SecureHashAlgorithmRule.Register-0"];
        assert_eq!(second.name.as_deref(), Some("Register"));
        assert_eq!(second.parent_key.as_deref(), Some("Rules.SecureHashAlgorithmRule"));
        assert_eq!(map["Rules"].name, None);
    }

    #[test]
    fn test_counter_is_per_base_key() {
        let locations = vec![
            logical("a", "A", None),
            logical("b", "B", None),
            logical("a", "A", None),
            logical("b", "B", None),
            logical("a", "A", None),
        ];
        let keys = LogicalKeys::build(&locations);
        let all: Vec<_> = (0..5).map(|i| keys.key(i).unwrap().to_string()).collect();
        assert_eq!(all, vec!["A", "B", "A-0", "B-0", "A-1"]);
    }

    #[test]
    fn test_suffix_skips_existing_key() {
        let locations = vec![
            logical("x", "X", None),
            logical("x0", "X-0", None),
            logical("x", "X", None),
        ];
        let keys = LogicalKeys::build(&locations);
        assert_eq!(keys.key(2), Some("X-1"));
    }

    #[test]
    fn test_indices_follow_encounter_order() {
        let run: RunV1 = serde_json::from_str(
            r#"{
                "tool": {"name": "t"},
                "logicalLocations": {
                    "N": {"kind": "namespace"},
                    "N.T": {"name": "T", "parentKey": "N", "kind": "type"},
                    "N.T.M": {"name": "M", "parentKey": "N.T", "kind": "member"},
                    "Unused": {}
                },
                "results": [
                    {"locations": [{"fullyQualifiedLogicalName": "N.T.M"}]},
                    {"locations": [{"fullyQualifiedLogicalName": "N.T.M(int)", "logicalLocationKey": "N.T"}]}
                ]
            }"#,
        )
        .unwrap();

        let indices = LogicalIndices::collect(&run);
        assert_eq!(indices.index("N.T.M"), Some(0));
        assert_eq!(indices.index("N.T"), Some(1));
        assert_eq!(indices.index("N"), Some(2));
        assert_eq!(indices.index("Unused"), Some(3));

        let array = indices.to_v2_array(run.logical_locations.as_ref().unwrap());
        assert_eq!(array[0].parent_index, Some(1));
        assert_eq!(array[1].parent_index, Some(2));
        assert_eq!(array[2].parent_index, None);
        assert_eq!(array[2].name.as_deref(), Some("N"));
        assert_eq!(array[3].fully_qualified_name.as_deref(), Some("Unused"));
    }
}
