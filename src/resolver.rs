//! Case-insensitive lookup of configured sets.

use crate::config::{ResponsiveConfig, SetConfig};
use indexmap::IndexMap;

/// A configured set together with the name it was declared under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSet {
    pub name: String,
    pub config: SetConfig,
}

/// Immutable snapshot of the configured sets, keyed by lower-cased name.
///
/// When two names differ only in case, the later declaration wins.
#[derive(Debug, Clone, Default)]
pub struct SetResolver {
    sets: IndexMap<String, NamedSet>,
}

impl SetResolver {
    pub fn new(config: &ResponsiveConfig) -> Self {
        let mut sets: IndexMap<String, NamedSet> = IndexMap::with_capacity(config.sets.len());
        for (name, set) in &config.sets {
            let key = name.to_ascii_lowercase();
            let named = NamedSet {
                name: name.clone(),
                config: set.clone(),
            };
            if let Some(previous) = sets.get_mut(&key) {
                tracing::warn!(
                    kept = %name,
                    replaced = %previous.name,
                    "set names collide case-insensitively"
                );
                *previous = named;
            } else {
                sets.insert(key, named);
            }
        }
        Self { sets }
    }

    /// Configuration of the set called `name`, ignoring case.
    pub fn get_config_for_set(&self, name: &str) -> Option<&SetConfig> {
        self.get(name).map(|named| &named.config)
    }

    /// Like [`get_config_for_set`](Self::get_config_for_set), with the
    /// declared name.
    pub fn get(&self, name: &str) -> Option<&NamedSet> {
        self.sets.get(&name.to_ascii_lowercase())
    }

    /// Lower-cased names of all sets, without duplicates, in declaration order.
    pub fn list_available_sets(&self) -> Vec<String> {
        self.sets.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedSet)> {
        self.sets.iter().map(|(key, named)| (key.as_str(), named))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
