//! Clustering registry: named groupings of countries marked for styling.
//!
//! A clustering maps group names to country names. Adding one marks each
//! listed country with the selector `encode(id) + "__" + encode(group)`;
//! removing it strips those marks again.

#[cfg(test)]
#[path = "clustering_test.rs"]
mod clustering_test;

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::countries::CountryRegistry;

/// Group name → country names.
pub type Groups = BTreeMap<String, Vec<String>>;

/// Keep ASCII alphanumerics and `-`; everything else becomes `_xx` per UTF-8 byte.
#[must_use]
pub fn encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
            continue;
        }
        let mut buf = [0u8; 4];
        for b in c.encode_utf8(&mut buf).bytes() {
            // Writing to a String cannot fail.
            if write!(out, "_{b:02x}").is_err() {
                break;
            }
        }
    }
    out
}

/// Selector for one group of a clustering.
#[must_use]
pub fn selector(id: &str, group: &str) -> String {
    format!("{}__{}", encode(id), encode(group))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusteringRegistry {
    entries: BTreeMap<String, Groups>,
}

impl ClusteringRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a clustering and mark its countries. Existing ids are rejected untouched.
    ///
    /// With no registry loaded yet the marks are applied later by [`Self::apply_all`].
    pub fn add(&mut self, id: &str, groups: Groups, countries: Option<&mut CountryRegistry>) -> bool {
        if self.entries.contains_key(id) {
            tracing::warn!(clustering = id, "clustering already exists");
            return false;
        }
        if let Some(countries) = countries {
            mark(id, &groups, countries);
        }
        self.entries.insert(id.to_owned(), groups);
        true
    }

    /// Unmark the clustering's countries and forget it.
    pub fn remove(&mut self, id: &str, countries: Option<&mut CountryRegistry>) -> bool {
        let Some(groups) = self.entries.remove(id) else {
            return false;
        };
        if let Some(countries) = countries {
            for group in groups.keys() {
                countries.unmark_all(&selector(id, group));
            }
        }
        true
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Groups> {
        self.entries.get(id)
    }

    /// Selector of a stored group; `None` for unknown ids or groups.
    #[must_use]
    pub fn selector(&self, id: &str, group: &str) -> Option<String> {
        self.entries.get(id)?.contains_key(group).then(|| selector(id, group))
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Re-apply every stored clustering, e.g. after the countries are (re)loaded.
    pub fn apply_all(&self, countries: &mut CountryRegistry) {
        for (id, groups) in &self.entries {
            mark(id, groups, countries);
        }
    }
}

fn mark(id: &str, groups: &Groups, countries: &mut CountryRegistry) {
    for (group, names) in groups {
        let sel = selector(id, group);
        for name in names {
            match countries.id(name) {
                Some(cid) => {
                    countries.mark(cid, &sel);
                }
                None => tracing::debug!(clustering = id, country = %name, "unknown country in clustering"),
            }
        }
    }
}
