//! Collection management for discovered projects.
//!
//! This module provides [`ProjectCollection`], the insertion-ordered set of
//! [`ProjectRecord`]s keyed by relative path that every project source builds.

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer};

use super::ProjectRecord;

/// Discovered projects in discovery order, unique by path.
///
/// A collection is filled once by a project source and only read afterwards.
#[derive(Clone, Debug, Default)]
pub struct ProjectCollection {
    records: Vec<ProjectRecord>,
    index: HashMap<String, usize>,
}

impl ProjectCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record unless its path is already present.
    ///
    /// # Returns
    ///
    /// `true` if the record was added, `false` if a record with the same path
    /// was already in the collection. The existing record is left untouched.
    pub fn insert(&mut self, record: ProjectRecord) -> bool {
        if self.index.contains_key(record.path()) {
            return false;
        }

        self.index
            .insert(record.path().to_owned(), self.records.len());
        self.records.push(record);
        true
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ProjectRecord> {
        self.index.get(path).map(|&i| &self.records[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they were discovered.
    pub fn iter(&self) -> std::slice::Iter<'_, ProjectRecord> {
        self.records.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(ProjectRecord::path)
    }

    /// Group records by category.
    ///
    /// Categories are sorted; the root category is the empty string and comes
    /// first. Within a category records keep their discovery order.
    #[must_use]
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&ProjectRecord>> {
        group_by_category(&self.records)
    }

    /// Records whose path or description contains `text`, ignoring case.
    #[must_use]
    pub fn search(&self, text: &str) -> Vec<&ProjectRecord> {
        let needle = text.to_lowercase();

        self.records
            .iter()
            .filter(|record| {
                record.path().to_lowercase().contains(&needle)
                    || record
                        .description()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ProjectCollection {
    type Item = &'a ProjectRecord;
    type IntoIter = std::slice::Iter<'a, ProjectRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for ProjectCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.records)
    }
}

/// Group any selection of records by category, as [`ProjectCollection::by_category`]
/// does for a whole collection.
#[must_use]
pub fn group_by_category<'a>(
    records: impl IntoIterator<Item = &'a ProjectRecord>,
) -> BTreeMap<&'a str, Vec<&'a ProjectRecord>> {
    let mut groups: BTreeMap<&str, Vec<&ProjectRecord>> = BTreeMap::new();

    for record in records {
        groups.entry(record.category()).or_default().push(record);
    }

    groups
}
