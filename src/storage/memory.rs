use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use super::{FillOutcome, RepositoryEnumerator, TagEnumerator, TagLookupError};

/// Storage that keeps repositories and tags in memory,
///
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    repositories: BTreeMap<String, BTreeSet<String>>,
}

impl MemoryStore {
    /// Adds a repository w/o any tags,
    ///
    pub fn with_repository(mut self, name: impl Into<String>) -> Self {
        self.repositories.entry(name.into()).or_default();
        self
    }

    /// Adds tags to a repository, adding the repository if needed,
    ///
    pub fn with_tags<T>(mut self, name: impl Into<String>, tags: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<String>,
    {
        self.repositories
            .entry(name.into())
            .or_default()
            .extend(tags.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl RepositoryEnumerator for MemoryStore {
    async fn fill(&self, buffer: &mut Vec<String>, limit: usize, last: &str) -> FillOutcome {
        let mut names = self
            .repositories
            .keys()
            .filter(|name| name.as_str() > last);

        buffer.extend(names.by_ref().take(limit).cloned());

        if names.next().is_some() {
            FillOutcome::More
        } else {
            FillOutcome::End
        }
    }
}

#[async_trait]
impl TagEnumerator for MemoryStore {
    async fn all_tags(&self, repository: &str) -> Result<Vec<String>, TagLookupError> {
        self.repositories
            .get(repository)
            .map(|tags| tags.iter().cloned().collect())
            .ok_or_else(|| TagLookupError::RepositoryUnknown(repository.to_string()))
    }
}
