use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{event, Level};

use super::{FillOutcome, RepositoryEnumerator, TagEnumerator, TagLookupError};
use crate::Error;

/// Path of the repositories root, relative to the storage root,
///
const REPOSITORIES_ROOT: &'static str = "docker/registry/v2/repositories";

/// Storage that reads the on-disk layout of a distribution filesystem driver,
///
/// ```markdown
/// <root>/docker/registry/v2/repositories/<name>/_manifests/tags/<tag>/
/// ```
///
/// A directory is a repository if it has a child directory starting w/ `_`, repositories may be nested,
///
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Returns a store for the storage root,
    ///
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory that contains repositories,
    ///
    pub fn repositories_root(&self) -> PathBuf {
        self.root.join(REPOSITORIES_ROOT)
    }

    /// Walks the repositories root and returns every repository name after `last` in ascending order,
    ///
    /// Names are not yielded in string order by the walk, so each call reads every subtree that could
    /// hold a name after `last` and sorts the result. Cost is proportional to the remaining catalog, not the page,
    ///
    async fn repositories(&self, last: &str) -> std::io::Result<Vec<String>> {
        let root = self.repositories_root();

        let mut found = vec![];
        let mut pending = vec![PathBuf::new()];
        while let Some(relative) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(root.join(&relative)).await {
                Ok(entries) => entries,
                // Removed while walking
                Err(err) if err.kind() == ErrorKind::NotFound && relative.components().next().is_some() => {
                    continue;
                }
                Err(err) => return Err(err),
            };

            let mut is_repository = false;
            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_dir() {
                    continue;
                }

                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('_') {
                    is_repository = true;
                    continue;
                }

                let child = relative.join(name);
                if before_cursor(&repository_name(&child), last) {
                    event!(Level::TRACE, "Skipping {:?}, sorts before {last}", child);
                } else {
                    pending.push(child);
                }
            }

            if is_repository && relative.components().next().is_some() {
                let name = repository_name(&relative);
                if name.as_str() > last {
                    found.push(name);
                }
            }
        }

        found.sort();
        Ok(found)
    }
}

/// Returns true if `name` and every name nested under it sort at or before `last`,
///
fn before_cursor(name: &str, last: &str) -> bool {
    let prefix = format!("{name}/");
    last > prefix.as_str() && !last.starts_with(&prefix)
}

fn repository_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl RepositoryEnumerator for FilesystemStore {
    async fn fill(&self, buffer: &mut Vec<String>, limit: usize, last: &str) -> FillOutcome {
        let repositories = match self.repositories(last).await {
            Ok(repositories) => repositories,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                event!(
                    Level::DEBUG,
                    "Repositories root does not exist, {:?}",
                    self.repositories_root()
                );
                return FillOutcome::PathNotFound;
            }
            Err(err) => return FillOutcome::Failure(Error::from(err)),
        };

        let mut remaining = repositories.into_iter();
        buffer.extend(remaining.by_ref().take(limit));

        if remaining.next().is_some() {
            FillOutcome::More
        } else {
            FillOutcome::End
        }
    }
}

#[async_trait]
impl TagEnumerator for FilesystemStore {
    async fn all_tags(&self, repository: &str) -> Result<Vec<String>, TagLookupError> {
        let tags_root = self
            .repositories_root()
            .join(repository)
            .join("_manifests")
            .join("tags");

        let mut entries = match tokio::fs::read_dir(&tags_root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(TagLookupError::RepositoryUnknown(repository.to_string()));
            }
            Err(err) => return Err(Error::from(err).into()),
        };

        let mut tags = vec![];
        while let Some(entry) = entries.next_entry().await.map_err(Error::from)? {
            if entry.file_type().await.map_err(Error::from)?.is_dir() {
                tags.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        event!(Level::TRACE, "Found {} tags for {repository}", tags.len());
        Ok(tags)
    }
}

#[allow(unused_imports)]
#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::before_cursor;
    use crate::storage::{FillOutcome, RepositoryEnumerator, TagEnumerator, TagLookupError};
    use crate::FilesystemStore;

    /// Creates a test storage root under .test/<name>,
    ///
    fn create_test_root(name: &str, repositories: Vec<(&str, Vec<&str>)>) -> FilesystemStore {
        let root = Path::new(".test").join(name);
        if root.exists() {
            std::fs::remove_dir_all(&root).expect("should be able to clean test dir");
        }

        let store = FilesystemStore::new(&root);
        for (repository, tags) in repositories {
            let manifests = store.repositories_root().join(repository).join("_manifests");
            std::fs::create_dir_all(manifests.join("revisions"))
                .expect("should be able to create test dir");
            for tag in tags.iter() {
                std::fs::create_dir_all(manifests.join("tags").join(tag).join("current"))
                    .expect("should be able to create test dir");
            }
        }
        store
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_filesystem_fill() {
        let store = create_test_root(
            "test_filesystem_fill",
            vec![
                ("library/ubuntu", vec!["latest"]),
                ("library/alpine", vec!["3.18"]),
                ("library/alpine/nested", vec![]),
                ("library-x", vec![]),
                ("zeta", vec![]),
            ],
        );

        let mut buffer = vec![];
        let outcome = store.fill(&mut buffer, 10, "").await;
        assert!(matches!(outcome, FillOutcome::End));
        assert_eq!(
            vec![
                "library-x",
                "library/alpine",
                "library/alpine/nested",
                "library/ubuntu",
                "zeta"
            ],
            buffer
        );

        let mut buffer = vec![];
        let outcome = store.fill(&mut buffer, 2, "library/alpine").await;
        assert!(matches!(outcome, FillOutcome::More));
        assert_eq!(vec!["library/alpine/nested", "library/ubuntu"], buffer);

        let mut buffer = vec![];
        let outcome = store.fill(&mut buffer, 2, "library/ubuntu").await;
        assert!(matches!(outcome, FillOutcome::End));
        assert_eq!(vec!["zeta"], buffer);

        let mut buffer = vec![];
        let outcome = store.fill(&mut buffer, usize::MAX, "library-x").await;
        assert!(matches!(outcome, FillOutcome::End));
        assert_eq!(4, buffer.len());
    }

    #[test]
    fn test_before_cursor() {
        assert!(before_cursor("library-x", "library/alpine"));
        assert!(before_cursor("library/alpine", "library/ubuntu"));
        assert!(!before_cursor("library", "library/alpine"));
        assert!(!before_cursor("library/alpine", "library/alpine"));
        assert!(!before_cursor("zeta", "library/ubuntu"));
        assert!(!before_cursor("a", ""));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_filesystem_missing_root() {
        let store = FilesystemStore::new(".test/test_filesystem_missing_root/does-not-exist");

        let mut buffer = vec![];
        let outcome = store.fill(&mut buffer, 10, "").await;
        assert!(buffer.is_empty());
        assert!(matches!(outcome, FillOutcome::PathNotFound));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_filesystem_tags() {
        let store = create_test_root(
            "test_filesystem_tags",
            vec![("library/ubuntu", vec!["latest", "20.04", "22.04"])],
        );

        let mut tags = store
            .all_tags("library/ubuntu")
            .await
            .expect("should have tags");
        tags.sort();
        assert_eq!(vec!["20.04", "22.04", "latest"], tags);

        match store.all_tags("library/missing").await {
            Err(TagLookupError::RepositoryUnknown(name)) => assert_eq!("library/missing", name),
            _ => panic!("should be an unknown repository"),
        }
    }
}
