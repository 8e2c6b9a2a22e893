use async_trait::async_trait;

use crate::{Error, RegistryError};

mod filesystem;
pub use filesystem::FilesystemStore;

mod memory;
pub use memory::MemoryStore;

/// Outcome of filling a buffer w/ repository names,
///
#[derive(Debug)]
pub enum FillOutcome {
    /// More names follow the last one filled,
    ///
    More,
    /// No names follow the last one filled,
    ///
    End,
    /// The collection root does not exist, same as an empty collection,
    ///
    PathNotFound,
    /// The backend failed,
    ///
    Failure(Error),
}

/// Trait to implement for storage that can enumerate repository names in ascending order,
///
#[async_trait]
pub trait RepositoryEnumerator {
    /// Appends up to `limit` repository names that sort strictly after `last` to `buffer`,
    ///
    /// Returns whether more names remain after the last one appended,
    ///
    async fn fill(&self, buffer: &mut Vec<String>, limit: usize, last: &str) -> FillOutcome;
}

/// Error returned when looking up the tags of a repository,
///
#[derive(Debug)]
pub enum TagLookupError {
    /// The repository does not exist,
    ///
    RepositoryUnknown(String),
    /// The backend already produced a registry error,
    ///
    Registry(RegistryError),
    /// Any other failure,
    ///
    Other(Error),
}

/// Trait to implement for storage that can return every tag of a repository,
///
#[async_trait]
pub trait TagEnumerator {
    /// Returns all tags of `repository`, in no particular order,
    ///
    async fn all_tags(&self, repository: &str) -> Result<Vec<String>, TagLookupError>;
}

impl From<Error> for TagLookupError {
    fn from(value: Error) -> Self {
        TagLookupError::Other(value)
    }
}
