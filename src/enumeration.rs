use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{event, Level};

use crate::storage::{FillOutcome, RepositoryEnumerator, TagEnumerator, TagLookupError};
use crate::{page_filter, ErrorCode, PageRequest, RegistryError, ResultWindow};

/// Shared handle to a repository enumerator,
///
pub type Repositories = Arc<dyn RepositoryEnumerator + Send + Sync + 'static>;

/// Shared handle to a tag enumerator,
///
pub type Tags = Arc<dyn TagEnumerator + Send + Sync + 'static>;

/// Trait for a collection of keys that can be listed one window at a time,
///
/// Implementations return keys in ascending order w/o duplicates, starting strictly after the page cursor,
///
#[async_trait]
pub trait Enumeration {
    /// Returns the window of keys described by `page`,
    ///
    async fn window(&self, page: &PageRequest) -> Result<ResultWindow, RegistryError>;
}

/// Enumerates repositories by letting storage fill a buffer w/ up to a page of names,
///
/// The buffer grows w/ the names storage actually returns, so a large page size does not allocate up front,
///
pub struct RepositoryWindow {
    store: Repositories,
}

impl RepositoryWindow {
    /// Returns a new repository window over storage,
    ///
    pub fn new(store: Repositories) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Enumeration for RepositoryWindow {
    async fn window(&self, page: &PageRequest) -> Result<ResultWindow, RegistryError> {
        if page.n == 0 {
            return Ok(ResultWindow::default());
        }

        let mut buffer = vec![];
        let outcome = self.store.fill(&mut buffer, page.n, &page.last).await;
        buffer.truncate(page.n);
        let filled = buffer.len();

        let truncated = match outcome {
            FillOutcome::More if filled == page.n => true,
            FillOutcome::More => {
                event!(
                    Level::WARN,
                    "Storage reported more repositories w/ a partial fill, {filled}/{}",
                    page.n
                );
                false
            }
            FillOutcome::End => false,
            FillOutcome::PathNotFound => {
                event!(Level::DEBUG, "Repositories root not found, treating as empty");
                false
            }
            FillOutcome::Failure(err) => {
                event!(Level::ERROR, "Could not enumerate repositories, {err}");
                return Err(ErrorCode::Unknown.with_detail(err.to_string()));
            }
        };

        Ok(ResultWindow {
            items: buffer,
            truncated,
        })
    }
}

/// Enumerates the tags of one repository by fetching every tag, then filtering in-process,
///
pub struct TagWindow {
    store: Tags,
    repository: String,
}

impl TagWindow {
    /// Returns a new tag window over a repository,
    ///
    pub fn new(store: Tags, repository: impl Into<String>) -> Self {
        Self {
            store,
            repository: repository.into(),
        }
    }

    /// Returns every tag of the repository in ascending order,
    ///
    /// Storage does not have to return tags in order, so they are sorted and de-duplicated here,
    ///
    pub async fn all(&self) -> Result<Vec<String>, RegistryError> {
        let mut tags = self
            .store
            .all_tags(&self.repository)
            .await
            .map_err(|err| self.classify(err))?;

        tags.sort();
        tags.dedup();
        Ok(tags)
    }

    /// Converts a tag lookup error into the registry error returned to the client,
    ///
    fn classify(&self, err: TagLookupError) -> RegistryError {
        match err {
            TagLookupError::RepositoryUnknown(_) => {
                event!(Level::DEBUG, "Repository not found, {}", self.repository);
                ErrorCode::NameUnknown.with_detail(json!({ "name": self.repository }))
            }
            TagLookupError::Registry(err) => err,
            TagLookupError::Other(err) => {
                event!(Level::ERROR, "Could not list tags for {}, {err}", self.repository);
                ErrorCode::Unknown.with_detail(err.to_string())
            }
        }
    }
}

#[async_trait]
impl Enumeration for TagWindow {
    async fn window(&self, page: &PageRequest) -> Result<ResultWindow, RegistryError> {
        let tags = self.all().await?;
        Ok(page_filter(&tags, &page.last, page.n))
    }
}
