use std::sync::Arc;

use hyper::StatusCode;
use poem::{get, handler, EndpointExt, Response, Route};
use tracing::{event, Level};

use crate::enumeration::{Repositories, Tags};
use crate::listing::API_PREFIX;
use crate::storage::{RepositoryEnumerator, TagEnumerator};
use crate::{catalog_api, tags_api, CatalogLister, PagingConfig, PagingParameters, TagLister};

/// Path of the tags api, relative to /v2, the capture ends w/ the `/tags` segment
///
const TAGS_PATH: &'static str = "/:repo<[a-zA-Z0-9/._-]+/tags>/list";

/// Registry api app that serves the list endpoints,
///
pub struct ListingApp {
    catalog: Arc<CatalogLister>,
    tags: Arc<TagLister>,
}

impl ListingApp {
    /// Creates a new app over storage that can enumerate both repositories and tags,
    ///
    pub fn new<S>(store: Arc<S>, paging: PagingConfig) -> Self
    where
        S: RepositoryEnumerator + TagEnumerator + Send + Sync + 'static,
    {
        let repositories: Repositories = store.clone();
        let tags: Tags = store;
        Self::with_stores(repositories, tags, paging)
    }

    /// Creates a new app w/ seperate repository and tag storage,
    ///
    pub fn with_stores(repositories: Repositories, tags: Tags, paging: PagingConfig) -> Self {
        let paging = PagingParameters::new(paging);
        Self {
            catalog: Arc::new(CatalogLister::new(repositories, paging.clone())),
            tags: Arc::new(TagLister::new(tags, paging)),
        }
    }

    /// Returns the routes for this app,
    ///
    pub fn routes(&self) -> Route {
        event!(Level::DEBUG, "adding path GET {API_PREFIX}/_catalog");
        event!(Level::DEBUG, "adding path GET {API_PREFIX}{TAGS_PATH}");

        let route = Route::new()
            .at("/", get(base_api))
            .at("/_catalog", get(catalog_api).data(self.catalog.clone()))
            .at(TAGS_PATH, get(tags_api).data(self.tags.clone()));

        Route::new().nest(API_PREFIX, route)
    }
}

/// Api version check,
///
#[handler]
async fn base_api() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header("Docker-Distribution-API-Version", "registry/2.0")
        .content_type(crate::JSON_CONTENT_TYPE)
        .body("{}")
}
