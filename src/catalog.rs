use std::sync::Arc;

use hyper::Uri;
use poem::{handler, web::Data, IntoResponse, Request, Response};
use serde::{Deserialize, Serialize};
use tracing::{event, Level};

use crate::enumeration::{Enumeration, Repositories, RepositoryWindow};
use crate::listing::api_uri;
use crate::{Errors, Listing, PagingParameters, RegistryError};

/// Body of the catalog api response,
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub repositories: Vec<String>,
}

/// Lists repository names one page at a time,
///
/// ```markdown
/// | ID     | Method | API Endpoint                                 | Success | Failure |
/// | ------ | ------ | -------------------------------------------- | ------- | ------- |
/// | cat-1  | `GET`  | `/v2/_catalog`                               | `200`   | `500`   |
/// | cat-2  | `GET`  | `/v2/_catalog?n=<integer>&last=<string>`     | `200`   | `400`   |
/// ```
///
/// The catalog is always paginated, w/o paging parameters the default page size is used,
///
pub struct CatalogLister {
    store: Repositories,
    paging: PagingParameters,
}

impl CatalogLister {
    /// Returns a new catalog lister,
    ///
    pub fn new(store: Repositories, paging: PagingParameters) -> Self {
        Self { store, paging }
    }

    /// Lists the page of repositories requested by `uri`,
    ///
    pub async fn list(&self, uri: &Uri) -> Result<Listing<CatalogResponse>, Errors> {
        let mut page = self.paging.parse(uri.query());
        self.paging.check_limit(&page)?;

        let window = RepositoryWindow::new(self.store.clone())
            .window(&page)
            .await?;

        let link = match window.next_cursor() {
            Some(last) => {
                page.last = last.to_string();
                let link = self
                    .paging
                    .create_link(&uri.to_string(), &page)
                    .map_err(RegistryError::from)?;
                Some(link)
            }
            None => None,
        };

        event!(
            Level::DEBUG,
            "Listing {} repositories, more: {}",
            window.items.len(),
            link.is_some()
        );

        Ok(Listing {
            body: CatalogResponse {
                repositories: window.items,
            },
            link,
        })
    }
}

/// Handler for the catalog api,
///
#[handler]
pub async fn catalog_api(request: &Request, lister: Data<&Arc<CatalogLister>>) -> Response {
    event!(Level::DEBUG, "Got catalog request, {}", request.uri());
    event!(Level::TRACE, "{:#?}", request);

    let uri = match api_uri(request) {
        Ok(uri) => uri,
        Err(err) => return Errors::from(err).into_response(),
    };

    match lister.list(&uri).await {
        Ok(listing) => listing.into_response(),
        Err(errors) => errors.into_response(),
    }
}
