use std::sync::Arc;

use hyper::{StatusCode, Uri};
use poem::{
    handler,
    web::{Data, Path},
    IntoResponse, Request, Response,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{event, Level};

use crate::enumeration::{Enumeration, TagWindow, Tags};
use crate::listing::api_uri;
use crate::{ErrorCode, Errors, Listing, PagingParameters, RegistryError, TagsPaging};

/// Maximum length of a repository name,
///
const MAX_REPOSITORY_NAME_LEN: usize = 255;

/// Body of the tags api response,
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsResponse {
    pub name: String,
    pub tags: Vec<String>,
}

/// Lists the tags of a repository, based on OCI spec endpoints:
///
/// ```markdown
/// | ID     | Method         | API Endpoint                                                 | Success     | Failure           |
/// | ------ | -------------- | ------------------------------------------------------------ | ----------- | ----------------- |
/// | end-8a | `GET`          | `/v2/<name>/tags/list`                                       | `200`       | `404`             |
/// | end-8b | `GET`          | `/v2/<name>/tags/list?n=<integer>&last=<string>`             | `200`       | `404`             |
/// ```
///
/// Unless configured to always paginate, the full tag list is returned when neither paging parameter is present,
///
pub struct TagLister {
    store: Tags,
    paging: PagingParameters,
}

impl TagLister {
    /// Returns a new tag lister,
    ///
    pub fn new(store: Tags, paging: PagingParameters) -> Self {
        Self { store, paging }
    }

    /// Lists the tags of `name`, paginated as requested by `uri`,
    ///
    pub async fn list(&self, name: &str, uri: &Uri) -> Result<Listing<TagsResponse>, Errors> {
        validate_repository_name(name)?;

        let tags = TagWindow::new(self.store.clone(), name);

        let paginate = match self.paging.config().tags_paging {
            TagsPaging::OnDemand => self.paging.is_enabled(uri.query()),
            TagsPaging::Always => true,
        };

        let (tags, link) = if paginate {
            let mut page = self.paging.parse(uri.query());
            self.paging.check_limit(&page)?;

            let window = tags.window(&page).await?;
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
            (window.items, link)
        } else {
            (tags.all().await?, None)
        };

        event!(
            Level::DEBUG,
            "Listing {} tags for {name}, more: {}",
            tags.len(),
            link.is_some()
        );

        Ok(Listing {
            body: TagsResponse {
                name: name.to_string(),
                tags,
            },
            link,
        })
    }
}

/// Checks that a repository name is made of lowercase alphanumeric components separated by `/`,
///
/// Components may contain `.`, `_`, `__`, or runs of `-` between alphanumeric characters,
///
pub fn validate_repository_name(name: &str) -> Result<(), RegistryError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_REPOSITORY_NAME_LEN
        && name.split('/').all(valid_component);

    if valid {
        Ok(())
    } else {
        event!(Level::DEBUG, "Invalid repository name, {name}");
        Err(ErrorCode::NameInvalid.with_detail(json!({ "name": name })))
    }
}

fn valid_component(component: &str) -> bool {
    let alphanumeric = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();

    let mut separator = String::new();
    let mut chars = component.chars();
    match chars.next() {
        Some(c) if alphanumeric(c) => {}
        _ => return false,
    }

    for c in chars {
        if alphanumeric(c) {
            let valid_separator = separator.is_empty()
                || separator == "."
                || separator == "_"
                || separator == "__"
                || separator.chars().all(|s| s == '-');
            if !valid_separator {
                return false;
            }
            separator.clear();
        } else if matches!(c, '.' | '_' | '-') {
            separator.push(c);
        } else {
            return false;
        }
    }

    separator.is_empty()
}

/// Handler for the tags api,
///
/// The route captures `<name>/tags`, requests w/o a `/tags` segment are not found,
///
#[handler]
pub async fn tags_api(
    request: &Request,
    Path(repo): Path<String>,
    lister: Data<&Arc<TagLister>>,
) -> Response {
    let name = match repo.strip_suffix("/tags") {
        Some(name) => name,
        None => {
            event!(Level::DEBUG, "Path does not end w/ a tags segment, {repo}");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    event!(Level::DEBUG, "Got list_tags request, {name}");
    event!(Level::TRACE, "{:#?}", request);

    let uri = match api_uri(request) {
        Ok(uri) => uri,
        Err(err) => return Errors::from(err).into_response(),
    };

    match lister.list(name, &uri).await {
        Ok(listing) => listing.into_response(),
        Err(errors) => errors.into_response(),
    }
}

#[allow(unused_imports)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hyper::Uri;
    use serde_json::json;

    use super::{validate_repository_name, TagLister};
    use crate::{ErrorCode, MemoryStore, PagingConfig, PagingParameters, TagsPaging};

    fn uri(uri: &str) -> Uri {
        uri.parse().expect("should be a valid uri")
    }

    fn lister(tags: &[&str], config: PagingConfig) -> TagLister {
        let store = MemoryStore::default().with_tags("library/ubuntu", tags.iter().copied());
        TagLister::new(Arc::new(store), PagingParameters::new(config))
    }

    #[tokio::test]
    async fn test_list_paginated() {
        let lister = lister(&["a", "b", "c", "d", "e"], PagingConfig::default());

        let listing = lister
            .list("library/ubuntu", &uri("/v2/library/ubuntu/tags/list?n=2"))
            .await
            .expect("should list");
        assert_eq!("library/ubuntu", listing.body.name);
        assert_eq!(vec!["a", "b"], listing.body.tags);
        assert_eq!(
            Some(r#"</v2/library/ubuntu/tags/list?last=b&n=2>; rel="next""#.to_string()),
            listing.link
        );

        let listing = lister
            .list("library/ubuntu", &uri("/v2/library/ubuntu/tags/list?n=2&last=c"))
            .await
            .expect("should list");
        assert_eq!(vec!["d", "e"], listing.body.tags);
        assert_eq!(None, listing.link);
    }

    #[tokio::test]
    async fn test_list_unpaginated() {
        let tags = (0..150).map(|i| format!("v{i:03}")).collect::<Vec<_>>();
        let tags = tags.iter().map(String::as_str).collect::<Vec<_>>();
        let lister = lister(&tags, PagingConfig::default());

        let listing = lister
            .list("library/ubuntu", &uri("/v2/library/ubuntu/tags/list"))
            .await
            .expect("should list");
        assert_eq!(150, listing.body.tags.len());
        assert_eq!(None, listing.link);

        let listing = lister
            .list("library/ubuntu", &uri("/v2/library/ubuntu/tags/list?last="))
            .await
            .expect("should list");
        assert_eq!(100, listing.body.tags.len());
        assert!(listing.link.is_some());
    }

    #[tokio::test]
    async fn test_list_always_paginated() {
        let tags = (0..150).map(|i| format!("v{i:03}")).collect::<Vec<_>>();
        let tags = tags.iter().map(String::as_str).collect::<Vec<_>>();
        let lister = lister(
            &tags,
            PagingConfig {
                tags_paging: TagsPaging::Always,
                ..Default::default()
            },
        );

        let listing = lister
            .list("library/ubuntu", &uri("/v2/library/ubuntu/tags/list"))
            .await
            .expect("should list");
        assert_eq!(100, listing.body.tags.len());
        assert_eq!(
            Some(r#"</v2/library/ubuntu/tags/list?last=v099&n=100>; rel="next""#.to_string()),
            listing.link
        );
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_list_unknown_repository() {
        let lister = lister(&["a"], PagingConfig::default());

        let errors = lister
            .list("library/missing", &uri("/v2/library/missing/tags/list"))
            .await
            .expect_err("should be unknown");
        let error = &errors.errors()[0];
        assert_eq!(ErrorCode::NameUnknown, error.code());
        assert_eq!(Some(&json!({ "name": "library/missing" })), error.detail());
    }

    #[test]
    fn test_validate_repository_name() {
        for name in [
            "ubuntu",
            "library/ubuntu",
            "a/b/c",
            "my-app",
            "my--app",
            "my.app",
            "my_app",
            "my__app",
            "0ab9",
        ] {
            validate_repository_name(name).expect(name);
        }

        for name in [
            "",
            "Ubuntu",
            "/ubuntu",
            "ubuntu/",
            "library//ubuntu",
            "../etc",
            "a/./b",
            "-app",
            "app-",
            "my___app",
            "my._app",
            "my app",
        ] {
            let err = validate_repository_name(name).expect_err(name);
            assert_eq!(ErrorCode::NameInvalid, err.code());
        }

        validate_repository_name(&"a".repeat(256)).expect_err("should be too long");
    }
}
