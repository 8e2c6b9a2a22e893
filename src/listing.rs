use hyper::{StatusCode, Uri};
use poem::{IntoResponse, Request};
use serde::Serialize;
use tracing::{event, Level};

use crate::{Error, Errors};

/// Content type of list responses,
///
pub const JSON_CONTENT_TYPE: &'static str = "application/json; charset=utf-8";

/// Prefix the registry api is nested under,
///
pub(crate) const API_PREFIX: &'static str = "/v2";

/// Returns the uri the client requested, w/ the api prefix that route nesting strips,
///
pub(crate) fn api_uri(request: &Request) -> Result<Uri, Error> {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or("/");

    Ok(format!("{API_PREFIX}{path_and_query}").parse()?)
}

/// Body of a list response, and the link to the next page if there is one,
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    /// Response body,
    ///
    pub body: T,
    /// Value of the `Link` header,
    ///
    pub link: Option<String>,
}

impl<T> IntoResponse for Listing<T>
where
    T: Serialize + Send,
{
    fn into_response(self) -> poem::Response {
        // The body is fully serialized before the response is started
        let body = match serde_json::to_vec(&self.body) {
            Ok(body) => body,
            Err(err) => {
                event!(Level::ERROR, "Could not serialize list response, {err}");
                return Errors::from(crate::Error::from(err)).into_response();
            }
        };

        let mut response = poem::Response::builder()
            .status(StatusCode::OK)
            .content_type(JSON_CONTENT_TYPE);

        if let Some(link) = self.link {
            event!(Level::DEBUG, "Adding link header, {link}");
            response = response.header("Link", link);
        }

        response.body(body)
    }
}

#[allow(unused_imports)]
#[cfg(test)]
mod tests {
    use hyper::Uri;
    use poem::Request;

    use super::api_uri;

    #[test]
    fn test_api_uri() {
        let request = Request::builder()
            .uri(Uri::from_static("/_catalog?n=2&last=a"))
            .finish();
        assert_eq!(
            "/v2/_catalog?n=2&last=a",
            api_uri(&request).expect("should be a valid uri").to_string()
        );

        let request = Request::builder()
            .uri(Uri::from_static("/library/ubuntu/tags/list"))
            .finish();
        assert_eq!(
            "/v2/library/ubuntu/tags/list",
            api_uri(&request).expect("should be a valid uri").to_string()
        );
    }
}
